use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    widgets::{Block, Paragraph},
};
use shelf_core::{
    SortKey, TableBody,
    render::LOAD_FAILED,
    style::{Palette, string_to_hsv},
};
use unicode_width::{UnicodeWidthChar as _, UnicodeWidthStr as _};

use super::{StyleExt, hsv_to_color, layout};
use crate::{app::App, keys::Action};

/// Selection and scroll position within the table body.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TableState {
    pub selected: usize,
    pub offset: usize,
}

impl TableState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn move_by(&mut self, delta: isize, row_count: usize) {
        self.selected = self
            .selected
            .saturating_add_signed(delta)
            .min(row_count.saturating_sub(1));
    }

    /// Clamps the selection to the rows and scrolls so it is within `height` lines.
    pub fn scroll_into_view(&mut self, row_count: usize, height: usize) {
        self.selected = self.selected.min(row_count.saturating_sub(1));
        if height == 0 {
            return;
        }
        if self.selected < self.offset {
            self.offset = self.selected;
        } else if self.selected >= self.offset + height {
            self.offset = self.selected + 1 - height;
        }
        self.offset = self.offset.min(row_count.saturating_sub(height));
    }
}

pub fn handle_key(state: &mut TableState, row_count: usize, action: Action) {
    let page = layout::PAGE_SCROLL_SIZE as isize;
    match action {
        Action::MoveUp => state.move_by(-1, row_count),
        Action::MoveDown => state.move_by(1, row_count),
        Action::PageUp => state.move_by(-page, row_count),
        Action::PageDown => state.move_by(page, row_count),
        Action::GotoTop => state.selected = 0,
        Action::GotoBottom => state.selected = row_count.saturating_sub(1),
        _ => {}
    }
}

/// The column whose heading is at (`x`, `y`), if any.
pub fn header_hit(area: Rect, x: u16, y: u16) -> Option<SortKey> {
    let (header, _) = layout::split_table(area);
    if !layout::contains(header, x, y) {
        return None;
    }
    layout::column_areas(header)
        .iter()
        .position(|column| x >= column.x && x < column.x + column.width)
        .and_then(|i| SortKey::ALL.get(i).copied())
}

/// The row index under (`x`, `y`), if it lands in the body.
pub fn row_hit(state: &TableState, area: Rect, x: u16, y: u16) -> Option<usize> {
    let (_, body) = layout::split_table(area);
    layout::contains(body, x, y).then(|| state.offset + (y - body.y) as usize)
}

/// Truncates `text` to `width` display columns, marking the cut with an ellipsis.
pub fn fit(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('\u{2026}');
    out
}

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect) {
    let palette = app.controller.theme().palette();
    let view = app.controller.view();
    let (header, body) = layout::split_table(area);

    for (key, column) in SortKey::ALL.into_iter().zip(layout::column_areas(header)) {
        let (label, color) = match view.sort_indicator(key) {
            Some(direction) => (
                format!("{} {}", key.label(), direction.arrow()),
                palette.header_active_color(),
            ),
            None => (key.label().to_string(), palette.header_color()),
        };
        let heading = Paragraph::new(fit(&label, column.width as usize))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD));
        frame.render_widget(heading, column);
    }

    match &app.controller.table().body {
        TableBody::Placeholder(text) => {
            let color = if *text == LOAD_FAILED {
                palette.error_color()
            } else {
                palette.muted_color()
            };
            let line = Rect::new(body.x, body.y, body.width, body.height.min(1));
            let placeholder = Paragraph::new(*text)
                .alignment(Alignment::Center)
                .style(Style::default().fg(color));
            frame.render_widget(placeholder, line);
        }
        TableBody::Rows(rows) => {
            app.table
                .scroll_into_view(rows.len(), body.height as usize);

            let visible = rows
                .iter()
                .enumerate()
                .skip(app.table.offset)
                .take(body.height as usize);
            for (line_y, (index, row)) in (body.y..).zip(visible) {
                let line = Rect::new(body.x, line_y, body.width, 1);
                if index == app.table.selected {
                    let highlight = Block::default().style(Style::default().bg(palette.selection_color()));
                    frame.render_widget(highlight, line);
                }

                for ((key, cell), column) in SortKey::ALL
                    .into_iter()
                    .zip(row.iter())
                    .zip(layout::column_areas(line))
                {
                    let color = cell_color(&palette, key, cell);
                    let cell = Paragraph::new(fit(cell, column.width as usize))
                        .style(Style::default().fg(color));
                    frame.render_widget(cell, column);
                }
            }
        }
    }
}

fn cell_color(palette: &Palette, key: SortKey, value: &str) -> ratatui::style::Color {
    match key {
        SortKey::Artist => hsv_to_color(string_to_hsv(value, palette.artist_value)),
        SortKey::Album => palette.album_color(),
        SortKey::Genre => palette.genre_color(),
        SortKey::Year => palette.year_color(),
    }
}
