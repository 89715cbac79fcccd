pub(crate) mod layout;
pub(crate) mod logs;
pub(crate) mod search;
pub(crate) mod table;

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph},
};
use shelf_core::{
    Controller, LoadPhase,
    shelf_state::DatasetKind,
    style::{Hsv, Palette, Rgb},
};
use unicode_width::UnicodeWidthStr as _;

use crate::{
    app::{App, FocusedPanel},
    keys::{self, Action},
};

/// Extension trait for using palette colors with ratatui.
pub trait StyleExt {
    fn background_color(&self) -> Color;
    fn text_color(&self) -> Color;
    fn muted_color(&self) -> Color;
    fn border_color(&self) -> Color;
    fn header_color(&self) -> Color;
    fn header_active_color(&self) -> Color;
    fn selection_color(&self) -> Color;
    fn accent_color(&self) -> Color;
    fn album_color(&self) -> Color;
    fn genre_color(&self) -> Color;
    fn year_color(&self) -> Color;
    fn error_color(&self) -> Color;
}
impl StyleExt for Palette {
    fn background_color(&self) -> Color {
        hsv_to_color(self.background_hsv)
    }
    fn text_color(&self) -> Color {
        hsv_to_color(self.text_hsv)
    }
    fn muted_color(&self) -> Color {
        hsv_to_color(self.muted_hsv)
    }
    fn border_color(&self) -> Color {
        hsv_to_color(self.border_hsv)
    }
    fn header_color(&self) -> Color {
        hsv_to_color(self.header_hsv)
    }
    fn header_active_color(&self) -> Color {
        hsv_to_color(self.header_active_hsv)
    }
    fn selection_color(&self) -> Color {
        hsv_to_color(self.selection_hsv)
    }
    fn accent_color(&self) -> Color {
        hsv_to_color(self.accent_hsv)
    }
    fn album_color(&self) -> Color {
        hsv_to_color(self.album_hsv)
    }
    fn genre_color(&self) -> Color {
        hsv_to_color(self.genre_hsv)
    }
    fn year_color(&self) -> Color {
        hsv_to_color(self.year_hsv)
    }
    fn error_color(&self) -> Color {
        hsv_to_color(self.error_hsv)
    }
}

pub(crate) fn hsv_to_color(hsv: Hsv) -> Color {
    let Rgb { r, g, b } = Rgb::from_hsv(hsv);
    Color::Rgb(r, g, b)
}

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let palette = app.controller.theme().palette();

    // Fill entire terminal with background color.
    let bg = Block::default().style(
        Style::default()
            .bg(palette.background_color())
            .fg(palette.text_color()),
    );
    frame.render_widget(bg, size);

    let main = layout::split_main(size);

    app.toolbar_items = draw_toolbar(frame, &app.controller, &palette, main.toolbar);
    search::draw(
        frame,
        &app.controller.view().search_query,
        app.focused_panel == FocusedPanel::Search,
        &palette,
        main.search,
    );

    match app.focused_panel {
        FocusedPanel::Table | FocusedPanel::Search => table::draw(frame, app, main.content),
        FocusedPanel::Logs => logs::draw(frame, &mut app.logs, &palette, main.content),
    }

    draw_status_bar(frame, &app.controller, &palette, main.status_bar);
    app.help_bar_items = draw_help_bar(frame, app, &palette, main.help_bar);
}

/// Lays out `(text, style, action)` pieces left to right from `x`, returning the spans
/// and the clickable extent of every piece that has an action.
fn place_spans(
    x: u16,
    pieces: Vec<(String, Style, Option<Action>)>,
) -> (Vec<Span<'static>>, Vec<(u16, u16, Action)>) {
    let mut x = x;
    let mut spans = Vec::with_capacity(pieces.len());
    let mut items = vec![];
    for (text, style, action) in pieces {
        let width = text.width() as u16;
        if let Some(action) = action {
            items.push((x, x + width, action));
        }
        x += width;
        spans.push(Span::styled(text, style));
    }
    (spans, items)
}

/// The view selector and theme toggle.
fn draw_toolbar(
    frame: &mut Frame,
    controller: &Controller,
    palette: &Palette,
    area: Rect,
) -> Vec<(u16, u16, Action)> {
    let active = controller.view().active_view;
    let plain = Style::default().fg(palette.muted_color());

    let mut pieces = vec![(
        " shelf ".to_string(),
        Style::default()
            .fg(palette.accent_color())
            .add_modifier(Modifier::BOLD),
        None,
    )];
    for kind in DatasetKind::ALL {
        let piece = if kind == active {
            (
                format!("[{kind}]"),
                Style::default()
                    .fg(palette.header_active_color())
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            (format!(" {kind} "), Style::default().fg(palette.text_color()))
        };
        pieces.push((" ".to_string(), plain, None));
        pieces.push((piece.0, piece.1, Some(Action::ShowView(kind))));
    }
    pieces.push(("   ".to_string(), plain, None));
    pieces.push((
        format!("theme: {}", controller.theme().current()),
        Style::default().fg(palette.text_color()),
        Some(Action::ToggleTheme),
    ));

    let (spans, items) = place_spans(area.x, pieces);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    items
}

/// Row count on the left, last-updated on the right.
fn draw_status_bar(frame: &mut Frame, controller: &Controller, palette: &Palette, area: Rect) {
    let count_color = match controller.phase() {
        LoadPhase::Failed => palette.error_color(),
        LoadPhase::Loading | LoadPhase::Ready => palette.text_color(),
    };
    let count = Paragraph::new(format!(" {}", controller.table().count_label))
        .style(Style::default().fg(count_color));
    frame.render_widget(count, area);

    if let Some(last_updated) = controller.last_updated() {
        let label = Paragraph::new(format!("{last_updated} "))
            .alignment(Alignment::Right)
            .style(Style::default().fg(palette.muted_color()));
        frame.render_widget(label, area);
    }
}

fn draw_help_bar(
    frame: &mut Frame,
    app: &App,
    palette: &Palette,
    area: Rect,
) -> Vec<(u16, u16, Action)> {
    let help_actions: &[Action] = match app.focused_panel {
        FocusedPanel::Table => keys::TABLE_HELP,
        FocusedPanel::Search => keys::SEARCH_HELP,
        FocusedPanel::Logs => keys::LOGS_HELP,
    };

    let key_style = Style::default().fg(palette.accent_color());
    let label_style = Style::default().fg(palette.muted_color());

    let mut pieces = vec![(" ".to_string(), label_style, None)];
    for action in help_actions {
        if let Some((key, label)) = action.help_label(&app.controller) {
            pieces.push((key.to_string(), key_style, Some(*action)));
            pieces.push((format!(":{label}"), label_style, Some(*action)));
            pieces.push((" ".to_string(), label_style, None));
        }
    }

    let (spans, items) = place_spans(area.x, pieces);
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
    items
}
