use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};
use shelf_core::style::Palette;

use super::{StyleExt, layout};
use crate::{keys::Action, log_buffer::LogBuffer};

pub struct LogsState {
    pub log_buffer: LogBuffer,
    pub scroll_offset: usize,
}

pub enum LogsAction {
    ToggleLogs,
}

impl LogsState {
    pub fn new(log_buffer: LogBuffer) -> Self {
        Self {
            log_buffer,
            scroll_offset: 0,
        }
    }

    pub fn scroll_to_end(&mut self) {
        self.scroll_offset = self.log_buffer.len().saturating_sub(1);
    }

    pub fn scroll_by(&mut self, delta: isize) {
        let last = self.log_buffer.len().saturating_sub(1);
        self.scroll_offset = self.scroll_offset.saturating_add_signed(delta).min(last);
    }
}

pub fn draw(frame: &mut Frame, logs: &mut LogsState, palette: &Palette, area: Rect) {
    let entries = logs.log_buffer.snapshot();
    let title = match logs.log_buffer.problem_count() {
        0 => format!(" Logs ({}) ", entries.len()),
        problems => format!(" Logs ({}, {problems} warnings) ", entries.len()),
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border_color()));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if entries.is_empty() {
        let empty = Paragraph::new("No log entries").style(Style::default().fg(palette.muted_color()));
        frame.render_widget(empty, inner);
        return;
    }

    let text_color = palette.text_color();
    let muted_color = palette.muted_color();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            // Keep semantic colors for log levels.
            let (level_str, level_color) = match entry.level {
                tracing::Level::ERROR => ("ERR", palette.error_color()),
                tracing::Level::WARN => ("WRN", Color::Yellow),
                tracing::Level::INFO => ("INF", palette.accent_color()),
                tracing::Level::DEBUG => ("DBG", Color::Green),
                tracing::Level::TRACE => ("TRC", muted_color),
            };

            let target = if entry.target.len() > layout::LOG_TARGET_WIDTH {
                let cut = entry.target.len() - layout::LOG_TARGET_SUFFIX_LEN;
                format!("...{}", entry.target.get(cut..).unwrap_or_default())
            } else {
                entry.target.clone()
            };

            ListItem::new(Line::from(vec![
                Span::styled(
                    level_str,
                    Style::default().fg(level_color).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{target:width$}", width = layout::LOG_TARGET_WIDTH),
                    Style::default().fg(muted_color),
                ),
                Span::raw(" "),
                Span::styled(entry.message.clone(), Style::default().fg(text_color)),
            ]))
        })
        .collect();

    let list = List::new(items).highlight_style(
        Style::default()
            .bg(palette.selection_color())
            .add_modifier(Modifier::BOLD),
    );

    logs.scroll_offset = logs.scroll_offset.min(entries.len() - 1);
    let mut state = ListState::default();
    state.select(Some(logs.scroll_offset));

    frame.render_stateful_widget(list, inner, &mut state);
}

pub fn handle_key(logs: &mut LogsState, action: Action) -> Option<LogsAction> {
    let page = layout::PAGE_SCROLL_SIZE as isize;
    match action {
        Action::Back => return Some(LogsAction::ToggleLogs),
        Action::MoveUp => logs.scroll_by(-1),
        Action::MoveDown => logs.scroll_by(1),
        Action::PageUp => logs.scroll_by(-page),
        Action::PageDown => logs.scroll_by(page),
        Action::GotoTop => logs.scroll_offset = 0,
        Action::GotoBottom => logs.scroll_to_end(),
        _ => {}
    }
    None
}
