use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};
use shelf_core::{Command, style::Palette};

use super::StyleExt;
use crate::keys::{self, Action};

pub enum SearchAction {
    Close,
    Command(Command),
    /// Navigation that belongs to the table underneath.
    Table(Action),
}

/// Draws the search line. Typing only reaches it while `focused`.
pub fn draw(frame: &mut Frame, query: &str, focused: bool, palette: &Palette, area: Rect) {
    let prompt_color = if focused {
        palette.accent_color()
    } else {
        palette.muted_color()
    };

    let mut spans = vec![Span::styled("/ ", Style::default().fg(prompt_color))];
    if query.is_empty() && !focused {
        let hint = format!("press {} to search", keys::KEY_SEARCH);
        spans.push(Span::styled(hint, Style::default().fg(palette.muted_color())));
    } else {
        spans.push(Span::styled(
            query.to_string(),
            Style::default().fg(palette.text_color()),
        ));
    }
    if focused {
        spans.push(Span::styled("\u{2588}", Style::default().fg(prompt_color)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn handle_key(action: Action) -> Option<SearchAction> {
    match action {
        Action::Back => Some(SearchAction::Close),
        Action::Char(c) => Some(SearchAction::Command(Command::SearchPush(c))),
        Action::DeleteChar => Some(SearchAction::Command(Command::SearchPop)),
        Action::ClearLine => Some(SearchAction::Command(Command::SearchClear)),
        Action::CycleView => Some(SearchAction::Command(Command::CycleView)),
        Action::MoveUp | Action::MoveDown | Action::PageUp | Action::PageDown => {
            Some(SearchAction::Table(action))
        }
        _ => None,
    }
}
