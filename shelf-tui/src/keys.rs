use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use shelf_core::{Controller, SortKey, shelf_state::DatasetKind};
use smol_str::{SmolStr, ToSmolStr};

/// Centrally defined key actions for the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Search,
    Logs,
    CycleView,
    ShowView(DatasetKind),
    ToggleTheme,
    SortBy(SortKey),
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    GotoTop,
    GotoBottom,
    Back,
    ClearLine,
    Char(char),
    DeleteChar,
}

// ── Key code constants ───────────────────────────────────────────

pub const KEY_QUIT: KeyCode = KeyCode::Char('q');
pub const KEY_SEARCH: KeyCode = KeyCode::Char('/');
pub const KEY_LOGS: KeyCode = KeyCode::Char('L');
pub const KEY_CYCLE_VIEW: KeyCode = KeyCode::Char('v');
pub const KEY_CYCLE_VIEW_ALT: KeyCode = KeyCode::Tab;
pub const KEY_COLLECTION: KeyCode = KeyCode::Char('c');
pub const KEY_WANTLIST: KeyCode = KeyCode::Char('w');
pub const KEY_THEME: KeyCode = KeyCode::Char('t');
pub const KEY_SORT_ARTIST: KeyCode = KeyCode::Char('1');
pub const KEY_SORT_ALBUM: KeyCode = KeyCode::Char('2');
pub const KEY_SORT_GENRE: KeyCode = KeyCode::Char('3');
pub const KEY_SORT_YEAR: KeyCode = KeyCode::Char('4');
pub const KEY_SELECT: KeyCode = KeyCode::Enter;
pub const KEY_BACK: KeyCode = KeyCode::Esc;
pub const KEY_UP: KeyCode = KeyCode::Up;
pub const KEY_DOWN: KeyCode = KeyCode::Down;
pub const KEY_PAGE_UP: KeyCode = KeyCode::PageUp;
pub const KEY_PAGE_DOWN: KeyCode = KeyCode::PageDown;
pub const KEY_GOTO_TOP: KeyCode = KeyCode::Home;
pub const KEY_GOTO_BOTTOM: KeyCode = KeyCode::End;
pub const KEY_DELETE_CHAR: KeyCode = KeyCode::Backspace;

pub fn sort_key_code(key: SortKey) -> KeyCode {
    match key {
        SortKey::Artist => KEY_SORT_ARTIST,
        SortKey::Album => KEY_SORT_ALBUM,
        SortKey::Genre => KEY_SORT_GENRE,
        SortKey::Year => KEY_SORT_YEAR,
    }
}

impl Action {
    /// Label shown in the help bar. Returns `None` for actions that
    /// shouldn't appear (navigation, text input, etc.).
    pub fn help_label(&self, controller: &Controller) -> Option<(SmolStr, SmolStr)> {
        let (key, desc): (KeyCode, SmolStr) = match self {
            Action::Quit => (KEY_QUIT, "quit".into()),
            Action::Search => (KEY_SEARCH, "search".into()),
            Action::Logs => (KEY_LOGS, "logs".into()),
            Action::Back => (KEY_BACK, "close".into()),
            Action::CycleView => {
                let next = controller.view().active_view.other();
                (KEY_CYCLE_VIEW, format!("view ({})", next.as_str().to_lowercase()).into())
            }
            Action::ToggleTheme => {
                let next = controller.theme().current().opposite();
                (KEY_THEME, format!("theme ({next})").into())
            }
            Action::SortBy(key) => (sort_key_code(*key), key.as_str().into()),
            Action::ClearLine => return Some(("^u".into(), "clear".into())),
            _ => return None,
        };
        let key_str: SmolStr = key.to_smolstr().to_lowercase().into();
        Some((key_str, desc))
    }
}

/// Resolve a key event into an action in table context.
pub fn table_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_QUIT => Some(Action::Quit),
        KEY_SEARCH => Some(Action::Search),
        KEY_LOGS => Some(Action::Logs),
        KEY_CYCLE_VIEW | KEY_CYCLE_VIEW_ALT => Some(Action::CycleView),
        KEY_COLLECTION => Some(Action::ShowView(DatasetKind::Collection)),
        KEY_WANTLIST => Some(Action::ShowView(DatasetKind::Wantlist)),
        KEY_THEME => Some(Action::ToggleTheme),
        KEY_SORT_ARTIST => Some(Action::SortBy(SortKey::Artist)),
        KEY_SORT_ALBUM => Some(Action::SortBy(SortKey::Album)),
        KEY_SORT_GENRE => Some(Action::SortBy(SortKey::Genre)),
        KEY_SORT_YEAR => Some(Action::SortBy(SortKey::Year)),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        _ => None,
    }
}

/// Resolve a key event into an action in search context.
pub fn search_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK | KEY_SELECT => Some(Action::Back),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_CYCLE_VIEW_ALT => Some(Action::CycleView),
        KEY_DELETE_CHAR => Some(Action::DeleteChar),
        KeyCode::Char(c) => {
            if key.modifiers.contains(KeyModifiers::CONTROL) && c == 'u' {
                Some(Action::ClearLine)
            } else {
                Some(Action::Char(c))
            }
        }
        _ => None,
    }
}

/// Resolve a key event into an action in logs context.
pub fn logs_action(key: &KeyEvent) -> Option<Action> {
    match key.code {
        KEY_BACK | KEY_LOGS | KEY_QUIT => Some(Action::Back),
        KEY_UP => Some(Action::MoveUp),
        KEY_DOWN => Some(Action::MoveDown),
        KEY_PAGE_UP => Some(Action::PageUp),
        KEY_PAGE_DOWN => Some(Action::PageDown),
        KEY_GOTO_TOP => Some(Action::GotoTop),
        KEY_GOTO_BOTTOM => Some(Action::GotoBottom),
        _ => None,
    }
}

/// Ordered list of actions to show in the table help bar.
pub const TABLE_HELP: &[Action] = &[
    Action::Quit,
    Action::Search,
    Action::SortBy(SortKey::Artist),
    Action::SortBy(SortKey::Album),
    Action::SortBy(SortKey::Genre),
    Action::SortBy(SortKey::Year),
    Action::CycleView,
    Action::ToggleTheme,
    Action::Logs,
];

/// Ordered list of actions to show in the search help bar.
pub const SEARCH_HELP: &[Action] = &[Action::Back, Action::ClearLine];

/// Ordered list of actions to show in the logs help bar.
pub const LOGS_HELP: &[Action] = &[Action::Back];

#[cfg(test)]
mod tests {
    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_table_bindings() {
        assert_eq!(table_action(&press(KeyCode::Char('4'))), Some(Action::SortBy(SortKey::Year)));
        assert_eq!(table_action(&press(KeyCode::Tab)), Some(Action::CycleView));
        assert_eq!(
            table_action(&press(KeyCode::Char('w'))),
            Some(Action::ShowView(DatasetKind::Wantlist))
        );
        assert_eq!(table_action(&press(KeyCode::Char('x'))), None);
    }

    #[test]
    fn test_search_treats_letters_as_text() {
        assert_eq!(search_action(&press(KeyCode::Char('q'))), Some(Action::Char('q')));
        assert_eq!(search_action(&press(KeyCode::Char('1'))), Some(Action::Char('1')));
        assert_eq!(
            search_action(&KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(Action::ClearLine)
        );
        assert_eq!(search_action(&press(KeyCode::Enter)), Some(Action::Back));
    }

    #[test]
    fn test_every_sort_key_has_a_binding() {
        for key in SortKey::ALL {
            assert_eq!(table_action(&press(sort_key_code(key))), Some(Action::SortBy(key)));
        }
    }
}
