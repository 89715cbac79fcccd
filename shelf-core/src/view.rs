use serde::{Deserialize, Serialize};
use shelf_state::DatasetKind;

/// The column rows are ordered by.
pub use shelf_state::Field as SortKey;

/// The direction rows are ordered in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// The indicator drawn next to the active column heading.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "\u{25B2}",
            SortDirection::Desc => "\u{25BC}",
        }
    }
}

/// Everything the displayed rows depend on besides the data itself.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub active_view: DatasetKind,
    pub search_query: String,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
}

impl ViewState {
    /// Selecting the active key flips the direction; selecting another key switches
    /// to it in ascending order.
    pub fn sort_by(&mut self, key: SortKey) {
        if self.sort_key == key {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_key = key;
            self.sort_direction = SortDirection::Asc;
        }
    }

    /// Search text and sort state carry over.
    pub fn switch_view(&mut self, kind: DatasetKind) {
        self.active_view = kind;
    }

    /// Returns the direction indicator for `key`'s heading. Only the active key has one.
    pub fn sort_indicator(&self, key: SortKey) -> Option<SortDirection> {
        (self.sort_key == key).then_some(self.sort_direction)
    }
}
