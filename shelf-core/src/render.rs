//! Projects a row set into what the table shows.

use shelf_state::{DatasetKind, Field, Record};

pub const COLUMN_COUNT: usize = Field::ALL.len();

pub const NO_RECORDS: &str = "No records found";
pub const LOAD_FAILED: &str = "Failed to load data.";
pub const LOADING: &str = "Loading\u{2026}";

/// The table body: either one line per record, or a single placeholder line spanning
/// every column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Rows(Vec<[String; COLUMN_COUNT]>),
    Placeholder(&'static str),
}

/// A fully rebuilt table plus its count label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub body: TableBody,
    pub count_label: String,
}

impl TableView {
    pub fn loading() -> Self {
        Self {
            body: TableBody::Placeholder(LOADING),
            count_label: String::new(),
        }
    }

    pub fn failed() -> Self {
        Self {
            body: TableBody::Placeholder(LOAD_FAILED),
            count_label: String::new(),
        }
    }

    pub fn row_count(&self) -> usize {
        match &self.body {
            TableBody::Rows(rows) => rows.len(),
            TableBody::Placeholder(_) => 0,
        }
    }

    pub fn placeholder(&self) -> Option<&'static str> {
        match self.body {
            TableBody::Placeholder(text) => Some(text),
            TableBody::Rows(_) => None,
        }
    }
}

/// Builds the table for `rows`. The count is labelled for `active_view`, except when
/// there is nothing to show.
pub fn render_table(rows: &[&Record], active_view: DatasetKind) -> TableView {
    if rows.is_empty() {
        return TableView {
            body: TableBody::Placeholder(NO_RECORDS),
            count_label: "0 records".to_string(),
        };
    }

    let body = rows
        .iter()
        .map(|record| Field::ALL.map(|f| plain_text(record.field_or_empty(f))))
        .collect();

    TableView {
        body: TableBody::Rows(body),
        count_label: count_label(rows.len(), active_view),
    }
}

/// `"1 record"`, `"3 wants"`, ...
pub fn count_label(n: usize, view: DatasetKind) -> String {
    let plural = if n == 1 { "" } else { "s" };
    format!("{n} {}{plural}", view.noun())
}

/// Replaces control characters so cell text can never drive the terminal.
pub fn plain_text(value: &str) -> String {
    if !value.chars().any(char::is_control) {
        return value.to_string();
    }
    value
        .chars()
        .map(|c| if c.is_control() { '\u{FFFD}' } else { c })
        .collect()
}
