//! Derives the displayed rows from the loaded data and the view state.
//!
//! Nothing in here holds state: the same library and view always give the same rows.

use std::cmp::Reverse;

use shelf_state::{Field, Library, Record};

use crate::view::{SortDirection, SortKey, ViewState};

/// The fields a search query is matched against.
const SEARCHED_FIELDS: [Field; 3] = [Field::Artist, Field::Album, Field::Genre];

/// Trims and lowercases raw search input.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Whether `needle` (already normalized) occurs in the artist, album or genre of `record`.
pub fn matches_query(record: &Record, needle: &str) -> bool {
    SEARCHED_FIELDS
        .iter()
        .any(|&f| record.field_or_empty(f).to_lowercase().contains(needle))
}

/// Keeps the records matching `query`, in order. An empty query keeps everything.
pub fn filter_records<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    query: &str,
) -> Vec<&'a Record> {
    let needle = normalize_query(query);
    if needle.is_empty() {
        return records.into_iter().collect();
    }
    records
        .into_iter()
        .filter(|r| matches_query(r, &needle))
        .collect()
}

/// Stable sort on the lowercased value of `key`. Rows with equal values keep their
/// relative order in both directions. With no key every row compares equal.
pub fn sort_records(rows: &mut [&Record], key: Option<SortKey>, direction: SortDirection) {
    let sort_value = |record: &Record| {
        key.map(|k| record.field_or_empty(k).to_lowercase())
            .unwrap_or_default()
    };
    match direction {
        SortDirection::Asc => rows.sort_by_cached_key(|r| sort_value(*r)),
        SortDirection::Desc => rows.sort_by_cached_key(|r| Reverse(sort_value(*r))),
    }
}

/// Selects the active dataset, filters it by the search query and sorts it.
/// Returns nothing until a library has been loaded.
pub fn apply_search_and_sort<'a>(library: Option<&'a Library>, view: &ViewState) -> Vec<&'a Record> {
    let Some(library) = library else {
        return vec![];
    };

    let mut rows = filter_records(&library.get(view.active_view).records, &view.search_query);
    sort_records(&mut rows, Some(view.sort_key), view.sort_direction);
    rows
}
