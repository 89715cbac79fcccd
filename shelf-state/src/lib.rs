//! Representations of the record shelf: the records themselves, the datasets that hold them,
//! and the JSON payloads they are read from.
//!
//! Separated out so the loader, the view engine and any client can share them.
#![deny(missing_docs)]

mod dataset;
pub use dataset::{Dataset, DatasetKind, Library, Metadata, Payload};

mod record;
pub use record::{Field, Record};
