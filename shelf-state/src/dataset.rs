use serde::{Deserialize, Deserializer, Serialize};

use crate::Record;

/// Which of the two datasets a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// The records the user owns.
    #[default]
    Collection,
    /// The records the user wants but does not own.
    Wantlist,
}

impl DatasetKind {
    /// Both kinds, in selector order.
    pub const ALL: [DatasetKind; 2] = [DatasetKind::Collection, DatasetKind::Wantlist];

    /// Returns a human-readable name for the dataset.
    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Collection => "Collection",
            DatasetKind::Wantlist => "Wantlist",
        }
    }

    /// The singular noun used when counting rows of this dataset.
    pub fn noun(&self) -> &'static str {
        match self {
            DatasetKind::Collection => "record",
            DatasetKind::Wantlist => "want",
        }
    }

    /// The default resource name this dataset is published under.
    pub fn resource_name(&self) -> &'static str {
        match self {
            DatasetKind::Collection => "collection.json",
            DatasetKind::Wantlist => "wantlist.json",
        }
    }

    /// The other dataset.
    pub fn other(&self) -> DatasetKind {
        match self {
            DatasetKind::Collection => DatasetKind::Wantlist,
            DatasetKind::Wantlist => DatasetKind::Collection,
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The envelope around a dataset's records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// When the dataset was last generated, as written by the producer.
    pub updated_at: Option<String>,
}

/// A JSON document as published: `{ "items": [...], "updated_at": "..." }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// The records. A missing or null list is read as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub items: Vec<Record>,
    /// When the document was generated. Non-string values are ignored.
    #[serde(
        default,
        deserialize_with = "string_or_nothing",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<String>,
}

/// An ordered list of records plus its metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    /// The records, in payload order.
    pub records: Vec<Record>,
    /// The metadata envelope. `None` when the dataset could not be read.
    pub meta: Option<Metadata>,
}

impl Dataset {
    /// Builds a dataset from a payload, normalizing every record.
    pub fn from_payload(payload: Payload) -> Self {
        Self {
            records: payload.items.into_iter().map(Record::normalized).collect(),
            meta: Some(Metadata {
                updated_at: payload.updated_at,
            }),
        }
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the dataset has no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Both datasets, as loaded at startup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Library {
    /// The owned records.
    pub collection: Dataset,
    /// The wanted records.
    pub wantlist: Dataset,
}

impl Library {
    /// Returns the dataset for `kind`.
    pub fn get(&self, kind: DatasetKind) -> &Dataset {
        match kind {
            DatasetKind::Collection => &self.collection,
            DatasetKind::Wantlist => &self.wantlist,
        }
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<Record>, D::Error> {
    Ok(Option::<Vec<Record>>::deserialize(deserializer)?.unwrap_or_default())
}

fn string_or_nothing<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    })
}
