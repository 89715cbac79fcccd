use thiserror::Error;

/// An error that fails the initial load. Only ever shown to the user as a generic
/// "Failed to load data." row; the details go to the log.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The request could not be made or the body could not be read.
    #[error("{resource}: request failed: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    /// A local source could not be read.
    #[error("{resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// The resource answered with a non-success status.
    #[error("{resource} HTTP {status}")]
    Status { resource: String, status: u16 },

    /// The body was not a valid payload.
    #[error("{resource}: malformed JSON: {source}")]
    Json {
        resource: String,
        #[source]
        source: serde_json::Error,
    },
}

/// An error reading or writing the persisted preferences.
#[derive(Debug, Error)]
pub enum PreferenceError {
    #[error("preference storage is unavailable")]
    Unavailable,

    #[error("preference file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("preference file is malformed: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}
