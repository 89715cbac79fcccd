use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use shelf_core::{Source, shelf_state::DatasetKind};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub general: General,
    #[serde(default)]
    pub sources: Sources,
}
impl Config {
    pub const FILENAME: &str = "shelf-config.toml";

    /// Reads `path`, falling back to the defaults if it does not exist.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e).with_context(|| format!("failed to read {}", path.display())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct General {
    pub tick_rate_ms: u64,
    /// Where the theme preference is persisted.
    pub state_file: PathBuf,
    pub log_file: PathBuf,
    /// How many recent events the log panel keeps.
    pub log_capacity: usize,
}
impl Default for General {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            state_file: "shelf-state.toml".into(),
            log_file: "shelf.log".into(),
            log_capacity: 500,
        }
    }
}

/// Where the two datasets are published.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Sources {
    /// An http(s) URL or a local directory.
    pub base_url: String,
    pub collection: String,
    pub wantlist: String,
}
impl Default for Sources {
    fn default() -> Self {
        Self {
            base_url: ".".to_string(),
            collection: DatasetKind::Collection.resource_name().to_string(),
            wantlist: DatasetKind::Wantlist.resource_name().to_string(),
        }
    }
}
impl Sources {
    pub fn source(&self, kind: DatasetKind) -> Source {
        let name = match kind {
            DatasetKind::Collection => &self.collection,
            DatasetKind::Wantlist => &self.wantlist,
        };
        Source::resolve(&self.base_url, name)
    }
}
