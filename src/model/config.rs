use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// App configuration, read from `jot.toml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path of the JSON data file (default: `jot.json` next to the config)
    #[serde(default)]
    pub data_file: Option<PathBuf>,
    /// Extra command abbreviations: full command name → short alias.
    /// Merged with the built-in ones when the prefix index is rebuilt.
    #[serde(default)]
    pub abbreviations: IndexMap<String, String>,
}

impl AppConfig {
    /// Load from `path`. A missing file is not an error: defaults apply.
    pub fn load(path: &Path) -> Result<AppConfig, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(t) => t,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(AppConfig::default());
            }
            Err(e) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: e,
                });
            }
        };
        Ok(toml::from_str(&text)?)
    }
}
