use serde::Deserialize;
use std::path::PathBuf;

use crate::session::DEFAULT_TOTAL_SECONDS;

#[derive(Debug, Default, Deserialize)]
pub struct GengokaConfig {
    pub session: Option<SessionConfig>,
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionConfig {
    pub total_seconds: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StorageConfig {
    pub data_dir: Option<PathBuf>,
}

impl GengokaConfig {
    pub fn load() -> Option<Self> {
        let path = config_path()?;
        if !path.exists() {
            return None;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return None;
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                None
            }
        }
    }

    /// Total time budget per run, in seconds.
    #[must_use]
    pub fn total_seconds(&self) -> u32 {
        self.session
            .as_ref()
            .and_then(|s| s.total_seconds)
            .unwrap_or(DEFAULT_TOTAL_SECONDS)
            .max(1)
    }

    /// Where the history database, export file, and logs live.
    #[must_use]
    pub fn data_dir(&self) -> PathBuf {
        if let Some(dir) = self.storage.as_ref().and_then(|s| s.data_dir.clone()) {
            return dir;
        }

        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gengoka")
    }
}

fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".gengoka").join("config.toml"))
}
