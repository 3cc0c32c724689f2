use std::{
    fmt, fs,
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::{log_warn, metrics::DatasetSeeds};

const ENABLE_LOGS: bool = true;

pub const CONFIG_FILE_NAME: &str = "config.json";
const APP_DIR_NAME: &str = "lotpulse";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StorageBackend {
    Json,
    Sqlite,
    Memory,
}

impl StorageBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageBackend::Json => "json",
            StorageBackend::Sqlite => "sqlite",
            StorageBackend::Memory => "memory",
        }
    }
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(StorageBackend::Json),
            "sqlite" => Ok(StorageBackend::Sqlite),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("unknown storage backend '{other}' (expected json, sqlite or memory)"),
        }
    }
}

/// Runtime configuration. Every field has a default, so a partial `config.json` is fine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    #[serde(skip)]
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    /// Simulated "typing" pause before an advisor reply.
    pub typing_delay_ms: u64,
    /// Turns up to and including this one consult the early-stage rules.
    pub early_turn_threshold: u32,
    pub seeds: DatasetSeeds,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StorageBackend::Json,
            typing_delay_ms: 1_000,
            early_turn_threshold: 4,
            seeds: DatasetSeeds::default(),
        }
    }
}

impl AppConfig {
    /// Reads `config.json` from `data_dir`; missing or unreadable files give defaults.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let path = data_dir.join(CONFIG_FILE_NAME);
        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_else(|err| {
                log_warn!("Ignoring invalid config at {}: {err}", path.display());
                AppConfig::default()
            })
        } else {
            AppConfig::default()
        };
        config.data_dir = data_dir.to_path_buf();
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;
        let path = self.data_dir.join(CONFIG_FILE_NAME);
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(&path, serialized)
            .with_context(|| format!("Failed to write config to {}", path.display()))
    }

    pub fn typing_delay(&self) -> Duration {
        Duration::from_millis(self.typing_delay_ms)
    }

    pub fn store_path(&self) -> PathBuf {
        match self.backend {
            StorageBackend::Sqlite => self.data_dir.join("lotpulse.sqlite3"),
            StorageBackend::Json | StorageBackend::Memory => self.data_dir.join("store.json"),
        }
    }
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_gives_defaults_in_that_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.data_dir, dir.path());
        assert_eq!(config.backend, StorageBackend::Json);
        assert_eq!(config.early_turn_threshold, 4);
        assert_eq!(config.seeds.overview, 777);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{"backend": "sqlite", "seeds": {"competitors": 7}}"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert_eq!(config.seeds.competitors, 7);
        assert_eq!(config.seeds.overview, 777);
        assert_eq!(config.typing_delay_ms, 1_000);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "not json").unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config.backend, StorageBackend::Json);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::load(dir.path()).unwrap();
        config.typing_delay_ms = 0;
        config.save().unwrap();
        assert_eq!(AppConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn backend_parses_case_insensitively() {
        assert_eq!("SQLite".parse::<StorageBackend>().unwrap(), StorageBackend::Sqlite);
        assert!("redis".parse::<StorageBackend>().is_err());
    }
}
