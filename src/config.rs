use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

use crate::app_dirs::AppDirs;
use crate::cache::DEFAULT_CAPACITY;
use crate::words::DEFAULT_LIST;

pub const DEFAULT_DICTIONARY_URL: &str = "https://api.dictionaryapi.dev/api/v2/entries/en";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RoundConfig {
    pub word_length: usize,
    pub time_limit_secs: u64,
}

impl RoundConfig {
    pub fn new(word_length: usize, time_limit_secs: u64) -> Self {
        Self {
            word_length,
            time_limit_secs,
        }
    }

    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub rounds: Vec<RoundConfig>,
    pub word_list: String,
    pub dictionary_url: String,
    pub offline: bool,
    pub cache_capacity: usize,
    pub tick_ms: u64,
    /// Additional answers per word length, merged into the word list at startup
    pub extra_words: BTreeMap<usize, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rounds: vec![
                RoundConfig::new(5, 180),
                RoundConfig::new(7, 300),
                RoundConfig::new(9, 300),
            ],
            word_list: DEFAULT_LIST.to_string(),
            dictionary_url: DEFAULT_DICTIONARY_URL.to_string(),
            offline: false,
            cache_capacity: DEFAULT_CAPACITY,
            tick_ms: 250,
            extra_words: BTreeMap::new(),
        }
    }
}

impl Config {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        if let Ok(bytes) = fs::read(&self.path) {
            match serde_json::from_slice::<Config>(&bytes) {
                Ok(cfg) => return cfg,
                Err(e) => warn!(path = %self.path.display(), error = %e, "ignoring invalid config"),
            }
        }
        Config::default()
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg).unwrap_or_default();
        fs::write(&self.path, data)
    }
}
