use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::engine::shuffle::ShufflePolicy;
use crate::session::game::Rules;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_min_chars")]
    pub min_chars: usize,
    #[serde(default = "default_min_sentences")]
    pub min_sentences: usize,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: usize,
    #[serde(default)]
    pub shuffle_policy: ShufflePolicy,
    #[serde(default = "default_shuffle_attempts")]
    pub shuffle_attempts: usize,
    #[serde(default = "default_normalize_words")]
    pub normalize_words: bool,
    #[serde(default = "default_set")]
    pub default_set: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_min_chars() -> usize {
    20
}
fn default_min_sentences() -> usize {
    2
}
fn default_max_rounds() -> usize {
    10
}
fn default_shuffle_attempts() -> usize {
    8
}
fn default_normalize_words() -> bool {
    true
}
fn default_set() -> String {
    "paragraph".to_string()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_chars: default_min_chars(),
            min_sentences: default_min_sentences(),
            max_rounds: default_max_rounds(),
            shuffle_policy: ShufflePolicy::default(),
            shuffle_attempts: default_shuffle_attempts(),
            normalize_words: default_normalize_words(),
            default_set: default_set(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.validate();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reordr")
            .join("config.toml")
    }

    pub fn log_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("reordr")
            .join("reordr.log")
    }

    /// Clamp values a hand-edited file may have pushed out of range.
    pub fn validate(&mut self) {
        self.min_chars = self.min_chars.clamp(1, 500);
        self.min_sentences = self.min_sentences.clamp(2, 50);
        self.max_rounds = self.max_rounds.clamp(2, 100);
        self.shuffle_attempts = self.shuffle_attempts.clamp(1, 64);
        if self.default_set.trim().is_empty() {
            self.default_set = default_set();
        }
    }

    pub fn rules(&self) -> Rules {
        Rules {
            min_chars: self.min_chars,
            min_sentences: self.min_sentences,
            max_rounds: self.max_rounds,
            shuffle_policy: self.shuffle_policy,
            shuffle_attempts: self.shuffle_attempts,
            normalize_words: self.normalize_words,
        }
    }
}
