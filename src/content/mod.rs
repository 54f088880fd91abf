use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::engine::tokenize::Granularity;
use crate::error::ContentError;

#[derive(Embed)]
#[folder = "assets/sets/"]
struct SetAssets;

/// Texts to play, one round each, cut at one granularity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSet {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub granularity: Granularity,
    pub texts: Vec<String>,
}

impl RoundSet {
    pub fn from_text(text: &str, granularity: Granularity) -> Self {
        Self {
            name: "custom".to_string(),
            granularity,
            texts: vec![text.to_string()],
        }
    }

    /// Splits `a | b | c` into one phrase per round.
    pub fn from_phrase_list(list: &str, granularity: Granularity) -> Self {
        Self {
            name: "custom".to_string(),
            granularity,
            texts: list.split('|').map(|p| p.trim().to_string()).collect(),
        }
    }

    pub fn bundled(name: &str) -> Option<Self> {
        let file = SetAssets::get(&format!("{name}.toml"))?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        match Self::parse(content, "toml", name) {
            Ok(set) => Some(set),
            Err(err) => {
                warn!(set = name, %err, "bundled round set is invalid");
                None
            }
        }
    }

    pub fn bundled_names() -> Vec<String> {
        let mut names: Vec<String> = SetAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(str::to_string))
            .collect();
        names.sort();
        names
    }

    /// `<config_dir>/reordr/sets`
    pub fn user_dir() -> Option<PathBuf> {
        Some(dirs::config_dir()?.join("reordr").join("sets"))
    }

    pub fn load_path(path: &Path) -> Result<Self, ContentError> {
        let content = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("custom");
        Self::parse(&content, ext, stem)
    }

    /// Parses a set in the format named by `ext`; an unnamed set takes
    /// `fallback_name`.
    pub fn parse(content: &str, ext: &str, fallback_name: &str) -> Result<Self, ContentError> {
        let mut set: RoundSet = match ext {
            "toml" => toml::from_str(content)?,
            "json" => serde_json::from_str(content)?,
            other => return Err(ContentError::UnknownFormat(other.to_string())),
        };
        if set.name.trim().is_empty() {
            set.name = fallback_name.to_string();
        }
        if set.texts.iter().all(|t| t.trim().is_empty()) {
            return Err(ContentError::NoTexts(set.name));
        }
        Ok(set)
    }

    /// Finds a set by file path, then by name in `user_dir`, then among the
    /// bundled sets.
    pub fn resolve(query: &str, user_dir: Option<&Path>) -> Result<Self, ContentError> {
        let path = Path::new(query);
        if path.is_file() {
            debug!(path = %path.display(), "loading round set from path");
            return Self::load_path(path);
        }
        if let Some(dir) = user_dir {
            for ext in ["toml", "json"] {
                let candidate = dir.join(format!("{query}.{ext}"));
                if candidate.is_file() {
                    debug!(path = %candidate.display(), "loading user round set");
                    return Self::load_path(&candidate);
                }
            }
        }
        Self::bundled(query).ok_or_else(|| ContentError::NotFound(query.to_string()))
    }

    /// Names of every set `resolve` can find by name, user sets first.
    pub fn available(user_dir: Option<&Path>) -> Vec<String> {
        let mut names = Vec::new();
        if let Some(entries) = user_dir.and_then(|d| fs::read_dir(d).ok()) {
            let mut user: Vec<String> = entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| matches!(p.extension().and_then(|e| e.to_str()), Some("toml" | "json")))
                .filter_map(|p| p.file_stem().and_then(|s| s.to_str()).map(str::to_string))
                .collect();
            user.sort();
            names.extend(user);
        }
        for name in Self::bundled_names() {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
