//! Store configuration and factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use quizcraft_core::leaderboard::DEFAULT_LEADERBOARD_SIZE;
use quizcraft_core::traits::QuizRepository;

use crate::json::JsonStore;
use crate::memory::MemoryStore;

/// Environment variable that overrides the JSON store directory.
pub const DATA_DIR_ENV: &str = "QUIZCRAFT_DATA_DIR";

/// Which repository backs the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Documents live only as long as the process.
    Memory,
    /// One JSON file per document under `path`.
    Json {
        #[serde(default = "default_data_dir")]
        path: PathBuf,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Json {
            path: default_data_dir(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./quizcraft-data")
}

/// Top-level quizcraft configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizcraftConfig {
    #[serde(default)]
    pub store: StoreConfig,
    /// Author recorded on published quizzes when `--author` is not given.
    #[serde(default = "default_author")]
    pub default_author: String,
    /// Rows shown by `leaderboard` when `--limit` is not given.
    #[serde(default = "default_leaderboard_size")]
    pub leaderboard_size: usize,
}

fn default_author() -> String {
    "anonymous".to_string()
}
fn default_leaderboard_size() -> usize {
    DEFAULT_LEADERBOARD_SIZE
}

impl Default for QuizcraftConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            default_author: default_author(),
            leaderboard_size: default_leaderboard_size(),
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are copied verbatim and never expanded again. An
/// unterminated `${` is kept as written.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let value = std::env::var(&after[..end]).unwrap_or_default();
                result.push_str(&value);
                rest = &after[end + 1..];
            }
            None => {
                result.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    result.push_str(rest);
    result
}

fn resolve_store_config(config: &StoreConfig) -> StoreConfig {
    match config {
        StoreConfig::Memory => StoreConfig::Memory,
        StoreConfig::Json { path } => StoreConfig::Json {
            path: PathBuf::from(resolve_env_vars(&path.to_string_lossy())),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `quizcraft.toml` in the current directory
/// 2. `~/.config/quizcraft/config.toml`
///
/// `QUIZCRAFT_DATA_DIR` forces a JSON store rooted at that directory.
pub fn load_config() -> Result<QuizcraftConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<QuizcraftConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("quizcraft.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => QuizcraftConfig::default(),
    };

    if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
        if !dir.trim().is_empty() {
            config.store = StoreConfig::Json {
                path: PathBuf::from(dir),
            };
        }
    }

    Ok(config)
}

/// Parse a config document and resolve `${VAR}` references in it.
pub fn parse_config(content: &str) -> Result<QuizcraftConfig> {
    let mut config: QuizcraftConfig = toml::from_str(content)?;
    config.default_author = resolve_env_vars(&config.default_author);
    config.store = resolve_store_config(&config.store);
    if config.default_author.trim().is_empty() {
        config.default_author = default_author();
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("quizcraft"))
}

/// Create a repository instance from its configuration.
pub fn create_store(config: &StoreConfig) -> Arc<dyn QuizRepository> {
    match config {
        StoreConfig::Memory => Arc::new(MemoryStore::new()),
        StoreConfig::Json { path } => Arc::new(JsonStore::new(path.clone())),
    }
}
