//! Subcommand implementations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;

use quizcraft_core::traits::QuizRepository;
use quizcraft_store::config::{create_store, load_config_from, QuizcraftConfig};

pub mod delete;
pub mod init;
pub mod leaderboard;
pub mod list;
pub mod publish;
pub mod take;
pub mod validate;

/// Load the config and build the repository it names.
pub(crate) fn open_store(
    config_path: Option<PathBuf>,
) -> Result<(QuizcraftConfig, Arc<dyn QuizRepository>)> {
    let config = load_config_from(config_path.as_deref())?;
    let store = create_store(&config.store);
    tracing::debug!(store = store.name(), "opened store");
    Ok((config, store))
}

/// Output formats accepted by listing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => anyhow::bail!("unknown format: {other} (expected text or json)"),
        }
    }
}
