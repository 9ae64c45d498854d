//! The `quizcraft delete` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use quizcraft_core::model::QuizId;

use super::open_store;

pub async fn execute(id: String, config_path: Option<PathBuf>) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let id = QuizId::new(id);

    store
        .delete_quiz(&id)
        .await
        .with_context(|| format!("failed to delete quiz {id}"))?;

    println!("Deleted quiz {id}");
    Ok(())
}
