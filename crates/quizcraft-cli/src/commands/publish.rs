//! The `quizcraft publish` command.

use std::path::PathBuf;

use anyhow::Result;

use quizcraft_core::builder::DraftBuilder;
use quizcraft_core::parser;

use super::open_store;

pub async fn execute(
    quiz_path: PathBuf,
    author: Option<String>,
    private: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let draft = parser::parse_draft(&quiz_path)?;
    let (config, store) = open_store(config_path)?;
    let author = author.unwrap_or(config.default_author);

    let mut builder = DraftBuilder::with_draft(store, draft);
    let quiz = builder.publish(&author, !private).await?;

    println!(
        "Published \"{}\" ({} questions) as {}",
        quiz.title(),
        quiz.question_count(),
        quiz.id
    );
    Ok(())
}
