//! TOML quiz authoring files.
//!
//! A file is replayed through the same draft operations an interactive editor
//! would use, so the resulting draft is indistinguishable from a hand-built one.
//! Only the shape is checked here; content rules are left to `validate()`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::draft::QuizDraft;
use crate::model::OPTIONS_PER_QUESTION;

/// Intermediate TOML structure for parsing quiz files.
#[derive(Debug, Deserialize)]
struct TomlQuizFile {
    quiz: TomlQuizHeader,
    #[serde(default)]
    questions: Vec<TomlQuestion>,
}

#[derive(Debug, Deserialize)]
struct TomlQuizHeader {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct TomlQuestion {
    #[serde(default)]
    text: String,
    options: Vec<String>,
    /// Zero-based index of the correct option.
    #[serde(default)]
    correct: Option<usize>,
}

/// Parse a single TOML file into a draft.
pub fn parse_draft(path: &Path) -> Result<QuizDraft> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read quiz file: {}", path.display()))?;

    parse_draft_str(&content, path)
}

/// Parse a TOML string into a draft (useful for testing).
pub fn parse_draft_str(content: &str, source_path: &Path) -> Result<QuizDraft> {
    let parsed: TomlQuizFile = toml::from_str(content)
        .with_context(|| format!("failed to parse TOML: {}", source_path.display()))?;

    let mut draft = QuizDraft::new();
    draft.set_title(&parsed.quiz.title);
    draft.set_description(&parsed.quiz.description);

    for (n, question) in parsed.questions.iter().enumerate() {
        anyhow::ensure!(
            question.options.len() == OPTIONS_PER_QUESTION,
            "{}: question {} has {} options, expected {}",
            source_path.display(),
            n + 1,
            question.options.len(),
            OPTIONS_PER_QUESTION
        );

        // The fresh draft already holds one blank question; fill it first.
        let qid = if n == 0 {
            draft.questions()[0].id
        } else {
            draft.add_question()
        };
        draft.update_question_text(qid, &question.text)?;

        let option_ids: Vec<_> = draft
            .question(qid)
            .map(|q| q.options.iter().map(|o| o.id).collect())
            .unwrap_or_default();
        for (oid, text) in option_ids.iter().zip(&question.options) {
            draft.update_option_text(qid, *oid, text)?;
        }

        if let Some(correct) = question.correct {
            let oid = option_ids.get(correct).with_context(|| {
                format!(
                    "{}: question {} marks option {correct} correct, but options are numbered 0-{}",
                    source_path.display(),
                    n + 1,
                    OPTIONS_PER_QUESTION - 1
                )
            })?;
            draft.set_correct_option(qid, *oid)?;
        }
    }

    Ok(draft)
}

/// Recursively load all `.toml` quiz files from a directory.
///
/// Files that fail to parse are skipped with a warning.
pub fn load_draft_directory(dir: &Path) -> Result<Vec<(PathBuf, QuizDraft)>> {
    let mut drafts = Vec::new();

    if !dir.is_dir() {
        anyhow::bail!("not a directory: {}", dir.display());
    }

    let mut entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory: {}", dir.display()))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    for path in entries {
        if path.is_dir() {
            drafts.extend(load_draft_directory(&path)?);
        } else if path.extension().is_some_and(|ext| ext == "toml") {
            match parse_draft(&path) {
                Ok(draft) => drafts.push((path, draft)),
                Err(e) => {
                    tracing::warn!("skipping {}: {e:#}", path.display());
                }
            }
        }
    }

    Ok(drafts)
}
