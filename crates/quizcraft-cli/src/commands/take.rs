//! The `quizcraft take` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizcraft_core::engine::AttemptEngine;
use quizcraft_core::error::EngineError;
use quizcraft_core::model::{Attempt, Participant, QuizId};

use super::open_store;

pub async fn execute(
    id: String,
    user: String,
    name: Option<String>,
    answers: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (_, store) = open_store(config_path)?;
    let mut engine = AttemptEngine::new(store, Participant::new(user, name));
    engine.load(&QuizId::new(id)).await?;

    let attempt = match answers {
        Some(list) => {
            let choices = parse_answers(&list)?;
            answer_all(&mut engine, &choices)?;
            Some(engine.submit().await?.clone())
        }
        None => {
            let stdin = std::io::stdin();
            run_session(&mut engine, stdin.lock(), std::io::stdout()).await?
        }
    };

    match attempt {
        Some(attempt) => {
            let doc = &attempt.document;
            println!(
                "Score: {} / {} ({}%)",
                doc.score,
                doc.total_questions,
                doc.percentage()
            );
            println!("Attempt recorded as {}", attempt.id);
        }
        None => println!("Attempt abandoned; nothing recorded."),
    }
    Ok(())
}

/// Parse a comma-separated list of zero-based option indices.
fn parse_answers(list: &str) -> Result<Vec<usize>> {
    list.split(',')
        .map(str::trim)
        .enumerate()
        .map(|(n, part)| {
            part.parse::<usize>()
                .with_context(|| format!("answer {} is not an option index: {part:?}", n + 1))
        })
        .collect()
}

/// Answer every question in order from `choices`.
fn answer_all(engine: &mut AttemptEngine, choices: &[usize]) -> Result<()> {
    let expected = engine.question_count();
    anyhow::ensure!(
        choices.len() == expected,
        "expected {expected} answers, got {}",
        choices.len()
    );
    for (index, choice) in choices.iter().enumerate() {
        engine.jump_to(index)?;
        engine
            .select_option(*choice)
            .with_context(|| format!("question {}", index + 1))?;
    }
    Ok(())
}

/// Drive the engine from line-based commands.
///
/// Returns the recorded attempt, or `None` when the user quits or input ends
/// before a successful submit.
pub(crate) async fn run_session<R: BufRead, W: Write>(
    engine: &mut AttemptEngine,
    input: R,
    mut out: W,
) -> Result<Option<Attempt>> {
    show_question(engine, &mut out)?;

    for line in input.lines() {
        let line = line?;
        match line.trim() {
            "" => continue,
            "n" => engine.next()?,
            "p" => engine.previous()?,
            "q" => {
                writeln!(out, "Quitting without submitting.")?;
                return Ok(None);
            }
            "s" => {
                let submitted = engine.submit().await.map(Attempt::clone);
                match submitted {
                    Ok(attempt) => return Ok(Some(attempt)),
                    Err(EngineError::Unanswered { index }) => {
                        writeln!(out, "Question {} is still unanswered.", index + 1)?;
                        engine.jump_to(index)?;
                    }
                    Err(EngineError::Gateway(e)) => {
                        writeln!(out, "Could not record the attempt ({e}). Press s to retry.")?;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            other => match other.parse::<usize>() {
                Ok(choice) if choice >= 1 => {
                    if let Err(e) = engine.select_option(choice - 1) {
                        writeln!(out, "{e}")?;
                    }
                }
                _ => writeln!(out, "Unknown command: {other}")?,
            },
        }
        show_question(engine, &mut out)?;
    }

    Ok(None)
}

fn show_question<W: Write>(engine: &AttemptEngine, out: &mut W) -> Result<()> {
    let Some(question) = engine.current_question() else {
        return Ok(());
    };
    let pointer = engine.pointer();
    let selected = engine.answers()[pointer].index();

    writeln!(
        out,
        "\nQuestion {}/{} [{}%] ({} answered)",
        pointer + 1,
        engine.question_count(),
        engine.progress_percent(),
        engine.answered_count()
    )?;
    writeln!(out, "{}", question.text)?;
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i) { "*" } else { " " };
        writeln!(out, " {marker} {}) {}", i + 1, option.text)?;
    }
    writeln!(out, "[1-{}] select, n next, p previous, s submit, q quit", question.options.len())?;
    Ok(())
}
