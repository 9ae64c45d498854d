//! The `quizcraft list` command.

use std::path::PathBuf;

use anyhow::Result;

use quizcraft_core::model::{QuizFilter, QuizSummary};

use super::{open_store, OutputFormat};

pub async fn execute(
    author: Option<String>,
    search: Option<String>,
    all: bool,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let (_, store) = open_store(config_path)?;

    let mut filter = match author {
        Some(author) => QuizFilter::by_author(author),
        None if all => QuizFilter::default(),
        None => QuizFilter::public(),
    };
    if let Some(search) = search {
        filter = filter.with_search(search);
    }

    let quizzes = store.list_quizzes(&filter).await?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&quizzes)?),
        OutputFormat::Text if quizzes.is_empty() => println!("No quizzes found."),
        OutputFormat::Text => print_table(&quizzes),
    }
    Ok(())
}

fn print_table(quizzes: &[QuizSummary]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["Id", "Title", "Questions", "Author", "Created"]);

    for quiz in quizzes {
        table.add_row(vec![
            Cell::new(&quiz.id),
            Cell::new(&quiz.title),
            Cell::new(quiz.question_count),
            Cell::new(&quiz.created_by),
            Cell::new(quiz.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
}
