//! The `quizcraft leaderboard` command.

use std::path::PathBuf;

use anyhow::Result;

use quizcraft_core::leaderboard::{self, LeaderboardEntry};
use quizcraft_core::model::{AttemptFilter, QuizId};

use super::{open_store, OutputFormat};

pub async fn execute(
    limit: Option<usize>,
    recent: bool,
    quiz: Option<String>,
    user: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let format: OutputFormat = format.parse()?;
    let (config, store) = open_store(config_path)?;
    let limit = limit.unwrap_or(config.leaderboard_size);

    let mut filter = user.map(AttemptFilter::by_user).unwrap_or_default();
    filter.quiz_id = quiz.map(QuizId::new);
    let attempts = store.list_attempts(&filter).await?;

    let entries = if recent {
        leaderboard::recent(&attempts, limit)
    } else {
        leaderboard::top_scorers(&attempts, limit)
    };

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
        OutputFormat::Text if entries.is_empty() => println!("No attempts recorded yet."),
        OutputFormat::Text => print_table(&entries),
    }
    Ok(())
}

fn print_table(entries: &[LeaderboardEntry]) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Player", "Quiz", "Score", "%", "Completed"]);

    for (rank, entry) in entries.iter().enumerate() {
        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.user_display_name),
            Cell::new(&entry.quiz_title),
            Cell::new(format!("{} / {}", entry.score, entry.total_questions)),
            Cell::new(format!("{}%", entry.percentage)),
            Cell::new(entry.completed_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
}
