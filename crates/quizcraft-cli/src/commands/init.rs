//! The `quizcraft init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    if std::path::Path::new("quizcraft.toml").exists() {
        println!("quizcraft.toml already exists, skipping.");
    } else {
        std::fs::write("quizcraft.toml", SAMPLE_CONFIG)?;
        println!("Created quizcraft.toml");
    }

    std::fs::create_dir_all("quizzes")?;
    let example_path = std::path::Path::new("quizzes/example.toml");
    if example_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(example_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Run: quizcraft validate --quiz quizzes/example.toml");
    println!("  2. Run: quizcraft publish --quiz quizzes/example.toml");
    println!("  3. Run: quizcraft take --id <id> --user <your-name>");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# quizcraft configuration

default_author = "${USER}"
leaderboard_size = 10

[store]
type = "json"
path = "./quizcraft-data"
"#;

const EXAMPLE_QUIZ: &str = r#"[quiz]
title = "Rust Basics"
description = "A short warm-up on Rust fundamentals"

[[questions]]
text = "Which keyword declares an immutable binding?"
options = ["let", "mut", "var", "const fn"]
correct = 0

[[questions]]
text = "What does the `?` operator do on an `Err` value?"
options = [
    "Panics",
    "Returns the error from the enclosing function",
    "Ignores it",
    "Converts it to `None`",
]
correct = 1

[[questions]]
text = "Which type owns a growable, heap-allocated string?"
options = ["&str", "char", "String", "Box<str>"]
correct = 2
"#;

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[test]
    fn example_quiz_is_publishable() {
        let draft =
            quizcraft_core::parser::parse_draft_str(EXAMPLE_QUIZ, Path::new("example.toml"))
                .unwrap();
        assert_eq!(draft.question_count(), 3);
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn sample_config_parses() {
        let config = quizcraft_store::config::parse_config(SAMPLE_CONFIG).unwrap();
        assert_eq!(config.leaderboard_size, 10);
    }
}
