//! The `quizcraft validate` command.

use std::path::PathBuf;

use anyhow::Result;

pub fn execute(quiz_path: PathBuf) -> Result<()> {
    let drafts = if quiz_path.is_dir() {
        quizcraft_core::parser::load_draft_directory(&quiz_path)?
    } else {
        let draft = quizcraft_core::parser::parse_draft(&quiz_path)?;
        vec![(quiz_path, draft)]
    };

    let mut invalid = 0;

    for (path, draft) in &drafts {
        println!(
            "Quiz: {} ({} questions) [{}]",
            display_title(draft.title()),
            draft.question_count(),
            path.display()
        );
        if let Err(e) = draft.validate() {
            println!("  INVALID: {e}");
            invalid += 1;
        }
    }

    if invalid == 0 {
        println!("All quizzes valid.");
        Ok(())
    } else {
        anyhow::bail!("{invalid} of {} quiz(zes) invalid", drafts.len())
    }
}

fn display_title(title: &str) -> &str {
    if title.trim().is_empty() {
        "(untitled)"
    } else {
        title
    }
}
