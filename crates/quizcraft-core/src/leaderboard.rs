//! Leaderboard ranking over recorded attempts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{Attempt, AttemptId, QuizId};

/// Number of rows shown when the caller does not ask for a size.
pub const DEFAULT_LEADERBOARD_SIZE: usize = 10;

/// One ranked row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub attempt_id: AttemptId,
    pub user_id: String,
    pub user_display_name: String,
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub completed_at: DateTime<Utc>,
}

impl From<&Attempt> for LeaderboardEntry {
    fn from(attempt: &Attempt) -> Self {
        let doc = &attempt.document;
        Self {
            attempt_id: attempt.id.clone(),
            user_id: doc.user_id.clone(),
            user_display_name: non_empty_or(&doc.user_display_name, "Anonymous"),
            quiz_id: doc.quiz_id.clone(),
            quiz_title: non_empty_or(&doc.quiz_title, "Unknown Quiz"),
            score: doc.score,
            total_questions: doc.total_questions,
            percentage: doc.percentage(),
            completed_at: doc.completed_at,
        }
    }
}

fn non_empty_or(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Best percentages first; ties go to the more recent attempt.
pub fn top_scorers(attempts: &[Attempt], limit: usize) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = attempts.iter().map(LeaderboardEntry::from).collect();
    entries.sort_by(|a, b| {
        b.percentage
            .cmp(&a.percentage)
            .then_with(|| b.completed_at.cmp(&a.completed_at))
    });
    entries.truncate(limit);
    entries
}

/// Most recently completed attempts first.
pub fn recent(attempts: &[Attempt], limit: usize) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = attempts.iter().map(LeaderboardEntry::from).collect();
    entries.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::model::AttemptDocument;

    fn attempt(id: &str, score: u32, total: u32, minutes_ago: i64) -> Attempt {
        Attempt {
            id: AttemptId::from(id),
            document: AttemptDocument {
                quiz_id: QuizId::from("quiz"),
                quiz_title: String::new(),
                user_id: format!("user-{id}"),
                user_display_name: String::new(),
                answers: vec![],
                score,
                total_questions: total,
                completed_at: Utc::now() - Duration::minutes(minutes_ago),
            },
        }
    }

    fn ids(entries: &[LeaderboardEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.attempt_id.as_str()).collect()
    }

    #[test]
    fn top_scorers_rank_by_percentage_then_recency() {
        let attempts = vec![
            attempt("a", 1, 2, 5),  // 50
            attempt("b", 2, 3, 10), // 67
            attempt("c", 4, 6, 1),  // 67, newer
            attempt("d", 3, 3, 30), // 100
        ];
        assert_eq!(ids(&top_scorers(&attempts, 10)), vec!["d", "c", "b", "a"]);
        assert_eq!(ids(&top_scorers(&attempts, 2)), vec!["d", "c"]);
    }

    #[test]
    fn recent_orders_by_completion_time() {
        let attempts = vec![attempt("a", 0, 1, 5), attempt("b", 1, 1, 1), attempt("c", 1, 1, 9)];
        assert_eq!(ids(&recent(&attempts, DEFAULT_LEADERBOARD_SIZE)), vec!["b", "a", "c"]);
    }

    #[test]
    fn blank_names_get_placeholders() {
        let entry = LeaderboardEntry::from(&attempt("a", 1, 1, 0));
        assert_eq!(entry.user_display_name, "Anonymous");
        assert_eq!(entry.quiz_title, "Unknown Quiz");
        assert_eq!(entry.percentage, 100);
    }
}
