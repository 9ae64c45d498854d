//! Core data model types for quizcraft.
//!
//! Draft-side types (`Question`, `AnswerOption`) carry stable identifiers so the
//! builder can reorder and remove them without confusing one for another.
//! Document-side types mirror the persisted shape field for field and are what
//! the repository reads and writes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scoring::percentage;

/// Every question offers exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Stable identity of a draft question. Never reused or reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(Uuid);

impl QuestionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for QuestionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a draft option. Never reused or reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(Uuid);

impl OptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

document_id!(
    /// Identifier the repository assigned to a published quiz.
    QuizId
);

document_id!(
    /// Identifier the repository assigned to a recorded attempt.
    AttemptId
);

// ---------------------------------------------------------------------------
// Draft entities
// ---------------------------------------------------------------------------

/// One selectable answer of a draft question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
}

impl AnswerOption {
    /// An empty, not-correct option with a fresh id.
    pub fn blank() -> Self {
        Self {
            id: OptionId::new(),
            text: String::new(),
            is_correct: false,
        }
    }
}

/// A draft question. Option order is display order and answer-index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<AnswerOption>,
}

impl Question {
    /// A question with a fresh id, no text, and four blank options.
    pub fn blank() -> Self {
        Self {
            id: QuestionId::new(),
            text: String::new(),
            options: (0..OPTIONS_PER_QUESTION)
                .map(|_| AnswerOption::blank())
                .collect(),
        }
    }

    /// Number of options currently flagged correct.
    pub fn correct_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }

    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| o.id == id)
    }

    pub fn to_document(&self) -> QuestionDocument {
        QuestionDocument {
            text: self.text.clone(),
            options: self
                .options
                .iter()
                .map(|o| OptionDocument {
                    text: o.text.clone(),
                    is_correct: o.is_correct,
                })
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Persisted documents
// ---------------------------------------------------------------------------

/// A published quiz as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDocument {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub questions: Vec<QuestionDocument>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub is_public: bool,
}

fn default_true() -> bool {
    true
}

impl QuizDocument {
    pub fn summary(&self, id: &QuizId) -> QuizSummary {
        QuizSummary {
            id: id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            created_by: self.created_by.clone(),
            created_at: self.created_at,
            question_count: self.questions.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDocument {
    pub text: String,
    pub options: Vec<OptionDocument>,
}

impl QuestionDocument {
    /// Index of the first option flagged correct, if any.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| o.is_correct)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionDocument {
    pub text: String,
    pub is_correct: bool,
}

/// A published quiz together with its repository id.
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub id: QuizId,
    pub document: QuizDocument,
}

impl Quiz {
    pub fn title(&self) -> &str {
        &self.document.title
    }

    pub fn questions(&self) -> &[QuestionDocument] {
        &self.document.questions
    }

    pub fn question_count(&self) -> usize {
        self.document.questions.len()
    }
}

/// An answer slot during an attempt.
///
/// Serialized as `null` when unanswered and as the option index otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<usize>", into = "Option<usize>")]
pub enum Selection {
    #[default]
    Unanswered,
    Chosen(usize),
}

impl Selection {
    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Unanswered => None,
            Selection::Chosen(index) => Some(index),
        }
    }

    pub fn is_answered(self) -> bool {
        matches!(self, Selection::Chosen(_))
    }
}

impl From<Option<usize>> for Selection {
    fn from(index: Option<usize>) -> Self {
        index.map_or(Selection::Unanswered, Selection::Chosen)
    }
}

impl From<Selection> for Option<usize> {
    fn from(selection: Selection) -> Self {
        selection.index()
    }
}

/// Per-question snapshot taken when an attempt is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_text: String,
    pub selected_option_index: Selection,
    pub selected_option_text: String,
    pub correct_option_index: Option<usize>,
    pub is_correct: bool,
}

/// A completed attempt as stored by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptDocument {
    pub quiz_id: QuizId,
    pub quiz_title: String,
    pub user_id: String,
    pub user_display_name: String,
    pub answers: Vec<AnswerRecord>,
    pub score: u32,
    pub total_questions: u32,
    pub completed_at: DateTime<Utc>,
}

impl AttemptDocument {
    /// Rounded percentage for display. Never stored.
    pub fn percentage(&self) -> u32 {
        percentage(self.score, self.total_questions)
    }
}

/// A recorded attempt together with its repository id.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub id: AttemptId,
    pub document: AttemptDocument,
}

/// The user taking a quiz.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub user_id: String,
    pub display_name: String,
}

impl Participant {
    /// Falls back to the user id when no display name is known.
    pub fn new(user_id: impl Into<String>, display_name: Option<String>) -> Self {
        let user_id = user_id.into();
        let display_name = display_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| user_id.clone());
        Self {
            user_id,
            display_name,
        }
    }
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Lightweight listing row for a published quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizSummary {
    pub id: QuizId,
    pub title: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub question_count: usize,
}

/// Selection criteria for `QuizRepository::list_quizzes`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuizFilter {
    /// Only quizzes authored by this user.
    pub created_by: Option<String>,
    /// Only quizzes marked public.
    pub public_only: bool,
    /// Case-insensitive substring of title or description. Blank matches all.
    pub search: Option<String>,
}

impl QuizFilter {
    /// Everything visible on the explore page.
    pub fn public() -> Self {
        Self {
            public_only: true,
            ..Self::default()
        }
    }

    pub fn by_author(author: impl Into<String>) -> Self {
        Self {
            created_by: Some(author.into()),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, query: impl Into<String>) -> Self {
        self.search = Some(query.into());
        self
    }

    pub fn matches(&self, quiz: &QuizDocument) -> bool {
        if self.public_only && !quiz.is_public {
            return false;
        }
        if let Some(author) = &self.created_by {
            if &quiz.created_by != author {
                return false;
            }
        }
        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => {
                let query = query.to_lowercase();
                quiz.title.to_lowercase().contains(&query)
                    || quiz.description.to_lowercase().contains(&query)
            }
        }
    }
}

/// Selection criteria for `QuizRepository::list_attempts`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttemptFilter {
    pub user_id: Option<String>,
    pub quiz_id: Option<QuizId>,
}

impl AttemptFilter {
    pub fn by_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            ..Self::default()
        }
    }

    pub fn matches(&self, attempt: &AttemptDocument) -> bool {
        self.user_id.as_ref().map_or(true, |u| &attempt.user_id == u)
            && self.quiz_id.as_ref().map_or(true, |q| &attempt.quiz_id == q)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn document(title: &str, description: &str, author: &str, public: bool) -> QuizDocument {
        QuizDocument {
            title: title.into(),
            description: description.into(),
            questions: vec![],
            created_by: author.into(),
            created_at: Utc::now(),
            is_public: public,
        }
    }

    #[test]
    fn blank_question_has_four_unmarked_options() {
        let question = Question::blank();
        assert_eq!(question.options.len(), OPTIONS_PER_QUESTION);
        assert_eq!(question.correct_count(), 0);
        assert!(question.options.iter().all(|o| o.text.is_empty()));
    }

    #[test]
    fn blank_questions_get_distinct_ids() {
        let a = Question::blank();
        let b = Question::blank();
        assert_ne!(a.id, b.id);
        assert_ne!(a.options[0].id, b.options[0].id);
    }

    #[test]
    fn selection_serializes_as_nullable_index() {
        assert_eq!(serde_json::to_string(&Selection::Chosen(2)).unwrap(), "2");
        assert_eq!(serde_json::to_string(&Selection::Unanswered).unwrap(), "null");
        let parsed: Selection = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, Selection::Unanswered);
    }

    #[test]
    fn quiz_document_uses_camel_case() {
        let json = serde_json::to_value(document("T", "D", "alice", true)).unwrap();
        assert!(json.get("createdBy").is_some());
        assert!(json.get("isPublic").is_some());
        assert!(json.get("created_by").is_none());
    }

    #[test]
    fn filter_search_is_case_insensitive() {
        let quiz = document("Rust Ownership", "Borrowing basics", "alice", true);
        assert!(QuizFilter::public().with_search("ownership").matches(&quiz));
        assert!(QuizFilter::public().with_search("BORROW").matches(&quiz));
        assert!(QuizFilter::public().with_search("   ").matches(&quiz));
        assert!(!QuizFilter::public().with_search("python").matches(&quiz));
    }

    #[test]
    fn filter_respects_visibility_and_author() {
        let private = document("Secret", "", "bob", false);
        assert!(!QuizFilter::public().matches(&private));
        assert!(QuizFilter::by_author("bob").matches(&private));
        assert!(!QuizFilter::by_author("alice").matches(&private));
    }

    #[test]
    fn participant_falls_back_to_user_id() {
        assert_eq!(Participant::new("u1", None).display_name, "u1");
        assert_eq!(Participant::new("u1", Some(" ".into())).display_name, "u1");
        assert_eq!(
            Participant::new("u1", Some("Ada".into())).display_name,
            "Ada"
        );
    }
}
