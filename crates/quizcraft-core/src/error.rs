//! Error types for the draft builder, the attempt engine, and the repository.
//!
//! Defined in `quizcraft-core` so presentation code can match on the exact
//! rule or index that blocked an action without string matching.

use thiserror::Error;

use crate::model::{OptionId, QuestionId, QuizId};

/// Which validation rule a draft violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Title,
    QuestionText,
    OptionText,
    CorrectOption,
}

/// The first rule a draft violates. Indices are zero-based positions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("quiz title is empty")]
    MissingTitle,

    #[error("question {} has no text", .question + 1)]
    EmptyQuestion { question: usize },

    #[error("option {} of question {} has no text", .option + 1, .question + 1)]
    EmptyOption { question: usize, option: usize },

    #[error("question {} must have exactly one correct option, found {found}", .question + 1)]
    CorrectOptionCount { question: usize, found: usize },
}

impl ValidationError {
    pub fn rule(&self) -> Rule {
        match self {
            ValidationError::MissingTitle => Rule::Title,
            ValidationError::EmptyQuestion { .. } => Rule::QuestionText,
            ValidationError::EmptyOption { .. } => Rule::OptionText,
            ValidationError::CorrectOptionCount { .. } => Rule::CorrectOption,
        }
    }

    /// Position of the offending question, if the rule is question-scoped.
    pub fn question(&self) -> Option<usize> {
        match self {
            ValidationError::MissingTitle => None,
            ValidationError::EmptyQuestion { question }
            | ValidationError::EmptyOption { question, .. }
            | ValidationError::CorrectOptionCount { question, .. } => Some(*question),
        }
    }
}

/// Structural edits the draft refused. The draft is left unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("a quiz must have at least one question")]
    CannotRemoveLast,

    #[error("no question with id {0}")]
    UnknownQuestion(QuestionId),

    #[error("question {question} has no option with id {option}")]
    UnknownOption {
        question: QuestionId,
        option: OptionId,
    },
}

/// Failures reported by a `QuizRepository`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    /// The background write task panicked or was aborted.
    #[error("write task interrupted: {0}")]
    Interrupted(String),
}

impl GatewayError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for GatewayError {
    fn from(err: std::io::Error) -> Self {
        GatewayError::Storage(err.to_string())
    }
}

impl From<tokio::task::JoinError> for GatewayError {
    fn from(err: tokio::task::JoinError) -> Self {
        GatewayError::Interrupted(err.to_string())
    }
}

/// Errors from `DraftBuilder`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuilderError {
    #[error(transparent)]
    Draft(#[from] DraftError),

    #[error("quiz is not ready to publish: {0}")]
    Invalid(#[from] ValidationError),

    #[error("draft was already published as {0}")]
    AlreadyPublished(QuizId),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// Errors from `AttemptEngine`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("attempt has already been loaded")]
    NotLoading,

    #[error("attempt is not in progress")]
    NotInProgress,

    #[error("quiz not found: {0}")]
    QuizNotFound(QuizId),

    #[error("quiz {0} has no questions")]
    EmptyQuiz(QuizId),

    #[error("option {index} is out of range ({available} options)")]
    OptionOutOfRange { index: usize, available: usize },

    /// Submission blocked; `index` is the lowest unanswered question.
    #[error("question {} has not been answered", .index + 1)]
    Unanswered { index: usize },

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_use_one_based_positions() {
        let err = ValidationError::EmptyOption {
            question: 0,
            option: 2,
        };
        assert_eq!(err.to_string(), "option 3 of question 1 has no text");
        assert_eq!(
            EngineError::Unanswered { index: 1 }.to_string(),
            "question 2 has not been answered"
        );
    }

    #[test]
    fn rule_and_question_accessors() {
        let err = ValidationError::CorrectOptionCount {
            question: 4,
            found: 0,
        };
        assert_eq!(err.rule(), Rule::CorrectOption);
        assert_eq!(err.question(), Some(4));
        assert_eq!(ValidationError::MissingTitle.question(), None);
    }
}
