//! Publish-time validation rules.
//!
//! Rules run in a fixed order and stop at the first violation: title, then for
//! each question in order its text, each option's text, and finally the
//! single-correct-option rule.

use crate::draft::QuizDraft;
use crate::error::ValidationError;
use crate::model::Question;

/// Whitespace-only text counts as empty.
pub fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Return the first rule the draft violates.
pub fn validate(draft: &QuizDraft) -> Result<(), ValidationError> {
    if is_blank(draft.title()) {
        return Err(ValidationError::MissingTitle);
    }

    draft
        .questions()
        .iter()
        .enumerate()
        .try_for_each(|(index, question)| validate_question(index, question))
}

fn validate_question(index: usize, question: &Question) -> Result<(), ValidationError> {
    if is_blank(&question.text) {
        return Err(ValidationError::EmptyQuestion { question: index });
    }

    if let Some(option) = question.options.iter().position(|o| is_blank(&o.text)) {
        return Err(ValidationError::EmptyOption {
            question: index,
            option,
        });
    }

    match question.correct_count() {
        1 => Ok(()),
        found => Err(ValidationError::CorrectOptionCount {
            question: index,
            found,
        }),
    }
}
