//! The editable quiz draft.
//!
//! Questions are addressed by their stable id. A position index is rebuilt
//! after every structural change (add, remove, move), so ids stay attached to
//! the same question no matter where it sits.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::error::{DraftError, ValidationError};
use crate::model::{
    AnswerOption, OptionId, Question, QuestionId, QuizDocument, OPTIONS_PER_QUESTION,
};
use crate::validation;

/// Direction for `QuizDraft::move_question`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// An unpublished quiz. Always holds at least one question.
///
/// Edits never validate; a draft may be transiently invalid until publish.
#[derive(Debug, Clone)]
pub struct QuizDraft {
    title: String,
    description: String,
    questions: Vec<Question>,
    positions: HashMap<QuestionId, usize>,
}

impl Default for QuizDraft {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizDraft {
    /// An untitled draft with one blank question.
    pub fn new() -> Self {
        Self::with_questions(String::new(), String::new(), vec![Question::blank()])
    }

    /// Re-open a published quiz for editing.
    ///
    /// Every question and option receives a fresh id. Option lists are padded
    /// or truncated to four entries.
    pub fn from_document(document: &QuizDocument) -> Self {
        let mut questions: Vec<Question> = document
            .questions
            .iter()
            .map(|q| {
                let mut question = Question::blank();
                question.text = q.text.clone();
                for (slot, option) in question.options.iter_mut().zip(&q.options) {
                    slot.text = option.text.clone();
                    slot.is_correct = option.is_correct;
                }
                question
            })
            .collect();
        if questions.is_empty() {
            questions.push(Question::blank());
        }
        Self::with_questions(
            document.title.clone(),
            document.description.clone(),
            questions,
        )
    }

    fn with_questions(title: String, description: String, questions: Vec<Question>) -> Self {
        let mut draft = Self {
            title,
            description,
            questions,
            positions: HashMap::new(),
        };
        draft.reindex();
        draft
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.position(id).map(|index| &self.questions[index])
    }

    /// Current zero-based position of a question.
    pub fn position(&self, id: QuestionId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    /// Append a blank question and return its id.
    pub fn add_question(&mut self) -> QuestionId {
        let question = Question::blank();
        let id = question.id;
        self.questions.push(question);
        self.reindex();
        tracing::debug!(question = %id, count = self.questions.len(), "question added");
        id
    }

    pub fn remove_question(&mut self, id: QuestionId) -> Result<(), DraftError> {
        if self.questions.len() == 1 {
            return Err(DraftError::CannotRemoveLast);
        }
        let index = self.require(id)?;
        self.questions.remove(index);
        self.reindex();
        tracing::debug!(question = %id, count = self.questions.len(), "question removed");
        Ok(())
    }

    /// Swap a question with its neighbour. At the boundary this does nothing.
    pub fn move_question(&mut self, id: QuestionId, direction: Direction) -> Result<(), DraftError> {
        let index = self.require(id)?;
        let target = match direction {
            Direction::Up => index.checked_sub(1),
            Direction::Down => Some(index + 1).filter(|&i| i < self.questions.len()),
        };
        let Some(target) = target else {
            return Ok(());
        };
        self.questions.swap(index, target);
        self.reindex();
        tracing::debug!(question = %id, from = index, to = target, "question moved");
        Ok(())
    }

    pub fn update_question_text(&mut self, id: QuestionId, text: &str) -> Result<(), DraftError> {
        let index = self.require(id)?;
        self.questions[index].text = text.to_string();
        Ok(())
    }

    pub fn update_option_text(
        &mut self,
        question: QuestionId,
        option: OptionId,
        text: &str,
    ) -> Result<(), DraftError> {
        let slot = self.option_mut(question, option)?;
        slot.text = text.to_string();
        Ok(())
    }

    /// Mark `option` correct and every sibling incorrect.
    pub fn set_correct_option(
        &mut self,
        question: QuestionId,
        option: OptionId,
    ) -> Result<(), DraftError> {
        // Resolve first so an unknown option leaves the flags untouched.
        self.option_mut(question, option)?;
        let index = self.require(question)?;
        for slot in &mut self.questions[index].options {
            slot.is_correct = slot.id == option;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validation::validate(self)
    }

    /// Export the draft content as a publishable document.
    pub fn to_document(
        &self,
        created_by: &str,
        created_at: DateTime<Utc>,
        is_public: bool,
    ) -> QuizDocument {
        QuizDocument {
            title: self.title.clone(),
            description: self.description.clone(),
            questions: self.questions.iter().map(Question::to_document).collect(),
            created_by: created_by.to_string(),
            created_at,
            is_public,
        }
    }

    fn require(&self, id: QuestionId) -> Result<usize, DraftError> {
        self.position(id).ok_or(DraftError::UnknownQuestion(id))
    }

    fn option_mut(
        &mut self,
        question: QuestionId,
        option: OptionId,
    ) -> Result<&mut AnswerOption, DraftError> {
        let index = self.require(question)?;
        self.questions[index]
            .options
            .iter_mut()
            .find(|o| o.id == option)
            .ok_or(DraftError::UnknownOption { question, option })
    }

    fn reindex(&mut self) {
        self.positions = self
            .questions
            .iter()
            .enumerate()
            .map(|(index, q)| (q.id, index))
            .collect();
        debug_assert!(self
            .questions
            .iter()
            .all(|q| q.options.len() == OPTIONS_PER_QUESTION));
    }
}
