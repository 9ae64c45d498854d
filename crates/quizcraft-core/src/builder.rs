//! Quiz Draft Builder.
//!
//! Wraps a [`QuizDraft`] with the repository it publishes to. Structural edits
//! are synchronous; `publish` is the only operation that touches the gateway.

use std::sync::Arc;

use chrono::Utc;
use tokio::task::JoinHandle;

use crate::draft::{Direction, QuizDraft};
use crate::error::{BuilderError, DraftError, GatewayError, ValidationError};
use crate::model::{OptionId, QuestionId, Quiz, QuizId};
use crate::traits::QuizRepository;

type PendingCreate = JoinHandle<Result<Quiz, GatewayError>>;

/// Owns one draft from first edit to publication.
pub struct DraftBuilder {
    repository: Arc<dyn QuizRepository>,
    draft: QuizDraft,
    /// The in-flight create, kept so a repeated publish joins it.
    pending: Option<PendingCreate>,
    published: Option<Quiz>,
}

impl DraftBuilder {
    pub fn new(repository: Arc<dyn QuizRepository>) -> Self {
        Self::with_draft(repository, QuizDraft::new())
    }

    pub fn with_draft(repository: Arc<dyn QuizRepository>, draft: QuizDraft) -> Self {
        Self {
            repository,
            draft,
            pending: None,
            published: None,
        }
    }

    /// Load a published quiz into a fresh draft for re-authoring.
    ///
    /// Publishing the result creates a new quiz; the original is untouched.
    pub async fn edit(
        repository: Arc<dyn QuizRepository>,
        quiz_id: &QuizId,
    ) -> Result<Self, BuilderError> {
        let document = repository.get_quiz(quiz_id).await?;
        tracing::debug!(quiz = %quiz_id, "loaded quiz for editing");
        Ok(Self::with_draft(
            repository,
            QuizDraft::from_document(&document),
        ))
    }

    pub fn draft(&self) -> &QuizDraft {
        &self.draft
    }

    /// The published quiz, once `publish` has succeeded.
    pub fn published(&self) -> Option<&Quiz> {
        self.published.as_ref()
    }

    /// Whether a create is still outstanding from an earlier publish call.
    pub fn is_publishing(&self) -> bool {
        self.pending.is_some()
    }

    pub fn set_title(&mut self, title: &str) {
        self.draft.set_title(title);
    }

    pub fn set_description(&mut self, description: &str) {
        self.draft.set_description(description);
    }

    pub fn add_question(&mut self) -> QuestionId {
        self.draft.add_question()
    }

    pub fn remove_question(&mut self, id: QuestionId) -> Result<(), DraftError> {
        self.draft.remove_question(id)
    }

    pub fn move_question(&mut self, id: QuestionId, direction: Direction) -> Result<(), DraftError> {
        self.draft.move_question(id, direction)
    }

    pub fn update_question_text(&mut self, id: QuestionId, text: &str) -> Result<(), DraftError> {
        self.draft.update_question_text(id, text)
    }

    pub fn update_option_text(
        &mut self,
        question: QuestionId,
        option: OptionId,
        text: &str,
    ) -> Result<(), DraftError> {
        self.draft.update_option_text(question, option, text)
    }

    pub fn set_correct_option(
        &mut self,
        question: QuestionId,
        option: OptionId,
    ) -> Result<(), DraftError> {
        self.draft.set_correct_option(question, option)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.draft.validate()
    }

    /// Validate the draft and write it as a new quiz document.
    ///
    /// The write runs on a spawned task. If the caller stops waiting, the write
    /// still completes, and the next `publish` call picks up its outcome
    /// instead of writing a second document. On gateway failure the builder is
    /// back in its pre-call state and `publish` may simply be called again.
    pub async fn publish(&mut self, created_by: &str, is_public: bool) -> Result<&Quiz, BuilderError> {
        if let Some(quiz) = &self.published {
            return Err(BuilderError::AlreadyPublished(quiz.id.clone()));
        }

        if self.pending.is_none() {
            self.draft.validate()?;
        } else {
            tracing::debug!("joining in-flight publish");
        }

        let handle = self.pending.get_or_insert_with(|| {
            let document = self.draft.to_document(created_by, Utc::now(), is_public);
            let repository = Arc::clone(&self.repository);
            tokio::spawn(async move {
                let id = repository.create_quiz(&document).await?;
                Ok(Quiz { id, document })
            })
        });

        let outcome = handle.await;
        self.pending = None;

        match outcome.map_err(GatewayError::from).and_then(|created| created) {
            Ok(quiz) => {
                tracing::info!(
                    quiz = %quiz.id,
                    questions = quiz.question_count(),
                    backend = self.repository.name(),
                    "quiz published"
                );
                Ok(&*self.published.insert(quiz))
            }
            Err(e) => {
                tracing::warn!("publish failed: {e}");
                Err(e.into())
            }
        }
    }
}
