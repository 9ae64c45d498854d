//! The persistence seam.
//!
//! The builder and the attempt engine receive a `QuizRepository` at
//! construction; `quizcraft-store` provides an in-memory implementation for
//! tests and a JSON-directory one for the CLI.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::model::{
    Attempt, AttemptDocument, AttemptFilter, AttemptId, QuizDocument, QuizFilter, QuizId,
    QuizSummary,
};

/// Document store for published quizzes and recorded attempts.
///
/// Each create is a single atomic document write.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Human-readable backend name (e.g. "memory").
    fn name(&self) -> &str;

    /// Store a published quiz and return its new id.
    async fn create_quiz(&self, quiz: &QuizDocument) -> Result<QuizId, GatewayError>;

    /// Fetch a quiz. Missing ids yield `GatewayError::NotFound`.
    async fn get_quiz(&self, id: &QuizId) -> Result<QuizDocument, GatewayError>;

    /// Delete a quiz. Missing ids yield `GatewayError::NotFound`.
    async fn delete_quiz(&self, id: &QuizId) -> Result<(), GatewayError>;

    /// Store a completed attempt and return its new id.
    async fn record_attempt(&self, attempt: &AttemptDocument) -> Result<AttemptId, GatewayError>;

    /// Quizzes matching `filter`, newest first.
    async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<QuizSummary>, GatewayError>;

    /// Attempts matching `filter`, in no particular order.
    async fn list_attempts(&self, filter: &AttemptFilter) -> Result<Vec<Attempt>, GatewayError>;
}
