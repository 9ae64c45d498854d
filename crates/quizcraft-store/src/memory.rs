//! In-memory repository.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use quizcraft_core::error::GatewayError;
use quizcraft_core::model::{
    Attempt, AttemptDocument, AttemptFilter, AttemptId, QuizDocument, QuizFilter, QuizId,
    QuizSummary,
};
use quizcraft_core::traits::QuizRepository;

/// A repository that keeps every document in memory.
///
/// Doubles as a test fixture: it counts writes, and can be told to fail the
/// next few writes or to stall each write for a while.
#[derive(Default)]
pub struct MemoryStore {
    quizzes: Mutex<HashMap<QuizId, QuizDocument>>,
    attempts: Mutex<Vec<Attempt>>,
    /// Number of successful quiz creates.
    quiz_writes: AtomicU32,
    /// Number of successful attempt writes.
    attempt_writes: AtomicU32,
    /// Writes still to be failed.
    failures: AtomicU32,
    /// Artificial latency applied before every write.
    write_delay: Mutex<Duration>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` writes fail with a storage error.
    pub fn fail_next_writes(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Sleep this long before each write.
    pub fn set_write_delay(&self, delay: Duration) {
        *locked(&self.write_delay) = delay;
    }

    pub fn quiz_writes(&self) -> u32 {
        self.quiz_writes.load(Ordering::SeqCst)
    }

    pub fn attempt_writes(&self) -> u32 {
        self.attempt_writes.load(Ordering::SeqCst)
    }

    pub fn quiz_count(&self) -> usize {
        locked(&self.quizzes).len()
    }

    pub fn attempt_count(&self) -> usize {
        locked(&self.attempts).len()
    }

    async fn before_write(&self) -> Result<(), GatewayError> {
        let delay = *locked(&self.write_delay);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let injected = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            tracing::debug!("memory store: injected write failure");
            return Err(GatewayError::Storage("injected write failure".into()));
        }
        Ok(())
    }
}

/// Lock `mutex`, recovering the data if a previous holder panicked.
fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl QuizRepository for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn create_quiz(&self, quiz: &QuizDocument) -> Result<QuizId, GatewayError> {
        self.before_write().await?;
        let id = QuizId::new(Uuid::new_v4().to_string());
        locked(&self.quizzes).insert(id.clone(), quiz.clone());
        self.quiz_writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<QuizDocument, GatewayError> {
        locked(&self.quizzes)
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn delete_quiz(&self, id: &QuizId) -> Result<(), GatewayError> {
        match locked(&self.quizzes).remove(id) {
            Some(_) => Ok(()),
            None => Err(GatewayError::NotFound(id.to_string())),
        }
    }

    async fn record_attempt(&self, attempt: &AttemptDocument) -> Result<AttemptId, GatewayError> {
        self.before_write().await?;
        let id = AttemptId::new(Uuid::new_v4().to_string());
        locked(&self.attempts).push(Attempt {
            id: id.clone(),
            document: attempt.clone(),
        });
        self.attempt_writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<QuizSummary>, GatewayError> {
        let mut summaries: Vec<QuizSummary> = locked(&self.quizzes)
            .iter()
            .filter(|(_, quiz)| filter.matches(quiz))
            .map(|(id, quiz)| quiz.summary(id))
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn list_attempts(&self, filter: &AttemptFilter) -> Result<Vec<Attempt>, GatewayError> {
        Ok(locked(&self.attempts)
            .iter()
            .filter(|attempt| filter.matches(&attempt.document))
            .cloned()
            .collect())
    }
}
