//! In-crate repository double for unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::GatewayError;
use crate::model::{
    Attempt, AttemptDocument, AttemptFilter, AttemptId, QuizDocument, QuizFilter, QuizId,
    QuizSummary,
};
use crate::traits::QuizRepository;

#[derive(Default)]
pub(crate) struct FakeRepository {
    quizzes: Mutex<HashMap<QuizId, QuizDocument>>,
    attempts: Mutex<Vec<Attempt>>,
    quiz_writes: AtomicU32,
    attempt_writes: AtomicU32,
    failures: AtomicU32,
    delay: Mutex<Duration>,
}

impl FakeRepository {
    pub fn fail_next_writes(&self, count: u32) {
        self.failures.store(count, Ordering::SeqCst);
    }

    pub fn set_write_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn quiz_writes(&self) -> u32 {
        self.quiz_writes.load(Ordering::SeqCst)
    }

    pub fn attempt_writes(&self) -> u32 {
        self.attempt_writes.load(Ordering::SeqCst)
    }

    pub fn quiz_count(&self) -> usize {
        self.quizzes.lock().unwrap().len()
    }

    pub fn attempts(&self) -> Vec<Attempt> {
        self.attempts.lock().unwrap().clone()
    }

    pub fn insert_quiz(&self, id: &str, document: QuizDocument) -> QuizId {
        let id = QuizId::from(id);
        self.quizzes.lock().unwrap().insert(id.clone(), document);
        id
    }

    async fn before_write(&self) -> Result<(), GatewayError> {
        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let failing = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(GatewayError::Storage("injected failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl QuizRepository for FakeRepository {
    fn name(&self) -> &str {
        "fake"
    }

    async fn create_quiz(&self, quiz: &QuizDocument) -> Result<QuizId, GatewayError> {
        self.before_write().await?;
        let id = QuizId::new(Uuid::new_v4().to_string());
        self.quizzes.lock().unwrap().insert(id.clone(), quiz.clone());
        self.quiz_writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<QuizDocument, GatewayError> {
        self.quizzes
            .lock()
            .unwrap()
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn delete_quiz(&self, id: &QuizId) -> Result<(), GatewayError> {
        self.quizzes
            .lock()
            .unwrap()
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GatewayError::NotFound(id.to_string()))
    }

    async fn record_attempt(&self, attempt: &AttemptDocument) -> Result<AttemptId, GatewayError> {
        self.before_write().await?;
        let id = AttemptId::new(Uuid::new_v4().to_string());
        self.attempts.lock().unwrap().push(Attempt {
            id: id.clone(),
            document: attempt.clone(),
        });
        self.attempt_writes.fetch_add(1, Ordering::SeqCst);
        Ok(id)
    }

    async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<QuizSummary>, GatewayError> {
        Ok(self
            .quizzes
            .lock()
            .unwrap()
            .iter()
            .filter(|(_, quiz)| filter.matches(quiz))
            .map(|(id, quiz)| quiz.summary(id))
            .collect())
    }

    async fn list_attempts(&self, filter: &AttemptFilter) -> Result<Vec<Attempt>, GatewayError> {
        Ok(self
            .attempts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| filter.matches(&a.document))
            .cloned()
            .collect())
    }
}
