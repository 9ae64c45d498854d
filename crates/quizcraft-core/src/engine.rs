//! Quiz Attempt Engine.
//!
//! Tracks one participant's pass through one quiz:
//! `Loading → InProgress → Completed`. Nothing leaves `Completed`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::task::JoinHandle;

use crate::error::{EngineError, GatewayError};
use crate::model::{
    Attempt, AttemptDocument, Participant, QuestionDocument, Quiz, QuizId, Selection,
};
use crate::scoring::{answer_records, percentage, score};
use crate::traits::QuizRepository;

/// Lifecycle of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptState {
    Loading,
    InProgress,
    Completed,
}

type PendingRecord = JoinHandle<Result<Attempt, GatewayError>>;

/// Attempt state for one participant taking one quiz.
pub struct AttemptEngine {
    repository: Arc<dyn QuizRepository>,
    participant: Participant,
    state: AttemptState,
    quiz: Option<Quiz>,
    answers: Vec<Selection>,
    pointer: usize,
    /// The in-flight attempt write, kept so a repeated submit joins it.
    pending: Option<PendingRecord>,
    result: Option<Attempt>,
}

impl AttemptEngine {
    pub fn new(repository: Arc<dyn QuizRepository>, participant: Participant) -> Self {
        Self {
            repository,
            participant,
            state: AttemptState::Loading,
            quiz: None,
            answers: Vec::new(),
            pointer: 0,
            pending: None,
            result: None,
        }
    }

    /// Fetch the quiz and start the attempt.
    ///
    /// A missing quiz is reported as `QuizNotFound` and the engine stays in
    /// `Loading`.
    pub async fn load(&mut self, quiz_id: &QuizId) -> Result<(), EngineError> {
        if self.state != AttemptState::Loading {
            return Err(EngineError::NotLoading);
        }
        let document = self.repository.get_quiz(quiz_id).await.map_err(|e| {
            if e.is_not_found() {
                EngineError::QuizNotFound(quiz_id.clone())
            } else {
                EngineError::Gateway(e)
            }
        })?;
        self.start(Quiz {
            id: quiz_id.clone(),
            document,
        })
    }

    /// Start the attempt with a quiz the caller already fetched.
    pub fn start(&mut self, quiz: Quiz) -> Result<(), EngineError> {
        if self.state != AttemptState::Loading {
            return Err(EngineError::NotLoading);
        }
        if quiz.question_count() == 0 {
            return Err(EngineError::EmptyQuiz(quiz.id));
        }
        tracing::debug!(
            quiz = %quiz.id,
            user = %self.participant.user_id,
            questions = quiz.question_count(),
            "attempt started"
        );
        self.answers = vec![Selection::Unanswered; quiz.question_count()];
        self.pointer = 0;
        self.quiz = Some(quiz);
        self.state = AttemptState::InProgress;
        Ok(())
    }

    pub fn state(&self) -> AttemptState {
        self.state
    }

    pub fn participant(&self) -> &Participant {
        &self.participant
    }

    pub fn quiz(&self) -> Option<&Quiz> {
        self.quiz.as_ref()
    }

    /// Index of the question currently displayed.
    pub fn pointer(&self) -> usize {
        self.pointer
    }

    pub fn question_count(&self) -> usize {
        self.answers.len()
    }

    pub fn current_question(&self) -> Option<&QuestionDocument> {
        self.quiz.as_ref()?.questions().get(self.pointer)
    }

    pub fn answers(&self) -> &[Selection] {
        &self.answers
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_answered()).count()
    }

    /// Position-based progress, `(pointer + 1) / total`, as a rounded percentage.
    pub fn progress_percent(&self) -> u32 {
        if self.answers.is_empty() {
            return 0;
        }
        percentage(self.pointer as u32 + 1, self.answers.len() as u32)
    }

    /// The recorded attempt, once submission has succeeded.
    pub fn result(&self) -> Option<&Attempt> {
        self.result.as_ref()
    }

    /// Whether an attempt write is still outstanding from an earlier submit.
    pub fn is_submitting(&self) -> bool {
        self.pending.is_some()
    }

    /// Record `index` as the answer to the current question. Re-answering
    /// overwrites the earlier choice.
    pub fn select_option(&mut self, index: usize) -> Result<(), EngineError> {
        let available = self.current_question_in_progress()?.options.len();
        if index >= available {
            return Err(EngineError::OptionOutOfRange { index, available });
        }
        self.answers[self.pointer] = Selection::Chosen(index);
        Ok(())
    }

    /// Advance the pointer. No-op on the last question.
    pub fn next(&mut self) -> Result<(), EngineError> {
        self.require_in_progress()?;
        if self.pointer + 1 < self.answers.len() {
            self.pointer += 1;
        }
        Ok(())
    }

    /// Step the pointer back. No-op on the first question.
    pub fn previous(&mut self) -> Result<(), EngineError> {
        self.require_in_progress()?;
        self.pointer = self.pointer.saturating_sub(1);
        Ok(())
    }

    /// Move the pointer directly, clamped to the last question.
    pub fn jump_to(&mut self, index: usize) -> Result<(), EngineError> {
        self.require_in_progress()?;
        self.pointer = index.min(self.answers.len() - 1);
        Ok(())
    }

    /// Lowest index still unanswered, if any.
    pub fn first_unanswered(&self) -> Option<usize> {
        self.answers.iter().position(|a| !a.is_answered())
    }

    /// Score the attempt and record it.
    ///
    /// Blocked with `Unanswered { index }` while any question is unanswered;
    /// the state stays `InProgress`. The write runs on a spawned task: if the
    /// caller stops waiting it still commits, and the next `submit` call picks
    /// up that outcome instead of recording a second attempt. A gateway
    /// failure leaves the engine `InProgress` so the user can retry.
    pub async fn submit(&mut self) -> Result<&Attempt, EngineError> {
        self.require_in_progress()?;

        if self.pending.is_none() {
            if let Some(index) = self.first_unanswered() {
                tracing::debug!(index, "submit blocked by unanswered question");
                return Err(EngineError::Unanswered { index });
            }
        } else {
            tracing::debug!("joining in-flight submit");
        }

        let Some(quiz) = self.quiz.as_ref() else {
            return Err(EngineError::NotInProgress);
        };
        let handle = self.pending.get_or_insert_with(|| {
            let document = build_attempt(quiz, &self.participant, &self.answers, Utc::now());
            let repository = Arc::clone(&self.repository);
            tokio::spawn(async move {
                let id = repository.record_attempt(&document).await?;
                Ok(Attempt { id, document })
            })
        });

        let outcome = handle.await;
        self.pending = None;

        match outcome.map_err(GatewayError::from).and_then(|recorded| recorded) {
            Ok(attempt) => {
                tracing::info!(
                    attempt = %attempt.id,
                    quiz = %attempt.document.quiz_id,
                    score = attempt.document.score,
                    total = attempt.document.total_questions,
                    "attempt recorded"
                );
                self.state = AttemptState::Completed;
                Ok(&*self.result.insert(attempt))
            }
            Err(e) => {
                tracing::warn!("submit failed: {e}");
                Err(e.into())
            }
        }
    }

    fn require_in_progress(&self) -> Result<(), EngineError> {
        match self.state {
            AttemptState::InProgress => Ok(()),
            _ => Err(EngineError::NotInProgress),
        }
    }

    fn current_question_in_progress(&self) -> Result<&QuestionDocument, EngineError> {
        self.require_in_progress()?;
        self.current_question().ok_or(EngineError::NotInProgress)
    }
}

/// Snapshot an attempt: score plus one record per question.
pub fn build_attempt(
    quiz: &Quiz,
    participant: &Participant,
    answers: &[Selection],
    completed_at: DateTime<Utc>,
) -> AttemptDocument {
    let questions = quiz.questions();
    AttemptDocument {
        quiz_id: quiz.id.clone(),
        quiz_title: quiz.title().to_string(),
        user_id: participant.user_id.clone(),
        user_display_name: participant.display_name.clone(),
        answers: answer_records(questions, answers),
        score: score(questions, answers),
        total_questions: questions.len() as u32,
        completed_at,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::{OptionDocument, QuizDocument};
    use crate::testing::FakeRepository;

    /// A quiz whose i-th question has its correct option at `correct[i]`.
    fn quiz_document(correct: &[usize]) -> QuizDocument {
        QuizDocument {
            title: "Sample".into(),
            description: String::new(),
            questions: correct
                .iter()
                .enumerate()
                .map(|(n, &c)| QuestionDocument {
                    text: format!("Question {n}"),
                    options: (0..4)
                        .map(|i| OptionDocument {
                            text: format!("Option {i}"),
                            is_correct: i == c,
                        })
                        .collect(),
                })
                .collect(),
            created_by: "author".into(),
            created_at: Utc::now(),
            is_public: true,
        }
    }

    async fn started(correct: &[usize]) -> (Arc<FakeRepository>, AttemptEngine) {
        let repo = Arc::new(FakeRepository::default());
        let id = repo.insert_quiz("quiz-1", quiz_document(correct));
        let mut engine = AttemptEngine::new(repo.clone(), Participant::new("u1", Some("Ada".into())));
        engine.load(&id).await.unwrap();
        (repo, engine)
    }

    fn answer_all(engine: &mut AttemptEngine, picks: &[usize]) {
        for (n, &pick) in picks.iter().enumerate() {
            engine.jump_to(n).unwrap();
            engine.select_option(pick).unwrap();
        }
    }

    #[tokio::test]
    async fn load_initializes_unanswered_slots() {
        let (_repo, engine) = started(&[0, 1, 2]).await;
        assert_eq!(engine.state(), AttemptState::InProgress);
        assert_eq!(engine.pointer(), 0);
        assert_eq!(engine.answers(), &[Selection::Unanswered; 3]);
        assert_eq!(engine.current_question().unwrap().text, "Question 0");
    }

    #[tokio::test]
    async fn missing_quiz_is_not_found_and_stays_loading() {
        let repo = Arc::new(FakeRepository::default());
        let mut engine = AttemptEngine::new(repo, Participant::new("u1", None));
        let err = engine.load(&QuizId::from("missing")).await.unwrap_err();
        assert_eq!(err, EngineError::QuizNotFound(QuizId::from("missing")));
        assert_eq!(engine.state(), AttemptState::Loading);
    }

    #[tokio::test]
    async fn empty_quiz_is_rejected() {
        let repo = Arc::new(FakeRepository::default());
        let id = repo.insert_quiz("empty", quiz_document(&[]));
        let mut engine = AttemptEngine::new(repo, Participant::new("u1", None));
        assert_eq!(
            engine.load(&id).await.unwrap_err(),
            EngineError::EmptyQuiz(id)
        );
    }

    #[tokio::test]
    async fn navigation_is_clamped() {
        let (_repo, mut engine) = started(&[0, 0]).await;
        engine.previous().unwrap();
        assert_eq!(engine.pointer(), 0);
        engine.next().unwrap();
        engine.next().unwrap();
        assert_eq!(engine.pointer(), 1);
        assert_eq!(engine.progress_percent(), 100);
        engine.jump_to(10).unwrap();
        assert_eq!(engine.pointer(), 1);
    }

    #[tokio::test]
    async fn select_overwrites_and_rejects_out_of_range() {
        let (_repo, mut engine) = started(&[0]).await;
        engine.select_option(1).unwrap();
        engine.select_option(3).unwrap();
        assert_eq!(engine.answers(), &[Selection::Chosen(3)]);
        assert_eq!(
            engine.select_option(4),
            Err(EngineError::OptionOutOfRange {
                index: 4,
                available: 4
            })
        );
        assert_eq!(engine.pointer(), 0);
    }

    #[tokio::test]
    async fn single_wrong_answer_scores_zero() {
        let (_repo, mut engine) = started(&[2]).await;
        engine.select_option(1).unwrap();

        let attempt = engine.submit().await.unwrap();
        assert_eq!(attempt.document.score, 0);
        assert_eq!(attempt.document.percentage(), 0);
        assert_eq!(attempt.document.answers[0].correct_option_index, Some(2));
    }

    #[tokio::test]
    async fn two_of_three_rounds_to_67() {
        let (repo, mut engine) = started(&[0, 1, 2]).await;
        answer_all(&mut engine, &[0, 3, 2]);

        let attempt = engine.submit().await.unwrap().clone();
        assert_eq!(attempt.document.score, 2);
        assert_eq!(attempt.document.total_questions, 3);
        assert_eq!(attempt.document.percentage(), 67);
        assert_eq!(attempt.document.user_display_name, "Ada");
        assert_eq!(engine.state(), AttemptState::Completed);
        assert_eq!(repo.attempts(), vec![attempt]);
    }

    #[tokio::test]
    async fn all_correct_is_full_marks() {
        let (_repo, mut engine) = started(&[3, 1, 0, 2]).await;
        answer_all(&mut engine, &[3, 1, 0, 2]);

        let attempt = engine.submit().await.unwrap();
        assert_eq!(attempt.document.score, attempt.document.total_questions);
        assert_eq!(attempt.document.percentage(), 100);
    }

    #[tokio::test]
    async fn unanswered_blocks_submit_with_lowest_index() {
        let (repo, mut engine) = started(&[0, 0]).await;
        engine.select_option(0).unwrap();

        assert_eq!(
            engine.submit().await.unwrap_err(),
            EngineError::Unanswered { index: 1 }
        );
        assert_eq!(engine.state(), AttemptState::InProgress);
        assert_eq!(repo.attempt_writes(), 0);
    }

    #[tokio::test]
    async fn lowest_unanswered_index_wins() {
        let (_repo, mut engine) = started(&[0, 0, 0, 0]).await;
        engine.jump_to(2).unwrap();
        engine.select_option(1).unwrap();
        assert_eq!(
            engine.submit().await.unwrap_err(),
            EngineError::Unanswered { index: 0 }
        );
    }

    #[tokio::test]
    async fn completed_is_terminal() {
        let (repo, mut engine) = started(&[0]).await;
        engine.select_option(0).unwrap();
        engine.submit().await.unwrap();

        assert_eq!(engine.select_option(1), Err(EngineError::NotInProgress));
        assert_eq!(engine.next(), Err(EngineError::NotInProgress));
        assert_eq!(engine.submit().await.unwrap_err(), EngineError::NotInProgress);
        assert_eq!(
            engine.load(&QuizId::from("quiz-1")).await.unwrap_err(),
            EngineError::NotLoading
        );
        assert_eq!(repo.attempt_writes(), 1);
    }

    #[tokio::test]
    async fn failed_submit_stays_in_progress() {
        let (repo, mut engine) = started(&[1]).await;
        engine.select_option(1).unwrap();
        repo.fail_next_writes(1);

        let err = engine.submit().await.unwrap_err();
        assert!(matches!(err, EngineError::Gateway(GatewayError::Storage(_))));
        assert_eq!(engine.state(), AttemptState::InProgress);
        assert!(engine.result().is_none());

        assert_eq!(engine.submit().await.unwrap().document.score, 1);
        assert_eq!(repo.attempt_writes(), 1);
    }

    #[tokio::test]
    async fn abandoned_submit_is_joined_not_repeated() {
        let (repo, mut engine) = started(&[0]).await;
        engine.select_option(0).unwrap();
        repo.set_write_delay(Duration::from_millis(50));

        let abandoned = tokio::time::timeout(Duration::from_millis(5), engine.submit());
        assert!(abandoned.await.is_err());
        assert!(engine.is_submitting());

        engine.submit().await.unwrap();
        assert_eq!(repo.attempt_writes(), 1);
        assert_eq!(engine.state(), AttemptState::Completed);
    }

    #[test]
    fn result_is_a_snapshot() {
        let mut quiz = Quiz {
            id: QuizId::from("q"),
            document: quiz_document(&[0]),
        };
        let participant = Participant::new("u1", None);
        let attempt = build_attempt(&quiz, &participant, &[Selection::Chosen(0)], Utc::now());

        quiz.document.questions[0].options[0].is_correct = false;
        quiz.document.questions[0].text = "changed".into();
        assert!(attempt.answers[0].is_correct);
        assert_eq!(attempt.answers[0].question_text, "Question 0");
        assert_eq!(attempt.score, 1);
    }
}
