//! JSON-directory repository.
//!
//! Layout under the root directory:
//!
//! ```text
//! <root>/quizzes/<id>.json
//! <root>/attempts/<id>.json
//! ```
//!
//! Every write goes to a temporary sibling first and is renamed into place,
//! so a reader never sees a half-written document. An id must be a single
//! plain file name; anything else is reported as `NotFound` and never touches
//! the filesystem.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use futures::future::try_join_all;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use quizcraft_core::error::GatewayError;
use quizcraft_core::model::{
    Attempt, AttemptDocument, AttemptFilter, AttemptId, QuizDocument, QuizFilter, QuizId,
    QuizSummary,
};
use quizcraft_core::traits::QuizRepository;

const QUIZZES_DIR: &str = "quizzes";
const ATTEMPTS_DIR: &str = "attempts";

/// Repository storing one pretty-printed JSON file per document.
#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn quiz_path(&self, id: &QuizId) -> Result<PathBuf, GatewayError> {
        self.document_path(QUIZZES_DIR, id.as_str())
    }

    fn attempt_path(&self, id: &AttemptId) -> Result<PathBuf, GatewayError> {
        self.document_path(ATTEMPTS_DIR, id.as_str())
    }

    fn document_path(&self, collection: &str, id: &str) -> Result<PathBuf, GatewayError> {
        if !is_plain_id(id) {
            tracing::debug!(id, "rejected document id");
            return Err(GatewayError::NotFound(id.to_string()));
        }
        Ok(self.root.join(collection).join(format!("{id}.json")))
    }

    async fn write_document<T: Serialize>(path: &Path, document: &T) -> Result<(), GatewayError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(document)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, path).await?;
        tracing::debug!(path = %path.display(), "wrote document");
        Ok(())
    }

    async fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, GatewayError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Ids (file stems) of every `.json` file in a collection directory.
    async fn collection_ids(&self, collection: &str) -> Result<Vec<String>, GatewayError> {
        let dir = self.root.join(collection);
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                ids.push(stem.to_string());
            }
        }
        ids.sort();
        Ok(ids)
    }
}

/// True when `id` is one normal path component with no separators.
fn is_plain_id(id: &str) -> bool {
    if id.contains(['/', '\\']) {
        return false;
    }
    let mut components = Path::new(id).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

/// Map a missing file to `NotFound` for the given document id.
fn missing_as_not_found<T>(result: std::io::Result<T>, id: &str) -> Result<T, GatewayError> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.kind() == ErrorKind::NotFound => Err(GatewayError::NotFound(id.to_string())),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl QuizRepository for JsonStore {
    fn name(&self) -> &str {
        "json"
    }

    async fn create_quiz(&self, quiz: &QuizDocument) -> Result<QuizId, GatewayError> {
        let id = QuizId::new(Uuid::new_v4().to_string());
        Self::write_document(&self.quiz_path(&id)?, quiz).await?;
        Ok(id)
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<QuizDocument, GatewayError> {
        let path = self.quiz_path(id)?;
        let bytes = missing_as_not_found(tokio::fs::read(path).await, id.as_str())?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn delete_quiz(&self, id: &QuizId) -> Result<(), GatewayError> {
        let path = self.quiz_path(id)?;
        missing_as_not_found(tokio::fs::remove_file(path).await, id.as_str())
    }

    async fn record_attempt(&self, attempt: &AttemptDocument) -> Result<AttemptId, GatewayError> {
        let id = AttemptId::new(Uuid::new_v4().to_string());
        Self::write_document(&self.attempt_path(&id)?, attempt).await?;
        Ok(id)
    }

    async fn list_quizzes(&self, filter: &QuizFilter) -> Result<Vec<QuizSummary>, GatewayError> {
        let ids = self.collection_ids(QUIZZES_DIR).await?;
        let reads = ids.into_iter().map(|id| async move {
            let id = QuizId::new(id);
            let quiz: QuizDocument = Self::read_document(&self.quiz_path(&id)?).await?;
            Ok::<_, GatewayError>((id, quiz))
        });
        let quizzes = try_join_all(reads).await?;

        let mut summaries: Vec<QuizSummary> = quizzes
            .iter()
            .filter(|(_, quiz)| filter.matches(quiz))
            .map(|(id, quiz)| quiz.summary(id))
            .collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(summaries)
    }

    async fn list_attempts(&self, filter: &AttemptFilter) -> Result<Vec<Attempt>, GatewayError> {
        let ids = self.collection_ids(ATTEMPTS_DIR).await?;
        let reads = ids.into_iter().map(|id| async move {
            let id = AttemptId::new(id);
            let document: AttemptDocument = Self::read_document(&self.attempt_path(&id)?).await?;
            Ok::<_, GatewayError>(Attempt { id, document })
        });
        let attempts = try_join_all(reads).await?;

        Ok(attempts
            .into_iter()
            .filter(|attempt| filter.matches(&attempt.document))
            .collect())
    }
}
