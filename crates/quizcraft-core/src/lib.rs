//! Quiz authoring, attempt engine, and scoring for quizcraft.
//!
//! This crate defines the data model, the draft builder, the attempt state
//! machine, and the repository trait that the rest of quizcraft builds on.

pub mod builder;
pub mod draft;
pub mod engine;
pub mod error;
pub mod leaderboard;
pub mod model;
pub mod parser;
pub mod scoring;
pub mod traits;
pub mod validation;

#[cfg(test)]
mod testing;

pub use builder::DraftBuilder;
pub use draft::{Direction, QuizDraft};
pub use engine::{AttemptEngine, AttemptState};
pub use error::{BuilderError, DraftError, EngineError, GatewayError, Rule, ValidationError};
pub use traits::QuizRepository;
