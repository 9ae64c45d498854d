//! Quiz and attempt repositories for quizcraft.
//!
//! Implements the `QuizRepository` trait with an in-memory store (for tests
//! and throwaway sessions) and a JSON-directory store (for the CLI).

pub mod config;
pub mod json;
pub mod memory;

pub use config::{create_store, load_config, QuizcraftConfig, StoreConfig};
pub use json::JsonStore;
pub use memory::MemoryStore;
