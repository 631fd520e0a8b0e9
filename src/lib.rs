//! Pinnote - a small local note pad.
//!
//! This library provides the core functionality for the `pn` CLI tool:
//! the note store and its persistence backends, pinned-first ordering,
//! search, CSV export, and an intent dispatch layer any presenter can drive.

pub mod cli;
pub mod commands;
pub mod config;
pub mod export;
pub mod models;
pub mod storage;

/// Test utilities for isolated test environments.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::path::Path;
    use tempfile::TempDir;

    use crate::storage::{FileBackend, MemoryBackend, NoteStore};

    /// Test environment with an isolated data directory.
    pub struct TestEnv {
        /// Isolated data storage directory
        pub data_dir: TempDir,
    }

    impl TestEnv {
        pub fn new() -> Self {
            Self {
                data_dir: TempDir::new().unwrap(),
            }
        }

        /// Get the path to the isolated data directory.
        pub fn data_path(&self) -> &Path {
            self.data_dir.path()
        }

        /// Open a file-backed store rooted in this environment.
        pub fn file_store(&self) -> NoteStore<FileBackend> {
            NoteStore::new(FileBackend::new(self.data_path()))
        }
    }

    impl Default for TestEnv {
        fn default() -> Self {
            Self::new()
        }
    }

    /// An empty store backed by memory.
    pub fn memory_store() -> NoteStore<MemoryBackend> {
        NoteStore::new(MemoryBackend::new())
    }
}

/// Library-level error type for Pinnote operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed note data: {0}")]
    Parse(String),

    #[error("Note not found: {0}")]
    NotFound(String),

    #[error("No free note id left in a space of {0}")]
    IdSpaceExhausted(u32),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Pinnote operations.
pub type Result<T> = std::result::Result<T, Error>;
