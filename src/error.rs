//! # Error Handling
//!
//! This module defines the centralized error type for the `mg` library. It
//! uses the `thiserror` library to create an `Error` enum covering every
//! failure the registry, the legacy importer, the persistence layer and the
//! sync engine can report.
//!
//! ## Key Components
//!
//! - **`Error`**: The main enum. Each variant corresponds to a specific kind of
//!   failure and carries enough context (a path, a line number, the command
//!   that ran) for the CLI to print something actionable.
//!
//! - **`Result<T>`**: A type alias for `std::result::Result<T, Error>`.
//!
//! The variants fall into a few groups:
//!
//! - Registry outcomes the caller is expected to handle: `Duplicate` and
//!   `NotFound`.
//! - Configuration errors that stop a command before it touches anything:
//!   `LegacySyntax`, `InvalidJobCount`, `Config`, `ConfigParse`.
//! - Git failures, reported per repository by the sync engine:
//!   `NotARepository` and `GitCommand`.
//! - Wrapped errors from `std::io`, `serde_json` and `regex`.
//!
//! The library never exits the process or prints; callers decide how each
//! variant maps onto user-facing output and exit codes.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for mg operations
#[derive(Error, Debug)]
pub enum Error {
    /// The path is already tracked by the registry.
    #[error("Repository already registered: {path}")]
    Duplicate { path: String },

    /// The path is not tracked by the registry.
    #[error("Repository not registered: {path}")]
    NotFound { path: String },

    /// The repository cannot be tracked as given.
    #[error("Invalid repository: {message}")]
    InvalidRepository { message: String },

    /// A line of a legacy `.mrconfig` file could not be understood.
    ///
    /// `line` is the 0-based index of the offending line.
    #[error("unexpected argument on line {line}: {content}")]
    LegacySyntax { line: usize, content: String },

    /// The sync engine was asked to run with fewer than one worker.
    #[error("Invalid job count {jobs}: jobs must be greater than 0")]
    InvalidJobCount { jobs: i64 },

    /// The configuration file could not be located or used.
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The registry document at `path` is not valid.
    #[error("Configuration parsing error in {}: {message}", path.display())]
    ConfigParse { path: PathBuf, message: String },

    /// Opening a path found no git repository there.
    #[error("repository does not exist: {}", path.display())]
    NotARepository { path: PathBuf },

    /// An error occurred while executing a Git command.
    #[error("Git command failed for {}: {command} - {stderr}", path.display())]
    GitCommand {
        command: String,
        path: PathBuf,
        stderr: String,
    },

    /// An error indicating that a mutex or other lock has been poisoned.
    #[error("Lock poisoned: {context}")]
    LockPoisoned { context: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A JSON error, wrapped from `serde_json::Error`.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Returns true for the "nothing is registered at this path" outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Returns true when an I/O error says the file does not exist.
    ///
    /// The persistence layer uses this to decide whether to fall back to the
    /// legacy importer.
    pub fn is_missing_file(&self) -> bool {
        matches!(self, Error::Io(e) if e.kind() == std::io::ErrorKind::NotFound)
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
