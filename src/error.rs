use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// Errors that can occur during git operations
#[derive(Debug, Error)]
pub enum GitError {
    #[error("Not a git repository: {}", .0.display())]
    NotARepository(PathBuf),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported commit hash '{0}': only full 40 character hashes are supported")]
    UnsupportedHash(String),

    /// Carries the tool's stderr exactly as captured
    #[error("Git command failed: {0}")]
    CommandFailed(String),

    #[error("Failed to parse git output: {0}")]
    ParseError(String),

    #[error("Git version {0} is too old. Minimum required: 2.20")]
    GitVersionTooOld(String),

    #[error("Failed to detect git version: {0}")]
    GitVersionDetectionFailed(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl GitError {
    /// True for errors raised before any command ran because an argument or
    /// precondition was rejected
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            GitError::NotARepository(_)
                | GitError::InvalidArgument(_)
                | GitError::FileNotFound(_)
                | GitError::UnsupportedHash(_)
        )
    }
}

/// Top-level error for code that drives both repositories and configuration
///
/// All module errors convert to AppError via the `From` trait.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Git error: {0}")]
    Git(#[from] GitError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for git operations
pub type GitResult<T> = std::result::Result<T, GitError>;

/// Shorthand used throughout the git module
pub type Result<T> = GitResult<T>;

/// Result type for application-level operations
pub type AppResult<T> = std::result::Result<T, AppError>;
