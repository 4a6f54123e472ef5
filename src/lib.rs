pub mod config;
pub mod error;
pub mod git;
pub mod security;

// Re-export commonly used types for convenience
pub use config::Config;
pub use error::{AppError, GitError, Result};
pub use git::{
    Branch, CheckoutOptions, CleanOptions, Commit, CommitOptions, GitVersion, OpenOptions, Remote,
    Repository, Tag,
};
