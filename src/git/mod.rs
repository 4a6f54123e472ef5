pub mod entity;
pub mod executor;
pub mod parser;
pub mod repository;
pub mod state;
pub mod version;

// Re-export commonly used types
pub use entity::{Branch, BranchRef, Commit, CommitRef, Remote, RemoteRef, Tag, TagRef};
pub use executor::{CommandOutput, GitExecutor};
pub use parser::{
    BranchEntry, CommitEntry, CommitInfo, RemoteEntry, StatusMap, TagEntry, parse_branch_list,
    parse_commit_info, parse_commit_porcelain, parse_log, parse_remote_list, parse_status,
    parse_tag_list,
};
pub use repository::{
    ALL_REMOTES, CheckoutOptions, CleanOptions, CommitOptions, OpenOptions, Repository,
};
pub use state::RepositoryState;
pub use version::GitVersion;
