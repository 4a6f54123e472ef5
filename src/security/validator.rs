use crate::error::{GitError, Result};

/// What kind of reference an argument names, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    Branch,
    Tag,
    Remote,
}

impl RefKind {
    fn label(self) -> &'static str {
        match self {
            RefKind::Branch => "branch",
            RefKind::Tag => "tag",
            RefKind::Remote => "remote",
        }
    }
}

/// Check that a branch, tag or remote name can be passed to git as a
/// positional argument
///
/// Arguments never go through a shell, but git itself still parses a
/// leading `-` as an option.
pub fn validate_ref_name(kind: RefKind, name: &str) -> Result<&str> {
    if name.is_empty() {
        return Err(GitError::InvalidArgument(format!(
            "{} name must not be empty",
            kind.label()
        )));
    }

    if name.starts_with('-') {
        return Err(GitError::InvalidArgument(format!(
            "{} name '{}' must not start with '-'",
            kind.label(),
            name
        )));
    }

    if name.contains(['\0', '\n', '\r']) {
        return Err(GitError::InvalidArgument(format!(
            "{} name contains a control character",
            kind.label()
        )));
    }

    Ok(name)
}

/// True when `hash` is a full 40 character hexadecimal object name
pub fn is_full_hash(hash: &str) -> bool {
    hash.len() == 40 && hash.bytes().all(|b| b.is_ascii_hexdigit())
}
