use crate::error::{GitError, GitResult};
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::BTreeMap;

/// Map of file path to porcelain status code
pub type StatusMap = BTreeMap<String, String>;

/// Parse plain `git branch` output
///
/// The active branch is marked with a `* ` prefix, other branches are
/// indented by two spaces. Branches checked out in another worktree carry
/// a `+ ` marker and are not active here.
pub fn parse_branch_list(output: &str) -> GitResult<BTreeMap<String, BranchEntry>> {
    let mut branches = BTreeMap::new();

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }

        let (is_current, name) = match line.strip_prefix("* ") {
            Some(rest) => (true, rest),
            None => (
                false,
                line.strip_prefix("  ")
                    .or_else(|| line.strip_prefix("+ "))
                    .unwrap_or(line),
            ),
        };
        let name = name.trim_end();

        // "(HEAD detached at abc123)" is not a branch
        if name.is_empty() || name.starts_with('(') {
            continue;
        }

        branches.insert(
            name.to_string(),
            BranchEntry {
                name: name.to_string(),
                is_current,
            },
        );
    }

    Ok(branches)
}

/// Parse `git tag` output, one tag per line
pub fn parse_tag_list(output: &str) -> GitResult<BTreeMap<String, TagEntry>> {
    let mut tags = BTreeMap::new();

    for line in output.lines() {
        let name = line.trim();
        if name.is_empty() {
            continue;
        }

        tags.insert(
            name.to_string(),
            TagEntry {
                name: name.to_string(),
            },
        );
    }

    Ok(tags)
}

/// Parse `git remote -v` output
///
/// Format: `<name>\t<url> (fetch)` and `<name>\t<url> (push)`. The two
/// lines of a remote are merged into one entry. URLs may contain spaces.
pub fn parse_remote_list(output: &str) -> GitResult<BTreeMap<String, RemoteEntry>> {
    let mut remotes: BTreeMap<String, RemoteEntry> = BTreeMap::new();

    for line in output.lines() {
        let line = line.trim_end();
        let (rest, is_fetch) = if let Some(rest) = line.strip_suffix(" (fetch)") {
            (rest, true)
        } else if let Some(rest) = line.strip_suffix(" (push)") {
            (rest, false)
        } else {
            continue;
        };

        let Some((name, url)) = rest.split_once(char::is_whitespace) else {
            continue;
        };
        let url = url.trim();
        if name.is_empty() || url.is_empty() {
            continue;
        }

        let entry = remotes
            .entry(name.to_string())
            .or_insert_with(|| RemoteEntry {
                name: name.to_string(),
                fetch_url: None,
                push_url: None,
            });

        if is_fetch {
            entry.fetch_url = Some(url.to_string());
        } else {
            entry.push_url = Some(url.to_string());
        }
    }

    Ok(remotes)
}

/// Parse `git commit --dry-run --porcelain` output
///
/// Columns are fixed: the status code occupies the first three characters
/// and the path starts at column 3. Paths keep any whitespace they have.
pub fn parse_commit_porcelain(output: &str) -> GitResult<StatusMap> {
    let mut changes = StatusMap::new();

    for line in output.lines() {
        let (Some(code), Some(path)) = (line.get(..3), line.get(3..)) else {
            continue;
        };
        if path.is_empty() {
            continue;
        }

        changes.insert(path.to_string(), code.trim().to_string());
    }

    Ok(changes)
}

/// Parse `git status --porcelain` output
///
/// Each line is trimmed and split on its first space: status code before,
/// path after.
pub fn parse_status(output: &str) -> GitResult<StatusMap> {
    let mut entries = StatusMap::new();

    for line in output.lines() {
        let Some((code, path)) = line.trim().split_once(' ') else {
            continue;
        };
        let path = path.trim_start();
        if code.is_empty() || path.is_empty() {
            continue;
        }

        entries.insert(path.to_string(), code.to_string());
    }

    Ok(entries)
}

/// Parse git log output with format %H%x00%s
pub fn parse_log(output: &str) -> GitResult<Vec<CommitEntry>> {
    let mut commits = Vec::new();

    for line in output.lines() {
        if line.is_empty() {
            continue;
        }

        let mut parts = line.split('\0');
        let hash = parts.next().unwrap_or_default();
        let message = parts.next().unwrap_or_default();

        commits.push(CommitEntry {
            hash: hash.to_string(),
            message: message.to_string(),
        });
    }

    Ok(commits)
}

/// Parse git show -s output with format %H%x00%an%x00%ae%x00%aI%x00%s
pub fn parse_commit_info(output: &str) -> GitResult<CommitInfo> {
    let line = output.lines().next().unwrap_or_default();
    let parts: Vec<&str> = line.split('\0').collect();

    if parts.len() < 5 {
        return Err(GitError::ParseError(format!(
            "Expected 5 commit fields, found {}",
            parts.len()
        )));
    }

    let authored_at = DateTime::parse_from_rfc3339(parts[3])
        .map_err(|e| GitError::ParseError(format!("Invalid author date '{}': {}", parts[3], e)))?;

    Ok(CommitInfo {
        hash: parts[0].to_string(),
        author_name: parts[1].to_string(),
        author_email: parts[2].to_string(),
        authored_at,
        subject: parts[4..].join("\0"),
    })
}

/// Represents a branch from git branch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchEntry {
    pub name: String,
    pub is_current: bool,
}

/// Represents a tag from git tag
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagEntry {
    pub name: String,
}

/// Represents a remote from git remote -v
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RemoteEntry {
    pub name: String,
    pub fetch_url: Option<String>,
    pub push_url: Option<String>,
}

/// Represents a commit from git log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitEntry {
    pub hash: String,
    pub message: String,
}

/// Author metadata of a single commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub hash: String,
    pub author_name: String,
    pub author_email: String,
    pub authored_at: DateTime<FixedOffset>,
    pub subject: String,
}
