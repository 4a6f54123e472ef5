//! Lightweight handles for branches, tags, remotes and commits.
//!
//! Each handle only carries its identifier. Operations go back through the
//! owning [`Repository`], which is passed in explicitly.

use crate::error::Result;
use crate::git::parser::{BranchEntry, CommitInfo, RemoteEntry, TagEntry};
use crate::git::repository::{CheckoutOptions, Repository};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Branch {
    name: String,
    is_active: bool,
}

impl Branch {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn checkout(&self, repo: &mut Repository) -> Result<()> {
        repo.checkout(self, CheckoutOptions::default())
    }

    pub fn delete(&self, repo: &mut Repository, force: bool) -> Result<()> {
        repo.delete_branch(self, force)
    }

    /// Push this branch to `remote`, or to the default remote
    pub fn push(&self, repo: &mut Repository, remote: Option<&str>, force: bool) -> Result<()> {
        let remote = match remote {
            Some(remote) => remote.to_string(),
            None => repo.default_remote().to_string(),
        };
        repo.push(remote.as_str(), Some(BranchRef::from(self)), force)
    }
}

impl From<BranchEntry> for Branch {
    fn from(entry: BranchEntry) -> Self {
        Branch {
            name: entry.name,
            is_active: entry.is_current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    name: String,
}

impl Tag {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns false when the tag was already gone
    pub fn remove(&self, repo: &mut Repository) -> Result<bool> {
        repo.remove_tag(self)
    }
}

impl From<TagEntry> for Tag {
    fn from(entry: TagEntry) -> Self {
        Tag { name: entry.name }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Remote {
    name: String,
    fetch_url: Option<String>,
    push_url: Option<String>,
}

impl Remote {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fetch_url(&self) -> Option<&str> {
        self.fetch_url.as_deref()
    }

    pub fn push_url(&self) -> Option<&str> {
        self.push_url.as_deref()
    }

    pub fn fetch(&self, repo: &mut Repository) -> Result<()> {
        repo.fetch(self)
    }

    pub fn push(&self, repo: &mut Repository, branch: Option<&str>, force: bool) -> Result<()> {
        repo.push(self, branch.map(BranchRef::from), force)
    }
}

impl From<RemoteEntry> for Remote {
    fn from(entry: RemoteEntry) -> Self {
        Remote {
            name: entry.name,
            fetch_url: entry.fetch_url,
            push_url: entry.push_url,
        }
    }
}

/// A commit known to exist in its repository, addressed by full hash
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Commit {
    hash: String,
}

impl Commit {
    pub(crate) fn new(hash: String) -> Self {
        Commit { hash }
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn info(&self, repo: &Repository) -> Result<CommitInfo> {
        repo.commit_info(self)
    }

    /// Tag this commit, annotated when a message is given
    pub fn tag(&self, repo: &mut Repository, name: &str, message: Option<&str>) -> Result<()> {
        repo.add_tag(name, message, Some(CommitRef::from(self)))
    }
}

impl fmt::Display for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash)
    }
}

/// A branch given either by name or by handle
#[derive(Debug, Clone, Copy)]
pub enum BranchRef<'a> {
    Name(&'a str),
    Branch(&'a Branch),
}

impl BranchRef<'_> {
    pub fn name(&self) -> &str {
        match self {
            BranchRef::Name(name) => name,
            BranchRef::Branch(branch) => branch.name(),
        }
    }
}

/// A tag given either by name or by handle
#[derive(Debug, Clone, Copy)]
pub enum TagRef<'a> {
    Name(&'a str),
    Tag(&'a Tag),
}

impl TagRef<'_> {
    pub fn name(&self) -> &str {
        match self {
            TagRef::Name(name) => name,
            TagRef::Tag(tag) => tag.name(),
        }
    }
}

/// A remote given either by name or by handle
#[derive(Debug, Clone, Copy)]
pub enum RemoteRef<'a> {
    Name(&'a str),
    Remote(&'a Remote),
}

impl RemoteRef<'_> {
    pub fn name(&self) -> &str {
        match self {
            RemoteRef::Name(name) => name,
            RemoteRef::Remote(remote) => remote.name(),
        }
    }
}

/// A commit given either by hash or by handle
#[derive(Debug, Clone, Copy)]
pub enum CommitRef<'a> {
    Hash(&'a str),
    Commit(&'a Commit),
}

impl CommitRef<'_> {
    pub fn hash(&self) -> &str {
        match self {
            CommitRef::Hash(hash) => hash,
            CommitRef::Commit(commit) => commit.hash(),
        }
    }
}

macro_rules! impl_ref_from {
    ($target:ident, $by_name:ident, $entity:ident, $by_entity:ident) => {
        impl<'a> From<&'a str> for $target<'a> {
            fn from(value: &'a str) -> Self {
                $target::$by_name(value)
            }
        }

        impl<'a> From<&'a String> for $target<'a> {
            fn from(value: &'a String) -> Self {
                $target::$by_name(value.as_str())
            }
        }

        impl<'a> From<&'a $entity> for $target<'a> {
            fn from(value: &'a $entity) -> Self {
                $target::$by_entity(value)
            }
        }
    };
}

impl_ref_from!(BranchRef, Name, Branch, Branch);
impl_ref_from!(TagRef, Name, Tag, Tag);
impl_ref_from!(RemoteRef, Name, Remote, Remote);
impl_ref_from!(CommitRef, Hash, Commit, Commit);
