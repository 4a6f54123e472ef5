use crate::error::Result;
use crate::git::entity::{Branch, Commit, Remote, Tag};
use crate::git::parser::{BranchEntry, RemoteEntry, TagEntry};
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Cached collections derived from git output
///
/// Branch, tag and remote listings are replaced wholesale when populated and
/// dropped by the matching `clear_*` call. Commits only ever accumulate.
#[derive(Debug, Default)]
pub struct RepositoryState {
    branches: Option<BTreeMap<String, Branch>>,
    active_branch: Option<String>,
    tags: Option<BTreeMap<String, Tag>>,
    remotes: Option<BTreeMap<String, Remote>>,
    commits: HashMap<String, Commit>,
}

impl RepositoryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn branches(&self) -> Option<&BTreeMap<String, Branch>> {
        self.branches.as_ref()
    }

    /// The active branch recorded when branches were last populated
    pub fn active_branch(&self) -> Option<&Branch> {
        let name = self.active_branch.as_ref()?;
        self.branches.as_ref()?.get(name)
    }

    pub fn set_branches(
        &mut self,
        entries: BTreeMap<String, BranchEntry>,
    ) -> &BTreeMap<String, Branch> {
        trace!(count = entries.len(), "caching branches");
        self.active_branch = entries
            .values()
            .find(|entry| entry.is_current)
            .map(|entry| entry.name.clone());

        let branches = entries
            .into_iter()
            .map(|(name, entry)| (name, Branch::from(entry)))
            .collect();
        self.branches.insert(branches)
    }

    /// Cached branches, running `load` first when nothing is cached
    pub fn branches_or_load<F>(&mut self, load: F) -> Result<&BTreeMap<String, Branch>>
    where
        F: FnOnce() -> Result<BTreeMap<String, BranchEntry>>,
    {
        if self.branches.is_none() {
            self.set_branches(load()?);
        }
        Ok(self.branches.get_or_insert_with(BTreeMap::new))
    }

    pub fn clear_branches(&mut self) {
        trace!("clearing branch cache");
        self.branches = None;
        self.active_branch = None;
    }

    pub fn tags(&self) -> Option<&BTreeMap<String, Tag>> {
        self.tags.as_ref()
    }

    pub fn set_tags(
        &mut self,
        entries: BTreeMap<String, TagEntry>,
    ) -> &BTreeMap<String, Tag> {
        trace!(count = entries.len(), "caching tags");
        let tags = entries
            .into_iter()
            .map(|(name, entry)| (name, Tag::from(entry)))
            .collect();
        self.tags.insert(tags)
    }

    pub fn tags_or_load<F>(&mut self, load: F) -> Result<&BTreeMap<String, Tag>>
    where
        F: FnOnce() -> Result<BTreeMap<String, TagEntry>>,
    {
        if self.tags.is_none() {
            self.set_tags(load()?);
        }
        Ok(self.tags.get_or_insert_with(BTreeMap::new))
    }

    pub fn clear_tags(&mut self) {
        trace!("clearing tag cache");
        self.tags = None;
    }

    pub fn remotes(&self) -> Option<&BTreeMap<String, Remote>> {
        self.remotes.as_ref()
    }

    pub fn set_remotes(
        &mut self,
        entries: BTreeMap<String, RemoteEntry>,
    ) -> &BTreeMap<String, Remote> {
        trace!(count = entries.len(), "caching remotes");
        let remotes = entries
            .into_iter()
            .map(|(name, entry)| (name, Remote::from(entry)))
            .collect();
        self.remotes.insert(remotes)
    }

    pub fn remotes_or_load<F>(&mut self, load: F) -> Result<&BTreeMap<String, Remote>>
    where
        F: FnOnce() -> Result<BTreeMap<String, RemoteEntry>>,
    {
        if self.remotes.is_none() {
            self.set_remotes(load()?);
        }
        Ok(self.remotes.get_or_insert_with(BTreeMap::new))
    }

    pub fn clear_remotes(&mut self) {
        trace!("clearing remote cache");
        self.remotes = None;
    }

    pub fn commit(&self, hash: &str) -> Option<&Commit> {
        self.commits.get(hash)
    }

    /// Record a commit, keeping an existing entry for the same hash
    pub fn insert_commit(&mut self, hash: &str) -> &Commit {
        self.commits
            .entry(hash.to_string())
            .or_insert_with(|| Commit::new(hash.to_string()))
    }

    pub fn commit_count(&self) -> usize {
        self.commits.len()
    }
}
