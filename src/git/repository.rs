use crate::config::Config;
use crate::error::{GitError, Result};
use crate::git::entity::{Branch, BranchRef, Commit, CommitRef, Remote, RemoteRef, Tag, TagRef};
use crate::git::executor::GitExecutor;
use crate::git::parser::{self, CommitEntry, CommitInfo, StatusMap};
use crate::git::state::RepositoryState;
use crate::git::version::GitVersion;
use crate::security::{RefKind, is_full_hash, validate_ref_name};
use std::collections::BTreeMap;
use std::env;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Remote name that stands for every configured remote in [`Repository::fetch`]
pub const ALL_REMOTES: &str = "*";

/// What to do when the target of [`Repository::open_with`] is incomplete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenOptions {
    /// Create the directory when it does not exist
    pub create: bool,
    /// Run `git init` when the directory has no `.git`
    pub init: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// Stage every modified tracked file first (`-a`)
    pub all: bool,
    pub amend: bool,
    pub message: Option<String>,
    /// `"Name <email>"`
    pub author: Option<String>,
}

impl CommitOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message<S: Into<String>>(mut self, message: S) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn author<S: Into<String>>(mut self, author: S) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn all(mut self, all: bool) -> Self {
        self.all = all;
        self
    }

    pub fn amend(mut self, amend: bool) -> Self {
        self.amend = amend;
        self
    }

    fn flags(&self) -> Vec<String> {
        let mut flags = Vec::new();
        if self.all {
            flags.push("-a".to_string());
        }
        if self.amend {
            flags.push("--amend".to_string());
        }
        match &self.message {
            Some(message) => {
                flags.push("-m".to_string());
                flags.push(message.clone());
            }
            // Never open an editor
            None => flags.push("--no-edit".to_string()),
        }
        if let Some(author) = &self.author {
            flags.push(format!("--author={}", author));
        }
        flags
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CheckoutOptions {
    /// Create the branch when it does not exist yet
    pub create: bool,
    /// Discard local changes
    pub force: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CleanOptions {
    /// Also remove untracked directories
    pub directories: bool,
    pub force: bool,
}

/// A git working tree driven through the git command line
///
/// Branch, tag and remote listings are cached after the first query.
/// Operations that change them drop the affected cache, so the next query
/// asks git again.
#[derive(Debug)]
pub struct Repository {
    path: PathBuf,
    config: Config,
    executor: GitExecutor,
    state: RepositoryState,
}

impl Repository {
    /// Detect git repository from current working directory
    pub fn discover() -> Result<Self> {
        let current_dir = env::current_dir()?;

        Self::discover_from(&current_dir)
    }

    /// Detect git repository starting from a specific directory
    pub fn discover_from<P: AsRef<Path>>(start_path: P) -> Result<Self> {
        let start = start_path.as_ref();
        let mut current = start.to_path_buf();

        loop {
            if current.join(".git").exists() {
                return Self::open(&current);
            }

            // Move up to parent directory
            if !current.pop() {
                return Err(GitError::NotARepository(start.to_path_buf()));
            }
        }
    }

    /// Open an existing repository with the default configuration
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with(path, OpenOptions::default(), Config::default_config())
    }

    /// Create the directory if needed and initialize a repository in it
    pub fn init_at<P: AsRef<Path>>(path: P) -> Result<Self> {
        let options = OpenOptions {
            create: true,
            init: true,
        };
        Self::open_with(path, options, Config::default_config())
    }

    pub fn open_with<P: AsRef<Path>>(
        path: P,
        options: OpenOptions,
        config: Config,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| GitError::InvalidArgument(e.to_string()))?;

        let path = path.as_ref();
        if !path.exists() {
            if !options.create {
                return Err(GitError::InvalidArgument(format!(
                    "{} does not exist",
                    path.display()
                )));
            }
            debug!(path = %path.display(), "creating repository directory");
            fs::create_dir_all(path)?;
        }

        let path = path.canonicalize()?;
        if !path.is_dir() {
            return Err(GitError::InvalidArgument(format!(
                "{} is not a directory",
                path.display()
            )));
        }

        let executor = GitExecutor::with_program(&path, config.git.executable.clone());
        let mut repo = Self {
            path,
            config,
            executor,
            state: RepositoryState::new(),
        };

        if !repo.is_initialized() {
            if !options.init {
                return Err(GitError::NotARepository(repo.path));
            }
            repo.init()?;
        }

        Ok(repo)
    }

    /// Clone a local repository into `path` and open the result
    pub fn clone_from<S, P>(source: S, path: P, config: Config) -> Result<Self>
    where
        S: AsRef<Path>,
        P: AsRef<Path>,
    {
        let source = std::path::absolute(source.as_ref())?;
        Self::clone_into(&["--local"], source.as_os_str(), path.as_ref(), config)
    }

    /// Clone a remote URL into `path` and open the result
    pub fn clone_remote<P: AsRef<Path>>(url: &str, path: P, config: Config) -> Result<Self> {
        Self::clone_into(&[], OsStr::new(url), path.as_ref(), config)
    }

    fn clone_into(flags: &[&str], source: &OsStr, path: &Path, config: Config) -> Result<Self> {
        fs::create_dir_all(path)?;
        let path = path.canonicalize()?;
        debug!(source = %source.to_string_lossy(), path = %path.display(), "cloning");

        let executor = GitExecutor::with_program(&path, config.git.executable.clone());
        let mut args = vec![OsStr::new("clone")];
        args.extend(flags.iter().map(OsStr::new));
        args.extend([OsStr::new("--"), source, path.as_os_str()]);
        executor.execute(args)?;

        Self::open_with(&path, OpenOptions::default(), config)
    }

    /// Run `git init` in the repository directory
    pub fn init(&mut self) -> Result<()> {
        self.executor.execute(["init"])?;
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.path.join(".git").exists()
    }

    /// Get the repository path
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn default_remote(&self) -> &str {
        &self.config.git.default_remote
    }

    pub fn default_branch(&self) -> &str {
        &self.config.git.default_branch
    }

    /// Get the git executor for this repository
    pub fn executor(&self) -> &GitExecutor {
        &self.executor
    }

    /// Version of the configured git executable
    pub fn git_version(&self) -> Result<GitVersion> {
        GitVersion::detect_with(&self.config.git.executable)
    }

    // --- working tree -----------------------------------------------------

    /// Stage a single file
    pub fn add<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = self.existing_file(path.as_ref())?;
        self.executor
            .execute([OsStr::new("add"), OsStr::new("--"), path.as_os_str()])?;
        Ok(())
    }

    /// Stage each file in turn, stopping at the first failure
    pub fn add_all<I>(&self, paths: I) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        for path in paths {
            self.add(path)?;
        }
        Ok(())
    }

    /// Remove a single file from the index and the working tree
    ///
    /// `force` also removes files whose staged content differs from HEAD.
    pub fn remove<P: AsRef<Path>>(&self, path: P, force: bool) -> Result<()> {
        let path = self.existing_file(path.as_ref())?;
        let mut args = vec![OsStr::new("rm")];
        if force {
            args.push(OsStr::new("-f"));
        }
        args.push(OsStr::new("--"));
        args.push(path.as_os_str());
        self.executor.execute(args)?;
        Ok(())
    }

    pub fn remove_all<I>(&self, paths: I, force: bool) -> Result<()>
    where
        I: IntoIterator,
        I::Item: AsRef<Path>,
    {
        for path in paths {
            self.remove(path, force)?;
        }
        Ok(())
    }

    /// Resolve a file argument, preferring the repository-relative reading
    fn existing_file(&self, path: &Path) -> Result<PathBuf> {
        if self.path.join(path).exists() {
            return Ok(path.to_path_buf());
        }
        if path.exists() {
            return Ok(std::path::absolute(path)?);
        }
        Err(GitError::FileNotFound(path.to_path_buf()))
    }

    /// Commit staged changes
    ///
    /// A dry run decides whether there is anything to commit. When it reports
    /// nothing, no commit is made and `None` is returned. Otherwise the map
    /// holds what the dry run listed, path to status code.
    pub fn commit(&mut self, options: &CommitOptions) -> Result<Option<StatusMap>> {
        let flags = options.flags();

        let mut dry_run = vec!["commit", "--dry-run", "--porcelain"];
        dry_run.extend(flags.iter().map(String::as_str));
        let preview = self.executor.execute(&dry_run)?;

        if preview.stdout.trim().is_empty() {
            debug!("nothing to commit");
            return Ok(None);
        }

        let mut args = vec!["commit"];
        args.extend(flags.iter().map(String::as_str));
        let result = self.executor.execute(&args);
        self.state.clear_branches();
        result?;

        Ok(Some(parser::parse_commit_porcelain(&preview.stdout)?))
    }

    /// Working tree and index differences, path to status code
    pub fn status(&self) -> Result<StatusMap> {
        let output = self.executor.execute(["status", "--porcelain"])?;
        parser::parse_status(&output.stdout)
    }

    /// Nearest tag reachable from HEAD
    ///
    /// `options` is split on whitespace and handed to git unchanged, for
    /// example `"--tags"` to include lightweight tags.
    pub fn describe(&self, options: &str) -> Result<String> {
        let mut args = vec!["describe"];
        args.extend(options.split_whitespace());
        let output = self.executor.execute(args)?;
        Ok(output.stdout.trim().to_string())
    }

    /// Switch to a branch, creating it first when `options.create` is set
    ///
    /// The name is only ever read as a branch, never as a path, so a name
    /// that matches no branch fails instead of restoring a file.
    pub fn checkout<'a, B: Into<BranchRef<'a>>>(
        &mut self,
        branch: B,
        options: CheckoutOptions,
    ) -> Result<()> {
        let branch = branch.into();
        let name = validate_ref_name(RefKind::Branch, branch.name())?;
        let create = options.create && !self.has_branch(name)?;

        let mut args = vec!["checkout"];
        if options.force {
            args.push("-f");
        }
        if create {
            args.push("-b");
        }
        args.extend([name, "--"]);

        let result = self.executor.execute(args);
        self.state.clear_branches();
        result?;
        Ok(())
    }

    /// Remove untracked files from the working tree
    pub fn clean(&self, options: CleanOptions) -> Result<()> {
        let mut args = vec!["clean"];
        if options.directories {
            args.push("-d");
        }
        if options.force {
            args.push("-f");
        }
        self.executor.execute(args)?;
        Ok(())
    }

    /// Clone this repository into a new local directory
    ///
    /// A relative `target` is resolved against the process working
    /// directory, not the repository.
    pub fn clone_to<P: AsRef<Path>>(&self, target: P) -> Result<()> {
        let target = std::path::absolute(target.as_ref())?;
        self.executor.execute([
            OsStr::new("clone"),
            OsStr::new("--local"),
            OsStr::new("--"),
            self.path.as_os_str(),
            target.as_os_str(),
        ])?;
        Ok(())
    }

    // --- remotes ----------------------------------------------------------

    /// Push `branch` (or the default branch) to `remote`
    pub fn push<'a, 'b, R: Into<RemoteRef<'a>>>(
        &self,
        remote: R,
        branch: Option<BranchRef<'b>>,
        force: bool,
    ) -> Result<()> {
        let remote = remote.into();
        let remote = validate_ref_name(RefKind::Remote, remote.name())?;
        let branch = match &branch {
            Some(branch) => branch.name(),
            None => self.default_branch(),
        };
        let branch = validate_ref_name(RefKind::Branch, branch)?;

        let mut args = vec!["push"];
        if force {
            args.push("--force");
        }
        args.push(remote);
        args.push(branch);
        self.executor.execute(args)?;
        Ok(())
    }

    /// Fetch one remote, or all of them when given [`ALL_REMOTES`]
    pub fn fetch<'a, R: Into<RemoteRef<'a>>>(&mut self, remote: R) -> Result<()> {
        let remote = remote.into();
        let args = if remote.name() == ALL_REMOTES {
            vec!["fetch", "--all"]
        } else {
            vec!["fetch", validate_ref_name(RefKind::Remote, remote.name())?]
        };

        let result = self.executor.execute(args);
        self.state.clear_branches();
        result?;
        Ok(())
    }

    pub fn fetch_all(&mut self) -> Result<()> {
        self.fetch(ALL_REMOTES)
    }

    pub fn remotes(&mut self) -> Result<&BTreeMap<String, Remote>> {
        let executor = &self.executor;
        self.state.remotes_or_load(|| {
            let output = executor.execute(["remote", "-v"])?;
            parser::parse_remote_list(&output.stdout)
        })
    }

    /// Look up a remote by name, or the configured default remote
    pub fn remote(&mut self, name: Option<&str>) -> Result<Option<&Remote>> {
        let name = match name {
            Some(name) => name.to_string(),
            None => self.config.git.default_remote.clone(),
        };
        Ok(self.remotes()?.get(&name))
    }

    pub fn add_remote(&mut self, name: &str, url: &str) -> Result<()> {
        let name = validate_ref_name(RefKind::Remote, name)?;
        let result = self.executor.execute(["remote", "add", "--", name, url]);
        self.state.clear_remotes();
        result?;
        Ok(())
    }

    pub fn remove_remote<'a, R: Into<RemoteRef<'a>>>(&mut self, remote: R) -> Result<()> {
        let remote = remote.into();
        let name = validate_ref_name(RefKind::Remote, remote.name())?;
        let result = self.executor.execute(["remote", "remove", name]);
        self.state.clear_remotes();
        result?;
        Ok(())
    }

    pub fn rename_remote<'a, R: Into<RemoteRef<'a>>>(
        &mut self,
        remote: R,
        new_name: &str,
    ) -> Result<()> {
        let remote = remote.into();
        let name = validate_ref_name(RefKind::Remote, remote.name())?;
        let new_name = validate_ref_name(RefKind::Remote, new_name)?;
        let result = self.executor.execute(["remote", "rename", name, new_name]);
        self.state.clear_remotes();
        result?;
        Ok(())
    }

    /// Change the fetch URL, or only the push URL when `push_only` is set
    pub fn set_remote_url<'a, R: Into<RemoteRef<'a>>>(
        &mut self,
        remote: R,
        url: &str,
        push_only: bool,
    ) -> Result<()> {
        let remote = remote.into();
        let name = validate_ref_name(RefKind::Remote, remote.name())?;

        let mut args = vec!["remote", "set-url"];
        if push_only {
            args.push("--push");
        }
        args.extend(["--", name, url]);

        let result = self.executor.execute(args);
        self.state.clear_remotes();
        result?;
        Ok(())
    }

    /// Drop cached remotes after changing them outside this handle
    pub fn invalidate_remotes(&mut self) {
        self.state.clear_remotes();
    }

    // --- branches ---------------------------------------------------------

    pub fn branches(&mut self) -> Result<&BTreeMap<String, Branch>> {
        let executor = &self.executor;
        self.state.branches_or_load(|| {
            let output = executor.execute(["branch"])?;
            parser::parse_branch_list(&output.stdout)
        })
    }

    /// The checked out branch, `None` when HEAD is detached or unborn
    pub fn active_branch(&mut self) -> Result<Option<&Branch>> {
        self.branches()?;
        Ok(self.state.active_branch())
    }

    pub fn branch(&mut self, name: &str) -> Result<Option<&Branch>> {
        Ok(self.branches()?.get(name))
    }

    pub fn has_branch<'a, B: Into<BranchRef<'a>>>(&mut self, branch: B) -> Result<bool> {
        let branch = branch.into();
        Ok(self.branches()?.contains_key(branch.name()))
    }

    /// Create a branch at HEAD without switching to it
    pub fn create_branch(&mut self, name: &str) -> Result<()> {
        let name = validate_ref_name(RefKind::Branch, name)?;
        let result = self.executor.execute(["branch", name]);
        self.state.clear_branches();
        result?;
        Ok(())
    }

    /// Delete a branch; `force` also deletes unmerged branches
    pub fn delete_branch<'a, B: Into<BranchRef<'a>>>(
        &mut self,
        branch: B,
        force: bool,
    ) -> Result<()> {
        let branch = branch.into();
        let name = validate_ref_name(RefKind::Branch, branch.name())?;
        let flag = if force { "-D" } else { "-d" };

        let result = self.executor.execute(["branch", flag, name]);
        self.state.clear_branches();
        result?;
        Ok(())
    }

    // --- tags -------------------------------------------------------------

    pub fn tags(&mut self) -> Result<&BTreeMap<String, Tag>> {
        let executor = &self.executor;
        self.state.tags_or_load(|| {
            let output = executor.execute(["tag"])?;
            parser::parse_tag_list(&output.stdout)
        })
    }

    pub fn tag(&mut self, name: &str) -> Result<Option<&Tag>> {
        Ok(self.tags()?.get(name))
    }

    pub fn has_tag<'a, T: Into<TagRef<'a>>>(&mut self, tag: T) -> Result<bool> {
        let tag = tag.into();
        Ok(self.tags()?.contains_key(tag.name()))
    }

    /// Create a tag at `target`, or at HEAD when no target is given
    ///
    /// With a message the tag is annotated, otherwise it is lightweight.
    pub fn add_tag<'a>(
        &mut self,
        name: &str,
        message: Option<&str>,
        target: Option<CommitRef<'a>>,
    ) -> Result<()> {
        let name = validate_ref_name(RefKind::Tag, name)?;

        let mut args = vec!["tag"];
        if let Some(message) = message {
            args.extend(["-a", "-m", message]);
        }
        args.push(name);
        if let Some(target) = &target {
            args.push(revision_arg(target.hash())?);
        }

        let result = self.executor.execute(args);
        self.state.clear_tags();
        result?;
        Ok(())
    }

    /// Delete a tag, returning false without running git when it is missing
    pub fn remove_tag<'a, T: Into<TagRef<'a>>>(&mut self, tag: T) -> Result<bool> {
        let tag = tag.into();
        let name = tag.name();
        if !self.has_tag(name)? {
            return Ok(false);
        }

        let result = self.executor.execute(["tag", "-d", name]);
        self.state.clear_tags();
        result?;
        Ok(true)
    }

    // --- commits ----------------------------------------------------------

    /// Look up a commit by its full 40 character hash
    ///
    /// Abbreviated hashes are rejected before git is run. Returns `None` when
    /// the hash does not name a commit in this repository.
    pub fn find_commit<'a, C: Into<CommitRef<'a>>>(
        &mut self,
        commit: C,
    ) -> Result<Option<&Commit>> {
        let hash = full_hash(commit.into().hash())?;

        if self.state.commit(&hash).is_none() {
            if !self.commit_exists(&hash)? {
                return Ok(None);
            }
            self.state.insert_commit(&hash);
        }

        Ok(self.state.commit(&hash))
    }

    /// Whether a full hash names a commit in this repository
    pub fn has_commit<'a, C: Into<CommitRef<'a>>>(&self, commit: C) -> Result<bool> {
        let hash = full_hash(commit.into().hash())?;
        self.commit_exists(&hash)
    }

    fn commit_exists(&self, hash: &str) -> Result<bool> {
        let object = format!("{}^{{commit}}", hash);
        let output = self.executor.run(["cat-file", "-e", object.as_str()])?;
        Ok(output.success)
    }

    /// The commit HEAD points to, `None` on an unborn branch
    pub fn head(&mut self) -> Result<Option<Commit>> {
        let output = self
            .executor
            .execute(["rev-parse", "--verify", "--quiet", "HEAD"])?;
        let hash = output.stdout.trim();

        if !output.success || hash.is_empty() {
            return Ok(None);
        }

        Ok(Some(self.state.insert_commit(hash).clone()))
    }

    /// The latest `count` commits reachable from HEAD, newest first
    pub fn recent_commits(&mut self, count: usize) -> Result<Vec<CommitEntry>> {
        if self.head()?.is_none() {
            return Ok(Vec::new());
        }

        let count = count.to_string();
        let output = self
            .executor
            .execute(["log", "-n", count.as_str(), "--format=%H%x00%s"])?;
        parser::parse_log(&output.stdout)
    }

    pub fn commit_info<'a, C: Into<CommitRef<'a>>>(&self, commit: C) -> Result<CommitInfo> {
        let commit = commit.into();
        let revision = revision_arg(commit.hash())?;
        let output = self.executor.execute([
            "show",
            "-s",
            "--format=%H%x00%an%x00%ae%x00%aI%x00%s",
            revision,
        ])?;
        parser::parse_commit_info(&output.stdout)
    }
}

fn full_hash(hash: &str) -> Result<String> {
    if !is_full_hash(hash) {
        return Err(GitError::UnsupportedHash(hash.to_string()));
    }
    Ok(hash.to_ascii_lowercase())
}

fn revision_arg(revision: &str) -> Result<&str> {
    if revision.is_empty() || revision.starts_with('-') {
        return Err(GitError::InvalidArgument(format!(
            "invalid revision '{}'",
            revision
        )));
    }
    Ok(revision)
}
