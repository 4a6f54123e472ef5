use crate::error::{GitError, Result};
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tracing::{debug, warn};

/// Result of executing a git command
#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub success: bool,
}

impl CommandOutput {
    /// Whether this output counts as a failed command
    ///
    /// A non-zero exit only fails when git also wrote to stderr; several
    /// commands use the exit status to report a result rather than an error.
    pub fn is_failure(&self) -> bool {
        !self.success && !self.stderr.is_empty()
    }
}

/// Executes git commands within a repository
#[derive(Debug, Clone)]
pub struct GitExecutor {
    repo_path: PathBuf,
    program: PathBuf,
}

impl GitExecutor {
    /// Create a new GitExecutor for the given repository path
    pub fn new<P: AsRef<Path>>(repo_path: P) -> Self {
        Self::with_program(repo_path, "git")
    }

    /// Create a GitExecutor that spawns `program` instead of `git` from PATH
    pub fn with_program<P: AsRef<Path>, G: Into<PathBuf>>(repo_path: P, program: G) -> Self {
        Self {
            repo_path: repo_path.as_ref().to_path_buf(),
            program: program.into(),
        }
    }

    /// Execute a git command and return the output
    ///
    /// Arguments are passed to the process as-is, never through a shell.
    /// Example: `executor.execute(["status", "--porcelain"])`
    pub fn execute<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = collect_args(args);
        let output = self.spawn(&args)?;

        if output.is_failure() {
            warn!(
                program = %self.program.display(),
                args = ?args,
                exit_code = output.exit_code,
                "git command failed"
            );
            return Err(GitError::CommandFailed(output.stderr));
        }

        Ok(output)
    }

    /// Execute a git command without applying the failure rule
    ///
    /// Only a failure to start the process is an error; the caller inspects
    /// `success` and `exit_code` itself.
    pub fn run<I, S>(&self, args: I) -> Result<CommandOutput>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args = collect_args(args);
        self.spawn(&args)
    }

    fn spawn(&self, args: &[OsString]) -> Result<CommandOutput> {
        if args.is_empty() {
            return Err(GitError::InvalidArgument("Empty command".to_string()));
        }

        debug!(
            program = %self.program.display(),
            args = ?args,
            cwd = %self.repo_path.display(),
            "running git"
        );

        // output() drains stdout and stderr before waiting on the child
        let output = Command::new(&self.program)
            .args(args)
            .current_dir(&self.repo_path)
            .output()?;

        Ok(Self::process_output(output))
    }

    /// Process command output into CommandOutput struct
    fn process_output(output: Output) -> CommandOutput {
        CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            success: output.status.success(),
        }
    }

    /// Get the repository path
    pub fn repo_path(&self) -> &Path {
        &self.repo_path
    }

    /// Get the program spawned for each command
    pub fn program(&self) -> &Path {
        &self.program
    }
}

fn collect_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}
