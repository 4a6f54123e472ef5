#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Run git in `dir`, panicking on failure
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Helper to create a test git repository with `main` checked out
pub fn create_test_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().canonicalize().unwrap();

    git(&repo_path, &["init"]);
    git(&repo_path, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);

    (temp_dir, repo_path)
}

/// Helper to create a commit, returning its full hash
pub fn create_commit(repo_path: &Path, file: &str, content: &str, message: &str) -> String {
    let file_path = repo_path.join(file);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directories");
    }
    fs::write(&file_path, content).expect("Failed to write file");

    git(repo_path, &["add", file]);
    git(repo_path, &["commit", "-m", message]);
    git(repo_path, &["rev-parse", "HEAD"]).trim().to_string()
}

/// Helper to create a bare repository usable as a remote
pub fn create_bare_repo() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let repo_path = temp_dir.path().canonicalize().unwrap();
    git(&repo_path, &["init", "--bare"]);
    (temp_dir, repo_path)
}

/// A git wrapper script that appends each argument list to a log file
///
/// Returns the script path and the log path.
#[cfg(unix)]
pub fn recording_git(dir: &Path) -> (PathBuf, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let log = dir.join("git-calls.log");
    let script = dir.join("git-recorder.sh");
    fs::write(
        &script,
        format!(
            "#!/bin/sh\necho \"$*\" >> '{}'\nexec git \"$@\"\n",
            log.display()
        ),
    )
    .unwrap();

    let mut perms = fs::metadata(&script).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&script, perms).unwrap();

    (script, log)
}

/// Lines recorded by a `recording_git` script so far
#[cfg(unix)]
pub fn recorded_calls(log: &Path) -> Vec<String> {
    fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}
