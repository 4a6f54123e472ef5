mod helpers;

use gitface::error::GitError;
use gitface::git::parser::*;
use gitface::{CommitOptions, Repository};
use helpers::{create_commit, create_test_repo};
use std::fs;

/// Test parsing completely empty git output
#[test]
fn test_parse_empty_outputs() {
    assert!(parse_branch_list("").unwrap().is_empty());
    assert!(parse_tag_list("\n\n").unwrap().is_empty());
    assert!(parse_remote_list("").unwrap().is_empty());
    assert!(parse_status("").unwrap().is_empty());
    assert!(parse_commit_porcelain("").unwrap().is_empty());
    assert!(parse_log("").unwrap().is_empty());
}

/// At most one branch is active even in odd listings
#[test]
fn test_parse_branches_single_active() {
    let output = "  alpha\n* beta\n  gamma\n  (not a branch)\n";
    let branches = parse_branch_list(output).unwrap();

    assert_eq!(branches.values().filter(|b| b.is_current).count(), 1);
    assert!(branches["beta"].is_current);
    assert!(!branches.contains_key("(not a branch)"));
}

/// Test parsing branch names with special characters
#[test]
fn test_parse_branches_special_chars() {
    let output = "* feature/FOO-123\n  bugfix/issue-456\n  release/v1.0.0";
    let result = parse_branch_list(output).unwrap();

    assert_eq!(result.len(), 3);
    assert!(result["feature/FOO-123"].is_current);
    assert!(result.contains_key("bugfix/issue-456"));
    assert!(result.contains_key("release/v1.0.0"));
}

/// Only the two character marker is stripped
#[test]
fn test_parse_branch_marker_exact() {
    let result = parse_branch_list("* *starred").unwrap();
    assert!(result["*starred"].is_current);
}

/// Remote listing with differing URLs for many remotes
#[test]
fn test_parse_remotes_mixed() {
    let output = "origin\thttps://example.com/repo.git (fetch)\n\
                  origin\tssh://git@example.com/repo.git (push)\n\
                  mirror\t/srv/mirror.git (fetch)\n\
                  mirror\t/srv/mirror.git (push)\n\
                  broken line without url\n";
    let remotes = parse_remote_list(output).unwrap();

    assert_eq!(remotes.len(), 2);
    assert_ne!(remotes["origin"].fetch_url, remotes["origin"].push_url);
    assert_eq!(remotes["mirror"].fetch_url, remotes["mirror"].push_url);
}

/// Push line before the fetch line is still merged
#[test]
fn test_parse_remotes_push_first() {
    let output = "origin\t/push (push)\norigin\t/fetch (fetch)";
    let remotes = parse_remote_list(output).unwrap();

    assert_eq!(remotes["origin"].fetch_url.as_deref(), Some("/fetch"));
    assert_eq!(remotes["origin"].push_url.as_deref(), Some("/push"));
}

/// URLs with spaces keep everything between the name and the direction
#[test]
fn test_parse_remotes_url_with_spaces() {
    let output = "local\t/srv/my repos/a.git (fetch)\nlocal\t/srv/my repos/a.git (push)\n";
    let remotes = parse_remote_list(output).unwrap();

    assert_eq!(remotes["local"].fetch_url.as_deref(), Some("/srv/my repos/a.git"));
    assert_eq!(remotes["local"].push_url.as_deref(), Some("/srv/my repos/a.git"));
}

/// A remote added with a spaced path shows up in the listing
#[test]
fn test_remote_with_spaced_path_is_listed() {
    let (_temp, repo_path) = create_test_repo();
    let mut repo = Repository::open(&repo_path).unwrap();

    repo.add_remote("local", "/srv/my repos/a.git").unwrap();
    let local = repo.remote(Some("local")).unwrap().unwrap();
    assert_eq!(local.fetch_url(), Some("/srv/my repos/a.git"));
    assert_eq!(local.push_url(), Some("/srv/my repos/a.git"));
}

/// Branches checked out in another worktree are listed without their marker
#[test]
fn test_parse_branches_other_worktree() {
    let result = parse_branch_list("+ topic\n* main\n").unwrap();

    assert!(!result["topic"].is_current);
    assert!(result["main"].is_current);
    assert_eq!(result.len(), 2);
}

/// A branch held by a linked worktree is still a plain, inactive branch
#[test]
fn test_branch_in_linked_worktree() {
    let (_temp, repo_path) = create_test_repo();
    create_commit(&repo_path, "a.txt", "a", "Initial commit");
    let worktree_temp = tempfile::TempDir::new().unwrap();
    let worktree = worktree_temp.path().join("wt");
    helpers::git(
        &repo_path,
        &["worktree", "add", "-b", "topic", &worktree.to_string_lossy()],
    );
    let mut repo = Repository::open(&repo_path).unwrap();

    let branches = repo.branches().unwrap();
    assert_eq!(branches.len(), 2);
    assert!(!branches["topic"].is_active());
    assert!(branches["main"].is_active());
}

/// Test parsing status paths with spaces
#[test]
fn test_parse_status_paths_with_spaces() {
    let output = "?? my file with spaces.txt";
    let result = parse_status(output).unwrap();

    assert_eq!(result["my file with spaces.txt"], "??");
}

/// Lines too short for a status code are skipped
#[test]
fn test_parse_status_malformed() {
    let output = "??\n\n M ok.txt";
    let result = parse_status(output).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result["ok.txt"], "M");
}

/// Test parsing very long file paths
#[test]
fn test_parse_very_long_paths() {
    let long_path = "a/".repeat(100) + "file.txt";
    let output = format!("A  {}", long_path);
    let result = parse_commit_porcelain(&output).unwrap();

    assert_eq!(result[&long_path], "A");
}

/// Test parsing commits with null bytes
#[test]
fn test_parse_commits_with_nulls() {
    let output = "abc123\0Message with\0embedded\0nulls";
    let result = parse_log(output).unwrap();

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].hash, "abc123");
    // Only first null byte is the delimiter
    assert_eq!(result[0].message, "Message with");
}

/// Test parsing commits with very long messages
#[test]
fn test_parse_commits_long_messages() {
    let long_msg = "A".repeat(10000);
    let output = format!("abc123\0{}", long_msg);
    let result = parse_log(&output).unwrap();

    assert_eq!(result[0].message.len(), 10000);
}

/// Unicode file names and messages survive the round trip through git
#[test]
fn test_unicode_commit_message() {
    let (_temp, repo_path) = create_test_repo();
    create_commit(&repo_path, "a.txt", "a", "Initial commit");
    let mut repo = Repository::open(&repo_path).unwrap();

    fs::write(repo_path.join("a.txt"), "b").unwrap();
    repo.add("a.txt").unwrap();
    repo.commit(&CommitOptions::new().message("修正 файл ✓"))
        .unwrap()
        .unwrap();

    assert_eq!(repo.recent_commits(1).unwrap()[0].message, "修正 файл ✓");
}

/// Untracked files alone still count as something to commit
#[test]
fn test_commit_with_only_untracked_files() {
    let (_temp, repo_path) = create_test_repo();
    create_commit(&repo_path, "a.txt", "a", "Initial commit");
    let mut repo = Repository::open(&repo_path).unwrap();

    fs::write(repo_path.join("scratch.txt"), "x").unwrap();
    let changes = repo
        .commit(&CommitOptions::new().message("Nothing staged"))
        .unwrap()
        .unwrap();

    assert_eq!(changes["scratch.txt"], "??");
    assert_eq!(repo.recent_commits(10).unwrap().len(), 1);
}

/// Branch names that git would read as options are refused
#[test]
fn test_option_like_branch_name() {
    let (_temp, repo_path) = create_test_repo();
    create_commit(&repo_path, "a.txt", "a", "Initial commit");
    let mut repo = Repository::open(&repo_path).unwrap();

    let err = repo.create_branch("-D").unwrap_err();
    assert!(matches!(err, GitError::InvalidArgument(_)));
    assert_eq!(repo.branches().unwrap().len(), 1);
}

/// Names with spaces reach git as one argument and git rejects them itself
#[test]
fn test_branch_name_with_space() {
    let (_temp, repo_path) = create_test_repo();
    create_commit(&repo_path, "a.txt", "a", "Initial commit");
    let mut repo = Repository::open(&repo_path).unwrap();

    let err = repo.create_branch("two words").unwrap_err();
    assert!(matches!(err, GitError::CommandFailed(_)));
    assert!(!repo.has_branch("two").unwrap());
}
