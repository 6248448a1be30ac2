//! Runs the real `git` executable against throwaway repositories. Every test returns early when
//! git is not installed.

use std::process::Command;

use camino::{Utf8Path, Utf8PathBuf};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use git_scout::{
    args::{BranchesArgs, FilterArgs},
    commands::{self, Context},
    generate_stats,
    scanner::RepositoryScanner,
    Config, Error, GitRepository, GitRunner, LogQuery, Project,
};

fn git_available() -> bool {
    Command::new("git").arg("--version").output().is_ok_and(|o| o.status.success())
}

fn git(dir: &Utf8Path, args: &[&str]) {
    let status = Command::new("git")
        .args(["-c", "user.name=Test", "-c", "user.email=test@example.com"])
        .args(["-c", "commit.gpgsign=false"])
        .args(args)
        .current_dir(dir)
        .output()
        .unwrap();
    assert!(status.status.success(), "git {args:?}: {}", String::from_utf8_lossy(&status.stderr));
}

fn commit_as(dir: &Utf8Path, author: &str, file: &str, content: &str, message: &str) {
    std::fs::write(dir.join(file), content).unwrap();
    git(dir, &["add", file]);
    git(dir, &["commit", "-q", "--author", author, "-m", message]);
}

/// Two authors and three commits on `main`, plus a `feature` branch with one more commit.
fn fixture() -> (TempDir, Utf8PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().join("demo")).unwrap();
    std::fs::create_dir_all(&path).unwrap();

    git(&path, &["init", "-q", "-b", "main"]);
    commit_as(&path, "Ann <ann@example.com>", "a.txt", "1\n2\n3\n", "Add a");
    commit_as(&path, "Bob <bob@example.com>", "b.txt", "x\n", "Add b");
    commit_as(&path, "Ann <ann@example.com>", "a.txt", "1\n2\n", "Trim a");
    git(&path, &["checkout", "-q", "-b", "feature"]);
    commit_as(&path, "Bob <bob@example.com>", "c.txt", "c\n", "Add c | with pipe");
    git(&path, &["checkout", "-q", "main"]);

    (dir, path)
}

#[tokio::test]
async fn test_commits_newest_first() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let repo = GitRepository::new(path).open().await.unwrap();

    let commits = repo.commits(&LogQuery::default()).await.unwrap();

    let messages: Vec<_> = commits.iter().map(|c| c.message()).collect();
    assert_eq!(messages, vec!["Trim a", "Add b", "Add a"]);
    assert_eq!(commits[0].author(), "Ann");
    assert_eq!(commits[0].email(), "ann@example.com");
    assert_eq!(commits[0].short_hash(), &commits[0].hash()[..7]);
    assert!(commits[0].date().is_some());
    assert!(commits[0].files().is_none());
}

#[tokio::test]
async fn test_author_and_branch_filters() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let repo = GitRepository::new(path).open().await.unwrap();

    let bob = repo.commits(&LogQuery::default().author("bob@example.com")).await.unwrap();
    assert_eq!(bob.len(), 1);

    let feature = repo.commits(&LogQuery::default().branch("feature")).await.unwrap();
    assert_eq!(feature.len(), 4);
    // The subject is cut at the field separator.
    assert_eq!(feature[0].message(), "Add c ");
}

#[tokio::test]
async fn test_stats_over_real_history() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let repo = GitRepository::new(path).open().await.unwrap();

    let commits = repo.commits_with_stats(&LogQuery::default()).await.unwrap();
    let stats = generate_stats(&commits);

    assert_eq!(stats.total_commits, 3);
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.total_lines_added, 4);
    assert_eq!(stats.total_lines_deleted, 1);

    assert_eq!(stats.author_stats[0].author, "Ann");
    assert_eq!(stats.author_stats[0].commits, 2);
    assert_eq!(stats.author_stats[0].files_changed, 2);
    assert_eq!(stats.file_stats[0].file, "a.txt");
    assert_eq!(stats.file_stats[0].commits, 2);
}

#[tokio::test]
async fn test_branches() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let repo = GitRepository::new(path).open().await.unwrap();

    let branches = repo.branch_info(None).await.unwrap();
    let names: Vec<_> = branches.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["feature", "main"]);
    assert_eq!(branches[1].last_commit_message, "Trim a");
    assert_eq!(branches[1].last_commit_author, "Ann");

    let only_main = repo.branch_info(Some("main")).await.unwrap();
    assert_eq!(only_main.len(), 1);

    assert_eq!(repo.current_branch().await.unwrap(), "main");
    assert_eq!(repo.branch_names(false).await.unwrap(), vec!["feature", "main"]);
}

#[tokio::test]
async fn test_invalid_range_is_rejected_before_git_runs() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let repo = GitRepository::new(path).open().await.unwrap();

    let err = repo.commits(&LogQuery::default().since("today").until("7d")).await.unwrap_err();
    assert!(matches!(err, Error::InvalidRange));
}

#[tokio::test]
async fn test_open_plain_directory_fails() {
    if !git_available() {
        return;
    }
    let dir = TempDir::new().unwrap();
    let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

    let err = GitRepository::new(path).open().await.unwrap_err();
    assert!(matches!(err, Error::NotARepository(_)));
}

#[tokio::test]
async fn test_scanner_finds_fixture() {
    if !git_available() {
        return;
    }
    let (dir, path) = fixture();
    std::fs::write(path.join("README.md"), "# Demo\nA demo project\n").unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();

    let found = RepositoryScanner::new(root, 2).scan().await;

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "demo");
    assert_eq!(found[0].path, path);
    assert!(found[0].last_activity.is_some());
}

fn context(path: &Utf8Path) -> Context {
    let config = Config::new(vec![Project::new("demo", path.to_owned())], 30);
    Context::with_parts(Ok(config), GitRunner::default(), path.to_owned())
}

#[tokio::test]
async fn test_stats_command_on_fixture() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let ctx = context(&path);

    let json = FilterArgs {
        json: true,
        ..FilterArgs::default()
    };
    commands::stats::execute(&ctx, &json).await.unwrap();

    let text = FilterArgs {
        project: Some("demo".into()),
        author: Some("ann@example.com".into()),
        limit: Some(1),
        ..FilterArgs::default()
    };
    commands::stats::execute(&ctx, &text).await.unwrap();

    let reversed = FilterArgs {
        since: Some("today".into()),
        until: Some("7d".into()),
        json: true,
        ..FilterArgs::default()
    };
    let err = commands::stats::execute(&ctx, &reversed).await.unwrap_err();
    assert!(err.to_string().contains("Since date cannot be after until date"));
}

#[tokio::test]
async fn test_today_command_without_config_uses_current_repository() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let missing = git_scout::config::ConfigError::NotFound { searched: vec![] };
    let ctx = Context::with_parts(Err(missing), GitRunner::default(), path.clone());

    let args = FilterArgs {
        json: true,
        ..FilterArgs::default()
    };
    commands::today::execute(&ctx, &args).await.unwrap();

    assert_eq!(ctx.resolve_project(None).await.unwrap().path, path);
}

#[tokio::test]
async fn test_branches_command_on_fixture() {
    if !git_available() {
        return;
    }
    let (_dir, path) = fixture();
    let ctx = context(&path);

    let detail = BranchesArgs {
        branch: Some("feature".into()),
        stats: true,
        json: true,
        ..BranchesArgs::default()
    };
    commands::branches::execute(&ctx, &detail).await.unwrap();

    let listing = BranchesArgs::default();
    commands::branches::execute(&ctx, &listing).await.unwrap();

    let missing = BranchesArgs {
        branch: Some("release".into()),
        json: true,
        ..BranchesArgs::default()
    };
    let err = commands::branches::execute(&ctx, &missing).await.unwrap_err();
    assert_eq!(err.to_string(), "Branch \"release\" not found");
}
