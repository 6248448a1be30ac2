use std::ops::Deref;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info};

use crate::{
    error::{Error, Result},
    log::{BranchInfo, CommitRecord},
    parser,
    process::GitRunner,
    query::{self, LogFormat, LogQuery},
};

#[derive(Debug)]
pub struct Uninitialized {
    path: Utf8PathBuf,
    runner: GitRunner,
}

#[derive(Debug)]
pub struct Opened {
    path: Utf8PathBuf,
    runner: GitRunner,
}

/// A local git repository. Queries are only available once the path has been confirmed to be a
/// repository:
///
/// Uninitialized -> Opened
#[derive(Debug)]
pub struct GitRepository<S> {
    state: S,
}

impl<S> Deref for GitRepository<S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        &self.state
    }
}

/// Whether `path` is inside a git work tree. Every failure, including a missing git binary,
/// reads as "no".
pub async fn is_git_repository(runner: &GitRunner, path: &Utf8Path) -> bool {
    match runner.run(query::status_args(), path).await {
        Ok(_) => true,
        Err(e) => {
            debug!(%path, error = %e, "not a git repository");
            false
        }
    }
}

impl GitRepository<Uninitialized> {
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self::with_runner(path, GitRunner::default())
    }

    pub fn with_runner(path: impl Into<Utf8PathBuf>, runner: GitRunner) -> Self {
        GitRepository {
            state: Uninitialized {
                path: path.into(),
                runner,
            },
        }
    }

    pub async fn open(self) -> Result<GitRepository<Opened>> {
        let Uninitialized { path, runner } = self.state;
        if !is_git_repository(&runner, &path).await {
            return Err(Error::NotARepository(path));
        }

        Ok(GitRepository {
            state: Opened { path, runner },
        })
    }
}

impl Opened {
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Directory name of the repository, used as a project name when there is no config.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| self.path.to_string())
    }
}

impl GitRepository<Opened> {
    /// Commits matching `query`, newest first, without file statistics.
    pub async fn commits(&self, query: &LogQuery) -> Result<Vec<CommitRecord>> {
        let args = query.to_args(LogFormat::Basic)?;
        let output = self.runner.run(&args, &self.path).await?;
        let commits = parser::parse_commits(&output);
        info!(path = %self.path, count = commits.len(), "listed commits");
        Ok(commits)
    }

    /// Commits matching `query`, newest first, with per-file line counts.
    pub async fn commits_with_stats(&self, query: &LogQuery) -> Result<Vec<CommitRecord>> {
        let args = query.to_args(LogFormat::WithStats)?;
        let output = self.runner.run(&args, &self.path).await?;
        let commits = parser::parse_commits_with_stats(&output);
        info!(path = %self.path, count = commits.len(), "listed commits with stats");
        Ok(commits)
    }

    /// Tip commit of every local branch, or of the branch called `name` only.
    pub async fn branch_info(&self, name: Option<&str>) -> Result<Vec<BranchInfo>> {
        let output = self
            .runner
            .run(query::branch_info_args(name), &self.path)
            .await?;
        Ok(parser::parse_branches(&output))
    }

    pub async fn branch_names(&self, include_remote: bool) -> Result<Vec<String>> {
        let output = self
            .runner
            .run(query::branch_names_args(include_remote), &self.path)
            .await?;
        Ok(parser::parse_branch_names(&output))
    }

    /// Name of the checked out branch; empty on a detached HEAD.
    pub async fn current_branch(&self) -> Result<String> {
        let output = self
            .runner
            .run(query::current_branch_args(), &self.path)
            .await?;
        Ok(output.trim().to_string())
    }
}
