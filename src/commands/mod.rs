//! The `projects`, `branches`, `today`, `stats` and `init` commands.

pub mod branches;
pub mod init;
pub mod projects;
pub mod stats;
pub mod today;

use std::time::Duration;

use anyhow::{anyhow, bail, Context as _, Result};
use camino::{Utf8Path, Utf8PathBuf};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::{
    config::{Config, ConfigError, Project},
    process::GitRunner,
    repository::{GitRepository, Opened},
};

/// State shared by every command: the configuration, loaded once, and the git runner.
pub struct Context {
    config: Result<Config, ConfigError>,
    config_path: Option<Utf8PathBuf>,
    runner: GitRunner,
    cwd: Utf8PathBuf,
}

impl Context {
    pub fn new(config_path: Option<Utf8PathBuf>) -> Result<Self> {
        let config = Config::load(config_path.as_deref());
        let cwd = std::env::current_dir().context("Failed to read the current directory")?;
        let cwd = Utf8PathBuf::from_path_buf(cwd)
            .map_err(|p| anyhow!("Current directory is not valid UTF-8: {}", p.display()))?;

        Ok(Self {
            config,
            config_path,
            runner: GitRunner::default(),
            cwd,
        })
    }

    pub fn with_parts(
        config: Result<Config, ConfigError>,
        runner: GitRunner,
        cwd: Utf8PathBuf,
    ) -> Self {
        Self {
            config,
            config_path: None,
            runner,
            cwd,
        }
    }

    pub fn with_config_path(mut self, path: Utf8PathBuf) -> Self {
        self.config_path = Some(path);
        self
    }

    /// The loaded configuration, or the reason it could not be loaded.
    pub fn config(&self) -> Result<&Config> {
        self.config.as_ref().map_err(|e| anyhow!("{e}"))
    }

    pub fn config_path(&self) -> Option<&Utf8Path> {
        self.config_path.as_deref()
    }

    pub fn runner(&self) -> &GitRunner {
        &self.runner
    }

    /// Picks the project to analyze: the one named by `--project`, otherwise the first configured
    /// project, otherwise the current directory when it is a repository.
    pub async fn resolve_project(&self, name: Option<&str>) -> Result<Project> {
        if let Some(name) = name {
            let config = self.config().with_context(|| {
                format!(
                    "Project \"{name}\" specified but no configuration found. \
                     Run \"git-scout init\" first."
                )
            })?;
            return config
                .project(name)
                .cloned()
                .ok_or_else(|| anyhow!("Project \"{name}\" not found in configuration"));
        }

        if let Some(project) = self.config().ok().and_then(|c| c.projects().first()) {
            return Ok(project.clone());
        }

        let here = GitRepository::with_runner(self.cwd.clone(), self.runner.clone());
        if let Ok(repo) = here.open().await {
            let name = repo.name();
            info!(%name, "no configuration, using current repository");
            return Ok(Project::new(name, repo.path().to_owned()));
        }

        bail!(
            "No git-scout configuration found and current directory is not a git repository.\n\
             Please run \"git-scout init\" to set up configuration, \
             or run this command from within a git repository."
        )
    }

    pub async fn open(&self, project: &Project) -> Result<GitRepository<Opened>> {
        GitRepository::with_runner(project.path.clone(), self.runner.clone())
            .open()
            .await
            .with_context(|| format!("Cannot open project \"{}\"", project.name))
    }
}

/// Spinner on stderr while git runs; `None` in JSON mode so stdout and stderr stay quiet.
pub(crate) fn spinner(message: &str, enabled: bool) -> Option<ProgressBar> {
    if !enabled {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

pub(crate) fn finish(spinner: Option<ProgressBar>) {
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
}

/// Share of `part` in `whole` as a rounded percentage.
pub(crate) fn percentage(part: usize, whole: usize) -> usize {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as usize
}
