use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, FixedOffset};
use serde_derive::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    config::Project,
    process::GitRunner,
    query::LogQuery,
    repository::{is_git_repository, GitRepository},
};

/// Directory names never descended into.
const SKIPPED_DIRS: &[&str] = &[
    "node_modules",
    "vendor",
    "build",
    "dist",
    "target",
    "Applications",
    "Library",
    "System",
    "Users",
    "Desktop",
    "Downloads",
    "Movies",
    "Music",
    "Pictures",
    "Public",
    "Dropbox",
    "Google Drive",
    "OneDrive",
    "iCloud Drive",
];

const README_FILES: &[&str] = &["README.md", "readme.md", "README.txt"];

/// Window used to look up the latest activity of a found repository.
const ACTIVITY_WINDOW: &str = "30d";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FoundRepository {
    pub name: String,
    pub path: Utf8PathBuf,
    pub description: Option<String>,
    pub last_activity: Option<DateTime<FixedOffset>>,
}

impl From<FoundRepository> for Project {
    fn from(repo: FoundRepository) -> Self {
        Project {
            name: repo.name,
            path: repo.path,
            description: repo.description,
        }
    }
}

/// Finds git repositories below a root directory.
pub struct RepositoryScanner {
    /// Path to the root directory to scan
    pub root: Utf8PathBuf,

    /// Max depth of the scan; 1 only checks the root itself
    pub max_depth: usize,

    pub runner: GitRunner,
}

impl RepositoryScanner {
    pub fn new(root: impl Into<Utf8PathBuf>, max_depth: usize) -> Self {
        Self {
            root: root.into(),
            max_depth,
            runner: GitRunner::default(),
        }
    }

    /// Repositories in walk order. A repository is not descended into, and unreadable
    /// directories are skipped.
    pub async fn scan(&self) -> Vec<FoundRepository> {
        let mut found = Vec::new();
        if self.max_depth == 0 {
            return found;
        }

        let mut walker = WalkDir::new(&self.root)
            .max_depth(self.max_depth - 1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                e.depth() == 0 || !is_skipped(e.file_name().to_string_lossy().as_ref())
            });

        while let Some(entry) = walker.next() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(error = %e, "skipping unreadable directory");
                    continue;
                }
            };
            if !entry.file_type().is_dir() {
                continue;
            }
            let Ok(path) = Utf8PathBuf::from_path_buf(entry.path().to_path_buf()) else {
                debug!(path = %entry.path().display(), "skipping non UTF-8 path");
                continue;
            };

            if is_git_repository(&self.runner, &path).await {
                walker.skip_current_dir();
                found.push(self.describe(path).await);
            }
        }

        found
    }

    async fn describe(&self, path: Utf8PathBuf) -> FoundRepository {
        let name = path
            .file_name()
            .map(str::to_string)
            .unwrap_or_else(|| path.to_string());
        let description = read_description(&path);
        let last_activity = self.last_activity(&path).await;

        FoundRepository {
            name,
            path,
            description,
            last_activity,
        }
    }

    async fn last_activity(&self, path: &Utf8Path) -> Option<DateTime<FixedOffset>> {
        let repo = GitRepository::with_runner(path.to_owned(), self.runner.clone())
            .open()
            .await
            .ok()?;
        let query = LogQuery::default().since(ACTIVITY_WINDOW);
        let commits = repo.commits(&query).await.ok()?;
        commits.first().and_then(|c| c.date())
    }
}

fn is_skipped(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

#[derive(Deserialize)]
struct PackageJson {
    description: Option<String>,
}

/// `description` of `package.json`, otherwise the first line of a README when it is short.
fn read_description(path: &Utf8Path) -> Option<String> {
    let from_package = std::fs::read_to_string(path.join("package.json"))
        .ok()
        .and_then(|s| serde_json::from_str::<PackageJson>(&s).ok())
        .and_then(|p| p.description)
        .filter(|d| !d.is_empty());
    if from_package.is_some() {
        return from_package;
    }

    README_FILES.iter().find_map(|file| {
        let readme = std::fs::read_to_string(path.join(file)).ok()?;
        let first = readme.lines().next()?;
        (!first.is_empty() && first.len() < 100)
            .then(|| first.trim_start_matches('#').trim_start().to_string())
    })
}
