use camino::{Utf8Path, Utf8PathBuf};
use serde_derive::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

const GLOBAL_DIR: &str = ".git-scout";
const GLOBAL_FILE: &str = "config.toml";
const LOCAL_FILE: &str = "git-scout.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No config file found. Please create one at:\n{}\n\nSample config:\n{}",
        .searched.iter().map(|p| format!("  {p}")).collect::<Vec<_>>().join("\n"),
        Config::sample()
    )]
    NotFound { searched: Vec<Utf8PathBuf> },

    #[error("Error reading config file at {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid TOML in config file at {path}: {source}")]
    Parse {
        path: Utf8PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "Invalid config file at {path}:\n{}",
        .problems.iter().map(|p| format!("  - {p}")).collect::<Vec<_>>().join("\n")
    )]
    Invalid { path: Utf8PathBuf, problems: Vec<String> },

    #[error("Error writing config file at {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// A repository tracked by the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    pub path: Utf8PathBuf,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Project {
    pub fn new(name: impl Into<String>, path: impl Into<Utf8PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            description: None,
        }
    }
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Number of days `stats` looks back when no `--since` is given
    #[serde(default = "default_since_days")]
    pub default_since_days: u32,

    /// Repositories, in the order they are listed
    #[serde(default)]
    pub projects: Vec<Project>,
}

fn default_since_days() -> u32 {
    1
}

impl Config {
    pub fn new(projects: Vec<Project>, default_since_days: u32) -> Self {
        Self {
            default_since_days,
            projects,
        }
    }

    /// Loads `explicit` if given, otherwise the first existing file among the global and the
    /// local location.
    pub fn load(explicit: Option<&Utf8Path>) -> Result<Self, ConfigError> {
        let candidates = match explicit {
            Some(path) => vec![path.to_owned()],
            None => [Self::global_path(), Some(Self::local_path())].into_iter().flatten().collect(),
        };

        match candidates.iter().find(|p| p.is_file()) {
            Some(path) => Self::load_from(path),
            None => Err(ConfigError::NotFound { searched: candidates }),
        }
    }

    pub fn load_from(path: &Utf8Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read {
                path: path.to_owned(),
                source,
            })?;
        let config = Self::from_toml_str(&content)
            .map_err(|source| ConfigError::Parse {
                path: path.to_owned(),
                source,
            })?;

        let problems = config.validate();
        if !problems.is_empty() {
            return Err(ConfigError::Invalid {
                path: path.to_owned(),
                problems,
            });
        }

        info!(%path, projects = config.projects.len(), "loaded config");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Every problem with the configuration; empty when it is usable.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();

        if self.projects.is_empty() {
            problems.push("projects: At least one project must be configured".to_string());
        }
        if self.default_since_days < 1 {
            problems.push("default_since_days: Must be at least 1".to_string());
        }

        for (i, project) in self.projects.iter().enumerate() {
            if project.name.trim().is_empty() {
                problems.push(format!("projects.{i}.name: Project name cannot be empty"));
            }
            if project.path.as_str().trim().is_empty() {
                problems.push(format!("projects.{i}.path: Project path cannot be empty"));
            } else if !project.path.exists() {
                problems.push(format!("Project path does not exist: {}", project.path));
            } else if !project.path.join(".git").exists() {
                problems.push(format!("Project path is not a Git repository: {}", project.path));
            }
        }

        problems
    }

    pub fn save(&self, path: &Utf8Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_owned(),
                source,
            })?;
        }
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_owned(),
            source,
        })
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.name == name)
    }

    pub fn default_since_days(&self) -> u32 {
        self.default_since_days
    }

    /// `~/.git-scout/config.toml`, when the home directory is known and valid UTF-8.
    pub fn global_path() -> Option<Utf8PathBuf> {
        let home = Utf8PathBuf::from_path_buf(dirs::home_dir()?).ok()?;
        Some(home.join(GLOBAL_DIR).join(GLOBAL_FILE))
    }

    /// `./git-scout.toml`
    pub fn local_path() -> Utf8PathBuf {
        Utf8PathBuf::from(LOCAL_FILE)
    }

    pub fn sample() -> String {
        let sample = Config::new(
            vec![
                Project::new("App iOS", "/Users/<user>/Dev/app-ios"),
                Project::new("Backend API", "/Users/<user>/Dev/backend-api"),
            ],
            1,
        );
        toml::to_string_pretty(&sample).unwrap_or_default()
    }
}
