//! Builds the argument lists handed to the process runner.

use crate::{
    date::{self, DateRange},
    error::Result,
    parser::{COMMIT_SENTINEL, FIELD_SEPARATOR},
};

/// Which `git log` listing to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Hash, author, email, date and subject only.
    Basic,
    /// Basic fields plus `--numstat` line counts per file.
    WithStats,
}

/// Filters for a `git log` query. Omitted filters are omitted from the arguments; defaults are
/// the caller's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogQuery {
    /// Lower time bound, in any format accepted by [`date::parse_date`].
    pub since: Option<String>,
    /// Upper time bound, in any format accepted by [`date::parse_date`].
    pub until: Option<String>,
    /// Passed through to `--author`, which git matches as a pattern against name and email.
    pub author: Option<String>,
    /// Appended as a positional ref.
    pub branch: Option<String>,
}

impl LogQuery {
    pub fn since(mut self, since: impl Into<String>) -> Self {
        self.since = Some(since.into());
        self
    }

    pub fn until(mut self, until: impl Into<String>) -> Self {
        self.until = Some(until.into());
        self
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = Some(branch.into());
        self
    }

    /// Resolves the time bounds and returns the full argument list. Fails before anything is
    /// spawned when a bound cannot be parsed or `since` is after `until`.
    pub fn to_args(&self, format: LogFormat) -> Result<Vec<String>> {
        let DateRange { since, until } =
            date::parse_date_range(self.since.as_deref(), self.until.as_deref())?;

        let mut args = vec!["log".to_string()];
        if format == LogFormat::WithStats {
            args.push("--numstat".to_string());
        }
        args.push(pretty_format(format));
        args.push("--date=iso-strict".to_string());

        if let Some(since) = since {
            args.push(format!("--since={}", date::format_for_git(&since)));
        }
        if let Some(until) = until {
            args.push(format!("--until={}", date::format_for_git(&until)));
        }
        if let Some(author) = &self.author {
            args.push(format!("--author={author}"));
        }
        if let Some(branch) = &self.branch {
            args.push(branch.clone());
        }

        Ok(args)
    }
}

/// Commit header fields, in the order the parser reads them.
const HEADER_FIELDS: [&str; 5] = ["%H", "%an", "%ae", "%ad", "%s"];

/// Branch tip fields, in the order the parser reads them.
const BRANCH_FIELDS: [&str; 5] = [
    "%(refname:short)",
    "%(committerdate:iso-strict)",
    "%(authorname)",
    "%(objectname:short)",
    "%(subject)",
];

fn join_fields(fields: &[&str]) -> String {
    fields.join(FIELD_SEPARATOR.to_string().as_str())
}

fn pretty_format(format: LogFormat) -> String {
    let fields = join_fields(&HEADER_FIELDS);
    match format {
        LogFormat::Basic => format!("--pretty=format:{fields}"),
        LogFormat::WithStats => {
            format!("--pretty=format:{COMMIT_SENTINEL}{FIELD_SEPARATOR}{fields}")
        }
    }
}

/// Cheap command whose exit status tells whether a directory is inside a work tree.
pub fn status_args() -> Vec<String> {
    vec!["status".to_string(), "--porcelain".to_string()]
}

/// Tip of every local branch, or of `refs/heads/<name>` only.
pub fn branch_info_args(name: Option<&str>) -> Vec<String> {
    let pattern = match name {
        Some(name) => format!("refs/heads/{name}"),
        None => "refs/heads".to_string(),
    };
    vec![
        "for-each-ref".to_string(),
        format!("--format={}", join_fields(&BRANCH_FIELDS)),
        pattern,
    ]
}

pub fn branch_names_args(include_remote: bool) -> Vec<String> {
    let mut args = vec!["branch".to_string()];
    if include_remote {
        args.push("-a".to_string());
    }
    args.push("--format=%(refname:short)".to_string());
    args
}

pub fn current_branch_args() -> Vec<String> {
    vec!["branch".to_string(), "--show-current".to_string()]
}
