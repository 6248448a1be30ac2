use std::fmt::Display;

use chrono::{DateTime, FixedOffset};
use serde_derive::Serialize;

use crate::file::FileChange;

/// Number of leading hash characters used as the short hash.
pub const SHORT_HASH_LEN: usize = 7;

/// One commit as reported by `git log`. Built only by the log parser and never changed
/// afterwards, hence the private fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitRecord {
    hash: String,
    short_hash: String,
    author: String,
    email: String,
    /// `None` when git's timestamp could not be parsed.
    date: Option<DateTime<FixedOffset>>,
    message: String,
    /// `None` when file statistics were not requested; empty when the commit touched no files.
    #[serde(rename = "filesChanged", skip_serializing_if = "Option::is_none")]
    files: Option<Vec<FileChange>>,
}

impl CommitRecord {
    pub fn new(
        hash: impl Into<String>,
        author: impl Into<String>,
        email: impl Into<String>,
        date: Option<DateTime<FixedOffset>>,
        message: impl Into<String>,
    ) -> Self {
        let hash = hash.into();
        let short_hash = hash.chars().take(SHORT_HASH_LEN).collect();
        Self {
            hash,
            short_hash,
            author: author.into(),
            email: email.into(),
            date,
            message: message.into(),
            files: None,
        }
    }

    pub fn with_files(mut self, files: Vec<FileChange>) -> Self {
        self.files = Some(files);
        self
    }

    pub fn hash(&self) -> &str {
        &self.hash
    }

    pub fn short_hash(&self) -> &str {
        &self.short_hash
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn date(&self) -> Option<DateTime<FixedOffset>> {
        self.date
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn files(&self) -> Option<&[FileChange]> {
        self.files.as_deref()
    }
}

impl Display for CommitRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "commit: {}\nauthor: {} <{}>\ndate: {}\nsummary: {}",
            self.hash,
            self.author,
            self.email,
            self.date.map(|d| d.to_rfc3339()).unwrap_or_default(),
            self.message,
        )?;
        if let Some(files) = &self.files {
            write!(
                f,
                "\nchanged files: {}",
                files.iter().map(|c| c.to_string()).collect::<Vec<_>>().join(", ")
            )?;
        }
        Ok(())
    }
}

/// A local branch and the commit at its tip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchInfo {
    pub name: String,
    pub last_commit_date: Option<DateTime<FixedOffset>>,
    pub last_commit_author: String,
    pub last_commit_hash: String,
    pub last_commit_message: String,
}
