//! Error types shared by the process runner, query builder and date parser.
//!
//! The log parser and the stats aggregator never fail: malformed records are
//! dropped instead of raised.

use camino::Utf8PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The executable could not be launched at all (not found, permission denied).
    #[error("Failed to execute {program}: {source}")]
    SpawnFailed {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The executable ran but exited with a non-zero status. Carries stderr, or stdout when
    /// stderr was empty.
    #[error("Git command failed: {0}")]
    CommandFailed(String),

    #[error("Invalid date format: {0}")]
    InvalidDateFormat(String),

    #[error("Since date cannot be after until date")]
    InvalidRange,

    #[error("Not a git repository: {0}")]
    NotARepository(Utf8PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
