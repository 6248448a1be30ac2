//! Turns raw `git log` / `git for-each-ref` output into typed records.
//!
//! Parsing never fails. Malformed input degrades by omission: stats blocks without a proper header
//! are dropped and numstat lines with fewer than three tab-separated parts are skipped.
//!
//! Known limitations, kept as-is:
//! - fields are split on every `|`, so a subject containing `|` is cut at the first one;
//! - numstat lines are split on every tab and the path is the third part, so a path with an
//!   embedded tab is truncated.

use chrono::{DateTime, FixedOffset};
use tracing::debug;

use crate::{
    file::FileChange,
    log::{BranchInfo, CommitRecord},
};

/// Separates the fields of a commit or branch header.
pub const FIELD_SEPARATOR: char = '|';

/// Marks the start of every commit block in stats mode.
pub const COMMIT_SENTINEL: &str = "--commit--";

/// Parses one-record-per-line output of the basic listing. Lines are not validated: a line
/// without any separator becomes a record whose hash is the whole line.
pub fn parse_commits(output: &str) -> Vec<CommitRecord> {
    if output.is_empty() {
        return Vec::new();
    }

    output.split('\n').map(|line| parse_header(line.split(FIELD_SEPARATOR))).collect()
}

/// Parses `--numstat` output whose commit headers are prefixed with [`COMMIT_SENTINEL`].
pub fn parse_commits_with_stats(output: &str) -> Vec<CommitRecord> {
    output
        .split(COMMIT_SENTINEL)
        .filter(|block| !block.trim().is_empty())
        .filter_map(parse_block)
        .collect()
}

/// Parses `for-each-ref` output: name, committer date, author, short hash, subject.
pub fn parse_branches(output: &str) -> Vec<BranchInfo> {
    if output.is_empty() {
        return Vec::new();
    }

    output
        .split('\n')
        .map(|line| {
            let mut fields = line.split(FIELD_SEPARATOR);
            let mut next = || fields.next().unwrap_or_default().to_string();
            let name = next();
            let date = next();
            BranchInfo {
                name,
                last_commit_date: parse_timestamp(&date),
                last_commit_author: next(),
                last_commit_hash: next(),
                last_commit_message: next(),
            }
        })
        .collect()
}

/// Parses `branch --format=%(refname:short)` output. Drops blank lines and `origin/HEAD`, and
/// strips the first `origin/` from remote branch names.
pub fn parse_branch_names(output: &str) -> Vec<String> {
    output
        .split('\n')
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.starts_with("origin/HEAD"))
        .map(|name| name.replacen("origin/", "", 1))
        .collect()
}

fn parse_block(block: &str) -> Option<CommitRecord> {
    let mut lines = block.trim().lines();
    let header = lines.next()?;
    if !header.contains(FIELD_SEPARATOR) {
        debug!(header, "skipping commit block without header fields");
        return None;
    }

    // The sentinel is directly followed by a separator, so the first field is empty.
    let mut fields = header.split(FIELD_SEPARATOR);
    fields.next();
    let commit = parse_header(fields);

    let files = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(parse_numstat_line)
        .collect();

    Some(commit.with_files(files))
}

fn parse_header<'a>(mut fields: impl Iterator<Item = &'a str>) -> CommitRecord {
    let mut next = || fields.next().unwrap_or_default();
    let hash = next();
    let author = next();
    let email = next();
    let date = next();
    let message = next();
    CommitRecord::new(hash, author, email, parse_timestamp(date), message)
}

fn parse_numstat_line(line: &str) -> Option<FileChange> {
    let parts = line.split('\t').collect::<Vec<_>>();
    if parts.len() < 3 {
        debug!(line, "skipping malformed numstat line");
        return None;
    }

    Some(FileChange::new(parts[2], parse_count(parts[0]), parse_count(parts[1])))
}

/// Leading decimal digits of a numstat column after optional whitespace. `-` (binary file) and
/// columns without leading digits count as 0.
fn parse_count(column: &str) -> usize {
    let column = column.trim_start();
    let end = column
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(column.len());
    column[..end].parse().unwrap_or(0)
}

fn parse_timestamp(text: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(text.trim()).ok()
}
