use std::fmt::Display;

use serde_derive::Serialize;

/// One numstat line of a commit: the repository-relative path and its line counts. Binary files
/// are reported by git with a `-` placeholder, which is stored as 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileChange {
    pub file: String,
    pub added: usize,
    pub deleted: usize,
}

impl FileChange {
    pub fn new(file: impl Into<String>, added: usize, deleted: usize) -> Self {
        Self {
            file: file.into(),
            added,
            deleted,
        }
    }
}

impl Display for FileChange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (+{} -{})", self.file, self.added, self.deleted)
    }
}
