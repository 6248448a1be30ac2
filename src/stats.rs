//! Reduces commit records into per-author and per-file statistics.

use std::collections::HashMap;

use serde_derive::Serialize;

use crate::log::CommitRecord;

/// Running totals for one author identity. Two emails under the same name are two authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorStat {
    pub author: String,
    pub email: String,
    pub commits: usize,
    /// Sum of the distinct files of each commit; not deduplicated across commits.
    pub files_changed: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
}

impl AuthorStat {
    fn new(author: &str, email: &str) -> Self {
        Self {
            author: author.to_string(),
            email: email.to_string(),
            commits: 0,
            files_changed: 0,
            lines_added: 0,
            lines_deleted: 0,
        }
    }
}

/// Running totals for one file path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileStat {
    pub file: String,
    /// Number of commits touching the file.
    pub commits: usize,
    pub lines_added: usize,
    pub lines_deleted: usize,
}

impl FileStat {
    fn new(file: &str) -> Self {
        Self {
            file: file.to_string(),
            commits: 0,
            lines_added: 0,
            lines_deleted: 0,
        }
    }

    pub fn total_changes(&self) -> usize {
        self.lines_added + self.lines_deleted
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResult {
    /// Descending by commit count; ties keep first-seen order.
    pub author_stats: Vec<AuthorStat>,
    /// Descending by added + deleted lines; ties keep first-seen order.
    pub file_stats: Vec<FileStat>,
    pub total_commits: usize,
    pub total_files: usize,
    pub total_lines_added: usize,
    pub total_lines_deleted: usize,
}

/// Aggregates `commits` in input order.
///
/// Line totals are summed over the authors, so they always match the author table. Every path
/// of every commit ends up in exactly one [`FileStat`].
pub fn generate_stats(commits: &[CommitRecord]) -> StatsResult {
    let mut authors = Vec::<AuthorStat>::new();
    let mut author_index = HashMap::<(&str, &str), usize>::new();
    let mut files = Vec::<FileStat>::new();
    let mut file_index = HashMap::<&str, usize>::new();

    for commit in commits {
        let idx = *author_index
            .entry((commit.author(), commit.email()))
            .or_insert_with(|| {
                authors.push(AuthorStat::new(commit.author(), commit.email()));
                authors.len() - 1
            });
        let author = &mut authors[idx];
        author.commits += 1;

        let Some(changes) = commit.files() else {
            continue;
        };

        let mut distinct = changes.iter().map(|c| c.file.as_str()).collect::<Vec<_>>();
        distinct.sort_unstable();
        distinct.dedup();
        author.files_changed += distinct.len();

        for change in changes {
            author.lines_added += change.added;
            author.lines_deleted += change.deleted;

            let idx = *file_index
                .entry(change.file.as_str())
                .or_insert_with(|| {
                    files.push(FileStat::new(&change.file));
                    files.len() - 1
                });
            let file = &mut files[idx];
            file.commits += 1;
            file.lines_added += change.added;
            file.lines_deleted += change.deleted;
        }
    }

    // `sort_by` is stable, so equal keys keep first-seen order.
    authors.sort_by(|a, b| b.commits.cmp(&a.commits));
    files.sort_by(|a, b| b.total_changes().cmp(&a.total_changes()));

    StatsResult {
        total_commits: commits.len(),
        total_files: files.len(),
        total_lines_added: authors.iter().map(|a| a.lines_added).sum(),
        total_lines_deleted: authors.iter().map(|a| a.lines_deleted).sum(),
        author_stats: authors,
        file_stats: files,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::file::FileChange;

    fn commit(
        hash: &str,
        author: &str,
        email: &str,
        files: &[(&str, usize, usize)],
    ) -> CommitRecord {
        let files = files
            .iter()
            .map(|(file, added, deleted)| FileChange::new(*file, *added, *deleted))
            .collect();
        CommitRecord::new(hash, author, email, None, "msg").with_files(files)
    }

    #[test]
    fn test_generate_stats() {
        let commits = vec![
            commit(
                "a1",
                "John Doe",
                "john@example.com",
                &[("src/index.ts", 10, 2), ("src/utils.ts", 5, 0)],
            ),
            commit(
                "a2",
                "John Doe",
                "john@example.com",
                &[("src/index.ts", 3, 1), ("README.md", 20, 0)],
            ),
            commit(
                "a3",
                "Jane Smith",
                "jane@example.com",
                &[("src/feature.ts", 15, 5)],
            ),
        ];

        let stats = generate_stats(&commits);

        assert_eq!(stats.total_commits, 3);
        assert_eq!(stats.total_files, 4);
        assert_eq!(stats.total_lines_added, 53);
        assert_eq!(stats.total_lines_deleted, 8);

        assert_eq!(
            stats.author_stats,
            vec![
                AuthorStat {
                    author: "John Doe".into(),
                    email: "john@example.com".into(),
                    commits: 2,
                    // index.ts is counted once per commit
                    files_changed: 4,
                    lines_added: 38,
                    lines_deleted: 3,
                },
                AuthorStat {
                    author: "Jane Smith".into(),
                    email: "jane@example.com".into(),
                    commits: 1,
                    files_changed: 1,
                    lines_added: 15,
                    lines_deleted: 5,
                },
            ]
        );

        let index = stats
            .file_stats
            .iter()
            .find(|f| f.file == "src/index.ts")
            .unwrap();
        assert_eq!(
            (index.commits, index.lines_added, index.lines_deleted),
            (2, 13, 3)
        );
    }

    #[test]
    fn test_same_author_disjoint_files() {
        let commits = vec![
            commit("a1", "Ann", "ann@x", &[("a.rs", 1, 0), ("b.rs", 1, 0)]),
            commit(
                "a2",
                "Ann",
                "ann@x",
                &[("c.rs", 1, 0), ("d.rs", 1, 0), ("e.rs", 1, 0)],
            ),
        ];

        let stats = generate_stats(&commits);

        assert_eq!(stats.author_stats.len(), 1);
        assert_eq!(stats.author_stats[0].commits, 2);
        assert_eq!(stats.author_stats[0].files_changed, 5);
    }

    #[test]
    fn test_same_name_different_email_are_distinct_authors() {
        let commits = vec![
            commit("a1", "Ann", "ann@work", &[]),
            commit("a2", "Ann", "ann@home", &[]),
        ];

        let stats = generate_stats(&commits);

        assert_eq!(stats.author_stats.len(), 2);
        assert_eq!(stats.author_stats[0].email, "ann@work");
        assert_eq!(stats.author_stats[1].email, "ann@home");
    }

    #[test]
    fn test_shared_file_counts_commits_not_authors() {
        let commits = vec![
            commit("a1", "Ann", "ann@x", &[("src/index.ts", 4, 1)]),
            commit("b1", "Bob", "bob@x", &[("src/index.ts", 2, 2)]),
        ];

        let stats = generate_stats(&commits);

        assert_eq!(
            stats.file_stats,
            vec![FileStat {
                file: "src/index.ts".into(),
                commits: 2,
                lines_added: 6,
                lines_deleted: 3,
            }]
        );
        // each author counts the file on their own
        let per_author = stats
            .author_stats
            .iter()
            .map(|a| a.files_changed)
            .sum::<usize>();
        assert_eq!(per_author, 2);
        assert_eq!(stats.total_files, 1);
    }

    #[test]
    fn test_author_ties_keep_first_seen_order() {
        let commits = vec![
            commit("1", "Carol", "c@x", &[]),
            commit("2", "Alice", "a@x", &[]),
            commit("3", "Bob", "b@x", &[]),
            commit("4", "Dave", "d@x", &[]),
            commit("5", "Dave", "d@x", &[]),
        ];

        let stats = generate_stats(&commits);
        let order = stats
            .author_stats
            .iter()
            .map(|a| a.author.as_str())
            .collect::<Vec<_>>();

        assert_eq!(order, vec!["Dave", "Carol", "Alice", "Bob"]);
    }

    #[test]
    fn test_file_ties_keep_first_seen_order() {
        let commits = vec![commit(
            "1",
            "Ann",
            "ann@x",
            &[("z.rs", 1, 1), ("a.rs", 2, 0), ("big.rs", 10, 0), ("m.rs", 0, 2)],
        )];

        let stats = generate_stats(&commits);
        let order = stats
            .file_stats
            .iter()
            .map(|f| f.file.as_str())
            .collect::<Vec<_>>();

        assert_eq!(order, vec!["big.rs", "z.rs", "a.rs", "m.rs"]);
    }

    #[test]
    fn test_commits_without_file_stats() {
        let commits = vec![CommitRecord::new(
            "a1",
            "John Doe",
            "john@example.com",
            None,
            "Empty commit",
        )];

        let stats = generate_stats(&commits);

        assert_eq!(stats.total_commits, 1);
        assert_eq!(stats.total_files, 0);
        assert_eq!(stats.total_lines_added, 0);
        assert_eq!(stats.author_stats[0].commits, 1);
        assert_eq!(stats.author_stats[0].files_changed, 0);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(generate_stats(&[]), StatsResult::default());
    }
}
