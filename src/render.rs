//! Text and JSON rendering of projects, branches and statistics.

use serde::Serialize;

use crate::{
    config::Project,
    date,
    log::BranchInfo,
    stats::{AuthorStat, FileStat, StatsResult},
};

/// A fixed-width text table. Cells longer than their column are cut with `...`.
struct Table {
    widths: Vec<usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// `columns` pairs each heading with its column width.
    fn new(columns: &[(&str, usize)]) -> Self {
        Self {
            widths: columns.iter().map(|(_, width)| *width).collect(),
            rows: vec![columns.iter().map(|(head, _)| head.to_string()).collect()],
        }
    }

    fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rule = self
            .widths
            .iter()
            .map(|w| "-".repeat(w + 2))
            .collect::<Vec<_>>()
            .join("+");
        writeln!(f, "+{rule}+")?;
        for (i, row) in self.rows.iter().enumerate() {
            let cells = row
                .iter()
                .zip(&self.widths)
                .map(|(cell, &width)| format!(" {:<width$} ", truncate(cell, width)))
                .collect::<Vec<_>>();
            writeln!(f, "|{}|", cells.join("|"))?;
            if i == 0 {
                writeln!(f, "+{rule}+")?;
            }
        }
        write!(f, "+{rule}+")
    }
}

/// Cuts `text` to at most `max` characters, ending in `...` when shortened.
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept = text.chars().take(max.saturating_sub(3)).collect::<String>();
    format!("{kept}...")
}

pub fn render_projects(projects: &[Project]) -> String {
    let mut table = Table::new(&[("NAME", 23), ("PATH", 58), ("STATUS", 13)]);
    for project in projects {
        table.push(vec![
            project.name.clone(),
            project.path.to_string(),
            "✓ Valid".to_string(),
        ]);
    }
    table.to_string()
}

/// Branch table with the checked out branch marked by `*`.
pub fn render_branches(branches: &[BranchInfo], current: Option<&str>) -> String {
    let mut table = Table::new(&[
        ("BRANCH", 18),
        ("LAST COMMIT", 11),
        ("AUTHOR", 18),
        ("DATE", 18),
        ("MESSAGE", 45),
    ]);
    for branch in branches {
        let name = if Some(branch.name.as_str()) == current {
            format!("* {}", branch.name)
        } else {
            branch.name.clone()
        };
        table.push(vec![
            name,
            branch.last_commit_hash.clone(),
            branch.last_commit_author.clone(),
            branch.last_commit_date.as_ref().map(date::format_for_display).unwrap_or_default(),
            branch.last_commit_message.clone(),
        ]);
    }
    table.to_string()
}

pub fn render_author_stats(stats: &[AuthorStat]) -> String {
    let mut table = Table::new(&[
        ("AUTHOR", 23),
        ("COMMITS", 8),
        ("FILES", 8),
        ("+LINES", 8),
        ("-LINES", 8),
    ]);
    for stat in stats {
        table.push(vec![
            stat.author.clone(),
            stat.commits.to_string(),
            stat.files_changed.to_string(),
            format!("+{}", stat.lines_added),
            format!("-{}", stat.lines_deleted),
        ]);
    }
    table.to_string()
}

pub fn render_file_stats(stats: &[FileStat], limit: Option<usize>) -> String {
    let shown = limit.map_or(stats, |n| &stats[..n.min(stats.len())]);
    let mut table = Table::new(&[
        ("FILE", 48),
        ("COMMITS", 8),
        ("+LINES", 8),
        ("-LINES", 8),
    ]);
    for stat in shown {
        table.push(vec![
            stat.file.clone(),
            stat.commits.to_string(),
            format!("+{}", stat.lines_added),
            format!("-{}", stat.lines_deleted),
        ]);
    }
    table.to_string()
}

pub fn render_total_summary(stats: &StatsResult) -> String {
    let mut table = Table::new(&[
        ("TOTAL", 9),
        ("COMMITS", 8),
        ("FILES", 8),
        ("+LINES", 8),
        ("-LINES", 8),
    ]);
    table.push(vec![
        "SUMMARY".to_string(),
        stats.total_commits.to_string(),
        stats.total_files.to_string(),
        format!("+{}", stats.total_lines_added),
        format!("-{}", stats.total_lines_deleted),
    ]);
    format!("\n{table}")
}

/// Author table, file table (when any file was touched) and totals.
pub fn render_complete_stats(stats: &StatsResult, file_limit: Option<usize>) -> String {
    let mut output = String::new();
    output += &render_header("📊 BY AUTHOR");
    output += &render_author_stats(&stats.author_stats);
    if !stats.file_stats.is_empty() {
        output += "\n";
        output += &render_header("📁 BY FILE (Top Changes)");
        output += &render_file_stats(&stats.file_stats, file_limit);
    }
    output += "\n";
    output += &render_total_summary(stats);
    output
}

pub fn render_branch_detail(branch: &BranchInfo, commit_count: Option<usize>) -> String {
    let mut output = render_header(&format!("🌿 Branch: {}", branch.name));
    output += &format!("Latest commit: {}\n", branch.last_commit_hash);
    output += &format!("Author: {}\n", branch.last_commit_author);
    output += &format!(
        "Date: {}\n",
        branch.last_commit_date.as_ref().map(date::format_for_display).unwrap_or_default()
    );
    output += &format!("Message: {}\n", branch.last_commit_message);
    if let Some(count) = commit_count {
        output += &format!("Recent commits: {count}\n");
    }
    output
}

pub fn render_error(message: &str) -> String {
    format!("❌ Error: {message}")
}

pub fn render_success(message: &str) -> String {
    format!("✅ {message}")
}

pub fn render_info(message: &str) -> String {
    format!("ℹ️  {message}")
}

pub fn render_warning(message: &str) -> String {
    format!("⚠️  {message}")
}

pub fn render_header(title: &str) -> String {
    format!("\n{title}\n{}\n", "=".repeat(title.chars().count()))
}

pub fn format_json<T: Serialize>(data: &T) -> serde_json::Result<String> {
    serde_json::to_string_pretty(data)
}
