use anyhow::Result;
use chrono::{DateTime, FixedOffset};
use serde_derive::Serialize;

use super::{
    finish, percentage, spinner,
    today::{Filters, TimeRange},
    Context,
};
use crate::{
    args::FilterArgs,
    config::Config,
    date,
    log::CommitRecord,
    query::LogQuery,
    render,
    stats::{generate_stats, AuthorStat, FileStat, StatsResult},
};

/// Lookback used when neither `--since` nor a configuration is available.
const FALLBACK_SINCE: &str = "7d";
const TEXT_FILE_LIMIT: usize = 25;
const JSON_FILE_LIMIT: usize = 50;
const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatsReport<'a> {
    project: &'a str,
    time_range: TimeRange<'a>,
    filters: Filters<'a>,
    summary: Summary,
    author_stats: &'a [AuthorStat],
    file_stats: &'a [FileStat],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    total_commits: usize,
    total_files: usize,
    total_lines_added: usize,
    total_lines_deleted: usize,
    unique_authors: usize,
    date_range: ActualRange,
}

/// Dates of the oldest and newest commit found.
#[derive(Serialize)]
struct ActualRange {
    earliest: Option<DateTime<FixedOffset>>,
    latest: Option<DateTime<FixedOffset>>,
}

impl ActualRange {
    /// `git log` lists newest first.
    fn of(commits: &[CommitRecord]) -> Self {
        Self {
            earliest: commits.last().and_then(|c| c.date()),
            latest: commits.first().and_then(|c| c.date()),
        }
    }
}

pub async fn execute(ctx: &Context, args: &FilterArgs) -> Result<()> {
    let project = ctx.resolve_project(args.project.as_deref()).await?;

    let since = since_window(args, ctx.config().ok());

    if !args.json {
        let title = format!("Generating statistics for: {}", project.name);
        println!("{}", render::render_info(&title));
        let since_at = date::format_for_display(&date::parse_date(&since)?);
        println!("{}", render::render_info(&format!("Time range: Since {since_at}")));
        if let Some(until) = &args.until {
            let until_at = date::format_for_display(&date::parse_date(until)?);
            println!("{}", render::render_info(&format!("Until: {until_at}")));
        }
        if let Some(author) = &args.author {
            println!("{}", render::render_info(&format!("Filtering by author: {author}")));
        }
        if let Some(branch) = &args.branch {
            println!("{}", render::render_info(&format!("Filtering by branch: {branch}")));
        }
    }

    let repo = ctx.open(&project).await?;
    let query = LogQuery {
        since: Some(since.clone()),
        until: args.until.clone(),
        author: args.author.clone(),
        branch: args.branch.clone(),
    };

    let pb = spinner("Analyzing repository history...", !args.json);
    let commits = repo.commits_with_stats(&query).await;
    finish(pb);
    let commits = commits?;

    let stats = generate_stats(&commits);
    let limit = file_limit(args);

    if args.json {
        let report = StatsReport {
            project: &project.name,
            time_range: TimeRange {
                since: Some(&since),
                until: args.until.as_deref(),
            },
            filters: Filters::of(args),
            summary: Summary {
                total_commits: stats.total_commits,
                total_files: stats.total_files,
                total_lines_added: stats.total_lines_added,
                total_lines_deleted: stats.total_lines_deleted,
                unique_authors: stats.author_stats.len(),
                date_range: ActualRange::of(&commits),
            },
            author_stats: &stats.author_stats,
            file_stats: &stats.file_stats[..limit.min(stats.file_stats.len())],
        };
        println!("{}", render::format_json(&report)?);
        return Ok(());
    }

    if commits.is_empty() {
        println!("{}", render::render_warning("No commits found for the specified criteria"));
        println!("{}", render::render_info("Try:"));
        println!("  • Expanding the time range (e.g., --since 30d)");
        println!("  • Removing author or branch filters");
        println!("  • Checking if the project has recent activity");
        return Ok(());
    }

    let title = format!("📈 Statistics - {} (Since {since})", project.name);
    println!("{}", render::render_header(&title));
    let range = ActualRange::of(&commits);
    if let (Some(earliest), Some(latest)) = (range.earliest, range.latest) {
        println!(
            "{}",
            render::render_info(&format!(
                "Actual range: {} to {}",
                date::format_for_display(&earliest),
                date::format_for_display(&latest)
            ))
        );
    }
    println!(
        "{}",
        render::render_info(&format!(
            "Found {} commits from {} author(s)",
            commits.len(),
            stats.author_stats.len()
        ))
    );

    println!("{}", render::render_complete_stats(&stats, Some(limit)));
    for line in detailed_insights(&stats, &commits) {
        println!("{}", render::render_info(&line));
    }
    Ok(())
}

/// `--since`, else the configured lookback in days, else [`FALLBACK_SINCE`].
fn since_window(args: &FilterArgs, config: Option<&Config>) -> String {
    match (&args.since, config) {
        (Some(since), _) => since.clone(),
        (None, Some(config)) => format!("{}d", config.default_since_days()),
        (None, None) => FALLBACK_SINCE.to_string(),
    }
}

/// `--limit`, else a longer default for JSON output than for the text tables.
fn file_limit(args: &FilterArgs) -> usize {
    let default = if args.json {
        JSON_FILE_LIMIT
    } else {
        TEXT_FILE_LIMIT
    };
    args.limit.unwrap_or(default)
}

/// Derived observations printed below the tables.
fn detailed_insights(stats: &StatsResult, commits: &[CommitRecord]) -> Vec<String> {
    let mut lines = Vec::new();

    if stats.author_stats.len() > 1 {
        let top = &stats.author_stats[0];
        lines.push(format!(
            "Most active contributor: {} ({}% of commits)",
            top.author,
            percentage(top.commits, stats.total_commits)
        ));
        let average = (stats.total_commits as f64 / stats.author_stats.len() as f64).round();
        lines.push(format!("Average commits per author: {average}"));
    }

    if let Some(top) = stats.file_stats.first() {
        lines.push(format!(
            "Most modified file: {} ({} lines changed)",
            top.file,
            top.total_changes()
        ));
        let repeated = stats.file_stats.iter().filter(|f| f.commits > 1).count();
        lines.push(format!(
            "Files modified multiple times: {repeated}/{}",
            stats.total_files
        ));
    }

    let net = stats.total_lines_added as i64 - stats.total_lines_deleted as i64;
    let kind = if net > 0 { "growth" } else { "reduction" };
    lines.push(format!("Net code {kind}: {} lines", net.abs()));

    if stats.total_lines_added > 0 {
        lines.push(format!(
            "Deletion ratio: {}% ({}/{})",
            percentage(stats.total_lines_deleted, stats.total_lines_added),
            stats.total_lines_deleted,
            stats.total_lines_added
        ));
    }

    let range = ActualRange::of(commits);
    if let (true, Some(earliest), Some(latest)) =
        (commits.len() > 1, range.earliest, range.latest)
    {
        let span = (latest - earliest).num_milliseconds() as f64;
        let days = (span / MILLIS_PER_DAY).round().max(1.0);
        let per_day = (commits.len() as f64 / days * 10.0).round() / 10.0;
        lines.push(format!("Average commits per day: {per_day} over {days} days"));
    }

    lines
}
