use anyhow::Result;
use chrono::Local;
use serde_derive::Serialize;

use super::{finish, percentage, spinner, Context};
use crate::{
    args::FilterArgs,
    date::{self, Instant},
    query::LogQuery,
    render,
    stats::{generate_stats, AuthorStat, FileStat, StatsResult},
};

const DEFAULT_FILE_LIMIT: usize = 20;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayReport<'a> {
    project: &'a str,
    time_range: TimeRange<'a>,
    filters: Filters<'a>,
    stats: TodayStats<'a>,
}

#[derive(Serialize)]
pub(crate) struct TimeRange<'a> {
    pub since: Option<&'a str>,
    pub until: Option<&'a str>,
}

#[derive(Serialize)]
pub(crate) struct Filters<'a> {
    pub author: Option<&'a str>,
    pub branch: Option<&'a str>,
}

impl<'a> Filters<'a> {
    pub fn of(args: &'a FilterArgs) -> Self {
        Self {
            author: args.author.as_deref(),
            branch: args.branch.as_deref(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TodayStats<'a> {
    total_commits: usize,
    total_files: usize,
    total_lines_added: usize,
    total_lines_deleted: usize,
    authors: &'a [AuthorStat],
    files: &'a [FileStat],
}

/// Activity of the current day, or of `--since`/`--until` when given.
pub async fn execute(ctx: &Context, args: &FilterArgs) -> Result<()> {
    let project = ctx.resolve_project(args.project.as_deref()).await?;
    let (since, until) = time_window(args, Local::now())?;

    if !args.json {
        let title = format!("Analyzing today's activity in: {}", project.name);
        println!("{}", render::render_info(&title));
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
        until: until.clone(),
        author: args.author.clone(),
        branch: args.branch.clone(),
    };

    let pb = spinner("Fetching commits and statistics...", !args.json);
    let commits = repo.commits_with_stats(&query).await;
    finish(pb);
    let commits = commits?;

    let stats = generate_stats(&commits);
    let limit = file_limit(args);

    if args.json {
        let report = TodayReport {
            project: &project.name,
            time_range: TimeRange {
                since: Some(&since),
                until: until.as_deref(),
            },
            filters: Filters::of(args),
            stats: TodayStats {
                total_commits: stats.total_commits,
                total_files: stats.total_files,
                total_lines_added: stats.total_lines_added,
                total_lines_deleted: stats.total_lines_deleted,
                authors: &stats.author_stats,
                files: &stats.file_stats[..limit.min(stats.file_stats.len())],
            },
        };
        println!("{}", render::format_json(&report)?);
        return Ok(());
    }

    if commits.is_empty() {
        println!("{}", render::render_warning("No commits found for the specified criteria"));
        return Ok(());
    }

    let title = match args.since {
        None => "Today".to_string(),
        Some(_) => format!("Since {since}"),
    };
    println!("{}", render::render_header(&format!("📊 {title}'s Activity - {}", project.name)));
    println!("{}", render::render_info(&format!("Timezone: {}", date::timezone_name())));
    if let Some(latest) = commits.first().and_then(|c| c.date()) {
        let latest = date::format_for_display(&latest);
        println!("{}", render::render_info(&format!("Latest activity: {latest}")));
    }

    println!("{}", render::render_complete_stats(&stats, Some(limit)));
    println!("{}", render::render_header("💡 Insights"));
    for line in insights(&stats) {
        println!("{}", render::render_info(&line));
    }
    Ok(())
}

/// Without `--since` the window is the local day containing `now`, unless `--until` closes it
/// earlier. With `--since` both bounds are taken as given.
fn time_window(args: &FilterArgs, now: Instant) -> Result<(String, Option<String>)> {
    if let Some(since) = &args.since {
        return Ok((since.clone(), args.until.clone()));
    }

    let until = match &args.until {
        Some(until) => until.clone(),
        None => date::format_for_git(&date::end_of_day(now)?),
    };
    Ok((date::format_for_git(&date::start_of_day(now)?), Some(until)))
}

fn file_limit(args: &FilterArgs) -> usize {
    args.limit.unwrap_or(DEFAULT_FILE_LIMIT)
}

fn insights(stats: &StatsResult) -> Vec<String> {
    let mut lines = Vec::new();

    if stats.author_stats.len() > 1 {
        let top = &stats.author_stats[0];
        let share = percentage(top.commits, stats.total_commits);
        lines.push(format!("Most active: {} ({share}% of commits)", top.author));
    }

    if let Some(top) = stats.file_stats.first() {
        lines.push(format!(
            "Most changed file: {} ({} lines)",
            top.file,
            top.total_changes()
        ));
    }

    let net = stats.total_lines_added as i64 - stats.total_lines_deleted as i64;
    let kind = if net > 0 { "additions" } else { "deletions" };
    lines.push(format!("Net changes: {} lines {kind}", net.abs()));

    lines
}
