use anyhow::{bail, Result};
use serde_derive::Serialize;

use super::{finish, spinner, Context};
use crate::{
    args::BranchesArgs,
    config::Config,
    date,
    log::{BranchInfo, CommitRecord},
    query::LogQuery,
    render,
    repository::{GitRepository, Opened},
    stats::{generate_stats, StatsResult},
};

const RECENT_COMMITS: usize = 5;
const BRANCH_FILE_LIMIT: usize = 10;
/// Lookback in days for branch details when there is no configuration.
const FALLBACK_SINCE_DAYS: u32 = 1;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchesReport<'a> {
    project: &'a str,
    current_branch: &'a str,
    branches: &'a [BranchInfo],
    #[serde(skip_serializing_if = "Option::is_none")]
    remote_branches: Option<&'a [String]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<BranchDetail>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BranchDetail {
    branch: BranchInfo,
    since: String,
    commit_count: usize,
    recent_commits: Vec<CommitRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stats: Option<StatsResult>,
}

/// Lists local branches with their tip commit, optionally remote names and details of one branch.
pub async fn execute(ctx: &Context, args: &BranchesArgs) -> Result<()> {
    let project = ctx.resolve_project(args.project.as_deref()).await?;
    let repo = ctx.open(&project).await?;

    let pb = spinner("Fetching branch information...", !args.json);
    let listing = async {
        let branches = repo.branch_info(None).await?;
        let current = repo.current_branch().await?;
        let remote = if args.remote {
            Some(repo.branch_names(true).await?)
        } else {
            None
        };
        Ok::<_, crate::error::Error>((branches, current, remote))
    }
    .await;
    finish(pb);
    let (branches, current, remote) = listing?;

    let detail = match &args.branch {
        Some(name) => Some(branch_detail(ctx, &repo, &branches, name, args).await?),
        None => None,
    };

    if args.json {
        let report = BranchesReport {
            project: &project.name,
            current_branch: &current,
            branches: &branches,
            remote_branches: remote.as_deref(),
            detail,
        };
        println!("{}", render::format_json(&report)?);
        return Ok(());
    }

    println!("{}", render::render_header(&format!("🌿 Branches - {}", project.name)));
    if branches.is_empty() {
        println!("{}", render::render_warning("No branches found"));
    } else {
        let current = (!current.is_empty()).then_some(current.as_str());
        println!("{}", render::render_branches(&branches, current));
    }

    if let Some(remote) = &remote {
        println!("{}", render::render_header("🌐 All Branches (local and remote)"));
        for name in remote {
            println!("  {name}");
        }
    }

    if let Some(detail) = &detail {
        print_detail(detail);
    }
    Ok(())
}

async fn branch_detail(
    ctx: &Context,
    repo: &GitRepository<Opened>,
    branches: &[BranchInfo],
    name: &str,
    args: &BranchesArgs,
) -> Result<BranchDetail> {
    let branch = find_branch(branches, name)?;
    let since = detail_since(args, ctx.config().ok());
    let query = LogQuery::default().since(since.as_str()).branch(name);

    let pb = spinner(&format!("Loading commits on {name}..."), !args.json);
    let loaded = async {
        let commits = repo.commits(&query).await?;
        let stats = if args.stats {
            let detailed = repo.commits_with_stats(&query).await?;
            Some(generate_stats(&detailed))
        } else {
            None
        };
        Ok::<_, crate::error::Error>((commits, stats))
    }
    .await;
    finish(pb);
    let (commits, stats) = loaded?;

    Ok(BranchDetail {
        branch,
        since,
        commit_count: commits.len(),
        recent_commits: commits.into_iter().take(RECENT_COMMITS).collect(),
        stats,
    })
}

fn find_branch(branches: &[BranchInfo], name: &str) -> Result<BranchInfo> {
    match branches.iter().find(|b| b.name == name) {
        Some(branch) => Ok(branch.clone()),
        None => bail!("Branch \"{name}\" not found"),
    }
}

/// `--since`, else the configured lookback in days.
fn detail_since(args: &BranchesArgs, config: Option<&Config>) -> String {
    if let Some(since) = &args.since {
        return since.clone();
    }
    let days = config.map_or(FALLBACK_SINCE_DAYS, Config::default_since_days);
    format!("{days}d")
}

fn print_detail(detail: &BranchDetail) {
    println!("{}", render::render_branch_detail(&detail.branch, Some(detail.commit_count)));

    if detail.recent_commits.is_empty() {
        println!("{}", render::render_info(&format!("No commits since {}", detail.since)));
    } else {
        let title = format!("📝 Recent commits (since {})", detail.since);
        println!("{}", render::render_header(&title));
        for commit in &detail.recent_commits {
            let when = commit
                .date()
                .as_ref()
                .map(date::format_for_display)
                .unwrap_or_default();
            println!("{} - {} - {}", commit.short_hash(), commit.author(), when);
            println!("  {}", commit.message());
        }
    }

    if let Some(stats) = &detail.stats {
        if stats.total_commits == 0 {
            println!("{}", render::render_warning("No commits to analyze for this branch"));
        } else {
            println!("{}", render::render_complete_stats(stats, Some(BRANCH_FILE_LIMIT)));
        }
    }
}
