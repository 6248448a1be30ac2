use anyhow::{anyhow, Result};
use camino::Utf8PathBuf;

use super::{finish, spinner, Context};
use crate::{
    args::InitArgs,
    config::{Config, Project},
    date, render,
    scanner::RepositoryScanner,
};

/// Scans for repositories and writes them to a new configuration file.
pub async fn execute(ctx: &Context, args: &InitArgs) -> Result<()> {
    let target = target_path(ctx, args.global)?;

    if target.exists() && !args.force {
        let message = format!("Configuration already exists at {target}");
        println!("{}", render::render_info(&message));
        println!("{}", render::render_info("Use --force to overwrite it"));
        return Ok(());
    }

    let mut scanner = RepositoryScanner::new(args.scan_path.clone(), args.max_depth);
    scanner.runner = ctx.runner().clone();

    let pb = spinner(&format!("Scanning {} for Git repositories...", args.scan_path), true);
    let found = scanner.scan().await;
    finish(pb);

    if found.is_empty() {
        let message = format!("No Git repositories found in {}", args.scan_path);
        println!("{}", render::render_warning(&message));
    } else {
        let message = format!("Found {} Git repositories", found.len());
        println!("{}", render::render_success(&message));
        for repo in &found {
            let activity = repo
                .last_activity
                .as_ref()
                .map(|at| format!(" (last activity: {})", date::format_for_display(at)))
                .unwrap_or_default();
            println!("  • {} - {}{activity}", repo.name, repo.path);
            if let Some(description) = &repo.description {
                println!("    {description}");
            }
        }
    }

    let projects: Vec<Project> = found.into_iter().map(Project::from).collect();
    let count = projects.len();
    let config = Config::new(projects, args.default_since_days);
    config.save(&target)?;

    let message = format!("Configuration saved to {target} ({count} projects)");
    println!("{}", render::render_success(&message));
    println!("{}", render::render_header("Next steps"));
    println!("  git-scout projects        List configured projects");
    println!("  git-scout today           Show today's activity");
    println!("  git-scout stats -s 7d     Statistics for the last week");
    println!("  git-scout branches        List branches of a project");
    Ok(())
}

/// `--config` wins, then `--global`, then the local file.
fn target_path(ctx: &Context, global: bool) -> Result<Utf8PathBuf> {
    if let Some(path) = ctx.config_path() {
        return Ok(path.to_owned());
    }
    if global {
        return Config::global_path().ok_or_else(|| anyhow!("Cannot determine the home directory"));
    }
    Ok(Config::local_path())
}
