use anyhow::Result;

use super::Context;
use crate::{render, repository::is_git_repository};

/// Lists configured projects, warning about entries that are not git repositories.
pub async fn execute(ctx: &Context, json: bool) -> Result<()> {
    let config = ctx.config()?;
    let projects = config.projects();

    if json {
        println!("{}", render::format_json(&projects)?);
        return Ok(());
    }

    println!("{}", render::render_header("📁 Configured Projects"));

    let mut valid = Vec::with_capacity(projects.len());
    for project in projects {
        if is_git_repository(ctx.runner(), &project.path).await {
            valid.push(project.clone());
        } else {
            let message = format!("Project \"{}\" is not a valid Git repository", project.name);
            println!("{}", render::render_warning(&message));
        }
    }

    if valid.is_empty() {
        println!("{}", render::render_error("No valid Git projects found in configuration"));
        return Ok(());
    }

    println!("{}", render::render_projects(&valid));
    Ok(())
}
