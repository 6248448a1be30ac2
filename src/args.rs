use camino::Utf8PathBuf;
use clap::{Args as ClapArgs, Parser, Subcommand};

/// Command line arguments
#[derive(Parser)]
#[clap(name = "git-scout", about, version)]
pub struct Args {
    /// Path to TOML configuration file (default: ~/.git-scout/config.toml, then ./git-scout.toml)
    #[clap(short = 'f', long, global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Print debug logs to stderr
    #[clap(short, long, global = true)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// List configured projects
    Projects {
        /// Output results in JSON format
        #[clap(long)]
        json: bool,
    },

    /// List branches and view branch details
    Branches(BranchesArgs),

    /// Show today's activity statistics
    Today(FilterArgs),

    /// Generate statistics for a project
    Stats(FilterArgs),

    /// Find git repositories and write a configuration file
    Init(InitArgs),
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Project name to analyze
    #[clap(short, long)]
    pub project: Option<String>,

    /// Start date (e.g. 7d, today, yesterday, "today 09:00", 2025-09-01)
    #[clap(short, long)]
    pub since: Option<String>,

    /// End date
    #[clap(short, long)]
    pub until: Option<String>,

    /// Filter by author name or email
    #[clap(short, long)]
    pub author: Option<String>,

    /// Filter by branch
    #[clap(short, long)]
    pub branch: Option<String>,

    /// Limit number of files shown
    #[clap(short, long)]
    pub limit: Option<usize>,

    /// Output results in JSON format
    #[clap(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct BranchesArgs {
    /// Project name to analyze
    #[clap(short, long)]
    pub project: Option<String>,

    /// Include remote branches
    #[clap(short, long)]
    pub remote: bool,

    /// Count commits since date when showing a branch (default: configured lookback)
    #[clap(short, long)]
    pub since: Option<String>,

    /// Show details of this branch
    #[clap(short, long)]
    pub branch: Option<String>,

    /// Also show full statistics for the selected branch
    #[clap(long, requires = "branch")]
    pub stats: bool,

    /// Output results in JSON format
    #[clap(long)]
    pub json: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InitArgs {
    /// Directory to scan for repositories
    #[clap(long, default_value = ".")]
    pub scan_path: Utf8PathBuf,

    /// Max depth of the scan
    #[clap(short, long, default_value = "3")]
    pub max_depth: usize,

    /// Save to ~/.git-scout/config.toml instead of ./git-scout.toml
    #[clap(short, long)]
    pub global: bool,

    /// Default number of days to look back for statistics
    #[clap(short, long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub default_since_days: u32,

    /// Overwrite an existing configuration file
    #[clap(long)]
    pub force: bool,
}
