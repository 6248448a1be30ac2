use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use git_scout::{
    args::{Args, Command},
    commands::{self, Context},
    render,
};

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", render::render_error(&format!("{e:#}")));
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let ctx = Context::new(args.config)?;

    runtime.block_on(async {
        match &args.command {
            Command::Projects { json } => commands::projects::execute(&ctx, *json).await,
            Command::Branches(branches) => commands::branches::execute(&ctx, branches).await,
            Command::Today(filter) => commands::today::execute(&ctx, filter).await,
            Command::Stats(filter) => commands::stats::execute(&ctx, filter).await,
            Command::Init(init) => commands::init::execute(&ctx, init).await,
        }
    })
}

/// Logs go to stderr so JSON output on stdout stays clean. `RUST_LOG` overrides `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
