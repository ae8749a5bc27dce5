mod commands;
mod config;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    apply, init, inspect, new_funnel, normalize, templates, ApplyArgs, InitArgs, InspectArgs, NewArgs,
    NormalizeArgs, TemplatesArgs,
};
use config::Config;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Funnel CLI - build marketing funnels from composable blocks
#[derive(Parser, Debug)]
#[command(name = "funnel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Initialize a funnel workspace in the current directory
    Init(InitArgs),

    /// List available templates
    Templates(TemplatesArgs),

    /// Create a funnel with a single empty landing step
    New(NewArgs),

    /// Replace every step of a funnel with a template
    Apply(ApplyArgs),

    /// Show the normalized content of a step
    Inspect(InspectArgs),

    /// Convert stored step content to the current shape
    Normalize(NormalizeArgs),
}

fn init_logging(cwd: &Path) {
    let level = Config::load(cwd)
        .map(|config| config.log_level)
        .unwrap_or_else(|_| Config::default().log_level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(command: Command, cwd: &Path) -> anyhow::Result<()> {
    match command {
        Command::Init(args) => init(args, cwd),
        Command::Templates(args) => templates(args, cwd),
        Command::New(args) => new_funnel(args, cwd).await,
        Command::Apply(args) => apply(args, cwd).await,
        Command::Inspect(args) => inspect(args, cwd).await,
        Command::Normalize(args) => normalize(args, cwd),
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match std::env::current_dir() {
        Ok(cwd) => {
            init_logging(&cwd);
            run(cli.command, &cwd).await
        }
        Err(e) => Err(anyhow::anyhow!("Cannot get current directory: {}", e)),
    };

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {:#}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}
