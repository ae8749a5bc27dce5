use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::fs;
use std::path::Path;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Storage directory for funnels and steps
    #[arg(short, long, default_value = ".funnel")]
    pub data_dir: String,

    /// Maximum undo levels per document
    #[arg(long, default_value_t = 100)]
    pub history_limit: usize,

    /// Force overwrite existing config
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &Path) -> Result<()> {
    let config_path = cwd.join(DEFAULT_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!("{} {} already exists", "⚠️".yellow(), DEFAULT_CONFIG_NAME.bright_white());
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!("{}", "📝 Initializing funnel workspace...".bright_blue().bold());

    let data_dir = cwd.join(&args.data_dir);
    if !data_dir.exists() {
        fs::create_dir_all(data_dir.join("funnels"))?;
        fs::create_dir_all(data_dir.join("steps"))?;
        println!("  {} Created {}/", "✓".green(), args.data_dir);
    }

    let config = Config {
        data_dir: args.data_dir.clone(),
        template_dirs: vec!["templates".to_string()],
        history_limit: args.history_limit,
        ..Config::default()
    };
    fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;

    println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    println!();
    println!("{}", "✅ Workspace initialized!".green().bold());
    println!();
    println!("Next steps:");
    println!("  1. Run: funnel new my-funnel");
    println!("  2. Run: funnel templates");
    println!("  3. Run: funnel apply my-funnel lead-magnet");

    Ok(())
}
