use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use funnel_workspace::{Funnel, JsonFileGateway};
use std::path::Path;

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Funnel id (used as the storage file name)
    pub funnel_id: String,

    /// Display name (defaults to the id)
    #[arg(short, long)]
    pub name: Option<String>,
}

pub async fn new_funnel(args: NewArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let gateway = JsonFileGateway::new(config.get_data_dir(cwd));

    let name = args.name.unwrap_or_else(|| args.funnel_id.clone());
    let funnel = Funnel::with_landing_step(&args.funnel_id, name);
    gateway.create_funnel(&funnel).await?;

    println!("{} Created funnel {}", "✓".green(), funnel.id.bright_white().bold());
    for step in &funnel.steps {
        println!("  /{} {} {}", step.slug, step.name, step.id.to_string().dimmed());
    }

    Ok(())
}
