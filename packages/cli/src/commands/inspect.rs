use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use funnel_editor::Document;
use funnel_workspace::{JsonFileGateway, PersistenceGateway, StepId};
use std::path::Path;

#[derive(Debug, Args)]
pub struct InspectArgs {
    /// Step to inspect
    pub step_id: String,

    /// Print the normalized document as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn inspect(args: InspectArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let gateway = JsonFileGateway::new(config.get_data_dir(cwd));

    let raw = gateway.load_step(&StepId::from_raw(args.step_id.as_str())).await?;
    let loaded = Document::load(&raw);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&loaded.document.to_value())?);
        return Ok(());
    }

    let document = &loaded.document;
    let settings = document.page_settings();
    println!("{} {}", "Step".bright_blue().bold(), args.step_id.bright_white());
    println!("  background: {}  padding: {}", settings.background_color, settings.padding);
    println!();

    if document.is_empty() {
        println!("  {}", "(no blocks)".dimmed());
    }
    for (index, block) in document.blocks().iter().enumerate() {
        println!("  {:>3}. {:<14} {}", index, block.kind().tag(), block.id.to_string().dimmed());
    }

    if !loaded.is_clean() {
        println!();
        println!("{} {} issue(s) repaired while loading:", "⚠️".yellow(), loaded.issues.len());
        for issue in &loaded.issues {
            println!("  - {:?}", issue);
        }
    }

    Ok(())
}
