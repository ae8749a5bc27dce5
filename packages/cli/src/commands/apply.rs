use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use funnel_workspace::{AlwaysDiscard, EditorSession, JsonFileGateway};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Funnel to replace
    pub funnel_id: String,

    /// Template to apply
    pub template_id: String,
}

pub async fn apply(args: ApplyArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let catalog = config.catalog(cwd)?;
    let gateway = Arc::new(JsonFileGateway::new(config.get_data_dir(cwd)));

    let mut session = EditorSession::open(gateway, &args.funnel_id, config.editor_config()).await?;

    println!(
        "{}",
        format!("🧩 Applying {} to {}...", args.template_id, args.funnel_id)
            .bright_blue()
            .bold()
    );

    // A freshly opened session has nothing unsaved to lose
    session
        .apply_template(&catalog, &args.template_id, &AlwaysDiscard)
        .await?;

    for step in &session.funnel().steps {
        println!(
            "  {} /{} {} ({} blocks) {}",
            "✓".green(),
            step.slug,
            step.name,
            step.content.len(),
            step.id.to_string().dimmed()
        );
    }
    println!();
    println!("{}", "✅ Template applied!".green().bold());

    Ok(())
}
