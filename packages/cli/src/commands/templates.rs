use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use funnel_workspace::TemplateCatalog;
use std::path::Path;

#[derive(Debug, Args)]
pub struct TemplatesArgs {
    /// Show each template's steps
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn templates(args: TemplatesArgs, cwd: &Path) -> Result<()> {
    let config = Config::load(cwd)?;
    let catalog = config.catalog(cwd)?;
    let templates = catalog.list();

    if templates.is_empty() {
        println!("{}", "⚠️  No templates found".yellow());
        return Ok(());
    }

    println!("{}", "📚 Available templates".bright_blue().bold());
    for template in &templates {
        println!(
            "  {} {} ({} steps)",
            template.id.bright_white().bold(),
            template.name,
            template.steps.len()
        );
        if !template.description.is_empty() {
            println!("      {}", template.description.dimmed());
        }
        if args.verbose {
            for step in &template.steps {
                println!("      - /{} {} ({} blocks)", step.slug, step.name, step.blocks.len());
            }
        }
    }

    Ok(())
}
