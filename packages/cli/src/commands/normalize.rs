use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use funnel_editor::Document;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct NormalizeArgs {
    /// Stored step content (either historical shape)
    pub file: PathBuf,

    /// Rewrite the file in the current shape instead of printing it
    #[arg(short, long)]
    pub write: bool,
}

pub fn normalize(args: NormalizeArgs, cwd: &Path) -> Result<()> {
    let path = cwd.join(&args.file);
    let text = fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let raw: Value = serde_json::from_str(&text).with_context(|| format!("{} is not JSON", path.display()))?;

    let loaded = Document::load(&raw);
    for issue in &loaded.issues {
        eprintln!("  {} {:?}", "⚠️".yellow(), issue);
    }

    let output = serde_json::to_string_pretty(&loaded.document.to_value())?;
    if args.write {
        fs::write(&path, output)?;
        println!(
            "{} Normalized {} ({} blocks, {} issue(s))",
            "✓".green(),
            args.file.display(),
            loaded.document.len(),
            loaded.issues.len()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}
