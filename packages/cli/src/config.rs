use anyhow::Context;
use funnel_editor::EditorConfig;
use funnel_workspace::StaticCatalog;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "funnel.config.json";

/// Funnel builder configuration file format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory holding funnel manifests and step documents
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Extra directories with template JSON files
    #[serde(default)]
    pub template_dirs: Vec<String>,

    /// Maximum undo levels per document (0 = unlimited)
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Default log filter when RUST_LOG is not set
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_data_dir() -> String {
    ".funnel".to_string()
}

fn default_history_limit() -> usize {
    EditorConfig::default().history_limit
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read {}", config_path.display()))?;
            let config: Config = serde_json::from_str(&content)
                .with_context(|| format!("Invalid config file {}", config_path.display()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn get_data_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.data_dir)
    }

    pub fn editor_config(&self) -> EditorConfig {
        EditorConfig {
            history_limit: self.history_limit,
        }
    }

    /// Built-in templates plus every configured template directory
    pub fn catalog(&self, cwd: &Path) -> anyhow::Result<StaticCatalog> {
        let mut catalog = StaticCatalog::builtin()?;
        for dir in &self.template_dirs {
            let path = cwd.join(dir);
            if !path.is_dir() {
                tracing::warn!("Template directory {} does not exist", path.display());
                continue;
            }
            let count = catalog
                .load_dir(&path)
                .with_context(|| format!("Failed to load templates from {}", path.display()))?;
            tracing::debug!("Loaded {} template(s) from {}", count, path.display());
        }
        Ok(catalog)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            template_dirs: vec![],
            history_limit: default_history_limit(),
            log_level: default_log_level(),
        }
    }
}
