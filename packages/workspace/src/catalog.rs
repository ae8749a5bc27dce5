//! Template definitions and where to find them

use crate::errors::{WorkspaceError, WorkspaceResult};
use crate::funnel::{FunnelStep, SeoMetadata, StepId};
use funnel_blocks::Block;
use funnel_editor::{Document, PageSettings, RuleSet};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::Path;

const BUILTIN_TEMPLATES: &[&str] = &[
    include_str!("../templates/lead-magnet.json"),
    include_str!("../templates/sales-page.json"),
    include_str!("../templates/webinar.json"),
];

/// Reusable multi-step composition. Block ids inside are placeholders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub steps: Vec<StepDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepDefinition {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub seo: SeoMetadata,
    #[serde(default)]
    pub settings: Option<Map<String, Value>>,
    /// Raw block definitions, normalized when instantiated
    #[serde(default)]
    pub blocks: Vec<Value>,
}

impl TemplateDefinition {
    /// Build concrete steps: fresh step ids, fresh block ids, normalized payloads
    pub fn instantiate(&self) -> WorkspaceResult<Vec<FunnelStep>> {
        if self.steps.is_empty() {
            return Err(WorkspaceError::EmptyTemplate(self.id.clone()));
        }

        let rules = RuleSet::new();
        self.steps
            .iter()
            .map(|step| {
                let mut blocks = Vec::with_capacity(step.blocks.len());
                for raw in &step.blocks {
                    let normalized = Block::from_raw(raw).map_err(|e| WorkspaceError::InvalidTemplate {
                        id: self.id.clone(),
                        message: format!("step {}: {}", step.slug, e),
                    })?;
                    if !normalized.dropped.is_empty() {
                        tracing::warn!(
                            "Template {} step {}: ignoring {:?}",
                            self.id,
                            step.slug,
                            normalized.dropped
                        );
                    }

                    let mut block = normalized.value.with_fresh_id();
                    rules.repair(&mut block);
                    blocks.push(block);
                }

                let mut content = Document::new(blocks, PageSettings::default());
                if let Some(settings) = &step.settings {
                    content = content.with_settings_patch(settings);
                }

                Ok(FunnelStep {
                    id: StepId::generate(),
                    name: step.name.clone(),
                    slug: step.slug.clone(),
                    seo: step.seo.clone(),
                    content,
                })
            })
            .collect()
    }
}

/// Source of template definitions
pub trait TemplateCatalog: Send + Sync {
    fn get(&self, template_id: &str) -> Option<TemplateDefinition>;

    fn list(&self) -> Vec<TemplateDefinition>;
}

/// Catalog held in memory, seeded from built-ins and/or directories
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    templates: BTreeMap<String, TemplateDefinition>,
}

impl StaticCatalog {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog with the templates shipped in this crate
    pub fn builtin() -> WorkspaceResult<Self> {
        let mut catalog = Self::empty();
        for source in BUILTIN_TEMPLATES {
            catalog.insert(serde_json::from_str(source)?);
        }
        Ok(catalog)
    }

    /// Add or replace a template by id
    pub fn insert(&mut self, template: TemplateDefinition) {
        let id = template.id.clone();
        if self.templates.insert(id.clone(), template).is_some() {
            tracing::debug!("Template {} overridden", id);
        }
    }

    /// Load every `*.json` file in `dir`. Returns how many were added.
    pub fn load_dir(&mut self, dir: &Path) -> WorkspaceResult<usize> {
        let mut paths: Vec<_> = std::fs::read_dir(dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
            .collect();
        paths.sort();

        for path in &paths {
            let text = std::fs::read_to_string(path)?;
            let template: TemplateDefinition = serde_json::from_str(&text)?;
            tracing::debug!("Loaded template {} from {}", template.id, path.display());
            self.insert(template);
        }
        Ok(paths.len())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

impl TemplateCatalog for StaticCatalog {
    fn get(&self, template_id: &str) -> Option<TemplateDefinition> {
        self.templates.get(template_id).cloned()
    }

    fn list(&self) -> Vec<TemplateDefinition> {
        self.templates.values().cloned().collect()
    }
}
