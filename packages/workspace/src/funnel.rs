//! Funnels and their steps

use funnel_blocks::next_token;
use funnel_editor::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque step identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(String);

impl StepId {
    pub fn generate() -> Self {
        Self(next_token("step"))
    }

    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StepId {
    fn from(raw: &str) -> Self {
        Self::from_raw(raw)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SeoMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub og_image: Option<String>,
}

/// One page of a funnel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelStep {
    pub id: StepId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub seo: SeoMetadata,
    /// Last content known to be persisted
    #[serde(default)]
    pub content: Document,
}

impl FunnelStep {
    /// Empty step with a fresh id
    pub fn new(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id: StepId::generate(),
            name: name.into(),
            slug: slug.into(),
            seo: SeoMetadata::default(),
            content: Document::empty(),
        }
    }

    pub fn manifest(&self) -> StepManifest {
        StepManifest {
            id: self.id.clone(),
            name: self.name.clone(),
            slug: self.slug.clone(),
            seo: self.seo.clone(),
        }
    }
}

/// A step without its content, as listed in a funnel manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepManifest {
    pub id: StepId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub seo: SeoMetadata,
}

impl StepManifest {
    pub fn with_content(self, content: Document) -> FunnelStep {
        FunnelStep {
            id: self.id,
            name: self.name,
            slug: self.slug,
            seo: self.seo,
            content,
        }
    }
}

/// Ordered sequence of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Funnel {
    pub id: String,
    pub name: String,
    pub steps: Vec<FunnelStep>,
}

impl Funnel {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            steps: Vec::new(),
        }
    }

    /// A new funnel with a single empty landing step
    pub fn with_landing_step(id: impl Into<String>, name: impl Into<String>) -> Self {
        let mut funnel = Self::new(id, name);
        funnel.steps.push(FunnelStep::new("Landing page", "landing"));
        funnel
    }

    pub fn step(&self, id: &StepId) -> Option<&FunnelStep> {
        self.steps.iter().find(|step| &step.id == id)
    }

    pub fn step_mut(&mut self, id: &StepId) -> Option<&mut FunnelStep> {
        self.steps.iter_mut().find(|step| &step.id == id)
    }

    pub fn first_step(&self) -> Option<&FunnelStep> {
        self.steps.first()
    }

    pub fn manifest(&self) -> FunnelManifest {
        FunnelManifest {
            id: self.id.clone(),
            name: self.name.clone(),
            steps: self.steps.iter().map(FunnelStep::manifest).collect(),
            updated_at: None,
        }
    }
}

/// Persisted funnel record; step contents are stored separately
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunnelManifest {
    pub id: String,
    pub name: String,
    pub steps: Vec<StepManifest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
}
