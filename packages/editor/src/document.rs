//! # Document
//!
//! The content of one funnel step: an ordered block list plus page-level
//! settings. Block order is the vector order.
//!
//! ## Persisted shapes
//!
//! Storage holds one of two historical shapes:
//!
//! ```text
//! legacy:   [ block, block, ... ]
//! current:  { "blocks": [ block, ... ], "settings": { ... } }
//! ```
//!
//! [`Document::load`] normalizes both into the same in-memory value. Anything
//! else is malformed and degrades to an empty document with default settings.
//! Documents are always written back in the current shape.

use crate::validation::RuleSet;
use crate::EditorError;
use funnel_blocks::normalize::{merge_payload, normalize_payload};
use funnel_blocks::{Block, BlockId};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::HashSet;
use std::str::FromStr;

/// Page-level settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSettings {
    pub background_color: String,
    pub padding: String,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self {
            background_color: "#ffffff".to_string(),
            padding: "0px".to_string(),
        }
    }
}

impl PageSettings {
    pub fn get(&self, key: PageSettingKey) -> &str {
        match key {
            PageSettingKey::BackgroundColor => &self.background_color,
            PageSettingKey::Padding => &self.padding,
        }
    }

    pub(crate) fn set(&mut self, key: PageSettingKey, value: String) {
        match key {
            PageSettingKey::BackgroundColor => self.background_color = value,
            PageSettingKey::Padding => self.padding = value,
        }
    }
}

/// Name of a page setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageSettingKey {
    BackgroundColor,
    Padding,
}

impl FromStr for PageSettingKey {
    type Err = EditorError;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key {
            "backgroundColor" | "background_color" => Ok(PageSettingKey::BackgroundColor),
            "padding" => Ok(PageSettingKey::Padding),
            other => Err(EditorError::UnknownPageSetting(other.to_string())),
        }
    }
}

/// Something the loader had to fix or throw away
#[derive(Debug, Clone, PartialEq)]
pub enum LoadIssue {
    /// Content matched neither historical shape
    MalformedLegacyContent,
    /// Block could not be kept at all (unknown type, not an object)
    DroppedBlock { index: usize, reason: String },
    /// Block kept, but some keys were discarded
    RepairedBlock { id: BlockId, dropped: Vec<String> },
    /// Id already used earlier in the list; block got a new one
    DuplicateId { original: BlockId, replacement: BlockId },
    /// A validation rule had to repair the block
    RuleRepair { id: BlockId, rule: &'static str },
    /// Page settings keys were discarded
    RepairedSettings { dropped: Vec<String> },
}

/// Result of loading stored content
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    pub document: Document,
    pub issues: Vec<LoadIssue>,
}

impl LoadedDocument {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Ordered blocks plus page settings. Block ids are unique.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub(crate) blocks: Vec<Block>,
    pub(crate) page_settings: PageSettings,
}

impl Document {
    /// Build a document, re-minting any duplicate ids
    pub fn new(blocks: Vec<Block>, page_settings: PageSettings) -> Self {
        let mut seen = HashSet::new();
        let blocks = blocks
            .into_iter()
            .map(|block| {
                if seen.insert(block.id.clone()) {
                    block
                } else {
                    let block = block.with_fresh_id();
                    seen.insert(block.id.clone());
                    block
                }
            })
            .collect();

        Self {
            blocks,
            page_settings,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Normalize stored content with the default rule set
    pub fn load(raw: &Value) -> LoadedDocument {
        Self::load_with_rules(raw, &RuleSet::default())
    }

    pub fn load_with_rules(raw: &Value, rules: &RuleSet) -> LoadedDocument {
        let mut issues = Vec::new();

        let (raw_blocks, raw_settings): (&[Value], Option<&Value>) = match raw {
            Value::Null => (&[], None),
            Value::Array(items) => (items.as_slice(), None),
            Value::Object(fields) => match fields.get("blocks") {
                Some(Value::Array(items)) => (
                    items.as_slice(),
                    fields.get("settings").or_else(|| fields.get("pageSettings")),
                ),
                _ => {
                    tracing::warn!("Stored content has no block list, starting empty");
                    issues.push(LoadIssue::MalformedLegacyContent);
                    (&[], None)
                }
            },
            _ => {
                tracing::warn!("Stored content matches no known shape, starting empty");
                issues.push(LoadIssue::MalformedLegacyContent);
                (&[], None)
            }
        };

        let mut seen = HashSet::new();
        let mut blocks = Vec::with_capacity(raw_blocks.len());

        for (index, raw_block) in raw_blocks.iter().enumerate() {
            let normalized = match Block::from_raw(raw_block) {
                Ok(normalized) => normalized,
                Err(e) => {
                    tracing::warn!("Dropping stored block #{}: {}", index, e);
                    issues.push(LoadIssue::DroppedBlock {
                        index,
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            let mut block = normalized.value;
            if !normalized.dropped.is_empty() {
                tracing::debug!("Repaired block {}: dropped {:?}", block.id, normalized.dropped);
                issues.push(LoadIssue::RepairedBlock {
                    id: block.id.clone(),
                    dropped: normalized.dropped,
                });
            }

            if seen.contains(&block.id) {
                let original = block.id.clone();
                block = block.with_fresh_id();
                issues.push(LoadIssue::DuplicateId {
                    original,
                    replacement: block.id.clone(),
                });
            }
            seen.insert(block.id.clone());

            for rule in rules.repair(&mut block) {
                tracing::warn!("Rule {} repaired stored block {}", rule, block.id);
                issues.push(LoadIssue::RuleRepair {
                    id: block.id.clone(),
                    rule,
                });
            }

            blocks.push(block);
        }

        let settings = normalize_payload::<PageSettings>(raw_settings.unwrap_or(&Value::Null));
        if !settings.dropped.is_empty() {
            issues.push(LoadIssue::RepairedSettings {
                dropped: settings.dropped,
            });
        }

        LoadedDocument {
            document: Document {
                blocks,
                page_settings: settings.value,
            },
            issues,
        }
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn page_settings(&self) -> &PageSettings {
        &self.page_settings
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn index_of(&self, id: &BlockId) -> Option<usize> {
        self.blocks.iter().position(|block| &block.id == id)
    }

    pub fn get(&self, id: &BlockId) -> Option<&Block> {
        self.blocks.iter().find(|block| &block.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &BlockId> + '_ {
        self.blocks.iter().map(|block| &block.id)
    }

    /// Apply a settings patch leniently (used by templates)
    pub fn with_settings_patch(mut self, patch: &Map<String, Value>) -> Self {
        self.page_settings = merge_payload(&self.page_settings, patch).value;
        self
    }

    /// Current persisted shape: `{ blocks, settings }`
    pub fn to_value(&self) -> Value {
        json!({
            "blocks": self.blocks,
            "settings": self.page_settings,
        })
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        let loaded = Document::load(&raw);
        if loaded.issues.contains(&LoadIssue::MalformedLegacyContent) {
            return Err(D::Error::custom("content matches no known document shape"));
        }
        Ok(loaded.document)
    }
}
