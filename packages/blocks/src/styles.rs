//! Shared style record carried by every block

use crate::normalize::{merge_payload, normalize_payload, to_object, Normalized};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockStyles {
    pub padding: Option<String>,
    pub margin: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub text_align: Option<TextAlign>,
    pub border_radius: Option<String>,
    pub font_size: Option<String>,
}

impl Default for BlockStyles {
    fn default() -> Self {
        Self {
            padding: Some("16px".to_string()),
            margin: None,
            background_color: None,
            text_color: None,
            text_align: Some(TextAlign::Left),
            border_radius: None,
            font_size: None,
        }
    }
}

impl BlockStyles {
    pub fn normalize(raw: &Value) -> Normalized<Self> {
        normalize_payload(raw)
    }

    /// Shallow-merge `patch`; `null` clears a property
    pub fn merge(&self, patch: &Map<String, Value>) -> Normalized<Self> {
        merge_payload(self, patch)
    }

    pub fn to_value(&self) -> Value {
        to_object(self)
    }
}
