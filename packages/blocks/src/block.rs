//! # Block
//!
//! One content element of a page: `{ id, type, content, styles }`.
//!
//! Blocks are created two ways:
//! - [`Block::instantiate`] for a fresh catalog entry (new id, default payload)
//! - [`Block::from_raw`] for stored JSON, normalized against the catalog

use crate::{BlockContent, BlockError, BlockId, BlockKind, BlockStyles, Normalized};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub content: BlockContent,
    pub styles: BlockStyles,
}

impl Block {
    /// New block of `kind` with a fresh id and default payload
    pub fn instantiate(kind: BlockKind) -> Self {
        Self {
            id: BlockId::generate(),
            content: BlockContent::default_for(kind),
            styles: BlockStyles::default(),
        }
    }

    /// Same as [`Block::instantiate`], from a catalog tag
    pub fn instantiate_named(tag: &str) -> Result<Self, BlockError> {
        Ok(Self::instantiate(tag.parse()?))
    }

    pub fn kind(&self) -> BlockKind {
        self.content.kind()
    }

    /// Replace the id with a freshly minted one
    pub fn with_fresh_id(mut self) -> Self {
        self.id = BlockId::generate();
        self
    }

    /// Normalize a stored block.
    ///
    /// Fails only when the type tag is missing or not in the catalog; every
    /// other defect is repaired and listed in `dropped`. A missing id is
    /// re-minted and reported as `id`.
    pub fn from_raw(raw: &Value) -> Result<Normalized<Block>, BlockError> {
        let Value::Object(fields) = raw else {
            return Err(BlockError::MalformedBlock("block is not an object".to_string()));
        };

        let tag = fields
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| BlockError::MalformedBlock("missing type".to_string()))?;
        let kind: BlockKind = tag.parse()?;

        let mut dropped = Vec::new();
        let id = match fields.get("id").and_then(Value::as_str) {
            Some(id) if !id.is_empty() => BlockId::from_raw(id),
            _ => {
                dropped.push("id".to_string());
                BlockId::generate()
            }
        };

        let content = BlockContent::normalize(kind, fields.get("content").unwrap_or(&Value::Null))
            .scoped("content");
        let styles = BlockStyles::normalize(fields.get("styles").unwrap_or(&Value::Null))
            .scoped("styles");

        dropped.extend(content.dropped);
        dropped.extend(styles.dropped);

        Ok(Normalized {
            value: Block {
                id,
                content: content.value,
                styles: styles.value,
            },
            dropped,
        })
    }

    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "id": self.id,
            "type": self.kind().tag(),
            "content": self.content.to_value(),
            "styles": self.styles.to_value(),
        })
    }
}

impl Serialize for Block {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Block::from_raw(&raw)
            .map(|normalized| normalized.value)
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_instantiate_uses_defaults() {
        let block = Block::instantiate(BlockKind::Headline);
        assert_eq!(block.kind(), BlockKind::Headline);
        assert_eq!(block.styles, BlockStyles::default());
        assert_eq!(block.content, BlockContent::default_for(BlockKind::Headline));
    }

    #[test]
    fn test_instantiate_named_rejects_unknown_type() {
        let err = Block::instantiate_named("marquee").unwrap_err();
        assert_eq!(err, BlockError::InvalidBlockType("marquee".to_string()));
    }

    #[test]
    fn test_two_instances_never_share_an_id() {
        let a = Block::instantiate(BlockKind::Text);
        let b = Block::instantiate(BlockKind::Text);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_from_raw_repairs_payload() {
        let raw = json!({
            "id": "b1",
            "type": "button",
            "content": { "label": "Buy", "url": 12 },
            "styles": { "padding": "8px", "shadow": "big" }
        });

        let normalized = Block::from_raw(&raw).unwrap();
        assert_eq!(normalized.dropped, vec!["content.url", "styles.shadow"]);

        let block = normalized.value;
        assert_eq!(block.id.as_str(), "b1");
        match &block.content {
            BlockContent::Button(button) => {
                assert_eq!(button.label, "Buy");
                assert_eq!(button.url, "#");
            }
            other => panic!("Expected button, got {:?}", other),
        }
        assert_eq!(block.styles.padding.as_deref(), Some("8px"));
    }

    #[test]
    fn test_from_raw_mints_missing_id() {
        let normalized = Block::from_raw(&json!({ "type": "text" })).unwrap();
        assert_eq!(normalized.dropped, vec!["id"]);
        assert!(normalized.value.id.as_str().starts_with("blk-"));
    }

    #[test]
    fn test_from_raw_rejects_unknown_type() {
        let err = Block::from_raw(&json!({ "id": "x", "type": "marquee" })).unwrap_err();
        assert_eq!(err, BlockError::InvalidBlockType("marquee".to_string()));
    }

    #[test]
    fn test_serialized_shape() {
        let block = Block::instantiate(BlockKind::Spacer);
        let json = serde_json::to_value(&block).unwrap();

        assert_eq!(json["type"], "spacer");
        assert_eq!(json["id"], block.id.as_str());
        assert_eq!(json["content"]["height"], "32px");

        let back: Block = serde_json::from_value(json).unwrap();
        assert_eq!(back, block);
    }
}
