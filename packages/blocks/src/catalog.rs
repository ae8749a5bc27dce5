//! # Block Catalog
//!
//! The closed set of block types. Each entry pairs a [`BlockKind`] tag with
//! its payload schema; [`BlockContent`] is the tagged union over those
//! payloads. Adding a block type means adding one line to the table below.

use crate::content::*;
use crate::normalize::{merge_payload, normalize_payload, to_object, Normalized};
use crate::BlockError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

macro_rules! block_catalog {
    ($($variant:ident => $tag:literal, $payload:ty;)*) => {
        /// Type tag of a block
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum BlockKind {
            $($variant,)*
        }

        impl BlockKind {
            /// Every catalog entry, in palette order
            pub const ALL: &'static [BlockKind] = &[$(BlockKind::$variant,)*];

            pub fn tag(self) -> &'static str {
                match self {
                    $(BlockKind::$variant => $tag,)*
                }
            }

            pub fn from_tag(tag: &str) -> Option<Self> {
                match tag {
                    $($tag => Some(BlockKind::$variant),)*
                    _ => None,
                }
            }
        }

        /// Variant-specific payload of a block
        #[derive(Debug, Clone, PartialEq)]
        pub enum BlockContent {
            $($variant($payload),)*
        }

        impl BlockContent {
            /// Default payload for a catalog entry
            pub fn default_for(kind: BlockKind) -> Self {
                match kind {
                    $(BlockKind::$variant => BlockContent::$variant(<$payload>::default()),)*
                }
            }

            pub fn kind(&self) -> BlockKind {
                match self {
                    $(BlockContent::$variant(_) => BlockKind::$variant,)*
                }
            }

            /// JSON object form of the payload
            pub fn to_value(&self) -> Value {
                match self {
                    $(BlockContent::$variant(payload) => to_object(payload),)*
                }
            }

            /// Build a payload of `kind` from untrusted JSON
            pub fn normalize(kind: BlockKind, raw: &Value) -> Normalized<Self> {
                match kind {
                    $(BlockKind::$variant => {
                        normalize_payload::<$payload>(raw).map(BlockContent::$variant)
                    })*
                }
            }

            /// Shallow-merge `patch`, dropping keys that do not fit the schema
            pub fn merge(&self, patch: &Map<String, Value>) -> Normalized<Self> {
                match self {
                    $(BlockContent::$variant(payload) => {
                        merge_payload(payload, patch).map(BlockContent::$variant)
                    })*
                }
            }
        }
    };
}

block_catalog! {
    Headline => "headline", HeadlineContent;
    Text => "text", TextContent;
    Image => "image", ImageContent;
    Button => "button", ButtonContent;
    Video => "video", VideoContent;
    Form => "form", FormContent;
    Checkout => "checkout", CheckoutContent;
    PricingTable => "pricing_table", PricingTableContent;
    Testimonial => "testimonial", TestimonialContent;
    Countdown => "countdown", CountdownContent;
    Divider => "divider", DividerContent;
    Spacer => "spacer", SpacerContent;
}

impl BlockContent {
    pub fn as_checkout(&self) -> Option<&CheckoutContent> {
        match self {
            BlockContent::Checkout(checkout) => Some(checkout),
            _ => None,
        }
    }

    pub fn as_checkout_mut(&mut self) -> Option<&mut CheckoutContent> {
        match self {
            BlockContent::Checkout(checkout) => Some(checkout),
            _ => None,
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for BlockKind {
    type Err = BlockError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        BlockKind::from_tag(tag).ok_or_else(|| BlockError::InvalidBlockType(tag.to_string()))
    }
}
