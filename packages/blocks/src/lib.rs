//! # Funnel Blocks
//!
//! Block model for the funnel builder: the closed catalog of block types,
//! their payload schemas, the shared style record and id minting.
//!
//! ```rust,ignore
//! use funnel_blocks::{Block, BlockKind};
//!
//! let headline = Block::instantiate(BlockKind::Headline);
//! let form = Block::instantiate_named("form")?;
//! ```
//!
//! Payloads read from storage go through [`Block::from_raw`], which keeps
//! conforming keys, drops the rest and reports what it dropped.

mod block;
mod catalog;
pub mod content;
mod errors;
mod id_generator;
pub mod normalize;
mod styles;

pub use block::Block;
pub use catalog::{BlockContent, BlockKind};
pub use errors::BlockError;
pub use id_generator::{next_token, BlockId};
pub use normalize::Normalized;
pub use styles::{BlockStyles, TextAlign};
