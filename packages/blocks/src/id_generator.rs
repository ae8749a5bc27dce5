use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

static COUNTER: AtomicU64 = AtomicU64::new(0);

/// Random per-process seed (first 12 hex digits of a v4 UUID)
fn process_seed() -> &'static str {
    static SEED: OnceLock<String> = OnceLock::new();
    SEED.get_or_init(|| {
        let mut seed = uuid::Uuid::new_v4().simple().to_string();
        seed.truncate(12);
        seed
    })
}

/// Mint the next token for `prefix`.
///
/// Tokens combine the process seed with a monotonic counter, so they never
/// repeat within a process and are practically unique across processes.
pub fn next_token(prefix: &str) -> String {
    let count = COUNTER.fetch_add(1, Ordering::Relaxed) + 1;
    format!("{}-{}-{:x}", prefix, process_seed(), count)
}

/// Opaque, unique block identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockId(String);

impl BlockId {
    /// Mint a fresh id
    pub fn generate() -> Self {
        Self(next_token("blk"))
    }

    /// Wrap an id read from storage
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BlockId {
    fn from(raw: &str) -> Self {
        Self::from_raw(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<BlockId> = (0..1000).map(|_| BlockId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_tokens_share_process_seed() {
        let a = next_token("blk");
        let b = next_token("step");

        let seed_a = a.split('-').nth(1).unwrap();
        let seed_b = b.split('-').nth(1).unwrap();
        assert_eq!(seed_a, seed_b);
        assert_eq!(seed_a.len(), 12);
        assert!(b.starts_with("step-"));
    }

    #[test]
    fn test_block_id_serializes_as_plain_string() {
        let id = BlockId::from_raw("blk-abc-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"blk-abc-1\"");
    }
}
