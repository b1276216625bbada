//! Suggestion Cache
//!
//! Caller-owned cache for synthesized patches, keyed by a content hash of
//! the routing input (artifact, version, target net, obstacle set). There
//! is no process-wide state: callers that want caching construct one and
//! pass it in; callers that don't simply omit it.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use tracing::debug;

use crate::obstacles::ObstacleSet;
use crate::patch::Patch;

/// Cache key: a content hash of one routing request's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(u64);

impl CacheKey {
    /// Hash the inputs that determine a routing result. Coordinates are
    /// hashed by bit pattern, so the key is exact, not tolerance-based.
    pub fn for_request(
        artifact_id: &str,
        version: u64,
        target_net: Option<u32>,
        obstacles: &ObstacleSet,
    ) -> Self {
        let mut hasher = DefaultHasher::new();
        artifact_id.hash(&mut hasher);
        version.hash(&mut hasher);
        target_net.hash(&mut hasher);
        for obstacle in obstacles.iter() {
            obstacle.center.x.to_bits().hash(&mut hasher);
            obstacle.center.y.to_bits().hash(&mut hasher);
            obstacle.radius.to_bits().hash(&mut hasher);
        }
        CacheKey(hasher.finish())
    }
}

/// Explicit, caller-supplied patch cache.
#[derive(Debug, Default)]
pub struct SuggestionCache {
    entries: HashMap<CacheKey, Vec<Patch>>,
}

impl SuggestionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &CacheKey) -> Option<&[Patch]> {
        let hit = self.entries.get(key).map(|v| v.as_slice());
        if hit.is_some() {
            debug!(?key, "suggestion cache hit");
        }
        hit
    }

    pub fn insert(&mut self, key: CacheKey, patches: Vec<Patch>) {
        self.entries.insert(key, patches);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
