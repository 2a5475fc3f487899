//! Session cache - identity map of roots for one logical session

use std::collections::HashMap;

use crate::model::Root;

/// Cache key: entity table plus identifier
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
struct CacheKey {
    entity: &'static str,
    id: i64,
}

/// Per-session mapping from (entity, id) to an already loaded root
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: HashMap<CacheKey, Root>,
    hits: u64,
    misses: u64,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a root; counts a hit or a miss
    pub fn get(&mut self, entity: &'static str, id: i64) -> Option<Root> {
        match self.entries.get(&CacheKey { entity, id }) {
            Some(root) => {
                self.hits += 1;
                Some(root.clone())
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Look up without touching the hit/miss counters
    pub fn peek(&self, entity: &'static str, id: i64) -> Option<&Root> {
        self.entries.get(&CacheKey { entity, id })
    }

    /// Mutable access without touching the hit/miss counters
    pub fn get_mut(&mut self, entity: &'static str, id: i64) -> Option<&mut Root> {
        self.entries.get_mut(&CacheKey { entity, id })
    }

    pub fn contains(&self, entity: &'static str, id: i64) -> bool {
        self.entries.contains_key(&CacheKey { entity, id })
    }

    /// Store a root, replacing any previous copy
    pub fn put(&mut self, root: Root) {
        let key = CacheKey {
            entity: Root::TABLE,
            id: root.id,
        };
        self.entries.insert(key, root);
    }

    pub fn evict(&mut self, entity: &'static str, id: i64) -> Option<Root> {
        self.entries.remove(&CacheKey { entity, id })
    }

    /// Drop every entry and reset the counters
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entries: self.entries.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_get_evict() {
        let mut cache = SessionCache::new();
        assert!(cache.get(Root::TABLE, 1).is_none());

        cache.put(Root::new(1, "test_user_1", None));
        assert!(cache.contains(Root::TABLE, 1));
        assert_eq!(cache.get(Root::TABLE, 1).map(|r| r.name), Some("test_user_1".to_string()));
        assert!(cache.get("resources", 1).is_none());

        assert_eq!(
            cache.stats(),
            CacheStats {
                entries: 1,
                hits: 1,
                misses: 2
            }
        );

        assert!(cache.evict(Root::TABLE, 1).is_some());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_put_replaces_previous_copy() {
        let mut cache = SessionCache::new();
        cache.put(Root::new(7, "before", None));

        let mut updated = Root::new(7, "after", None);
        updated.attach_children(Vec::new());
        cache.put(updated);

        let cached = cache.get(Root::TABLE, 7).unwrap();
        assert_eq!(cached.name, "after");
        assert!(cached.children.is_loaded());
        assert_eq!(cache.len(), 1);

        cache.clear();
        assert_eq!(cache.stats().hits, 0);
    }
}
