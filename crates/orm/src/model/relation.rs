//! Explicit relation state
//!
//! A collection is either `Unloaded` or `Loaded`. A loaded empty collection
//! is `Loaded(vec![])` and never collapses into `Unloaded`. Loading happens
//! only through `RelationLoader::resolve`, so every suspension point is
//! visible at the call site.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Relation<T> {
    Unloaded,
    Loaded(T),
}

impl<T> Default for Relation<T> {
    fn default() -> Self {
        Relation::Unloaded
    }
}

impl<T> Relation<T> {
    /// Check if the relationship has been loaded
    pub fn is_loaded(&self) -> bool {
        matches!(self, Relation::Loaded(_))
    }

    /// Loaded value, or `None` while unloaded
    pub fn get(&self) -> Option<&T> {
        match self {
            Relation::Loaded(value) => Some(value),
            Relation::Unloaded => None,
        }
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Relation::Loaded(value) => Some(value),
            Relation::Unloaded => None,
        }
    }

    /// Set a pre-loaded value
    pub fn set(&mut self, value: T) {
        *self = Relation::Loaded(value);
    }

    /// Take the loaded value, leaving the relation unloaded
    pub fn take(&mut self) -> Option<T> {
        match std::mem::take(self) {
            Relation::Loaded(value) => Some(value),
            Relation::Unloaded => None,
        }
    }

    /// Forget the loaded value
    pub fn clear(&mut self) {
        *self = Relation::Unloaded;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loaded_empty_is_not_unloaded() {
        let unloaded: Relation<Vec<i64>> = Relation::default();
        let empty: Relation<Vec<i64>> = Relation::Loaded(Vec::new());

        assert!(!unloaded.is_loaded());
        assert!(empty.is_loaded());
        assert_ne!(unloaded, empty);
        assert_eq!(empty.get().map(Vec::len), Some(0));
        assert_eq!(unloaded.get(), None);
    }

    #[test]
    fn test_relation_manipulation() {
        let mut relation = Relation::Loaded(vec![1, 2]);

        assert_eq!(relation.take(), Some(vec![1, 2]));
        assert!(!relation.is_loaded());

        relation.set(vec![3]);
        assert!(relation.is_loaded());
        if let Some(values) = relation.get_mut() {
            values.push(4);
        }
        assert_eq!(relation.get(), Some(&vec![3, 4]));

        relation.clear();
        assert!(!relation.is_loaded());
        assert_eq!(relation.take(), None);
    }
}
