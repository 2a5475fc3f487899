//! Session - one logical unit of loading work
//!
//! A session owns:
//! - the statement tally for everything issued through it,
//! - the queue of roots handed out with unloaded children, in access order,
//! - children fetched by a batch for roots that have not been resolved yet,
//! - an optional `SessionCache`.
//!
//! `clear` returns the session to a cold state without touching the store.

pub mod cache;

use std::collections::HashMap;
use std::sync::Arc;

pub use cache::{CacheStats, SessionCache};

use crate::backends::{Statement, Store, StoreRow};
use crate::connection::StatementStatistics;
use crate::error::OrmResult;
use crate::model::{Child, Root};

pub struct Session {
    store: Arc<dyn Store>,
    cache: Option<SessionCache>,
    pending: Vec<i64>,
    parked: HashMap<i64, Vec<Child>>,
    statements: u64,
}

impl Session {
    /// Begin a session without a cache
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            cache: None,
            pending: Vec::new(),
            parked: HashMap::new(),
            statements: 0,
        }
    }

    /// Begin a session with an empty `SessionCache`
    pub fn with_cache(store: Arc<dyn Store>) -> Self {
        let mut session = Self::new(store);
        session.cache = Some(SessionCache::new());
        session
    }

    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// Counter of the underlying store (shared by every session on it)
    pub fn statistics(&self) -> &StatementStatistics {
        self.store.statistics()
    }

    /// Statements issued through this session since it began
    pub fn statements_issued(&self) -> u64 {
        self.statements
    }

    pub fn cache(&self) -> Option<&SessionCache> {
        self.cache.as_ref()
    }

    pub fn cache_mut(&mut self) -> Option<&mut SessionCache> {
        self.cache.as_mut()
    }

    /// Execute one statement through the store
    pub async fn execute(&mut self, statement: &Statement) -> OrmResult<Vec<StoreRow>> {
        self.statements += 1;
        Ok(statement.fetch_all(self.store.as_ref()).await?)
    }

    /// Execute statements atomically through the store
    pub async fn execute_in_transaction(&mut self, statements: &[Statement]) -> OrmResult<Vec<Vec<StoreRow>>> {
        self.statements += statements.len() as u64;
        Ok(self.store.execute_in_transaction(statements).await?)
    }

    /// Writes go straight to the store, so there is never anything to flush.
    pub fn flush(&mut self) {
        tracing::trace!(pending = self.pending.len(), "flush: nothing buffered");
    }

    /// Drop cache entries, pending roots and parked children
    pub fn clear(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
        self.pending.clear();
        self.parked.clear();
        tracing::debug!("session cleared");
    }

    /// Cached copy of a root, if a cache is wired in and holds it
    pub(crate) fn cached_root(&mut self, id: i64) -> Option<Root> {
        self.cache.as_mut().and_then(|cache| cache.get(Root::TABLE, id))
    }

    pub(crate) fn cache_root(&mut self, root: &Root) {
        if let Some(cache) = self.cache.as_mut() {
            cache.put(root.clone());
        }
    }

    /// Queue a root whose children are unloaded; the first touch fixes its position
    pub(crate) fn register_unloaded(&mut self, id: i64) {
        if !self.pending.contains(&id) && !self.parked.contains_key(&id) {
            self.pending.push(id);
        }
    }

    /// `first` followed by the earliest pending roots, up to `size` ids
    pub(crate) fn pending_batch(&self, first: i64, size: usize) -> Vec<i64> {
        let mut batch = Vec::with_capacity(size);
        batch.push(first);
        batch.extend(
            self.pending
                .iter()
                .copied()
                .filter(|id| *id != first)
                .take(size.saturating_sub(1)),
        );
        batch
    }

    /// Hold children fetched for a root that has not been resolved yet
    pub(crate) fn park(&mut self, id: i64, children: Vec<Child>) {
        self.pending.retain(|pending| *pending != id);
        self.parked.insert(id, children);
    }

    pub(crate) fn take_parked(&mut self, id: i64) -> Option<Vec<Child>> {
        self.parked.remove(&id)
    }

    /// Forget a root that turned out to be missing while fetched as a batch member
    pub(crate) fn forget_pending(&mut self, id: i64) {
        self.pending.retain(|pending| *pending != id);
    }

    /// Root is populated: drop it from the queue and refresh the cached copy
    pub(crate) fn mark_resolved(&mut self, root: &Root) {
        self.pending.retain(|pending| *pending != root.id);
        if let Some(cache) = self.cache.as_mut() {
            if cache.contains(Root::TABLE, root.id) {
                cache.put(root.clone());
            }
        }
    }

    /// Remove every trace of a root (after a delete)
    pub(crate) fn evict_root(&mut self, id: i64) {
        self.pending.retain(|pending| *pending != id);
        self.parked.remove(&id);
        if let Some(cache) = self.cache.as_mut() {
            cache.evict(Root::TABLE, id);
        }
    }

    /// A child was added or removed: keep cached and parked copies consistent
    pub(crate) fn children_changed(&mut self, root_id: i64, update: impl FnOnce(&mut Vec<Child>)) {
        let was_parked = self.parked.remove(&root_id).is_some();

        let cached = self
            .cache
            .as_mut()
            .and_then(|cache| cache.get_mut(Root::TABLE, root_id));
        if let Some(root) = cached {
            if let Some(children) = root.children.get_mut() {
                update(children);
                children.sort_by_key(|child| child.order_index);
            }
        }

        // Parked children are stale now; the root goes back in the queue.
        if was_parked {
            self.register_unloaded(root_id);
        }
    }

    #[cfg(test)]
    pub(crate) fn pending_ids(&self) -> &[i64] {
        &self.pending
    }
}
