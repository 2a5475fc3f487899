//! # fetchlab-orm: relationship loading without the N+1
//!
//! Loads roots and their ordered children under three strategies and counts
//! every statement it sends, so the cost of each strategy is observable:
//!
//! - per-root lazy loading: one statement per root touched,
//! - batched lazy loading: one IN-list statement per batch of pending roots,
//! - join fetch: one statement for the whole graph.
//!
//! The store runs over `sqlx::AnyPool`, so PostgreSQL and SQLite (including
//! `sqlite::memory:`) share one code path.

pub mod backends;
pub mod config;
pub mod connection;
pub mod error;
pub mod loading;
pub mod model;
pub mod query;
pub mod repository;
pub mod schema;
pub mod session;

// Re-export core traits and types
pub use backends::{DatabaseBackendType, DatabaseValue, SqlxStore, Statement, Store, StoreRow};
pub use config::{ConfigError, FetchConfig};
pub use connection::{StatementStatistics, StatisticsSnapshot};
pub use error::*;
pub use loading::{FetchStrategy, LoadOutcome, LoadScope, QueryPlanner, RelationLoader, RootLoader};
pub use model::{Child, Relation, Resource, Root};
pub use query::QueryBuilder;
pub use repository::RootRepository;
pub use session::{CacheStats, Session, SessionCache};
