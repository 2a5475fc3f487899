//! Error types for the loading layer
//!
//! `ModelError` is what loaders, the planner and the repository return.
//! `StoreError` is raised at the store boundary and is carried through
//! unchanged so callers can tell a missing row from a failing database.

use std::fmt;

use crate::config::ConfigError;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// ORM error type alias
pub type OrmError = ModelError;

/// ORM result type alias
pub type OrmResult<T> = ModelResult<T>;

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Error types for loading operations
#[derive(Debug, Clone)]
pub enum ModelError {
    /// Requested identifier is absent
    NotFound { entity: &'static str, id: i64 },
    /// Execution failed at the store boundary
    Store(StoreError),
    /// Batch size must be strictly positive
    InvalidBatchSize(i64),
    /// Join rows did not describe a consistent relationship
    Relationship(String),
    /// Row could not be decoded into an entity
    Serialization(String),
    /// Configuration error
    Configuration(String),
}

impl ModelError {
    /// Build a not-found error for an entity table and identifier
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        ModelError::NotFound { entity, id }
    }

    /// Whether this is the expected "identifier absent" outcome
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelError::NotFound { .. })
    }

    /// The underlying store error, if any
    pub fn as_store_error(&self) -> Option<&StoreError> {
        match self {
            ModelError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::NotFound { entity, id } => {
                write!(f, "Record {} not found in table '{}'", id, entity)
            }
            ModelError::Store(err) => write!(f, "Store error: {}", err),
            ModelError::InvalidBatchSize(size) => {
                write!(f, "Invalid batch size {}: must be greater than zero", size)
            }
            ModelError::Relationship(msg) => write!(f, "Relationship error: {}", msg),
            ModelError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ModelError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<StoreError> for ModelError {
    fn from(err: StoreError) -> Self {
        ModelError::Store(err)
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

impl From<ConfigError> for ModelError {
    fn from(err: ConfigError) -> Self {
        ModelError::Configuration(err.to_string())
    }
}

/// Failures surfaced by a `Store` implementation
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Statement timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Statement failed: {0}")]
    Execution(String),
}

impl StoreError {
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, StoreError::Constraint(_))
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(ref db) => {
                if db.is_unique_violation()
                    || db.is_foreign_key_violation()
                    || db.is_check_violation()
                    || matches!(db.kind(), sqlx::error::ErrorKind::NotNullViolation)
                {
                    StoreError::Constraint(db.message().to_string())
                } else {
                    StoreError::Execution(db.message().to_string())
                }
            }
            sqlx::Error::PoolTimedOut => StoreError::Connection("pool timed out".to_string()),
            sqlx::Error::PoolClosed => StoreError::Connection("pool is closed".to_string()),
            sqlx::Error::Io(e) => StoreError::Connection(e.to_string()),
            sqlx::Error::Tls(e) => StoreError::Connection(e.to_string()),
            other => StoreError::Execution(other.to_string()),
        }
    }
}
