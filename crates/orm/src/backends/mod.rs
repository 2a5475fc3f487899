//! Store Backends
//!
//! The `Store` trait abstracts the relational engine the loaders talk to.
//! `SqlxStore` implements it over an `sqlx::AnyPool`, so the same loaders run
//! against PostgreSQL or SQLite.

pub mod core;
pub mod sqlx_store;

// Re-export core traits and types
pub use core::*;
pub use sqlx_store::SqlxStore;

/// Database backend type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatabaseBackendType {
    PostgreSQL,
    SQLite,
}

impl std::fmt::Display for DatabaseBackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseBackendType::PostgreSQL => write!(f, "postgresql"),
            DatabaseBackendType::SQLite => write!(f, "sqlite"),
        }
    }
}

impl std::str::FromStr for DatabaseBackendType {
    type Err = String;

    /// Accepts a backend name or a connection URL (the scheme decides).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let scheme = s.split(':').next().unwrap_or_default();
        match scheme.to_lowercase().as_str() {
            "postgresql" | "postgres" => Ok(DatabaseBackendType::PostgreSQL),
            "sqlite" => Ok(DatabaseBackendType::SQLite),
            _ => Err(format!("Unsupported database backend: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_url() {
        assert_eq!(
            "sqlite::memory:".parse::<DatabaseBackendType>(),
            Ok(DatabaseBackendType::SQLite)
        );
        assert_eq!(
            "postgres://user@localhost/app".parse::<DatabaseBackendType>(),
            Ok(DatabaseBackendType::PostgreSQL)
        );
        assert_eq!(
            "postgresql".parse::<DatabaseBackendType>(),
            Ok(DatabaseBackendType::PostgreSQL)
        );
        assert!("mysql://localhost".parse::<DatabaseBackendType>().is_err());
    }
}
