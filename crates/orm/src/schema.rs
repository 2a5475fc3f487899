//! Persistence schema for roots, children and resources
//!
//! `children.root_id` is mandatory and `(root_id, order_index)` is unique, so
//! the database itself rejects orphans and duplicate positions.

use crate::backends::{DatabaseBackendType, Store};
use crate::error::OrmResult;

/// DDL for the three tables, in creation order
pub fn create_statements(backend: DatabaseBackendType) -> Vec<String> {
    let id_column = match backend {
        DatabaseBackendType::PostgreSQL => "id BIGSERIAL PRIMARY KEY",
        DatabaseBackendType::SQLite => "id INTEGER PRIMARY KEY AUTOINCREMENT",
    };

    vec![
        format!(
            "CREATE TABLE IF NOT EXISTS roots ({}, name TEXT NOT NULL, image_url TEXT)",
            id_column
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS resources ({}, url TEXT NOT NULL)",
            id_column
        ),
        format!(
            "CREATE TABLE IF NOT EXISTS children ({}, \
             root_id BIGINT NOT NULL REFERENCES roots(id), \
             resource_id BIGINT REFERENCES resources(id), \
             order_index BIGINT NOT NULL, \
             UNIQUE (root_id, order_index))",
            id_column
        ),
        "CREATE INDEX IF NOT EXISTS idx_children_root_id ON children (root_id)".to_string(),
    ]
}

/// DDL dropping the tables in dependency order
pub fn drop_statements() -> Vec<String> {
    vec![
        "DROP TABLE IF EXISTS children".to_string(),
        "DROP TABLE IF EXISTS resources".to_string(),
        "DROP TABLE IF EXISTS roots".to_string(),
    ]
}

/// Create the tables if they are missing
pub async fn create_tables(store: &dyn Store) -> OrmResult<()> {
    for sql in create_statements(store.backend()) {
        store.execute(&sql, &[]).await?;
    }
    tracing::debug!(backend = %store.backend(), "schema ready");
    Ok(())
}

/// Drop all three tables
pub async fn drop_tables(store: &dyn Store) -> OrmResult<()> {
    for sql in drop_statements() {
        store.execute(&sql, &[]).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_column_per_backend() {
        let pg = create_statements(DatabaseBackendType::PostgreSQL);
        let sqlite = create_statements(DatabaseBackendType::SQLite);

        assert!(pg[0].contains("BIGSERIAL"));
        assert!(sqlite[0].contains("AUTOINCREMENT"));
        assert!(sqlite[2].contains("UNIQUE (root_id, order_index)"));
        assert_eq!(drop_statements()[0], "DROP TABLE IF EXISTS children");
    }
}
