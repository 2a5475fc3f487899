//! Core Store Traits
//!
//! The store is the only component that touches the database. Every call to
//! `execute` is one round trip and is counted by the store's
//! `StatementStatistics`.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use super::DatabaseBackendType;
use crate::connection::StatementStatistics;
use crate::error::{ModelError, ModelResult, StoreResult};

/// Abstract relational store
#[async_trait]
pub trait Store: Send + Sync {
    /// Execute one statement and return its result rows
    async fn execute(&self, sql: &str, params: &[DatabaseValue]) -> StoreResult<Vec<StoreRow>>;

    /// Execute statements atomically; commits only if every statement succeeds.
    /// Returns the rows of each statement in order.
    async fn execute_in_transaction(&self, statements: &[Statement]) -> StoreResult<Vec<Vec<StoreRow>>>;

    /// Statement counter for this store
    fn statistics(&self) -> &StatementStatistics;

    /// Which engine sits behind this store
    fn backend(&self) -> DatabaseBackendType;
}

/// A parameterized statement ready for execution
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub params: Vec<DatabaseValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>, params: Vec<DatabaseValue>) -> Self {
        Self {
            sql: sql.into(),
            params,
        }
    }

    /// Run this statement against a store
    pub async fn fetch_all(&self, store: &dyn Store) -> StoreResult<Vec<StoreRow>> {
        store.execute(&self.sql, &self.params).await
    }
}

/// Database value enumeration for type-safe parameter binding
#[derive(Debug, Clone, PartialEq)]
pub enum DatabaseValue {
    Null,
    Bool(bool),
    Int64(i64),
    Float64(f64),
    String(String),
}

impl DatabaseValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, DatabaseValue::Null)
    }

    /// Convert to JSON value
    pub fn to_json(&self) -> JsonValue {
        match self {
            DatabaseValue::Null => JsonValue::Null,
            DatabaseValue::Bool(b) => JsonValue::Bool(*b),
            DatabaseValue::Int64(i) => JsonValue::Number(serde_json::Number::from(*i)),
            DatabaseValue::Float64(f) => serde_json::Number::from_f64(*f)
                .map(JsonValue::Number)
                .unwrap_or(JsonValue::Null),
            DatabaseValue::String(s) => JsonValue::String(s.clone()),
        }
    }
}

impl From<i64> for DatabaseValue {
    fn from(value: i64) -> Self {
        DatabaseValue::Int64(value)
    }
}

impl From<bool> for DatabaseValue {
    fn from(value: bool) -> Self {
        DatabaseValue::Bool(value)
    }
}

impl From<f64> for DatabaseValue {
    fn from(value: f64) -> Self {
        DatabaseValue::Float64(value)
    }
}

impl From<&str> for DatabaseValue {
    fn from(value: &str) -> Self {
        DatabaseValue::String(value.to_string())
    }
}

impl From<String> for DatabaseValue {
    fn from(value: String) -> Self {
        DatabaseValue::String(value)
    }
}

impl<T: Into<DatabaseValue>> From<Option<T>> for DatabaseValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(DatabaseValue::Null, Into::into)
    }
}

/// One result row, detached from the driver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreRow {
    columns: Vec<String>,
    values: Vec<DatabaseValue>,
}

impl StoreRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column (builder style)
    pub fn with(mut self, column: &str, value: impl Into<DatabaseValue>) -> Self {
        self.push(column, value.into());
        self
    }

    pub fn push(&mut self, column: &str, value: DatabaseValue) {
        self.columns.push(column.to_string());
        self.values.push(value);
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Raw value by column name
    pub fn value(&self, column: &str) -> Option<&DatabaseValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Typed value from a non-null column
    pub fn get<T>(&self, column: &str) -> ModelResult<T>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        match self.try_get(column)? {
            Some(value) => Ok(value),
            None => Err(ModelError::Serialization(format!(
                "Column '{}' is missing or null",
                column
            ))),
        }
    }

    /// Typed value from a nullable column; absent columns read as `None`
    pub fn try_get<T>(&self, column: &str) -> ModelResult<Option<T>>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        match self.value(column) {
            None | Some(DatabaseValue::Null) => Ok(None),
            Some(value) => serde_json::from_value(value.to_json())
                .map(Some)
                .map_err(|e| {
                    ModelError::Serialization(format!(
                        "Failed to deserialize column '{}': {}",
                        column, e
                    ))
                }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_access() {
        let row = StoreRow::new()
            .with("id", 7i64)
            .with("name", "alice")
            .with("image_url", None::<String>);

        assert_eq!(row.get::<i64>("id").unwrap(), 7);
        assert_eq!(row.get::<String>("name").unwrap(), "alice");
        assert_eq!(row.try_get::<String>("image_url").unwrap(), None);
        assert_eq!(row.try_get::<i64>("not_there").unwrap(), None);
        assert!(row.get::<String>("image_url").is_err());
        assert!(row.get::<i64>("name").is_err());
        assert_eq!(row.column_count(), 3);
        assert_eq!(row.column_names()[1], "name");
    }

    #[test]
    fn test_option_conversion() {
        assert_eq!(DatabaseValue::from(Some(3i64)), DatabaseValue::Int64(3));
        assert!(DatabaseValue::from(None::<i64>).is_null());
    }
}
