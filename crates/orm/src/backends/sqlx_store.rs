//! sqlx-backed Store
//!
//! Runs over `sqlx::AnyPool`; the URL scheme picks PostgreSQL or SQLite.
//! Every statement is counted before it is sent and bounded by the configured
//! statement timeout.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::any::{AnyArguments, AnyPoolOptions, AnyRow};
use sqlx::query::Query;
use sqlx::{Any, AnyPool, Column, Row};

use super::core::{DatabaseValue, Statement, Store, StoreRow};
use super::DatabaseBackendType;
use crate::config::FetchConfig;
use crate::connection::StatementStatistics;
use crate::error::{ModelError, OrmResult, StoreError, StoreResult};

/// Store over an sqlx connection pool
pub struct SqlxStore {
    pool: AnyPool,
    backend: DatabaseBackendType,
    statistics: StatementStatistics,
    statement_timeout: Duration,
}

impl SqlxStore {
    /// Open a pool for the configured database
    pub async fn connect(config: &FetchConfig) -> OrmResult<Self> {
        config.validate()?;
        let backend = config
            .database_url
            .parse::<DatabaseBackendType>()
            .map_err(ModelError::Configuration)?;

        sqlx::any::install_default_drivers();

        let mut options = AnyPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout());

        if config.is_in_memory() {
            // Dropping the only connection would drop the database with it.
            options = options
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = options
            .connect(&config.database_url)
            .await
            .map_err(StoreError::from)?;

        tracing::info!(
            backend = %backend,
            max_connections = config.max_connections,
            "store connected"
        );

        Ok(Self {
            pool,
            backend,
            statistics: StatementStatistics::new(config.statistics_enabled),
            statement_timeout: config.statement_timeout(),
        })
    }

    /// Get the underlying pool
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// Close the pool; later statements fail with a connection error
    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn bounded<F, T>(&self, operation: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, sqlx::Error>>,
    {
        match tokio::time::timeout(self.statement_timeout, operation).await {
            Ok(result) => result.map_err(StoreError::from),
            Err(_) => Err(StoreError::Timeout {
                timeout_ms: self.statement_timeout.as_millis() as u64,
            }),
        }
    }

    fn fail(&self, sql: &str, err: StoreError) -> StoreError {
        self.statistics.record_error();
        tracing::warn!(sql, error = %err, "statement failed");
        err
    }
}

#[async_trait]
impl Store for SqlxStore {
    async fn execute(&self, sql: &str, params: &[DatabaseValue]) -> StoreResult<Vec<StoreRow>> {
        self.statistics.record_statement();
        tracing::debug!(sql, params = params.len(), "executing statement");

        let rows = self
            .bounded(bind_params(sql, params).fetch_all(&self.pool))
            .await
            .map_err(|err| self.fail(sql, err))?;

        rows.iter()
            .map(convert_row)
            .collect::<StoreResult<Vec<_>>>()
            .map_err(|err| self.fail(sql, err))
    }

    async fn execute_in_transaction(&self, statements: &[Statement]) -> StoreResult<Vec<Vec<StoreRow>>> {
        let mut tx = self
            .bounded(self.pool.begin())
            .await
            .map_err(|err| self.fail("BEGIN", err))?;
        let mut results = Vec::with_capacity(statements.len());

        for statement in statements {
            self.statistics.record_statement();
            tracing::debug!(sql = %statement.sql, params = statement.params.len(), "executing statement in transaction");

            let outcome = self
                .bounded(bind_params(&statement.sql, &statement.params).fetch_all(&mut *tx))
                .await;

            let converted =
                outcome.and_then(|rows| rows.iter().map(convert_row).collect::<StoreResult<Vec<_>>>());
            match converted {
                Ok(rows) => results.push(rows),
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::error!(error = %rollback_err, "rollback failed");
                    }
                    return Err(self.fail(&statement.sql, err));
                }
            }
        }

        self.bounded(tx.commit())
            .await
            .map_err(|err| self.fail("COMMIT", err))?;
        Ok(results)
    }

    fn statistics(&self) -> &StatementStatistics {
        &self.statistics
    }

    fn backend(&self) -> DatabaseBackendType {
        self.backend
    }
}

fn bind_params<'q>(sql: &'q str, params: &'q [DatabaseValue]) -> Query<'q, Any, AnyArguments<'q>> {
    let mut query = sqlx::query(sql);
    for param in params {
        query = match param {
            DatabaseValue::Null => query.bind(None::<i64>),
            DatabaseValue::Bool(b) => query.bind(*b),
            DatabaseValue::Int64(i) => query.bind(*i),
            DatabaseValue::Float64(f) => query.bind(*f),
            DatabaseValue::String(s) => query.bind(s.as_str()),
        };
    }
    query
}

/// Convert a driver row into a detached `StoreRow`. Nulls decode under any
/// column type; a non-null value of an unsupported type is an error.
fn convert_row(row: &AnyRow) -> StoreResult<StoreRow> {
    let mut converted = StoreRow::new();

    for (i, column) in row.columns().iter().enumerate() {
        let value = if let Ok(value) = row.try_get::<Option<i64>, _>(i) {
            value.map_or(DatabaseValue::Null, DatabaseValue::Int64)
        } else if let Ok(value) = row.try_get::<Option<i32>, _>(i) {
            value.map_or(DatabaseValue::Null, |v| DatabaseValue::Int64(v as i64))
        } else if let Ok(value) = row.try_get::<Option<String>, _>(i) {
            value.map_or(DatabaseValue::Null, DatabaseValue::String)
        } else if let Ok(value) = row.try_get::<Option<f64>, _>(i) {
            value.map_or(DatabaseValue::Null, DatabaseValue::Float64)
        } else if let Ok(value) = row.try_get::<Option<bool>, _>(i) {
            value.map_or(DatabaseValue::Null, DatabaseValue::Bool)
        } else {
            return Err(StoreError::Execution(format!(
                "column '{}' has unsupported type {:?}",
                column.name(),
                column.type_info()
            )));
        };

        converted.push(column.name(), value);
    }

    Ok(converted)
}
