// PostgreSQL backend
//
// - config: connection options and the provider hookup
// - params: ToSql bridge for DbValue
// - query: result extraction into a RowSet

pub mod config;
pub mod params;
pub mod query;

pub use config::PostgresOptions;

use tokio_postgres::Client;

use crate::error::SqlUnitworkError;
use crate::rows::RowSet;
use crate::types::DbValue;

/// Exclusively-owned Postgres client plus its spawned connection driver.
pub struct PostgresConnection {
    client: Client,
    _driver: tokio::task::JoinHandle<()>,
}

impl PostgresConnection {
    pub(crate) fn new(client: Client, driver: tokio::task::JoinHandle<()>) -> Self {
        Self {
            client,
            _driver: driver,
        }
    }

    /// Run one or more statements with no parameter binding.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::PostgresError` if execution fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SqlUnitworkError> {
        self.client.batch_execute(sql).await?;
        Ok(())
    }

    // The factory owns this client exclusively, so transaction control is
    // plain SQL on the session rather than a borrow-scoped driver handle.
    pub(crate) async fn begin(&self) -> Result<(), SqlUnitworkError> {
        self.execute_batch("BEGIN").await
    }

    pub(crate) async fn commit(&self) -> Result<(), SqlUnitworkError> {
        self.execute_batch("COMMIT").await
    }

    pub(crate) async fn rollback(&self) -> Result<(), SqlUnitworkError> {
        self.execute_batch("ROLLBACK").await
    }

    /// Execute a DML statement and return the affected row count.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::PostgresError` on execution failure, or
    /// `ExecutionError` if the driver's row count does not fit `usize`.
    pub async fn execute_dml(
        &self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<usize, SqlUnitworkError> {
        let refs = params::as_refs(values);
        let rows = self.client.execute(sql, &refs).await?;
        usize::try_from(rows).map_err(|e| {
            SqlUnitworkError::ExecutionError(format!("postgres affected rows conversion error: {e}"))
        })
    }

    /// Execute a SELECT and materialize the rows.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::PostgresError` if execution or extraction
    /// fails.
    pub async fn execute_select(
        &self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<RowSet, SqlUnitworkError> {
        let refs = params::as_refs(values);
        let rows = self.client.query(sql, &refs).await?;
        query::row_set_from_rows(&rows)
    }
}

impl std::fmt::Debug for PostgresConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresConnection").finish_non_exhaustive()
    }
}
