// SQLite backend
//
// - config: connection options and the provider hookup
// - params: DbValue -> rusqlite value conversion
// - query: result extraction into a RowSet

pub mod config;
pub mod params;
pub mod query;

pub use config::SqliteOptions;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::SqlUnitworkError;
use crate::rows::RowSet;
use crate::types::DbValue;

type SharedConnection = Arc<Mutex<rusqlite::Connection>>;

/// Exclusively-owned `SQLite` connection driven on blocking threads.
pub struct SqliteConnection {
    conn: SharedConnection,
}

impl SqliteConnection {
    pub(crate) fn new(conn: rusqlite::Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    async fn run_blocking<F, R>(&self, func: F) -> Result<R, SqlUnitworkError>
    where
        F: FnOnce(&mut rusqlite::Connection) -> Result<R, SqlUnitworkError> + Send + 'static,
        R: Send + 'static,
    {
        let handle = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = handle.blocking_lock();
            func(&mut guard)
        })
        .await
        .map_err(|e| {
            SqlUnitworkError::ExecutionError(format!("sqlite blocking task join error: {e}"))
        })?
    }

    /// Run one or more statements with no parameter binding.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::SqliteError` if execution fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), SqlUnitworkError> {
        let sql = sql.to_owned();
        self.run_blocking(move |conn| {
            conn.execute_batch(&sql)
                .map_err(SqlUnitworkError::SqliteError)
        })
        .await
    }

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
    /// Returns `SqlUnitworkError::SqliteError` if preparation or execution
    /// fails.
    pub async fn execute_dml(
        &self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<usize, SqlUnitworkError> {
        let sql = sql.to_owned();
        let converted = params::to_sqlite_values(values);
        self.run_blocking(move |conn| {
            let mut stmt = conn.prepare(&sql).map_err(SqlUnitworkError::SqliteError)?;
            stmt.execute(rusqlite::params_from_iter(converted))
                .map_err(SqlUnitworkError::SqliteError)
        })
        .await
    }

    /// Execute a SELECT and materialize the rows.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::SqliteError` if preparation, execution, or
    /// value extraction fails.
    pub async fn execute_select(
        &self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<RowSet, SqlUnitworkError> {
        let sql = sql.to_owned();
        let converted = params::to_sqlite_values(values);
        self.run_blocking(move |conn| {
            let mut stmt = conn.prepare(&sql).map_err(SqlUnitworkError::SqliteError)?;
            query::build_row_set(&mut stmt, &converted)
        })
        .await
    }
}

impl std::fmt::Debug for SqliteConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConnection").finish_non_exhaustive()
    }
}
