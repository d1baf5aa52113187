use async_trait::async_trait;

use crate::connection::DbConnection;
use crate::error::SqlUnitworkError;
use crate::factory::ConnectionProvider;

use super::SqliteConnection;

/// Options for opening a `SQLite` database.
///
/// The path is handed to rusqlite as-is, so `file:` URIs work, e.g.
/// `file::memory:?cache=shared` for a process-shared in-memory database.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

#[async_trait]
impl ConnectionProvider for SqliteOptions {
    async fn connect(&self) -> Result<DbConnection, SqlUnitworkError> {
        let db_path = self.db_path.clone();
        let conn = tokio::task::spawn_blocking(move || {
            rusqlite::Connection::open(db_path).map_err(SqlUnitworkError::SqliteError)
        })
        .await
        .map_err(|e| {
            SqlUnitworkError::ConnectionError(format!("sqlite open task join error: {e}"))
        })??;
        Ok(DbConnection::Sqlite(SqliteConnection::new(conn)))
    }
}
