use crate::binding::PlaceholderStyle;
use crate::error::SqlUnitworkError;
use crate::rows::RowSet;
use crate::types::DbValue;

/// A backend connection owned by exactly one factory.
///
/// Transaction control is plain `BEGIN`/`COMMIT`/`ROLLBACK` on the owned
/// session: a statement executed while the session's transaction is open
/// runs inside it, so nothing beyond the connection needs to be threaded
/// through the execution surface.
pub enum DbConnection {
    /// `SQLite` database connection
    #[cfg(feature = "sqlite")]
    Sqlite(crate::sqlite::SqliteConnection),
    /// `PostgreSQL` client connection
    #[cfg(feature = "postgres")]
    Postgres(crate::postgres::PostgresConnection),
    /// Recording fake for tests
    #[cfg(any(test, feature = "test-util"))]
    Fake(crate::test_util::FakeConnection),
}

impl DbConnection {
    /// The placeholder style named parameters resolve to on this backend.
    #[must_use]
    pub fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(_) => PlaceholderStyle::Sqlite,
            #[cfg(feature = "postgres")]
            Self::Postgres(_) => PlaceholderStyle::Postgres,
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(_) => PlaceholderStyle::Sqlite,
        }
    }

    pub(crate) async fn begin(&mut self) -> Result<(), SqlUnitworkError> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => conn.begin().await,
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.begin().await,
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(conn) => conn.begin(),
        }
    }

    pub(crate) async fn commit(&mut self) -> Result<(), SqlUnitworkError> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => conn.commit().await,
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.commit().await,
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(conn) => conn.commit(),
        }
    }

    pub(crate) async fn rollback(&mut self) -> Result<(), SqlUnitworkError> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => conn.rollback().await,
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.rollback().await,
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(conn) => conn.rollback(),
        }
    }

    /// Run one or more statements with no parameter binding.
    ///
    /// # Errors
    /// Returns the backend's error if execution fails.
    pub async fn execute_batch(&mut self, sql: &str) -> Result<(), SqlUnitworkError> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => conn.execute_batch(sql).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.execute_batch(sql).await,
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(conn) => conn.execute_batch(sql),
        }
    }

    /// Execute a bound DML statement, returning the affected row count.
    ///
    /// # Errors
    /// Returns the backend's error if execution fails.
    pub async fn execute_dml(
        &mut self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<usize, SqlUnitworkError> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => conn.execute_dml(sql, values).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.execute_dml(sql, values).await,
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(conn) => conn.execute_dml(sql, values),
        }
    }

    /// Execute a bound SELECT, materializing every row.
    ///
    /// # Errors
    /// Returns the backend's error if execution or extraction fails.
    pub async fn execute_select(
        &mut self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<RowSet, SqlUnitworkError> {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => conn.execute_select(sql, values).await,
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => conn.execute_select(sql, values).await,
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(conn) => conn.execute_select(sql, values),
        }
    }
}

impl std::fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "sqlite")]
            Self::Sqlite(conn) => f.debug_tuple("Sqlite").field(conn).finish(),
            #[cfg(feature = "postgres")]
            Self::Postgres(conn) => f.debug_tuple("Postgres").field(conn).finish(),
            #[cfg(any(test, feature = "test-util"))]
            Self::Fake(conn) => f.debug_tuple("Fake").field(conn).finish(),
        }
    }
}
