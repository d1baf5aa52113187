use async_trait::async_trait;

use crate::connection::DbConnection;
use crate::error::SqlUnitworkError;

/// Strategy for acquiring an open connection.
///
/// This is the only piece a concrete backend has to supply; everything else
/// (lazy opening, the cached transaction, commit/rollback, disposal) lives
/// in [`LazyFactory`].
#[async_trait]
pub trait ConnectionProvider: Send + Sync {
    /// Open a fresh connection for one unit of work.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError` if the connection cannot be established.
    async fn connect(&self) -> Result<DbConnection, SqlUnitworkError>;
}

/// Short-lived owner of one connection and its transaction.
///
/// One factory serves one logical unit of work: the operator helpers take it
/// by value and drop it on every exit path, which releases the connection
/// and lets the backend discard any uncommitted transaction.
#[async_trait]
pub trait DbFactory: Send {
    /// The open connection. Opened on first access; later accesses return
    /// the same handle.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError` if opening the connection fails.
    async fn connection(&mut self) -> Result<&mut DbConnection, SqlUnitworkError>;

    /// Ensure the factory's transaction exists. Begun on first access;
    /// never recreated for the lifetime of the factory.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError` if `BEGIN` fails.
    async fn transaction(&mut self) -> Result<(), SqlUnitworkError>;

    /// Commit the transaction, beginning one first if none was ever used.
    /// Returns `true` unconditionally so callers can thread the workflow's
    /// success state outward; a failing commit is an error, not `false`.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError` if `COMMIT` fails.
    async fn commit(&mut self) -> Result<bool, SqlUnitworkError>;

    /// Roll back the transaction, beginning one first if none was ever
    /// used. Returns `false` unconditionally, mirroring [`Self::commit`]:
    /// `if ok { commit } else { rollback }` yields the workflow flag.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError` if `ROLLBACK` fails.
    async fn rollback(&mut self) -> Result<bool, SqlUnitworkError>;
}

/// Factory skeleton generic over a connection-acquisition strategy.
pub struct LazyFactory<P> {
    provider: P,
    conn: Option<DbConnection>,
    tx_begun: bool,
}

impl<P: ConnectionProvider> LazyFactory<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            conn: None,
            tx_begun: false,
        }
    }

    async fn open(&mut self) -> Result<&mut DbConnection, SqlUnitworkError> {
        if self.conn.is_none() {
            let conn = self.provider.connect().await?;
            self.conn = Some(conn);
        }
        self.conn.as_mut().ok_or_else(|| {
            SqlUnitworkError::ConnectionError("connection unavailable after open".to_string())
        })
    }
}

#[async_trait]
impl<P: ConnectionProvider> DbFactory for LazyFactory<P> {
    async fn connection(&mut self) -> Result<&mut DbConnection, SqlUnitworkError> {
        self.open().await
    }

    async fn transaction(&mut self) -> Result<(), SqlUnitworkError> {
        if !self.tx_begun {
            self.open().await?.begin().await?;
            self.tx_begun = true;
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<bool, SqlUnitworkError> {
        self.transaction().await?;
        self.open().await?.commit().await?;
        Ok(true)
    }

    async fn rollback(&mut self) -> Result<bool, SqlUnitworkError> {
        self.transaction().await?;
        self.open().await?.rollback().await?;
        Ok(false)
    }
}
