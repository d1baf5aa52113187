use async_trait::async_trait;

use crate::connection::DbConnection;
use crate::error::SqlUnitworkError;
use crate::factory::ConnectionProvider;

use super::PostgresConnection;

/// Options for opening a Postgres session.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub config: tokio_postgres::Config,
}

impl PostgresOptions {
    #[must_use]
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self { config }
    }

    /// Parse a libpq-style connection string or `postgres://` URL.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::ConfigError` if the string does not parse.
    pub fn from_url(url: &str) -> Result<Self, SqlUnitworkError> {
        let config = url.parse::<tokio_postgres::Config>().map_err(|e| {
            SqlUnitworkError::ConfigError(format!("invalid postgres connection string: {e}"))
        })?;
        Ok(Self { config })
    }
}

#[async_trait]
impl ConnectionProvider for PostgresOptions {
    async fn connect(&self) -> Result<DbConnection, SqlUnitworkError> {
        let (client, connection) = self.config.connect(tokio_postgres::NoTls).await?;
        let driver = tokio::spawn(async move {
            if let Err(e) = connection.await {
                tracing::warn!(error = %e, "postgres connection driver terminated");
            }
        });
        Ok(DbConnection::Postgres(PostgresConnection::new(
            client, driver,
        )))
    }
}
