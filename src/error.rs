use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlUnitworkError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter binding error: {0}")]
    BindError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Row mapping error: {0}")]
    MappingError(String),

    #[error("Other database error: {0}")]
    Other(String),
}
