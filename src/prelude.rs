//! Convenient imports for common functionality.

pub use crate::binding::{BoundSql, PlaceholderStyle, bind_named};
pub use crate::command::DbCommand;
pub use crate::connection::DbConnection;
pub use crate::error::SqlUnitworkError;
pub use crate::events::ErrorHub;
pub use crate::factory::{ConnectionProvider, DbFactory, LazyFactory};
pub use crate::operator::DbOperator;
pub use crate::rows::{DbRow, FromRow, RowSet};
pub use crate::types::{DatabaseType, DbValue};

#[cfg(feature = "postgres")]
pub use crate::postgres::PostgresOptions;
#[cfg(feature = "sqlite")]
pub use crate::sqlite::SqliteOptions;
