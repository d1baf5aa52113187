//! Transactional unit-of-work helpers over rusqlite and tokio-postgres.
//!
//! A [`factory::DbFactory`] owns one lazily-opened connection and one
//! lazily-begun transaction for a single unit of work; the
//! [`operator::DbOperator`] helpers consume a factory per call, run one or
//! more [`command::DbCommand`]s all-or-nothing, and report failures through
//! an [`events::ErrorHub`] instead of propagating them.

pub mod binding;
pub mod command;
pub mod connection;
pub mod error;
pub mod events;
pub mod factory;
pub mod operator;
pub mod rows;
pub mod types;

#[cfg(feature = "postgres")]
pub mod postgres;
#[cfg(feature = "sqlite")]
pub mod sqlite;
#[cfg(any(test, feature = "test-util"))]
pub mod test_util;

pub mod prelude;

pub use error::SqlUnitworkError;
