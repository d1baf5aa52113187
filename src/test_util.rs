//! Recording fake backend for exercising the factory and operator layers
//! without a real database.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::connection::DbConnection;
use crate::error::SqlUnitworkError;
use crate::factory::ConnectionProvider;
use crate::rows::RowSet;
use crate::types::DbValue;

/// What the fake does when the next statement arrives.
pub enum FakeOutcome {
    /// Report this many affected rows.
    Rows(usize),
    /// Return this result set.
    Select(RowSet),
    /// Fail with an execution error carrying this message.
    Fail(String),
}

#[derive(Default)]
struct FakeState {
    script: VecDeque<FakeOutcome>,
    executed: Vec<(String, Vec<DbValue>)>,
    batches: Vec<String>,
    connects: usize,
    begins: usize,
    commits: usize,
    rollbacks: usize,
    disposed: bool,
}

/// Scripted in-memory database double.
///
/// Acts as a [`ConnectionProvider`] and as the inspection handle: clones
/// share state, so keep one clone outside the factory to assert on after
/// the factory has been consumed. Statements consume scripted outcomes in
/// order; an exhausted script reports one affected row per statement.
#[derive(Clone, Default)]
pub struct FakeDb {
    state: Arc<Mutex<FakeState>>,
}

impl FakeDb {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_rows(&self, rows: usize) {
        self.lock().script.push_back(FakeOutcome::Rows(rows));
    }

    pub fn script_select(&self, rows: RowSet) {
        self.lock().script.push_back(FakeOutcome::Select(rows));
    }

    pub fn script_fail(&self, message: impl Into<String>) {
        self.lock().script.push_back(FakeOutcome::Fail(message.into()));
    }

    /// Every bound statement the fake received, in execution order.
    #[must_use]
    pub fn executed(&self) -> Vec<(String, Vec<DbValue>)> {
        self.lock().executed.clone()
    }

    /// Statement texts only.
    #[must_use]
    pub fn executed_sql(&self) -> Vec<String> {
        self.lock().executed.iter().map(|(sql, _)| sql.clone()).collect()
    }

    #[must_use]
    pub fn batches(&self) -> Vec<String> {
        self.lock().batches.clone()
    }

    #[must_use]
    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    #[must_use]
    pub fn begins(&self) -> usize {
        self.lock().begins
    }

    #[must_use]
    pub fn commits(&self) -> usize {
        self.lock().commits
    }

    #[must_use]
    pub fn rollbacks(&self) -> usize {
        self.lock().rollbacks
    }

    /// Whether the connection handed to a factory has been dropped.
    #[must_use]
    pub fn disposed(&self) -> bool {
        self.lock().disposed
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

#[async_trait]
impl ConnectionProvider for FakeDb {
    async fn connect(&self) -> Result<DbConnection, SqlUnitworkError> {
        self.lock().connects += 1;
        Ok(DbConnection::Fake(FakeConnection {
            state: Arc::clone(&self.state),
        }))
    }
}

/// The connection half handed to a factory; dropping it flags disposal.
pub struct FakeConnection {
    state: Arc<Mutex<FakeState>>,
}

impl FakeConnection {
    fn lock(&self) -> MutexGuard<'_, FakeState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub(crate) fn begin(&self) -> Result<(), SqlUnitworkError> {
        self.lock().begins += 1;
        Ok(())
    }

    pub(crate) fn commit(&self) -> Result<(), SqlUnitworkError> {
        self.lock().commits += 1;
        Ok(())
    }

    pub(crate) fn rollback(&self) -> Result<(), SqlUnitworkError> {
        self.lock().rollbacks += 1;
        Ok(())
    }

    pub(crate) fn execute_batch(&self, sql: &str) -> Result<(), SqlUnitworkError> {
        self.lock().batches.push(sql.to_string());
        Ok(())
    }

    pub(crate) fn execute_dml(
        &self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<usize, SqlUnitworkError> {
        let mut state = self.lock();
        state.executed.push((sql.to_string(), values.to_vec()));
        match state.script.pop_front() {
            None => Ok(1),
            Some(FakeOutcome::Rows(rows)) => Ok(rows),
            Some(FakeOutcome::Fail(message)) => Err(SqlUnitworkError::ExecutionError(message)),
            Some(FakeOutcome::Select(_)) => Err(SqlUnitworkError::ExecutionError(
                "scripted a result set for a DML statement".to_string(),
            )),
        }
    }

    pub(crate) fn execute_select(
        &self,
        sql: &str,
        values: &[DbValue],
    ) -> Result<RowSet, SqlUnitworkError> {
        let mut state = self.lock();
        state.executed.push((sql.to_string(), values.to_vec()));
        match state.script.pop_front() {
            None => Ok(RowSet::new()),
            Some(FakeOutcome::Select(rows)) => Ok(rows),
            Some(FakeOutcome::Fail(message)) => Err(SqlUnitworkError::ExecutionError(message)),
            Some(FakeOutcome::Rows(_)) => Err(SqlUnitworkError::ExecutionError(
                "scripted a row count for a SELECT statement".to_string(),
            )),
        }
    }
}

impl Drop for FakeConnection {
    fn drop(&mut self) {
        self.lock().disposed = true;
    }
}

impl std::fmt::Debug for FakeConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FakeConnection").finish_non_exhaustive()
    }
}
