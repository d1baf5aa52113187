use crate::binding::bind_named;
use crate::command::DbCommand;
use crate::error::SqlUnitworkError;
use crate::events::ErrorHub;
use crate::factory::DbFactory;
use crate::rows::FromRow;

/// Runs commands against a factory, collapsing failures into negative
/// results.
///
/// Every helper takes ownership of the factory and drops it on every exit
/// path, so the connection and any in-flight transaction are released
/// whether the call succeeds, fails logically, or errors. Caught errors are
/// reported through the operator's [`ErrorHub`] and never propagate;
/// precondition shortfalls (an empty command slice) produce a silent
/// negative result.
#[derive(Debug, Clone, Default)]
pub struct DbOperator {
    errors: ErrorHub,
}

impl DbOperator {
    /// An operator with a fresh, subscriber-less error hub.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An operator reporting to an existing hub.
    #[must_use]
    pub fn with_error_hub(errors: ErrorHub) -> Self {
        Self { errors }
    }

    /// The hub this operator reports caught errors to.
    #[must_use]
    pub fn error_hub(&self) -> &ErrorHub {
        &self.errors
    }

    /// Execute every command inside the factory's transaction, all or
    /// nothing.
    ///
    /// Success is the AND of `affected rows > 0` across the whole slice;
    /// every command runs even after one has already missed. The combined
    /// flag decides commit versus rollback and becomes the return value. An
    /// empty slice is `false` without touching the database or the hub.
    pub async fn try_execute_all<F: DbFactory>(
        &self,
        mut factory: F,
        commands: &[DbCommand],
    ) -> bool {
        if commands.is_empty() {
            tracing::debug!("transactional batch skipped: no commands supplied");
            return false;
        }
        tracing::debug!(commands = commands.len(), "executing transactional batch");
        match execute_all_in_tx(&mut factory, commands).await {
            Ok(flag) => flag,
            Err(err) => {
                self.errors.notify(&err);
                false
            }
        }
    }

    /// Execute one command outside any explicit transaction (the backend's
    /// autocommit applies). Returns whether it affected at least one row.
    pub async fn try_execute<F: DbFactory>(&self, mut factory: F, command: &DbCommand) -> bool {
        tracing::debug!("executing single command");
        match execute_autocommit(&mut factory, command).await {
            Ok(affected) => affected > 0,
            Err(err) => {
                self.errors.notify(&err);
                false
            }
        }
    }

    /// Run a query inside the factory's transaction and map each row into
    /// `T`. Errors are reported to the hub and yield an empty vec.
    pub async fn query<T, F>(&self, mut factory: F, command: &DbCommand) -> Vec<T>
    where
        T: FromRow,
        F: DbFactory,
    {
        tracing::debug!("executing query");
        match select_in_tx(&mut factory, command).await {
            Ok(rows) => rows,
            Err(err) => {
                self.errors.notify(&err);
                Vec::new()
            }
        }
    }

    /// Like [`Self::query`], with an explicit success flag so callers can
    /// tell a failed query from an empty result.
    pub async fn try_query<T, F>(&self, mut factory: F, command: &DbCommand) -> (bool, Vec<T>)
    where
        T: FromRow,
        F: DbFactory,
    {
        tracing::debug!("executing query with success flag");
        match select_in_tx(&mut factory, command).await {
            Ok(rows) => (true, rows),
            Err(err) => {
                self.errors.notify(&err);
                (false, Vec::new())
            }
        }
    }
}

async fn execute_all_in_tx<F: DbFactory>(
    factory: &mut F,
    commands: &[DbCommand],
) -> Result<bool, SqlUnitworkError> {
    factory.transaction().await?;
    let mut all_rows = true;
    for command in commands {
        let conn = factory.connection().await?;
        let bound = bind_named(&command.text, &command.params, conn.placeholder_style())?;
        let affected = conn.execute_dml(&bound.sql, &bound.values).await?;
        all_rows &= affected > 0;
    }
    if all_rows {
        factory.commit().await
    } else {
        factory.rollback().await
    }
}

async fn execute_autocommit<F: DbFactory>(
    factory: &mut F,
    command: &DbCommand,
) -> Result<usize, SqlUnitworkError> {
    let conn = factory.connection().await?;
    let bound = bind_named(&command.text, &command.params, conn.placeholder_style())?;
    conn.execute_dml(&bound.sql, &bound.values).await
}

async fn select_in_tx<T: FromRow, F: DbFactory>(
    factory: &mut F,
    command: &DbCommand,
) -> Result<Vec<T>, SqlUnitworkError> {
    factory.transaction().await?;
    let conn = factory.connection().await?;
    let bound = bind_named(&command.text, &command.params, conn.placeholder_style())?;
    let rows = conn.execute_select(&bound.sql, &bound.values).await?;
    rows.mapped()
}
