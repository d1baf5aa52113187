use rusqlite::Statement;
use rusqlite::types::Value;

use crate::error::SqlUnitworkError;
use crate::rows::RowSet;
use crate::types::DbValue;

/// Extract a `DbValue` from a `SQLite` row column.
///
/// # Errors
/// Returns `SqlUnitworkError::SqliteError` if the column cannot be read.
pub fn extract_value(row: &rusqlite::Row, idx: usize) -> Result<DbValue, SqlUnitworkError> {
    let value: Value = row.get(idx).map_err(SqlUnitworkError::SqliteError)?;
    Ok(match value {
        Value::Null => DbValue::Null,
        Value::Integer(i) => DbValue::Int(i),
        Value::Real(f) => DbValue::Float(f),
        Value::Text(s) => DbValue::Text(s),
        Value::Blob(b) => DbValue::Blob(b),
    })
}

/// Run a prepared SELECT and materialize every row.
///
/// # Errors
/// Returns `SqlUnitworkError::SqliteError` if execution or extraction fails.
pub fn build_row_set(stmt: &mut Statement, params: &[Value]) -> Result<RowSet, SqlUnitworkError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let column_count = column_names.len();

    let mut row_set = RowSet::with_capacity(10);
    row_set.set_columns(column_names);

    let mut rows = stmt
        .query(rusqlite::params_from_iter(params.iter()))
        .map_err(SqlUnitworkError::SqliteError)?;
    while let Some(row) = rows.next().map_err(SqlUnitworkError::SqliteError)? {
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(extract_value(row, idx)?);
        }
        row_set.push_row(values);
    }

    Ok(row_set)
}
