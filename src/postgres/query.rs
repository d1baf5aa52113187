use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::SqlUnitworkError;
use crate::rows::RowSet;
use crate::types::DbValue;

/// Extract a `DbValue` from a Postgres row at the given index.
///
/// # Errors
/// Returns `SqlUnitworkError::PostgresError` if the column cannot be read.
pub fn extract_value(row: &tokio_postgres::Row, idx: usize) -> Result<DbValue, SqlUnitworkError> {
    let type_name = row.columns()[idx].type_().name();

    match type_name {
        "int2" => {
            let val: Option<i16> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, |v| DbValue::Int(i64::from(v))))
        }
        "int4" => {
            let val: Option<i32> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, |v| DbValue::Int(i64::from(v))))
        }
        "int8" => {
            let val: Option<i64> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Int))
        }
        "float4" | "float8" => {
            let val: Option<f64> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Float))
        }
        "bool" => {
            let val: Option<bool> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Bool))
        }
        "timestamp" | "timestamptz" => {
            let val: Option<NaiveDateTime> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Timestamp))
        }
        "json" | "jsonb" => {
            let val: Option<JsonValue> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Json))
        }
        "bytea" => {
            let val: Option<Vec<u8>> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Blob))
        }
        // text, varchar, char, and anything else readable as text
        _ => {
            let val: Option<String> = row.try_get(idx)?;
            Ok(val.map_or(DbValue::Null, DbValue::Text))
        }
    }
}

/// Materialize driver rows into a `RowSet`.
///
/// # Errors
/// Returns `SqlUnitworkError::PostgresError` if value extraction fails.
pub fn row_set_from_rows(rows: &[tokio_postgres::Row]) -> Result<RowSet, SqlUnitworkError> {
    let mut row_set = RowSet::with_capacity(rows.len());
    if let Some(row) = rows.first() {
        let columns: Vec<String> = row.columns().iter().map(|c| c.name().to_string()).collect();
        row_set.set_columns(columns);
    }

    for row in rows {
        let column_count = row.columns().len();
        let mut values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            values.push(extract_value(row, idx)?);
        }
        row_set.push_row(values);
    }

    Ok(row_set)
}
