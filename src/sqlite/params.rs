use rusqlite::types::Value;

use crate::types::DbValue;

/// Convert one `DbValue` to a rusqlite `Value`.
#[must_use]
pub fn to_sqlite_value(value: &DbValue) -> Value {
    match value {
        DbValue::Int(i) => Value::Integer(*i),
        DbValue::Float(f) => Value::Real(*f),
        DbValue::Text(s) => Value::Text(s.clone()),
        DbValue::Bool(b) => Value::Integer(i64::from(*b)),
        // SQLite has no timestamp affinity; store the canonical text form
        DbValue::Timestamp(dt) => Value::Text(dt.format("%F %T%.f").to_string()),
        DbValue::Null => Value::Null,
        DbValue::Json(jval) => Value::Text(jval.to_string()),
        DbValue::Blob(bytes) => Value::Blob(bytes.clone()),
    }
}

/// Convert a parameter slice into owned rusqlite values.
#[must_use]
pub fn to_sqlite_values(values: &[DbValue]) -> Vec<Value> {
    values.iter().map(to_sqlite_value).collect()
}
