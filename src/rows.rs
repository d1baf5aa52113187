use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SqlUnitworkError;
use crate::types::DbValue;

/// A single row from a query result.
///
/// Column names and the name→index map are shared across all rows of a
/// result set, so cloning a row is cheap.
#[derive(Debug, Clone)]
pub struct DbRow {
    columns: Arc<Vec<String>>,
    index: Arc<HashMap<String, usize>>,
    /// The values for this row, in column order
    pub values: Vec<DbValue>,
}

impl DbRow {
    /// Get a value by column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&DbValue> {
        self.index.get(column).and_then(|idx| self.values.get(*idx))
    }

    /// Get a value by column index.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&DbValue> {
        self.values.get(index)
    }

    /// Get a value by column name, or fail with a mapping error naming the
    /// missing column.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::MappingError` if the column is absent.
    pub fn require(&self, column: &str) -> Result<&DbValue, SqlUnitworkError> {
        self.get(column).ok_or_else(|| {
            SqlUnitworkError::MappingError(format!("column not present in row: {column}"))
        })
    }

    /// The column names for this row.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }
}

/// An ordered, materialized query result.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    columns: Option<Arc<Vec<String>>>,
    index: Option<Arc<HashMap<String, usize>>>,
    /// The rows returned by the query
    pub rows: Vec<DbRow>,
}

impl RowSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a result set preallocated for `capacity` rows.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: None,
            index: None,
            rows: Vec::with_capacity(capacity),
        }
    }

    /// Set the column names shared by every row; also builds the shared
    /// name→index map. Call before the first `push_row`.
    pub fn set_columns(&mut self, columns: Vec<String>) {
        let index = columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect::<HashMap<_, _>>();
        self.columns = Some(Arc::new(columns));
        self.index = Some(Arc::new(index));
    }

    /// The column names, if any row has been described yet.
    #[must_use]
    pub fn columns(&self) -> Option<&Arc<Vec<String>>> {
        self.columns.as_ref()
    }

    /// Append a row of values in column order.
    pub fn push_row(&mut self, values: Vec<DbValue>) {
        let columns = self
            .columns
            .get_or_insert_with(|| Arc::new(Vec::new()))
            .clone();
        let index = self
            .index
            .get_or_insert_with(|| Arc::new(HashMap::new()))
            .clone();
        self.rows.push(DbRow {
            columns,
            index,
            values,
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Map every row through `T::from_row`, failing on the first row that
    /// does not fit the target shape.
    ///
    /// # Errors
    /// Returns the first `SqlUnitworkError` produced by `FromRow`.
    pub fn mapped<T: FromRow>(&self) -> Result<Vec<T>, SqlUnitworkError> {
        self.rows.iter().map(T::from_row).collect()
    }
}

/// Conversion from a database row into a caller-specified shape.
pub trait FromRow: Sized {
    /// Build `Self` from one row.
    ///
    /// # Errors
    /// Returns `SqlUnitworkError::MappingError` (typically via
    /// [`DbRow::require`]) when a column is missing or has the wrong type.
    fn from_row(row: &DbRow) -> Result<Self, SqlUnitworkError>;
}

impl FromRow for DbRow {
    fn from_row(row: &DbRow) -> Result<Self, SqlUnitworkError> {
        Ok(row.clone())
    }
}
