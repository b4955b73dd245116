#![forbid(unsafe_code)]

use crate::column::Column;
use crate::error::{ColumnarError, ColumnarResult};
use crate::types::{ColumnId, Value};

/// Horizontal partition of a table: one column per schema entry, all of equal length.
#[derive(Clone, Debug, Default)]
pub struct Chunk {
    columns: Vec<Column>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Chunk over columns that are known to have equal length.
    pub(crate) fn with_columns(columns: Vec<Column>) -> Self {
        debug_assert!(columns.windows(2).all(|w| w[0].len() == w[1].len()));
        Self { columns }
    }

    /// Add a column. If the chunk already holds rows, a shorter column is backfilled with its
    /// type's default value so every column keeps the same length.
    pub fn add_column(&mut self, mut column: Column) -> ColumnarResult<()> {
        if !self.columns.is_empty() {
            let rows = self.size();
            if column.len() > rows {
                return Err(ColumnarError::SchemaMismatch {
                    expected: rows,
                    actual: column.len(),
                });
            }
            column.backfill(rows)?;
        }
        self.columns.push(column);
        Ok(())
    }

    /// Append one row. Every value is validated before any column is touched, so a failed
    /// append leaves the chunk unchanged.
    pub fn append(&mut self, row: &[Value]) -> ColumnarResult<()> {
        if row.len() != self.columns.len() {
            return Err(ColumnarError::SchemaMismatch {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        for (column, value) in self.columns.iter().zip(row) {
            column.check_append(value)?;
        }
        for (column, value) in self.columns.iter_mut().zip(row) {
            column.append(value)?;
        }
        Ok(())
    }

    pub fn column(&self, column_id: ColumnId) -> ColumnarResult<&Column> {
        self.columns
            .get(usize::from(column_id))
            .ok_or_else(|| ColumnarError::column_id_not_found(usize::from(column_id)))
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Number of rows.
    pub fn size(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Swap in a complete new column set, returning the previous one.
    pub(crate) fn replace_columns(&mut self, columns: Vec<Column>) -> Vec<Column> {
        debug_assert_eq!(columns.len(), self.columns.len());
        std::mem::replace(&mut self.columns, columns)
    }
}
