#![forbid(unsafe_code)]

use crate::column::Column;
use crate::error::{ColumnarError, ColumnarResult};
use crate::table::Table;
use crate::types::{ColumnId, ColumnType, PosList, RowId, Value};
use std::fmt;
use std::sync::Arc;

/// Zero-copy view on one column of another table.
///
/// Stores no values: row `i` of this column is the row `pos_list[i]` of column `column_id` in
/// the referenced table. The referenced table is shared, so a reference column keeps its base
/// storage alive for as long as it exists.
#[derive(Clone)]
pub struct ReferenceColumn {
    table: Arc<Table>,
    column_id: ColumnId,
    positions: Arc<PosList>,
}

impl ReferenceColumn {
    pub fn new(table: Arc<Table>, column_id: ColumnId, positions: Arc<PosList>) -> Self {
        Self {
            table,
            column_id,
            positions,
        }
    }

    pub fn referenced_table(&self) -> &Arc<Table> {
        &self.table
    }

    pub fn referenced_column_id(&self) -> ColumnId {
        self.column_id
    }

    pub fn pos_list(&self) -> &Arc<PosList> {
        &self.positions
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Declared type of the referenced column.
    pub fn column_type(&self) -> ColumnarResult<ColumnType> {
        self.table.column_type(self.column_id)
    }

    /// Column of the referenced table that stores `row_id`, with every bound checked.
    pub fn resolve(&self, row_id: RowId) -> ColumnarResult<&Column> {
        let chunks = self.table.chunks();
        let chunk = chunks
            .get(row_id.chunk_id as usize)
            .ok_or(ColumnarError::IndexOutOfRange {
                index: row_id.chunk_id as usize,
                len: chunks.len(),
            })?;
        let column = chunk
            .columns()
            .get(usize::from(self.column_id))
            .ok_or(ColumnarError::IndexOutOfRange {
                index: usize::from(self.column_id),
                len: chunk.column_count(),
            })?;
        if row_id.chunk_offset as usize >= column.len() {
            return Err(ColumnarError::IndexOutOfRange {
                index: row_id.chunk_offset as usize,
                len: column.len(),
            });
        }
        Ok(column)
    }

    pub fn value_at(&self, offset: usize) -> ColumnarResult<Value> {
        let row_id = *self
            .positions
            .get(offset)
            .ok_or(ColumnarError::IndexOutOfRange {
                index: offset,
                len: self.positions.len(),
            })?;
        self.resolve(row_id)?.value_at(row_id.chunk_offset as usize)
    }
}

impl fmt::Debug for ReferenceColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceColumn")
            .field("table", &Arc::as_ptr(&self.table))
            .field("column_id", &self.column_id)
            .field("positions", &self.positions.len())
            .finish()
    }
}
