#![forbid(unsafe_code)]

use crate::chunk::Chunk;
use crate::column::Column;
use crate::error::{ColumnarError, ColumnarResult};
use crate::types::{ChunkId, ChunkOffset, ColumnId, ColumnType, RowId, Value};
use log::{debug, trace};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// Maximum rows per chunk. `0` keeps every row in a single, unbounded chunk.
    pub chunk_size: ChunkOffset,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub column_type: ColumnType,
}

/// Chunked, column-oriented table.
///
/// A table always holds at least one chunk. Rows are appended to the last chunk until it reaches
/// `chunk_size` rows, after which a fresh chunk is opened. Every chunk stores exactly one column
/// per schema entry.
#[derive(Clone, Debug)]
pub struct Table {
    schema: Vec<ColumnSchema>,
    chunks: Vec<Chunk>,
    options: TableOptions,
}

impl Default for Table {
    fn default() -> Self {
        Self::with_options(TableOptions::default())
    }
}

impl Table {
    pub fn new(chunk_size: ChunkOffset) -> Self {
        Self::with_options(TableOptions { chunk_size })
    }

    pub fn with_options(options: TableOptions) -> Self {
        Self {
            schema: Vec::new(),
            chunks: vec![Chunk::new()],
            options,
        }
    }

    pub fn options(&self) -> TableOptions {
        self.options
    }

    pub fn chunk_size(&self) -> ChunkOffset {
        self.options.chunk_size
    }

    pub fn schema(&self) -> &[ColumnSchema] {
        &self.schema
    }

    pub fn column_count(&self) -> usize {
        self.schema.len()
    }

    pub fn row_count(&self) -> usize {
        self.chunks.iter().map(Chunk::size).sum()
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn chunk(&self, chunk_id: ChunkId) -> ColumnarResult<&Chunk> {
        self.chunks
            .get(chunk_id as usize)
            .ok_or(ColumnarError::ChunkNotFound {
                chunk_id: chunk_id as usize,
                chunk_count: self.chunks.len(),
            })
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column_name(&self, column_id: ColumnId) -> ColumnarResult<&str> {
        self.column_schema(column_id).map(|c| c.name.as_str())
    }

    pub fn column_type(&self, column_id: ColumnId) -> ColumnarResult<ColumnType> {
        self.column_schema(column_id).map(|c| c.column_type)
    }

    pub fn column_id_by_name(&self, name: &str) -> ColumnarResult<ColumnId> {
        self.schema
            .iter()
            .position(|c| c.name == name)
            .and_then(|idx| ColumnId::try_from(idx).ok())
            .ok_or_else(|| ColumnarError::ColumnNotFound(name.to_string()))
    }

    fn column_schema(&self, column_id: ColumnId) -> ColumnarResult<&ColumnSchema> {
        self.schema
            .get(usize::from(column_id))
            .ok_or_else(|| ColumnarError::column_id_not_found(usize::from(column_id)))
    }

    /// Value of `column_id` at `row_id`, following reference columns if needed.
    pub fn value(&self, column_id: ColumnId, row_id: RowId) -> ColumnarResult<Value> {
        self.chunk(row_id.chunk_id)?
            .column(column_id)?
            .value_at(row_id.chunk_offset as usize)
    }

    /// Record a schema entry without touching any chunk.
    ///
    /// Used when the chunks are built separately and attached with [`Table::emplace_chunk`].
    pub fn add_column_definition(&mut self, name: impl Into<String>, column_type: ColumnType) {
        self.schema.push(ColumnSchema {
            name: name.into(),
            column_type,
        });
    }

    /// Add a column to the schema and to every existing chunk. Rows that already exist get the
    /// type's default value.
    pub fn add_column(
        &mut self,
        name: impl Into<String>,
        column_type: ColumnType,
    ) -> ColumnarResult<()> {
        if self.schema.len() > usize::from(ColumnId::MAX) {
            return Err(ColumnarError::Unsupported("too many columns"));
        }
        for chunk in &mut self.chunks {
            chunk.add_column(Column::new_value(column_type))?;
        }
        self.add_column_definition(name, column_type);
        Ok(())
    }

    /// Append one row, opening a new chunk when the last one is full.
    pub fn append(&mut self, row: &[Value]) -> ColumnarResult<()> {
        let chunk_size = self.options.chunk_size as usize;
        let last_is_full = match self.chunks.last() {
            Some(last) => chunk_size > 0 && last.size() >= chunk_size,
            None => true,
        };

        if last_is_full {
            let mut chunk = self.new_chunk();
            chunk.append(row)?;
            trace!("opened chunk {} (chunk_size={chunk_size})", self.chunks.len());
            self.chunks.push(chunk);
            return Ok(());
        }

        if let Some(last) = self.chunks.last_mut() {
            last.append(row)?;
        }
        Ok(())
    }

    fn new_chunk(&self) -> Chunk {
        Chunk::with_columns(
            self.schema
                .iter()
                .map(|column| Column::new_value(column.column_type))
                .collect(),
        )
    }

    /// Attach a prebuilt chunk. While the table still consists of its single initial empty
    /// chunk, that chunk is replaced instead.
    pub fn emplace_chunk(&mut self, chunk: Chunk) -> ColumnarResult<()> {
        if chunk.column_count() != self.schema.len() {
            return Err(ColumnarError::SchemaMismatch {
                expected: self.schema.len(),
                actual: chunk.column_count(),
            });
        }
        let chunk_size = self.options.chunk_size as usize;
        if chunk_size > 0 && chunk.size() > chunk_size {
            return Err(ColumnarError::SchemaMismatch {
                expected: chunk_size,
                actual: chunk.size(),
            });
        }

        if self.chunks.len() == 1 && self.chunks[0].size() == 0 {
            self.chunks[0] = chunk;
        } else {
            self.chunks.push(chunk);
        }
        Ok(())
    }

    /// Replace every column of a chunk with its dictionary-encoded equivalent.
    ///
    /// The new column set is built completely before it is swapped in, so a failure leaves the
    /// chunk untouched. Columns that are already dictionary encoded are kept as they are.
    pub fn compress_chunk(&mut self, chunk_id: ChunkId) -> ColumnarResult<()> {
        let chunk_count = self.chunks.len();
        let chunk = self
            .chunks
            .get_mut(chunk_id as usize)
            .ok_or(ColumnarError::ChunkNotFound {
                chunk_id: chunk_id as usize,
                chunk_count,
            })?;

        let compressed = chunk
            .columns()
            .iter()
            .map(Column::compressed)
            .collect::<ColumnarResult<Vec<_>>>()?;
        chunk.replace_columns(compressed);

        debug!(
            "compressed chunk {chunk_id}: {} columns, {} rows",
            chunk.column_count(),
            chunk.size()
        );
        Ok(())
    }
}
