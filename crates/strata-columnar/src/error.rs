use crate::types::ColumnType;

pub type ColumnarResult<T> = Result<T, ColumnarError>;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ColumnarError {
    #[error("unknown table: {0}")]
    TableNotFound(String),

    #[error("table already exists: {0}")]
    TableAlreadyExists(String),

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("chunk {chunk_id} not found (table has {chunk_count} chunks)")]
    ChunkNotFound { chunk_id: usize, chunk_count: usize },

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("schema mismatch: expected {expected} values, got {actual}")]
    SchemaMismatch { expected: usize, actual: usize },

    #[error("cannot convert {value:?} to {expected}")]
    TypeMismatch { expected: ColumnType, value: String },

    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    #[error("value id {value} exceeds the encodable maximum {max}")]
    EncodingOverflow { value: u64, max: u64 },

    #[error("unknown column type: {0}")]
    UnknownColumnType(String),
}

impl ColumnarError {
    pub(crate) fn column_id_not_found(column_id: usize) -> Self {
        Self::ColumnNotFound(format!("#{column_id}"))
    }

    pub(crate) fn type_mismatch(expected: ColumnType, value: impl std::fmt::Display) -> Self {
        Self::TypeMismatch {
            expected,
            value: value.to_string(),
        }
    }
}
