use strata_columnar::{ColumnType, ColumnarError};

pub type ExecResult<T> = Result<T, ExecError>;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ExecError {
    #[error(transparent)]
    Storage(#[from] ColumnarError),

    #[error("scan input references more than one base table")]
    ReferencedTableMismatch,

    #[error("column stores {found} values but is declared as {expected}")]
    UnknownColumnType {
        expected: ColumnType,
        found: ColumnType,
    },

    #[error("not implemented: {0}")]
    NotImplemented(String),

    #[error("operator {0} has not been executed yet")]
    NotExecutedYet(&'static str),
}
