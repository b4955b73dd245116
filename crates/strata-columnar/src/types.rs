#![forbid(unsafe_code)]

use crate::error::{ColumnarError, ColumnarResult};
use std::fmt;
use std::str::FromStr;

pub type ChunkId = u32;
pub type ChunkOffset = u32;
pub type ColumnId = u16;

/// Position of an entry in a sorted dictionary.
///
/// "Not found" is always expressed as `Option<ValueId>::None`; every `u32` is a legitimate id.
pub type ValueId = u32;

/// Address of a row within a table: the chunk that holds it and its offset in that chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RowId {
    pub chunk_id: ChunkId,
    pub chunk_offset: ChunkOffset,
}

impl RowId {
    pub const fn new(chunk_id: ChunkId, chunk_offset: ChunkOffset) -> Self {
        Self {
            chunk_id,
            chunk_offset,
        }
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.chunk_id, self.chunk_offset)
    }
}

/// Ordered row addresses. The order is part of the contract: scans emit chunk-major,
/// offset-ascending lists and downstream operators expose rows in exactly this order.
pub type PosList = Vec<RowId>;

/// Declared type of a column. Each variant has exactly one string tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Int,
    Long,
    Float,
    Double,
    String,
}

impl ColumnType {
    pub const ALL: [ColumnType; 5] = [
        ColumnType::Int,
        ColumnType::Long,
        ColumnType::Float,
        ColumnType::Double,
        ColumnType::String,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::Int => "int",
            ColumnType::Long => "long",
            ColumnType::Float => "float",
            ColumnType::Double => "double",
            ColumnType::String => "string",
        }
    }

    /// Value used to backfill rows when a column is added to a populated chunk.
    pub fn default_value(self) -> Value {
        match self {
            ColumnType::Int => Value::Int(0),
            ColumnType::Long => Value::Long(0),
            ColumnType::Float => Value::Float(0.0),
            ColumnType::Double => Value::Double(0.0),
            ColumnType::String => Value::String(String::new()),
        }
    }

    /// Convert `value` into this type, failing with `TypeMismatch` when it is not representable.
    pub fn convert(self, value: &Value) -> ColumnarResult<Value> {
        use crate::element::ColumnElement;

        Ok(match self {
            ColumnType::Int => Value::Int(i32::from_value(value)?),
            ColumnType::Long => Value::Long(i64::from_value(value)?),
            ColumnType::Float => Value::Float(f32::from_value(value)?),
            ColumnType::Double => Value::Double(f64::from_value(value)?),
            ColumnType::String => Value::String(String::from_value(value)?),
        })
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = ColumnarError;

    fn from_str(tag: &str) -> Result<Self, Self::Err> {
        ColumnType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == tag)
            .ok_or_else(|| ColumnarError::UnknownColumnType(tag.to_string()))
    }
}

/// A single cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    String(String),
}

impl Value {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Value::Int(_) => ColumnType::Int,
            Value::Long(_) => ColumnType::Long,
            Value::Float(_) => ColumnType::Float,
            Value::Double(_) => ColumnType::Double,
            Value::String(_) => ColumnType::String,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Long(v) => write!(f, "{v}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Double(v) => write!(f, "{v}"),
            Value::String(v) => f.write_str(v),
        }
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Long(value)
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// Run `$body` with `$t` bound to the element type backing `$column_type`.
///
/// This is the one place where a runtime [`ColumnType`] selects a monomorphized code path:
///
/// ```
/// use strata_columnar::{with_element_type, ColumnElement, ColumnType};
///
/// let tag = with_element_type!(ColumnType::Double, T => T::COLUMN_TYPE.as_str());
/// assert_eq!(tag, "double");
/// ```
#[macro_export]
macro_rules! with_element_type {
    ($column_type:expr, $t:ident => $body:expr) => {
        match $column_type {
            $crate::ColumnType::Int => {
                type $t = i32;
                $body
            }
            $crate::ColumnType::Long => {
                type $t = i64;
                $body
            }
            $crate::ColumnType::Float => {
                type $t = f32;
                $body
            }
            $crate::ColumnType::Double => {
                type $t = f64;
                $body
            }
            $crate::ColumnType::String => {
                type $t = ::std::string::String;
                $body
            }
        }
    };
}
