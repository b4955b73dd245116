//! Per-chunk column storage.
//!
//! A chunk stores one [`Column`] per schema column. The enum is closed: a column is either
//! uncompressed ([`ValueColumn`]), dictionary encoded ([`DictionaryColumn`]) or an indirection
//! into another table ([`ReferenceColumn`]). The first two are typed by element and wrapped in
//! [`AnyValueColumn`] / [`AnyDictionaryColumn`]; use [`ColumnElement`] to get the typed view.

#![forbid(unsafe_code)]

mod dictionary;
mod reference;
mod value;

pub use dictionary::DictionaryColumn;
pub use reference::ReferenceColumn;
pub use value::ValueColumn;

use crate::element::ColumnElement;
use crate::error::{ColumnarError, ColumnarResult};
use crate::types::{ColumnType, Value};
use crate::with_element_type;

macro_rules! each_element {
    ($column:expr, $c:ident => $body:expr) => {
        match $column {
            Self::Int($c) => $body,
            Self::Long($c) => $body,
            Self::Float($c) => $body,
            Self::Double($c) => $body,
            Self::String($c) => $body,
        }
    };
}

#[derive(Clone, Debug, PartialEq)]
pub enum AnyValueColumn {
    Int(ValueColumn<i32>),
    Long(ValueColumn<i64>),
    Float(ValueColumn<f32>),
    Double(ValueColumn<f64>),
    String(ValueColumn<String>),
}

impl AnyValueColumn {
    pub fn new(column_type: ColumnType) -> Self {
        with_element_type!(column_type, T => ValueColumn::<T>::new().into())
    }

    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Int(_) => ColumnType::Int,
            Self::Long(_) => ColumnType::Long,
            Self::Float(_) => ColumnType::Float,
            Self::Double(_) => ColumnType::Double,
            Self::String(_) => ColumnType::String,
        }
    }

    pub fn len(&self) -> usize {
        each_element!(self, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn value_at(&self, offset: usize) -> ColumnarResult<Value> {
        each_element!(self, c => c.value_at(offset))
    }

    pub fn append(&mut self, value: &Value) -> ColumnarResult<()> {
        each_element!(self, c => c.append(value))
    }

    pub fn compress(&self) -> ColumnarResult<AnyDictionaryColumn> {
        each_element!(self, c => DictionaryColumn::from_value_column(c).map(Into::into))
    }

    fn backfill(&mut self, len: usize) {
        each_element!(self, c => c.backfill(len))
    }
}

impl<T: ColumnElement> From<ValueColumn<T>> for AnyValueColumn {
    fn from(column: ValueColumn<T>) -> Self {
        T::into_value_column(column)
    }
}

#[derive(Clone, Debug)]
pub enum AnyDictionaryColumn {
    Int(DictionaryColumn<i32>),
    Long(DictionaryColumn<i64>),
    Float(DictionaryColumn<f32>),
    Double(DictionaryColumn<f64>),
    String(DictionaryColumn<String>),
}

impl AnyDictionaryColumn {
    pub fn column_type(&self) -> ColumnType {
        match self {
            Self::Int(_) => ColumnType::Int,
            Self::Long(_) => ColumnType::Long,
            Self::Float(_) => ColumnType::Float,
            Self::Double(_) => ColumnType::Double,
            Self::String(_) => ColumnType::String,
        }
    }

    pub fn len(&self) -> usize {
        each_element!(self, c => c.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn unique_values_count(&self) -> usize {
        each_element!(self, c => c.unique_values_count())
    }

    pub fn value_at(&self, offset: usize) -> ColumnarResult<Value> {
        each_element!(self, c => c.value_at(offset))
    }
}

impl<T: ColumnElement> From<DictionaryColumn<T>> for AnyDictionaryColumn {
    fn from(column: DictionaryColumn<T>) -> Self {
        T::into_dictionary_column(column)
    }
}

#[derive(Clone, Debug)]
pub enum Column {
    Value(AnyValueColumn),
    Dictionary(AnyDictionaryColumn),
    Reference(ReferenceColumn),
}

impl Column {
    /// Empty, appendable column of the given type.
    pub fn new_value(column_type: ColumnType) -> Self {
        Column::Value(AnyValueColumn::new(column_type))
    }

    pub fn len(&self) -> usize {
        match self {
            Column::Value(c) => c.len(),
            Column::Dictionary(c) => c.len(),
            Column::Reference(c) => c.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_mutable(&self) -> bool {
        matches!(self, Column::Value(_))
    }

    /// Element type stored by this column. Reference columns report the referenced column's
    /// declared type.
    pub fn column_type(&self) -> ColumnarResult<ColumnType> {
        match self {
            Column::Value(c) => Ok(c.column_type()),
            Column::Dictionary(c) => Ok(c.column_type()),
            Column::Reference(c) => c.column_type(),
        }
    }

    pub fn value_at(&self, offset: usize) -> ColumnarResult<Value> {
        match self {
            Column::Value(c) => c.value_at(offset),
            Column::Dictionary(c) => c.value_at(offset),
            Column::Reference(c) => c.value_at(offset),
        }
    }

    pub fn append(&mut self, value: &Value) -> ColumnarResult<()> {
        match self {
            Column::Value(c) => c.append(value),
            Column::Dictionary(_) => Err(ColumnarError::Unsupported(
                "dictionary columns are immutable",
            )),
            Column::Reference(_) => Err(ColumnarError::Unsupported(
                "reference columns are immutable",
            )),
        }
    }

    /// Check that `value` could be appended, without appending it.
    pub(crate) fn check_append(&self, value: &Value) -> ColumnarResult<()> {
        match self {
            Column::Value(c) => c.column_type().convert(value).map(|_| ()),
            Column::Dictionary(_) => Err(ColumnarError::Unsupported(
                "dictionary columns are immutable",
            )),
            Column::Reference(_) => Err(ColumnarError::Unsupported(
                "reference columns are immutable",
            )),
        }
    }

    pub(crate) fn backfill(&mut self, len: usize) -> ColumnarResult<()> {
        if let Column::Value(c) = self {
            c.backfill(len);
            return Ok(());
        }
        if self.len() >= len {
            Ok(())
        } else {
            Err(ColumnarError::Unsupported(
                "cannot backfill an immutable column",
            ))
        }
    }

    /// Dictionary-encoded equivalent of this column.
    pub fn compressed(&self) -> ColumnarResult<Column> {
        match self {
            Column::Value(c) => Ok(Column::Dictionary(c.compress()?)),
            Column::Dictionary(c) => Ok(Column::Dictionary(c.clone())),
            Column::Reference(_) => Err(ColumnarError::Unsupported(
                "reference columns cannot be compressed",
            )),
        }
    }

    pub fn as_value<T: ColumnElement>(&self) -> Option<&ValueColumn<T>> {
        match self {
            Column::Value(c) => T::value_column(c),
            _ => None,
        }
    }

    pub fn as_dictionary<T: ColumnElement>(&self) -> Option<&DictionaryColumn<T>> {
        match self {
            Column::Dictionary(c) => T::dictionary_column(c),
            _ => None,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceColumn> {
        match self {
            Column::Reference(c) => Some(c),
            _ => None,
        }
    }
}

impl From<AnyValueColumn> for Column {
    fn from(column: AnyValueColumn) -> Self {
        Column::Value(column)
    }
}

impl From<AnyDictionaryColumn> for Column {
    fn from(column: AnyDictionaryColumn) -> Self {
        Column::Dictionary(column)
    }
}

impl From<ReferenceColumn> for Column {
    fn from(column: ReferenceColumn) -> Self {
        Column::Reference(column)
    }
}
