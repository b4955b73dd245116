#![forbid(unsafe_code)]

use crate::element::ColumnElement;
use crate::error::{ColumnarError, ColumnarResult};
use crate::types::Value;

/// Uncompressed, appendable column storage.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValueColumn<T> {
    values: Vec<T>,
}

impl<T: ColumnElement> ValueColumn<T> {
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn value_at(&self, offset: usize) -> ColumnarResult<Value> {
        self.values
            .get(offset)
            .map(ColumnElement::to_value)
            .ok_or(ColumnarError::IndexOutOfRange {
                index: offset,
                len: self.values.len(),
            })
    }

    /// Convert `value` to `T` and append it.
    pub fn append(&mut self, value: &Value) -> ColumnarResult<()> {
        self.values.push(T::from_value(value)?);
        Ok(())
    }

    /// Grow to `len` rows, filling with `T::default()`.
    pub(crate) fn backfill(&mut self, len: usize) {
        if len > self.values.len() {
            self.values.resize(len, T::default());
        }
    }
}

impl<T> From<Vec<T>> for ValueColumn<T> {
    fn from(values: Vec<T>) -> Self {
        Self { values }
    }
}

impl<T: ColumnElement> FromIterator<T> for ValueColumn<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
