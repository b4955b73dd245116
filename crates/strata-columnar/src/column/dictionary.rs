#![forbid(unsafe_code)]

use crate::attribute_vector::AttributeVector;
use crate::column::ValueColumn;
use crate::element::ColumnElement;
use crate::error::{ColumnarError, ColumnarResult};
use crate::types::{Value, ValueId};
use std::cmp::Ordering;
use std::sync::Arc;

/// Immutable dictionary-encoded column.
///
/// The dictionary holds the distinct values of the source column, sorted ascending by
/// [`ColumnElement::cmp_element`]. Each row stores the position of its value in that dictionary,
/// so comparing two [`ValueId`]s orders rows exactly like comparing the values themselves.
#[derive(Clone, Debug)]
pub struct DictionaryColumn<T> {
    dictionary: Arc<Vec<T>>,
    attribute_vector: Arc<AttributeVector>,
}

impl<T: ColumnElement> DictionaryColumn<T> {
    pub fn from_value_column(column: &ValueColumn<T>) -> ColumnarResult<Self> {
        let mut dictionary = column.values().to_vec();
        dictionary.sort_by(T::cmp_element);
        dictionary.dedup_by(|a, b| a.cmp_element(b) == Ordering::Equal);

        let mut attribute_vector = AttributeVector::for_cardinality(dictionary.len(), column.len())?;
        for value in column.values() {
            let value_id = lower_bound_in(&dictionary, value);
            attribute_vector.push(value_id as ValueId)?;
        }

        Ok(Self {
            dictionary: Arc::new(dictionary),
            attribute_vector: Arc::new(attribute_vector),
        })
    }

    pub fn dictionary(&self) -> &[T] {
        &self.dictionary
    }

    pub fn attribute_vector(&self) -> &AttributeVector {
        &self.attribute_vector
    }

    pub fn len(&self) -> usize {
        self.attribute_vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attribute_vector.is_empty()
    }

    pub fn unique_values_count(&self) -> usize {
        self.dictionary.len()
    }

    pub fn value_by_value_id(&self, value_id: ValueId) -> Option<&T> {
        self.dictionary.get(value_id as usize)
    }

    pub fn get(&self, offset: usize) -> ColumnarResult<&T> {
        let value_id = self.attribute_vector.get(offset)?;
        self.value_by_value_id(value_id)
            .ok_or(ColumnarError::IndexOutOfRange {
                index: value_id as usize,
                len: self.dictionary.len(),
            })
    }

    pub fn value_at(&self, offset: usize) -> ColumnarResult<Value> {
        self.get(offset).map(ColumnElement::to_value)
    }

    /// First id whose value is `>= search`, or `None` when every entry is smaller.
    pub fn lower_bound(&self, search: &T) -> Option<ValueId> {
        let position = lower_bound_in(&self.dictionary, search);
        (position < self.dictionary.len()).then_some(position as ValueId)
    }

    /// First id whose value is `> search`, or `None` when no entry is greater.
    pub fn upper_bound(&self, search: &T) -> Option<ValueId> {
        let position = self
            .dictionary
            .partition_point(|probe| probe.cmp_element(search) != Ordering::Greater);
        (position < self.dictionary.len()).then_some(position as ValueId)
    }

    pub fn lower_bound_value(&self, search: &Value) -> ColumnarResult<Option<ValueId>> {
        Ok(self.lower_bound(&T::from_value(search)?))
    }

    pub fn upper_bound_value(&self, search: &Value) -> ColumnarResult<Option<ValueId>> {
        Ok(self.upper_bound(&T::from_value(search)?))
    }

    /// Approximate heap footprint: dictionary entries plus encoded ids.
    pub fn size_bytes(&self) -> usize {
        self.dictionary.len() * std::mem::size_of::<T>() + self.attribute_vector.size_bytes()
    }
}

fn lower_bound_in<T: ColumnElement>(dictionary: &[T], search: &T) -> usize {
    dictionary.partition_point(|probe| probe.cmp_element(search) == Ordering::Less)
}
