#![forbid(unsafe_code)]

use crate::column::{AnyDictionaryColumn, AnyValueColumn, DictionaryColumn, ValueColumn};
use crate::error::{ColumnarError, ColumnarResult};
use crate::types::{ColumnType, Value};
use ordered_float::OrderedFloat;
use std::cmp::Ordering;
use std::fmt;

/// A concrete element type that can back a column.
///
/// Implemented for `i32`, `i64`, `f32`, `f64` and `String`, one per [`ColumnType`]. Besides
/// conversion from the dynamically typed [`Value`], the trait provides the total order used by
/// dictionaries and scans, and typed access into the per-encoding column enums.
pub trait ColumnElement: Clone + fmt::Debug + Default + Send + Sync + 'static {
    const COLUMN_TYPE: ColumnType;

    /// Convert a literal into this type, failing with `TypeMismatch` when it is not representable.
    fn from_value(value: &Value) -> ColumnarResult<Self>;

    fn to_value(&self) -> Value;

    /// Total order over the element type. Floating point values compare like
    /// [`OrderedFloat`]: `-0.0 == 0.0` and all NaNs are equal and sort last.
    fn cmp_element(&self, other: &Self) -> Ordering;

    fn value_column(column: &AnyValueColumn) -> Option<&ValueColumn<Self>>;

    fn value_column_mut(column: &mut AnyValueColumn) -> Option<&mut ValueColumn<Self>>;

    fn dictionary_column(column: &AnyDictionaryColumn) -> Option<&DictionaryColumn<Self>>;

    fn into_value_column(column: ValueColumn<Self>) -> AnyValueColumn;

    fn into_dictionary_column(column: DictionaryColumn<Self>) -> AnyDictionaryColumn;
}

macro_rules! typed_column_access {
    ($variant:ident) => {
        fn value_column(column: &AnyValueColumn) -> Option<&ValueColumn<Self>> {
            match column {
                AnyValueColumn::$variant(c) => Some(c),
                _ => None,
            }
        }

        fn value_column_mut(column: &mut AnyValueColumn) -> Option<&mut ValueColumn<Self>> {
            match column {
                AnyValueColumn::$variant(c) => Some(c),
                _ => None,
            }
        }

        fn dictionary_column(column: &AnyDictionaryColumn) -> Option<&DictionaryColumn<Self>> {
            match column {
                AnyDictionaryColumn::$variant(c) => Some(c),
                _ => None,
            }
        }

        fn into_value_column(column: ValueColumn<Self>) -> AnyValueColumn {
            AnyValueColumn::$variant(column)
        }

        fn into_dictionary_column(column: DictionaryColumn<Self>) -> AnyDictionaryColumn {
            AnyDictionaryColumn::$variant(column)
        }
    };
}

/// Exact conversion of an integral float; fractional, non-finite and out-of-range values fail.
fn float_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    // `i64::MAX as f64` rounds up to 2^63, which is itself out of range.
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

fn integer_from_value<I: TryFrom<i64>>(value: &Value, expected: ColumnType) -> ColumnarResult<I> {
    let wide = match value {
        Value::Int(v) => Some(i64::from(*v)),
        Value::Long(v) => Some(*v),
        Value::Float(v) => float_to_i64(f64::from(*v)),
        Value::Double(v) => float_to_i64(*v),
        Value::String(s) => s.trim().parse::<i64>().ok(),
    };
    wide.and_then(|v| I::try_from(v).ok())
        .ok_or_else(|| ColumnarError::type_mismatch(expected, value))
}

fn float_from_value(value: &Value, expected: ColumnType) -> ColumnarResult<f64> {
    match value {
        Value::Int(v) => Ok(f64::from(*v)),
        Value::Long(v) => Ok(*v as f64),
        Value::Float(v) => Ok(f64::from(*v)),
        Value::Double(v) => Ok(*v),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| ColumnarError::type_mismatch(expected, value)),
    }
}

impl ColumnElement for i32 {
    const COLUMN_TYPE: ColumnType = ColumnType::Int;

    fn from_value(value: &Value) -> ColumnarResult<Self> {
        integer_from_value(value, Self::COLUMN_TYPE)
    }

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn cmp_element(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    typed_column_access!(Int);
}

impl ColumnElement for i64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Long;

    fn from_value(value: &Value) -> ColumnarResult<Self> {
        integer_from_value(value, Self::COLUMN_TYPE)
    }

    fn to_value(&self) -> Value {
        Value::Long(*self)
    }

    fn cmp_element(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    typed_column_access!(Long);
}

impl ColumnElement for f32 {
    const COLUMN_TYPE: ColumnType = ColumnType::Float;

    fn from_value(value: &Value) -> ColumnarResult<Self> {
        match value {
            Value::Float(v) => Ok(*v),
            other => {
                let wide = float_from_value(other, Self::COLUMN_TYPE)?;
                let narrow = wide as f32;
                // Finite values beyond `f32::MAX` would silently become infinities.
                if wide.is_finite() && !narrow.is_finite() {
                    return Err(ColumnarError::type_mismatch(Self::COLUMN_TYPE, other));
                }
                Ok(narrow)
            }
        }
    }

    fn to_value(&self) -> Value {
        Value::Float(*self)
    }

    fn cmp_element(&self, other: &Self) -> Ordering {
        OrderedFloat(*self).cmp(&OrderedFloat(*other))
    }

    typed_column_access!(Float);
}

impl ColumnElement for f64 {
    const COLUMN_TYPE: ColumnType = ColumnType::Double;

    fn from_value(value: &Value) -> ColumnarResult<Self> {
        float_from_value(value, Self::COLUMN_TYPE)
    }

    fn to_value(&self) -> Value {
        Value::Double(*self)
    }

    fn cmp_element(&self, other: &Self) -> Ordering {
        OrderedFloat(*self).cmp(&OrderedFloat(*other))
    }

    typed_column_access!(Double);
}

impl ColumnElement for String {
    const COLUMN_TYPE: ColumnType = ColumnType::String;

    fn from_value(value: &Value) -> ColumnarResult<Self> {
        Ok(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    fn to_value(&self) -> Value {
        Value::String(self.clone())
    }

    fn cmp_element(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }

    typed_column_access!(String);
}
