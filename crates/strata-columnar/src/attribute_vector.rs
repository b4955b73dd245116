#![forbid(unsafe_code)]

use crate::error::{ColumnarError, ColumnarResult};
use crate::types::ValueId;

/// Byte width of the ids stored in an [`AttributeVector`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeVectorWidth {
    One,
    Two,
    Four,
}

impl AttributeVectorWidth {
    /// Narrowest width able to address `cardinality` distinct dictionary entries.
    pub fn for_cardinality(cardinality: usize) -> ColumnarResult<Self> {
        let cardinality = cardinality as u64;
        if cardinality <= u64::from(u8::MAX) + 1 {
            Ok(Self::One)
        } else if cardinality <= u64::from(u16::MAX) + 1 {
            Ok(Self::Two)
        } else if cardinality <= u64::from(u32::MAX) + 1 {
            Ok(Self::Four)
        } else {
            Err(ColumnarError::EncodingOverflow {
                value: cardinality - 1,
                max: u64::from(u32::MAX),
            })
        }
    }

    pub fn bytes(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Four => 4,
        }
    }

    pub fn max_value_id(self) -> ValueId {
        match self {
            Self::One => ValueId::from(u8::MAX),
            Self::Two => ValueId::from(u16::MAX),
            Self::Four => u32::MAX,
        }
    }
}

/// Row offset -> dictionary id mapping stored at the narrowest fitting width.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AttributeVector {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl AttributeVector {
    pub fn with_width(width: AttributeVectorWidth, capacity: usize) -> Self {
        match width {
            AttributeVectorWidth::One => Self::U8(Vec::with_capacity(capacity)),
            AttributeVectorWidth::Two => Self::U16(Vec::with_capacity(capacity)),
            AttributeVectorWidth::Four => Self::U32(Vec::with_capacity(capacity)),
        }
    }

    pub fn for_cardinality(cardinality: usize, capacity: usize) -> ColumnarResult<Self> {
        Ok(Self::with_width(
            AttributeVectorWidth::for_cardinality(cardinality)?,
            capacity,
        ))
    }

    pub fn width(&self) -> AttributeVectorWidth {
        match self {
            Self::U8(_) => AttributeVectorWidth::One,
            Self::U16(_) => AttributeVectorWidth::Two,
            Self::U32(_) => AttributeVectorWidth::Four,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(ids) => ids.len(),
            Self::U16(ids) => ids.len(),
            Self::U32(ids) => ids.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, index: usize) -> ColumnarResult<ValueId> {
        let id = match self {
            Self::U8(ids) => ids.get(index).map(|&id| ValueId::from(id)),
            Self::U16(ids) => ids.get(index).map(|&id| ValueId::from(id)),
            Self::U32(ids) => ids.get(index).copied(),
        };
        id.ok_or(ColumnarError::IndexOutOfRange {
            index,
            len: self.len(),
        })
    }

    /// Overwrite the id at `index`, or append when `index == len()`.
    pub fn set(&mut self, index: usize, value_id: ValueId) -> ColumnarResult<()> {
        let max = self.width().max_value_id();
        if value_id > max {
            return Err(ColumnarError::EncodingOverflow {
                value: u64::from(value_id),
                max: u64::from(max),
            });
        }

        let len = self.len();
        if index > len {
            return Err(ColumnarError::IndexOutOfRange { index, len });
        }

        // The width check above guarantees the narrowing casts are lossless.
        match self {
            Self::U8(ids) => put(ids, index, value_id as u8),
            Self::U16(ids) => put(ids, index, value_id as u16),
            Self::U32(ids) => put(ids, index, value_id),
        }
        Ok(())
    }

    pub fn push(&mut self, value_id: ValueId) -> ColumnarResult<()> {
        self.set(self.len(), value_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = ValueId> + '_ {
        (0..self.len()).map(move |index| self.id_at(index))
    }

    fn id_at(&self, index: usize) -> ValueId {
        match self {
            Self::U8(ids) => ValueId::from(ids[index]),
            Self::U16(ids) => ValueId::from(ids[index]),
            Self::U32(ids) => ids[index],
        }
    }

    /// Approximate heap footprint of the stored ids.
    pub fn size_bytes(&self) -> usize {
        self.len() * self.width().bytes()
    }
}

fn put<T>(ids: &mut Vec<T>, index: usize, id: T) {
    if index == ids.len() {
        ids.push(id);
    } else {
        ids[index] = id;
    }
}
