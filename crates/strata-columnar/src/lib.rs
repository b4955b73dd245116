//! Chunked in-memory columnar storage for strata.
//!
//! This crate focuses on:
//! - Horizontally partitioned tables (chunks of a fixed row budget) with a shared schema.
//! - Two physical encodings per chunk: raw value columns and sorted-dictionary columns.
//! - Reference columns: zero-copy row addresses into another table, used as operator output.
//! - A name -> table [`Catalog`] that callers construct and pass around explicitly.

#![forbid(unsafe_code)]

mod attribute_vector;
mod catalog;
mod chunk;
mod column;
mod element;
mod error;
mod table;
mod types;

pub use crate::attribute_vector::{AttributeVector, AttributeVectorWidth};
pub use crate::catalog::Catalog;
pub use crate::chunk::Chunk;
pub use crate::column::{
    AnyDictionaryColumn, AnyValueColumn, Column, DictionaryColumn, ReferenceColumn, ValueColumn,
};
pub use crate::element::ColumnElement;
pub use crate::error::{ColumnarError, ColumnarResult};
pub use crate::table::{ColumnSchema, Table, TableOptions};
pub use crate::types::{
    ChunkId, ChunkOffset, ColumnId, ColumnType, PosList, RowId, Value, ValueId,
};
