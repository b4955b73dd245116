//! Materializing operators over `strata-columnar` tables.
//!
//! Each operator produces a complete [`Table`](strata_columnar::Table) on
//! [`Operator::execute`] and caches it. A [`TableScan`] emits a table of reference columns
//! pointing back into the base table, so scans can be chained without copying data.

#![forbid(unsafe_code)]

mod error;
mod get_table;
mod operator;
mod table_scan;
mod table_wrapper;

pub use crate::error::{ExecError, ExecResult};
pub use crate::get_table::GetTable;
pub use crate::operator::{Operator, OperatorOutput};
pub use crate::table_scan::{ScanType, TableScan};
pub use crate::table_wrapper::TableWrapper;
