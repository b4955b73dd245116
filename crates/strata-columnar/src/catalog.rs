#![forbid(unsafe_code)]

use crate::error::{ColumnarError, ColumnarResult};
use crate::table::Table;
use log::debug;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Name -> table registry.
///
/// There is no process-wide instance: callers create a catalog (typically behind an `Arc`) and
/// hand it to whatever needs to resolve tables by name. Every operation serializes on a single
/// lock, so a catalog can be shared across threads.
#[derive(Debug, Default)]
pub struct Catalog {
    tables: Mutex<BTreeMap<String, Arc<Table>>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> MutexGuard<'_, BTreeMap<String, Arc<Table>>> {
        // The map is never left half-updated, so a poisoned lock still guards consistent data.
        match self.tables.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn add_table(&self, name: impl Into<String>, table: Arc<Table>) -> ColumnarResult<()> {
        let name = name.into();
        let mut tables = self.tables();
        if tables.contains_key(&name) {
            return Err(ColumnarError::TableAlreadyExists(name));
        }
        debug!(
            "registered table {name:?} ({} columns, {} rows, {} chunks)",
            table.column_count(),
            table.row_count(),
            table.chunk_count()
        );
        tables.insert(name, table);
        Ok(())
    }

    pub fn get_table(&self, name: &str) -> ColumnarResult<Arc<Table>> {
        self.tables()
            .get(name)
            .cloned()
            .ok_or_else(|| ColumnarError::TableNotFound(name.to_string()))
    }

    pub fn has_table(&self, name: &str) -> bool {
        self.tables().contains_key(name)
    }

    pub fn drop_table(&self, name: &str) -> ColumnarResult<()> {
        match self.tables().remove(name) {
            Some(_) => {
                debug!("dropped table {name:?}");
                Ok(())
            }
            None => Err(ColumnarError::TableNotFound(name.to_string())),
        }
    }

    /// Registered names in ascending order.
    pub fn table_names(&self) -> Vec<String> {
        self.tables().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.tables().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables().is_empty()
    }

    /// Remove every table.
    pub fn reset(&self) {
        self.tables().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColumnType;

    fn table() -> Arc<Table> {
        let mut table = Table::new(2);
        table.add_column("a", ColumnType::Int).unwrap();
        Arc::new(table)
    }

    #[test]
    fn add_get_and_drop() {
        let catalog = Catalog::new();
        assert!(catalog.is_empty());

        let first = table();
        catalog.add_table("first", first.clone()).unwrap();
        assert!(catalog.has_table("first"));
        assert!(!catalog.has_table("second"));
        assert!(Arc::ptr_eq(&catalog.get_table("first").unwrap(), &first));

        assert_eq!(
            catalog.add_table("first", table()),
            Err(ColumnarError::TableAlreadyExists("first".to_string()))
        );
        assert_eq!(
            catalog.get_table("second").unwrap_err(),
            ColumnarError::TableNotFound("second".to_string())
        );

        catalog.drop_table("first").unwrap();
        assert!(!catalog.has_table("first"));
        assert_eq!(
            catalog.drop_table("first"),
            Err(ColumnarError::TableNotFound("first".to_string()))
        );
    }

    #[test]
    fn names_are_sorted_and_reset_clears() {
        let catalog = Catalog::new();
        for name in ["zeta", "alpha", "mid"] {
            catalog.add_table(name, table()).unwrap();
        }
        assert_eq!(catalog.table_names(), vec!["alpha", "mid", "zeta"]);
        assert_eq!(catalog.len(), 3);

        catalog.reset();
        assert!(catalog.is_empty());
        assert!(catalog.table_names().is_empty());
    }

    #[test]
    fn dropped_tables_stay_alive_for_existing_holders() {
        let catalog = Catalog::new();
        catalog.add_table("t", table()).unwrap();
        let held = catalog.get_table("t").unwrap();
        catalog.drop_table("t").unwrap();
        assert_eq!(held.column_count(), 1);
    }
}
