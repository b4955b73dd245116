use crate::error::ExecResult;
use crate::operator::{Operator, OperatorOutput};
use std::sync::Arc;
use strata_columnar::Table;

/// Leaf operator over a table that is already at hand.
#[derive(Debug)]
pub struct TableWrapper {
    table: Arc<Table>,
    output: OperatorOutput,
}

impl TableWrapper {
    pub fn new(table: Arc<Table>) -> Self {
        Self {
            table,
            output: OperatorOutput::new(),
        }
    }
}

impl Operator for TableWrapper {
    fn name(&self) -> &'static str {
        "TableWrapper"
    }

    fn output_cache(&self) -> &OperatorOutput {
        &self.output
    }

    fn on_execute(&self) -> ExecResult<Arc<Table>> {
        Ok(Arc::clone(&self.table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExecError;

    #[test]
    fn output_is_the_wrapped_table() {
        let table = Arc::new(Table::new(2));
        let wrapper = TableWrapper::new(table.clone());

        assert_eq!(
            wrapper.output().unwrap_err(),
            ExecError::NotExecutedYet("TableWrapper")
        );
        assert!(!wrapper.output_cache().is_set());

        let out = wrapper.execute().unwrap();
        assert!(Arc::ptr_eq(&out, &table));
        assert!(Arc::ptr_eq(&wrapper.output().unwrap(), &table));
        assert!(Arc::ptr_eq(&wrapper.execute().unwrap(), &table));
    }
}
