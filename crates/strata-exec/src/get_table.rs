use crate::error::ExecResult;
use crate::operator::{Operator, OperatorOutput};
use std::sync::Arc;
use strata_columnar::{Catalog, Table};

/// Leaf operator that resolves a table by name when executed.
#[derive(Debug)]
pub struct GetTable {
    catalog: Arc<Catalog>,
    name: String,
    output: OperatorOutput,
}

impl GetTable {
    pub fn new(catalog: Arc<Catalog>, name: impl Into<String>) -> Self {
        Self {
            catalog,
            name: name.into(),
            output: OperatorOutput::new(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.name
    }
}

impl Operator for GetTable {
    fn name(&self) -> &'static str {
        "GetTable"
    }

    fn output_cache(&self) -> &OperatorOutput {
        &self.output
    }

    fn on_execute(&self) -> ExecResult<Arc<Table>> {
        Ok(self.catalog.get_table(&self.name)?)
    }
}
