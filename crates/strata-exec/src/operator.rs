use crate::error::{ExecError, ExecResult};
use log::debug;
use std::fmt;
use std::sync::{Arc, OnceLock};
use strata_columnar::Table;

/// Write-once slot holding an operator's result.
#[derive(Default)]
pub struct OperatorOutput {
    table: OnceLock<Arc<Table>>,
}

impl OperatorOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<&Arc<Table>> {
        self.table.get()
    }

    pub fn is_set(&self) -> bool {
        self.table.get().is_some()
    }

    /// Store `table` unless a result is already present; returns the stored result either way.
    fn get_or_set(&self, table: Arc<Table>) -> Arc<Table> {
        Arc::clone(self.table.get_or_init(|| table))
    }
}

impl fmt::Debug for OperatorOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.table.get() {
            Some(table) => write!(
                f,
                "OperatorOutput({} rows, {} chunks)",
                table.row_count(),
                table.chunk_count()
            ),
            None => f.write_str("OperatorOutput(<pending>)"),
        }
    }
}

/// A node of a materializing, pull-based operator tree.
///
/// Implementors provide [`Operator::on_execute`] and a cache slot; [`Operator::execute`] takes
/// care of running upstream operators and of evaluating each operator at most once.
pub trait Operator: fmt::Debug + Send + Sync {
    fn name(&self) -> &'static str;

    /// Upstream operators, executed before this one.
    fn inputs(&self) -> Vec<Arc<dyn Operator>> {
        Vec::new()
    }

    fn output_cache(&self) -> &OperatorOutput;

    /// Compute this operator's result. Called at most once per successful execution, after all
    /// inputs have been executed.
    fn on_execute(&self) -> ExecResult<Arc<Table>>;

    fn execute(&self) -> ExecResult<Arc<Table>> {
        if let Some(table) = self.output_cache().get() {
            return Ok(Arc::clone(table));
        }
        for input in self.inputs() {
            input.execute()?;
        }
        let table = self.on_execute()?;
        debug!(
            "{} produced {} rows in {} chunks",
            self.name(),
            table.row_count(),
            table.chunk_count()
        );
        Ok(self.output_cache().get_or_set(table))
    }

    /// Cached result of a previous [`Operator::execute`].
    fn output(&self) -> ExecResult<Arc<Table>> {
        self.output_cache()
            .get()
            .cloned()
            .ok_or(ExecError::NotExecutedYet(self.name()))
    }
}
