use crate::error::{ExecError, ExecResult};
use crate::operator::{Operator, OperatorOutput};
use log::{debug, trace};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use strata_columnar::{
    with_element_type, AttributeVector, Chunk, ChunkId, ChunkOffset, Column, ColumnElement,
    ColumnId, ColumnarError, DictionaryColumn, PosList, ReferenceColumn, RowId, Table, Value,
    ValueId,
};

/// Comparison applied between a stored value (left) and the search value (right).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScanType {
    Equals,
    NotEquals,
    LessThan,
    LessOrEqual,
    GreaterThan,
    GreaterOrEqual,
}

impl ScanType {
    pub const ALL: [ScanType; 6] = [
        ScanType::Equals,
        ScanType::NotEquals,
        ScanType::LessThan,
        ScanType::LessOrEqual,
        ScanType::GreaterThan,
        ScanType::GreaterOrEqual,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            ScanType::Equals => "=",
            ScanType::NotEquals => "!=",
            ScanType::LessThan => "<",
            ScanType::LessOrEqual => "<=",
            ScanType::GreaterThan => ">",
            ScanType::GreaterOrEqual => ">=",
        }
    }

    /// Whether `stored.cmp(search) == ordering` satisfies this comparison.
    pub fn accepts(self, ordering: Ordering) -> bool {
        match self {
            ScanType::Equals => ordering == Ordering::Equal,
            ScanType::NotEquals => ordering != Ordering::Equal,
            ScanType::LessThan => ordering == Ordering::Less,
            ScanType::LessOrEqual => ordering != Ordering::Greater,
            ScanType::GreaterThan => ordering == Ordering::Greater,
            ScanType::GreaterOrEqual => ordering != Ordering::Less,
        }
    }
}

impl fmt::Display for ScanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for ScanType {
    type Err = ExecError;

    fn from_str(symbol: &str) -> Result<Self, Self::Err> {
        Ok(match symbol {
            "=" | "==" => ScanType::Equals,
            "!=" | "<>" => ScanType::NotEquals,
            "<" => ScanType::LessThan,
            "<=" => ScanType::LessOrEqual,
            ">" => ScanType::GreaterThan,
            ">=" => ScanType::GreaterOrEqual,
            other => {
                return Err(ExecError::NotImplemented(format!(
                    "scan type {other:?}"
                )))
            }
        })
    }
}

/// Filters the rows of its input by comparing one column against a search value.
///
/// The output table has the base table's schema and a single chunk whose columns are all
/// [`ReferenceColumn`]s sharing one position list. When the input is itself a scan result, the
/// matches are expressed against the table that input refers to, so chained scans never nest
/// references. Only one level is followed: a table whose reference columns point at another
/// reference table is matched by value and keeps that intermediate table as its base.
#[derive(Debug)]
pub struct TableScan {
    input: Arc<dyn Operator>,
    column_id: ColumnId,
    scan_type: ScanType,
    search_value: Value,
    output: OperatorOutput,
}

impl TableScan {
    pub fn new(
        input: Arc<dyn Operator>,
        column_id: ColumnId,
        scan_type: ScanType,
        search_value: impl Into<Value>,
    ) -> Self {
        Self {
            input,
            column_id,
            scan_type,
            search_value: search_value.into(),
            output: OperatorOutput::new(),
        }
    }

    pub fn column_id(&self) -> ColumnId {
        self.column_id
    }

    pub fn scan_type(&self) -> ScanType {
        self.scan_type
    }

    pub fn search_value(&self) -> &Value {
        &self.search_value
    }

    fn scan<T: ColumnElement>(&self, input: &Arc<Table>) -> ExecResult<(Arc<Table>, PosList)> {
        // Convert up front so a bad literal fails before any chunk is read.
        let search = T::from_value(&self.search_value)?;
        let mut base = BaseTable::default();
        let mut positions = PosList::new();

        for (chunk_id, chunk) in (0..).zip(input.chunks()) {
            let column = chunk.column(self.column_id)?;
            if let Column::Reference(reference) = column {
                base.observe(reference.referenced_table())?;
                self.scan_reference(reference, &search, &mut positions)?;
            } else {
                base.observe(input)?;
                let matcher = ChunkMatcher::new(column, &search, self.scan_type)?;
                trace!("chunk {chunk_id}: {}", matcher.describe());
                matcher.collect(chunk_id, column.len(), &mut positions)?;
            }
        }

        let base = base.into_table().unwrap_or_else(|| Arc::clone(input));
        Ok((base, positions))
    }

    /// Match the rows a reference column points at. The matcher for each referenced chunk is
    /// built on first use and reused for every later position in that chunk.
    fn scan_reference<T: ColumnElement>(
        &self,
        reference: &ReferenceColumn,
        search: &T,
        positions: &mut PosList,
    ) -> ExecResult<()> {
        let chunk_count = reference.referenced_table().chunk_count();
        let mut matchers: Vec<Option<ChunkMatcher<'_, T>>> =
            (0..chunk_count).map(|_| None).collect();

        for &row_id in reference.pos_list().iter() {
            let column = reference.resolve(row_id)?;
            let slot = matchers.get_mut(row_id.chunk_id as usize).ok_or(
                ColumnarError::IndexOutOfRange {
                    index: row_id.chunk_id as usize,
                    len: chunk_count,
                },
            )?;
            if slot.is_none() {
                let matcher = ChunkMatcher::new(column, search, self.scan_type)?;
                trace!("referenced chunk {}: {}", row_id.chunk_id, matcher.describe());
                *slot = Some(matcher);
            }
            if let Some(matcher) = slot {
                if matcher.matches(row_id.chunk_offset as usize)? {
                    positions.push(row_id);
                }
            }
        }
        Ok(())
    }
}

impl Operator for TableScan {
    fn name(&self) -> &'static str {
        "TableScan"
    }

    fn inputs(&self) -> Vec<Arc<dyn Operator>> {
        vec![Arc::clone(&self.input)]
    }

    fn output_cache(&self) -> &OperatorOutput {
        &self.output
    }

    fn on_execute(&self) -> ExecResult<Arc<Table>> {
        let input = self.input.execute()?;
        let column_type = input.column_type(self.column_id)?;
        let (base, positions) = with_element_type!(column_type, T => self.scan::<T>(&input)?);

        debug!(
            "scan column {} ({column_type}) {} {}: {} of {} rows matched",
            self.column_id,
            self.scan_type,
            self.search_value,
            positions.len(),
            input.row_count()
        );
        reference_table(&base, positions)
    }
}

/// One chunk of reference columns, one per column of `base`, all sharing `positions`.
fn reference_table(base: &Arc<Table>, positions: PosList) -> ExecResult<Arc<Table>> {
    let positions = Arc::new(positions);
    let mut table = Table::new(0);
    let mut chunk = Chunk::new();
    for (column_id, schema) in (0..).zip(base.schema()) {
        table.add_column_definition(schema.name.clone(), schema.column_type);
        chunk.add_column(Column::Reference(ReferenceColumn::new(
            Arc::clone(base),
            column_id,
            Arc::clone(&positions),
        )))?;
    }
    table.emplace_chunk(chunk)?;
    Ok(Arc::new(table))
}

/// The single table every scanned chunk must resolve to.
#[derive(Default)]
struct BaseTable(Option<Arc<Table>>);

impl BaseTable {
    fn observe(&mut self, table: &Arc<Table>) -> ExecResult<()> {
        if let Some(base) = &self.0 {
            return if Arc::ptr_eq(base, table) {
                Ok(())
            } else {
                Err(ExecError::ReferencedTableMismatch)
            };
        }
        self.0 = Some(Arc::clone(table));
        Ok(())
    }

    fn into_table(self) -> Option<Arc<Table>> {
        self.0
    }
}

/// Per-chunk match decision for one column.
enum ChunkMatcher<'a, T> {
    Nothing,
    Everything,
    /// Compare stored values directly.
    Values {
        values: &'a [T],
        search: &'a T,
        scan_type: ScanType,
    },
    /// Compare dictionary ids against `bound`; the dictionary itself is not read again.
    ValueIds {
        ids: &'a AttributeVector,
        bound: ValueId,
        scan_type: ScanType,
    },
    /// The referenced column is itself a reference column (a hand-built chain). Rows are matched
    /// on the values it resolves to, but the chain is not flattened: emitted row ids address the
    /// intermediate table, which becomes the scan's base table.
    Indirect {
        column: &'a ReferenceColumn,
        search: &'a T,
        scan_type: ScanType,
    },
}

impl<'a, T: ColumnElement> ChunkMatcher<'a, T> {
    fn new(column: &'a Column, search: &'a T, scan_type: ScanType) -> ExecResult<Self> {
        let found = column.column_type()?;
        if found != T::COLUMN_TYPE {
            return Err(ExecError::UnknownColumnType {
                expected: T::COLUMN_TYPE,
                found,
            });
        }
        let mismatch = || ExecError::UnknownColumnType {
            expected: T::COLUMN_TYPE,
            found,
        };

        Ok(match column {
            Column::Value(_) => ChunkMatcher::Values {
                values: column.as_value::<T>().ok_or_else(mismatch)?.values(),
                search,
                scan_type,
            },
            Column::Dictionary(_) => ChunkMatcher::for_dictionary(
                column.as_dictionary::<T>().ok_or_else(mismatch)?,
                search,
                scan_type,
            ),
            Column::Reference(reference) => ChunkMatcher::Indirect {
                column: reference,
                search,
                scan_type,
            },
        })
    }

    fn for_dictionary(column: &'a DictionaryColumn<T>, search: &T, scan_type: ScanType) -> Self {
        let ids = column.attribute_vector();
        let Some(bound) = column.lower_bound(search) else {
            // Every dictionary entry is smaller than the search value.
            return match scan_type {
                ScanType::Equals | ScanType::GreaterThan | ScanType::GreaterOrEqual => {
                    ChunkMatcher::Nothing
                }
                ScanType::NotEquals | ScanType::LessThan | ScanType::LessOrEqual => {
                    ChunkMatcher::Everything
                }
            };
        };

        let exact = column
            .value_by_value_id(bound)
            .is_some_and(|entry| entry.cmp_element(search) == Ordering::Equal);
        if exact {
            return ChunkMatcher::ValueIds {
                ids,
                bound,
                scan_type,
            };
        }

        // The search value falls strictly between entries `bound - 1` and `bound`: ids below
        // `bound` are smaller than it, ids from `bound` on are greater.
        match scan_type {
            ScanType::Equals => ChunkMatcher::Nothing,
            ScanType::NotEquals => ChunkMatcher::Everything,
            ScanType::LessThan | ScanType::LessOrEqual if bound == 0 => ChunkMatcher::Nothing,
            ScanType::LessThan | ScanType::LessOrEqual => ChunkMatcher::ValueIds {
                ids,
                bound,
                scan_type: ScanType::LessThan,
            },
            ScanType::GreaterThan | ScanType::GreaterOrEqual if bound == 0 => {
                ChunkMatcher::Everything
            }
            ScanType::GreaterThan | ScanType::GreaterOrEqual => ChunkMatcher::ValueIds {
                ids,
                bound,
                scan_type: ScanType::GreaterOrEqual,
            },
        }
    }

    fn matches(&self, offset: usize) -> ExecResult<bool> {
        Ok(match self {
            ChunkMatcher::Nothing => false,
            ChunkMatcher::Everything => true,
            ChunkMatcher::Values {
                values,
                search,
                scan_type,
            } => {
                let stored = values.get(offset).ok_or(ColumnarError::IndexOutOfRange {
                    index: offset,
                    len: values.len(),
                })?;
                scan_type.accepts(stored.cmp_element(search))
            }
            ChunkMatcher::ValueIds {
                ids,
                bound,
                scan_type,
            } => scan_type.accepts(ids.get(offset)?.cmp(bound)),
            ChunkMatcher::Indirect {
                column,
                search,
                scan_type,
            } => {
                let stored = T::from_value(&column.value_at(offset)?)?;
                scan_type.accepts(stored.cmp_element(search))
            }
        })
    }

    /// Append the matching rows of a chunk with `len` rows.
    fn collect(&self, chunk_id: ChunkId, len: usize, positions: &mut PosList) -> ExecResult<()> {
        let rows = ChunkOffset::try_from(len).map_err(|_| ColumnarError::IndexOutOfRange {
            index: len,
            len: ChunkOffset::MAX as usize,
        })?;
        match self {
            ChunkMatcher::Nothing => {}
            ChunkMatcher::Everything => {
                positions.extend((0..rows).map(|offset| RowId::new(chunk_id, offset)));
            }
            _ => {
                for offset in 0..rows {
                    if self.matches(offset as usize)? {
                        positions.push(RowId::new(chunk_id, offset));
                    }
                }
            }
        }
        Ok(())
    }

    fn describe(&self) -> String {
        match self {
            ChunkMatcher::Nothing => "no rows match".to_string(),
            ChunkMatcher::Everything => "all rows match".to_string(),
            ChunkMatcher::Values { scan_type, .. } => format!("value scan {scan_type}"),
            ChunkMatcher::ValueIds {
                bound, scan_type, ..
            } => format!("value id {scan_type} {bound}"),
            ChunkMatcher::Indirect { scan_type, .. } => format!("indirect scan {scan_type}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table_wrapper::TableWrapper;
    use strata_columnar::{ColumnType, ValueColumn};

    fn dictionary(values: &[i32]) -> DictionaryColumn<i32> {
        let column: ValueColumn<i32> = values.iter().copied().collect();
        DictionaryColumn::from_value_column(&column).unwrap()
    }

    fn matched(column: &DictionaryColumn<i32>, search: i32, scan_type: ScanType) -> Vec<usize> {
        let matcher = ChunkMatcher::for_dictionary(column, &search, scan_type);
        (0..column.len())
            .filter(|&offset| matcher.matches(offset).unwrap())
            .collect()
    }

    #[test]
    fn scan_type_symbols() {
        assert_eq!("==".parse::<ScanType>(), Ok(ScanType::Equals));
        assert_eq!("<>".parse::<ScanType>(), Ok(ScanType::NotEquals));
        for scan_type in ScanType::ALL {
            assert_eq!(scan_type.symbol().parse::<ScanType>(), Ok(scan_type));
        }
        assert_eq!(
            "LIKE".parse::<ScanType>(),
            Err(ExecError::NotImplemented("scan type \"LIKE\"".to_string()))
        );
    }

    #[test]
    fn dictionary_search_between_entries() {
        // dictionary [10, 20, 30], rows use ids [2, 0, 1, 0]
        let column = dictionary(&[30, 10, 20, 10]);

        assert_eq!(matched(&column, 15, ScanType::Equals), Vec::<usize>::new());
        assert_eq!(matched(&column, 15, ScanType::NotEquals), vec![0, 1, 2, 3]);
        assert_eq!(matched(&column, 15, ScanType::LessThan), vec![1, 3]);
        assert_eq!(matched(&column, 15, ScanType::LessOrEqual), vec![1, 3]);
        assert_eq!(matched(&column, 15, ScanType::GreaterThan), vec![0, 2]);
        assert_eq!(matched(&column, 15, ScanType::GreaterOrEqual), vec![0, 2]);
    }

    #[test]
    fn dictionary_search_outside_entries() {
        let column = dictionary(&[30, 10, 20, 10]);

        assert_eq!(matched(&column, 5, ScanType::LessOrEqual), Vec::<usize>::new());
        assert_eq!(matched(&column, 5, ScanType::GreaterThan), vec![0, 1, 2, 3]);
        assert_eq!(matched(&column, 35, ScanType::GreaterOrEqual), Vec::<usize>::new());
        assert_eq!(matched(&column, 35, ScanType::LessThan), vec![0, 1, 2, 3]);
        assert_eq!(matched(&column, 35, ScanType::NotEquals), vec![0, 1, 2, 3]);
    }

    #[test]
    fn dictionary_search_on_an_entry() {
        let column = dictionary(&[30, 10, 20, 10]);

        assert_eq!(matched(&column, 10, ScanType::Equals), vec![1, 3]);
        assert_eq!(matched(&column, 20, ScanType::LessOrEqual), vec![1, 2, 3]);
        assert_eq!(matched(&column, 20, ScanType::GreaterThan), vec![0]);
        assert_eq!(matched(&column, 30, ScanType::NotEquals), vec![1, 2, 3]);
    }

    #[test]
    fn nested_references_match_by_value_against_the_intermediate_table() {
        let mut source = Table::new(2);
        source.add_column("a", ColumnType::Int).unwrap();
        for v in [5, 6, 7] {
            source.append(&[Value::Int(v)]).unwrap();
        }
        let source = Arc::new(source);

        let referencing = |base: Arc<Table>, positions: Vec<RowId>| {
            let mut table = Table::new(0);
            table.add_column_definition("a", ColumnType::Int);
            let mut chunk = Chunk::new();
            chunk
                .add_column(Column::Reference(ReferenceColumn::new(
                    base,
                    0,
                    Arc::new(positions),
                )))
                .unwrap();
            table.emplace_chunk(chunk).unwrap();
            Arc::new(table)
        };
        // rows 7, 5
        let middle = referencing(source, vec![RowId::new(1, 0), RowId::new(0, 0)]);
        // rows 5, 7, 5
        let outer = referencing(
            middle.clone(),
            vec![RowId::new(0, 1), RowId::new(0, 0), RowId::new(0, 1)],
        );

        let scan = TableScan::new(
            Arc::new(TableWrapper::new(outer)),
            0,
            ScanType::LessThan,
            6,
        );
        let out = scan.execute().unwrap();
        let reference = out.chunk(0).unwrap().column(0).unwrap().as_reference().unwrap();
        assert!(Arc::ptr_eq(reference.referenced_table(), &middle));
        assert_eq!(
            reference.pos_list().as_slice(),
            &[RowId::new(0, 1), RowId::new(0, 1)]
        );
        assert_eq!(out.value(0, RowId::new(0, 0)), Ok(Value::Int(5)));
    }

    #[test]
    fn mixing_stored_and_referenced_chunks_is_rejected() {
        let mut base = Table::new(0);
        base.add_column("a", ColumnType::Int).unwrap();
        base.append(&[Value::Int(1)]).unwrap();
        let base = Arc::new(base);

        let mut mixed = Table::new(0);
        mixed.add_column_definition("a", ColumnType::Int);
        let mut stored = Chunk::new();
        stored.add_column(Column::new_value(ColumnType::Int)).unwrap();
        stored.append(&[Value::Int(1)]).unwrap();
        mixed.emplace_chunk(stored).unwrap();
        let mut referenced = Chunk::new();
        referenced
            .add_column(Column::Reference(ReferenceColumn::new(
                base,
                0,
                Arc::new(vec![RowId::new(0, 0)]),
            )))
            .unwrap();
        mixed.emplace_chunk(referenced).unwrap();

        let scan = TableScan::new(
            Arc::new(TableWrapper::new(Arc::new(mixed))),
            0,
            ScanType::Equals,
            1,
        );
        assert_eq!(scan.execute().unwrap_err(), ExecError::ReferencedTableMismatch);
    }
}
