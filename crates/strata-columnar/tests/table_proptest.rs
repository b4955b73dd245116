use proptest::prelude::*;
use strata_columnar::{ColumnType, DictionaryColumn, Table, Value, ValueColumn};

fn table_with(values: &[i32], chunk_size: u32) -> Table {
    let mut table = Table::new(chunk_size);
    table.add_column("v", ColumnType::Int).unwrap();
    table.add_column("s", ColumnType::String).unwrap();
    for v in values {
        table
            .append(&[Value::Int(*v), Value::String(format!("s{}", v % 7))])
            .unwrap();
    }
    table
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn chunk_count_is_rows_over_chunk_size(
        values in proptest::collection::vec(any::<i32>(), 0..200),
        chunk_size in 1u32..16,
    ) {
        let table = table_with(&values, chunk_size);
        let expected = values.len().div_ceil(chunk_size as usize).max(1);
        prop_assert_eq!(table.chunk_count(), expected);
        prop_assert_eq!(table.row_count(), values.len());
        for chunk in &table.chunks()[..table.chunk_count() - 1] {
            prop_assert_eq!(chunk.size(), chunk_size as usize);
        }
    }

    #[test]
    fn compression_preserves_values(
        values in proptest::collection::vec(-20i32..20, 0..100),
        chunk_size in 0u32..8,
    ) {
        let mut table = table_with(&values, chunk_size);
        let before: Vec<Value> = values.iter().map(|v| Value::Int(*v)).collect();
        for chunk_id in 0..table.chunk_count() as u32 {
            table.compress_chunk(chunk_id).unwrap();
        }
        let after: Vec<Value> = table
            .chunks()
            .iter()
            .flat_map(|chunk| {
                let column = chunk.column(0).unwrap();
                (0..column.len()).map(move |offset| column.value_at(offset).unwrap())
            })
            .collect();
        prop_assert_eq!(after, before);
    }

    #[test]
    fn dictionaries_are_sorted_distinct_and_complete(
        values in proptest::collection::vec(any::<i64>(), 0..300),
    ) {
        let column: ValueColumn<i64> = values.iter().copied().collect();
        let dictionary = DictionaryColumn::from_value_column(&column).unwrap();

        let entries = dictionary.dictionary();
        prop_assert!(entries.windows(2).all(|w| w[0] < w[1]));
        for (offset, value) in values.iter().enumerate() {
            let id = dictionary.attribute_vector().get(offset).unwrap();
            prop_assert_eq!(dictionary.value_by_value_id(id), Some(value));
            prop_assert!(entries.contains(value));
        }
        prop_assert_eq!(dictionary.len(), values.len());
    }
}
