use std::collections::{BTreeMap, BTreeSet};

use super::model::{CellValue, Record, Table};

// ---------------------------------------------------------------------------
// Column selections: which unique values are selected per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps column_name → set of selected values.
/// A column absent from the map is unconstrained.
pub type FilterState = BTreeMap<String, BTreeSet<CellValue>>;

/// Initialise a [`FilterState`] with every value of `columns` selected.
pub fn init_filter_state(table: &Table, columns: &[&str]) -> FilterState {
    columns
        .iter()
        .map(|col| (col.to_string(), table.unique_values(col)))
        .collect()
}

/// Return indices of rows that pass all active selections.
///
/// A row passes a column selection when:
/// * The column is not present in `filters` → passes (no constraint)
/// * The selection for that column is empty → nothing selected → fails
/// * The row's value for that column is in the selected set → passes
///   (a missing cell is Null, so it passes only if Null is selected)
pub fn filtered_indices(table: &Table, filters: &FilterState) -> Vec<usize> {
    table
        .records
        .iter()
        .enumerate()
        .filter(|(_, record)| {
            filters
                .iter()
                .all(|(col, selected)| selected.contains(record.get(col)))
        })
        .map(|(i, _)| i)
        .collect()
}

/// Rows passing `filters`, as a new table.
pub fn select(table: &Table, filters: &FilterState) -> Table {
    let records = filtered_indices(table, filters)
        .into_iter()
        .map(|i| table.records[i].clone())
        .collect();
    Table::new(table.columns.clone(), records)
}

// ---------------------------------------------------------------------------
// Predicate filtering and grouping
// ---------------------------------------------------------------------------

/// Rows matching an arbitrary predicate, leaving `table` untouched.
pub fn where_rows<F>(table: &Table, pred: F) -> Table
where
    F: Fn(&Record) -> bool,
{
    let records = table.records.iter().filter(|r| pred(r)).cloned().collect();
    Table::new(table.columns.clone(), records)
}

/// Row indices grouped by the value of `column`.
pub fn group_by(table: &Table, column: &str) -> BTreeMap<CellValue, Vec<usize>> {
    let mut groups: BTreeMap<CellValue, Vec<usize>> = BTreeMap::new();
    for (i, record) in table.records.iter().enumerate() {
        groups.entry(record.get(column).clone()).or_default().push(i);
    }
    groups
}

/// Occurrences of each value of `column`, most frequent first. Ties keep
/// value order. Nulls are not counted.
pub fn value_counts(table: &Table, column: &str) -> Vec<(CellValue, usize)> {
    let mut counts: Vec<(CellValue, usize)> = group_by(table, column)
        .into_iter()
        .filter(|(value, _)| !value.is_null())
        .map(|(value, rows)| (value, rows.len()))
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn players() -> Table {
        let rows = [("Argentina", "Left"), ("Brazil", "Right"), ("Brazil", "Left")]
            .into_iter()
            .enumerate()
            .map(|(i, (nat, foot))| {
                Record::new(i)
                    .with("Nationality", CellValue::String(nat.into()))
                    .with("Preferred Foot", CellValue::String(foot.into()))
            })
            .collect();
        Table::new(vec!["Nationality".into(), "Preferred Foot".into()], rows)
    }

    #[test]
    fn full_selection_keeps_everything() {
        let t = players();
        let state = init_filter_state(&t, &["Nationality"]);
        assert_eq!(filtered_indices(&t, &state), vec![0, 1, 2]);
    }

    #[test]
    fn narrowed_selection_filters_rows() {
        let t = players();
        let mut state = init_filter_state(&t, &["Preferred Foot"]);
        state
            .get_mut("Preferred Foot")
            .expect("column selected")
            .remove(&CellValue::String("Right".into()));
        assert_eq!(filtered_indices(&t, &state), vec![0, 2]);
        assert_eq!(select(&t, &state).len(), 2);
    }

    #[test]
    fn empty_selection_hides_all() {
        let t = players();
        let mut state = FilterState::new();
        state.insert("Nationality".into(), BTreeSet::new());
        assert!(filtered_indices(&t, &state).is_empty());
    }

    #[test]
    fn counts_and_groups() {
        let t = players();
        let counts = value_counts(&t, "Nationality");
        assert_eq!(counts[0], (CellValue::String("Brazil".into()), 2));
        let groups = group_by(&t, "Preferred Foot");
        assert_eq!(groups[&CellValue::String("Left".into())], vec![0, 2]);
        let lefties = where_rows(&t, |r| r.get("Preferred Foot").as_str() == Some("Left"));
        assert_eq!(lefties.len(), 2);
    }
}
