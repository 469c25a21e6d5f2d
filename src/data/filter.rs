use std::collections::HashSet;
use std::hash::Hash;

use super::model::{DataTable, Record};

// ---------------------------------------------------------------------------
// Row filter: which dataset / observable / condition ids are selected
// ---------------------------------------------------------------------------

/// Selection predicate for one subplot side.
///
/// An empty id list means "no constraint" for that column.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowFilter<'a> {
    pub dataset_ids: &'a [String],
    pub observable_ids: &'a [String],
    pub condition_ids: &'a [String],
}

impl<'a> RowFilter<'a> {
    pub fn new(dataset_ids: &'a [String], observable_ids: &'a [String]) -> Self {
        Self {
            dataset_ids,
            observable_ids,
            condition_ids: &[],
        }
    }

    /// Additionally restrict rows to these simulation conditions.
    pub fn with_conditions(mut self, condition_ids: &'a [String]) -> Self {
        self.condition_ids = condition_ids;
        self
    }

    /// Whether a single row passes the filter.
    ///
    /// * dataset: the row's effective dataset id must be listed (if any are)
    /// * observable: the row's observable must be listed (if any are)
    /// * condition: the row's simulation condition must be listed (if any are)
    pub fn matches(&self, row: &Record) -> bool {
        if !self.dataset_ids.is_empty() {
            let key = row.dataset_key();
            if !self.dataset_ids.iter().any(|d| *d == key) {
                return false;
            }
        }
        if !self.observable_ids.is_empty()
            && !self.observable_ids.iter().any(|o| *o == row.observable_id)
        {
            return false;
        }
        if !self.condition_ids.is_empty()
            && !self
                .condition_ids
                .iter()
                .any(|c| *c == row.simulation_condition_id)
        {
            return false;
        }
        true
    }
}

/// Return indices of rows that pass the filter, in table order.
pub fn filtered_indices(table: &DataTable, filter: &RowFilter<'_>) -> Vec<usize> {
    table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| filter.matches(row))
        .map(|(i, _)| i)
        .collect()
}

/// Distinct items in order of first appearance.
pub fn unique_in_order<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::TableKind;

    fn row(ds: Option<&str>, obs: &str, cond: &str) -> Record {
        Record {
            observable_id: obs.to_string(),
            simulation_condition_id: cond.to_string(),
            preequilibration_condition_id: None,
            time: 0.0,
            value: 0.0,
            noise_parameters: None,
            dataset_id: ds.map(str::to_string),
        }
    }

    #[test]
    fn empty_filter_selects_everything() {
        let table = DataTable::new(
            TableKind::Measurement,
            vec![row(Some("d1"), "o1", "c1"), row(None, "o2", "c2")],
        );
        assert_eq!(filtered_indices(&table, &RowFilter::default()), vec![0, 1]);
    }

    #[test]
    fn dataset_and_observable_constraints_combine() {
        let table = DataTable::new(
            TableKind::Measurement,
            vec![
                row(Some("d1"), "o1", "c1"),
                row(Some("d1"), "o2", "c1"),
                row(Some("d2"), "o1", "c1"),
                row(None, "o1", "c3"),
            ],
        );
        let datasets = vec!["d1".to_string(), "o1_c3".to_string()];
        let observables = vec!["o1".to_string()];
        let filter = RowFilter::new(&datasets, &observables);
        assert_eq!(filtered_indices(&table, &filter), vec![0, 3]);
    }

    #[test]
    fn condition_constraint_cuts_through_a_dataset() {
        let table = DataTable::new(
            TableKind::Measurement,
            vec![
                row(Some("d1"), "o1", "c1"),
                row(Some("d1"), "o1", "c2"),
                row(Some("d1"), "o1", "c1"),
            ],
        );
        let datasets = vec!["d1".to_string()];
        let conditions = vec!["c1".to_string()];
        let filter = RowFilter::new(&datasets, &[]).with_conditions(&conditions);
        assert_eq!(filtered_indices(&table, &filter), vec![0, 2]);
    }

    #[test]
    fn unique_in_order_is_not_sorted() {
        let got = unique_in_order(["1", "10", "2", "10", "1"]);
        assert_eq!(got, vec!["1", "10", "2"]);
    }
}
