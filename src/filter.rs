use crate::schema::{Period, Record};
use log::debug;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An immutable, order-preserving subset of the record store.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FilteredView {
    records: Vec<Record>,
}

impl FilteredView {
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Filters this view again. Applying the same selection twice yields the same view.
    pub fn refilter(&self, selection: &FilterSelection) -> FilteredView {
        selection.apply(&self.records)
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<'a> IntoIterator for &'a FilteredView {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Keeps the records whose period is in `periods` and whose branch is in
/// `branches`, in input order. An empty set on either side matches nothing.
pub fn filter(
    records: &[Record],
    periods: &BTreeSet<Period>,
    branches: &BTreeSet<String>,
) -> FilteredView {
    let kept: Vec<Record> = records
        .iter()
        .filter(|r| periods.contains(&r.period) && branches.contains(&r.branch))
        .cloned()
        .collect();

    debug!(
        "Filter kept {} of {} records ({} periods, {} branches selected)",
        kept.len(),
        records.len(),
        periods.len(),
        branches.len()
    );

    FilteredView { records: kept }
}

/// The user's period and branch choices.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
pub struct FilterSelection {
    pub periods: BTreeSet<Period>,
    pub branches: BTreeSet<String>,
}

impl FilterSelection {
    pub fn new(
        periods: impl IntoIterator<Item = Period>,
        branches: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            periods: periods.into_iter().collect(),
            branches: branches.into_iter().map(Into::into).collect(),
        }
    }

    /// Selects every period and branch present in `records`.
    ///
    /// This is the "select all" default a dashboard starts with. It has to be
    /// requested explicitly: an empty selection never means "all".
    pub fn all_from(records: &[Record]) -> Self {
        Self {
            periods: records.iter().map(|r| r.period).collect(),
            branches: records.iter().map(|r| r.branch.clone()).collect(),
        }
    }

    pub fn apply(&self, records: &[Record]) -> FilteredView {
        filter(records, &self.periods, &self.branches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(month: u32) -> Period {
        Period::new(2024, month).unwrap()
    }

    fn sample_records() -> Vec<Record> {
        vec![
            Record::new(period(1), "North", "Fuel", 100.0, 80.0),
            Record::new(period(1), "South", "Fuel", 200.0, 50.0),
            Record::new(period(2), "North", "Wages", 300.0, 310.0),
            Record::new(period(3), "South", "Lodging", 400.0, 100.0),
            Record::new(period(2), "North", "Fuel", 150.0, 90.0),
        ]
    }

    #[test]
    fn test_filter_keeps_matching_rows_in_order() {
        let records = sample_records();
        let selection = FilterSelection::new(vec![period(1), period(2)], vec!["North"]);
        let view = selection.apply(&records);

        assert_eq!(view.len(), 3);
        assert_eq!(view.records()[0], records[0]);
        assert_eq!(view.records()[1], records[2]);
        assert_eq!(view.records()[2], records[4]);
    }

    #[test]
    fn test_empty_period_set_matches_nothing() {
        let records = sample_records();
        let selection = FilterSelection::new(Vec::<Period>::new(), vec!["North", "South"]);
        assert!(selection.apply(&records).is_empty());
    }

    #[test]
    fn test_empty_branch_set_matches_nothing() {
        let records = sample_records();
        let selection = FilterSelection::new(vec![period(1)], Vec::<String>::new());
        assert!(selection.apply(&records).is_empty());
    }

    #[test]
    fn test_default_selection_is_empty_not_all() {
        let records = sample_records();
        assert!(FilterSelection::default().apply(&records).is_empty());
    }

    #[test]
    fn test_all_from_selects_everything() {
        let records = sample_records();
        let selection = FilterSelection::all_from(&records);

        assert_eq!(selection.periods.len(), 3);
        assert_eq!(selection.branches.len(), 2);
        assert_eq!(selection.apply(&records).records(), records.as_slice());
    }

    #[test]
    fn test_refilter_is_idempotent() {
        let records = sample_records();
        let selection = FilterSelection::new(vec![period(2), period(3)], vec!["North", "South"]);
        let once = selection.apply(&records);
        let twice = once.refilter(&selection);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unknown_labels_match_nothing() {
        let records = sample_records();
        let selection = FilterSelection::new(vec![period(12)], vec!["East"]);
        assert!(selection.apply(&records).is_empty());
    }
}
