use crate::error::Result;
use crate::filter::FilteredView;
use crate::schema::{AggregateRow, CategoryShare, Dimension, GroupKey, TotalsSummary};
use crate::utils::percent_of;
use log::debug;
use std::collections::BTreeMap;

// Per-group running sums; profit is only derived once the sums are final.
#[derive(Default)]
struct GroupSums {
    income: f64,
    expense: f64,
}

/// Groups the view by `group_by` and sums income and expense per group.
///
/// Rows come back ordered by [`GroupKey`]: chronologically for periods,
/// lexically by name for branches and categories. An empty view yields no rows.
pub fn aggregate(view: &FilteredView, group_by: Dimension) -> Vec<AggregateRow> {
    let mut groups: BTreeMap<GroupKey, GroupSums> = BTreeMap::new();

    for record in view {
        let sums = groups.entry(group_by.key_of(record)).or_default();
        sums.income += record.income;
        sums.expense += record.expense;
    }

    debug!(
        "Aggregated {} records into {} {} groups",
        view.len(),
        groups.len(),
        group_by
    );

    groups
        .into_iter()
        .map(|(key, sums)| AggregateRow::new(key, sums.income, sums.expense))
        .collect()
}

/// Same as [`aggregate`] for callers holding the dimension as text.
pub fn aggregate_by_name(view: &FilteredView, group_by: &str) -> Result<Vec<AggregateRow>> {
    let dimension: Dimension = group_by.parse()?;
    Ok(aggregate(view, dimension))
}

/// Totals over the whole view.
pub fn summarize(view: &FilteredView) -> TotalsSummary {
    let (income, expense) = view
        .iter()
        .fold((0.0, 0.0), |(i, e), r| (i + r.income, e + r.expense));
    TotalsSummary::from_sums(income, expense)
}

/// Expense per category with its share of the view's total expense.
pub fn expense_distribution(view: &FilteredView) -> Result<Vec<CategoryShare>> {
    let rows = aggregate(view, Dimension::Category);
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let total_expense: f64 = rows.iter().map(|r| r.expense()).sum();

    rows.into_iter()
        .map(|row| -> Result<CategoryShare> {
            let share_percent = percent_of(row.expense(), total_expense, "category expense share")?;
            Ok(CategoryShare {
                category: row.label(),
                expense: row.expense(),
                share_percent,
            })
        })
        .collect()
}
