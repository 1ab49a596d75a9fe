use crate::error::{InsightsError, Result};
use crate::schema::{AggregateRow, BranchFigure, GroupKey, Insight};
use crate::utils::percent_of;
use log::debug;

/// Picks the most profitable and the most expensive branch and derives the
/// overall margin and the top-expense branch's share of `total_expense`.
///
/// Ties go to the row that appears first in `branch_aggregates`.
pub fn derive_insight(branch_aggregates: &[AggregateRow], total_expense: f64) -> Result<Insight> {
    if branch_aggregates.is_empty() {
        return Err(InsightsError::EmptyInput(
            "at least one branch aggregate is required to derive an insight".to_string(),
        ));
    }

    if let Some(row) = branch_aggregates
        .iter()
        .find(|r| !matches!(r.key(), GroupKey::Branch(_)))
    {
        return Err(InsightsError::InvalidGrouping(format!(
            "insight expects rows grouped by branch, got a {} row '{}'",
            row.key().dimension(),
            row.label()
        )));
    }

    let top_profit = first_max_by(branch_aggregates, AggregateRow::profit);
    let top_expense = first_max_by(branch_aggregates, AggregateRow::expense);

    let total_income: f64 = branch_aggregates.iter().map(|r| r.income()).sum();
    let total_branch_expense: f64 = branch_aggregates.iter().map(|r| r.expense()).sum();
    let total_profit = total_income - total_branch_expense;

    let overall_margin_percent = percent_of(total_profit, total_income, "overall margin")?;
    let top_expense_share_percent =
        percent_of(top_expense.expense(), total_expense, "top expense share")?;

    debug!(
        "Top profit branch: {} ({:.2}); top expense branch: {} ({:.2})",
        top_profit.label(),
        top_profit.profit(),
        top_expense.label(),
        top_expense.expense()
    );

    Ok(Insight {
        top_profit: figure_of(top_profit),
        top_expense: figure_of(top_expense),
        overall_margin_percent,
        top_expense_share_percent,
    })
}

// Strict `>` keeps the earliest row on ties. `rows` must be non-empty.
fn first_max_by<'a>(
    rows: &'a [AggregateRow],
    value: impl Fn(&AggregateRow) -> f64,
) -> &'a AggregateRow {
    let mut best = &rows[0];
    for row in &rows[1..] {
        if value(row) > value(best) {
            best = row;
        }
    }
    best
}

fn figure_of(row: &AggregateRow) -> BranchFigure {
    BranchFigure {
        branch: row.label(),
        income: row.income(),
        expense: row.expense(),
        profit: row.profit(),
    }
}
