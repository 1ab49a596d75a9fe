//! Plain-text rendering of an [`Insight`]. Numbers are derived elsewhere;
//! this module only formats them.

use crate::schema::Insight;

/// Renders the fixed three-paragraph recommendation shown under the charts.
pub fn render_recommendation(insight: &Insight) -> String {
    format!(
        "🔍 Your most profitable branch is **{}** with a net profit of {}.\n\n\
         📌 The branch that spends the most is **{}**, with expenses of {}.\n\n\
         💡 Suggestion: that branch accounts for **{}** of all expenses; reducing spending there is the most direct way to improve your overall margin ({} today).",
        insight.top_profit.branch,
        format_currency(insight.top_profit.profit),
        insight.top_expense.branch,
        format_currency(insight.top_expense.expense),
        format_percent(insight.top_expense_share_percent),
        format_percent(insight.overall_margin_percent),
    )
}

/// Whole currency units with a thousands separator, e.g. `$1,234,568`.
pub fn format_currency(amount: f64) -> String {
    let rounded = amount.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if rounded < 0.0 {
        format!("-${}", grouped)
    } else {
        format!("${}", grouped)
    }
}

pub fn format_percent(value: f64) -> String {
    format!("{:.2}%", value)
}
