use crate::error::{InsightsError, Result};
use crate::utils::{parse_period_string, percent_of};
use chrono::NaiveDate;
use schemars::gen::SchemaGenerator;
use schemars::schema::Schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month. Ordering is chronological (year first, then month),
/// independent of how the label would sort as a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Period {
    year: i32,
    month: u32,
}

impl Period {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(InsightsError::InvalidPeriod(format!(
                "month {} of {} must be between 1 and 12",
                month, year
            )));
        }
        Ok(Self { year, month })
    }

    pub fn january(year: i32) -> Self {
        Self { year, month: 1 }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Sortable sequence number: months elapsed since year 0.
    pub fn sequence(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Display label such as "Jan-2024".
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(date) => date.format("%b-%Y").to_string(),
            None => self.iso(),
        }
    }

    /// Machine form "YYYY-MM", used for serialization.
    pub fn iso(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for Period {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        parse_period_string(s)
    }
}

impl TryFrom<String> for Period {
    type Error = InsightsError;

    fn try_from(value: String) -> Result<Self> {
        parse_period_string(&value)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.iso()
    }
}

impl JsonSchema for Period {
    fn schema_name() -> String {
        "Period".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> Schema {
        String::json_schema(gen)
    }
}

/// One row of financial activity for a branch and category within a period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Record {
    #[schemars(description = "Month the activity belongs to, as YYYY-MM")]
    pub period: Period,

    #[schemars(description = "Operating location the activity was recorded at")]
    pub branch: String,

    #[schemars(description = "Income/expense classification, e.g. 'Combustible' or 'Sueldos'")]
    pub category: String,

    #[schemars(description = "Non-negative income amount")]
    pub income: f64,

    #[schemars(description = "Non-negative expense amount; may exceed income")]
    pub expense: f64,
}

impl Record {
    pub fn new(
        period: Period,
        branch: impl Into<String>,
        category: impl Into<String>,
        income: f64,
        expense: f64,
    ) -> Self {
        Self {
            period,
            branch: branch.into(),
            category: category.into(),
            income,
            expense,
        }
    }

    /// Always recomputed from income and expense; can be negative.
    pub fn profit(&self) -> f64 {
        self.income - self.expense
    }
}

/// The dimensions records can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Period,
    Branch,
    Category,
}

impl Dimension {
    pub fn key_of(&self, record: &Record) -> GroupKey {
        match self {
            Dimension::Period => GroupKey::Period(record.period),
            Dimension::Branch => GroupKey::Branch(record.branch.clone()),
            Dimension::Category => GroupKey::Category(record.category.clone()),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::Period => "period",
            Dimension::Branch => "branch",
            Dimension::Category => "category",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Dimension {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "period" => Ok(Dimension::Period),
            "branch" => Ok(Dimension::Branch),
            "category" => Ok(Dimension::Category),
            _ => Err(InsightsError::InvalidGrouping(format!(
                "'{}' is not one of period, branch, category",
                s
            ))),
        }
    }
}

/// Grouping key of an aggregate row.
///
/// The derived ordering is the output order of aggregation: periods
/// chronologically, branch and category names lexically.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
#[serde(tag = "dimension", content = "value", rename_all = "snake_case")]
pub enum GroupKey {
    Period(Period),
    Branch(String),
    Category(String),
}

impl GroupKey {
    pub fn dimension(&self) -> Dimension {
        match self {
            GroupKey::Period(_) => Dimension::Period,
            GroupKey::Branch(_) => Dimension::Branch,
            GroupKey::Category(_) => Dimension::Category,
        }
    }

    pub fn label(&self) -> String {
        match self {
            GroupKey::Period(period) => period.label(),
            GroupKey::Branch(name) | GroupKey::Category(name) => name.clone(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Summed income and expense for one grouping key. Profit is derived from
/// the sums at construction and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct AggregateRow {
    key: GroupKey,
    income: f64,
    expense: f64,
    profit: f64,
}

impl AggregateRow {
    pub fn new(key: GroupKey, income: f64, expense: f64) -> Self {
        Self {
            key,
            income,
            expense,
            profit: income - expense,
        }
    }

    pub fn key(&self) -> &GroupKey {
        &self.key
    }

    pub fn label(&self) -> String {
        self.key.label()
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    pub fn expense(&self) -> f64 {
        self.expense
    }

    pub fn profit(&self) -> f64 {
        self.profit
    }
}

/// Headline indicators over the currently filtered records.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct TotalsSummary {
    pub total_income: f64,
    pub total_expense: f64,
    pub total_profit: f64,
}

impl TotalsSummary {
    pub fn from_sums(total_income: f64, total_expense: f64) -> Self {
        Self {
            total_income,
            total_expense,
            total_profit: total_income - total_expense,
        }
    }

    /// Net profit as a percentage of income.
    pub fn margin_percent(&self) -> Result<f64> {
        percent_of(self.total_profit, self.total_income, "overall margin")
    }
}

/// Raw sums for the branch selected by a ranking.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct BranchFigure {
    pub branch: String,
    pub income: f64,
    pub expense: f64,
    pub profit: f64,
}

/// Ranking facts and percentages derived from branch aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct Insight {
    #[schemars(description = "Branch with the highest net profit (first one wins ties)")]
    pub top_profit: BranchFigure,

    #[schemars(description = "Branch with the highest expenses (first one wins ties)")]
    pub top_expense: BranchFigure,

    #[schemars(description = "Total profit over total income, in percent")]
    pub overall_margin_percent: f64,

    #[schemars(description = "Top-expense branch's share of total expenses, in percent")]
    pub top_expense_share_percent: f64,
}

/// A category's slice of the total expenses.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
pub struct CategoryShare {
    pub category: String,
    pub expense: f64,
    pub share_percent: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_ordering_is_chronological() {
        let apr = Period::new(2024, 4).unwrap();
        let feb = Period::new(2024, 2).unwrap();
        let jan_next = Period::new(2025, 1).unwrap();

        // "Apr-2024" < "Feb-2024" lexically, but not chronologically
        assert!(apr.label() < feb.label());
        assert!(feb < apr);
        assert!(apr < jan_next);
        assert_eq!(jan_next.sequence() - apr.sequence(), 9);
    }

    #[test]
    fn test_period_rejects_invalid_month() {
        assert!(Period::new(2024, 0).is_err());
        assert!(Period::new(2024, 13).is_err());
    }

    #[test]
    fn test_period_serializes_as_iso() {
        let period = Period::new(2024, 6).unwrap();
        let json = serde_json::to_string(&period).unwrap();
        assert_eq!(json, "\"2024-06\"");

        let back: Period = serde_json::from_str("\"Jun-2024\"").unwrap();
        assert_eq!(back, period);

        assert!(serde_json::from_str::<Period>("\"2024-00\"").is_err());
    }

    #[test]
    fn test_record_profit_can_be_negative() {
        let record = Record::new(Period::new(2024, 1).unwrap(), "A", "Fuel", 500.0, 800.0);
        assert_eq!(record.profit(), -300.0);
    }

    #[test]
    fn test_dimension_from_str() {
        assert_eq!("Period".parse::<Dimension>().unwrap(), Dimension::Period);
        assert_eq!(" branch ".parse::<Dimension>().unwrap(), Dimension::Branch);
        assert_eq!("category".parse::<Dimension>().unwrap(), Dimension::Category);

        match "region".parse::<Dimension>() {
            Err(InsightsError::InvalidGrouping(msg)) => assert!(msg.contains("region")),
            other => panic!("expected InvalidGrouping, got {:?}", other),
        }
    }

    #[test]
    fn test_aggregate_row_profit_is_derived() {
        let row = AggregateRow::new(GroupKey::Branch("A".to_string()), 1000.0, 800.0);
        assert_eq!(row.profit(), 200.0);
        assert_eq!(row.label(), "A");
        assert_eq!(row.key().dimension(), Dimension::Branch);
    }

    #[test]
    fn test_totals_margin_zero_guard() {
        let totals = TotalsSummary::from_sums(0.0, 0.0);
        assert!(matches!(
            totals.margin_percent(),
            Err(InsightsError::DivisionByZero(_))
        ));

        let totals = TotalsSummary::from_sums(3000.0, 1300.0);
        assert!((totals.margin_percent().unwrap() - 56.67).abs() < 0.01);
    }
}
