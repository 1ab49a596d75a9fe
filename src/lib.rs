//! # Branch Insights Engine
//!
//! A library for turning flat income/expense records into the indicators a
//! small financial dashboard shows: headline totals, monthly and per-branch
//! breakdowns, the expense split by category, and a short recommendation
//! naming the most profitable and the most expensive branch.
//!
//! ## Core Concepts
//!
//! - **Record Store**: an ordered `Vec<Record>` supplied by a [`RecordSource`]
//! - **Filter Stage**: [`filter`] keeps the records matching a period set and a branch set
//! - **Aggregation Stage**: [`aggregate`] sums income and expense per period, branch or category
//! - **Insight Stage**: [`derive_insight`] ranks branches and derives margin and expense share
//! - **Recommendation**: [`render_recommendation`] formats an [`Insight`] as text
//!
//! Every stage is a pure function of its inputs; a filter change means
//! running the pipeline again from the record store.
//!
//! ## Example
//!
//! ```rust
//! use branch_insights_engine::*;
//!
//! let jan = Period::new(2024, 1).unwrap();
//! let records = vec![
//!     Record::new(jan, "A", "Fuel", 1000.0, 800.0),
//!     Record::new(jan, "B", "Fuel", 2000.0, 500.0),
//! ];
//!
//! let selection = FilterSelection::all_from(&records);
//! let report = build_report(&records, &selection).unwrap();
//!
//! assert_eq!(report.insight.top_profit.branch, "B");
//! assert_eq!(report.insight.top_expense.branch, "A");
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filter;
pub mod ingestion;
pub mod insight;
pub mod recommendation;
pub mod schema;
pub mod utils;

pub use config::DashboardConfig;
pub use engine::{aggregate, aggregate_by_name, expense_distribution, summarize};
pub use error::{InsightsError, Result};
pub use filter::{filter, FilterSelection, FilteredView};
pub use ingestion::{FixtureSource, JsonFileSource, RecordSource, SampleDataGenerator};
pub use insight::derive_insight;
pub use recommendation::{format_currency, format_percent, render_recommendation};
pub use schema::*;
pub use utils::*;

use log::{debug, info};
use schemars::JsonSchema;
use serde::Serialize;

/// Everything the dashboard draws for one filter state.
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct DashboardReport {
    pub selection: FilterSelection,
    pub totals: TotalsSummary,
    /// Total profit over total income of the filtered records, in percent
    pub margin_percent: f64,
    /// Chronological
    pub by_period: Vec<AggregateRow>,
    /// Lexical by branch name
    pub by_branch: Vec<AggregateRow>,
    pub expense_by_category: Vec<CategoryShare>,
    /// Filtered records, sorted by period (stable within a period)
    pub detail: Vec<Record>,
    pub insight: Insight,
    pub recommendation: String,
}

impl DashboardReport {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(DashboardReport);
        serde_json::to_string_pretty(&schema)
    }
}

pub struct DashboardProcessor;

impl DashboardProcessor {
    pub fn process(records: &[Record], selection: &FilterSelection) -> Result<DashboardReport> {
        info!(
            "Building dashboard report over {} records ({} periods, {} branches selected)",
            records.len(),
            selection.periods.len(),
            selection.branches.len()
        );

        let view = selection.apply(records);

        let totals = summarize(&view);
        let margin_percent = totals.margin_percent()?;

        let by_period = aggregate(&view, Dimension::Period);
        let by_branch = aggregate(&view, Dimension::Branch);
        let expense_by_category = expense_distribution(&view)?;

        let insight = derive_insight(&by_branch, totals.total_expense)?;
        let recommendation = render_recommendation(&insight);

        let mut detail = view.into_records();
        detail.sort_by_key(|r| r.period);

        debug!(
            "Report has {} period rows, {} branch rows, {} categories",
            by_period.len(),
            by_branch.len(),
            expense_by_category.len()
        );

        Ok(DashboardReport {
            selection: selection.clone(),
            totals,
            margin_percent,
            by_period,
            by_branch,
            expense_by_category,
            detail,
            insight,
            recommendation,
        })
    }

    /// Loads the records from `source` and builds the report. Without an
    /// explicit selection every period and branch in the data is selected.
    pub fn process_source(
        source: &dyn RecordSource,
        selection: Option<&FilterSelection>,
    ) -> Result<DashboardReport> {
        let records = source.records()?;
        match selection {
            Some(selection) => Self::process(&records, selection),
            None => Self::process(&records, &FilterSelection::all_from(&records)),
        }
    }
}

pub fn build_report(records: &[Record], selection: &FilterSelection) -> Result<DashboardReport> {
    DashboardProcessor::process(records, selection)
}
