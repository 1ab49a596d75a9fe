use crate::error::{InsightsError, Result};
use crate::schema::Period;
use chrono::{Datelike, NaiveDate};

/// Parses a period written either as "YYYY-MM" or as a month label like "Jan-2024".
pub fn parse_period_string(period: &str) -> Result<Period> {
    let trimmed = period.trim();

    let iso = format!("{}-01", trimmed);
    if let Ok(date) = NaiveDate::parse_from_str(&iso, "%Y-%m-%d") {
        return Period::new(date.year(), date.month());
    }

    let label = format!("01-{}", trimmed);
    if let Ok(date) = NaiveDate::parse_from_str(&label, "%d-%b-%Y") {
        return Period::new(date.year(), date.month());
    }

    Err(InsightsError::InvalidPeriod(format!(
        "Invalid period format: {}. Expected 'YYYY-MM' or 'Mon-YYYY'",
        period
    )))
}

/// Returns `count` consecutive periods starting at `start`.
pub fn consecutive_periods(start: Period, count: usize) -> Vec<Period> {
    let mut periods = Vec::with_capacity(count);
    let mut current = start;
    for _ in 0..count {
        periods.push(current);
        current = current.next();
    }
    periods
}

/// `numerator / denominator * 100`, refusing a zero denominator.
///
/// `what` names the ratio in the error so the caller can tell which
/// indicator could not be computed.
pub fn percent_of(numerator: f64, denominator: f64, what: &str) -> Result<f64> {
    if denominator == 0.0 {
        return Err(InsightsError::DivisionByZero(what.to_string()));
    }
    Ok(numerator / denominator * 100.0)
}
