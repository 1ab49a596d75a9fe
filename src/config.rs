use crate::error::{InsightsError, Result};
use crate::schema::Period;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Describes the organization and the shape of the sample data the
/// dashboard runs on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DashboardConfig {
    #[schemars(description = "Name shown in the dashboard title")]
    pub organization_name: String,

    #[schemars(description = "First month of generated data, as YYYY-MM or Mon-YYYY")]
    pub start_period: Period,

    #[schemars(description = "Number of consecutive months to generate")]
    pub months: usize,

    #[schemars(description = "Known branch names, in display order")]
    pub branches: Vec<String>,

    #[schemars(description = "Known income/expense categories, in display order")]
    pub categories: Vec<String>,

    #[serde(default = "default_seed")]
    #[schemars(description = "Seed of the sample data generator; the same seed yields the same records")]
    pub seed: u64,

    #[serde(default = "default_income_min")]
    #[schemars(description = "Lower bound (inclusive) of generated income per record")]
    pub income_min: u64,

    #[serde(default = "default_income_max")]
    #[schemars(description = "Upper bound (exclusive) of generated income per record")]
    pub income_max: u64,

    #[serde(default = "default_expense_ratio_min")]
    #[schemars(description = "Lower bound of expense as a fraction of income")]
    pub expense_ratio_min: f64,

    #[serde(default = "default_expense_ratio_max")]
    #[schemars(description = "Upper bound of expense as a fraction of income")]
    pub expense_ratio_max: f64,
}

fn default_seed() -> u64 {
    42
}

fn default_income_min() -> u64 {
    300_000
}

fn default_income_max() -> u64 {
    1_200_000
}

fn default_expense_ratio_min() -> f64 {
    0.6
}

fn default_expense_ratio_max() -> f64 {
    0.95
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            organization_name: "Kairos Flow".to_string(),
            start_period: Period::january(2024),
            months: 6,
            branches: vec![
                "Estación Norte".to_string(),
                "Hotel Central".to_string(),
                "Bar del Sur".to_string(),
            ],
            categories: vec![
                "Combustible".to_string(),
                "Hospedaje".to_string(),
                "Gastronomía".to_string(),
                "Mantenimiento".to_string(),
                "Sueldos".to_string(),
            ],
            seed: default_seed(),
            income_min: default_income_min(),
            income_max: default_income_max(),
            expense_ratio_min: default_expense_ratio_min(),
            expense_ratio_max: default_expense_ratio_max(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DashboardConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.months == 0 {
            return Err(InsightsError::InvalidConfig(
                "months must be at least 1".to_string(),
            ));
        }

        check_names("branch", &self.branches)?;
        check_names("category", &self.categories)?;

        if self.income_min >= self.income_max {
            return Err(InsightsError::InvalidConfig(format!(
                "income_min ({}) must be below income_max ({})",
                self.income_min, self.income_max
            )));
        }

        if !(0.0..self.expense_ratio_max).contains(&self.expense_ratio_min) {
            return Err(InsightsError::InvalidConfig(format!(
                "expense ratio range [{}, {}) must be non-negative and non-empty",
                self.expense_ratio_min, self.expense_ratio_max
            )));
        }

        Ok(())
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        let schema = schemars::schema_for!(DashboardConfig);
        serde_json::to_string_pretty(&schema)
    }
}

fn check_names(kind: &str, names: &[String]) -> Result<()> {
    if names.is_empty() {
        return Err(InsightsError::InvalidConfig(format!(
            "at least one {} is required",
            kind
        )));
    }

    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(InsightsError::InvalidConfig(format!("empty {} name", kind)));
        }
        if !seen.insert(name.as_str()) {
            return Err(InsightsError::InvalidConfig(format!(
                "duplicate {} '{}'",
                kind, name
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = DashboardConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.branches.len(), 3);
        assert_eq!(config.categories.len(), 5);
        assert_eq!(config.start_period.label(), "Jan-2024");
    }

    #[test]
    fn test_from_json_applies_defaults() {
        let json = r#"{
            "organization_name": "Test Corp",
            "start_period": "Nov-2023",
            "months": 3,
            "branches": ["North", "South"],
            "categories": ["Fuel"]
        }"#;

        let config = DashboardConfig::from_json_str(json).unwrap();
        assert_eq!(config.start_period, Period::new(2023, 11).unwrap());
        assert_eq!(config.seed, 42);
        assert_eq!(config.income_min, 300_000);
        assert_eq!(config.income_max, 1_200_000);
    }

    #[test]
    fn test_invalid_configs_are_rejected() {
        let mut config = DashboardConfig::default();
        config.months = 0;
        assert!(matches!(config.validate(), Err(InsightsError::InvalidConfig(_))));

        let mut config = DashboardConfig::default();
        config.branches.push("Hotel Central".to_string());
        assert!(matches!(config.validate(), Err(InsightsError::InvalidConfig(_))));

        let mut config = DashboardConfig::default();
        config.categories.clear();
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.income_min = config.income_max;
        assert!(config.validate().is_err());

        let mut config = DashboardConfig::default();
        config.expense_ratio_min = 0.99;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let result = DashboardConfig::from_json_str("{ \"months\": ");
        assert!(matches!(result, Err(InsightsError::SerializationError(_))));
    }

    #[test]
    fn test_bad_period_in_json_is_rejected() {
        let json = r#"{
            "organization_name": "Test Corp",
            "start_period": "2024-13",
            "months": 3,
            "branches": ["North"],
            "categories": ["Fuel"]
        }"#;
        assert!(DashboardConfig::from_json_str(json).is_err());
    }

    #[test]
    fn test_schema_generation() {
        let schema_json = DashboardConfig::schema_as_json().unwrap();
        assert!(schema_json.contains("organization_name"));
        assert!(schema_json.contains("start_period"));
    }
}
