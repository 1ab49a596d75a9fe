use crate::config::DashboardConfig;
use crate::error::Result;
use crate::schema::Record;
use crate::utils::consecutive_periods;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Uniform};
use std::fs;
use std::path::PathBuf;

/// Supplies the record store. The engine never generates or validates data
/// itself; it works on whatever a source hands it.
pub trait RecordSource {
    fn records(&self) -> Result<Vec<Record>>;
}

/// Literal records, mostly for tests and examples.
#[derive(Debug, Clone, Default)]
pub struct FixtureSource(pub Vec<Record>);

impl RecordSource for FixtureSource {
    fn records(&self) -> Result<Vec<Record>> {
        Ok(self.0.clone())
    }
}

/// A JSON array of records on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    pub path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for JsonFileSource {
    fn records(&self) -> Result<Vec<Record>> {
        let raw = fs::read_to_string(&self.path)?;
        let records: Vec<Record> = serde_json::from_str(&raw)?;
        info!(
            "Loaded {} records from {}",
            records.len(),
            self.path.display()
        );
        Ok(records)
    }
}

/// Seeded synthetic data: one record per period, branch and category.
///
/// Income is a whole amount drawn from `[income_min, income_max)`; expense is
/// income times a ratio drawn from `[expense_ratio_min, expense_ratio_max)`.
#[derive(Debug, Clone)]
pub struct SampleDataGenerator {
    config: DashboardConfig,
}

impl SampleDataGenerator {
    pub fn new(config: DashboardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn generate(&self) -> Vec<Record> {
        let config = &self.config;
        let mut rng = StdRng::seed_from_u64(config.seed);
        let income_dist = Uniform::new(config.income_min, config.income_max);
        let ratio_dist = Uniform::new(config.expense_ratio_min, config.expense_ratio_max);

        let periods = consecutive_periods(config.start_period, config.months);
        let mut records =
            Vec::with_capacity(periods.len() * config.branches.len() * config.categories.len());

        for period in &periods {
            for branch in &config.branches {
                for category in &config.categories {
                    let income = income_dist.sample(&mut rng) as f64;
                    let expense = income * ratio_dist.sample(&mut rng);
                    records.push(Record::new(*period, branch, category, income, expense));
                }
            }
        }

        info!(
            "Generated {} sample records for {} ({} months from {}, seed {})",
            records.len(),
            config.organization_name,
            config.months,
            config.start_period,
            config.seed
        );

        records
    }
}

impl RecordSource for SampleDataGenerator {
    fn records(&self) -> Result<Vec<Record>> {
        Ok(self.generate())
    }
}
