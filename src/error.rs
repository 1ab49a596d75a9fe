use thiserror::Error;

#[derive(Error, Debug)]
pub enum InsightsError {
    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("Division by zero while computing {0}")]
    DivisionByZero(String),

    #[error("Invalid grouping dimension: {0}")]
    InvalidGrouping(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, InsightsError>;
