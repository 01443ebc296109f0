use thiserror::Error;

#[derive(Error, Debug)]
pub enum NarratorError {
    #[error("Missing required column '{0}' in dataset header")]
    MissingColumn(String),

    #[error("Invalid numeric value '{value}' in column '{column}' on line {line}")]
    InvalidValue {
        column: String,
        value: String,
        line: u64,
    },

    #[error("Invalid scale range [{low}, {high}]: low must be positive and below high")]
    InvalidScaleRange { low: f64, high: f64 },

    #[error("Narrative generation failed: {0}")]
    NarrativeFailed(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "narrative")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, NarratorError>;
