use thiserror::Error;

#[derive(Error, Debug)]
pub enum MatchLensError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    /// The retained-column list in the model settings could not be read.
    #[error("Invalid schema configuration: {0}")]
    InvalidSchemaConfiguration(String),

    /// The scoring collaborator produced no row for the pair.
    #[error("No comparison results returned")]
    EmptyScoreResult,

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Data Validation Error: {0}")]
    Validation(String),
}

pub type MlResult<T> = Result<T, MatchLensError>;
