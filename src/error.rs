use thiserror::Error;

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Malformed input row (missing cell, unparsable value, zero capacity)
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// Too few rows or classes to train
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    /// Feature or label layout differs between fit and predict
    #[error("Shape mismatch: expected {expected}, got {actual}")]
    ShapeMismatch { expected: String, actual: String },

    /// Required column absent from the input dataset
    #[error("Missing column: {0}")]
    MissingColumn(String),

    /// None of the candidate data files exist
    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Solver failures reported by the underlying regression
    #[error("Training error: {0}")]
    Training(String),

    /// Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PipelineError {
    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            PipelineError::InvalidRecord(_) => "INVALID_RECORD",
            PipelineError::InsufficientData(_) => "INSUFFICIENT_DATA",
            PipelineError::ShapeMismatch { .. } => "SHAPE_MISMATCH",
            PipelineError::MissingColumn(_) => "MISSING_COLUMN",
            PipelineError::DataUnavailable(_) => "DATA_UNAVAILABLE",
            PipelineError::Configuration(_) => "CONFIGURATION_ERROR",
            PipelineError::Io(_) => "IO_ERROR",
            PipelineError::Csv(_) => "CSV_ERROR",
            PipelineError::Serialization(_) => "SERIALIZATION_ERROR",
            PipelineError::Training(_) => "TRAINING_ERROR",
            PipelineError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller can fix this by correcting the input data
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            PipelineError::InvalidRecord(_)
                | PipelineError::InsufficientData(_)
                | PipelineError::ShapeMismatch { .. }
                | PipelineError::MissingColumn(_)
        )
    }
}

/// Conversion from csv::Error
impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Csv(err.to_string())
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for PipelineError {
    fn from(err: serde_json::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for PipelineError {
    fn from(err: validator::ValidationErrors) -> Self {
        PipelineError::InvalidRecord(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for PipelineError {
    fn from(err: config::ConfigError) -> Self {
        PipelineError::Configuration(err.to_string())
    }
}

/// Conversion from linfa_logistic::error::Error
impl From<linfa_logistic::error::Error> for PipelineError {
    fn from(err: linfa_logistic::error::Error) -> Self {
        PipelineError::Training(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, PipelineError>;
