//! Error types for the forecasting pipeline.

/// Result type for pipeline operations
pub type ForecastResult<T> = Result<T, ForecastError>;

/// Error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    /// A required feature is missing or undefined after the fill policy ran,
    /// or the input schema is malformed. Not recoverable; aborts the run.
    #[error("data error: {0}")]
    Data(String),

    /// A future feature row lacks a regressor the model was fit with.
    /// Fatal for the predict call that received the row.
    #[error("missing regressor '{name}' in feature row {row}")]
    MissingRegressor { name: String, row: usize },

    /// A restaurant has zero historical observations; forecasting is
    /// undefined.
    #[error("empty demand series: {0}")]
    EmptySeries(String),

    /// Numeric or serialization failure inside the forecaster.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<String> for ForecastError {
    fn from(s: String) -> Self {
        ForecastError::Internal(s)
    }
}

impl From<&str> for ForecastError {
    fn from(s: &str) -> Self {
        ForecastError::Internal(s.to_string())
    }
}
