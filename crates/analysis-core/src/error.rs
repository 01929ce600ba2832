use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),

    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Data source error: {0}")]
    DataSourceError(String),

    #[error("Storage error: {0}")]
    StorageError(String),
}

/// Failure of a single evaluation call. The engine converts these into a
/// fallback HOLD recommendation at its public boundary.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("{component} failed: {source}")]
    Component {
        component: &'static str,
        #[source]
        source: AnalysisError,
    },
}

/// Reject NaN and infinities before they reach a scoring rule.
pub fn ensure_finite(name: &str, value: f64) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::InvalidData(format!("{} is not finite ({})", name, value)))
    }
}
