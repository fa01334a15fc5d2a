//! Error types for the prediction path

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the predictor gateway.
///
/// Every variant is recoverable: the caller reports it and the session
/// carries on with the same inputs.
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The model artifact is missing or cannot be read.
    #[error("Model file not available at {}: {reason}", path.display())]
    ModelUnavailable { path: PathBuf, reason: String },

    /// Loading or invoking the model failed for any other reason.
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// The reading violates the input constraints.
    #[error("Invalid reading: {0}")]
    InvalidReading(String),
}

impl GatewayError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        GatewayError::ModelUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn failed(cause: impl std::fmt::Display) -> Self {
        GatewayError::PredictionFailed(cause.to_string())
    }

    /// Short kind name, used as a metrics key.
    pub fn kind(&self) -> &'static str {
        match self {
            GatewayError::ModelUnavailable { .. } => "model_unavailable",
            GatewayError::PredictionFailed(_) => "prediction_failed",
            GatewayError::InvalidReading(_) => "invalid_reading",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_message() {
        let err = GatewayError::unavailable("models/missing.onnx", "No such file or directory");
        assert_eq!(
            err.to_string(),
            "Model file not available at models/missing.onnx: No such file or directory"
        );
        assert_eq!(err.kind(), "model_unavailable");
    }

    #[test]
    fn test_failed_carries_cause() {
        let err = GatewayError::failed("model expects 8 features, got 9");
        assert_eq!(
            err.to_string(),
            "Prediction failed: model expects 8 features, got 9"
        );
        assert_eq!(err.kind(), "prediction_failed");
    }
}
