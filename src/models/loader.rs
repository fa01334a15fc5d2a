//! Model artifact loader

use crate::config::ModelFormat;
use crate::error::GatewayError;
use crate::models::{AqiModel, OnnxRegressor, TreeRegressor};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Loader for model artifacts
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    /// Create a new model loader with specified number of threads
    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load a model artifact.
    ///
    /// A missing or unreadable file is `ModelUnavailable`; anything that goes
    /// wrong after the file has been opened is `PredictionFailed`.
    pub fn load<P: AsRef<Path>>(
        &self,
        path: P,
        format: ModelFormat,
    ) -> Result<Box<dyn AqiModel>, GatewayError> {
        let path = path.as_ref();

        let metadata = fs::metadata(path).map_err(|e| {
            warn!(path = %path.display(), error = %e, "Model file not found");
            GatewayError::unavailable(path, e)
        })?;
        if !metadata.is_file() {
            return Err(GatewayError::unavailable(path, "not a regular file"));
        }
        fs::File::open(path).map_err(|e| GatewayError::unavailable(path, e))?;

        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let format = format.resolve(path)?;
        info!(model = %name, path = %path.display(), format = ?format, "Loading model artifact");

        let model: Box<dyn AqiModel> = match format {
            ModelFormat::Onnx => Box::new(
                OnnxRegressor::from_file(path, &name, self.onnx_threads)
                    .map_err(|e| GatewayError::failed(format!("{:#}", e)))?,
            ),
            ModelFormat::Tree => Box::new(
                TreeRegressor::from_file(path, &name)
                    .map_err(|e| GatewayError::failed(format!("{:#}", e)))?,
            ),
            ModelFormat::Auto => {
                return Err(GatewayError::failed("model format could not be resolved"))
            }
        };

        Ok(model)
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
