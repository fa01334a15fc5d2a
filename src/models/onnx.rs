//! ONNX Runtime regressor

use crate::models::AqiModel;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use ort::value::{DynValue, Tensor};
use std::path::Path;
use tracing::{debug, info};

/// Regressor exported to ONNX (e.g. a scikit-learn tree or forest)
pub struct OnnxRegressor {
    /// Model name
    name: String,
    /// ONNX Runtime session
    session: Session,
    /// Input name for the feature row
    input_name: String,
    /// Output name for the prediction
    output_name: String,
}

impl OnnxRegressor {
    /// Build a session from an ONNX file
    pub fn from_file<P: AsRef<Path>>(path: P, name: &str, onnx_threads: usize) -> Result<Self> {
        let path = path.as_ref();

        info!(model = %name, path = %path.display(), threads = onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(onnx_threads)?
            .commit_from_file(path)
            .context(format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        // skl2onnx names regressor output "variable"
        let output_name = session
            .outputs
            .iter()
            .find(|o| o.name.contains("variable") || o.name.contains("output"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .first()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "variable".to_string())
            });

        info!(
            model = %name,
            input = %input_name,
            output = %output_name,
            "Model loaded successfully"
        );

        Ok(Self {
            name: name.to_string(),
            session,
            input_name,
            output_name,
        })
    }
}

impl AqiModel for OnnxRegressor {
    fn name(&self) -> &str {
        &self.name
    }

    fn predict(&mut self, features: &[f32]) -> Result<Vec<f64>> {
        // Input tensor shape [1, num_features]
        let shape = vec![1_i64, features.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, features.to_vec())).context("Failed to create input tensor")?;

        let outputs = self
            .session
            .run(ort::inputs![&self.input_name => input_tensor])?;

        if let Some(output) = outputs.get(&self.output_name) {
            if let Some(values) = tensor_values(output) {
                debug!(model = %self.name, output = %self.output_name, "Extracted from tensor");
                return Ok(values);
            }
        }

        // Fallback: first numeric tensor among the remaining outputs
        for (name, output) in outputs.iter() {
            if name.contains("label") {
                continue;
            }
            if let Some(values) = tensor_values(&output) {
                debug!(model = %self.name, output = %name, "Extracted from tensor (fallback)");
                return Ok(values);
            }
        }

        anyhow::bail!("model {} produced no numeric tensor output", self.name)
    }
}

/// Flatten a float tensor output into `f64`s
fn tensor_values(output: &DynValue) -> Option<Vec<f64>> {
    if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
        return Some(data.iter().map(|&v| v as f64).collect());
    }
    if let Ok((_, data)) = output.try_extract_tensor::<f64>() {
        return Some(data.to_vec());
    }
    None
}
