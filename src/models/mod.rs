//! ML model inference components

pub mod inference;
pub mod loader;
pub mod onnx;
pub mod tree;

pub use inference::PredictorGateway;
pub use loader::ModelLoader;
pub use onnx::OnnxRegressor;
pub use tree::TreeRegressor;

/// A regressor that maps one feature row to a sequence of scalars.
///
/// Anything implementing this can stand behind the gateway; the gateway
/// validates the row length and the output before using it.
pub trait AqiModel {
    /// Model name for logs and reports
    fn name(&self) -> &str;

    /// Number of features the model was trained on, when it declares one
    fn feature_count(&self) -> Option<usize> {
        None
    }

    /// Predict from a single feature row
    fn predict(&mut self, features: &[f32]) -> anyhow::Result<Vec<f64>>;
}
