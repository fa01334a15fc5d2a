//! Predictor gateway: reading in, AQI estimate out

use crate::config::{ModelConfig, ModelFormat};
use crate::error::GatewayError;
use crate::feature_extractor::FeatureExtractor;
use crate::models::loader::ModelLoader;
use crate::models::AqiModel;
use crate::types::{AqiEstimate, AqiReport, PollutantReading};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where the gateway loads its model from
#[derive(Debug, Clone)]
pub struct ModelSource {
    pub path: PathBuf,
    pub format: ModelFormat,
}

/// Owns the model for the lifetime of a session.
///
/// The artifact is read at most once per successful load. A failed load is
/// not remembered, so the next request tries again.
pub struct PredictorGateway {
    /// Artifact to load on demand (absent for injected models)
    source: Option<ModelSource>,
    loader: ModelLoader,
    /// Loaded model, kept until `release`
    model: Option<Box<dyn AqiModel>>,
    extractor: FeatureExtractor,
}

impl PredictorGateway {
    /// Create a gateway from configuration. Nothing is read yet.
    pub fn new(config: &ModelConfig) -> Self {
        Self {
            source: Some(ModelSource {
                path: config.path.clone(),
                format: config.format,
            }),
            loader: ModelLoader::with_threads(config.onnx_threads),
            model: None,
            extractor: FeatureExtractor::new(),
        }
    }

    /// Create a gateway for an artifact path
    pub fn from_path<P: Into<PathBuf>>(path: P, format: ModelFormat) -> Self {
        Self::new(&ModelConfig {
            path: path.into(),
            format,
            ..ModelConfig::default()
        })
    }

    /// Create a gateway around an already constructed model
    pub fn with_model(model: Box<dyn AqiModel>) -> Self {
        Self {
            source: None,
            loader: ModelLoader::new(),
            model: Some(model),
            extractor: FeatureExtractor::new(),
        }
    }

    /// Load the model now if it is not loaded yet
    pub fn load(&mut self) -> Result<(), GatewayError> {
        self.model().map(|_| ())
    }

    pub fn is_loaded(&self) -> bool {
        self.model.is_some()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model.as_ref().map(|m| m.name())
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source.as_ref().map(|s| s.path.as_path())
    }

    /// Drop the loaded model. The next request loads it again.
    pub fn release(&mut self) {
        if let Some(model) = self.model.take() {
            info!(model = %model.name(), "Model released");
        }
    }

    /// Predict the AQI for a reading
    pub fn predict(&mut self, reading: &PollutantReading) -> Result<AqiEstimate, GatewayError> {
        reading.validate()?;
        let features = self.extractor.extract(reading);

        let model = self.model()?;

        if let Some(expected) = model.feature_count() {
            if expected != features.len() {
                return Err(GatewayError::PredictionFailed(format!(
                    "model {} expects {} features, reading provides {}",
                    model.name(),
                    expected,
                    features.len()
                )));
            }
        }

        let output = model
            .predict(&features)
            .map_err(|e| GatewayError::failed(format!("{:#}", e)))?;

        let value = output
            .first()
            .copied()
            .ok_or_else(|| GatewayError::failed("model returned an empty prediction"))?;
        if !value.is_finite() {
            return Err(GatewayError::PredictionFailed(format!(
                "model returned a non-finite estimate ({})",
                value
            )));
        }

        let estimate = AqiEstimate(value);
        if estimate.is_out_of_range() {
            warn!(
                model = %model.name(),
                aqi = value,
                "Estimate outside the 0-500 index scale"
            );
        }

        debug!(model = %model.name(), aqi = value, "Inference complete");
        Ok(estimate)
    }

    /// Predict and package the result with timing and classification
    pub fn predict_report(&mut self, reading: &PollutantReading) -> Result<AqiReport, GatewayError> {
        let start = Instant::now();
        let estimate = self.predict(reading)?;
        let latency_us = start.elapsed().as_micros() as u64;

        let model = self.model_name().unwrap_or("unknown").to_string();
        Ok(AqiReport::new(*reading, estimate, model).with_latency_us(latency_us))
    }

    /// Loaded model, loading it first if needed
    fn model(&mut self) -> Result<&mut Box<dyn AqiModel>, GatewayError> {
        let model = match self.model.take() {
            Some(model) => model,
            None => {
                let source = self.source.as_ref().ok_or_else(|| {
                    GatewayError::unavailable("<none>", "no model artifact configured")
                })?;
                let model = self.loader.load(&source.path, source.format)?;
                info!(
                    model = %model.name(),
                    path = %source.path.display(),
                    "Model ready"
                );
                model
            }
        };

        Ok(self.model.insert(model))
    }
}
