//! AQI Predictor Library
//!
//! Feeds nine pollutant concentrations into a pre-trained regressor and
//! classifies the resulting Air Quality Index into a severity band.

pub mod config;
pub mod error;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod tui;
pub mod types;

pub use config::AppConfig;
pub use error::GatewayError;
pub use feature_extractor::FeatureExtractor;
pub use metrics::SessionMetrics;
pub use models::{AqiModel, PredictorGateway};
pub use types::{AqiEstimate, AqiReport, Pollutant, PollutantReading, SeverityBand};
