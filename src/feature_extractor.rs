//! Feature extraction for AQI model inference.
//!
//! The regressor was trained on the nine pollutant columns of the
//! monitoring-station dataset; its learned splits are bound to column
//! position, so features must be produced in exactly that order.

use crate::types::reading::{Pollutant, PollutantReading, POLLUTANT_COUNT};

/// Feature extractor that turns a reading into the model input row.
pub struct FeatureExtractor;

impl FeatureExtractor {
    /// Create a new feature extractor.
    pub fn new() -> Self {
        Self
    }

    /// Extract the feature row for a reading.
    ///
    /// Order: CO, Ozone, NO, NO2, NOx, NH3, SO2, PM2.5, PM10.
    pub fn extract(&self, reading: &PollutantReading) -> Vec<f32> {
        let mut features = Vec::with_capacity(POLLUTANT_COUNT);
        for pollutant in Pollutant::ALL {
            features.push(reading.get(pollutant) as f32);
        }
        features
    }

    /// Get the number of features produced.
    pub fn feature_count(&self) -> usize {
        POLLUTANT_COUNT
    }

    /// Get feature names (dataset column order).
    pub fn feature_names(&self) -> Vec<&'static str> {
        Pollutant::ALL.iter().map(|p| p.code()).collect()
    }
}

impl Default for FeatureExtractor {
    fn default() -> Self {
        Self::new()
    }
}
