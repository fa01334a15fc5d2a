//! Prediction results

use crate::types::reading::PollutantReading;
use crate::types::severity::SeverityBand;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Upper end of the index scale
pub const AQI_SCALE_MAX: f64 = 500.0;

/// Scalar AQI value produced by the model
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AqiEstimate(pub f64);

impl AqiEstimate {
    pub fn value(self) -> f64 {
        self.0
    }

    pub fn band(self) -> SeverityBand {
        SeverityBand::from_aqi(self.0)
    }

    /// True for negative values and values beyond the index scale
    pub fn is_out_of_range(self) -> bool {
        self.0 < 0.0 || self.0 > AQI_SCALE_MAX
    }
}

/// Outcome of one successful prediction request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqiReport {
    /// Inputs the estimate was computed from
    pub reading: PollutantReading,

    /// Predicted AQI
    pub aqi: AqiEstimate,

    /// Severity classification of the estimate
    pub band: SeverityBand,

    /// Estimate is negative or above the index scale
    pub out_of_range: bool,

    /// Name of the model that produced the estimate
    pub model: String,

    /// Inference latency in microseconds
    pub latency_us: u64,

    /// When the prediction was made
    pub timestamp: DateTime<Utc>,
}

impl AqiReport {
    pub fn new(reading: PollutantReading, aqi: AqiEstimate, model: impl Into<String>) -> Self {
        Self {
            reading,
            aqi,
            band: aqi.band(),
            out_of_range: aqi.is_out_of_range(),
            model: model.into(),
            latency_us: 0,
            timestamp: Utc::now(),
        }
    }

    pub fn with_latency_us(mut self, latency_us: u64) -> Self {
        self.latency_us = latency_us;
        self
    }

    /// Metric line, e.g. `Predicted AQI: 45.00`
    pub fn metric_text(&self) -> String {
        format!("Predicted AQI: {:.2}", self.aqi.value())
    }

    /// Banner line, e.g. `Good ✅`
    pub fn banner_text(&self) -> String {
        format!("{} {}", self.band.label(), self.band.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_from_estimate() {
        let report = AqiReport::new(PollutantReading::default(), AqiEstimate(45.0), "tree");
        assert_eq!(report.band, SeverityBand::Good);
        assert!(!report.out_of_range);
        assert_eq!(report.metric_text(), "Predicted AQI: 45.00");
        assert_eq!(report.banner_text(), "Good ✅");
    }

    #[test]
    fn test_out_of_range_flag() {
        assert!(AqiEstimate(-5.0).is_out_of_range());
        assert!(AqiEstimate(501.0).is_out_of_range());
        assert!(!AqiEstimate(500.0).is_out_of_range());
        assert!(!AqiEstimate(0.0).is_out_of_range());
    }

    #[test]
    fn test_report_serialization() {
        let report = AqiReport::new(PollutantReading::default(), AqiEstimate(250.0), "onnx")
            .with_latency_us(120);

        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""band":"very_unhealthy""#));
        assert!(json.contains(r#""aqi":250.0"#));

        let deserialized: AqiReport = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.band, SeverityBand::VeryUnhealthy);
        assert_eq!(deserialized.latency_us, 120);
    }
}
