//! AQI severity bands

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity category for an AQI value, in ascending order of risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
    /// Beyond the top of the index scale
    NoData,
}

/// How a band should be emphasised when displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    Success,
    Info,
    Warning,
    Error,
    Neutral,
}

/// Inclusive upper bounds, checked in ascending order
const BREAKPOINTS: [(f64, SeverityBand); 6] = [
    (50.0, SeverityBand::Good),
    (100.0, SeverityBand::Moderate),
    (150.0, SeverityBand::UnhealthyForSensitiveGroups),
    (200.0, SeverityBand::Unhealthy),
    (300.0, SeverityBand::VeryUnhealthy),
    (500.0, SeverityBand::Hazardous),
];

impl SeverityBand {
    /// Classify an AQI value. First inclusive upper bound that holds wins;
    /// anything above 500 (or NaN) is `NoData`.
    pub fn from_aqi(aqi: f64) -> Self {
        BREAKPOINTS
            .iter()
            .find(|(upper, _)| aqi <= *upper)
            .map(|(_, band)| *band)
            .unwrap_or(SeverityBand::NoData)
    }

    pub fn all() -> &'static [SeverityBand] {
        &[
            SeverityBand::Good,
            SeverityBand::Moderate,
            SeverityBand::UnhealthyForSensitiveGroups,
            SeverityBand::Unhealthy,
            SeverityBand::VeryUnhealthy,
            SeverityBand::Hazardous,
            SeverityBand::NoData,
        ]
    }

    pub fn label(self) -> &'static str {
        match self {
            SeverityBand::Good => "Good",
            SeverityBand::Moderate => "Moderate",
            SeverityBand::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            SeverityBand::Unhealthy => "Unhealthy",
            SeverityBand::VeryUnhealthy => "Very Unhealthy",
            SeverityBand::Hazardous => "Hazardous",
            SeverityBand::NoData => "No data",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            SeverityBand::Good => "✅",
            SeverityBand::Moderate => "🌤",
            SeverityBand::UnhealthyForSensitiveGroups => "⚠",
            SeverityBand::Unhealthy => "🛑",
            SeverityBand::VeryUnhealthy => "☣",
            SeverityBand::Hazardous => "☠",
            SeverityBand::NoData => "💼",
        }
    }

    pub fn emphasis(self) -> Emphasis {
        match self {
            SeverityBand::Good => Emphasis::Success,
            SeverityBand::Moderate => Emphasis::Info,
            SeverityBand::UnhealthyForSensitiveGroups => Emphasis::Warning,
            SeverityBand::Unhealthy | SeverityBand::VeryUnhealthy | SeverityBand::Hazardous => {
                Emphasis::Error
            }
            SeverityBand::NoData => Emphasis::Neutral,
        }
    }

    /// Inclusive upper bound, `None` for the catch-all band
    pub fn upper_bound(self) -> Option<f64> {
        BREAKPOINTS
            .iter()
            .find(|(_, band)| *band == self)
            .map(|(upper, _)| *upper)
    }
}

impl fmt::Display for SeverityBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
