//! Pollutant reading data structures

use crate::error::GatewayError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of pollutants in a reading (and features fed to the model)
pub const POLLUTANT_COUNT: usize = 9;

/// One measured pollutant, in model feature order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pollutant {
    Co,
    Ozone,
    No,
    No2,
    Nox,
    Nh3,
    So2,
    Pm25,
    Pm10,
}

impl Pollutant {
    /// All pollutants in the order the model was trained on
    pub const ALL: [Pollutant; POLLUTANT_COUNT] = [
        Pollutant::Co,
        Pollutant::Ozone,
        Pollutant::No,
        Pollutant::No2,
        Pollutant::Nox,
        Pollutant::Nh3,
        Pollutant::So2,
        Pollutant::Pm25,
        Pollutant::Pm10,
    ];

    /// Position in the feature vector
    pub fn index(self) -> usize {
        match self {
            Pollutant::Co => 0,
            Pollutant::Ozone => 1,
            Pollutant::No => 2,
            Pollutant::No2 => 3,
            Pollutant::Nox => 4,
            Pollutant::Nh3 => 5,
            Pollutant::So2 => 6,
            Pollutant::Pm25 => 7,
            Pollutant::Pm10 => 8,
        }
    }

    /// Column name used in the training dataset
    pub fn code(self) -> &'static str {
        match self {
            Pollutant::Co => "CO",
            Pollutant::Ozone => "Ozone",
            Pollutant::No => "NO",
            Pollutant::No2 => "NO2",
            Pollutant::Nox => "NOx",
            Pollutant::Nh3 => "NH3",
            Pollutant::So2 => "SO2",
            Pollutant::Pm25 => "PM2.5",
            Pollutant::Pm10 => "PM10",
        }
    }

    /// Human-readable label for form fields
    pub fn label(self) -> &'static str {
        match self {
            Pollutant::Co => "Carbon Monoxide (CO)",
            Pollutant::Ozone => "Ozone (O₃)",
            Pollutant::No => "Nitric Oxide (NO)",
            Pollutant::No2 => "Nitrogen Dioxide (NO₂)",
            Pollutant::Nox => "Nitrogen Oxides (NOx)",
            Pollutant::Nh3 => "Ammonia (NH₃)",
            Pollutant::So2 => "Sulphur Dioxide (SO₂)",
            Pollutant::Pm25 => "Particulate Matter ≤ 2.5 μm (PM2.5)",
            Pollutant::Pm10 => "Particulate Matter ≤ 10 μm (PM10)",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Concentrations of the nine pollutants for one prediction request
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    /// Carbon monoxide
    #[serde(default, alias = "CO")]
    pub co: f64,

    /// Ozone (O3)
    #[serde(default, alias = "Ozone")]
    pub ozone: f64,

    /// Nitric oxide
    #[serde(default, alias = "NO")]
    pub no: f64,

    /// Nitrogen dioxide
    #[serde(default, alias = "NO2")]
    pub no2: f64,

    /// Nitrogen oxides
    #[serde(default, alias = "NOx")]
    pub nox: f64,

    /// Ammonia
    #[serde(default, alias = "NH3")]
    pub nh3: f64,

    /// Sulphur dioxide
    #[serde(default, alias = "SO2")]
    pub so2: f64,

    /// Particulate matter up to 2.5 μm
    #[serde(default, alias = "PM2.5", alias = "PM25")]
    pub pm25: f64,

    /// Particulate matter up to 10 μm
    #[serde(default, alias = "PM10")]
    pub pm10: f64,
}

impl PollutantReading {
    /// Build a reading from values in feature order
    pub fn from_values(values: [f64; POLLUTANT_COUNT]) -> Self {
        let mut reading = Self::default();
        for (pollutant, value) in Pollutant::ALL.iter().zip(values) {
            reading.set(*pollutant, value);
        }
        reading
    }

    /// Values in feature order
    pub fn values(&self) -> [f64; POLLUTANT_COUNT] {
        Pollutant::ALL.map(|p| self.get(p))
    }

    pub fn get(&self, pollutant: Pollutant) -> f64 {
        match pollutant {
            Pollutant::Co => self.co,
            Pollutant::Ozone => self.ozone,
            Pollutant::No => self.no,
            Pollutant::No2 => self.no2,
            Pollutant::Nox => self.nox,
            Pollutant::Nh3 => self.nh3,
            Pollutant::So2 => self.so2,
            Pollutant::Pm25 => self.pm25,
            Pollutant::Pm10 => self.pm10,
        }
    }

    pub fn set(&mut self, pollutant: Pollutant, value: f64) {
        let slot = match pollutant {
            Pollutant::Co => &mut self.co,
            Pollutant::Ozone => &mut self.ozone,
            Pollutant::No => &mut self.no,
            Pollutant::No2 => &mut self.no2,
            Pollutant::Nox => &mut self.nox,
            Pollutant::Nh3 => &mut self.nh3,
            Pollutant::So2 => &mut self.so2,
            Pollutant::Pm25 => &mut self.pm25,
            Pollutant::Pm10 => &mut self.pm10,
        };
        *slot = value;
    }

    /// Check that every concentration is finite and non-negative.
    pub fn validate(&self) -> Result<(), GatewayError> {
        for pollutant in Pollutant::ALL {
            let value = self.get(pollutant);
            if !value.is_finite() {
                return Err(GatewayError::InvalidReading(format!(
                    "{} must be a finite number, got {}",
                    pollutant, value
                )));
            }
            if value < 0.0 {
                return Err(GatewayError::InvalidReading(format!(
                    "{} must be >= 0, got {}",
                    pollutant, value
                )));
            }
        }
        Ok(())
    }
}
