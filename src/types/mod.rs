//! Type definitions for the AQI predictor

pub mod reading;
pub mod report;
pub mod severity;

pub use reading::{Pollutant, PollutantReading, POLLUTANT_COUNT};
pub use report::{AqiEstimate, AqiReport};
pub use severity::{Emphasis, SeverityBand};
