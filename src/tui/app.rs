//! Application state for the terminal form.

use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::error::GatewayError;
use crate::metrics::SessionMetrics;
use crate::models::PredictorGateway;
use crate::types::{AqiReport, Pollutant, PollutantReading, POLLUTANT_COUNT};

/// Initial content of every input field
pub const DEFAULT_FIELD_VALUE: &str = "0.0";

/// Which control has keyboard focus
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(usize),
    PredictButton,
}

impl Default for Focus {
    fn default() -> Self {
        Focus::Field(0)
    }
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Field(i) if i + 1 < POLLUTANT_COUNT => Focus::Field(i + 1),
            Focus::Field(_) => Focus::PredictButton,
            Focus::PredictButton => Focus::Field(0),
        }
    }

    pub fn previous(self) -> Self {
        match self {
            Focus::Field(0) => Focus::PredictButton,
            Focus::Field(i) => Focus::Field(i - 1),
            Focus::PredictButton => Focus::Field(POLLUTANT_COUNT - 1),
        }
    }
}

/// What the result panel shows after a Predict action
#[derive(Debug, Clone)]
pub enum Outcome {
    Report(AqiReport),
    Failure(String),
}

/// Main application state.
pub struct App {
    /// Raw text of the nine inputs, in feature order
    pub fields: [String; POLLUTANT_COUNT],
    /// Focused control
    pub focus: Focus,
    /// Result of the last Predict action
    pub outcome: Option<Outcome>,
    /// Status message with timestamp
    pub status_message: Option<(String, Instant)>,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Model access
    pub gateway: PredictorGateway,
    /// Session counters
    pub metrics: SessionMetrics,
    status_timeout: Duration,
}

impl App {
    pub fn new(gateway: PredictorGateway, status_timeout: Duration) -> Self {
        Self {
            fields: std::array::from_fn(|_| DEFAULT_FIELD_VALUE.to_string()),
            focus: Focus::default(),
            outcome: None,
            status_message: None,
            should_quit: false,
            gateway,
            metrics: SessionMetrics::new(),
            status_timeout,
        }
    }

    /// Set a status message that will be displayed temporarily.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some((message.into(), Instant::now()));
    }

    /// Clear expired status messages.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, instant)) = &self.status_message {
            if instant.elapsed() > self.status_timeout {
                self.status_message = None;
            }
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Type into the focused field. Only digits and one decimal point are
    /// accepted, so negative values cannot be entered.
    pub fn push_char(&mut self, c: char) {
        let Focus::Field(index) = self.focus else {
            return;
        };
        let field = &mut self.fields[index];

        if !(c.is_ascii_digit() || c == '.') {
            return;
        }
        if field.as_str() == DEFAULT_FIELD_VALUE {
            field.clear();
        }
        if c == '.' && field.contains('.') {
            return;
        }
        field.push(c);
    }

    pub fn backspace(&mut self) {
        if let Focus::Field(index) = self.focus {
            self.fields[index].pop();
        }
    }

    /// Put the focused field back to 0.0
    pub fn reset_field(&mut self) {
        if let Focus::Field(index) = self.focus {
            self.fields[index] = DEFAULT_FIELD_VALUE.to_string();
        }
    }

    /// Parse the inputs into a reading
    pub fn reading(&self) -> Result<PollutantReading, GatewayError> {
        let mut reading = PollutantReading::default();
        for pollutant in Pollutant::ALL {
            let text = self.fields[pollutant.index()].trim();
            let value: f64 = text.parse().map_err(|_| {
                GatewayError::InvalidReading(format!(
                    "{} is not a number: {:?}",
                    pollutant.label(),
                    text
                ))
            })?;
            reading.set(pollutant, value);
        }
        reading.validate()?;
        Ok(reading)
    }

    /// Run one prediction request. Inputs are never modified.
    pub fn predict(&mut self) {
        let result = self
            .reading()
            .and_then(|reading| self.gateway.predict_report(&reading));

        match result {
            Ok(report) => {
                info!(
                    aqi = report.aqi.value(),
                    band = %report.band,
                    latency_us = report.latency_us,
                    "Prediction complete"
                );
                self.metrics.record_prediction(&report);
                self.set_status(format!("Predicted AQI {:.2}", report.aqi.value()));
                self.outcome = Some(Outcome::Report(report));
            }
            Err(e) => {
                error!(kind = e.kind(), error = %e, "Prediction request failed");
                self.metrics.record_failure(&e);
                self.set_status("Prediction failed");
                self.outcome = Some(Outcome::Failure(user_message(&e)));
            }
        }
    }
}

/// Message shown in the result panel for a failed request
pub fn user_message(error: &GatewayError) -> String {
    match error {
        GatewayError::ModelUnavailable { path, .. } => format!(
            "❌ Model file not found. Please check the path to '{}'.",
            path.display()
        ),
        GatewayError::PredictionFailed(cause) => {
            format!("An unexpected error occurred: {}", cause)
        }
        GatewayError::InvalidReading(reason) => format!("⚠ {}", reason),
    }
}
