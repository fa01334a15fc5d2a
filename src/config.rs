//! Configuration management for the AQI predictor

use crate::error::GatewayError;
use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default location of the configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Serialization format of the model artifact
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// Pick from the file extension (`.onnx` or `.json`)
    #[default]
    Auto,
    /// ONNX graph run through ONNX Runtime
    Onnx,
    /// JSON decision tree or forest
    Tree,
}

impl ModelFormat {
    /// Resolve `Auto` against the artifact path
    pub fn resolve(self, path: &Path) -> Result<ModelFormat, GatewayError> {
        match self {
            ModelFormat::Auto => {
                let extension = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(|e| e.to_ascii_lowercase());
                match extension.as_deref() {
                    Some("onnx") => Ok(ModelFormat::Onnx),
                    Some("json") => Ok(ModelFormat::Tree),
                    _ => Err(GatewayError::PredictionFailed(format!(
                        "cannot infer model format from {}; set model.format to \"onnx\" or \"tree\"",
                        path.display()
                    ))),
                }
            }
            explicit => Ok(explicit),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub model: ModelConfig,
    pub logging: LoggingConfig,
    pub ui: UiConfig,
}

/// Model artifact configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Path to the pre-trained regressor
    pub path: PathBuf,
    /// Artifact format: "auto", "onnx" or "tree"
    pub format: ModelFormat,
    /// Number of threads for ONNX inference (default: 1)
    pub onnx_threads: usize,
    /// Load the model at startup rather than on the first prediction
    pub preload: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("models/aqi_model.json"),
            format: ModelFormat::Auto,
            onnx_threads: 1,
            preload: true,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
    /// Log file used while the terminal form owns the screen
    pub file: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: PathBuf::from("logs/aqi-predictor.log"),
        }
    }
}

/// Terminal form configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Event poll interval in milliseconds
    pub tick_rate_ms: u64,
    /// How long status messages stay visible
    pub status_timeout_secs: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 100,
            status_timeout_secs: 5,
        }
    }
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path(DEFAULT_CONFIG_PATH)
    }

    /// Load configuration from a specific path
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    ///
    /// The flag is true when the file was read.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            Ok((Self::load_from_path(path)?, true))
        } else {
            Ok((Self::default(), false))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.model.path, PathBuf::from("models/aqi_model.json"));
        assert_eq!(config.model.format, ModelFormat::Auto);
        assert_eq!(config.model.onnx_threads, 1);
        assert!(config.model.preload);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.tick_rate_ms, 100);
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[model]").unwrap();
        writeln!(file, "path = \"/opt/models/aqi.onnx\"").unwrap();
        writeln!(file, "format = \"onnx\"").unwrap();
        writeln!(file, "[logging]").unwrap();
        writeln!(file, "format = \"json\"").unwrap();

        let config = AppConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.model.path, PathBuf::from("/opt/models/aqi.onnx"));
        assert_eq!(config.model.format, ModelFormat::Onnx);
        assert_eq!(config.model.onnx_threads, 1);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.ui.status_timeout_secs, 5);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let (config, found) = AppConfig::load_or_default("does/not/exist.toml").unwrap();
        assert!(!found);
        assert_eq!(config.model.format, ModelFormat::Auto);
    }

    #[test]
    fn test_invalid_format_rejected() {
        let mut file: NamedTempFile = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[model]\nformat = \"pickle\"").unwrap();
        assert!(AppConfig::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(
            ModelFormat::Auto.resolve(Path::new("m/aqi.onnx")).unwrap(),
            ModelFormat::Onnx
        );
        assert_eq!(
            ModelFormat::Auto.resolve(Path::new("m/aqi.JSON")).unwrap(),
            ModelFormat::Tree
        );
        assert_eq!(
            ModelFormat::Tree.resolve(Path::new("m/aqi.bin")).unwrap(),
            ModelFormat::Tree
        );
        assert!(matches!(
            ModelFormat::Auto.resolve(Path::new("m/traineddt.pkl")),
            Err(GatewayError::PredictionFailed(_))
        ));
    }
}
