//! AQI Predictor - Main Entry Point
//!
//! Runs the interactive terminal form by default; `predict` and `classify`
//! answer a single request from the command line.

use anyhow::{Context, Result};
use aqi_predictor::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    metrics::SessionMetrics,
    models::PredictorGateway,
    tui::{self, App},
    PollutantReading, SeverityBand,
};
use clap::{Args, Parser, Subcommand};
use std::fs::{self, File};
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "aqi-predictor")]
#[command(about = "Predict the Air Quality Index from pollutant concentrations", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Model artifact, overrides model.path from the configuration
    #[arg(short, long)]
    model: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal form (default)
    Form,

    /// Predict the AQI for one reading
    Predict {
        #[command(flatten)]
        reading: ReadingArgs,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the severity band for an AQI value
    Classify {
        /// AQI value
        #[arg(allow_negative_numbers = true)]
        aqi: f64,
    },
}

/// Pollutant concentrations, all defaulting to 0.0
#[derive(Args)]
struct ReadingArgs {
    /// Carbon Monoxide (CO)
    #[arg(long, default_value_t = 0.0)]
    co: f64,
    /// Ozone (O3)
    #[arg(long, default_value_t = 0.0)]
    ozone: f64,
    /// Nitric Oxide (NO)
    #[arg(long, default_value_t = 0.0)]
    no: f64,
    /// Nitrogen Dioxide (NO2)
    #[arg(long, default_value_t = 0.0)]
    no2: f64,
    /// Nitrogen Oxides (NOx)
    #[arg(long, default_value_t = 0.0)]
    nox: f64,
    /// Ammonia (NH3)
    #[arg(long, default_value_t = 0.0)]
    nh3: f64,
    /// Sulphur Dioxide (SO2)
    #[arg(long, default_value_t = 0.0)]
    so2: f64,
    /// Particulate Matter <= 2.5 um (PM2.5)
    #[arg(long, default_value_t = 0.0)]
    pm25: f64,
    /// Particulate Matter <= 10 um (PM10)
    #[arg(long, default_value_t = 0.0)]
    pm10: f64,
}

impl From<ReadingArgs> for PollutantReading {
    fn from(args: ReadingArgs) -> Self {
        PollutantReading::from_values([
            args.co, args.ozone, args.no, args.no2, args.nox, args.nh3, args.so2, args.pm25,
            args.pm10,
        ])
    }
}

/// Where log output goes
enum LogTarget {
    Stderr,
    File(PathBuf),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let (mut config, found) = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    if let Some(model) = cli.model {
        config.model.path = model;
    }

    let command = cli.command.unwrap_or(Commands::Form);
    let target = match command {
        Commands::Form => LogTarget::File(config.logging.file.clone()),
        _ => LogTarget::Stderr,
    };
    init_logging(&config.logging, target)?;

    if found {
        info!(path = %cli.config.display(), "Configuration loaded");
    } else {
        warn!(path = %cli.config.display(), "Configuration file not found, using defaults");
    }

    match command {
        Commands::Form => run_form(&config),
        Commands::Predict { reading, json } => run_predict(&config, reading.into(), json),
        Commands::Classify { aqi } => {
            let band = SeverityBand::from_aqi(aqi);
            println!("{} {}", band.label(), band.symbol());
            Ok(())
        }
    }
}

fn run_form(config: &AppConfig) -> Result<()> {
    let mut gateway = PredictorGateway::new(&config.model);
    if config.model.preload {
        // A missing model is reported per request, the form still opens
        if let Err(e) = gateway.load() {
            warn!(path = ?gateway.source_path(), error = %e, "Model not loaded at startup");
        }
    }

    let mut app = App::new(
        gateway,
        Duration::from_secs(config.ui.status_timeout_secs),
    );
    let result = tui::run(&mut app, &config.ui);

    app.gateway.release();
    app.metrics.log_summary();

    result
}

fn run_predict(config: &AppConfig, reading: PollutantReading, json: bool) -> Result<()> {
    let mut gateway = PredictorGateway::new(&config.model);
    let mut metrics = SessionMetrics::new();

    let report = match gateway.predict_report(&reading) {
        Ok(report) => report,
        Err(e) => {
            metrics.record_failure(&e);
            return Err(e.into());
        }
    };
    metrics.record_prediction(&report);

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.metric_text());
        println!("{}", report.banner_text());
    }

    gateway.release();
    metrics.log_summary();
    Ok(())
}

fn init_logging(logging: &LoggingConfig, target: LogTarget) -> Result<()> {
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("aqi_predictor={}", logging.level).parse()?);

    let json = logging.format.eq_ignore_ascii_case("json");
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match target {
        LogTarget::Stderr => {
            let builder = builder.with_writer(std::io::stderr);
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = File::options()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            let builder = builder.with_ansi(false).with_writer(Mutex::new(file));
            if json {
                builder.json().init();
            } else {
                builder.init();
            }
        }
    }

    Ok(())
}
