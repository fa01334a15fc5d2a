//! End-to-end prediction tests against model artifacts on disk.

use aqi_predictor::config::ModelFormat;
use aqi_predictor::tui::{App, Outcome};
use aqi_predictor::{
    AppConfig, GatewayError, PollutantReading, PredictorGateway, SeverityBand,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

fn scenario_reading() -> PollutantReading {
    PollutantReading::from_values([1.0, 20.0, 5.0, 10.0, 15.0, 2.0, 3.0, 40.0, 60.0])
}

fn constant_model(n_features: usize, value: f64) -> String {
    format!(
        r#"{{ "name": "constant", "n_features": {}, "nodes": [ {{ "value": {} }} ] }}"#,
        n_features, value
    )
}

fn write_model(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn manifest_path(relative: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn good_band_when_model_returns_45() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "aqi.json", &constant_model(9, 45.0));

    let mut gateway = PredictorGateway::from_path(path, ModelFormat::Auto);
    let report = gateway.predict_report(&scenario_reading()).unwrap();

    assert_eq!(report.aqi.value(), 45.0);
    assert_eq!(report.band, SeverityBand::Good);
    assert_eq!(report.band.label(), "Good");
}

#[test]
fn very_unhealthy_band_when_model_returns_250() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "aqi.json", &constant_model(9, 250.0));

    let mut gateway = PredictorGateway::from_path(path, ModelFormat::Auto);
    let report = gateway.predict_report(&scenario_reading()).unwrap();

    assert_eq!(report.band.label(), "Very Unhealthy");
}

#[test]
fn missing_artifact_reports_model_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let mut gateway =
        PredictorGateway::from_path(dir.path().join("traineddt.json"), ModelFormat::Auto);

    let err = gateway.predict(&scenario_reading()).unwrap_err();
    assert!(matches!(err, GatewayError::ModelUnavailable { .. }));
}

#[test]
fn feature_count_mismatch_reports_prediction_failed() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "aqi.json", &constant_model(8, 80.0));

    let mut gateway = PredictorGateway::from_path(path, ModelFormat::Auto);
    match gateway.predict(&scenario_reading()) {
        Err(GatewayError::PredictionFailed(cause)) => {
            assert!(cause.contains("expects 8 features"), "cause: {}", cause)
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn model_is_read_once_per_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_model(dir.path(), "aqi.json", &constant_model(9, 120.0));

    let mut gateway = PredictorGateway::from_path(&path, ModelFormat::Auto);
    gateway.load().unwrap();
    assert!(gateway.is_loaded());

    // Once loaded, the artifact is no longer needed on disk
    fs::remove_file(&path).unwrap();
    for _ in 0..3 {
        let estimate = gateway.predict(&scenario_reading()).unwrap();
        assert_eq!(estimate.band(), SeverityBand::UnhealthyForSensitiveGroups);
    }

    // After release the next request goes back to disk
    gateway.release();
    assert!(matches!(
        gateway.predict(&scenario_reading()),
        Err(GatewayError::ModelUnavailable { .. })
    ));
}

#[test]
fn failed_load_is_retried_on_next_request() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aqi.json");

    let mut gateway = PredictorGateway::from_path(&path, ModelFormat::Auto);
    assert!(gateway.predict(&scenario_reading()).is_err());

    write_model(dir.path(), "aqi.json", &constant_model(9, 520.0));
    let report = gateway.predict_report(&scenario_reading()).unwrap();
    assert_eq!(report.band, SeverityBand::NoData);
    assert!(report.out_of_range);
}

#[test]
fn form_recovers_from_missing_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aqi.json");

    let gateway = PredictorGateway::from_path(&path, ModelFormat::Auto);
    let mut app = App::new(gateway, Duration::from_secs(5));
    app.fields[7] = "40".to_string();

    app.predict();
    assert!(matches!(app.outcome, Some(Outcome::Failure(_))));
    assert_eq!(app.fields[7], "40");

    // Artifact appears, same inputs, next click succeeds
    write_model(dir.path(), "aqi.json", &constant_model(9, 45.0));
    app.predict();
    match &app.outcome {
        Some(Outcome::Report(report)) => assert_eq!(report.band, SeverityBand::Good),
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(app.metrics.predictions(), 1);
    assert_eq!(app.metrics.failures(), 1);
}

#[test]
fn shipped_configuration_and_model() {
    let config = AppConfig::load_from_path(manifest_path("config/config.toml")).unwrap();
    assert_eq!(config.model.format, ModelFormat::Auto);

    let mut gateway = PredictorGateway::from_path(
        manifest_path("models/aqi_model.json"),
        config.model.format,
    );
    let report = gateway.predict_report(&scenario_reading()).unwrap();

    assert_eq!(report.model, "aqi_decision_tree");
    assert_eq!(report.aqi.value(), 112.0);
    assert_eq!(report.band, SeverityBand::UnhealthyForSensitiveGroups);

    let clean_air = PollutantReading::from_values([0.5, 10.0, 1.0, 5.0, 6.0, 1.0, 2.0, 12.0, 30.0]);
    let estimate = gateway.predict(&clean_air).unwrap();
    assert_eq!(estimate.band(), SeverityBand::Good);
}
