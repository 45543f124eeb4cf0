//! Spam Classifier - Main Entry Point
//!
//! Loads the model artifacts once and serves the classifier over HTTP.

use anyhow::Result;
use spam_classifier::{
    config::{AppConfig, LoggingConfig},
    metrics::{ClassifierMetrics, MetricsReporter},
    models::predictor::Predictor,
    web::{AppState, WebServer},
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(format!(
            "spam_classifier={},tower_http=info",
            logging.level
        ))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    init_logging(&config.logging)?;

    info!("Starting Spam Classifier");
    info!(
        artifacts_dir = %config.artifacts.dir,
        addr = %config.server.addr(),
        "Configuration loaded successfully"
    );

    // Scaler failures abort startup here
    let predictor = Arc::new(Predictor::from_config(&config)?);
    if predictor.is_degraded() {
        warn!(
            health = ?predictor.health(),
            "Predictor running on untrained defaults, predictions are meaningless"
        );
    } else {
        info!(
            feature_width = predictor.feature_width(),
            "Predictor ready"
        );
    }

    let metrics = Arc::new(ClassifierMetrics::new());

    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
    }

    let state = Arc::new(AppState::new(predictor, metrics.clone()));
    let server = WebServer::new(state, config.server.addr());
    server.run().await?;

    info!("Server shutting down...");
    metrics.print_summary();

    Ok(())
}
