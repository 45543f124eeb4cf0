//! Web front-end: HTML form, JSON API, health and metrics endpoints

use crate::metrics::{ClassifierMetrics, MetricsSnapshot};
use crate::models::predictor::{HealthReport, HealthState, Predictor};
use crate::types::classification::Classification;
use anyhow::Result;
use askama_axum::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    error: String,
}

#[derive(Template)]
#[template(path = "predict.html")]
struct PredictTemplate {
    error: String,
    label: String,
    text: String,
}

/// Form posted by the HTML page; only `text` is read
#[derive(Debug, Deserialize)]
pub struct PredictForm {
    pub text: String,
}

/// JSON body for `/api/classify`
#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub text: String,
}

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    service: &'static str,
    version: &'static str,
    #[serde(flatten)]
    report: HealthReport,
}

/// State shared by every handler
pub struct AppState {
    pub predictor: Arc<Predictor>,
    pub metrics: Arc<ClassifierMetrics>,
}

impl AppState {
    pub fn new(predictor: Arc<Predictor>, metrics: Arc<ClassifierMetrics>) -> Self {
        Self { predictor, metrics }
    }

    /// Run the predictor and record the outcome
    pub fn classify(&self, text: &str) -> Result<Classification> {
        let start_time = Instant::now();
        match self.predictor.classify(text) {
            Ok(classification) => {
                self.metrics
                    .record_classification(start_time.elapsed(), classification.label);
                Ok(classification)
            }
            Err(e) => {
                self.metrics.record_failure();
                error!(error = %format!("{:#}", e), "Classification failed");
                Err(e)
            }
        }
    }
}

/// GET / and /home - input form
pub async fn home() -> impl IntoResponse {
    HomeTemplate {
        error: String::new(),
    }
}

/// POST /predict - classify the submitted form and render the result
pub async fn predict(State(state): State<Arc<AppState>>, Form(form): Form<PredictForm>) -> Response {
    match state.classify(&form.text) {
        Ok(classification) => PredictTemplate {
            error: String::new(),
            label: classification.label.to_string(),
            text: form.text,
        }
        .into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            PredictTemplate {
                error: "The classifier could not label this text.".to_string(),
                label: String::new(),
                text: form.text,
            },
        )
            .into_response(),
    }
}

/// POST /api/classify - JSON classification
pub async fn classify(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ClassifyRequest>,
) -> Response {
    match state.classify(&req.text) {
        Ok(classification) => Json(classification).into_response(),
        Err(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new("Classification failed")),
        )
            .into_response(),
    }
}

/// GET /health - artifact load state
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let report = state.predictor.health();
    let status_code = match report.status {
        HealthState::Healthy => StatusCode::OK,
        HealthState::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };

    (
        status_code,
        Json(HealthResponse {
            service: "spam-classifier",
            version: env!("CARGO_PKG_VERSION"),
            report,
        }),
    )
}

/// GET /metrics - request counters and latency
pub async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

/// HTTP server for the classifier
pub struct WebServer {
    state: Arc<AppState>,
    addr: String,
}

impl WebServer {
    pub fn new(state: Arc<AppState>, addr: String) -> Self {
        Self { state, addr }
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Start the server and run until Ctrl-C
    pub async fn run(&self) -> std::io::Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Start the server and run until `shutdown` completes
    pub async fn run_until<F>(&self, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = self.router();

        info!("Starting web server on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Web server stopped");

        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            // Without a signal handler the server can only be stopped externally.
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

/// Router over `state`, usable without binding a socket
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/home", get(home).post(home))
        .route("/predict", post(predict))
        .route("/api/classify", post(classify))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
