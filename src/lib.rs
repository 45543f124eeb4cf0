//! Spam Classifier Library
//!
//! Labels free text as SPAM or HAM with a pre-trained TF-IDF + logistic
//! regression model, and serves the classifier over HTTP.

pub mod config;
pub mod feature_extractor;
pub mod metrics;
pub mod models;
pub mod types;
pub mod web;

pub use config::AppConfig;
pub use feature_extractor::FeatureExtractor;
pub use models::predictor::Predictor;
pub use types::{classification::Classification, label::Label};
