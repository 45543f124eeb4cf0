//! Configuration management for the spam classifier service

use crate::models::loader::ArtifactPaths;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub metrics: MetricsConfig,
    pub logging: LoggingConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to bind
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Model artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactsConfig {
    /// Directory containing the artifact files
    pub dir: String,
    /// Logistic regression weights
    #[serde(default = "default_classifier_file")]
    pub classifier: String,
    /// TF-IDF vocabulary and idf
    #[serde(default = "default_vectorizer_file")]
    pub vectorizer: String,
    /// Punctuation count scaler
    #[serde(default = "default_punct_scaler_file")]
    pub punct_scaler: String,
    /// Capital run scaler
    #[serde(default = "default_cap_scaler_file")]
    pub cap_scaler: String,
    /// Text length scaler
    #[serde(default = "default_textlen_scaler_file")]
    pub textlen_scaler: String,
}

fn default_classifier_file() -> String {
    "spam_clf_vc.json".to_string()
}

fn default_vectorizer_file() -> String {
    "spam_clf_tfidf_transformer.json".to_string()
}

fn default_punct_scaler_file() -> String {
    "spam_clf_punct_transformer.json".to_string()
}

fn default_cap_scaler_file() -> String {
    "spam_clf_cap_transformer.json".to_string()
}

fn default_textlen_scaler_file() -> String {
    "spam_clf_textlen_transformer.json".to_string()
}

impl ArtifactsConfig {
    /// Resolve every artifact file against `dir`
    pub fn paths(&self) -> ArtifactPaths {
        let dir = PathBuf::from(&self.dir);
        ArtifactPaths {
            classifier: dir.join(&self.classifier),
            vectorizer: dir.join(&self.vectorizer),
            punct_scaler: dir.join(&self.punct_scaler),
            cap_scaler: dir.join(&self.cap_scaler),
            textlen_scaler: dir.join(&self.textlen_scaler),
        }
    }
}

/// Metrics reporting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Seconds between logged summaries, 0 disables the reporter
    pub report_interval_secs: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Log format (json, pretty)
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file
    pub fn load() -> Result<Self> {
        Self::load_from_path("config/config.toml")
    }

    /// Load configuration from a specific path.
    ///
    /// Layers, lowest first: built-in defaults, the file (optional), then
    /// `SPAM__`-prefixed environment variables such as `SPAM__SERVER__PORT`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let defaults =
            Config::try_from(&AppConfig::default()).context("Failed to encode default configuration")?;

        let config = Config::builder()
            .add_source(defaults)
            .add_source(File::from(path.as_ref()).required(false))
            .add_source(
                Environment::with_prefix("SPAM")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
            },
            artifacts: ArtifactsConfig {
                dir: "models".to_string(),
                classifier: default_classifier_file(),
                vectorizer: default_vectorizer_file(),
                punct_scaler: default_punct_scaler_file(),
                cap_scaler: default_cap_scaler_file(),
                textlen_scaler: default_textlen_scaler_file(),
            },
            metrics: MetricsConfig {
                report_interval_secs: 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                format: "pretty".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.addr(), "127.0.0.1:5000");
        assert_eq!(config.artifacts.dir, "models");
        assert_eq!(config.metrics.report_interval_secs, 60);
        assert_eq!(config.artifacts.paths(), ArtifactPaths::in_dir("models"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[server]
host = "0.0.0.0"
port = 8080

[artifacts]
dir = "/srv/spam"
classifier = "lr.json"
"#,
        )
        .unwrap();

        let config = AppConfig::load_from_path(&path).unwrap();
        assert_eq!(config.server.addr(), "0.0.0.0:8080");
        assert_eq!(
            config.artifacts.paths().classifier,
            PathBuf::from("/srv/spam/lr.json")
        );
        // Unset keys keep their defaults.
        assert_eq!(config.artifacts.vectorizer, "spam_clf_tfidf_transformer.json");
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig::load_from_path(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 5000);
    }
}
