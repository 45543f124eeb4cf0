//! End-to-end SPAM/HAM predictor

use crate::config::AppConfig;
use crate::models::aggregator::{FeatureAggregator, StaticScalers};
use crate::models::classifier::LogisticRegression;
use crate::models::loader::{Artifact, ArtifactPaths, ArtifactStatus, ModelLoader};
use crate::models::vectorizer::TfidfVectorizer;
use crate::types::classification::Classification;
use crate::types::label::Label;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Overall predictor state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Degraded,
}

/// Snapshot of what the predictor is running on
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: HealthState,
    pub classifier: ArtifactStatus,
    pub vectorizer: ArtifactStatus,
    pub vocabulary_size: usize,
    pub feature_width: usize,
}

/// Predictor owning every artifact of the pipeline.
///
/// Built once at startup and shared read-only afterwards; nothing inside is
/// mutated by [`run`](Self::run).
#[derive(Debug)]
pub struct Predictor {
    classifier: Artifact<LogisticRegression>,
    aggregator: FeatureAggregator,
}

impl Predictor {
    /// Load all five artifacts.
    ///
    /// A missing or corrupt classifier or vectorizer is replaced by an untrained
    /// default and leaves the predictor degraded. A scaler failure aborts
    /// construction.
    pub fn new(paths: &ArtifactPaths) -> Result<Self> {
        let loader = ModelLoader::new();

        let vectorizer = loader.load_or_default(&paths.vectorizer, "vectorizer");
        let classifier = loader.load_or_default(&paths.classifier, "classifier");

        let scalers = StaticScalers {
            punctuation: loader
                .load(&paths.punct_scaler, "punctuation scaler")
                .context("Punctuation scaler is required")?,
            capitals: loader
                .load(&paths.cap_scaler, "capitals scaler")
                .context("Capitals scaler is required")?,
            length: loader
                .load(&paths.textlen_scaler, "text length scaler")
                .context("Text length scaler is required")?,
        };

        Ok(Self::from_parts(classifier, vectorizer, scalers))
    }

    /// Load the artifacts named in the configuration
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.artifacts.paths())
    }

    /// Assemble a predictor from already-built components
    pub fn from_parts(
        classifier: Artifact<LogisticRegression>,
        vectorizer: Artifact<TfidfVectorizer>,
        scalers: StaticScalers,
    ) -> Self {
        let aggregator = FeatureAggregator::new(vectorizer, scalers);

        let model = classifier.model();
        if model.is_fitted() && model.n_features() != aggregator.feature_width() {
            warn!(
                classifier_features = model.n_features(),
                feature_width = aggregator.feature_width(),
                "Classifier and vectorizer artifacts disagree on feature width"
            );
        }

        let predictor = Self {
            classifier,
            aggregator,
        };

        info!(
            classifier = ?predictor.classifier.status(),
            vectorizer = ?predictor.aggregator.vectorizer().status(),
            feature_width = predictor.feature_width(),
            "Predictor initialized"
        );

        predictor
    }

    /// Classify `text` as SPAM or HAM.
    ///
    /// Fails only when the classifier produces a class with no label.
    pub fn run(&self, text: &str) -> Result<Label> {
        let features = self.aggregator.aggregate(text);
        let class = self.classifier.model().predict(&features);
        let label = Label::from_class(class).context("Label lookup failed")?;

        debug!(
            label = %label,
            class = class,
            chars = text.chars().count(),
            "Text classified"
        );

        Ok(label)
    }

    /// Classify `text` and wrap the label in a [`Classification`] record
    pub fn classify(&self, text: &str) -> Result<Classification> {
        let label = self.run(text)?;
        Ok(Classification::new(label, text).with_degraded(self.is_degraded()))
    }

    /// Whether any recoverable artifact fell back to its untrained default
    pub fn is_degraded(&self) -> bool {
        self.classifier.is_degraded() || self.aggregator.vectorizer().is_degraded()
    }

    pub fn health(&self) -> HealthReport {
        HealthReport {
            status: if self.is_degraded() {
                HealthState::Degraded
            } else {
                HealthState::Healthy
            },
            classifier: self.classifier.status(),
            vectorizer: self.aggregator.vectorizer().status(),
            vocabulary_size: self.aggregator.vectorizer().model().vocabulary_size(),
            feature_width: self.feature_width(),
        }
    }

    /// Width of the feature vector fed to the classifier
    pub fn feature_width(&self) -> usize {
        self.aggregator.feature_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scaler::MinMaxScaler;
    use crate::models::vectorizer::TfidfArtifact;

    fn scalers() -> StaticScalers {
        StaticScalers {
            punctuation: MinMaxScaler::new(0.0, 1.0).unwrap(),
            capitals: MinMaxScaler::new(0.0, 1.0).unwrap(),
            length: MinMaxScaler::new(0.0, 1.0).unwrap(),
        }
    }

    fn vectorizer() -> TfidfVectorizer {
        TfidfVectorizer::from_artifact(TfidfArtifact {
            vocabulary: [("free".to_string(), 0), ("win".to_string(), 1)]
                .into_iter()
                .collect(),
            idf: vec![1.0, 1.0],
            ..TfidfArtifact::default()
        })
        .unwrap()
    }

    #[test]
    fn test_run_maps_classes_to_labels() {
        let classifier = LogisticRegression::new(vec![1.0, 0.0, 0.0, 0.0, 0.0], 0.0);
        let predictor = Predictor::from_parts(
            Artifact::Loaded(classifier),
            Artifact::Loaded(vectorizer()),
            scalers(),
        );

        assert_eq!(predictor.run("free money").unwrap(), Label::Spam);
        assert_eq!(predictor.run("lunch at noon").unwrap(), Label::Ham);
        assert!(!predictor.is_degraded());
        assert_eq!(predictor.health().status, HealthState::Healthy);
    }

    #[test]
    fn test_out_of_range_class_fails() {
        let classifier = LogisticRegression::new(vec![1.0, 0.0, 0.0, 0.0, 0.0], 0.0)
            .with_classes([0, 2]);
        let predictor = Predictor::from_parts(
            Artifact::Loaded(classifier),
            Artifact::Loaded(vectorizer()),
            scalers(),
        );

        assert!(predictor.run("free").is_err());
        assert_eq!(predictor.run("nothing here").unwrap(), Label::Ham);
    }

    #[test]
    fn test_degraded_predictor_still_answers() {
        let predictor = Predictor::from_parts(
            Artifact::Degraded(LogisticRegression::default()),
            Artifact::Degraded(TfidfVectorizer::default()),
            scalers(),
        );

        assert!(predictor.is_degraded());
        assert_eq!(predictor.run("").unwrap(), Label::Ham);
        assert_eq!(predictor.run("FREE!!!").unwrap(), Label::Ham);

        let health = predictor.health();
        assert_eq!(health.status, HealthState::Degraded);
        assert_eq!(health.classifier, ArtifactStatus::Degraded);
        assert_eq!(health.feature_width, 3);
    }

    #[test]
    fn test_classify_record() {
        let predictor = Predictor::from_parts(
            Artifact::Degraded(LogisticRegression::default()),
            Artifact::Loaded(vectorizer()),
            scalers(),
        );

        let record = predictor.classify("win").unwrap();
        assert_eq!(record.label, Label::Ham);
        assert!(record.degraded);
        assert_eq!(record.char_count, 3);
    }
}
