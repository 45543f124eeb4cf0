//! Pre-fit binary logistic regression

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

fn default_classes() -> [i64; 2] {
    [0, 1]
}

/// On-disk form of a fitted classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogisticRegressionArtifact {
    /// One weight per input feature
    pub coef: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
    /// Class values for a negative / positive decision
    #[serde(default = "default_classes")]
    pub classes: [i64; 2],
}

/// Binary logistic regression over a dense feature vector.
///
/// Only the decision function is evaluated: a positive margin selects
/// `classes[1]`, anything else `classes[0]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LogisticRegressionArtifact", into = "LogisticRegressionArtifact")]
pub struct LogisticRegression {
    coef: Vec<f64>,
    intercept: f64,
    classes: [i64; 2],
}

impl LogisticRegression {
    /// Create a classifier with the default `[0, 1]` classes.
    pub fn new(coef: Vec<f64>, intercept: f64) -> Self {
        Self {
            coef,
            intercept,
            classes: default_classes(),
        }
    }

    /// Override the class values reported for each decision.
    pub fn with_classes(mut self, classes: [i64; 2]) -> Self {
        self.classes = classes;
        self
    }

    /// Number of features the classifier was trained on
    pub fn n_features(&self) -> usize {
        self.coef.len()
    }

    /// Whether the classifier carries learned weights
    pub fn is_fitted(&self) -> bool {
        !self.coef.is_empty()
    }

    pub fn classes(&self) -> [i64; 2] {
        self.classes
    }

    /// Signed distance of `features` from the decision boundary.
    ///
    /// A width mismatch does not fail: surplus features or weights are
    /// ignored, which is meaningless but matches the degraded contract.
    pub fn decision_function(&self, features: &[f64]) -> f64 {
        if self.is_fitted() && features.len() != self.coef.len() {
            warn!(
                expected = self.coef.len(),
                actual = features.len(),
                "Feature vector width does not match classifier"
            );
        }

        self.coef
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    /// Predict the raw class value for one feature vector.
    pub fn predict(&self, features: &[f64]) -> i64 {
        if self.decision_function(features) > 0.0 {
            self.classes[1]
        } else {
            self.classes[0]
        }
    }
}

impl Default for LogisticRegression {
    /// Untrained classifier: no weights, zero intercept, always `classes[0]`.
    fn default() -> Self {
        Self::new(Vec::new(), 0.0)
    }
}

impl TryFrom<LogisticRegressionArtifact> for LogisticRegression {
    type Error = anyhow::Error;

    fn try_from(artifact: LogisticRegressionArtifact) -> Result<Self> {
        if artifact.coef.is_empty() {
            bail!("Classifier has no coefficients");
        }
        if !artifact.intercept.is_finite() || artifact.coef.iter().any(|w| !w.is_finite()) {
            bail!("Classifier weights must be finite");
        }
        if artifact.classes[0] == artifact.classes[1] {
            bail!("Classifier classes must be distinct, got {:?}", artifact.classes);
        }

        Ok(Self {
            coef: artifact.coef,
            intercept: artifact.intercept,
            classes: artifact.classes,
        })
    }
}

impl From<LogisticRegression> for LogisticRegressionArtifact {
    fn from(model: LogisticRegression) -> Self {
        Self {
            coef: model.coef,
            intercept: model.intercept,
            classes: model.classes,
        }
    }
}
