//! Model artifact loader

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of loading a recoverable artifact.
///
/// `Degraded` holds an untrained default that keeps the pipeline running but
/// makes its predictions meaningless.
#[derive(Debug, Clone)]
pub enum Artifact<T> {
    Loaded(T),
    Degraded(T),
}

impl<T> Artifact<T> {
    /// The model, whichever way it was obtained
    pub fn model(&self) -> &T {
        match self {
            Artifact::Loaded(model) | Artifact::Degraded(model) => model,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Artifact::Loaded(model) | Artifact::Degraded(model) => model,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Artifact::Degraded(_))
    }

    pub fn status(&self) -> ArtifactStatus {
        match self {
            Artifact::Loaded(_) => ArtifactStatus::Loaded,
            Artifact::Degraded(_) => ArtifactStatus::Degraded,
        }
    }
}

/// Load state of one artifact, as reported by health checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactStatus {
    Loaded,
    Degraded,
}

/// Locations of the five artifacts a predictor is built from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub classifier: PathBuf,
    pub vectorizer: PathBuf,
    pub punct_scaler: PathBuf,
    pub cap_scaler: PathBuf,
    pub textlen_scaler: PathBuf,
}

impl ArtifactPaths {
    /// Default artifact file names inside `dir`
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            classifier: dir.join("spam_clf_vc.json"),
            vectorizer: dir.join("spam_clf_tfidf_transformer.json"),
            punct_scaler: dir.join("spam_clf_punct_transformer.json"),
            cap_scaler: dir.join("spam_clf_cap_transformer.json"),
            textlen_scaler: dir.join("spam_clf_textlen_transformer.json"),
        }
    }
}

/// Loader for JSON model artifacts
#[derive(Debug, Default)]
pub struct ModelLoader;

impl ModelLoader {
    pub fn new() -> Self {
        Self
    }

    /// Load a single artifact, failing on a missing or corrupt file
    pub fn load<T, P>(&self, path: P, name: &str) -> Result<T>
    where
        T: DeserializeOwned,
        P: AsRef<Path>,
    {
        let path = path.as_ref();

        info!(artifact = %name, path = %path.display(), "Loading model artifact");

        let file = File::open(path)
            .with_context(|| format!("Failed to open {} artifact at {:?}", name, path))?;
        let model = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse {} artifact from {:?}", name, path))?;

        info!(artifact = %name, "Artifact loaded successfully");

        Ok(model)
    }

    /// Load an artifact, substituting an untrained default on any failure
    pub fn load_or_default<T, P>(&self, path: P, name: &str) -> Artifact<T>
    where
        T: DeserializeOwned + Default,
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        match self.load(path, name) {
            Ok(model) => Artifact::Loaded(model),
            Err(e) => {
                warn!(
                    artifact = %name,
                    path = %path.display(),
                    error = %format!("{:#}", e),
                    "Failed to load artifact, falling back to untrained default"
                );
                Artifact::Degraded(T::default())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::scaler::MinMaxScaler;
    use std::fs;

    #[test]
    fn test_load_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scaler.json");
        fs::write(&path, r#"{"data_min": 0.0, "data_max": 2.0}"#).unwrap();

        let scaler: MinMaxScaler = ModelLoader::new().load(&path, "scaler").unwrap();
        assert_eq!(scaler.transform(1.0), 0.5);
    }

    #[test]
    fn test_load_missing_and_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new();

        let missing = loader.load::<MinMaxScaler, _>(dir.path().join("nope.json"), "scaler");
        assert!(missing.is_err());

        let corrupt_path = dir.path().join("corrupt.json");
        fs::write(&corrupt_path, "not json").unwrap();
        let corrupt = loader.load::<MinMaxScaler, _>(&corrupt_path, "scaler");
        assert!(format!("{:#}", corrupt.unwrap_err()).contains("Failed to parse scaler"));
    }

    #[derive(Debug, Default, PartialEq, serde::Deserialize)]
    struct Dummy {
        value: u32,
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let loader = ModelLoader::new();

        let path = dir.path().join("dummy.json");
        fs::write(&path, r#"{"value": 7}"#).unwrap();
        let loaded: Artifact<Dummy> = loader.load_or_default(&path, "dummy");
        assert!(!loaded.is_degraded());
        assert_eq!(loaded.model().value, 7);
        assert_eq!(loaded.status(), ArtifactStatus::Loaded);

        let degraded: Artifact<Dummy> = loader.load_or_default(dir.path().join("x.json"), "dummy");
        assert!(degraded.is_degraded());
        assert_eq!(degraded.into_inner(), Dummy::default());
    }

    #[test]
    fn test_default_artifact_names() {
        let paths = ArtifactPaths::in_dir("models");
        assert_eq!(paths.classifier, PathBuf::from("models/spam_clf_vc.json"));
        assert_eq!(
            paths.textlen_scaler,
            PathBuf::from("models/spam_clf_textlen_transformer.json")
        );
    }
}
