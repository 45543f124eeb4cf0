//! Toy artifact set for local runs and tests.
//!
//! Two-word vocabulary `{"free", "win"}`, identity scalers and a classifier
//! that answers SPAM exactly when the `free` weight is positive. These are
//! fixed values, not a trained model.

use crate::models::classifier::LogisticRegression;
use crate::models::loader::ArtifactPaths;
use crate::models::scaler::MinMaxScaler;
use crate::models::vectorizer::{TfidfArtifact, TfidfVectorizer};
use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::info;

pub fn demo_vectorizer() -> Result<TfidfVectorizer> {
    TfidfVectorizer::from_artifact(TfidfArtifact {
        vocabulary: [("free".to_string(), 0), ("win".to_string(), 1)]
            .into_iter()
            .collect(),
        idf: vec![1.0, 1.0],
        ..TfidfArtifact::default()
    })
}

pub fn demo_classifier() -> LogisticRegression {
    // [free, win, punct, cap, len]
    LogisticRegression::new(vec![1.0, 0.0, 0.0, 0.0, 0.0], 0.0)
}

pub fn demo_scaler() -> Result<MinMaxScaler> {
    MinMaxScaler::new(0.0, 1.0)
}

/// Write the toy artifacts into `dir` under their default names
pub fn write_demo_artifacts<P: AsRef<Path>>(dir: P) -> Result<ArtifactPaths> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {:?}", dir))?;

    let paths = ArtifactPaths::in_dir(dir);
    write_json(&paths.classifier, &demo_classifier())?;
    write_json(&paths.vectorizer, &demo_vectorizer()?)?;
    write_json(&paths.punct_scaler, &demo_scaler()?)?;
    write_json(&paths.cap_scaler, &demo_scaler()?)?;
    write_json(&paths.textlen_scaler, &demo_scaler()?)?;

    info!(dir = %dir.display(), "Demo artifacts written");

    Ok(paths)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json).with_context(|| format!("Failed to write {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loader::ModelLoader;

    #[test]
    fn test_written_artifacts_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_demo_artifacts(dir.path()).unwrap();
        let loader = ModelLoader::new();

        let classifier: LogisticRegression = loader.load(&paths.classifier, "classifier").unwrap();
        assert_eq!(classifier, demo_classifier());

        let vectorizer: TfidfVectorizer = loader.load(&paths.vectorizer, "vectorizer").unwrap();
        assert_eq!(vectorizer.term_index("free"), Some(0));

        let scaler: MinMaxScaler = loader.load(&paths.cap_scaler, "scaler").unwrap();
        assert_eq!(scaler.transform(3.0), 3.0);
    }
}
