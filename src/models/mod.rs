//! Model artifacts and the inference pipeline

pub mod aggregator;
pub mod classifier;
pub mod demo;
pub mod loader;
pub mod predictor;
pub mod scaler;
pub mod vectorizer;

pub use aggregator::FeatureAggregator;
pub use classifier::LogisticRegression;
pub use loader::{Artifact, ArtifactPaths, ModelLoader};
pub use predictor::Predictor;
pub use scaler::MinMaxScaler;
pub use vectorizer::TfidfVectorizer;
