//! Feature aggregation: static statistics + TF-IDF into one model input

use crate::feature_extractor::{truncate, FeatureExtractor, TextStatistics};
use crate::models::loader::Artifact;
use crate::models::scaler::MinMaxScaler;
use crate::models::vectorizer::TfidfVectorizer;

/// The three pre-fit scalers for the static statistics
#[derive(Debug, Clone)]
pub struct StaticScalers {
    pub punctuation: MinMaxScaler,
    pub capitals: MinMaxScaler,
    pub length: MinMaxScaler,
}

/// Builds the classifier input for a piece of text.
///
/// Layout is `[tfidf_0 .. tfidf_{v-1}, punct, cap, len]`, the column order the
/// classifier was trained on.
#[derive(Debug)]
pub struct FeatureAggregator {
    extractor: FeatureExtractor,
    vectorizer: Artifact<TfidfVectorizer>,
    scalers: StaticScalers,
}

impl FeatureAggregator {
    pub fn new(vectorizer: Artifact<TfidfVectorizer>, scalers: StaticScalers) -> Self {
        Self {
            extractor: FeatureExtractor::new(),
            vectorizer,
            scalers,
        }
    }

    /// Aggregate all features of `text` into one dense vector.
    ///
    /// The text is truncated first; every later step sees the truncated text.
    pub fn aggregate(&self, text: &str) -> Vec<f64> {
        let text = truncate(text);
        let stats = self.extractor.extract(text);
        let tfidf = self.vectorizer.model().transform(text);

        let mut features = Vec::with_capacity(self.feature_width());
        tfidf.extend_dense(&mut features);
        features.extend_from_slice(&self.normalize(&stats));
        features
    }

    /// Normalize the static statistics.
    ///
    /// Zero punctuation and capital counts skip their scaler and stay `0.0`;
    /// text length is always scaled.
    pub fn normalize(&self, stats: &TextStatistics) -> [f64; 3] {
        let punctuation = if stats.punctuation != 0 {
            self.scalers.punctuation.transform(stats.punctuation as f64)
        } else {
            0.0
        };

        let capitals = if stats.capitals != 0 {
            self.scalers.capitals.transform(stats.capitals as f64)
        } else {
            0.0
        };

        let length = self.scalers.length.transform(stats.length as f64);

        [punctuation, capitals, length]
    }

    /// Width of every vector produced by [`aggregate`](Self::aggregate)
    pub fn feature_width(&self) -> usize {
        self.vectorizer.model().vocabulary_size() + self.extractor.feature_count()
    }

    pub fn vectorizer(&self) -> &Artifact<TfidfVectorizer> {
        &self.vectorizer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::vectorizer::TfidfArtifact;

    fn scalers() -> StaticScalers {
        StaticScalers {
            punctuation: MinMaxScaler::new(0.0, 10.0).unwrap(),
            capitals: MinMaxScaler::new(0.0, 1.0).unwrap(),
            length: MinMaxScaler::new(0.0, 400.0).unwrap(),
        }
    }

    fn aggregator() -> FeatureAggregator {
        let vectorizer = TfidfVectorizer::from_artifact(TfidfArtifact {
            vocabulary: [("free".to_string(), 0), ("win".to_string(), 1)]
                .into_iter()
                .collect(),
            idf: vec![1.0, 1.0],
            ..TfidfArtifact::default()
        })
        .unwrap();
        FeatureAggregator::new(Artifact::Loaded(vectorizer), scalers())
    }

    #[test]
    fn test_feature_layout() {
        let aggregator = aggregator();
        let features = aggregator.aggregate("FREE stuff!!");

        assert_eq!(features.len(), 5);
        assert_eq!(features[0], 1.0); // free
        assert_eq!(features[1], 0.0); // win
        assert!((features[2] - 0.2).abs() < 1e-12); // 2 punctuation / 10
        assert_eq!(features[3], 1.0); // leading capital run
        assert!((features[4] - 12.0 / 400.0).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_width_for_any_length() {
        let aggregator = aggregator();
        for len in [0, 1, 50, 399, 400, 401, 1000, 5000] {
            let text = "win ".repeat(len / 4 + 1);
            let text: String = text.chars().take(len).collect();
            assert_eq!(aggregator.aggregate(&text).len(), aggregator.feature_width());
        }
    }

    #[test]
    fn test_zero_counts_bypass_scalers() {
        let shifted = StaticScalers {
            punctuation: MinMaxScaler::new(5.0, 10.0).unwrap(),
            capitals: MinMaxScaler::new(2.0, 3.0).unwrap(),
            length: MinMaxScaler::new(10.0, 20.0).unwrap(),
        };
        let aggregator = FeatureAggregator::new(Artifact::Loaded(TfidfVectorizer::default()), shifted);

        let [punct, cap, len] = aggregator.normalize(&TextStatistics::default());
        assert_eq!(punct, 0.0);
        assert_eq!(cap, 0.0);
        // Length is scaled even at zero.
        assert_eq!(len, -1.0);
    }

    #[test]
    fn test_truncation_applies_to_every_feature() {
        let aggregator = aggregator();
        let text = format!("FREE!!!{}", " see you".repeat(100));
        let features = aggregator.aggregate(&text);

        assert_eq!(features[0], 0.0); // "free" was cut off
        assert_eq!(features[2], 0.0); // so were the exclamation marks
        assert_eq!(features[3], 0.0);
        assert!((features[4] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_degraded_vectorizer_still_aggregates() {
        let aggregator =
            FeatureAggregator::new(Artifact::Degraded(TfidfVectorizer::default()), scalers());
        let features = aggregator.aggregate("anything");
        assert_eq!(features.len(), 3);
        assert_eq!(aggregator.feature_width(), 3);
    }
}
