//! Classification result returned by the JSON API

use crate::feature_extractor::MAX_TEXT_CHARS;
use crate::types::label::Label;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of classifying one piece of text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    /// Unique request identifier
    pub request_id: String,

    /// Predicted label
    pub label: Label,

    /// Character count of the submitted text, before truncation
    pub char_count: usize,

    /// Whether only the tail of the text was classified
    pub truncated: bool,

    /// Whether the prediction came from a predictor running on default artifacts
    pub degraded: bool,

    /// Classification timestamp
    pub timestamp: DateTime<Utc>,
}

impl Classification {
    /// Create a classification record for `text`
    pub fn new(label: Label, text: &str) -> Self {
        let char_count = text.chars().count();
        Self {
            request_id: uuid::Uuid::new_v4().to_string(),
            label,
            char_count,
            truncated: char_count > MAX_TEXT_CHARS,
            degraded: false,
            timestamp: Utc::now(),
        }
    }

    /// Mark the record as produced in degraded mode
    pub fn with_degraded(mut self, degraded: bool) -> Self {
        self.degraded = degraded;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_truncated_flag() {
        let short = Classification::new(Label::Ham, "hello");
        assert_eq!(short.char_count, 5);
        assert!(!short.truncated);

        let long_text = "é".repeat(MAX_TEXT_CHARS + 1);
        let long = Classification::new(Label::Spam, &long_text);
        assert_eq!(long.char_count, MAX_TEXT_CHARS + 1);
        assert!(long.truncated);
    }

    #[test]
    fn test_classification_serialization() {
        let record = Classification::new(Label::Spam, "FREE prize").with_degraded(true);

        let json = serde_json::to_string(&record).unwrap();
        let deserialized: Classification = serde_json::from_str(&json).unwrap();

        assert_eq!(record.request_id, deserialized.request_id);
        assert_eq!(deserialized.label, Label::Spam);
        assert!(deserialized.degraded);
    }
}
