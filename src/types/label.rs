//! Classification label

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary label produced by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    /// Map a raw classifier class onto a label.
    ///
    /// Only `1` (SPAM) and `0` (HAM) are defined; anything else means the
    /// classifier artifact disagrees with the label dictionary.
    pub fn from_class(class: i64) -> Result<Self> {
        match class {
            1 => Ok(Label::Spam),
            0 => Ok(Label::Ham),
            other => bail!("Classifier produced class {}, which has no label", other),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => "SPAM",
            Label::Ham => "HAM",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_class() {
        assert_eq!(Label::from_class(1).unwrap(), Label::Spam);
        assert_eq!(Label::from_class(0).unwrap(), Label::Ham);
        assert!(Label::from_class(2).is_err());
        assert!(Label::from_class(-1).is_err());
    }

    #[test]
    fn test_label_serialization() {
        assert_eq!(serde_json::to_string(&Label::Spam).unwrap(), "\"SPAM\"");
        assert_eq!(serde_json::to_string(&Label::Ham).unwrap(), "\"HAM\"");
        assert_eq!(Label::Spam.to_string(), "SPAM");
    }
}
