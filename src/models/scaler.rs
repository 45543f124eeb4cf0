//! Pre-fit min-max scaler for a single scalar feature

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

fn default_feature_range() -> (f64, f64) {
    (0.0, 1.0)
}

/// On-disk form of a fitted scaler
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinMaxScalerArtifact {
    pub data_min: f64,
    pub data_max: f64,
    #[serde(default = "default_feature_range")]
    pub feature_range: (f64, f64),
    #[serde(default)]
    pub clip: bool,
}

/// Min-max scaler learned on one training column.
///
/// Maps `data_min..data_max` linearly onto `feature_range`. A zero data range
/// scales by one, so a constant training column only gets shifted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MinMaxScalerArtifact", into = "MinMaxScalerArtifact")]
pub struct MinMaxScaler {
    data_min: f64,
    data_max: f64,
    feature_range: (f64, f64),
    clip: bool,
    scale: f64,
    offset: f64,
}

impl MinMaxScaler {
    /// Build a scaler from the observed training range.
    pub fn new(data_min: f64, data_max: f64) -> Result<Self> {
        Self::with_range(data_min, data_max, default_feature_range(), false)
    }

    /// Build a scaler with an explicit output range.
    pub fn with_range(
        data_min: f64,
        data_max: f64,
        feature_range: (f64, f64),
        clip: bool,
    ) -> Result<Self> {
        let (lo, hi) = feature_range;
        if lo.partial_cmp(&hi) != Some(Ordering::Less) {
            bail!(
                "Minimum of desired feature range must be smaller than maximum, got ({}, {})",
                lo,
                hi
            );
        }
        if !data_min.is_finite() || !data_max.is_finite() || data_min > data_max {
            bail!("Invalid data range ({}, {})", data_min, data_max);
        }

        let data_range = data_max - data_min;
        let scale = (hi - lo) / if data_range == 0.0 { 1.0 } else { data_range };
        let offset = lo - data_min * scale;

        Ok(Self {
            data_min,
            data_max,
            feature_range,
            clip,
            scale,
            offset,
        })
    }

    /// Scale one value.
    pub fn transform(&self, value: f64) -> f64 {
        let scaled = value * self.scale + self.offset;
        if self.clip {
            scaled.clamp(self.feature_range.0, self.feature_range.1)
        } else {
            scaled
        }
    }
}

impl TryFrom<MinMaxScalerArtifact> for MinMaxScaler {
    type Error = anyhow::Error;

    fn try_from(artifact: MinMaxScalerArtifact) -> Result<Self> {
        Self::with_range(
            artifact.data_min,
            artifact.data_max,
            artifact.feature_range,
            artifact.clip,
        )
    }
}

impl From<MinMaxScaler> for MinMaxScalerArtifact {
    fn from(scaler: MinMaxScaler) -> Self {
        Self {
            data_min: scaler.data_min,
            data_max: scaler.data_max,
            feature_range: scaler.feature_range,
            clip: scaler.clip,
        }
    }
}
