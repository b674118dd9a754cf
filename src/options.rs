use serde::Deserialize;

use crate::error::SimplifyError;

/// Options for track simplification and GeoJSON export.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimplifyOptions {
    /// Minimum spacing in meters between retained points (default: 10)
    #[serde(default = "default_min_distance")]
    pub min_distance: f64,

    /// Include elevation as the 3rd coordinate value in GeoJSON (default: true)
    #[serde(default = "default_true")]
    pub include_elevation: bool,

    /// Include timestamps in coordinateProperties.times (default: true)
    #[serde(default = "default_true")]
    pub include_time: bool,

    /// Include cumulative distances in coordinateProperties.distances (default: true)
    #[serde(default = "default_true")]
    pub include_distances: bool,
}

impl Default for SimplifyOptions {
    fn default() -> Self {
        Self {
            min_distance: default_min_distance(),
            include_elevation: true,
            include_time: true,
            include_distances: true,
        }
    }
}

impl SimplifyOptions {
    pub fn with_min_distance(min_distance: f64) -> Self {
        Self {
            min_distance,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SimplifyError> {
        if !self.min_distance.is_finite() || self.min_distance <= 0.0 {
            return Err(SimplifyError::InvalidOption {
                option: "minDistance",
                reason: format!("expected a positive number of meters, got {}", self.min_distance),
            });
        }
        Ok(())
    }
}

fn default_min_distance() -> f64 {
    10.0
}

fn default_true() -> bool {
    true
}
