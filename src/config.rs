//! Pipeline configuration.

use crate::error::{MigrationError, Result};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// How inflection points are carried from one survey to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorrelationMethod {
    /// Walk along a transect orthogonal to the previous survey's flow direction.
    #[default]
    Distance,
    /// Snap to the nearest inflection detected in the next survey.
    Curvature,
}

/// How the raw curvature signal is denoised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Iterated (1, 2, 1)/4 diffusion smoother.
    #[default]
    Average,
    /// Inverse continuous wavelet transform band-pass.
    Wavelet,
}

/// How surplus points are dropped from a successor bend before resampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubsampleRule {
    /// Keep evenly spaced indices, endpoints included.
    #[default]
    Even,
    /// Drop interior points uniformly at random from a fixed seed.
    Seeded {
        /// Seed of the random source.
        seed: u64,
    },
}

/// Configuration for [`MigrationPipeline`](crate::MigrationPipeline).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MigrationConfig {
    /// Inflection correlation strategy.
    pub correlation: CorrelationMethod,
    /// Curvature filtering mode.
    pub filter: FilterMode,
    /// Smallest retained wavelet scale, as a fraction of the fundamental scale.
    pub wavelet_reduction: f64,
    /// Maximum heading difference (degrees) between a searched segment and the
    /// local flow direction for the distance strategy.
    pub heading_tolerance_deg: f64,
    /// Sinuosity ratio (before / after) above which a bend is treated as cut off.
    pub cutoff_sinuosity_ratio: f64,
    /// Heading jump (radians) that triggers a ±2π unwrap.
    pub unwrap_threshold: f64,
    /// Length of the orthogonal search ray in multiples of the mean step spacing.
    pub transect_length_factor: f64,
    /// Successor-bend point reduction rule.
    pub subsampling: SubsampleRule,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            correlation: CorrelationMethod::Distance,
            filter: FilterMode::Average,
            wavelet_reduction: 0.33,
            heading_tolerance_deg: 45.0,
            cutoff_sinuosity_ratio: 1.5,
            unwrap_threshold: 1.9 * PI,
            transect_length_factor: 10.0,
            subsampling: SubsampleRule::Even,
        }
    }
}

impl MigrationConfig {
    /// Checks that every numeric parameter is finite and in range.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("wavelet_reduction", self.wavelet_reduction),
            ("heading_tolerance_deg", self.heading_tolerance_deg),
            ("cutoff_sinuosity_ratio", self.cutoff_sinuosity_ratio),
            ("unwrap_threshold", self.unwrap_threshold),
            ("transect_length_factor", self.transect_length_factor),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(MigrationError::InvalidConfig {
                    field,
                    reason: format!("must be finite and positive, got {value}"),
                });
            }
        }
        if self.heading_tolerance_deg > 180.0 {
            return Err(MigrationError::InvalidConfig {
                field: "heading_tolerance_deg",
                reason: format!("must not exceed 180, got {}", self.heading_tolerance_deg),
            });
        }
        Ok(())
    }

    /// Heading tolerance in radians.
    pub fn heading_tolerance(&self) -> f64 {
        self.heading_tolerance_deg.to_radians()
    }
}
