//! Curvature denoising.
//!
//! Two interchangeable algorithms, chosen once when the filter is built:
//! the default diffusion smoother and an optional wavelet band-pass that
//! needs a [`WaveletTransform`] capability.

mod average;
mod wavelet;

pub use average::{average_passes, moving_average};
pub use num_complex::Complex;
pub use wavelet::{
    global_power_spectrum, local_peaks, wavelet_filter, Morlet, WaveletFiltered, WaveletTransform,
};

use crate::config::FilterMode;
use crate::error::{MigrationError, Result};
use crate::planform::{Planform, PlanformSeries};
use std::sync::Arc;

/// A curvature filter bound to one [`FilterMode`].
#[derive(Clone)]
pub struct CurvatureFilter {
    mode: FilterMode,
    reduction: f64,
    transform: Option<Arc<dyn WaveletTransform>>,
}

impl std::fmt::Debug for CurvatureFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CurvatureFilter")
            .field("mode", &self.mode)
            .field("reduction", &self.reduction)
            .field("has_transform", &self.transform.is_some())
            .finish()
    }
}

impl CurvatureFilter {
    /// Diffusion smoother.
    pub fn average() -> Self {
        Self {
            mode: FilterMode::Average,
            reduction: 0.33,
            transform: None,
        }
    }

    /// Wavelet band-pass; `transform` may be absent, in which case filtering fails.
    pub fn wavelet(transform: Option<Arc<dyn WaveletTransform>>, reduction: f64) -> Self {
        Self {
            mode: FilterMode::Wavelet,
            reduction,
            transform,
        }
    }

    /// Returns the active mode.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Fails with [`MigrationError::CapabilityUnavailable`] if the mode needs
    /// a wavelet transform that was not supplied.
    pub fn ensure_available(&self) -> Result<()> {
        match (self.mode, &self.transform) {
            (FilterMode::Wavelet, None) => Err(MigrationError::CapabilityUnavailable {
                capability: "wavelet transform",
            }),
            _ => Ok(()),
        }
    }

    /// Filters the raw curvature of one planform.
    ///
    /// The wavelet sample spacing is the planform's mean spacing, which
    /// equals the first step `s[1] - s[0]` on uniformly spaced surveys.
    pub fn apply(&self, planform: &Planform) -> Result<Vec<f64>> {
        self.ensure_available()?;
        let signal = planform.curvature();
        match (&self.transform, self.mode) {
            (Some(transform), FilterMode::Wavelet) => {
                let dt = planform.mean_spacing();
                Ok(wavelet_filter(transform.as_ref(), signal, dt, self.reduction).signal)
            }
            _ => Ok(moving_average(signal)),
        }
    }

    /// Filters every survey of `series`. Nothing is computed if the filter is
    /// unavailable.
    pub fn filter_series(&self, series: &PlanformSeries) -> Result<Vec<Vec<f64>>> {
        self.ensure_available()?;
        let filtered = series
            .planforms()
            .iter()
            .map(|p| self.apply(p))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(mode = ?self.mode, surveys = filtered.len(), "curvature filtered");
        Ok(filtered)
    }
}

impl Default for CurvatureFilter {
    fn default() -> Self {
        Self::average()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MigrationConfig;

    fn series() -> PlanformSeries {
        let x: Vec<f64> = (0..60).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| (v / 6.0).sin() * 4.0).collect();
        PlanformSeries::new(vec![(&x, &y), (&x, &y)], &MigrationConfig::default()).unwrap()
    }

    #[test]
    fn test_wavelet_without_capability_fails() {
        let filter = CurvatureFilter::wavelet(None, 0.33);
        let err = filter.filter_series(&series()).unwrap_err();
        assert_eq!(
            err,
            MigrationError::CapabilityUnavailable {
                capability: "wavelet transform"
            }
        );
    }

    #[test]
    fn test_average_keeps_raw_curvature() {
        let series = series();
        let raw = series.planforms()[0].curvature().to_vec();
        let filtered = CurvatureFilter::average().filter_series(&series).unwrap();
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].len(), raw.len());
        assert_ne!(filtered[0], raw);
        assert_eq!(series.planforms()[0].curvature(), raw.as_slice());
    }

    #[test]
    fn test_wavelet_spacing_is_mean_step() {
        // Uneven steps: first step 1, later steps 3
        let x = [0.0, 1.0, 4.0, 7.0, 10.0, 13.0, 16.0, 19.0, 22.0, 25.0];
        let y = [0.0, 0.0, 0.5, 0.0, -0.5, 0.0, 0.5, 0.0, -0.5, 0.0];
        let series = PlanformSeries::new(vec![(&x, &y), (&x, &y)], &MigrationConfig::default())
            .unwrap();
        let p = &series.planforms()[0];
        assert!(p.mean_spacing() > p.arc_length()[1] - p.arc_length()[0]);

        let transform = Arc::new(Morlet::default());
        let filtered = CurvatureFilter::wavelet(Some(transform.clone()), 0.33)
            .apply(p)
            .unwrap();
        let expected = wavelet_filter(transform.as_ref(), p.curvature(), p.mean_spacing(), 0.33);
        assert_eq!(filtered, expected.signal);
    }

    #[test]
    fn test_wavelet_with_morlet_runs() {
        let filter = CurvatureFilter::wavelet(Some(Arc::new(Morlet::default())), 0.33);
        let filtered = filter.filter_series(&series()).unwrap();
        assert_eq!(filtered[1].len(), 60);
        assert!(filtered[1].iter().all(|v| v.is_finite()));
    }
}
