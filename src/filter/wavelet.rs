//! Band-pass filtering of curvature through the continuous wavelet transform.
//!
//! The transform itself is a pluggable capability ([`WaveletTransform`]).
//! [`Morlet`] follows Torrence & Compo (1998), convolving in Fourier space
//! with `rustfft`; any other transform may be supplied instead.
//!
//! Filtering picks the strongest peak of the global wavelet spectrum as the
//! fundamental scale and reconstructs the signal from every scale at or
//! above `reduction × fundamental`. If that reconstruction vanishes the next
//! strongest peak is tried.

use num_complex::Complex;
use rustfft::FftPlanner;
use std::f64::consts::PI;

/// Continuous wavelet transform capability.
///
/// Coefficients are complex and indexed `[scale][sample]`.
pub trait WaveletTransform: Send + Sync {
    /// Scales suitable for a signal of `n` samples spaced `dt` apart,
    /// smallest first.
    fn autoscales(&self, n: usize, dt: f64) -> Vec<f64>;

    /// Forward transform of `signal` at each of `scales`.
    fn forward(&self, signal: &[f64], dt: f64, scales: &[f64]) -> Vec<Vec<Complex<f64>>>;

    /// Reconstructs a signal from the coefficients at `scales`.
    fn inverse(&self, coeffs: &[Vec<Complex<f64>>], dt: f64, scales: &[f64]) -> Vec<f64>;
}

/// Morlet wavelet transform evaluated in Fourier space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Morlet {
    /// Non-dimensional frequency.
    pub omega0: f64,
    /// Scale resolution in octaves.
    pub dj: f64,
}

impl Default for Morlet {
    fn default() -> Self {
        Self {
            omega0: 6.0,
            dj: 0.1,
        }
    }
}

impl Morlet {
    /// Reconstruction factor C_δ for ω₀ = 6.
    const C_DELTA: f64 = 0.776;

    /// Fourier transform of the daughter wavelet at scale `s`, angular
    /// frequency `omega`. Zero for non-positive frequencies.
    fn daughter(&self, s: f64, omega: f64, dt: f64) -> f64 {
        if omega <= 0.0 {
            return 0.0;
        }
        let arg = s * omega - self.omega0;
        (2.0 * PI * s / dt).sqrt() * PI.powf(-0.25) * (-0.5 * arg * arg).exp()
    }
}

impl WaveletTransform for Morlet {
    fn autoscales(&self, n: usize, dt: f64) -> Vec<f64> {
        let s0 = dt * (self.omega0 + (2.0 + self.omega0 * self.omega0).sqrt()) / (2.0 * PI);
        let span = n as f64 * dt / s0;
        if span <= 1.0 {
            return vec![s0];
        }
        let j = (span.log2() / self.dj).floor() as usize;
        (0..=j).map(|i| s0 * 2f64.powf(i as f64 * self.dj)).collect()
    }

    fn forward(&self, signal: &[f64], dt: f64, scales: &[f64]) -> Vec<Vec<Complex<f64>>> {
        let n = signal.len();
        if n == 0 {
            return vec![Vec::new(); scales.len()];
        }

        // Zero padding to a power of two at least twice the signal length
        // keeps the circular convolution from wrapping around.
        let len = (2 * n).next_power_of_two();
        let mut planner = FftPlanner::<f64>::new();
        let fft = planner.plan_fft_forward(len);
        let ifft = planner.plan_fft_inverse(len);

        let mut spectrum: Vec<Complex<f64>> = signal
            .iter()
            .map(|&x| Complex::new(x, 0.0))
            .chain(std::iter::repeat(Complex::new(0.0, 0.0)))
            .take(len)
            .collect();
        fft.process(&mut spectrum);

        let omega: Vec<f64> = (0..len)
            .map(|k| {
                let k = if k <= len / 2 {
                    k as f64
                } else {
                    k as f64 - len as f64
                };
                2.0 * PI * k / (len as f64 * dt)
            })
            .collect();

        let inv_len = 1.0 / len as f64;
        scales
            .iter()
            .map(|&s| {
                let mut row: Vec<Complex<f64>> = spectrum
                    .iter()
                    .zip(&omega)
                    .map(|(&x, &w)| x * self.daughter(s, w, dt))
                    .collect();
                ifft.process(&mut row);
                row.truncate(n);
                row.into_iter().map(|c| c * inv_len).collect()
            })
            .collect()
    }

    fn inverse(&self, coeffs: &[Vec<Complex<f64>>], dt: f64, scales: &[f64]) -> Vec<f64> {
        let n = coeffs.first().map_or(0, Vec::len);
        let psi0 = PI.powf(-0.25);
        let factor = self.dj * dt.sqrt() / (Self::C_DELTA * psi0);
        let mut out = vec![0.0; n];
        for (row, &s) in coeffs.iter().zip(scales) {
            let w = factor / s.sqrt();
            for (o, c) in out.iter_mut().zip(row) {
                *o += w * c.re;
            }
        }
        out
    }
}

/// Output of [`wavelet_filter`].
#[derive(Debug, Clone, PartialEq)]
pub struct WaveletFiltered {
    /// Reconstructed (filtered) signal.
    pub signal: Vec<f64>,
    /// All scales of the forward transform.
    pub scales: Vec<f64>,
    /// Scale of the accepted spectral peak, if any peak was found.
    pub fundamental_scale: Option<f64>,
}

/// Time-averaged wavelet power at each scale.
pub fn global_power_spectrum(coeffs: &[Vec<Complex<f64>>]) -> Vec<f64> {
    coeffs
        .iter()
        .map(|row| {
            if row.is_empty() {
                0.0
            } else {
                row.iter().map(|c| c.norm_sqr()).sum::<f64>() / row.len() as f64
            }
        })
        .collect()
}

/// Strict interior local maxima of `values` as `(index, value)`, strongest first.
pub fn local_peaks(values: &[f64]) -> Vec<(usize, f64)> {
    let mut peaks: Vec<(usize, f64)> = values
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > w[0] && w[1] > w[2])
        .map(|(i, w)| (i + 1, w[1]))
        .collect();
    peaks.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    peaks
}

/// Numerically indistinguishable from an all-zero signal.
fn is_all_zero(signal: &[f64]) -> bool {
    signal.iter().all(|v| v.abs() <= 1e-8)
}

/// Band-pass filters `signal`, sampled `dt` apart, with `transform`.
pub fn wavelet_filter(
    transform: &dyn WaveletTransform,
    signal: &[f64],
    dt: f64,
    reduction: f64,
) -> WaveletFiltered {
    let scales = transform.autoscales(signal.len(), dt);
    let coeffs = transform.forward(signal, dt, &scales);
    let power = global_power_spectrum(&coeffs);

    let reconstruct = |min_scale: f64| {
        let (rows, kept): (Vec<Vec<Complex<f64>>>, Vec<f64>) = coeffs
            .iter()
            .zip(&scales)
            .filter(|(_, &s)| s >= min_scale)
            .map(|(row, &s)| (row.clone(), s))
            .unzip();
        transform.inverse(&rows, dt, &kept)
    };

    let mut last = None;
    for (p, _) in local_peaks(&power) {
        let fundamental = scales[p];
        let filtered = reconstruct(reduction * fundamental);
        if !is_all_zero(&filtered) {
            tracing::trace!(fundamental, "wavelet peak accepted");
            return WaveletFiltered {
                signal: filtered,
                scales,
                fundamental_scale: Some(fundamental),
            };
        }
        last = Some((filtered, fundamental));
    }

    match last {
        Some((signal, fundamental)) => {
            tracing::warn!("every wavelet reconstruction vanished; keeping the last one");
            WaveletFiltered {
                signal,
                scales,
                fundamental_scale: Some(fundamental),
            }
        }
        None => {
            tracing::warn!("global wavelet spectrum has no peak; reconstructing from all scales");
            let signal = reconstruct(f64::NEG_INFINITY);
            WaveletFiltered {
                signal,
                scales,
                fundamental_scale: None,
            }
        }
    }
}
