//! Discrete diffusion smoothing of a curvature signal.

/// Number of smoothing passes applied to a signal of length `n`.
#[inline]
pub fn average_passes(n: usize) -> usize {
    n / 10
}

/// Smooths `signal` with `n / 10` passes of a (1, 2, 1)/4 kernel.
///
/// Each pass updates every interior sample from the previous pass's values,
/// then blends each end sample 2:1 with its (already updated) neighbour.
pub fn moving_average(signal: &[f64]) -> Vec<f64> {
    let mut out = signal.to_vec();
    let n = out.len();
    if n < 3 {
        return out;
    }

    let mut prev = out.clone();
    for _ in 0..average_passes(n) {
        prev.copy_from_slice(&out);
        for i in 1..n - 1 {
            out[i] = (prev[i - 1] + 2.0 * prev[i] + prev[i + 1]) / 4.0;
        }
        out[0] = (2.0 * out[0] + out[1]) / 3.0;
        out[n - 1] = (2.0 * out[n - 1] + out[n - 2]) / 3.0;
    }
    out
}
