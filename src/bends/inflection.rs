//! Inflection detection and per-point bend labelling.

use super::BendId;

/// Indices `i` where the filtered curvature strictly changes sign between
/// samples `i` and `i + 1`.
///
/// The result is strictly increasing and every index is below `len - 1`.
/// Exact zeros never count as a sign change.
pub fn detect_inflections(curvature: &[f64]) -> Vec<usize> {
    curvature
        .windows(2)
        .enumerate()
        .filter(|(_, w)| w[0] * w[1] < 0.0)
        .map(|(i, _)| i)
        .collect()
}

/// Labels each of `n` points with the bend it belongs to.
///
/// Points in `[boundaries[k], boundaries[k + 1])` get bend `k`; points before
/// the first boundary, from the last boundary on, or outside `0..n` are `None`.
pub fn label_bends(n: usize, boundaries: &[usize]) -> Vec<Option<BendId>> {
    let mut labels = vec![None; n];
    for (k, w) in boundaries.windows(2).enumerate() {
        let (il, ir) = (w[0].min(n), w[1].min(n));
        for label in &mut labels[il..ir.max(il)] {
            *label = Some(k);
        }
    }
    labels
}

/// Converts labels to the signed form, with `-1` for unlabelled points.
pub fn signed_labels(labels: &[Option<BendId>]) -> Vec<i64> {
    labels
        .iter()
        .map(|l| l.map_or(-1, |k| k as i64))
        .collect()
}
