//! Finite differences on irregularly sampled sequences.

/// Numerical derivative of `values` with respect to `coords`.
///
/// Interior points use the second-order accurate three-point formula for
/// non-uniform spacing; the two ends use one-sided first differences. Where
/// a spacing is zero the difference on the other side is used instead, and
/// the derivative is zero when both sides are degenerate.
pub fn gradient(values: &[f64], coords: &[f64]) -> Vec<f64> {
    let n = values.len().min(coords.len());
    let mut out = vec![0.0; n];
    if n < 2 {
        return out;
    }

    let one_sided = |a: usize, b: usize| {
        let h = coords[b] - coords[a];
        if h != 0.0 {
            (values[b] - values[a]) / h
        } else {
            0.0
        }
    };

    out[0] = one_sided(0, 1);
    out[n - 1] = one_sided(n - 2, n - 1);

    for i in 1..n - 1 {
        let hs = coords[i] - coords[i - 1];
        let hd = coords[i + 1] - coords[i];
        out[i] = match (hs != 0.0, hd != 0.0) {
            (true, true) => {
                (hs * hs * values[i + 1] + (hd * hd - hs * hs) * values[i] - hd * hd * values[i - 1])
                    / (hs * hd * (hd + hs))
            }
            (true, false) => one_sided(i - 1, i),
            (false, true) => one_sided(i, i + 1),
            (false, false) => 0.0,
        };
    }
    out
}

/// Numerical derivative of `values` with unit spacing.
pub fn gradient_uniform(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    match n {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..n)
            .map(|i| {
                if i == 0 {
                    values[1] - values[0]
                } else if i == n - 1 {
                    values[n - 1] - values[n - 2]
                } else {
                    (values[i + 1] - values[i - 1]) / 2.0
                }
            })
            .collect(),
    }
}
