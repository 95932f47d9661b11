//! Measurements on open polylines: length, chord, sinuosity and centroid.

use super::Point2;
use num_traits::Float;

/// Returns the total length of the polyline through `points`.
pub fn polyline_length<F: Float>(points: &[Point2<F>]) -> F {
    points
        .windows(2)
        .fold(F::zero(), |acc, w| acc + w[0].distance(w[1]))
}

/// Returns the straight-line distance between the first and last point.
///
/// Zero for fewer than two points.
pub fn chord<F: Float>(points: &[Point2<F>]) -> F {
    match (points.first(), points.last()) {
        (Some(a), Some(b)) => a.distance(*b),
        _ => F::zero(),
    }
}

/// Ratio of arc length to chord length.
///
/// A straight reach has sinuosity 1. Returns infinity when the chord is zero
/// and the arc is not (a closed loop), NaN when both are zero.
pub fn sinuosity<F: Float>(points: &[Point2<F>]) -> F {
    polyline_length(points) / chord(points)
}

/// Sinuosity from a precomputed arc-length span and the bend endpoints.
#[inline]
pub fn sinuosity_from_span<F: Float>(arc_span: F, first: Point2<F>, last: Point2<F>) -> F {
    arc_span / first.distance(last)
}

/// Area centroid of the polygon closed by joining the last point to the first.
///
/// Falls back to the vertex average when the enclosed area vanishes
/// (e.g. a straight reach). Returns `None` for an empty slice.
pub fn centroid<F: Float>(points: &[Point2<F>]) -> Option<Point2<F>> {
    if points.is_empty() {
        return None;
    }

    let n = points.len();
    let mut area2 = F::zero();
    let mut cx = F::zero();
    let mut cy = F::zero();
    for i in 0..n {
        let p = points[i];
        let q = points[(i + 1) % n];
        let a = p.x * q.y - q.x * p.y;
        area2 = area2 + a;
        cx = cx + (p.x + q.x) * a;
        cy = cy + (p.y + q.y) * a;
    }

    let scale = points
        .iter()
        .fold(F::zero(), |m, p| m.max(p.x.abs()).max(p.y.abs()));
    if area2.abs() <= F::epsilon() * scale * scale {
        let count = F::from(n)?;
        let sx = points.iter().fold(F::zero(), |acc, p| acc + p.x);
        let sy = points.iter().fold(F::zero(), |acc, p| acc + p.y);
        return Some(Point2::new(sx / count, sy / count));
    }

    let three = F::from(3.0)?;
    Some(Point2::new(cx / (three * area2), cy / (three * area2)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_length_and_chord() {
        let pts: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(2.0, 0.0),
        ];
        assert_relative_eq!(polyline_length(&pts), 2.0 * 2.0_f64.sqrt());
        assert_relative_eq!(chord(&pts), 2.0);
        assert_relative_eq!(sinuosity(&pts), 2.0_f64.sqrt());
    }

    #[test]
    fn test_straight_reach_has_unit_sinuosity() {
        let pts: Vec<Point2<f64>> = (0..5).map(|i| Point2::new(i as f64, 2.0)).collect();
        assert_relative_eq!(sinuosity(&pts), 1.0);
    }

    #[test]
    fn test_centroid_of_square() {
        let pts: Vec<Point2<f64>> = vec![
            Point2::new(0.0, 0.0),
            Point2::new(2.0, 0.0),
            Point2::new(2.0, 2.0),
            Point2::new(0.0, 2.0),
        ];
        let c = centroid(&pts).unwrap();
        assert_relative_eq!(c.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(c.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_centroid_degenerate_falls_back_to_mean() {
        let pts: Vec<Point2<f64>> = vec![Point2::new(0.0, 0.0), Point2::new(4.0, 0.0)];
        let c = centroid(&pts).unwrap();
        assert_relative_eq!(c.x, 2.0);
        assert!(centroid::<f64>(&[]).is_none());
    }
}
