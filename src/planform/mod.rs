//! Survey geometry: arc length, heading and curvature of each planform.

mod derivative;

pub use derivative::{gradient, gradient_uniform};

use crate::config::MigrationConfig;
use crate::error::{MigrationError, Result};
use crate::primitives::{Point2, Vec2};
use std::f64::consts::PI;

/// The channel centerline of a single survey with its derived geometry.
///
/// Immutable once built: filtering produces a separate array and never
/// touches the raw `curvature`.
#[derive(Debug, Clone, PartialEq)]
pub struct Planform {
    points: Vec<Point2<f64>>,
    /// Cumulative arc length, `s[0] == 0`.
    s: Vec<f64>,
    /// Unwrapped heading of the step arriving at each point; zero at the
    /// first point and across zero-length steps.
    theta: Vec<f64>,
    /// Raw curvature `-dθ/ds`.
    curvature: Vec<f64>,
}

impl Planform {
    /// Derives arc length, unwrapped heading and curvature from coordinates.
    ///
    /// The caller guarantees `x.len() == y.len()`; [`PlanformSeries::new`]
    /// checks this before building.
    pub fn from_coords(x: &[f64], y: &[f64], unwrap_threshold: f64) -> Self {
        let points: Vec<Point2<f64>> = x.iter().zip(y).map(|(&x, &y)| Point2::new(x, y)).collect();
        let n = points.len();

        // The first step is taken as zero, so its heading is atan2(0, 0) = 0.
        let mut s = Vec::with_capacity(n);
        let mut theta = Vec::with_capacity(n);
        let mut acc = 0.0;
        for i in 0..n {
            let d = if i == 0 {
                Vec2::new(0.0, 0.0)
            } else {
                points[i] - points[i - 1]
            };
            acc += d.magnitude();
            s.push(acc);
            theta.push(d.angle());
        }

        unwrap_headings(&mut theta, unwrap_threshold);

        let curvature = gradient(&theta, &s).into_iter().map(|g| -g).collect();

        Self {
            points,
            s,
            theta,
            curvature,
        }
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if the planform has no vertices.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Centerline vertices.
    pub fn points(&self) -> &[Point2<f64>] {
        &self.points
    }

    /// Cumulative arc length at each vertex.
    pub fn arc_length(&self) -> &[f64] {
        &self.s
    }

    /// Unwrapped heading angle at each vertex (radians).
    pub fn heading(&self) -> &[f64] {
        &self.theta
    }

    /// Raw (unfiltered) curvature at each vertex.
    pub fn curvature(&self) -> &[f64] {
        &self.curvature
    }

    /// Total centerline length.
    pub fn total_length(&self) -> f64 {
        self.s.last().copied().unwrap_or(0.0)
    }

    /// Mean spacing between consecutive vertices, as the average of the
    /// arc-length gradient.
    pub fn mean_spacing(&self) -> f64 {
        let g = gradient_uniform(&self.s);
        if g.is_empty() {
            0.0
        } else {
            g.iter().sum::<f64>() / g.len() as f64
        }
    }

    /// Local flow direction at `i`, from its two neighbours (clamped at the ends).
    pub fn local_heading(&self, i: usize) -> f64 {
        let last = self.points.len().saturating_sub(1);
        let prev = self.points[i.saturating_sub(1)];
        let next = self.points[(i + 1).min(last)];
        (next - prev).angle()
    }
}

/// Removes ±2π jumps larger than `threshold` between consecutive headings.
fn unwrap_headings(theta: &mut [f64], threshold: f64) {
    for i in 1..theta.len() {
        let jump = theta[i] - theta[i - 1];
        if jump > threshold {
            theta[i] -= 2.0 * PI;
        } else if jump < -threshold {
            theta[i] += 2.0 * PI;
        }
    }
}

/// A time-ordered sequence of surveyed planforms.
///
/// Index order is survey time order. At least two surveys are required.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanformSeries {
    planforms: Vec<Planform>,
}

impl PlanformSeries {
    /// Builds the series from `(x, y)` coordinate sequences, one per survey.
    pub fn new<I, X, Y>(surveys: I, config: &MigrationConfig) -> Result<Self>
    where
        I: IntoIterator<Item = (X, Y)>,
        X: AsRef<[f64]>,
        Y: AsRef<[f64]>,
    {
        config.validate()?;

        let mut planforms = Vec::new();
        for (survey, (x, y)) in surveys.into_iter().enumerate() {
            let (x, y) = (x.as_ref(), y.as_ref());
            if x.len() != y.len() {
                return Err(MigrationError::LengthMismatch {
                    survey,
                    x_len: x.len(),
                    y_len: y.len(),
                });
            }
            if x.len() < 3 {
                return Err(MigrationError::TooFewPoints {
                    survey,
                    points: x.len(),
                });
            }
            planforms.push(Planform::from_coords(x, y, config.unwrap_threshold));
        }

        if planforms.len() < 2 {
            return Err(MigrationError::InsufficientSurveys {
                found: planforms.len(),
            });
        }

        tracing::debug!(surveys = planforms.len(), "planform series built");
        Ok(Self { planforms })
    }

    /// Builds the series from parallel lists of x and y sequences.
    pub fn from_coordinates<X, Y>(xs: &[X], ys: &[Y], config: &MigrationConfig) -> Result<Self>
    where
        X: AsRef<[f64]>,
        Y: AsRef<[f64]>,
    {
        if xs.len() != ys.len() {
            return Err(MigrationError::LengthMismatch {
                survey: xs.len().min(ys.len()),
                x_len: xs.len(),
                y_len: ys.len(),
            });
        }
        Self::new(xs.iter().zip(ys), config)
    }

    /// Number of surveys.
    pub fn len(&self) -> usize {
        self.planforms.len()
    }

    /// Always `false`: a series holds at least two surveys.
    pub fn is_empty(&self) -> bool {
        self.planforms.is_empty()
    }

    /// All planforms in survey order.
    pub fn planforms(&self) -> &[Planform] {
        &self.planforms
    }

    /// The planform of survey `i`.
    pub fn get(&self, i: usize) -> Option<&Planform> {
        self.planforms.get(i)
    }

    /// Consecutive survey pairs `(t, planform t, planform t + 1)`.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, &Planform, &Planform)> {
        self.planforms
            .windows(2)
            .enumerate()
            .map(|(t, w)| (t, &w[0], &w[1]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn circle(n: usize, radius: f64) -> (Vec<f64>, Vec<f64>) {
        // Counter-clockwise arc over three quarters of a turn
        let angles: Vec<f64> = (0..n).map(|i| 1.5 * PI * i as f64 / (n - 1) as f64).collect();
        (
            angles.iter().map(|a| radius * a.cos()).collect(),
            angles.iter().map(|a| radius * a.sin()).collect(),
        )
    }

    #[test]
    fn test_arc_length_starts_at_zero() {
        let p = Planform::from_coords(&[0.0, 3.0, 3.0], &[0.0, 4.0, 5.0], 1.9 * PI);
        assert_eq!(p.arc_length(), &[0.0, 5.0, 6.0]);
        assert_relative_eq!(p.total_length(), 6.0);
    }

    #[test]
    fn test_first_heading_is_zero() {
        let p = Planform::from_coords(&[0.0, 0.0, 1.0], &[0.0, 1.0, 2.0], 1.9 * PI);
        assert_eq!(p.heading()[0], 0.0);
        assert_relative_eq!(p.heading()[1], PI / 2.0);
    }

    #[test]
    fn test_westward_flow_starts_from_zero_heading() {
        let p = Planform::from_coords(&[0.0, -1.0, -2.0, -3.0], &[0.0; 4], 1.9 * PI);
        assert_eq!(p.heading()[0], 0.0);
        assert_relative_eq!(p.heading()[1], PI);
        // The jump from 0 to π shows up as curvature at the first samples
        assert_relative_eq!(p.curvature()[0], -PI);
        assert_relative_eq!(p.curvature()[1], -PI / 2.0);
        assert_relative_eq!(p.curvature()[3], 0.0);
    }

    #[test]
    fn test_repeated_point_has_zero_heading() {
        let p = Planform::from_coords(&[0.0, 1.0, 1.0, 1.0], &[0.0, 1.0, 1.0, 2.0], 1.9 * PI);
        assert_relative_eq!(p.heading()[1], PI / 4.0);
        assert_eq!(p.heading()[2], 0.0);
        assert_eq!(p.arc_length()[2], p.arc_length()[1]);
    }

    #[test]
    fn test_heading_is_unwrapped_across_pi() {
        // Heading sweeps through ±π while turning left
        let (x, y) = circle(200, 10.0);
        let p = Planform::from_coords(&x, &y, 1.9 * PI);
        for w in p.heading()[1..].windows(2) {
            assert!((w[1] - w[0]).abs() < 0.5);
        }
    }

    #[test]
    fn test_curvature_of_circle() {
        // Counter-clockwise: heading increases, so c = -dθ/ds = -1/R
        let (x, y) = circle(400, 10.0);
        let p = Planform::from_coords(&x, &y, 1.9 * PI);
        for &c in &p.curvature()[5..395] {
            assert_relative_eq!(c, -0.1, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_straight_line_has_zero_curvature() {
        let x: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let y: Vec<f64> = x.iter().map(|v| 0.5 * v).collect();
        let p = Planform::from_coords(&x, &y, 1.9 * PI);
        assert!(p.curvature()[2..].iter().all(|c| c.abs() < 1e-12));
        assert_relative_eq!(p.mean_spacing(), 1.25_f64.sqrt(), epsilon = 1e-12);
    }

    #[test]
    fn test_local_heading_clamps_at_ends() {
        let p = Planform::from_coords(&[0.0, 1.0, 2.0], &[0.0, 0.0, 1.0], 1.9 * PI);
        assert_relative_eq!(p.local_heading(0), 0.0);
        assert_relative_eq!(p.local_heading(1), (0.5_f64).atan());
    }

    #[test]
    fn test_series_needs_two_surveys() {
        let cfg = MigrationConfig::default();
        let one = vec![(vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 0.0])];
        assert_eq!(
            PlanformSeries::new(one, &cfg).unwrap_err(),
            MigrationError::InsufficientSurveys { found: 1 }
        );
    }

    #[test]
    fn test_series_rejects_mismatched_lengths() {
        let cfg = MigrationConfig::default();
        let surveys = vec![
            (vec![0.0, 1.0, 2.0], vec![0.0, 0.0, 0.0]),
            (vec![0.0, 1.0, 2.0], vec![0.0, 0.0]),
        ];
        assert!(matches!(
            PlanformSeries::new(surveys, &cfg),
            Err(MigrationError::LengthMismatch { survey: 1, .. })
        ));
    }

    #[test]
    fn test_series_rejects_short_surveys() {
        let cfg = MigrationConfig::default();
        let xs = vec![vec![0.0, 1.0], vec![0.0, 1.0, 2.0]];
        let ys = vec![vec![0.0, 0.0], vec![0.0, 0.0, 0.0]];
        assert!(matches!(
            PlanformSeries::from_coordinates(&xs, &ys, &cfg),
            Err(MigrationError::TooFewPoints { survey: 0, points: 2 })
        ));
    }

    #[test]
    fn test_series_pairs() {
        let cfg = MigrationConfig::default();
        let x = vec![0.0, 1.0, 2.0];
        let y = vec![0.0, 0.0, 0.0];
        let series = PlanformSeries::new(vec![(&x, &y), (&x, &y), (&x, &y)], &cfg).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.pairs().map(|(t, _, _)| t).collect::<Vec<_>>(), vec![0, 1]);
    }
}
