//! Parametric interpolating splines through planform vertices.
//!
//! The curve is parameterised by normalised chord length `u ∈ [0, 1]` and
//! x and y are interpolated independently, either piecewise linearly or with
//! a natural cubic spline (zero second derivative at both ends).
//!
//! # Example
//!
//! ```
//! use meander::{Point2, curves::{Degree, ParametricSpline}};
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(1.0, 1.0),
//!     Point2::new(2.0, 0.0),
//!     Point2::new(3.0, -1.0),
//! ];
//!
//! let spline = ParametricSpline::fit(&points, Degree::Cubic).unwrap();
//! let resampled = spline.resample_uniform(10);
//! assert_eq!(resampled.len(), 10);
//! ```

use crate::primitives::Point2;
use num_traits::Float;

/// Polynomial degree of a [`ParametricSpline`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Degree {
    /// Piecewise linear interpolation.
    Linear,
    /// Natural cubic spline interpolation.
    Cubic,
}

impl Degree {
    /// Picks cubic interpolation when there are more than three nodes, linear otherwise.
    pub fn for_points(n: usize) -> Self {
        if n > 3 {
            Degree::Cubic
        } else {
            Degree::Linear
        }
    }
}

/// An interpolating parametric curve through a sequence of points.
#[derive(Debug, Clone, PartialEq)]
pub struct ParametricSpline<F> {
    degree: Degree,
    /// Normalised chord-length parameter of each node.
    params: Vec<F>,
    xs: Vec<F>,
    ys: Vec<F>,
    /// Second derivatives at the nodes (all zero for linear splines).
    mx: Vec<F>,
    my: Vec<F>,
}

impl<F: Float> ParametricSpline<F> {
    /// Fits a spline through `points`.
    ///
    /// Consecutive coincident points are collapsed. Returns `None` if fewer
    /// than two distinct points remain.
    pub fn fit(points: &[Point2<F>], degree: Degree) -> Option<Self> {
        let mut nodes: Vec<Point2<F>> = Vec::with_capacity(points.len());
        for &p in points {
            if nodes.last().map_or(true, |&q| q.distance(p) > F::zero()) {
                nodes.push(p);
            }
        }
        if nodes.len() < 2 {
            return None;
        }

        let params = chord_parameters(&nodes);
        let xs: Vec<F> = nodes.iter().map(|p| p.x).collect();
        let ys: Vec<F> = nodes.iter().map(|p| p.y).collect();

        let (mx, my) = match degree {
            Degree::Cubic if nodes.len() > 2 => (
                natural_second_derivatives(&params, &xs),
                natural_second_derivatives(&params, &ys),
            ),
            _ => (vec![F::zero(); nodes.len()], vec![F::zero(); nodes.len()]),
        };

        Some(Self {
            degree,
            params,
            xs,
            ys,
            mx,
            my,
        })
    }

    /// Returns the degree this spline was fitted with.
    pub fn degree(&self) -> Degree {
        self.degree
    }

    /// Returns the number of interpolation nodes.
    pub fn num_nodes(&self) -> usize {
        self.params.len()
    }

    /// Evaluates the curve at `u`, clamped to `[0, 1]`.
    pub fn eval(&self, u: F) -> Point2<F> {
        let u = u.max(F::zero()).min(F::one());
        let last = self.params.len() - 1;

        // Interval k such that params[k] <= u <= params[k + 1]
        let k = self
            .params
            .partition_point(|&p| p <= u)
            .saturating_sub(1)
            .min(last - 1);

        let h = self.params[k + 1] - self.params[k];
        let a = (self.params[k + 1] - u) / h;
        let b = (u - self.params[k]) / h;
        let six = F::from(6.0).unwrap_or_else(F::one);
        let w_a = (a * a * a - a) * h * h / six;
        let w_b = (b * b * b - b) * h * h / six;

        Point2::new(
            a * self.xs[k] + b * self.xs[k + 1] + w_a * self.mx[k] + w_b * self.mx[k + 1],
            a * self.ys[k] + b * self.ys[k + 1] + w_a * self.my[k] + w_b * self.my[k + 1],
        )
    }

    /// Evaluates the curve at each parameter in `params`.
    pub fn resample_at(&self, params: &[F]) -> Vec<Point2<F>> {
        params.iter().map(|&u| self.eval(u)).collect()
    }

    /// Resamples the curve at `n` evenly spaced parameter values.
    pub fn resample_uniform(&self, n: usize) -> Vec<Point2<F>> {
        match n {
            0 => Vec::new(),
            1 => vec![self.eval(F::zero())],
            _ => {
                let denom = F::from(n - 1).unwrap_or_else(F::one);
                (0..n)
                    .map(|i| self.eval(F::from(i).unwrap_or_else(F::zero) / denom))
                    .collect()
            }
        }
    }
}

/// Normalised cumulative chord length of each point, from `0` to `1`.
///
/// Falls back to uniform spacing when all points coincide.
pub fn chord_parameters<F: Float>(points: &[Point2<F>]) -> Vec<F> {
    let n = points.len();
    if n == 0 {
        return Vec::new();
    }

    let mut params = Vec::with_capacity(n);
    let mut acc = F::zero();
    params.push(acc);
    for w in points.windows(2) {
        acc = acc + w[0].distance(w[1]);
        params.push(acc);
    }

    if acc > F::zero() {
        params.iter_mut().for_each(|p| *p = *p / acc);
    } else if n > 1 {
        let denom = F::from(n - 1).unwrap_or_else(F::one);
        for (i, p) in params.iter_mut().enumerate() {
            *p = F::from(i).unwrap_or_else(F::zero) / denom;
        }
    }
    params
}

/// Solves the tridiagonal system for natural cubic spline second derivatives.
fn natural_second_derivatives<F: Float>(t: &[F], v: &[F]) -> Vec<F> {
    let n = t.len();
    let mut m = vec![F::zero(); n];
    if n < 3 {
        return m;
    }

    let two = F::one() + F::one();
    let six = F::from(6.0).unwrap_or_else(F::one);

    // Thomas algorithm over the interior unknowns m[1..n-1]
    let mut c_prime = vec![F::zero(); n];
    let mut d_prime = vec![F::zero(); n];
    for i in 1..n - 1 {
        let h0 = t[i] - t[i - 1];
        let h1 = t[i + 1] - t[i];
        let rhs = six * ((v[i + 1] - v[i]) / h1 - (v[i] - v[i - 1]) / h0);
        let diag = two * (h0 + h1);
        let (denom, prev_d) = if i == 1 {
            (diag, F::zero())
        } else {
            (diag - h0 * c_prime[i - 1], d_prime[i - 1])
        };
        c_prime[i] = h1 / denom;
        d_prime[i] = (rhs - h0 * prev_d) / denom;
    }

    for i in (1..n - 1).rev() {
        m[i] = d_prime[i] - c_prime[i] * m[i + 1];
    }
    m
}
