//! Curve interpolation and resampling.

mod spline;

pub use spline::{chord_parameters, Degree, ParametricSpline};
