//! meander - Bend tracking and lateral migration of river centerlines
//!
//! Takes a time series of surveyed centerlines and follows each meander bend
//! from one survey to the next: curvature is denoised, inflection points are
//! matched between surveys, bends are labeled between matched inflections
//! and each bend's points are displaced onto its successor.
//!
//! ```
//! use meander::{MigrationConfig, MigrationPipeline, PlanformSeries};
//!
//! let x: Vec<f64> = (0..400).map(|i| i as f64 * 0.5).collect();
//! let y: Vec<f64> = x.iter().map(|v| 6.0 * (v / 10.0).sin()).collect();
//! let moved: Vec<f64> = y.iter().map(|v| v - 0.5).collect();
//!
//! let config = MigrationConfig::default();
//! let series = PlanformSeries::new(vec![(&x, &y), (&x, &moved)], &config).unwrap();
//! let result = MigrationPipeline::new(config).unwrap().run(&series).unwrap();
//! assert_eq!(result.surveys.len(), 2);
//! ```
//!
//! Enable the `parallel` feature to migrate survey pairs on a rayon pool;
//! [`SubsampleRule`] keeps the output deterministic either way.

pub mod bends;
pub mod config;
pub mod correlate;
pub mod curves;
pub mod error;
pub mod filter;
pub mod migration;
pub mod pipeline;
pub mod planform;
pub mod primitives;

pub use bends::{BendId, BendRole};
pub use config::{CorrelationMethod, FilterMode, MigrationConfig, SubsampleRule};
pub use correlate::{CurvatureCorrelator, DistanceCorrelator, InflectionCorrelator, PairLinks};
pub use error::{MigrationError, Result};
pub use filter::{CurvatureFilter, Morlet, WaveletTransform};
pub use migration::{BendStatus, Displacement};
pub use pipeline::{BendSummary, MigrationPipeline, MigrationResult, SurveyRecord};
pub use planform::{Planform, PlanformSeries};
pub use primitives::{Point2, Segment2, Vec2};
