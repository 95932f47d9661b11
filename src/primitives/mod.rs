//! Floating-point geometric primitives and polyline measurements.

mod point2;
mod polyline;
mod segment2;
mod vec2;

pub use point2::Point2;
pub use polyline::{centroid, chord, polyline_length, sinuosity, sinuosity_from_span};
pub use segment2::Segment2;
pub use vec2::Vec2;
