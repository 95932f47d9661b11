//! 2D vector type for headings and displacements.

use num_traits::Float;
use std::ops::Mul;

/// A step or offset between planform positions.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec2<F> {
    pub x: F,
    pub y: F,
}

impl<F: Float> Vec2<F> {
    /// Creates a new vector.
    #[inline]
    pub fn new(x: F, y: F) -> Self {
        Self { x, y }
    }

    /// Vector of length `length` at `angle` radians, counter-clockwise from +x.
    #[inline]
    pub fn from_angle(angle: F, length: F) -> Self {
        Self {
            x: angle.cos() * length,
            y: angle.sin() * length,
        }
    }

    /// Heading in `(-π, π]`; the zero vector has heading 0.
    #[inline]
    pub fn angle(self) -> F {
        self.y.atan2(self.x)
    }

    /// z-component of the 3D cross product. Positive when `other` turns left.
    #[inline]
    pub fn cross(self, other: Self) -> F {
        self.x * other.y - self.y * other.x
    }

    #[inline]
    pub fn magnitude_squared(self) -> F {
        self.x * self.x + self.y * self.y
    }

    #[inline]
    pub fn magnitude(self) -> F {
        self.x.hypot(self.y)
    }
}

impl<F: Float> Mul<F> for Vec2<F> {
    type Output = Self;

    #[inline]
    fn mul(self, scalar: F) -> Self {
        Self::new(self.x * scalar, self.y * scalar)
    }
}
