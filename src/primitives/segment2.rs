//! 2D line segment type and segment/segment intersection.

use super::{Point2, Vec2};
use num_traits::Float;

/// A straight piece of centerline, or a search transect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment2<F> {
    pub start: Point2<F>,
    pub end: Point2<F>,
}

impl<F: Float> Segment2<F> {
    /// Creates a new segment from two points.
    #[inline]
    pub fn new(start: Point2<F>, end: Point2<F>) -> Self {
        Self { start, end }
    }

    /// Creates a segment starting at `origin` and spanning `offset`.
    #[inline]
    pub fn from_origin(origin: Point2<F>, offset: Vec2<F>) -> Self {
        Self {
            start: origin,
            end: origin + offset,
        }
    }

    /// Returns the direction vector from start to end.
    #[inline]
    pub fn direction(self) -> Vec2<F> {
        self.end - self.start
    }

    /// Returns the heading of the segment in radians, in `(-π, π]`.
    #[inline]
    pub fn heading(self) -> F {
        self.direction().angle()
    }

    /// Returns the point at parameter `t` (`0` at start, `1` at end).
    #[inline]
    pub fn point_at(self, t: F) -> Point2<F> {
        self.start.lerp(self.end, t)
    }

    /// Intersects two segments.
    ///
    /// Returns `Some((point, t_self, t_other))` when the segments cross at a
    /// single point. Parameters within `eps` outside `[0, 1]` are accepted so
    /// that crossings through a shared polyline vertex are found from both
    /// adjacent segments. Parallel or collinear segments yield `None`.
    pub fn intersect(self, other: Segment2<F>, eps: F) -> Option<(Point2<F>, F, F)> {
        let d1 = self.direction();
        let d2 = other.direction();
        let cross = d1.cross(d2);

        if cross.abs() <= F::epsilon() * d1.magnitude() * d2.magnitude() {
            return None;
        }

        let delta = other.start - self.start;
        let t1 = delta.cross(d2) / cross;
        let t2 = delta.cross(d1) / cross;

        let lo = -eps;
        let hi = F::one() + eps;
        if t1 >= lo && t1 <= hi && t2 >= lo && t2 <= hi {
            Some((self.point_at(t1), t1, t2))
        } else {
            None
        }
    }
}
