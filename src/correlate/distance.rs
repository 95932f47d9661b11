//! Inflection tracking along transects orthogonal to the local flow.

use super::{nearest_index, InflectionCorrelator};
use crate::config::MigrationConfig;
use crate::planform::Planform;
use crate::primitives::{Segment2, Vec2};
use std::f64::consts::{FRAC_PI_2, PI};

/// Parameter slack for segment intersection, so a transect through a vertex
/// is detected on both adjacent segments.
const INTERSECT_EPS: f64 = 1e-9;

/// Returns `true` if `heading` lies within `tolerance` of `reference`.
///
/// Both angles are in `(-π, π]`; when they sit on opposite sides of the ±π
/// cut, `heading` is shifted by 2π before comparing.
pub fn heading_within(reference: f64, heading: f64, tolerance: f64) -> bool {
    let mut h = heading;
    if reference > FRAC_PI_2 && h < -FRAC_PI_2 {
        h += 2.0 * PI;
    }
    if reference < -FRAC_PI_2 && h > FRAC_PI_2 {
        h -= 2.0 * PI;
    }
    (h - reference).abs() <= tolerance
}

/// Follows each inflection across to the next survey along the normal to
/// the previous survey's flow direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceCorrelator {
    /// Maximum heading difference (radians) of candidate segments.
    pub heading_tolerance: f64,
    /// Transect length in multiples of the previous survey's mean spacing.
    pub length_factor: f64,
}

impl Default for DistanceCorrelator {
    fn default() -> Self {
        Self::from_config(&MigrationConfig::default())
    }
}

impl DistanceCorrelator {
    /// Takes the heading tolerance and transect length from `config`.
    pub fn from_config(config: &MigrationConfig) -> Self {
        Self {
            heading_tolerance: config.heading_tolerance(),
            length_factor: config.transect_length_factor,
        }
    }

    /// Finds where the ray orthogonal to `prev`'s flow at point `i` meets `curr`.
    ///
    /// The ray starts at the point, points to the right of the flow and is
    /// `reach` long. Only segments of `curr` flowing within the heading
    /// tolerance of `prev`'s local direction are considered. Every crossing
    /// is snapped to the nearest vertex of `curr` and the smallest such index
    /// is returned.
    pub fn find_orthogonal_point(
        &self,
        prev: &Planform,
        curr: &Planform,
        i: usize,
        reach: f64,
    ) -> Option<usize> {
        let flow = prev.local_heading(i);
        let origin = *prev.points().get(i)?;
        let transect = Segment2::from_origin(origin, Vec2::from_angle(flow - FRAC_PI_2, reach));

        let points = curr.points();
        let mut best: Option<usize> = None;
        for w in points.windows(2) {
            let segment = Segment2::new(w[0], w[1]);
            if !heading_within(flow, segment.heading(), self.heading_tolerance) {
                continue;
            }
            if let Some((hit, _, _)) = transect.intersect(segment, INTERSECT_EPS) {
                if let Some(idx) = nearest_index(points, hit) {
                    best = Some(best.map_or(idx, |b| b.min(idx)));
                }
            }
        }
        best
    }
}

impl InflectionCorrelator for DistanceCorrelator {
    fn correlate(
        &self,
        prev: &Planform,
        curr: &Planform,
        _curr_inflections: &[usize],
        carried: &[Option<usize>],
    ) -> Vec<Option<usize>> {
        let reach = self.length_factor * prev.mean_spacing();
        let mut last_accepted: Option<usize> = None;

        carried
            .iter()
            .map(|slot| {
                let i = (*slot)?;
                let Some(candidate) = self.find_orthogonal_point(prev, curr, i, reach) else {
                    tracing::trace!(inflection = i, "transect found no crossing");
                    return None;
                };
                if last_accepted.is_some_and(|last| candidate <= last) {
                    tracing::trace!(inflection = i, candidate, "match out of order, dropped");
                    return None;
                }
                last_accepted = Some(candidate);
                Some(candidate)
            })
            .collect()
    }
}
