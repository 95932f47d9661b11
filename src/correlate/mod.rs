//! Tracking inflection points from survey to survey.
//!
//! Every survey carries one slot per inflection seeded from the first
//! survey. A strategy maps the previous survey's slots onto the current
//! survey; a slot that fails to match becomes `None` and stays `None` for
//! the rest of the chain. Correlation is inherently sequential: survey
//! `t + 1` is matched from the state left by survey `t`.

mod curvature;
mod distance;

pub use curvature::CurvatureCorrelator;
pub use distance::{heading_within, DistanceCorrelator};

use crate::config::{CorrelationMethod, MigrationConfig};
use crate::planform::{Planform, PlanformSeries};
use crate::primitives::Point2;
use serde::Serialize;

/// Maps inflection slots of one survey onto the next.
pub trait InflectionCorrelator: Send + Sync {
    /// Returns one entry per `carried` slot: the matched point index in
    /// `curr`, or `None` when there is no match. A `None` slot in `carried`
    /// must stay `None`, and the `Some` entries of the result must be
    /// strictly increasing in slot order.
    ///
    /// `curr_inflections` are the inflections detected on `curr` itself.
    fn correlate(
        &self,
        prev: &Planform,
        curr: &Planform,
        curr_inflections: &[usize],
        carried: &[Option<usize>],
    ) -> Vec<Option<usize>>;
}

/// Builds the strategy selected by `config`.
pub fn correlator_for(config: &MigrationConfig) -> Box<dyn InflectionCorrelator> {
    match config.correlation {
        CorrelationMethod::Distance => Box::new(DistanceCorrelator::from_config(config)),
        CorrelationMethod::Curvature => Box::new(CurvatureCorrelator),
    }
}

/// Correlated inflections of one survey and their matches in the next.
///
/// `source[k]` in survey `t` corresponds to `target[k]` in survey `t + 1`.
/// Both are strictly increasing and of equal length. For the last survey
/// `target` is a copy of `source`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct PairLinks {
    pub source: Vec<usize>,
    pub target: Vec<usize>,
}

impl PairLinks {
    /// Number of bends delimited by `source`.
    pub fn bend_count(&self) -> usize {
        self.source.len().saturating_sub(1)
    }

    /// Bounds `(start, end)` of bend `k` in the source survey.
    pub fn bend_bounds(&self, k: usize) -> Option<(usize, usize)> {
        Some((*self.source.get(k)?, *self.source.get(k + 1)?))
    }
}

/// Runs `correlator` along the whole series.
///
/// `raw[t]` are the inflections detected on survey `t`. Returns one
/// [`PairLinks`] per survey.
pub fn correlate_inflections(
    series: &PlanformSeries,
    raw: &[Vec<usize>],
    correlator: &dyn InflectionCorrelator,
) -> Vec<PairLinks> {
    let planforms = series.planforms();
    let mut tracks: Vec<Vec<Option<usize>>> = Vec::with_capacity(planforms.len());
    tracks.push(raw.first().map_or_else(Vec::new, |r| r.iter().copied().map(Some).collect()));

    for (t, prev, curr) in series.pairs() {
        let empty = Vec::new();
        let curr_raw = raw.get(t + 1).unwrap_or(&empty);
        let next = correlator.correlate(prev, curr, curr_raw, &tracks[t]);
        let matched = next.iter().filter(|s| s.is_some()).count();
        tracing::debug!(
            pair = t,
            carried = tracks[t].iter().filter(|s| s.is_some()).count(),
            matched,
            "inflections correlated"
        );
        tracks.push(next);
    }

    let mut links: Vec<PairLinks> = tracks
        .windows(2)
        .map(|w| {
            let (source, target) = w[0]
                .iter()
                .zip(&w[1])
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            PairLinks { source, target }
        })
        .collect();

    let last: Vec<usize> = tracks
        .last()
        .map_or_else(Vec::new, |t| t.iter().flatten().copied().collect());
    links.push(PairLinks {
        source: last.clone(),
        target: last,
    });
    links
}

/// Index of the point in `points` closest to `p` (first on ties).
pub(crate) fn nearest_index(points: &[Point2<f64>], p: Point2<f64>) -> Option<usize> {
    points
        .iter()
        .enumerate()
        .map(|(i, q)| (i, q.distance_squared(p)))
        .fold(None, |best: Option<(usize, f64)>, (i, d)| match best {
            Some((_, bd)) if bd <= d => best,
            _ => Some((i, d)),
        })
        .map(|(i, _)| i)
}
