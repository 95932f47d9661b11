//! Bend-by-bend lateral displacement between consecutive surveys.
//!
//! Each correlated bend of survey `t` is paired with its successor bend in
//! survey `t + 1`. The successor is thinned to at most as many points as
//! the original, fitted with a parametric spline and resampled at the
//! original bend's chord-length parameters, giving one successor position
//! per original point. A sharp loss of sinuosity marks a cutoff and the
//! bend's displacement is left undefined.

mod subsample;

pub use subsample::subsample_indices;

use crate::bends::BendId;
use crate::config::MigrationConfig;
use crate::correlate::PairLinks;
use crate::curves::{chord_parameters, Degree, ParametricSpline};
use crate::planform::{Planform, PlanformSeries};
use crate::primitives::{sinuosity_from_span, Point2};
use serde::Serialize;

/// Per-point displacement of a survey towards the next one.
///
/// Undefined entries are NaN.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Displacement {
    pub dx: Vec<f64>,
    pub dy: Vec<f64>,
    /// Displacement magnitude, `hypot(dx, dy)`.
    pub dz: Vec<f64>,
}

impl Displacement {
    /// All-undefined displacement for `n` points.
    pub fn undefined(n: usize) -> Self {
        Self {
            dx: vec![f64::NAN; n],
            dy: vec![f64::NAN; n],
            dz: vec![f64::NAN; n],
        }
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.dx.len()
    }

    /// Returns `true` if there are no points.
    pub fn is_empty(&self) -> bool {
        self.dx.is_empty()
    }

    /// Number of points with a defined displacement.
    pub fn defined_count(&self) -> usize {
        self.dz.iter().filter(|v| !v.is_nan()).count()
    }
}

/// What happened to one bend during migration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BendStatus {
    /// Displacement computed.
    Migrated,
    /// No successor bend in the next survey.
    Uncorrelated,
    /// Sinuosity collapsed; displacement discarded.
    Cutoff,
    /// Too few points on either side to interpolate.
    Degenerate,
    /// Last survey: there is no next survey.
    Terminal,
}

/// Migration outcome for one bend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BendMigration {
    pub bend: BendId,
    pub status: BendStatus,
    /// Sinuosity of the bend in its own survey.
    pub sinuosity: f64,
    /// Sinuosity of the successor bend, when one was found.
    pub successor_sinuosity: Option<f64>,
}

/// Migration of one survey towards the next.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PairMigration {
    pub displacement: Displacement,
    pub bends: Vec<BendMigration>,
}

impl PairMigration {
    /// Terminal-survey placeholder: everything undefined.
    pub fn terminal(planform: &Planform, links: &PairLinks) -> Self {
        Self {
            displacement: Displacement::undefined(planform.len()),
            bends: (0..links.bend_count())
                .map(|bend| BendMigration {
                    bend,
                    status: BendStatus::Terminal,
                    sinuosity: bend_sinuosity(planform, links, bend),
                    successor_sinuosity: None,
                })
                .collect(),
        }
    }
}

fn bend_sinuosity(planform: &Planform, links: &PairLinks, bend: BendId) -> f64 {
    match links.bend_bounds(bend) {
        Some((il, ir)) if ir > il + 1 => span_sinuosity(planform, il, ir),
        _ => f64::NAN,
    }
}

/// Sinuosity of the points `il..ir` of `planform`.
fn span_sinuosity(planform: &Planform, il: usize, ir: usize) -> f64 {
    let s = planform.arc_length();
    let pts = planform.points();
    sinuosity_from_span(s[ir - 1] - s[il], pts[il], pts[ir - 1])
}

/// Displacement of every correlated bend of `prev` towards `next`.
///
/// `links` are `prev`'s correlated inflections, `successors[k]` is bend
/// `k`'s successor id and `next_labels` is `next`'s bend labelling. `pair`
/// only seeds the random source of [`SubsampleRule::Seeded`](crate::SubsampleRule).
pub fn migrate_pair(
    prev: &Planform,
    next: &Planform,
    links: &PairLinks,
    successors: &[Option<BendId>],
    next_labels: &[Option<BendId>],
    config: &MigrationConfig,
    pair: usize,
) -> PairMigration {
    let mut displacement = Displacement::undefined(prev.len());
    let mut bends = Vec::with_capacity(links.bend_count());

    for bend in 0..links.bend_count() {
        let Some((il, ir)) = links.bend_bounds(bend) else {
            continue;
        };
        let sinuosity = if ir > il + 1 {
            span_sinuosity(prev, il, ir)
        } else {
            f64::NAN
        };
        let mut outcome = BendMigration {
            bend,
            status: BendStatus::Uncorrelated,
            sinuosity,
            successor_sinuosity: None,
        };

        let Some(successor) = successors.get(bend).copied().flatten() else {
            tracing::trace!(pair, bend, "bend has no successor");
            bends.push(outcome);
            continue;
        };

        let members: Vec<usize> = next_labels
            .iter()
            .enumerate()
            .filter_map(|(i, l)| (*l == Some(successor)).then_some(i))
            .collect();

        let key = ((pair as u64) << 32) | bend as u64;
        match displace_bend(prev, next, il, ir, &members, config, key) {
            BendDisplacement::Degenerate => {
                outcome.status = BendStatus::Degenerate;
            }
            BendDisplacement::Cutoff { successor_sinuosity } => {
                tracing::trace!(pair, bend, sinuosity, successor_sinuosity, "cutoff detected");
                outcome.status = BendStatus::Cutoff;
                outcome.successor_sinuosity = Some(successor_sinuosity);
            }
            BendDisplacement::Moved {
                positions,
                successor_sinuosity,
            } => {
                for (offset, q) in positions.iter().enumerate() {
                    let i = il + offset;
                    let p = prev.points()[i];
                    let dx = q.x - p.x;
                    let dy = q.y - p.y;
                    displacement.dx[i] = dx;
                    displacement.dy[i] = dy;
                    displacement.dz[i] = dx.hypot(dy);
                }
                outcome.status = BendStatus::Migrated;
                outcome.successor_sinuosity = Some(successor_sinuosity);
            }
        }
        bends.push(outcome);
    }

    PairMigration {
        displacement,
        bends,
    }
}

enum BendDisplacement {
    Degenerate,
    Cutoff { successor_sinuosity: f64 },
    Moved {
        positions: Vec<Point2<f64>>,
        successor_sinuosity: f64,
    },
}

/// Positions on the successor bend matching each point of `prev[il..ir]`.
fn displace_bend(
    prev: &Planform,
    next: &Planform,
    il: usize,
    ir: usize,
    members: &[usize],
    config: &MigrationConfig,
    key: u64,
) -> BendDisplacement {
    let n1 = ir - il;
    if n1 < 2 || members.len() < 2 {
        return BendDisplacement::Degenerate;
    }

    let bend1 = &prev.points()[il..ir];
    let s2 = next.arc_length();
    let (first, last) = (members[0], members[members.len() - 1]);
    let successor_sinuosity =
        sinuosity_from_span(s2[last] - s2[first], next.points()[first], next.points()[last]);

    let sinuosity = span_sinuosity(prev, il, ir);
    if sinuosity / successor_sinuosity > config.cutoff_sinuosity_ratio {
        return BendDisplacement::Cutoff {
            successor_sinuosity,
        };
    }

    let kept = subsample_indices(members.len(), n1, config.subsampling, key);
    let bend2: Vec<Point2<f64>> = kept.iter().map(|&k| next.points()[members[k]]).collect();

    let Some(spline) = ParametricSpline::fit(&bend2, Degree::for_points(bend2.len())) else {
        return BendDisplacement::Degenerate;
    };

    BendDisplacement::Moved {
        positions: spline.resample_at(&chord_parameters(bend1)),
        successor_sinuosity,
    }
}

/// Migration for every survey of the series.
///
/// Survey pairs are independent once correlation is done and are processed
/// in parallel with the `parallel` feature. The last survey gets an
/// all-undefined [`PairMigration::terminal`].
pub fn compute_migration(
    series: &PlanformSeries,
    links: &[PairLinks],
    labels: &[Vec<Option<BendId>>],
    successors: &[Vec<Option<BendId>>],
    config: &MigrationConfig,
) -> Vec<PairMigration> {
    let planforms = series.planforms();
    let run_pair = |t: usize| {
        migrate_pair(
            &planforms[t],
            &planforms[t + 1],
            &links[t],
            &successors[t],
            &labels[t + 1],
            config,
            t,
        )
    };

    let pairs = planforms.len().saturating_sub(1);

    #[cfg(feature = "parallel")]
    let mut out: Vec<PairMigration> = {
        use rayon::prelude::*;
        (0..pairs).into_par_iter().map(run_pair).collect()
    };

    #[cfg(not(feature = "parallel"))]
    let mut out: Vec<PairMigration> = (0..pairs).map(run_pair).collect();

    if let (Some(last), Some(last_links)) = (planforms.last(), links.last()) {
        out.push(PairMigration::terminal(last, last_links));
    }

    let cutoffs = out
        .iter()
        .flat_map(|p| &p.bends)
        .filter(|b| b.status == BendStatus::Cutoff)
        .count();
    if cutoffs > 0 {
        tracing::warn!(cutoffs, "bends discarded as cutoffs");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bends::label_bends;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn planform(points: &[(f64, f64)]) -> Planform {
        let x: Vec<f64> = points.iter().map(|p| p.0).collect();
        let y: Vec<f64> = points.iter().map(|p| p.1).collect();
        Planform::from_coords(&x, &y, 1.9 * PI)
    }

    fn arc(n: usize, dx: f64, dy: f64) -> Vec<(f64, f64)> {
        (0..n)
            .map(|i| {
                let a = PI * i as f64 / (n - 1) as f64;
                (10.0 - 10.0 * a.cos() + dx, 10.0 * a.sin() + dy)
            })
            .collect()
    }

    fn whole_bend(n: usize) -> (PairLinks, Vec<Option<BendId>>) {
        let links = PairLinks {
            source: vec![0, n - 1],
            target: vec![0, n - 1],
        };
        (links, label_bends(n, &[0, n - 1]))
    }

    #[test]
    fn test_identical_bend_has_zero_displacement() {
        let p = planform(&arc(41, 0.0, 0.0));
        let (links, labels) = whole_bend(41);
        let out = migrate_pair(&p, &p, &links, &[Some(0)], &labels, &MigrationConfig::default(), 0);

        assert_eq!(out.bends[0].status, BendStatus::Migrated);
        assert_eq!(out.displacement.defined_count(), 40);
        for &dz in &out.displacement.dz[..40] {
            assert_relative_eq!(dz, 0.0, epsilon = 1e-9);
        }
        // The closing inflection belongs to the next bend
        assert!(out.displacement.dz[40].is_nan());
    }

    #[test]
    fn test_translated_bend() {
        let a = planform(&arc(41, 0.0, 0.0));
        let b = planform(&arc(41, 1.5, -0.5));
        let (links, labels) = whole_bend(41);
        let out = migrate_pair(&a, &b, &links, &[Some(0)], &labels, &MigrationConfig::default(), 0);
        for i in 0..40 {
            assert_relative_eq!(out.displacement.dx[i], 1.5, epsilon = 1e-9);
            assert_relative_eq!(out.displacement.dy[i], -0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_longer_successor_is_thinned() {
        let a = planform(&arc(21, 0.0, 0.0));
        let b = planform(&arc(61, 0.0, 2.0));
        let links = PairLinks {
            source: vec![0, 20],
            target: vec![0, 60],
        };
        let next_labels = label_bends(61, &[0, 60]);
        let out = migrate_pair(&a, &b, &links, &[Some(0)], &next_labels, &MigrationConfig::default(), 0);
        assert_eq!(out.bends[0].status, BendStatus::Migrated);
        assert_eq!(out.displacement.defined_count(), 20);
        // Both ends line up exactly
        assert_relative_eq!(out.displacement.dy[0], 2.0, epsilon = 1e-9);
        assert_relative_eq!(out.displacement.dx[0], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_cutoff_discards_bend() {
        // A 3.8 rad circular arc is about twice as long as its chord
        let sweep = 3.8;
        let looped: Vec<(f64, f64)> = (0..41)
            .map(|i| {
                let a = sweep * i as f64 / 39.0;
                (10.0 * a.sin(), 10.0 - 10.0 * a.cos())
            })
            .collect();
        let a = planform(&looped);
        let straight: Vec<(f64, f64)> = (0..41).map(|i| (i as f64 * 0.5, 0.0)).collect();
        let b = planform(&straight);
        let (links, labels) = whole_bend(41);
        let out = migrate_pair(&a, &b, &links, &[Some(0)], &labels, &MigrationConfig::default(), 0);

        assert_eq!(out.bends[0].status, BendStatus::Cutoff);
        assert!(out.bends[0].sinuosity > 1.9);
        assert_relative_eq!(out.bends[0].successor_sinuosity.unwrap(), 1.0, epsilon = 1e-12);
        assert_eq!(out.displacement.defined_count(), 0);
    }

    #[test]
    fn test_uncorrelated_bend_stays_undefined() {
        let p = planform(&arc(41, 0.0, 0.0));
        let (links, labels) = whole_bend(41);
        let out = migrate_pair(&p, &p, &links, &[None], &labels, &MigrationConfig::default(), 0);
        assert_eq!(out.bends[0].status, BendStatus::Uncorrelated);
        assert_eq!(out.displacement.defined_count(), 0);
    }

    #[test]
    fn test_single_point_bend_is_degenerate() {
        let p = planform(&arc(10, 0.0, 0.0));
        let links = PairLinks {
            source: vec![3, 4],
            target: vec![3, 4],
        };
        let labels = label_bends(10, &[3, 4]);
        let out = migrate_pair(&p, &p, &links, &[Some(0)], &labels, &MigrationConfig::default(), 0);
        assert_eq!(out.bends[0].status, BendStatus::Degenerate);
    }

    #[test]
    fn test_terminal_is_all_undefined() {
        let p = planform(&arc(11, 0.0, 0.0));
        let links = PairLinks {
            source: vec![0, 5, 10],
            target: vec![0, 5, 10],
        };
        let t = PairMigration::terminal(&p, &links);
        assert_eq!(t.displacement.len(), 11);
        assert_eq!(t.displacement.defined_count(), 0);
        assert!(t.bends.iter().all(|b| b.status == BendStatus::Terminal));
    }
}
