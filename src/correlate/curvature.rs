//! Inflection tracking by snapping to the nearest detected inflection.

use super::InflectionCorrelator;
use crate::planform::Planform;
use std::collections::BTreeMap;

/// Matches each carried inflection to the closest inflection detected on
/// the next survey, regardless of curvature sign.
///
/// When several carried points snap to the same target only the one nearest
/// to it keeps the match. Surviving targets are then reassigned in ascending
/// order so the correspondence never crosses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurvatureCorrelator;

impl InflectionCorrelator for CurvatureCorrelator {
    fn correlate(
        &self,
        prev: &Planform,
        curr: &Planform,
        curr_inflections: &[usize],
        carried: &[Option<usize>],
    ) -> Vec<Option<usize>> {
        let prev_pts = prev.points();
        let curr_pts = curr.points();

        let mut out: Vec<Option<usize>> = carried
            .iter()
            .map(|slot| {
                let p = prev_pts[(*slot)?];
                curr_inflections
                    .iter()
                    .copied()
                    .fold(None, |best: Option<(usize, f64)>, c| {
                        let d = curr_pts[c].distance_squared(p);
                        match best {
                            Some((_, bd)) if bd <= d => best,
                            _ => Some((c, d)),
                        }
                    })
                    .map(|(c, _)| c)
            })
            .collect();

        // Resolve targets claimed by more than one slot
        let mut claims: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        for (slot, target) in out.iter().enumerate() {
            if let Some(t) = target {
                claims.entry(*t).or_default().push(slot);
            }
        }
        for (target, slots) in claims.into_iter().filter(|(_, s)| s.len() > 1) {
            let q = curr_pts[target];
            let keep = slots
                .iter()
                .copied()
                .fold(None, |best: Option<(usize, f64)>, slot| {
                    let d = carried[slot].map_or(f64::INFINITY, |i| prev_pts[i].distance_squared(q));
                    match best {
                        Some((_, bd)) if bd <= d => best,
                        _ => Some((slot, d)),
                    }
                })
                .map(|(slot, _)| slot);
            for slot in slots {
                if Some(slot) != keep {
                    tracing::trace!(slot, target, "duplicate inflection match dropped");
                    out[slot] = None;
                }
            }
        }

        // Sources are ascending in slot order already; sort the targets to match
        let mut targets: Vec<usize> = out.iter().flatten().copied().collect();
        targets.sort_unstable();
        let mut sorted = targets.into_iter();
        for entry in out.iter_mut().filter(|e| e.is_some()) {
            *entry = sorted.next();
        }
        out
    }
}
