//! Whole-bend correspondence between consecutive surveys by majority vote.

use super::BendId;
use crate::correlate::PairLinks;
use std::collections::BTreeMap;

/// Most frequent bend id among `labels`, ignoring unlabelled points.
///
/// Ties go to the smallest id. `None` if no point carries a label.
/// Unlabelled points never vote, so a range that is mostly unlabelled still
/// resolves to its most common bend rather than to no successor.
pub fn majority_label(labels: &[Option<BendId>]) -> Option<BendId> {
    let mut counts: BTreeMap<BendId, usize> = BTreeMap::new();
    for &id in labels.iter().flatten() {
        *counts.entry(id).or_default() += 1;
    }

    let mut best: Option<(BendId, usize)> = None;
    for (id, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((id, count));
        }
    }
    best.map(|(id, _)| id)
}

/// Successor of every bend of one survey in the next one.
///
/// Bend `k` spans `links.source[k]..links.source[k + 1]`; its successor is the
/// majority label of `next_labels` over `links.target[k]..links.target[k + 1]`.
pub fn bend_successors(links: &PairLinks, next_labels: &[Option<BendId>]) -> Vec<Option<BendId>> {
    links
        .target
        .windows(2)
        .map(|w| {
            let lo = w[0].min(next_labels.len());
            let hi = w[1].min(next_labels.len()).max(lo);
            majority_label(&next_labels[lo..hi])
        })
        .collect()
}

/// Bend correspondence for every survey.
///
/// `links[t]` relates survey `t` to `t + 1` and `labels[t]` is survey `t`'s
/// bend labelling. The final survey has no successor: its entry is all `None`.
pub fn correlate_bends(
    links: &[PairLinks],
    labels: &[Vec<Option<BendId>>],
) -> Vec<Vec<Option<BendId>>> {
    let n = links.len();
    let mut out: Vec<Vec<Option<BendId>>> = links
        .windows(2)
        .zip(labels.iter().skip(1))
        .map(|(w, next_labels)| bend_successors(&w[0], next_labels))
        .collect();

    if let Some(last) = links.last() {
        out.push(vec![None; last.bend_count()]);
    }

    let correlated: usize = out.iter().flatten().filter(|s| s.is_some()).count();
    tracing::debug!(surveys = n, correlated, "bends correlated");
    out
}
