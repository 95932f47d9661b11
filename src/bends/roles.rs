//! Point roles within each bend: inflection, apex, upstream, downstream.

use serde::{Deserialize, Serialize};

/// Role of a point within its bend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BendRole {
    /// Bend boundary.
    Inflection,
    /// Point of maximum curvature magnitude.
    Apex,
    /// Between the upstream inflection and the apex.
    Upstream,
    /// Between the apex and the downstream inflection.
    Downstream,
}

impl BendRole {
    /// Numeric code: 2 inflection, 0 apex, -1 upstream, +1 downstream.
    pub fn code(self) -> i8 {
        match self {
            BendRole::Inflection => 2,
            BendRole::Apex => 0,
            BendRole::Upstream => -1,
            BendRole::Downstream => 1,
        }
    }
}

/// Index of the largest `|curvature|` in `il..=ir` (first on ties).
pub fn apex_index(curvature: &[f64], il: usize, ir: usize) -> usize {
    let hi = ir.min(curvature.len().saturating_sub(1));
    let mut best = il;
    for i in il..=hi {
        if curvature[i].abs() > curvature[best].abs() {
            best = i;
        }
    }
    best
}

/// Classifies every point of a survey given its bend boundaries and filtered
/// curvature. Points outside every bend are `None`.
pub fn classify_bends(boundaries: &[usize], curvature: &[f64]) -> Vec<Option<BendRole>> {
    let n = curvature.len();
    let mut roles = vec![None; n];
    for w in boundaries.windows(2) {
        let (il, ir) = (w[0], w[1]);
        if ir >= n || il >= ir {
            continue;
        }
        let apex = apex_index(curvature, il, ir);
        roles[il] = Some(BendRole::Inflection);
        roles[ir] = Some(BendRole::Inflection);
        roles[apex] = Some(BendRole::Apex);
        for r in &mut roles[il + 1..apex.max(il + 1)] {
            *r = Some(BendRole::Upstream);
        }
        for r in &mut roles[apex + 1..ir.max(apex + 1)] {
            *r = Some(BendRole::Downstream);
        }
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        let codes: Vec<i8> = [
            BendRole::Inflection,
            BendRole::Apex,
            BendRole::Upstream,
            BendRole::Downstream,
        ]
        .iter()
        .map(|r| r.code())
        .collect();
        assert_eq!(codes, vec![2, 0, -1, 1]);
    }

    #[test]
    fn test_single_bend_layout() {
        let c = [0.0, 0.1, 0.2, 0.5, 0.3, 0.1, -0.1, 0.0];
        let roles = classify_bends(&[1, 6], &c);
        use BendRole::*;
        assert_eq!(
            roles,
            vec![
                None,
                Some(Inflection),
                Some(Upstream),
                Some(Apex),
                Some(Downstream),
                Some(Downstream),
                Some(Inflection),
                None
            ]
        );
    }

    #[test]
    fn test_apex_uses_magnitude() {
        let c = [0.0, -0.9, 0.5, 0.0];
        assert_eq!(apex_index(&c, 0, 3), 1);
    }

    #[test]
    fn test_shared_boundary_between_bends() {
        let c = [0.0, 1.0, 0.0, -1.0, 0.0];
        let roles = classify_bends(&[0, 2, 4], &c);
        assert_eq!(roles[2], Some(BendRole::Inflection));
        assert_eq!(roles[1], Some(BendRole::Apex));
        assert_eq!(roles[3], Some(BendRole::Apex));
    }
}
