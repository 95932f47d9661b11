//! Bends: the reaches between consecutive correlated inflections.

mod correspondence;
mod inflection;
mod roles;

pub use correspondence::{bend_successors, correlate_bends, majority_label};
pub use inflection::{detect_inflections, label_bends, signed_labels};
pub use roles::{apex_index, classify_bends, BendRole};

/// Index of a bend within one survey, in downstream order.
pub type BendId = usize;
