//! Error types for planform migration analysis.

use thiserror::Error;

/// Errors that can occur while building a series or running the pipeline.
///
/// A failed correlation is not an error: unmatched inflections, uncorrelated
/// bends and cutoffs are reported as `None` / NaN entries in the results.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MigrationError {
    /// Migration needs at least one pair of surveys.
    #[error("at least 2 surveys are required, found {found}")]
    InsufficientSurveys {
        /// Number of surveys supplied.
        found: usize,
    },

    /// The x and y coordinate sequences of a survey differ in length.
    #[error("survey {survey}: x has {x_len} values but y has {y_len}")]
    LengthMismatch {
        /// Index of the offending survey.
        survey: usize,
        /// Length of the x sequence.
        x_len: usize,
        /// Length of the y sequence.
        y_len: usize,
    },

    /// A survey is too short to derive heading and curvature.
    #[error("survey {survey} has {points} points, at least 3 are required")]
    TooFewPoints {
        /// Index of the offending survey.
        survey: usize,
        /// Number of points supplied.
        points: usize,
    },

    /// A filtering mode was requested whose backing capability is missing.
    #[error("capability unavailable: {capability}")]
    CapabilityUnavailable {
        /// Name of the missing capability.
        capability: &'static str,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration for `{field}`: {reason}")]
    InvalidConfig {
        /// Configuration field name.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MigrationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_survey() {
        let err = MigrationError::LengthMismatch {
            survey: 2,
            x_len: 10,
            y_len: 9,
        };
        assert_eq!(err.to_string(), "survey 2: x has 10 values but y has 9");

        let err = MigrationError::InsufficientSurveys { found: 1 };
        assert!(err.to_string().contains("found 1"));
    }
}
