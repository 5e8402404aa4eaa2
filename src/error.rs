#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when no design-space bounds are configured and the objective
    /// does not declare any.
    #[error("no bounds given: set `xlimits` or declare them on the objective")]
    MissingBounds,

    /// Returned when a dimension's lower bound exceeds its upper bound or a
    /// bound is not finite.
    #[error("invalid bounds for dimension {dim}: low ({low}) must be finite and <= high ({high})")]
    InvalidBounds {
        /// Index of the offending dimension.
        dim: usize,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when the bounds describe a zero-dimensional design space.
    #[error("bounds must have at least one dimension")]
    EmptyBounds,

    /// Returned when the initial inputs and outputs have a different number of rows.
    #[error("initial design shape mismatch: {n_x} input rows but {n_y} output rows")]
    DoeShapeMismatch {
        /// Number of input rows.
        n_x: usize,
        /// Number of output rows.
        n_y: usize,
    },

    /// Returned when a row of the supplied initial design does not match the
    /// dimension of the bounds.
    #[error("initial design row {row} has {got} coordinates, bounds have {expected}")]
    DoeDimensionMismatch {
        /// Index of the offending row.
        row: usize,
        /// Number of dimensions of the bounds.
        expected: usize,
        /// Number of coordinates in the row.
        got: usize,
    },

    /// Returned when a design point does not have the expected dimension.
    #[error("dimension mismatch: expected {expected} coordinates, got {got}")]
    DimensionMismatch {
        /// The expected number of coordinates.
        expected: usize,
        /// The actual number of coordinates.
        got: usize,
    },

    /// Returned when the objective returns the wrong number of values.
    #[error("objective dimension mismatch: expected {expected} values, got {got}")]
    ObjectiveDimensionMismatch {
        /// The expected number of values.
        expected: usize,
        /// The actual number of values returned.
        got: usize,
    },

    /// Returned when the optimization would start without any sample.
    #[error("initial design is empty: supply xdoe/ydoe or a positive n_start")]
    EmptyDesign,

    /// Returned when the GA dispersion weight is outside `[0, 1]`.
    #[error("invalid dispersion weight: {0} must be in [0.0, 1.0]")]
    InvalidWeight(f64),

    /// Returned when the genetic search is configured with an empty population.
    #[error("population size must be positive, got {0}")]
    InvalidPopulationSize(usize),

    /// Returned when a surrogate cannot be fitted on an objective's data.
    #[error("surrogate training failed for objective {objective}: {reason}")]
    SurrogateTraining {
        /// Index of the objective whose surrogate failed.
        objective: usize,
        /// Why training failed.
        reason: String,
    },

    /// Returned when the user objective function fails.
    #[error("objective evaluation failed: {0}")]
    Evaluation(String),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

impl Error {
    /// Returns `true` for errors caused by an invalid configuration,
    /// raised before the refinement loop starts.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingBounds
                | Self::InvalidBounds { .. }
                | Self::EmptyBounds
                | Self::DoeShapeMismatch { .. }
                | Self::DoeDimensionMismatch { .. }
                | Self::EmptyDesign
                | Self::InvalidWeight(_)
                | Self::InvalidPopulationSize(_)
        )
    }
}

pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_classification() {
        assert!(Error::MissingBounds.is_configuration());
        assert!(Error::InvalidWeight(1.5).is_configuration());
        assert!(
            Error::DoeDimensionMismatch {
                row: 0,
                expected: 2,
                got: 1
            }
            .is_configuration()
        );
        assert!(
            !Error::DimensionMismatch {
                expected: 2,
                got: 1
            }
            .is_configuration()
        );
        assert!(
            !Error::SurrogateTraining {
                objective: 0,
                reason: "singular".into()
            }
            .is_configuration()
        );
        assert!(!Error::Evaluation("boom".into()).is_configuration());
    }

    #[test]
    fn test_display_messages() {
        let err = Error::DoeShapeMismatch { n_x: 10, n_y: 9 };
        assert_eq!(
            err.to_string(),
            "initial design shape mismatch: 10 input rows but 9 output rows"
        );
    }
}
