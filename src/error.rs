//! Error types for lookup construction and selector resolution.

use snafu::prelude::*;

use crate::scalar::Scalar;

/// Error type for selector resolution.
#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ResolveError {
    #[snafu(display("value {value} is out of bounds for a lookup of length {len}"))]
    OutOfBounds { value: Scalar, len: usize },

    #[snafu(display("value {value} not found in lookup"))]
    NotFound { value: Scalar },

    #[snafu(display("{selector} selector is not supported for {lookup} lookups"))]
    UnsupportedCombination {
        selector: &'static str,
        lookup: String,
    },

    #[snafu(display("malformed selector: {reason}"))]
    MalformedSelector { reason: String },
}

impl ResolveError {
    /// True for the error kinds that soft resolution turns into an absent
    /// result instead of raising. Metadata incompatibilities always raise.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ResolveError::NotFound { .. } | ResolveError::OutOfBounds { .. }
        )
    }
}

pub type ResolveResult<T> = Result<T, ResolveError>;

/// Error type for lookup construction.
#[derive(Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum LookupError {
    #[snafu(display("values are not monotonic in the stated order at index {index}"))]
    NotMonotonic { index: usize },

    #[snafu(display("regular step {step} does not match the stated order"))]
    StepOrderMismatch { step: Scalar },

    #[snafu(display("values are not spaced by the regular step {step} at index {index}"))]
    StepSpacingMismatch { step: Scalar, index: usize },

    #[snafu(display("explicit bounds rows have length {bounds}, expected {values}"))]
    BoundsLengthMismatch { values: usize, bounds: usize },

    #[snafu(display("{span} span is not valid for {sampling} sampling"))]
    IncompatibleSpan {
        sampling: &'static str,
        span: &'static str,
    },
}
