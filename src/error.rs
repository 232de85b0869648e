//! Error types shared across the engine.
//!
//! Every failure is a construction-time or call-boundary failure; nothing is
//! retried internally and no partially applied generation is ever observable.

use thiserror::Error;

/// Errors reported by plane, configuration and ruleset constructors and by
/// the per-generation `apply` boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// A requested plane shape is empty, has a zero dimension, or its last
    /// dimension does not fit the 64-bit row word.
    #[error("invalid shape {shape:?}: {reason}")]
    InvalidShape { shape: Vec<usize>, reason: String },

    /// A coordinate or offset has the wrong number of components for the
    /// grid it is used against.
    #[error("dimension mismatch: expected {expected} coordinates, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An argument is outside its documented domain (tolerance outside
    /// [0, 1], a cell value other than 0 or 1, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A neighborhood has more offsets than can be summed per bit column
    /// without a carry crossing into the adjacent column.
    #[error(
        "neighborhood of {offsets} offsets exceeds the overflow-safe bound \
         of {bound} for 64-bit row words"
    )]
    OverflowRisk { offsets: usize, bound: usize },

    /// A configuration is structurally unusable: duplicate offsets, or a
    /// configuration appended where it can never be reached.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A ruleset's configurations were compiled against a different plane
    /// shape than the one they are applied to.
    #[error("shape mismatch: configurations compiled for {expected:?}, plane is {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
