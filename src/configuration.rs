//! Declarative neighborhood rules.
//!
//! A [`Configuration`] pairs a set of relative offsets (each with the bit
//! value expected there) with the state a matching cell takes next. Offsets
//! are flattened once at construction into row/bit deltas so the per-cell
//! hot path never touches N-dimensional coordinates.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::neighborhood::Offsets;
use crate::plane::{BitPlane, wrap};
use crate::ruleset::MAX_NEIGHBORHOOD;

/// One precomputed neighbor offset: per-axis row-word delta over the leading
/// dimensions, bit-position delta within the row, and the expected bit.
#[derive(Clone, Debug)]
pub struct FlatOffset {
    pub row_delta: Box<[i64]>,
    pub bit_delta: u32,
    pub expected: u8,
}

/// Everything a verifier, predicate or computed next state gets to see about
/// one cell: its position, the word-parallel per-column totals for the
/// configuration under test, the prior-generation plane, and the
/// configuration's own offsets and expected values.
pub struct Neighborhood<'a> {
    /// Flat row index of the cell.
    pub row: usize,
    /// Bit position of the cell within its row.
    pub bit: u32,
    /// Live neighbors among the configuration's offsets.
    pub alive: u8,
    /// Offsets whose actual bit differs from the expected one.
    pub mismatches: u8,
    /// Prior-generation grid snapshot.
    pub plane: &'a BitPlane,
    /// The configuration's flattened offsets, expected values included.
    pub offsets: &'a [FlatOffset],
}

impl Neighborhood<'_> {
    /// Number of offsets in the configuration under test.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Fraction of mismatching neighbors; 0 for an empty configuration.
    pub fn mismatch_fraction(&self) -> f64 {
        if self.offsets.is_empty() {
            0.0
        } else {
            f64::from(self.mismatches) / self.offsets.len() as f64
        }
    }
}

/// Next state of a cell whose configuration passed: either a fixed bit or a
/// function of the cell's neighborhood context.
#[derive(Clone)]
pub enum NextState {
    Constant(u8),
    Computed(Arc<dyn Fn(&Neighborhood<'_>) -> u8 + Send + Sync>),
}

/// An expected neighborhood, compiled against a concrete plane shape.
#[derive(Clone)]
pub struct Configuration {
    shape: Box<[usize]>,
    offsets: Vec<FlatOffset>,
    next_state: NextState,
}

impl Configuration {
    /// Compile an offset list against a plane shape.
    ///
    /// Every offset must have the shape's dimensionality and a 0/1 expected
    /// value; offsets must be unique; the neighborhood must stay within the
    /// overflow-safe counting bound for 64-bit row words.
    pub fn new(shape: &[usize], next_state: NextState, offsets: Offsets) -> Result<Self> {
        let ndim = shape.len();
        let Some(&width) = shape.last() else {
            return Err(Error::InvalidShape {
                shape: shape.to_vec(),
                reason: "shape must have at least one dimension".to_string(),
            });
        };
        if offsets.len() > MAX_NEIGHBORHOOD {
            return Err(Error::OverflowRisk {
                offsets: offsets.len(),
                bound: MAX_NEIGHBORHOOD,
            });
        }

        let mut flat = Vec::with_capacity(offsets.len());
        for (i, (delta, expected)) in offsets.iter().enumerate() {
            if delta.len() != ndim {
                return Err(Error::DimensionMismatch {
                    expected: ndim,
                    actual: delta.len(),
                });
            }
            if *expected > 1 {
                return Err(Error::InvalidArgument(format!(
                    "expected neighbor value must be 0 or 1, got {expected}"
                )));
            }
            if offsets[..i].iter().any(|(other, _)| other == delta) {
                return Err(Error::InvalidConfiguration(format!(
                    "duplicate offset {delta:?}"
                )));
            }
            flat.push(FlatOffset {
                row_delta: delta[..ndim - 1].into(),
                bit_delta: wrap(delta[ndim - 1], width) as u32,
                expected: *expected,
            });
        }

        Ok(Self {
            shape: shape.into(),
            offsets: flat,
            next_state,
        })
    }

    /// Plane shape this configuration was compiled against.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flattened offsets in construction order.
    pub fn offsets(&self) -> &[FlatOffset] {
        &self.offsets
    }

    /// Check one cell against this configuration.
    ///
    /// The pass/fail decision is delegated to `verify`, supplied by the
    /// enclosing ruleset. On a pass the returned bit is the cell's next
    /// state; on a fail it is 0 and must be ignored by the caller.
    pub fn test<F>(&self, hood: &Neighborhood<'_>, verify: F) -> (bool, u8)
    where
        F: Fn(&Neighborhood<'_>) -> bool,
    {
        if !verify(hood) {
            return (false, 0);
        }
        let state = match &self.next_state {
            NextState::Constant(bit) => *bit,
            NextState::Computed(f) => f(hood),
        };
        (true, state)
    }
}

// Manual impl: `NextState` may hold an `Arc<dyn Fn>`, which has no `Debug`.
impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("shape", &self.shape)
            .field("offsets", &self.offsets)
            .finish_non_exhaustive()
    }
}
