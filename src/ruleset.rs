//! Ordered configurations plus a verification method, applied one
//! generation at a time.
//!
//! Neighbor totals are computed a whole row at once: every offset's neighbor
//! row word is bit-rotated so neighbor bit `i` lines up with column `i`,
//! spread into byte-wide counting lanes, and summed with integer addition.
//! Per-cell work is then a table lookup into the per-column totals instead
//! of a walk over the neighborhood.

use std::sync::Arc;

use rayon::prelude::*;

use crate::configuration::{Configuration, Neighborhood};
use crate::error::{Error, Result};
use crate::plane::BitPlane;

/// Counting lanes are one byte per column, eight columns per u64.
const LANE_BITS: usize = 8;
const LANE_WORDS: usize = 64 / LANE_BITS;

/// Largest number of single-bit addends a byte lane can absorb before a
/// carry would cross into the next column; doubles as the cap on a
/// configuration's neighborhood size so chunk partials can be added freely.
pub const MAX_NEIGHBORHOOD: usize = (1 << LANE_BITS) - 1;

/// Spread the 8 bits of a byte into the low bit of 8 consecutive byte lanes.
const SPREAD8: [u64; 256] = {
    let mut table = [0u64; 256];
    let mut byte = 0;
    while byte < 256 {
        let mut bit = 0;
        while bit < 8 {
            if (byte >> bit) & 1 == 1 {
                table[byte] |= 1 << (LANE_BITS * bit);
            }
            bit += 1;
        }
        byte += 1;
    }
    table
};

/// Add one aligned row word into byte-lane accumulators, one lane per column.
#[inline]
fn lane_add(acc: &mut [u64; LANE_WORDS], bits: u64) {
    for (k, lane) in acc.iter_mut().enumerate() {
        *lane += SPREAD8[(bits >> (LANE_BITS * k)) as u8 as usize];
    }
}

/// Per-column total for one bit position.
#[inline]
fn lane_get(acc: &[u64; LANE_WORDS], col: u32) -> u8 {
    (acc[col as usize / LANE_WORDS] >> (LANE_BITS as u32 * (col % LANE_WORDS as u32))) as u8
}

/// Rotate a row word within its `width` valid bits so that neighbor bit
/// `(i + delta) mod width` lands in column `i`.
#[inline]
fn rotate(word: u64, delta: u32, width: usize, mask: u64) -> u64 {
    if delta == 0 {
        return word & mask;
    }
    ((word >> delta) | (word << (width as u32 - delta))) & mask
}

/// Custom pass/fail capability for [`Method::CustomPredicate`].
pub type Predicate = Arc<dyn Fn(&Neighborhood<'_>) -> bool + Send + Sync>;

/// How a ruleset decides that a configuration matches a cell. Fixed at
/// construction for the lifetime of the ruleset.
#[derive(Clone)]
pub enum Method {
    /// Every neighbor's actual bit equals its expected bit.
    ExactMatch,
    /// The fraction of mismatching neighbors is at least the threshold
    /// (boundary inclusive); the threshold must lie in [0, 1].
    Tolerance(f64),
    /// A caller-supplied predicate over the cell's neighborhood context.
    CustomPredicate(Predicate),
    /// Every cell matches the first configuration unconditionally.
    AlwaysPass,
}

/// Ordered list of configurations with first-match-wins priority, plus the
/// verification method shared by all of them.
///
/// Built once, then reused across any number of generation updates; each
/// [`Ruleset::apply`] is a pure function from the current plane to the next.
#[derive(Clone)]
pub struct Ruleset {
    method: Method,
    configurations: Vec<Configuration>,
}

impl Ruleset {
    /// Create an empty ruleset for the given method.
    ///
    /// A `Tolerance` threshold outside [0, 1] is rejected here, before any
    /// row of any generation is processed.
    pub fn new(method: Method) -> Result<Self> {
        if let Method::Tolerance(threshold) = method {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(Error::InvalidArgument(format!(
                    "tolerance must lie in [0, 1], got {threshold}"
                )));
            }
        }
        Ok(Self {
            method,
            configurations: Vec::new(),
        })
    }

    /// Append a configuration; order encodes priority.
    ///
    /// Under `AlwaysPass` the first configuration matches every cell, so a
    /// second one would be unreachable dead weight and is rejected. All
    /// configurations must be compiled against the same shape.
    pub fn push(&mut self, config: Configuration) -> Result<()> {
        if matches!(self.method, Method::AlwaysPass) && !self.configurations.is_empty() {
            return Err(Error::InvalidConfiguration(
                "configurations after the first are unreachable under an always-pass method"
                    .to_string(),
            ));
        }
        if let Some(first) = self.configurations.first() {
            if first.shape() != config.shape() {
                return Err(Error::ShapeMismatch {
                    expected: first.shape().to_vec(),
                    actual: config.shape().to_vec(),
                });
            }
        }
        self.configurations.push(config);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.configurations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configurations.is_empty()
    }

    /// Advance the plane by one generation, serially.
    ///
    /// The output buffer starts as a copy of the current rows, so a cell no
    /// configuration matches keeps its value. The plane's storage is
    /// replaced in a single swap after every row has been computed; a
    /// failure before the swap leaves the prior generation intact.
    pub fn apply(&self, plane: &mut BitPlane) -> Result<()> {
        self.check_shape(plane)?;
        let snapshot: &BitPlane = plane;
        let next: Vec<u64> = (0..snapshot.rows().len())
            .map(|row| self.step_row(snapshot, row))
            .collect();
        plane.replace_rows(next);
        Ok(())
    }

    /// Advance the plane by one generation with rows processed in parallel.
    ///
    /// Rows read only the prior generation and write disjoint output rows,
    /// so the only synchronization is the final buffer swap.
    pub fn apply_parallel(&self, plane: &mut BitPlane) -> Result<()> {
        self.check_shape(plane)?;
        let snapshot: &BitPlane = plane;
        let next: Vec<u64> = (0..snapshot.rows().len())
            .into_par_iter()
            .map(|row| self.step_row(snapshot, row))
            .collect();
        plane.replace_rows(next);
        Ok(())
    }

    fn check_shape(&self, plane: &BitPlane) -> Result<()> {
        match self.configurations.first() {
            Some(first) if first.shape() != plane.shape() => Err(Error::ShapeMismatch {
                expected: first.shape().to_vec(),
                actual: plane.shape().to_vec(),
            }),
            _ => Ok(()),
        }
    }

    /// Compute one output row: try each configuration in priority order on
    /// the bit positions still unresolved, fall back to the current value.
    fn step_row(&self, plane: &BitPlane, row: usize) -> u64 {
        let mut out = plane.row_word(row);
        let mut unresolved = plane.mask();

        for config in &self.configurations {
            if unresolved == 0 {
                break;
            }
            let (alive, mismatches) = count_columns(plane, row, config);

            let mut remaining = unresolved;
            while remaining != 0 {
                let bit = remaining.trailing_zeros();
                remaining &= remaining - 1;

                let hood = Neighborhood {
                    row,
                    bit,
                    alive: lane_get(&alive, bit),
                    mismatches: lane_get(&mismatches, bit),
                    plane,
                    offsets: config.offsets(),
                };
                let (passed, state) = config.test(&hood, |h| self.verify(h));
                if passed {
                    if state == 1 {
                        out |= 1 << bit;
                    } else {
                        out &= !(1 << bit);
                    }
                    unresolved &= !(1 << bit);
                }
            }
        }
        out
    }

    /// The verification function this ruleset's method selects.
    fn verify(&self, hood: &Neighborhood<'_>) -> bool {
        match &self.method {
            Method::ExactMatch => hood.mismatches == 0,
            Method::Tolerance(threshold) => hood.mismatch_fraction() >= *threshold,
            Method::CustomPredicate(predicate) => predicate(hood),
            Method::AlwaysPass => true,
        }
    }
}

/// Word-parallel neighbor counting for one row under one configuration.
///
/// Returns per-column totals of live neighbors and of mismatching neighbors
/// for every bit position of the row at once. Offsets are summed in chunks
/// no larger than a byte lane can absorb, and chunk partials are added with
/// integer addition; the construction-time neighborhood bound guarantees no
/// carry ever crosses a column boundary.
fn count_columns(
    plane: &BitPlane,
    row: usize,
    config: &Configuration,
) -> ([u64; LANE_WORDS], [u64; LANE_WORDS]) {
    let width = plane.width();
    let mask = plane.mask();
    let mut alive = [0u64; LANE_WORDS];
    let mut mismatches = [0u64; LANE_WORDS];

    for chunk in config.offsets().chunks(MAX_NEIGHBORHOOD) {
        let mut alive_part = [0u64; LANE_WORDS];
        let mut mismatch_part = [0u64; LANE_WORDS];
        for offset in chunk {
            let neighbor = plane.row_word(plane.neighbor_row(row, &offset.row_delta));
            let aligned = rotate(neighbor, offset.bit_delta, width, mask);
            lane_add(&mut alive_part, aligned);
            let wrong = if offset.expected == 1 {
                !aligned & mask
            } else {
                aligned
            };
            lane_add(&mut mismatch_part, wrong);
        }
        for k in 0..LANE_WORDS {
            alive[k] += alive_part[k];
            mismatches[k] += mismatch_part[k];
        }
    }
    (alive, mismatches)
}
