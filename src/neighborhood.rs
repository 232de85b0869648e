//! Standard neighborhood offset factories.
//!
//! Both factories return relative coordinate deltas paired with an expected
//! bit value, ready to hand to [`crate::Configuration::new`]. Neither
//! includes the zero offset; callers add it explicitly when a rule needs to
//! constrain the cell's own state.

use itertools::Itertools;

/// Offset list consumed by configuration construction: one relative
/// coordinate delta per neighbor, with the bit value expected there.
pub type Offsets = Vec<(Vec<i64>, u8)>;

/// Moore neighborhood: every adjacent cell, center excluded.
///
/// All `3^N - 1` non-zero deltas in `{-1, 0, 1}^N`, each mapped to `value`.
pub fn moore(ndim: usize, value: u8) -> Offsets {
    (0..ndim)
        .map(|_| -1i64..=1)
        .multi_cartesian_product()
        .filter(|delta| delta.iter().any(|&d| d != 0))
        .map(|delta| (delta, value))
        .collect()
}

/// Von Neumann neighborhood: the `2N` face-adjacent cells.
///
/// Each axis independently set to -1 or +1 with all others 0, each mapped to
/// `value`.
pub fn von_neumann(ndim: usize, value: u8) -> Offsets {
    let mut offsets = Vec::with_capacity(2 * ndim);
    for axis in 0..ndim {
        for step in [-1i64, 1] {
            let mut delta = vec![0i64; ndim];
            delta[axis] = step;
            offsets.push((delta, value));
        }
    }
    offsets
}
