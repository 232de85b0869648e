//! Named outer-totalistic rule builders.
//!
//! An outer-totalistic rule (B.../S...) cares only about how many Moore
//! neighbors are live, split by the cell's own state. Under an exact-match
//! ruleset that means one configuration per qualifying combination of live
//! neighbors, with the zero offset pinning the cell's own state, and a final
//! empty catch-all configuration that kills whatever nothing else matched.

use crate::configuration::{Configuration, NextState};
use crate::error::{Error, Result};
use crate::neighborhood::{Offsets, moore};
use crate::ruleset::{Method, Ruleset};

/// Exhaustive enumeration stops being sensible well before the counting
/// bound does; 16 offsets already mean 65536 candidate combinations.
const MAX_ENUMERATED: usize = 16;

/// Build an exact-match ruleset for an outer-totalistic rule.
///
/// `births` lists the live-neighbor counts that turn a dead cell on,
/// `survivals` the counts that keep a live cell on; every other cell dies.
/// The enumeration is combinatorial in the Moore neighborhood size, so this
/// is practical for 1D and 2D shapes only.
pub fn outer_totalistic(shape: &[usize], births: &[u8], survivals: &[u8]) -> Result<Ruleset> {
    let ndim = shape.len();
    let neighbors = moore(ndim, 1);
    let count = neighbors.len();
    if count > MAX_ENUMERATED {
        return Err(Error::InvalidArgument(format!(
            "cannot enumerate {count} Moore offsets exhaustively; build \
             configurations directly or use a custom predicate"
        )));
    }

    let mut ruleset = Ruleset::new(Method::ExactMatch)?;
    let center = vec![0i64; ndim];

    for (center_state, counts) in [(0u8, births), (1u8, survivals)] {
        for combination in 0u64..(1 << count) {
            if !counts.contains(&(combination.count_ones() as u8)) {
                continue;
            }
            let mut offsets: Offsets = neighbors
                .iter()
                .enumerate()
                .map(|(i, (delta, _))| (delta.clone(), ((combination >> i) & 1) as u8))
                .collect();
            offsets.push((center.clone(), center_state));
            ruleset.push(Configuration::new(shape, NextState::Constant(1), offsets)?)?;
        }
    }

    // Everything no combination matched dies
    ruleset.push(Configuration::new(shape, NextState::Constant(0), vec![])?)?;
    Ok(ruleset)
}

/// Conway's Game of Life, B3/S23.
pub fn conway_life(shape: &[usize]) -> Result<Ruleset> {
    outer_totalistic(shape, &[3], &[2, 3])
}

/// HighLife, B36/S23; famous for its replicator.
pub fn highlife(shape: &[usize]) -> Result<Ruleset> {
    outer_totalistic(shape, &[3, 6], &[2, 3])
}

/// Seeds, B2/S; every live cell dies every generation.
pub fn seeds(shape: &[usize]) -> Result<Ruleset> {
    outer_totalistic(shape, &[2], &[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::presets;
    use crate::plane::BitPlane;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_configuration_counts() {
        // B3: C(8,3) = 56; S23: C(8,2) + C(8,3) = 84; plus the catch-all
        let shape = [8, 8];
        assert_eq!(conway_life(&shape).unwrap().len(), 56 + 84 + 1);
        assert_eq!(seeds(&shape).unwrap().len(), 28 + 1);
    }

    #[test]
    fn test_enumeration_bound() {
        assert!(matches!(
            conway_life(&[8, 8, 8]),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_blinker_oscillates_with_period_two() {
        let shape = [5, 5];
        let ruleset = conway_life(&shape).unwrap();
        let mut plane = BitPlane::new(&shape).unwrap();
        presets::blinker().place_on(&mut plane, (2, 1)).unwrap();
        let original = plane.rows().to_vec();

        ruleset.apply(&mut plane).unwrap();
        assert_ne!(plane.rows(), &original[..], "differs after one generation");
        // Vertical now
        for row in 1..4 {
            assert_eq!(plane.get(&[row, 2]).unwrap(), 1);
        }
        assert_eq!(plane.count_ones(), 3);

        ruleset.apply(&mut plane).unwrap();
        assert_eq!(plane.rows(), &original[..], "back after two generations");
    }

    #[test]
    fn test_block_is_a_still_life() {
        let shape = [6, 6];
        let ruleset = conway_life(&shape).unwrap();
        let mut plane = BitPlane::new(&shape).unwrap();
        presets::block().place_on(&mut plane, (2, 2)).unwrap();
        let before = plane.rows().to_vec();

        ruleset.apply(&mut plane).unwrap();
        assert_eq!(plane.rows(), &before[..]);
    }

    #[test]
    fn test_toad_oscillates_with_period_two() {
        let shape = [8, 8];
        let ruleset = conway_life(&shape).unwrap();
        let mut plane = BitPlane::new(&shape).unwrap();
        presets::toad().place_on(&mut plane, (3, 2)).unwrap();
        let original = plane.rows().to_vec();

        ruleset.apply(&mut plane).unwrap();
        assert_ne!(plane.rows(), &original[..]);
        ruleset.apply(&mut plane).unwrap();
        assert_eq!(plane.rows(), &original[..]);
    }

    #[test]
    fn test_glider_translates_along_its_diagonal() {
        let shape = [10, 10];
        let ruleset = conway_life(&shape).unwrap();

        let mut plane = BitPlane::new(&shape).unwrap();
        presets::glider().place_on(&mut plane, (1, 1)).unwrap();

        for _ in 0..4 {
            ruleset.apply(&mut plane).unwrap();
        }

        let mut expected = BitPlane::new(&shape).unwrap();
        presets::glider().place_on(&mut expected, (2, 2)).unwrap();
        assert_eq!(plane.rows(), expected.rows());
    }

    #[test]
    fn test_glider_crosses_the_torus_seam() {
        let shape = [8, 8];
        let ruleset = conway_life(&shape).unwrap();

        let mut plane = BitPlane::new(&shape).unwrap();
        presets::glider().place_on(&mut plane, (6, 6)).unwrap();

        // 4 generations per diagonal step; 8 steps walk the full torus
        for _ in 0..32 {
            ruleset.apply(&mut plane).unwrap();
        }

        let mut expected = BitPlane::new(&shape).unwrap();
        presets::glider().place_on(&mut expected, (6, 6)).unwrap();
        assert_eq!(plane.rows(), expected.rows());
    }

    #[test]
    fn test_seeds_has_no_survivors() {
        let shape = [8, 8];
        let ruleset = seeds(&shape).unwrap();
        let mut plane = BitPlane::new(&shape).unwrap();
        plane.set(&[3, 3], 1).unwrap();
        plane.set(&[3, 4], 1).unwrap();

        ruleset.apply(&mut plane).unwrap();

        // The pair dies; the four cells flanking it had exactly two live
        // neighbors and are born
        assert_eq!(plane.get(&[3, 3]).unwrap(), 0);
        assert_eq!(plane.get(&[3, 4]).unwrap(), 0);
        for coords in [[2, 3], [2, 4], [4, 3], [4, 4]] {
            assert_eq!(plane.get(&[coords[0], coords[1]]).unwrap(), 1);
        }
    }

    #[test]
    fn test_word_parallel_life_matches_naive_counting() {
        let shape = [12, 16];
        let ruleset = conway_life(&shape).unwrap();

        let mut plane = BitPlane::new(&shape).unwrap();
        plane.randomize();
        let before = plane.clone();
        ruleset.apply(&mut plane).unwrap();

        for r in 0..12i64 {
            for c in 0..16i64 {
                let mut live = 0;
                for dr in -1..=1i64 {
                    for dc in -1..=1i64 {
                        if (dr, dc) != (0, 0) {
                            live += before.get(&[r + dr, c + dc]).unwrap();
                        }
                    }
                }
                let expected = match (before.get(&[r, c]).unwrap(), live) {
                    (1, 2 | 3) => 1,
                    (0, 3) => 1,
                    _ => 0,
                };
                assert_eq!(
                    plane.get(&[r, c]).unwrap(),
                    expected,
                    "rule mismatch at ({r}, {c}) with {live} live neighbors"
                );
            }
        }
    }

    #[test]
    fn test_full_width_row_matches_naive_counting() {
        // 64-wide rows exercise the all-ones row mask and rotation at the
        // word boundary
        let shape = [8, 64];
        let ruleset = conway_life(&shape).unwrap();

        let mut plane = BitPlane::new(&shape).unwrap();
        plane.randomize();
        let before = plane.clone();
        ruleset.apply(&mut plane).unwrap();

        for r in 0..8i64 {
            for c in 0..64i64 {
                let mut live = 0;
                for dr in -1..=1i64 {
                    for dc in -1..=1i64 {
                        if (dr, dc) != (0, 0) {
                            live += before.get(&[r + dr, c + dc]).unwrap();
                        }
                    }
                }
                let expected = match (before.get(&[r, c]).unwrap(), live) {
                    (1, 2 | 3) => 1,
                    (0, 3) => 1,
                    _ => 0,
                };
                assert_eq!(
                    plane.get(&[r, c]).unwrap(),
                    expected,
                    "rule mismatch at ({r}, {c}) with {live} live neighbors"
                );
            }
        }
    }

    #[test]
    fn test_one_dimensional_totalistic_rule() {
        // B1/S on a ring: a lone live cell's two neighbors light up while
        // the cell itself dies, so a single seed expands as two fronts.
        let shape = [16];
        let ruleset = outer_totalistic(&shape, &[1], &[]).unwrap();
        let mut line = BitPlane::new(&shape).unwrap();
        line.set(&[8], 1).unwrap();

        ruleset.apply(&mut line).unwrap();
        assert_eq!(line.get(&[7]).unwrap(), 1);
        assert_eq!(line.get(&[9]).unwrap(), 1);
        assert_eq!(line.get(&[8]).unwrap(), 0);
        assert_eq!(line.count_ones(), 2);
    }
}
