//! Seed patterns for 2D planes.
//!
//! Coordinates are (row, column) relative to a placement origin; placement
//! wraps like every other plane access.

use crate::error::Result;
use crate::plane::BitPlane;

/// A pattern that can be stamped onto a plane.
#[derive(Clone)]
pub struct Pattern {
    pub name: &'static str,
    /// Relative (row, column) coordinates of live cells.
    pub cells: Vec<(i64, i64)>,
}

impl Pattern {
    pub fn new(name: &'static str, cells: Vec<(i64, i64)>) -> Self {
        Self { name, cells }
    }

    /// Stamp the pattern onto a 2D plane with its corner at `origin`.
    pub fn place_on(&self, plane: &mut BitPlane, origin: (i64, i64)) -> Result<()> {
        for &(dr, dc) in &self.cells {
            plane.set(&[origin.0 + dr, origin.1 + dc], 1)?;
        }
        Ok(())
    }
}

/// Classic Game of Life seed patterns.
pub mod presets {
    use super::Pattern;

    /// Period-2 oscillator, three cells in a row.
    pub fn blinker() -> Pattern {
        Pattern::new("Blinker", vec![(0, 0), (0, 1), (0, 2)])
    }

    /// The smallest spaceship; translates by (1, 1) every 4 generations.
    pub fn glider() -> Pattern {
        Pattern::new(
            "Glider",
            vec![(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
        )
    }

    /// 2x2 still life.
    pub fn block() -> Pattern {
        Pattern::new("Block", vec![(0, 0), (0, 1), (1, 0), (1, 1)])
    }

    /// Period-2 oscillator of two offset rows.
    pub fn toad() -> Pattern {
        Pattern::new(
            "Toad",
            vec![(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
        )
    }
}
