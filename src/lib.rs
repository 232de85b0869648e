//! N-dimensional binary cellular automata over toroidal bit-packed grids.
//!
//! A [`BitPlane`] stores one bit per cell with the last dimension packed
//! into u64 row words. A [`Ruleset`] owns an ordered list of
//! [`Configuration`]s and advances the plane one generation per call, using
//! word-parallel neighbor counting so a whole row's totals come out of a
//! handful of integer additions.
//!
//! ```
//! use ndlife::{BitPlane, rules};
//!
//! let shape = [10, 10];
//! let mut plane = BitPlane::new(&shape)?;
//! plane.randomize();
//!
//! let life = rules::conway_life(&shape)?;
//! for _ in 0..10 {
//!     life.apply(&mut plane)?;
//! }
//! # Ok::<(), ndlife::Error>(())
//! ```

mod configuration;
mod error;
mod neighborhood;
mod pattern;
mod plane;
pub mod rules;
mod ruleset;

pub use configuration::{Configuration, FlatOffset, Neighborhood, NextState};
pub use error::{Error, Result};
pub use neighborhood::{Offsets, moore, von_neumann};
pub use pattern::{Pattern, presets};
pub use plane::{BitPlane, PlaneView};
pub use ruleset::{MAX_NEIGHBORHOOD, Method, Predicate, Ruleset};
