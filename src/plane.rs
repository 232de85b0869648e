//! Bit-packed storage for an N-dimensional toroidal grid.
//!
//! The last dimension of the shape is packed into the bits of a single u64
//! row word; all leading dimensions index a flat array of row words through
//! mixed-radix strides. Every coordinate is reduced modulo its axis size
//! before use, so no coordinate is ever out of bounds.

use crate::error::{Error, Result};

/// Reduce a coordinate onto a toroidal axis of the given size.
#[inline]
pub(crate) fn wrap(coord: i64, size: usize) -> usize {
    coord.rem_euclid(size as i64) as usize
}

/// Bit-packed N-dimensional toroidal grid.
///
/// Created once with a fixed shape; mutated wholesale once per generation by
/// the ruleset's buffer swap, or bit-by-bit through [`BitPlane::set`].
#[derive(Clone)]
pub struct BitPlane {
    /// One entry per dimension, the last being the row width.
    shape: Box<[usize]>,
    /// Row strides for the leading dimensions (descending, last is 1).
    strides: Box<[usize]>,
    /// Cells along the last dimension, 1..=64.
    width: usize,
    /// Low `width` bits set.
    mask: u64,
    /// Flat array of row words, mixed-radix order over the leading dims.
    rows: Vec<u64>,
}

impl BitPlane {
    /// Create a zero-filled plane of the given shape.
    pub fn new(shape: &[usize]) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidShape {
            shape: shape.to_vec(),
            reason: reason.to_string(),
        };

        let Some(&width) = shape.last() else {
            return Err(invalid("shape must have at least one dimension"));
        };
        if shape.contains(&0) {
            return Err(invalid("every dimension must be positive"));
        }
        if width > 64 {
            return Err(invalid("last dimension must fit a 64-bit row word"));
        }

        let leading = &shape[..shape.len() - 1];
        let mut strides = vec![1usize; leading.len()];
        for i in (0..leading.len().saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * leading[i + 1];
        }
        let row_count = leading.iter().product::<usize>();

        Ok(Self {
            shape: shape.into(),
            strides: strides.into(),
            width,
            mask: if width == 64 { u64::MAX } else { (1 << width) - 1 },
            rows: vec![0; row_count],
        })
    }

    /// Full shape, one entry per dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Cells along the last (packed) dimension.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bit mask covering one row's valid bits.
    #[inline]
    pub(crate) fn mask(&self) -> u64 {
        self.mask
    }

    /// All row words in flat order.
    pub fn rows(&self) -> &[u64] {
        &self.rows
    }

    /// Single row word by flat index.
    #[inline]
    pub(crate) fn row_word(&self, row: usize) -> u64 {
        self.rows[row]
    }

    /// Replace the entire backing storage in one swap (generation barrier).
    pub(crate) fn replace_rows(&mut self, rows: Vec<u64>) {
        debug_assert_eq!(rows.len(), self.rows.len());
        self.rows = rows;
    }

    /// Flatten full coordinates into a (row index, bit offset) pair.
    ///
    /// Mixed-radix positional weighting over the leading dimensions, with
    /// modulo wraparound applied per axis before weighting. Adding a full
    /// shape to any coordinate therefore flattens to the same pair.
    pub fn flatten(&self, coords: &[i64]) -> Result<(usize, u32)> {
        if coords.len() != self.ndim() {
            return Err(Error::DimensionMismatch {
                expected: self.ndim(),
                actual: coords.len(),
            });
        }
        let mut row = 0;
        for (i, &stride) in self.strides.iter().enumerate() {
            row += wrap(coords[i], self.shape[i]) * stride;
        }
        let bit = wrap(coords[self.ndim() - 1], self.width) as u32;
        Ok((row, bit))
    }

    /// Read the bit at fully specified coordinates, wrapping each axis.
    pub fn get(&self, coords: &[i64]) -> Result<u8> {
        let (row, bit) = self.flatten(coords)?;
        Ok(((self.rows[row] >> bit) & 1) as u8)
    }

    /// Write a bit at fully specified coordinates, wrapping each axis.
    pub fn set(&mut self, coords: &[i64], value: u8) -> Result<()> {
        if value > 1 {
            return Err(Error::InvalidArgument(format!(
                "cell value must be 0 or 1, got {value}"
            )));
        }
        let (row, bit) = self.flatten(coords)?;
        if value == 1 {
            self.rows[row] |= 1 << bit;
        } else {
            self.rows[row] &= !(1 << bit);
        }
        Ok(())
    }

    /// Borrow a sub-region fixed by a prefix of the coordinates.
    ///
    /// The view shares the backing storage (no copy) and wraps each prefix
    /// coordinate like any other access. An empty prefix views the whole
    /// plane; fixing all leading dimensions views a single packed row.
    pub fn view(&self, prefix: &[i64]) -> Result<PlaneView<'_>> {
        view_of(&self.shape, &self.strides, &self.rows, self.width, prefix)
    }

    /// Overwrite every bit independently and uniformly at random.
    pub fn randomize(&mut self) {
        use rand::Rng;
        let mut rng = rand::rng();

        for row in &mut self.rows {
            *row = rng.random::<u64>() & self.mask;
        }
    }

    /// Reset every cell to 0.
    pub fn clear(&mut self) {
        self.rows.iter_mut().for_each(|row| *row = 0);
    }

    /// Count live cells over the whole plane.
    pub fn count_ones(&self) -> usize {
        self.rows.iter().map(|row| row.count_ones() as usize).sum()
    }

    /// Total backing storage in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.rows.len() * std::mem::size_of::<u64>()
    }

    /// Flat row index of the row at `row` displaced by a per-axis delta over
    /// the leading dimensions, wrapping each axis independently.
    #[inline]
    pub(crate) fn neighbor_row(&self, row: usize, delta: &[i64]) -> usize {
        let mut rem = row;
        let mut out = 0;
        for (i, &stride) in self.strides.iter().enumerate() {
            let idx = rem / stride;
            rem %= stride;
            out += wrap(idx as i64 + delta[i], self.shape[i]) * stride;
        }
        out
    }
}

/// Read-only window into a [`BitPlane`] scoped by a coordinate prefix.
///
/// Shares the plane's backing storage; the remaining axes keep the same
/// toroidal wrap semantics as the plane itself.
pub struct PlaneView<'a> {
    shape: &'a [usize],
    strides: &'a [usize],
    width: usize,
    rows: &'a [u64],
}

impl<'a> PlaneView<'a> {
    /// Shape of the remaining (unfixed) dimensions.
    pub fn shape(&self) -> &[usize] {
        self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Read the bit at coordinates over the remaining dimensions.
    pub fn get(&self, coords: &[i64]) -> Result<u8> {
        if coords.len() != self.ndim() {
            return Err(Error::DimensionMismatch {
                expected: self.ndim(),
                actual: coords.len(),
            });
        }
        let mut row = 0;
        for (i, &stride) in self.strides.iter().enumerate() {
            row += wrap(coords[i], self.shape[i]) * stride;
        }
        let bit = wrap(coords[self.ndim() - 1], self.width);
        Ok(((self.rows[row] >> bit) & 1) as u8)
    }

    /// Narrow the view further by fixing more leading coordinates.
    pub fn view(&self, prefix: &[i64]) -> Result<PlaneView<'a>> {
        view_of(self.shape, self.strides, self.rows, self.width, prefix)
    }
}

fn view_of<'a>(
    shape: &'a [usize],
    strides: &'a [usize],
    rows: &'a [u64],
    width: usize,
    prefix: &[i64],
) -> Result<PlaneView<'a>> {
    let ndim = shape.len();
    if prefix.len() >= ndim {
        return Err(Error::DimensionMismatch {
            expected: ndim - 1,
            actual: prefix.len(),
        });
    }
    let fixed = prefix.len();
    let mut base = 0;
    for (i, &coord) in prefix.iter().enumerate() {
        base += wrap(coord, shape[i]) * strides[i];
    }
    let block = if fixed == 0 {
        rows.len()
    } else {
        strides[fixed - 1]
    };
    Ok(PlaneView {
        shape: &shape[fixed..],
        strides: &strides[fixed..],
        width,
        rows: &rows[base..base + block],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_plane_is_zero_filled() {
        for shape in [&[7][..], &[5, 9][..], &[3, 4, 6][..]] {
            let plane = BitPlane::new(shape).unwrap();
            assert_eq!(plane.count_ones(), 0);
            assert_eq!(plane.shape(), shape);
        }
        // Every cell of a 3D plane reads back 0
        let plane = BitPlane::new(&[2, 3, 5]).unwrap();
        for a in 0..2 {
            for b in 0..3 {
                for c in 0..5 {
                    assert_eq!(plane.get(&[a, b, c]).unwrap(), 0);
                }
            }
        }
    }

    #[test]
    fn test_invalid_shapes_rejected() {
        assert!(matches!(
            BitPlane::new(&[]),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(
            BitPlane::new(&[4, 0, 8]),
            Err(Error::InvalidShape { .. })
        ));
        assert!(matches!(
            BitPlane::new(&[4, 65]),
            Err(Error::InvalidShape { .. })
        ));
        // Exactly 64 wide is fine
        assert!(BitPlane::new(&[2, 64]).is_ok());
    }

    #[test]
    fn test_get_set_roundtrip() {
        let mut plane = BitPlane::new(&[10, 10]).unwrap();
        plane.set(&[0, 0], 1).unwrap();
        plane.set(&[5, 5], 1).unwrap();
        plane.set(&[9, 9], 1).unwrap();

        assert_eq!(plane.get(&[0, 0]).unwrap(), 1);
        assert_eq!(plane.get(&[5, 5]).unwrap(), 1);
        assert_eq!(plane.get(&[9, 9]).unwrap(), 1);
        assert_eq!(plane.get(&[1, 1]).unwrap(), 0);

        plane.set(&[5, 5], 0).unwrap();
        assert_eq!(plane.get(&[5, 5]).unwrap(), 0);
        assert_eq!(plane.count_ones(), 2);
    }

    #[test]
    fn test_toroidal_wraparound() {
        let mut plane = BitPlane::new(&[4, 6]).unwrap();
        plane.set(&[-1, -1], 1).unwrap();
        assert_eq!(plane.get(&[3, 5]).unwrap(), 1);
        // Any whole number of turns lands on the same cell
        assert_eq!(plane.get(&[7, 11]).unwrap(), 1);
        assert_eq!(plane.get(&[-5, -7]).unwrap(), 1);

        let mut cube = BitPlane::new(&[3, 3, 3]).unwrap();
        cube.set(&[-1, 4, -2], 1).unwrap();
        assert_eq!(cube.get(&[2, 1, 1]).unwrap(), 1);
    }

    #[test]
    fn test_flatten_is_shape_periodic() {
        let plane = BitPlane::new(&[3, 4, 6]).unwrap();
        let coords: [[i64; 3]; 4] = [[0, 0, 0], [2, 3, 5], [-1, -2, -3], [17, 22, 41]];
        for c in coords {
            let shifted = [c[0] + 3, c[1] + 4, c[2] + 6];
            assert_eq!(
                plane.flatten(&c).unwrap(),
                plane.flatten(&shifted).unwrap()
            );
        }
    }

    #[test]
    fn test_flatten_arity_checked() {
        let plane = BitPlane::new(&[3, 4]).unwrap();
        assert!(matches!(
            plane.flatten(&[1, 2, 3]),
            Err(Error::DimensionMismatch { expected: 2, actual: 3 })
        ));
        assert!(matches!(
            plane.get(&[1]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_set_rejects_non_bit_values() {
        let mut plane = BitPlane::new(&[4, 4]).unwrap();
        assert!(matches!(
            plane.set(&[0, 0], 2),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_randomize_stays_in_domain() {
        let mut plane = BitPlane::new(&[8, 13]).unwrap();
        plane.randomize();
        assert_eq!(plane.shape(), &[8, 13]);
        for a in 0..8 {
            for b in 0..13 {
                assert!(plane.get(&[a, b]).unwrap() <= 1);
            }
        }
        // No stray bits above the row width
        for &row in plane.rows() {
            assert_eq!(row & !plane.mask(), 0);
        }
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut plane = BitPlane::new(&[6, 6]).unwrap();
        plane.randomize();
        plane.clear();
        assert_eq!(plane.count_ones(), 0);
    }

    #[test]
    fn test_view_shares_storage() {
        let mut plane = BitPlane::new(&[2, 3, 5]).unwrap();
        plane.set(&[1, 2, 4], 1).unwrap();

        let layer = plane.view(&[1]).unwrap();
        assert_eq!(layer.shape(), &[3, 5]);
        assert_eq!(layer.get(&[2, 4]).unwrap(), 1);
        assert_eq!(layer.get(&[0, 0]).unwrap(), 0);

        // Prefix coordinates wrap like everything else
        let wrapped = plane.view(&[-1]).unwrap();
        assert_eq!(wrapped.get(&[2, 4]).unwrap(), 1);

        // Nested narrowing down to a single packed row
        let row = layer.view(&[2]).unwrap();
        assert_eq!(row.shape(), &[5]);
        assert_eq!(row.get(&[4]).unwrap(), 1);
        assert_eq!(row.get(&[-1]).unwrap(), 1);
    }

    #[test]
    fn test_view_arity_checked() {
        let plane = BitPlane::new(&[4, 4]).unwrap();
        assert!(matches!(
            plane.view(&[0, 0]),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_one_dimensional_plane() {
        let mut line = BitPlane::new(&[9]).unwrap();
        line.set(&[-2], 1).unwrap();
        assert_eq!(line.get(&[7]).unwrap(), 1);
        assert_eq!(line.rows().len(), 1);
        assert_eq!(line.flatten(&[12]).unwrap(), (0, 3));
    }

    #[test]
    fn test_memory_is_one_bit_per_cell() {
        let plane = BitPlane::new(&[1000, 64]).unwrap();
        assert_eq!(plane.memory_bytes(), 1000 * 8);
    }
}
