use std::fmt::{Display, Formatter};

use itertools::iproduct;

/// Integer coordinates of a grid cell: `i` indexes along x, `j` along y.
#[derive(Debug, Copy, Clone, Default)]
#[derive(PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CellIx {
    pub i: usize,
    pub j: usize,
}

impl CellIx {
    pub const fn new(i: usize, j: usize) -> Self {
        CellIx { i, j }
    }
}

impl Display for CellIx {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "({}, {})", self.i, self.j)
    }
}

/// 2D grid dimensions: `rows` cells along `i`, `cols` cells along `j`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct Dimensions {
    pub rows: usize,
    pub cols: usize,
}

impl Dimensions {
    pub const fn new(rows: usize, cols: usize) -> Self {
        Dimensions { rows, cols }
    }

    pub const fn square(n: usize) -> Self {
        Dimensions { rows: n, cols: n }
    }

    pub const fn contains(self, ix: CellIx) -> bool {
        ix.i < self.rows && ix.j < self.cols
    }

    /// Flat row-major offset of `ix`, or none if out of bounds.
    pub const fn flat_index(self, ix: CellIx) -> Option<usize> {
        if self.contains(ix) { Some(ix.i * self.cols + ix.j) } else { None }
    }

    pub const fn cell_at(self, index: usize) -> CellIx {
        CellIx::new(index / self.cols, index % self.cols)
    }

    /// Iterates cells within these dimensions in row-major order
    /// (`i` outer, `j` inner). Iterates exclusively.
    pub fn iter_within(self) -> impl Iterator<Item = CellIx> {
        iproduct!(0..self.rows, 0..self.cols).map(|(i, j)| CellIx::new(i, j))
    }
}
