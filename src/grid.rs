use crate::math::{CellIx, Dimensions};

/// A dense matrix of cells, stored flat in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    dims: Dimensions,
}

impl<T> Grid<T> {
    pub fn from_fn<F>(dims: Dimensions, map_fn: F) -> Self
    where
        F: FnMut(CellIx) -> T,
    {
        Grid { data: dims.iter_within().map(map_fn).collect(), dims }
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.data.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.data.iter_mut()
    }

    /// Row-major iteration, `i` outer and `j` inner.
    pub fn enumerate(&self) -> impl Iterator<Item = (CellIx, &T)> {
        let dims = self.dims;
        self.data.iter().enumerate().map(move |(n, val)| (dims.cell_at(n), val))
    }

    pub fn get(&self, ix: CellIx) -> Option<&T> {
        self.dims.flat_index(ix).map(|n| &self.data[n])
    }

    pub fn get_mut(&mut self, ix: CellIx) -> Option<&mut T> {
        self.dims.flat_index(ix).map(|n| &mut self.data[n])
    }
}
