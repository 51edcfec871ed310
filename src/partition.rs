//! Bucketing points into a uniform square grid.
//!
//! A grid of `n` x `n` cells covers the square `[0, E) x [0, E)`. A point
//! lands in cell `(floor(x * n / E), floor(y * n / E))`; points outside the
//! square (including those exactly on its far edges) and points arriving at an
//! already full cell are dropped. Drops are not errors, but they are counted
//! in [`PartitionStats`] and logged.

use std::num::NonZero;

use derive_more::{Deref, DerefMut};
use log::{debug, info, warn};

use crate::{
    cell::GridCell,
    grid::Grid,
    math::{CellIx, Dimensions, Point},
    source::Coordinates,
};

/// The grid of cells for one run, together with the square it covers.
#[derive(Clone, Debug, Deref, DerefMut)]
pub struct CellGrid {
    #[deref]
    #[deref_mut]
    cells: Grid<GridCell>,
    grid_size: NonZero<usize>,
    edge_length: f64,
}

/// What happened to the input points during partitioning.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartitionStats {
    pub assigned: usize,
    pub out_of_range: usize,
    pub over_capacity: usize,
}

impl PartitionStats {
    pub const fn dropped(&self) -> usize {
        self.out_of_range + self.over_capacity
    }
}

impl CellGrid {
    /// Creates an empty grid. Each cell's geometric center is fixed here.
    pub fn new(grid_size: NonZero<usize>, edge_length: f64, cell_capacity: usize) -> Self {
        let cell_size = edge_length / grid_size.get() as f64;
        let cells = Grid::from_fn(Dimensions::square(grid_size.get()), |ix| {
            let center = Point::new(
                ix.i as f64 * cell_size + cell_size / 2.0,
                ix.j as f64 * cell_size + cell_size / 2.0,
            );
            GridCell::new(ix, center, cell_capacity)
        });

        CellGrid { cells, grid_size, edge_length }
    }

    pub const fn grid_size(&self) -> NonZero<usize> {
        self.grid_size
    }

    pub const fn edge_length(&self) -> f64 {
        self.edge_length
    }

    pub fn cell_size(&self) -> f64 {
        self.edge_length / self.grid_size.get() as f64
    }

    /// The cell containing `point`, or none if it lies outside `[0, E)^2`.
    pub fn locate(&self, point: Point) -> Option<CellIx> {
        let n = self.grid_size.get() as f64;
        let to_index = |v: f64| {
            let scaled = (v * n / self.edge_length).floor();
            // Also rejects NaN
            (scaled >= 0.0 && scaled < n).then_some(scaled as usize)
        };
        Some(CellIx::new(to_index(point.x)?, to_index(point.y)?))
    }

    /// Assigns every coordinate to at most one cell, in input order.
    ///
    /// The coordinates themselves are left untouched.
    pub fn assign_all(&mut self, coordinates: &Coordinates) -> PartitionStats {
        let mut stats = PartitionStats::default();

        for (point_ix, point) in coordinates.iter_indexed() {
            let Some(cell) = self.locate(point).and_then(|ix| self.cells.get_mut(ix)) else {
                debug!(target: "partition", "Dropping {point_ix} {point}: outside the grid");
                stats.out_of_range += 1;
                continue;
            };
            match cell.try_assign(point_ix) {
                Ok(()) => stats.assigned += 1,
                Err(full) => {
                    debug!(target: "partition", "Dropping {point_ix} {point}: {full}");
                    stats.over_capacity += 1;
                }
            }
        }

        if stats.dropped() > 0 {
            warn!(
                target: "partition",
                "Dropped {} of {} points ({} outside the grid, {} over cell capacity)",
                stats.dropped(),
                coordinates.len(),
                stats.out_of_range,
                stats.over_capacity
            );
        }
        info!(
            target: "partition",
            "Assigned {} points to a {n}x{n} grid", stats.assigned, n = self.grid_size
        );

        stats
    }
}

/// Builds a grid and assigns `coordinates` to it.
pub fn partition(
    coordinates: &Coordinates,
    grid_size: NonZero<usize>,
    edge_length: f64,
    cell_capacity: usize,
) -> (CellGrid, PartitionStats) {
    let mut grid = CellGrid::new(grid_size, edge_length, cell_capacity);
    let stats = grid.assign_all(coordinates);
    (grid, stats)
}
