use std::cmp::Ordering;

use log::info;

use crate::{
    cell::GridCell,
    math::{CellIx, Point},
    partition::CellGrid,
};

/// The cell whose members are, in sum, closest to their own centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Selection {
    pub cell: CellIx,
    /// Geometric center of the selected cell.
    pub center: Point,
    pub aggregate: f64,
}

/// Sets every cell's aggregate to the sum of its member distances.
///
/// An empty cell sums to zero.
pub fn compute_aggregates(grid: &mut CellGrid) {
    for cell in grid.iter_mut() {
        let aggregate = cell.distances().iter().fold(0.0, |sum, r| sum + r.distance);
        cell.set_aggregate(aggregate);
    }
}

/// Scans cells in row-major order and returns the one with the smallest
/// aggregate.
///
/// Only cells with members compete, unless no cell has any. Only a strictly
/// smaller aggregate replaces the current best, so ties go to the cell seen
/// first (lowest `i`, then lowest `j`). A NaN aggregate loses to any number.
/// Returns none only for a grid without cells.
pub fn select_min(grid: &CellGrid) -> Option<Selection> {
    let best = first_strict_min(grid.iter().filter(|cell| !cell.is_empty()))
        .or_else(|| first_strict_min(grid.iter()))?;

    let selection =
        Selection { cell: best.ix(), center: best.center(), aggregate: best.aggregate() };
    info!(
        target: "aggregate",
        "Minimal aggregate distance {} in cell {} centered at {}",
        selection.aggregate,
        selection.cell,
        selection.center
    );
    Some(selection)
}

fn first_strict_min<'a>(cells: impl Iterator<Item = &'a GridCell>) -> Option<&'a GridCell> {
    cells.fold(None, |best, cell| match best {
        Some(best) if !displaces(cell.aggregate(), best.aggregate()) => Some(best),
        _ => Some(cell),
    })
}

fn displaces(candidate: f64, best: f64) -> bool {
    match candidate.partial_cmp(&best) {
        Some(ordering) => ordering == Ordering::Less,
        None => best.is_nan() && !candidate.is_nan(),
    }
}
