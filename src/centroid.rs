use log::debug;

use crate::{math::Point, partition::CellGrid, source::Coordinates};

/// Arithmetic mean of `points`.
///
/// The mean of no points is a 0/0 division and comes out as NaN on both axes.
pub fn mean<I>(points: I) -> Point
where
    I: IntoIterator<Item = Point>,
{
    let (sum, count) =
        points.into_iter().fold((Point::default(), 0usize), |(sum, n), p| (sum + p, n + 1));
    sum / count as f64
}

/// Sets every cell's centroid to the mean of its members.
///
/// Empty cells get a NaN centroid; nothing downstream reads it, since an
/// empty cell has no distances to compute.
pub fn compute_centroids(grid: &mut CellGrid, coordinates: &Coordinates) {
    for cell in grid.iter_mut() {
        let centroid = mean(cell.members().iter().map(|&ix| coordinates[ix]));
        if cell.is_empty() {
            debug!(target: "centroid", "Cell {} is empty, centroid undefined", cell.ix());
        }
        cell.set_centroid(centroid);
    }
}
