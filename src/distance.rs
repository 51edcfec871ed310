use log::warn;

use crate::{
    heap_sort::DistanceKey,
    math::Point,
    partition::CellGrid,
    source::{Coordinates, PointIx},
};

/// A cell member together with its distance to the cell's centroid.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DistanceRecord {
    pub point: PointIx,
    pub position: Point,
    pub distance: f64,
}

impl DistanceKey for DistanceRecord {
    fn distance(&self) -> f64 {
        self.distance
    }
}

/// Records, for every member of every cell, its Euclidean distance to the
/// cell's centroid.
///
/// Centroids must already be computed (see
/// [`compute_centroids`][crate::centroid::compute_centroids]). A cell without
/// one is logged and left without distances.
pub fn compute_distances(grid: &mut CellGrid, coordinates: &Coordinates) {
    for cell in grid.iter_mut() {
        let Some(centroid) = cell.centroid() else {
            warn!(target: "distance", "Cell {} has no centroid yet, skipping", cell.ix());
            continue;
        };
        let records = cell
            .members()
            .iter()
            .map(|&point| {
                let position = coordinates[point];
                DistanceRecord { point, position, distance: position.distance_to(centroid) }
            })
            .collect();
        cell.set_distances(records);
    }
}
