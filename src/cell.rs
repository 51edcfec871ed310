use thiserror::Error;

use crate::{
    distance::DistanceRecord,
    heap_sort::sorted_by_distance,
    math::{CellIx, Point},
    source::PointIx,
};

/// Default upper bound on the number of points a single cell holds.
pub const CELL_CAPACITY: usize = 100;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cell {cell} is full ({capacity} points)")]
pub struct CellFull {
    pub cell: CellIx,
    pub capacity: usize,
}

/// One cell of a [`CellGrid`][crate::partition::CellGrid].
///
/// Cells are filled by the partitioner and then annotated in place, in order,
/// by the centroid, distance and aggregate stages.
#[derive(Clone, Debug, PartialEq)]
pub struct GridCell {
    ix: CellIx,
    center: Point,
    capacity: usize,
    members: Vec<PointIx>,
    /// `None` until centroids are computed; NaN for a cell without members.
    centroid: Option<Point>,
    distances: Vec<DistanceRecord>,
    aggregate: f64,
}

impl GridCell {
    pub fn new(ix: CellIx, center: Point, capacity: usize) -> Self {
        GridCell {
            ix,
            center,
            capacity,
            members: Vec::new(),
            centroid: None,
            distances: Vec::new(),
            aggregate: 0.0,
        }
    }

    pub const fn ix(&self) -> CellIx {
        self.ix
    }

    /// Geometric center of the cell, independent of its members.
    pub const fn center(&self) -> Point {
        self.center
    }

    pub const fn capacity(&self) -> usize {
        self.capacity
    }

    /// Assigned points, in assignment order.
    pub fn members(&self) -> &[PointIx] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= self.capacity
    }

    pub fn try_assign(&mut self, point: PointIx) -> Result<(), CellFull> {
        if self.is_full() {
            return Err(CellFull { cell: self.ix, capacity: self.capacity });
        }
        self.members.push(point);
        Ok(())
    }

    pub const fn centroid(&self) -> Option<Point> {
        self.centroid
    }

    /// One record per member, in member order.
    pub fn distances(&self) -> &[DistanceRecord] {
        &self.distances
    }

    /// Sum of member distances to the centroid; zero for an empty cell.
    pub const fn aggregate(&self) -> f64 {
        self.aggregate
    }

    /// The distance records ordered from nearest to farthest.
    pub fn sorted_distances(&self) -> Vec<DistanceRecord> {
        sorted_by_distance(&self.distances)
    }

    pub fn nearest(&self) -> Option<DistanceRecord> {
        self.sorted_distances().first().copied()
    }

    pub fn farthest(&self) -> Option<DistanceRecord> {
        self.sorted_distances().last().copied()
    }

    pub(crate) fn set_centroid(&mut self, centroid: Point) {
        self.centroid = Some(centroid);
    }

    pub(crate) fn set_distances(&mut self, distances: Vec<DistanceRecord>) {
        debug_assert_eq!(distances.len(), self.members.len());
        self.distances = distances;
    }

    pub(crate) fn set_aggregate(&mut self, aggregate: f64) {
        self.aggregate = aggregate;
    }
}
