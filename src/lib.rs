//! # Grid centroids
//!
//! Bins points of a square into a uniform `n` x `n` grid and finds the cell
//! whose points sit, in sum, closest to their own centroid.
//!
//! A run goes through a fixed sequence of stages, each one annotating the
//! cells of a [`CellGrid`] in place:
//!
//! 1. [`partition`]: every point lands in at most one cell
//! 2. [`centroid`]: each cell's mean position
//! 3. [`distance`]: each member's distance to its cell's centroid
//! 4. [`aggregate`]: per-cell sums, and the cell with the smallest one
//!
//! [`Analysis::run`] performs all of them in that order. Points live in a
//! single arena ([`Coordinates`]); cells refer to them by index.

use log::info;

use crate::{
    aggregate::{Selection, compute_aggregates, select_min},
    centroid::compute_centroids,
    config::AnalysisConfig,
    distance::compute_distances,
    partition::{CellGrid, PartitionStats},
    source::Coordinates,
};

pub mod aggregate;
pub mod cell;
pub mod centroid;
pub mod config;
pub mod distance;
pub mod generate;
pub mod grid;
pub mod heap_sort;
pub mod math;
pub mod partition;
pub mod report;
pub mod source;
pub mod typed_ix;

pub use cell::GridCell;
pub use math::{CellIx, Point};

/// The state of one finished run: the input arena and the annotated grid.
#[derive(Clone, Debug)]
pub struct Analysis {
    coordinates: Coordinates,
    grid: CellGrid,
    stats: PartitionStats,
    selection: Option<Selection>,
}

impl Analysis {
    /// Runs every stage over `coordinates`, in order.
    pub fn run(coordinates: Coordinates, config: &AnalysisConfig) -> Self {
        let (mut grid, stats) = partition::partition(
            &coordinates,
            config.grid_size,
            config.edge_length,
            config.cell_capacity,
        );
        compute_centroids(&mut grid, &coordinates);
        compute_distances(&mut grid, &coordinates);
        compute_aggregates(&mut grid);
        let selection = select_min(&grid);

        info!(
            target: "analysis",
            "Analyzed {} points ({} assigned, {} dropped)",
            coordinates.len(),
            stats.assigned,
            stats.dropped()
        );

        Analysis { coordinates, grid, stats, selection }
    }

    pub fn coordinates(&self) -> &Coordinates {
        &self.coordinates
    }

    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }

    pub fn stats(&self) -> PartitionStats {
        self.stats
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn cell(&self, ix: CellIx) -> Option<&GridCell> {
        self.grid.get(ix)
    }
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use new_zealand::nz;
    use test_case::test_matrix;

    use super::*;

    fn analyze(points: &[(f64, f64)], config: &AnalysisConfig) -> Analysis {
        let coordinates =
            Coordinates::from_points(points.iter().map(|&(x, y)| Point::new(x, y)), usize::MAX)
                .unwrap();
        Analysis::run(coordinates, config)
    }

    fn pseudo_random_points(n: usize) -> Vec<(f64, f64)> {
        // Golden-ratio sequence
        (0..n).map(|k| ((k as f64 * 0.618_034) % 1.0, (k as f64 * 0.754_877_7) % 1.0)).collect()
    }

    #[test]
    fn four_quadrants() {
        let analysis = analyze(
            &[(0.1, 0.1), (0.9, 0.1), (0.1, 0.9), (0.9, 0.9)],
            &AnalysisConfig::default(),
        );

        for cell in analysis.grid().iter() {
            assert_eq!(cell.len(), 1);
            assert_eq!(cell.centroid(), Some(analysis.coordinates()[cell.members()[0]]));
            assert_eq!(cell.distances()[0].distance, 0.0);
            assert_eq!(cell.aggregate(), 0.0);
        }
        let selection = analysis.selection().unwrap();
        assert_eq!(selection.cell, CellIx::new(0, 0));
        assert_eq!(selection.aggregate, 0.0);
    }

    #[test]
    fn two_points_in_one_cell() {
        let analysis = analyze(&[(0.1, 0.1), (0.2, 0.2), (0.9, 0.9)], &AnalysisConfig::default());

        let first = analysis.cell(CellIx::new(0, 0)).unwrap();
        let centroid = first.centroid().unwrap();
        assert_in_delta!(centroid.x, 0.15, 1e-12);
        assert_in_delta!(centroid.y, 0.15, 1e-12);
        assert_gt!(first.aggregate(), 0.0);

        let last = analysis.cell(CellIx::new(1, 1)).unwrap();
        assert_eq!(last.aggregate(), 0.0);
        assert_some_eq_x!(analysis.selection().map(|s| s.cell), CellIx::new(1, 1));
    }

    #[test]
    fn empty_input() {
        let analysis = analyze(&[], &AnalysisConfig::default());

        assert!(analysis.grid().iter().all(|cell| cell.aggregate() == 0.0));
        assert!(analysis.grid().iter().all(|cell| cell.centroid().is_some_and(Point::is_nan)));
        assert_some_eq_x!(analysis.selection().map(|s| s.cell), CellIx::new(0, 0));
    }

    #[test]
    fn point_on_far_edge_is_dropped() {
        let analysis = analyze(&[(1.0, 0.5)], &AnalysisConfig::default());

        assert_eq!(analysis.stats().out_of_range, 1);
        assert!(analysis.grid().iter().all(GridCell::is_empty));
    }

    #[test_matrix([1, 2, 3, 5], [1.0, 3.0])]
    fn stage_invariants_hold(grid_size: usize, edge_length: f64) {
        let config = AnalysisConfig {
            grid_size: std::num::NonZero::new(grid_size).unwrap(),
            edge_length,
            ..Default::default()
        };
        let points = pseudo_random_points(80)
            .into_iter()
            .map(|(x, y)| (x * edge_length, y * edge_length))
            .collect::<Vec<_>>();
        let analysis = analyze(&points, &config);

        for cell in analysis.grid().iter() {
            assert_len_eq!(cell.distances(), cell.members());
            let sum: f64 = cell.distances().iter().map(|r| r.distance).sum();
            assert_in_delta!(cell.aggregate(), sum, 1e-9);

            if !cell.is_empty() {
                let n = cell.len() as f64;
                let members = cell.members().iter().map(|&ix| analysis.coordinates()[ix]);
                let (sx, sy) = members.fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
                let centroid = cell.centroid().unwrap();
                assert_in_delta!(centroid.x, sx / n, 1e-9);
                assert_in_delta!(centroid.y, sy / n, 1e-9);
            }
        }

        let selection = analysis.selection().unwrap();
        let occupied = analysis.grid().iter().filter(|c| !c.is_empty()).collect::<Vec<_>>();
        assert!(occupied.iter().all(|c| c.aggregate() >= selection.aggregate));
        let first_min = occupied.iter().find(|c| c.aggregate() == selection.aggregate).unwrap();
        assert_eq!(first_min.ix(), selection.cell);
    }

    #[test]
    fn runs_are_reproducible() {
        let points = pseudo_random_points(60);
        let config = AnalysisConfig { grid_size: nz!(4), ..Default::default() };

        let a = analyze(&points, &config);
        let b = analyze(&points, &config);
        let members = |analysis: &Analysis| {
            analysis.grid().iter().map(|cell| cell.members().to_vec()).collect::<Vec<_>>()
        };
        assert_eq!(members(&a), members(&b));
        assert_eq!(a.selection(), b.selection());
    }
}
