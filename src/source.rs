//! Loading coordinates into the point arena.
//!
//! A coordinates file holds a JSON array of `[x, y]` pairs. The whole file is
//! validated before anything is returned: a run never starts on partially
//! valid input.

use std::{
    fs, io,
    ops::Index,
    path::{Path, PathBuf},
};

use derive_more::IsVariant;
use log::{debug, info};
use serde_json::Value;
use thiserror::Error;

use crate::{math::Point, typed_ix::TypedIx};

/// Default upper bound on the number of coordinates in one input.
pub const MAX_COORDINATES: usize = 100;

pub type PointIx = TypedIx<Point>;

#[derive(Error, Debug, IsVariant)]
pub enum SourceError {
    #[error("failed to read coordinates from {}", .path.display())]
    InputUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse coordinates")]
    Parse(#[from] ParseError),
    #[error("{count} coordinates exceed the maximum of {max}")]
    CapacityExceeded { count: usize, max: usize },
}

#[derive(Error, Debug, IsVariant)]
pub enum ParseError {
    #[error("malformed JSON")]
    Malformed(#[from] serde_json::Error),
    #[error("the top-level JSON value is not an array")]
    NotAnArray,
    #[error("coordinate #{index} is not a pair of finite numbers")]
    InvalidCoordinate { index: usize },
}

/// Owns every input point. Downstream stages refer to points by [`PointIx`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Coordinates {
    points: Vec<Point>,
}

impl Coordinates {
    pub fn load(path: impl AsRef<Path>, max: usize) -> Result<Self, SourceError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| SourceError::InputUnavailable { path: path.to_owned(), source })?;
        let coordinates = Self::from_json_str(&text, max)?;

        info!(target: "source", "Loaded {} coordinates from {}", coordinates.len(), path.display());
        Ok(coordinates)
    }

    pub fn from_json_str(text: &str, max: usize) -> Result<Self, SourceError> {
        let root: Value = serde_json::from_str(text).map_err(ParseError::from)?;
        let Value::Array(items) = root else {
            return Err(ParseError::NotAnArray.into());
        };
        // Capacity is checked before looking at any element
        if items.len() > max {
            return Err(SourceError::CapacityExceeded { count: items.len(), max });
        }

        let points = items
            .iter()
            .enumerate()
            .map(|(index, item)| parse_pair(item).ok_or(ParseError::InvalidCoordinate { index }))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(target: "source", "Parsed {} coordinate pairs", points.len());
        Ok(Coordinates { points })
    }

    pub fn from_points<I>(points: I, max: usize) -> Result<Self, SourceError>
    where
        I: IntoIterator<Item = Point>,
    {
        let points = points.into_iter().collect::<Vec<_>>();
        if points.len() > max {
            return Err(SourceError::CapacityExceeded { count: points.len(), max });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(ParseError::InvalidCoordinate { index }.into());
        }
        Ok(Coordinates { points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, ix: PointIx) -> Option<Point> {
        self.points.get(ix.index()).copied()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Points in input order, with their arena indices.
    pub fn iter_indexed(&self) -> impl Iterator<Item = (PointIx, Point)> + '_ {
        self.points.iter().enumerate().map(|(n, &p)| (PointIx::new(n), p))
    }
}

impl Index<PointIx> for Coordinates {
    type Output = Point;

    fn index(&self, ix: PointIx) -> &Point {
        &self.points[ix.index()]
    }
}

fn parse_pair(item: &Value) -> Option<Point> {
    let [x, y] = item.as_array()?.as_slice() else { return None };
    Some(Point::new(x.as_f64()?, y.as_f64()?)).filter(|p| p.is_finite())
}

#[cfg(test)]
mod tests {
    use assertables::*;
    use test_case::test_case;

    use super::*;

    #[test]
    fn parses_pairs_in_order() {
        let coords = Coordinates::from_json_str("[[0.1, 0.2], [1, 0], [0.5, 0.75]]", 10).unwrap();

        assert_eq!(
            coords.points(),
            [Point::new(0.1, 0.2), Point::new(1.0, 0.0), Point::new(0.5, 0.75)]
        );
        assert_eq!(coords[PointIx::new(2)], Point::new(0.5, 0.75));
        assert_none!(coords.get(PointIx::new(3)));
    }

    #[test_case(0.42551932334256837)]
    #[test_case(0.9742447372584028)]
    #[test_case(0.49999999999999994 ; "just below a cell boundary")]
    fn coordinates_are_read_exactly(x: f64) {
        let text = serde_json::to_string(&[[x, 0.5]]).unwrap();
        let coords = Coordinates::from_json_str(&text, 1).unwrap();
        assert_eq!(coords.points()[0].x.to_bits(), x.to_bits());
    }

    #[test]
    fn many_coordinates_are_read_exactly() {
        let points = (0..2000)
            .map(|k| Point::new((k as f64 * 0.618_033_988_749_895) % 1.0, 1.0 / (k as f64 + 3.0)))
            .collect::<Vec<_>>();
        let text = serde_json::to_string(&points).unwrap();
        let coords = Coordinates::from_json_str(&text, points.len()).unwrap();
        assert_eq!(coords.points(), points);
    }

    #[test]
    fn empty_array_is_valid() {
        let coords = Coordinates::from_json_str("[]", MAX_COORDINATES).unwrap();
        assert!(coords.is_empty());
    }

    #[test_case("[[0.1, 0.2]" ; "truncated")]
    #[test_case("not json" ; "garbage")]
    fn malformed_json(text: &str) {
        let err = Coordinates::from_json_str(text, MAX_COORDINATES).unwrap_err();
        assert!(matches!(err, SourceError::Parse(ParseError::Malformed(_))), "{err:?}");
    }

    #[test_case("{\"x\": 0.1}")]
    #[test_case("0.5")]
    #[test_case("\"[[0.1, 0.2]]\"")]
    fn not_an_array(text: &str) {
        let err = Coordinates::from_json_str(text, MAX_COORDINATES).unwrap_err();
        assert!(matches!(err, SourceError::Parse(ParseError::NotAnArray)), "{err:?}");
    }

    #[test_case("[[0.1, 0.2], [0.3]]", 1)]
    #[test_case("[[0.1, 0.2, 0.3]]", 0)]
    #[test_case("[[0.1, 0.2], [0.3, \"0.4\"]]", 1)]
    #[test_case("[[0.1, 0.2], [0.3, 0.4], 5]", 2)]
    #[test_case("[[null, 0.2]]", 0)]
    fn invalid_coordinate(text: &str, expected_index: usize) {
        let err = Coordinates::from_json_str(text, MAX_COORDINATES).unwrap_err();
        match err {
            SourceError::Parse(ParseError::InvalidCoordinate { index }) => {
                assert_eq!(index, expected_index)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn capacity_exceeded() {
        let err =
            Coordinates::from_json_str("[[0.1, 0.1], [0.2, 0.2], [0.3, 0.3]]", 2).unwrap_err();
        assert!(matches!(err, SourceError::CapacityExceeded { count: 3, max: 2 }), "{err:?}");

        assert_ok!(Coordinates::from_json_str("[[0.1, 0.1], [0.2, 0.2]]", 2));
    }

    #[test]
    fn capacity_is_checked_before_elements() {
        let err = Coordinates::from_json_str("[1, 2, 3]", 2).unwrap_err();
        assert!(err.is_capacity_exceeded(), "{err:?}");
    }

    #[test]
    fn from_points_rejects_non_finite() {
        let err = Coordinates::from_points([Point::new(0.1, 0.1), Point::new(f64::NAN, 0.0)], 10)
            .unwrap_err();
        assert!(matches!(err, SourceError::Parse(ParseError::InvalidCoordinate { index: 1 })));
        assert_err!(Coordinates::from_points(vec![Point::default(); 4], 3));
    }

    #[test]
    fn missing_file_is_unavailable() {
        let path = std::env::temp_dir().join("grid_centroids_missing_input.json");
        let err = Coordinates::load(&path, MAX_COORDINATES).unwrap_err();
        assert!(err.is_input_unavailable(), "{err:?}");
        assert_contains!(err.to_string(), "grid_centroids_missing_input.json");
    }

    #[test]
    fn load_reads_file() {
        let path = std::env::temp_dir().join("grid_centroids_source_load.json");
        std::fs::write(&path, "[[0.25, 0.75]]").unwrap();

        let coords = Coordinates::load(&path, MAX_COORDINATES).unwrap();
        assert_eq!(coords.points(), [Point::new(0.25, 0.75)]);

        std::fs::remove_file(&path).unwrap();
    }
}
