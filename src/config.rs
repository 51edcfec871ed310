//! Run configuration, loaded from a TOML file.
//!
//! Every key is optional:
//!
//! ```toml
//! grid_size = 2
//! edge_length = 1.0
//! cell_capacity = 100
//! max_coordinates = 100
//! ```

use std::{
    fs, io,
    num::NonZero,
    path::{Path, PathBuf},
};

use derive_more::IsVariant;
use new_zealand::nz;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{cell::CELL_CAPACITY, source::MAX_COORDINATES};

pub const DEFAULT_GRID_SIZE: NonZero<usize> = nz!(2);
pub const DEFAULT_EDGE_LENGTH: f64 = 1.0;
/// Upper bound on `grid_size * grid_size`.
pub const MAX_CELLS: usize = 1 << 20;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Cells per side; the grid has `grid_size * grid_size` cells.
    pub grid_size: NonZero<usize>,
    /// Edge length of the square the grid covers.
    pub edge_length: f64,
    /// Maximum number of points a single cell holds.
    pub cell_capacity: usize,
    /// Maximum number of coordinates accepted from the input.
    pub max_coordinates: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            edge_length: DEFAULT_EDGE_LENGTH,
            cell_capacity: CELL_CAPACITY,
            max_coordinates: MAX_COORDINATES,
        }
    }
}

#[derive(Error, Debug, IsVariant)]
pub enum ConfigError {
    #[error("failed to read config from {}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid config")]
    Parse(#[from] toml::de::Error),
    #[error("edge length must be a positive finite number, got {0}")]
    InvalidEdgeLength(f64),
    #[error("a {0}x{0} grid has too many cells")]
    GridTooLarge(NonZero<usize>),
}

impl AnalysisConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|source| ConfigError::Unavailable { path: path.to_owned(), source })?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: AnalysisConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.edge_length.is_finite() && self.edge_length > 0.0) {
            return Err(ConfigError::InvalidEdgeLength(self.edge_length));
        }
        let cells = self.grid_size.get().checked_mul(self.grid_size.get());
        if cells.is_none_or(|cells| cells > MAX_CELLS) {
            return Err(ConfigError::GridTooLarge(self.grid_size));
        }
        Ok(())
    }
}
