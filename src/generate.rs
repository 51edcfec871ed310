//! Random coordinate files, for feeding the analysis.

use std::{
    io::{self, Write},
    path::Path,
};

use clap::ValueEnum;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::math::Point;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// A JSON array of `[x, y]` pairs
    #[default]
    Json,
    /// Comma-separated, with an `X,Y` header
    Csv,
    /// One `x y` pair per line
    Txt,
}

impl OutputFormat {
    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()?.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "csv" => Some(Self::Csv),
            "txt" => Some(Self::Txt),
            _ => None,
        }
    }
}

/// `count` points drawn uniformly from `[0, 1) x [0, 1)`.
pub fn random_points<R: Rng>(count: usize, rng: &mut R) -> Vec<Point> {
    (0..count).map(|_| Point::new(rng.gen_range(0.0..1.0), rng.gen_range(0.0..1.0))).collect()
}

pub fn write_points<W: Write>(points: &[Point], format: OutputFormat, w: &mut W) -> io::Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer(&mut *w, points)?;
            writeln!(w)
        }
        OutputFormat::Csv => {
            writeln!(w, "X,Y")?;
            points.iter().try_for_each(|p| writeln!(w, "{},{}", p.x, p.y))
        }
        OutputFormat::Txt => points.iter().try_for_each(|p| writeln!(w, "{} {}", p.x, p.y)),
    }
}
