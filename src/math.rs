pub mod dimensions;
pub mod point;

pub use dimensions::{CellIx, Dimensions};
pub use point::Point;
