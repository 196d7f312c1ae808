//! Re-export public algorithms.

pub mod interpolate;
pub mod meshgen;

pub use interpolate::{InterpolationResult, interpolate_adjacent_entities};
pub use meshgen::{structured_box_2d, structured_box_3d};
