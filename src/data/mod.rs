//! Data module: per-entity field payloads
#![warn(missing_docs)]

pub mod section;

pub use section::Section;
