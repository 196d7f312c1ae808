//! Fracture engine: marking internal boundaries open and splitting the
//! cell complex along them.
//!
//! The usual entry point is [`driver::Topology`]; the remaining modules are
//! the building blocks it composes.

pub mod connectivity;
pub mod criterion;
pub mod driver;
pub mod graph;
pub mod graphviz;
pub mod marker;
pub mod open;
pub mod projection;
pub mod star;
pub mod subgraph;
pub mod surgery;

pub use connectivity::{ConnectivityCache, ElementConnectivity};
pub use criterion::{BernoulliCriterion, ForcedCriterion, FractureCriterion};
pub use driver::{FractureSummary, Topology};
pub use marker::FractureMarker;
pub use open::EntityOpenMap;
pub use star::{Star, StarEdge, star};
pub use subgraph::{Edge, Subgraph, Vertex};
pub use surgery::ArticulationSplit;
