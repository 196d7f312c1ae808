//! Top-level module for mesh topology abstractions.
//!
//! This module provides the core types and traits for representing a mesh as
//! a cell complex:
//! - Entity keys, ranks and cell types with their canonical local numbering
//! - The `EntityStore` trait and its deterministic in-memory implementation
//! - Named node sets and side sets
//! - Validation of the relation graph
//!
//! Most users will interact with the `EntityStore` trait and the
//! `InMemoryEntityStore` implementation.

pub mod cell_type;
pub mod in_memory;
pub mod point;
pub mod rank;
pub mod sets;
pub mod store;
pub mod validation;

pub use cell_type::CellType;
pub use in_memory::InMemoryEntityStore;
pub use point::EntityKey;
pub use rank::{EntityRank, LocalId};
pub use sets::MeshSets;
pub use store::{EntityStore, Relation};
