//! Lineage domain model shared by ingest, hierarchy and presentation.
//!
//! # Responsibility
//! - Define canonical person, edge and tree-node shapes.
//! - Keep identifiers as trimmed, non-empty strings from source tables.
//!
//! # Invariants
//! - Every `Person` has a non-empty identifier.
//! - Every `TreeNode` of kind `Person` is backed by one indexed `Person`.

pub mod edge;
pub mod event;
pub mod person;
pub mod tree;
