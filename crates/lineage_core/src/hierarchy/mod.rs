//! Hierarchy construction.
//!
//! # Responsibility
//! - Shape an unordered set of parent edges into one rooted tree for layout.
//! - Keep multi-parent and cycle handling behind named policies.

pub mod builder;
pub mod policy;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Hierarchy build errors. Only raised under `CyclePolicy::Reject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    /// Attaching `child_id` under `parent_id` closes a parent cycle.
    CycleDetected { parent_id: String, child_id: String },
    /// People that no root reaches because they sit on a detached cycle.
    UnreachablePeople { count: usize },
}

impl Display for HierarchyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CycleDetected {
                parent_id,
                child_id,
            } => write!(
                f,
                "parent cycle detected: {child_id} is an ancestor of its parent {parent_id}"
            ),
            Self::UnreachablePeople { count } => {
                write!(f, "{count} people are unreachable from any root (parent cycle)")
            }
        }
    }
}

impl Error for HierarchyError {}
