//! Relationship edge model.

use crate::model::person::PersonId;
use serde::{Deserialize, Serialize};

/// Relation tag that marks a row as a parent -> child link.
pub const PARENT_RELATION_KIND: &str = "parent";

/// Accepted parent -> child edge between two indexed people.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParentEdge {
    pub parent_id: PersonId,
    pub child_id: PersonId,
}

impl ParentEdge {
    pub fn new(parent_id: impl Into<PersonId>, child_id: impl Into<PersonId>) -> Self {
        Self {
            parent_id: parent_id.into(),
            child_id: child_id.into(),
        }
    }
}

/// Returns whether a raw relation tag names the parent kind.
///
/// Comparison trims and ignores ASCII case.
pub fn is_parent_relation(raw_kind: &str) -> bool {
    raw_kind.trim().eq_ignore_ascii_case(PARENT_RELATION_KIND)
}
