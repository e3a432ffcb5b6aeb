//! Rooted tree model handed to renderers.
//!
//! # Invariants
//! - A `VirtualRoot` node uses [`VIRTUAL_ROOT_ID`] and has no backing person.
//! - Child order is the order in which edges were attached.

use serde::{Deserialize, Serialize};

/// Reserved identifier of the synthetic root.
pub const VIRTUAL_ROOT_ID: &str = "ROOT";
/// Default label of the synthetic root.
pub const VIRTUAL_ROOT_LABEL: &str = "Family";

/// Node origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// Backed by an indexed person.
    Person,
    /// Placeholder introduced to satisfy the single-root requirement.
    VirtualRoot,
}

/// One node of the rendered hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeNode {
    pub id: String,
    pub name: String,
    pub kind: NodeKind,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Creates a person-backed leaf node.
    pub fn person(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Person,
            children: Vec::new(),
        }
    }

    /// Creates a synthetic root with the given label and children.
    pub fn virtual_root(label: impl Into<String>, children: Vec<TreeNode>) -> Self {
        Self {
            id: VIRTUAL_ROOT_ID.to_string(),
            name: label.into(),
            kind: NodeKind::VirtualRoot,
            children,
        }
    }

    pub fn is_virtual(&self) -> bool {
        self.kind == NodeKind::VirtualRoot
    }

    /// Identifiers of direct children, in order.
    pub fn child_ids(&self) -> Vec<&str> {
        self.children.iter().map(|child| child.id.as_str()).collect()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            count += 1;
            stack.extend(node.children.iter());
        }
        count
    }

    /// Number of levels below and including `self`.
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, level)) = stack.pop() {
            deepest = deepest.max(level);
            stack.extend(node.children.iter().map(|child| (child, level + 1)));
        }
        deepest
    }

    /// Pre-order search by identifier.
    pub fn find(&self, id: &str) -> Option<&TreeNode> {
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id == id {
                return Some(node);
            }
            stack.extend(node.children.iter().rev());
        }
        None
    }

    /// Pre-order list of all node identifiers.
    pub fn descendant_ids(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push(node.id.as_str());
            for child in node.children.iter().rev() {
                stack.push(child);
            }
        }
        out
    }
}

// Deep chains would overflow the derived recursive drop.
impl Drop for TreeNode {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}
