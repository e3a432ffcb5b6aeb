//! Hierarchy builder: people and parent edges to one rooted tree.
//!
//! # Responsibility
//! - Attach children to parents in edge order.
//! - Infer root candidates and inject a virtual root when there is not exactly one.
//! - Materialize the working graph into an owned [`TreeNode`] tree.
//!
//! # Invariants
//! - Exactly one root is produced per build.
//! - Child order equals accepted edge order; nothing is sorted.
//! - With [`CyclePolicy::Truncate`] the build never fails.

use crate::hierarchy::policy::{BuildOptions, CyclePolicy, MultiParentPolicy};
use crate::hierarchy::HierarchyError;
use crate::ingest::normalize::PersonIndex;
use crate::model::edge::ParentEdge;
use crate::model::person::Person;
use crate::model::tree::TreeNode;
use log::{debug, warn};
use serde::{Deserialize, Serialize};

/// How the root of a build was chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum RootDecision {
    /// One natural root; returned without a wrapper.
    SinglePerson { id: String },
    /// Several natural roots hung under a virtual root.
    VirtualOverCandidates { count: usize },
    /// No natural root; every person hung flat under a virtual root.
    VirtualOverEveryone { count: usize },
}

/// Counters for one build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildReport {
    pub decision: RootDecision,
    pub root_candidates: usize,
    pub edges_attached: usize,
    /// Edges dropped by [`MultiParentPolicy::FirstParentWins`].
    pub multi_parent_edges_skipped: usize,
    /// Back-edges dropped by [`CyclePolicy::Truncate`].
    pub cycle_edges_truncated: usize,
    /// People that no root reaches (members of a detached cycle).
    pub unreachable_people: usize,
}

/// Result of one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    pub root: TreeNode,
    pub report: BuildReport,
}

/// Builds the rooted tree for one load cycle.
///
/// # Errors
/// - Returns [`HierarchyError::CycleDetected`] or
///   [`HierarchyError::UnreachablePeople`] only under [`CyclePolicy::Reject`].
pub fn build_hierarchy(
    people: &PersonIndex,
    edges: &[ParentEdge],
    options: &BuildOptions,
) -> Result<Hierarchy, HierarchyError> {
    let mut graph = WorkingGraph::new(people);
    let (edges_attached, multi_parent_edges_skipped) = graph.attach(edges, options.multi_parent);

    let candidates = graph.root_candidates();
    debug!(
        "event=roots_inferred module=hierarchy status=ok people={} edges={} candidates={}",
        graph.people.len(),
        edges_attached,
        candidates.len()
    );

    let mut walk = Walk::new(graph.people.len(), options.cycles);
    let (root, decision) = match candidates.as_slice() {
        [] => {
            if options.cycles == CyclePolicy::Reject {
                if let Some((parent, child)) = graph.find_cycle_edge() {
                    return Err(graph.cycle_error(parent, child));
                }
            }
            let children = (0..graph.people.len())
                .map(|position| graph.node_for(position))
                .collect::<Vec<_>>();
            walk.visited.iter_mut().for_each(|seen| *seen = true);
            let count = children.len();
            (
                TreeNode::virtual_root(options.root_label.as_str(), children),
                RootDecision::VirtualOverEveryone { count },
            )
        }
        [single] => {
            let root = graph.materialize(*single, &mut walk)?;
            let id = root.id.clone();
            (root, RootDecision::SinglePerson { id })
        }
        many => {
            let mut children = Vec::with_capacity(many.len());
            for &candidate in many {
                children.push(graph.materialize(candidate, &mut walk)?);
            }
            (
                TreeNode::virtual_root(options.root_label.as_str(), children),
                RootDecision::VirtualOverCandidates { count: many.len() },
            )
        }
    };

    let unreachable = walk.visited.iter().filter(|seen| !**seen).count();
    if unreachable > 0 {
        if options.cycles == CyclePolicy::Reject {
            return Err(HierarchyError::UnreachablePeople { count: unreachable });
        }
        warn!(
            "event=people_unreachable module=hierarchy status=degraded count={unreachable}"
        );
    }

    Ok(Hierarchy {
        root,
        report: BuildReport {
            decision,
            root_candidates: candidates.len(),
            edges_attached,
            multi_parent_edges_skipped,
            cycle_edges_truncated: walk.truncated,
            unreachable_people: unreachable,
        },
    })
}

/// Index-based working copy of the person graph.
struct WorkingGraph<'a> {
    people: Vec<&'a Person>,
    index: &'a PersonIndex,
    children: Vec<Vec<usize>>,
    first_parent: Vec<Option<usize>>,
}

impl<'a> WorkingGraph<'a> {
    fn new(index: &'a PersonIndex) -> Self {
        let people = index.iter().collect::<Vec<_>>();
        let len = people.len();
        Self {
            people,
            index,
            children: vec![Vec::new(); len],
            first_parent: vec![None; len],
        }
    }

    /// Appends children in edge order. Returns `(attached, skipped)`.
    fn attach(&mut self, edges: &[ParentEdge], policy: MultiParentPolicy) -> (usize, usize) {
        let mut attached = 0;
        let mut skipped = 0;
        for edge in edges {
            let (Some(parent), Some(child)) = (
                self.index.position(&edge.parent_id),
                self.index.position(&edge.child_id),
            ) else {
                continue;
            };

            if self.first_parent[child].is_some() && policy == MultiParentPolicy::FirstParentWins
            {
                debug!(
                    "event=edge_skipped module=hierarchy status=skipped reason=multi_parent parent={} child={}",
                    edge.parent_id, edge.child_id
                );
                skipped += 1;
                continue;
            }

            self.children[parent].push(child);
            self.first_parent[child].get_or_insert(parent);
            attached += 1;
        }
        (attached, skipped)
    }

    /// People never seen as a child, in index order.
    fn root_candidates(&self) -> Vec<usize> {
        self.first_parent
            .iter()
            .enumerate()
            .filter(|(_, parent)| parent.is_none())
            .map(|(position, _)| position)
            .collect()
    }

    /// Follows first-parent links from the first person until a node repeats.
    ///
    /// Only meaningful when every person has a parent, so the walk must loop.
    fn find_cycle_edge(&self) -> Option<(usize, usize)> {
        let mut seen = vec![false; self.people.len()];
        let mut cursor = 0;
        while cursor < self.people.len() {
            let parent = self.first_parent[cursor]?;
            if seen[cursor] {
                return Some((parent, cursor));
            }
            seen[cursor] = true;
            cursor = parent;
        }
        None
    }

    fn cycle_error(&self, parent: usize, child: usize) -> HierarchyError {
        HierarchyError::CycleDetected {
            parent_id: self.people[parent].id.clone(),
            child_id: self.people[child].id.clone(),
        }
    }

    /// Depth-first copy of the subtree under `start`, driven by an explicit stack.
    ///
    /// Nodes are first collected in pre-order with their parent slot, then
    /// assembled bottom-up, so chain depth never reaches the call stack.
    fn materialize(&self, start: usize, walk: &mut Walk) -> Result<TreeNode, HierarchyError> {
        let mut nodes = vec![self.node_for(start)];
        let mut parent_slots = vec![0];
        let mut stack = vec![Frame {
            position: start,
            slot: 0,
            next_child: 0,
        }];
        walk.on_path[start] = true;
        walk.visited[start] = true;

        while let Some(frame) = stack.last_mut() {
            let position = frame.position;
            let Some(&child) = self.children[position].get(frame.next_child) else {
                walk.on_path[position] = false;
                stack.pop();
                continue;
            };
            frame.next_child += 1;
            let parent_slot = frame.slot;

            if walk.on_path[child] {
                if walk.policy == CyclePolicy::Reject {
                    return Err(self.cycle_error(position, child));
                }
                warn!(
                    "event=cycle_truncated module=hierarchy status=degraded parent={} child={}",
                    self.people[position].id, self.people[child].id
                );
                walk.truncated += 1;
                continue;
            }

            walk.on_path[child] = true;
            walk.visited[child] = true;
            nodes.push(self.node_for(child));
            parent_slots.push(parent_slot);
            stack.push(Frame {
                position: child,
                slot: nodes.len() - 1,
                next_child: 0,
            });
        }

        // Children have higher slots than their parent; popping from the end
        // finishes every node before it is attached.
        while nodes.len() > 1 {
            let slot = nodes.len() - 1;
            let mut node = nodes.remove(slot);
            node.children.reverse();
            nodes[parent_slots[slot]].children.push(node);
        }
        let mut root = nodes.remove(0);
        root.children.reverse();
        Ok(root)
    }

    fn node_for(&self, position: usize) -> TreeNode {
        let person = self.people[position];
        TreeNode::person(person.id.as_str(), person.name.as_str())
    }
}

/// One open node of the materialization walk.
struct Frame {
    position: usize,
    /// Index of this node in the pre-order node list.
    slot: usize,
    next_child: usize,
}

/// Depth-first materialization state.
struct Walk {
    policy: CyclePolicy,
    on_path: Vec<bool>,
    visited: Vec<bool>,
    truncated: usize,
}

impl Walk {
    fn new(len: usize, policy: CyclePolicy) -> Self {
        Self {
            policy,
            on_path: vec![false; len],
            visited: vec![false; len],
            truncated: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{build_hierarchy, RootDecision};
    use crate::hierarchy::policy::{BuildOptions, CyclePolicy};
    use crate::hierarchy::HierarchyError;
    use crate::ingest::normalize::PersonIndex;
    use crate::model::edge::ParentEdge;
    use crate::model::person::Person;

    fn index(ids: &[&str]) -> PersonIndex {
        ids.iter()
            .filter_map(|id| {
                Person::from_fields(
                    [("id".to_string(), id.to_string())].into_iter().collect(),
                )
            })
            .collect()
    }

    #[test]
    fn self_loop_under_real_root_is_truncated() {
        let people = index(&["A", "B"]);
        let edges = vec![ParentEdge::new("A", "B"), ParentEdge::new("B", "B")];
        let built = build_hierarchy(&people, &edges, &BuildOptions::default()).unwrap();

        assert_eq!(built.root.id, "A");
        assert_eq!(built.root.children[0].id, "B");
        assert!(built.root.children[0].children.is_empty());
        assert_eq!(built.report.cycle_edges_truncated, 1);
    }

    #[test]
    fn find_cycle_reports_back_edge_under_reject() {
        let people = index(&["A", "B"]);
        let edges = vec![ParentEdge::new("A", "B"), ParentEdge::new("B", "A")];
        let options = BuildOptions {
            cycles: CyclePolicy::Reject,
            ..BuildOptions::default()
        };
        let err = build_hierarchy(&people, &edges, &options).unwrap_err();
        assert_eq!(
            err,
            HierarchyError::CycleDetected {
                parent_id: "B".to_string(),
                child_id: "A".to_string()
            }
        );
    }

    #[test]
    fn detached_cycle_is_counted_as_unreachable() {
        let people = index(&["A", "B", "C"]);
        let edges = vec![ParentEdge::new("B", "C"), ParentEdge::new("C", "B")];
        let built = build_hierarchy(&people, &edges, &BuildOptions::default()).unwrap();

        assert_eq!(
            built.report.decision,
            RootDecision::SinglePerson {
                id: "A".to_string()
            }
        );
        assert_eq!(built.report.unreachable_people, 2);
    }
}
