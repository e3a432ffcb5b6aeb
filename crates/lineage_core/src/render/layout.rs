//! Horizontal layered tree layout.
//!
//! Depth runs left to right, siblings top to bottom. Leaves are placed in
//! pre-order one unit apart (two units between cousins) and every parent is
//! centered between its first and last child, then both axes are scaled into
//! the canvas.

use crate::model::tree::TreeNode;
use crate::render::CanvasSize;

/// Layout tuning.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Horizontal offset applied to every node.
    pub offset_x: f32,
    /// Vertical offset applied to every node.
    pub offset_y: f32,
    /// Canvas width not used by depth (room for labels).
    pub reserved_width: f32,
    /// Canvas height not used by breadth.
    pub reserved_height: f32,
    pub sibling_separation: f32,
    pub cousin_separation: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            offset_x: 80.0,
            offset_y: 20.0,
            reserved_width: 140.0,
            reserved_height: 40.0,
            sibling_separation: 1.0,
            cousin_separation: 2.0,
        }
    }
}

/// One laid-out node. `x`/`y` are final canvas coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedNode<'a> {
    pub node: &'a TreeNode,
    pub parent: Option<usize>,
    pub depth: usize,
    pub x: f32,
    pub y: f32,
}

/// Laid-out tree in pre-order; index 0 is the root.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeLayout<'a> {
    pub nodes: Vec<PositionedNode<'a>>,
}

impl<'a> TreeLayout<'a> {
    /// Parent -> child index pairs in pre-order.
    pub fn links(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| node.parent.map(|parent| (parent, index)))
    }
}

struct Slot<'a> {
    node: &'a TreeNode,
    parent: Option<usize>,
    depth: usize,
    children: Vec<usize>,
    breadth: f32,
}

/// Computes positions for every node of `root` inside `size`.
pub fn layout_tree<'a>(root: &'a TreeNode, size: CanvasSize, config: &LayoutConfig) -> TreeLayout<'a> {
    let mut slots = flatten(root);

    // Leaves left to right in pre-order.
    let mut previous_leaf: Option<usize> = None;
    let mut cursor = 0.0_f32;
    for index in 0..slots.len() {
        if !slots[index].children.is_empty() {
            continue;
        }
        if let Some(previous) = previous_leaf {
            cursor += if slots[previous].parent == slots[index].parent {
                config.sibling_separation
            } else {
                config.cousin_separation
            };
        }
        slots[index].breadth = cursor;
        previous_leaf = Some(index);
    }

    // Children always follow their parent in pre-order.
    for index in (0..slots.len()).rev() {
        let (Some(&first), Some(&last)) =
            (slots[index].children.first(), slots[index].children.last())
        else {
            continue;
        };
        slots[index].breadth = (slots[first].breadth + slots[last].breadth) / 2.0;
    }

    let min_breadth = slots.iter().map(|slot| slot.breadth).fold(f32::INFINITY, f32::min);
    let max_breadth = slots
        .iter()
        .map(|slot| slot.breadth)
        .fold(f32::NEG_INFINITY, f32::max);
    let max_depth = slots.iter().map(|slot| slot.depth).max().unwrap_or(0);

    let span_x = (size.width as f32 - config.reserved_width).max(0.0);
    let span_y = (size.height as f32 - config.reserved_height).max(0.0);
    let breadth_range = max_breadth - min_breadth;

    let nodes = slots
        .into_iter()
        .map(|slot| {
            let along_depth = if max_depth == 0 {
                0.0
            } else {
                slot.depth as f32 / max_depth as f32 * span_x
            };
            let along_breadth = if breadth_range > f32::EPSILON {
                (slot.breadth - min_breadth) / breadth_range * span_y
            } else {
                span_y / 2.0
            };
            PositionedNode {
                node: slot.node,
                parent: slot.parent,
                depth: slot.depth,
                x: along_depth + config.offset_x,
                y: along_breadth + config.offset_y,
            }
        })
        .collect();

    TreeLayout { nodes }
}

fn flatten(root: &TreeNode) -> Vec<Slot<'_>> {
    let mut slots: Vec<Slot<'_>> = Vec::new();
    let mut stack: Vec<(&TreeNode, Option<usize>, usize)> = vec![(root, None, 0)];
    while let Some((node, parent, depth)) = stack.pop() {
        let index = slots.len();
        if let Some(parent) = parent {
            slots[parent].children.push(index);
        }
        slots.push(Slot {
            node,
            parent,
            depth,
            children: Vec::new(),
            breadth: 0.0,
        });
        for child in node.children.iter().rev() {
            stack.push((child, Some(index), depth + 1));
        }
    }
    slots
}
