//! Plain-text renderer for terminals.

use crate::model::tree::TreeNode;
use crate::render::{Canvas, OutputFormat, RenderError, TreeRenderer};

/// Box-drawing indented tree. Ignores the canvas.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl TreeRenderer for TextRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Text
    }

    fn render(&self, root: &TreeNode, _canvas: &Canvas) -> Result<String, RenderError> {
        let mut out = String::new();
        out.push_str(label(root));
        out.push('\n');

        // (node, indentation inherited from ancestors, is last sibling)
        let mut stack = Vec::new();
        push_children(&mut stack, root, "");
        while let Some((node, prefix, last)) = stack.pop() {
            out.push_str(&prefix);
            out.push_str(if last { "└── " } else { "├── " });
            out.push_str(label(node));
            out.push('\n');
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            push_children(&mut stack, node, &child_prefix);
        }
        Ok(out)
    }
}

/// Pushes children in reverse so they pop in order.
fn push_children<'a>(
    stack: &mut Vec<(&'a TreeNode, String, bool)>,
    node: &'a TreeNode,
    prefix: &str,
) {
    let count = node.children.len();
    for (position, child) in node.children.iter().enumerate().rev() {
        stack.push((child, prefix.to_string(), position + 1 == count));
    }
}

fn label(node: &TreeNode) -> &str {
    if node.name.trim().is_empty() {
        "(unknown)"
    } else {
        node.name.as_str()
    }
}
