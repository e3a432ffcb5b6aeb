//! JSON renderer: nested hierarchy document.

use crate::model::tree::TreeNode;
use crate::render::{Canvas, OutputFormat, RenderError, TreeRenderer};

enum Step<'a> {
    Node(&'a TreeNode),
    Separator,
    Close,
}

/// Compact `{id, name, virtual, children}` tree, written without recursion.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl TreeRenderer for JsonRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Json
    }

    fn render(&self, root: &TreeNode, _canvas: &Canvas) -> Result<String, RenderError> {
        let mut out = String::new();
        let mut steps = vec![Step::Node(root)];
        while let Some(step) = steps.pop() {
            match step {
                Step::Node(node) => {
                    out.push_str("{\"id\":");
                    out.push_str(&serde_json::to_string(&node.id)?);
                    out.push_str(",\"name\":");
                    out.push_str(&serde_json::to_string(&node.name)?);
                    out.push_str(",\"virtual\":");
                    out.push_str(if node.is_virtual() { "true" } else { "false" });
                    out.push_str(",\"children\":[");
                    steps.push(Step::Close);
                    for (position, child) in node.children.iter().enumerate().rev() {
                        steps.push(Step::Node(child));
                        if position > 0 {
                            steps.push(Step::Separator);
                        }
                    }
                }
                Step::Separator => out.push(','),
                Step::Close => out.push_str("]}"),
            }
        }
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::JsonRenderer;
    use crate::model::tree::TreeNode;
    use crate::render::{Canvas, TreeRenderer};

    #[test]
    fn emits_nested_children_and_virtual_flag() {
        let root = TreeNode::virtual_root("Family", vec![TreeNode::person("A", "Alice")]);
        let text = JsonRenderer.render(&root, &Canvas::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["id"], "ROOT");
        assert_eq!(value["virtual"], true);
        assert_eq!(value["children"][0]["name"], "Alice");
        assert_eq!(value["children"][0]["virtual"], false);
        assert_eq!(value["children"][0]["children"].as_array().map(Vec::len), Some(0));
    }

    #[test]
    fn keeps_sibling_order_and_escapes_names() {
        let root = TreeNode::virtual_root(
            "Family",
            vec![
                TreeNode::person("A", "Ada \"Lovelace\""),
                TreeNode::person("B", "Bo"),
                TreeNode::person("C", "Cy"),
            ],
        );
        let text = JsonRenderer.render(&root, &Canvas::default()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["children"][0]["name"], "Ada \"Lovelace\"");
        assert_eq!(value["children"][1]["id"], "B");
        assert_eq!(value["children"][2]["id"], "C");
    }

    #[test]
    fn deep_chain_is_written_without_recursion() {
        let depth = 50_000;
        let mut tree = TreeNode::person("P0", "P0");
        for index in 1..depth {
            let parent = TreeNode::person(format!("P{index}"), "");
            let child = std::mem::replace(&mut tree, parent);
            tree.children.push(child);
        }

        let text = JsonRenderer.render(&tree, &Canvas::default()).unwrap();
        assert!(text.starts_with("{\"id\":\"P49999\""));
        assert_eq!(text.matches("]}").count(), depth);
        assert!(text.ends_with("]}\n"));
    }
}
