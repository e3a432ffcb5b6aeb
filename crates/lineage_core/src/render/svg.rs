//! SVG renderer: horizontal node-link diagram.

use crate::model::tree::TreeNode;
use crate::render::layout::{layout_tree, LayoutConfig, PositionedNode};
use crate::render::{escape_xml, Canvas, OutputFormat, RenderError, TreeRenderer, Viewport};

const NODE_RADIUS: f32 = 6.0;
const NODE_FILL: &str = "#e0e0e0";
const NODE_STROKE: &str = "#333";
const LINK_STROKE: &str = "#999";
const UNKNOWN_LABEL: &str = "(unknown)";

/// Draws circles, labels and curved parent-child links.
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    viewport: Viewport,
    layout: LayoutConfig,
}

impl SvgRenderer {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            layout: LayoutConfig::default(),
        }
    }
}

impl TreeRenderer for SvgRenderer {
    fn format(&self) -> OutputFormat {
        OutputFormat::Svg
    }

    fn render(&self, root: &TreeNode, canvas: &Canvas) -> Result<String, RenderError> {
        let size = canvas.resolve(self.viewport);
        let layout = layout_tree(root, size, &self.layout);

        let mut svg = format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
            w = size.width,
            h = size.height
        );

        svg.push_str(&format!("<g fill=\"none\" stroke=\"{LINK_STROKE}\">\n"));
        for (parent, child) in layout.links() {
            svg.push_str(&format!(
                "<path d=\"{}\"/>\n",
                link_path(&layout.nodes[parent], &layout.nodes[child])
            ));
        }
        svg.push_str("</g>\n<g>\n");

        for node in &layout.nodes {
            let label = if node.node.name.trim().is_empty() {
                UNKNOWN_LABEL
            } else {
                node.node.name.as_str()
            };
            svg.push_str(&format!(
                "<g transform=\"translate({:.2},{:.2})\" data-id=\"{}\"><circle r=\"{NODE_RADIUS}\" fill=\"{NODE_FILL}\" stroke=\"{NODE_STROKE}\"/><text dx=\"10\" dy=\"4\">{}</text></g>\n",
                node.x,
                node.y,
                escape_xml(&node.node.id),
                escape_xml(label)
            ));
        }
        svg.push_str("</g>\n</svg>\n");
        Ok(svg)
    }
}

/// Horizontal cubic link from `source` to `target`.
fn link_path(source: &PositionedNode<'_>, target: &PositionedNode<'_>) -> String {
    let mid_x = (source.x + target.x) / 2.0;
    format!(
        "M{:.2},{:.2}C{:.2},{:.2} {:.2},{:.2} {:.2},{:.2}",
        source.x, source.y, mid_x, source.y, mid_x, target.y, target.x, target.y
    )
}
