//! Tree rendering capability.
//!
//! # Responsibility
//! - Define the renderer seam: rooted tree + canvas in, document out.
//! - Resolve canvas size with a viewport fallback.
//! - Produce the inline error block shown when a load fails.
//!
//! # Invariants
//! - Renderers never mutate the tree.
//! - Unknown canvas dimensions always resolve to a positive size.

pub mod json;
pub mod layout;
pub mod svg;
pub mod target;
pub mod text;

use crate::model::tree::TreeNode;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Viewport used when the canvas has no definite size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 960,
            height: 800,
        }
    }
}

const MIN_FALLBACK_HEIGHT: u32 = 600;

/// Requested canvas; `None` or zero means "not known yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Canvas {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

/// Canvas with definite dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// Resolves unknown dimensions: width from the viewport, height as
    /// `max(600, 0.9 * viewport height)`.
    pub fn resolve(&self, viewport: Viewport) -> CanvasSize {
        let width = self
            .width
            .filter(|value| *value > 0)
            .unwrap_or(viewport.width.max(1));
        let height = self.height.filter(|value| *value > 0).unwrap_or_else(|| {
            let scaled = (f64::from(viewport.height) * 0.9).round() as u32;
            scaled.max(MIN_FALLBACK_HEIGHT)
        });
        CanvasSize { width, height }
    }
}

/// Output document kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Svg,
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Text => "text",
            Self::Json => "json",
        }
    }

    pub fn parse(value: &str) -> Result<Self, RenderError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(RenderError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Render-layer errors.
#[derive(Debug)]
pub enum RenderError {
    /// Rendering target cannot receive output.
    MissingTarget(PathBuf),
    /// Writing the rendered document failed.
    Io {
        target: String,
        source: std::io::Error,
    },
    /// JSON serialization failed.
    Serialize(serde_json::Error),
    UnsupportedFormat(String),
}

impl Display for RenderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingTarget(path) => {
                write!(f, "missing rendering target: {}", path.display())
            }
            Self::Io { target, source } => write!(f, "failed to write `{target}`: {source}"),
            Self::Serialize(err) => write!(f, "failed to serialize tree: {err}"),
            Self::UnsupportedFormat(value) => {
                write!(f, "unsupported output format `{value}`; expected svg|text|json")
            }
        }
    }
}

impl Error for RenderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::MissingTarget(_) => None,
            Self::UnsupportedFormat(_) => None,
        }
    }
}

impl From<serde_json::Error> for RenderError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Renderer seam: lay out and draw a rooted tree.
pub trait TreeRenderer {
    fn format(&self) -> OutputFormat;

    /// Renders `root` into a complete document for `canvas`.
    fn render(&self, root: &TreeNode, canvas: &Canvas) -> Result<String, RenderError>;
}

/// Returns the built-in renderer for `format`.
pub fn renderer_for(format: OutputFormat, viewport: Viewport) -> Box<dyn TreeRenderer> {
    match format {
        OutputFormat::Svg => Box::new(svg::SvgRenderer::new(viewport)),
        OutputFormat::Text => Box::new(text::TextRenderer),
        OutputFormat::Json => Box::new(json::JsonRenderer),
    }
}

/// Styled inline error block for a failed load or render.
pub fn error_banner(message: &str) -> String {
    format!(
        "<div xmlns=\"http://www.w3.org/1999/xhtml\" style=\"padding:1rem;color:#b00020;background:#fff0f0;border-top:1px solid #e5c6c6;white-space:pre-wrap;\">\n  <strong>Error:</strong> {}\n</div>\n",
        escape_xml(message)
    )
}

/// Standalone SVG document holding the error block, replacing a failed render.
pub fn error_document(message: &str, size: CanvasSize) -> String {
    format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n<foreignObject x=\"0\" y=\"0\" width=\"{w}\" height=\"{h}\">\n{banner}</foreignObject>\n</svg>\n",
        w = size.width,
        h = size.height,
        banner = error_banner(message)
    )
}

pub(crate) fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::{
        error_banner, error_document, renderer_for, Canvas, CanvasSize, OutputFormat, RenderError,
        Viewport,
    };

    #[test]
    fn canvas_falls_back_to_viewport() {
        let viewport = Viewport {
            width: 1200,
            height: 500,
        };
        assert_eq!(
            Canvas::default().resolve(viewport),
            CanvasSize {
                width: 1200,
                height: 600
            }
        );
        assert_eq!(
            Canvas::new(Some(0), None).resolve(Viewport {
                width: 800,
                height: 1000
            }),
            CanvasSize {
                width: 800,
                height: 900
            }
        );
        assert_eq!(
            Canvas::new(Some(300), Some(200)).resolve(viewport),
            CanvasSize {
                width: 300,
                height: 200
            }
        );
    }

    #[test]
    fn output_format_parses_known_names() {
        assert_eq!(OutputFormat::parse(" SVG ").unwrap(), OutputFormat::Svg);
        assert_eq!(OutputFormat::parse("txt").unwrap(), OutputFormat::Text);
        assert!(matches!(
            OutputFormat::parse("png"),
            Err(RenderError::UnsupportedFormat(value)) if value == "png"
        ));
    }

    #[test]
    fn renderer_for_selects_matching_format() {
        for format in [OutputFormat::Svg, OutputFormat::Text, OutputFormat::Json] {
            assert_eq!(renderer_for(format, Viewport::default()).format(), format);
        }
    }

    #[test]
    fn error_banner_escapes_message() {
        let banner = error_banner("fetch failed: <people.csv>");
        assert!(banner.contains("<strong>Error:</strong>"));
        assert!(banner.contains("&lt;people.csv&gt;"));
        assert!(banner.contains("#b00020"));
    }

    #[test]
    fn error_document_wraps_banner_in_one_svg_root() {
        let document = error_document(
            "fetch failed: a&b",
            CanvasSize {
                width: 320,
                height: 200,
            },
        );
        assert!(document.starts_with("<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"320\""));
        assert!(document.ends_with("</svg>\n"));
        assert_eq!(document.matches("<svg").count(), 1);
        assert!(document.contains("<foreignObject x=\"0\" y=\"0\" width=\"320\" height=\"200\">"));
        assert!(document.contains("<div xmlns=\"http://www.w3.org/1999/xhtml\""));
        assert!(document.contains("fetch failed: a&amp;b"));
    }
}
