//! Poster Layout - Layout core for poster and long-article templates
//!
//! This library turns a template document (layout boxes, sections and
//! decorations with CSS-like constraints) into concrete pixel bounds, and
//! provides the editing operations a template editor needs: gradient
//! parsing, anchor attach/detach, whole-template scaling and path-addressed
//! layer edits.
//!
//! # Example
//!
//! ```rust
//! use poster_layout::render;
//!
//! let svg = render(r#"{"canvas": {"width": 400, "height": 300}}"#).unwrap();
//! assert!(svg.contains("<svg"));
//! ```

pub mod color;
pub mod error;
pub mod layers;
pub mod layout;
pub mod model;
pub mod renderer;
pub mod scale;

pub use color::{parse_color, parse_gradient, parse_gradient_strict, serialize_gradient, Fill, Gradient, Rgba};
pub use error::ParseError;
pub use layers::{
    delete_at_path, duplicate_at_path, find_by_path, move_at_path, paint_order, PathError,
};
pub use layout::{
    detach_anchor, normalize_constraints, resolve_anchor, resolve_bounds, resolve_template,
    ConfigError, LayoutConfig, LayoutResult, PixelBounds,
};
pub use model::{DocumentError, LayoutBox, Section, Template};
pub use renderer::{render_svg, SvgConfig};
pub use scale::scale_template;

use thiserror::Error;

/// Errors that can occur in the document pipeline
#[derive(Debug, Error)]
pub enum RenderError {
    /// The document could not be read or decoded
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// The layout configuration could not be loaded
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// A gradient string failed to parse
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// A layer path did not lead anywhere
    #[error("path error: {0}")]
    Path(#[from] PathError),
}

impl From<Vec<ParseError>> for RenderError {
    fn from(errors: Vec<ParseError>) -> Self {
        RenderError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Configuration for the complete render pipeline
#[derive(Debug, Clone, Default)]
pub struct RenderConfig {
    /// Layout fallbacks
    pub layout: LayoutConfig,
    /// SVG output configuration
    pub svg: SvgConfig,
}

impl RenderConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the SVG configuration
    pub fn with_svg(mut self, config: SvgConfig) -> Self {
        self.svg = config;
        self
    }
}

/// Resolve every node of a JSON document to pixel bounds
///
/// # Example
///
/// ```rust
/// use poster_layout::{layout_document, LayoutConfig};
///
/// let json = r#"{
///     "canvas": {"width": 1000, "height": 800},
///     "layoutBoxes": [{"id": "hero", "constraints": {"left": "10%", "right": "10%", "top": "0px", "height": "200px"}}]
/// }"#;
/// let layout = layout_document(json, &LayoutConfig::default()).unwrap();
/// let hero = layout.bounds("hero").unwrap();
/// assert_eq!(hero.left, 100.0);
/// assert_eq!(hero.width, 800.0);
/// ```
pub fn layout_document(json: &str, config: &LayoutConfig) -> Result<LayoutResult, RenderError> {
    let template = Template::from_json(json)?;
    Ok(resolve_template(&template, config))
}

/// Parse a gradient strictly and return it in canonical CSS form
///
/// # Example
///
/// ```rust
/// use poster_layout::normalize_gradient;
///
/// let css = normalize_gradient("linear-gradient(to right, red, blue)").unwrap();
/// assert!(css.starts_with("linear-gradient(90deg"));
/// assert!(normalize_gradient("linear-gradient(").is_err());
/// ```
pub fn normalize_gradient(css: &str) -> Result<String, RenderError> {
    let gradient = parse_gradient_strict(css.trim())?;
    Ok(serialize_gradient(&gradient))
}

/// Render a JSON document to an SVG preview with default configuration
pub fn render(json: &str) -> Result<String, RenderError> {
    render_with_config(json, &RenderConfig::default())
}

/// Render a JSON document to an SVG preview with custom configuration
///
/// # Example
///
/// ```rust
/// use poster_layout::{render_with_config, RenderConfig, SvgConfig};
///
/// let config = RenderConfig::new().with_svg(SvgConfig::default().with_standalone(false));
/// let svg = render_with_config(r#"{"backgroundColor": "red"}"#, &config).unwrap();
/// assert!(svg.starts_with("<svg"));
/// assert!(svg.contains(r#"fill="red""#));
/// ```
pub fn render_with_config(json: &str, config: &RenderConfig) -> Result<String, RenderError> {
    let template = Template::from_json(json)?;
    let layout = resolve_template(&template, &config.layout);
    log::debug!("resolved {} nodes", layout.len());
    Ok(render_svg(&template, &layout, &config.svg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_empty_document() {
        let svg = render("{}").unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert!(svg.contains(r#"viewBox="0 0 1080 1080""#));
    }

    #[test]
    fn test_render_boxes() {
        let svg = render(
            r##"{
                "canvas": {"width": 500, "height": 500},
                "layoutBoxes": [
                    {"id": "a", "backgroundColor": "#ff0000",
                     "constraints": {"left": "0px", "top": "0px", "width": "100px", "height": "100px"}},
                    {"id": "b", "backgroundColor": "radial-gradient(circle, white, black)",
                     "constraints": {"left": "200px", "top": "0px", "width": "100px", "height": "100px"}}
                ]
            }"##,
        )
        .unwrap();
        assert!(svg.contains(r#"id="a""#));
        assert!(svg.contains(r##"fill="#ff0000""##));
        assert!(svg.contains("<radialGradient"));
    }

    #[test]
    fn test_render_invalid_json() {
        let err = render("{ not json").unwrap_err();
        assert!(matches!(err, RenderError::Document(_)));
    }

    #[test]
    fn test_normalize_gradient_error() {
        let err = normalize_gradient("radial-gradient(circle, )").unwrap_err();
        assert!(matches!(err, RenderError::Parse(_)));
    }
}
