//! SVG preview renderer
//!
//! Paints a document at the bounds the layout engine resolved for it, in
//! paint order. Meant for previews and tests, not for print output.

pub mod config;
pub mod svg;

pub use config::SvgConfig;
pub use svg::{gradient_def, render_svg, SvgBuilder};
