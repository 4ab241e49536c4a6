//! Solid colors and CSS gradients
//!
//! Solid colors are resolved with `csscolorparser`. Gradients go through a
//! logos lexer and a chumsky grammar so that malformed input can be reported
//! with a source span; the lenient [`parse_gradient`] entry point simply maps
//! any failure to `None`.

pub mod gradient;
pub mod grammar;
pub mod lexer;

use serde::{Deserialize, Serialize};

use crate::model::length::round_to;

pub use gradient::{
    infer_positions, serialize_gradient, Gradient, GradientEditError, GradientKind,
    GradientPosition, GradientStop, RadialShape, MIN_STOPS,
};
pub use grammar::parse_gradient_strict;

/// An 8-bit RGB color with a fractional alpha channel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Default for Rgba {
    fn default() -> Self {
        Self::BLACK
    }
}

impl Rgba {
    pub const BLACK: Rgba = Rgba {
        r: 0,
        g: 0,
        b: 0,
        a: 1.0,
    };

    pub fn new(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r,
            g,
            b,
            a: a.clamp(0.0, 1.0),
        }
    }

    /// Resolve any CSS color. Unrecognised input is opaque black.
    pub fn parse(s: &str) -> Rgba {
        match csscolorparser::parse(s.trim()) {
            Ok(color) => {
                let [r, g, b, _] = color.to_rgba8();
                Rgba::new(r, g, b, round_to(color.a as f64, 3))
            }
            Err(err) => {
                log::trace!("unrecognised color '{}': {}", s, err);
                Rgba::BLACK
            }
        }
    }

    /// Channel-wise interpolation, `t = 0` is `self`
    pub fn lerp(&self, other: &Rgba, t: f64) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba::new(
            mix(self.r, other.r),
            mix(self.g, other.g),
            mix(self.b, other.b),
            round_to(self.a + (other.a - self.a) * t, 3),
        )
    }

    /// `#rrggbb`, or `#rrggbbaa` when not fully opaque
    pub fn to_hex(&self) -> String {
        if self.a >= 1.0 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let alpha = (self.a * 255.0).round() as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, alpha)
        }
    }

    /// `rgba(r, g, b, a)` as CSS understands it
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {})",
            self.r,
            self.g,
            self.b,
            crate::model::format_number(self.a)
        )
    }
}

/// Whether `s` is written as a CSS gradient function
pub fn is_gradient(s: &str) -> bool {
    let s = s.trim_start();
    ["linear-gradient(", "radial-gradient(", "conic-gradient("]
        .iter()
        .any(|prefix| s.starts_with(prefix))
}

/// Parse a gradient, returning `None` for anything that is not a well-formed
/// linear, radial or conic gradient
pub fn parse_gradient(s: &str) -> Option<Gradient> {
    if !is_gradient(s) {
        return None;
    }
    match parse_gradient_strict(s.trim()) {
        Ok(gradient) => Some(gradient),
        Err(errors) => {
            log::debug!("not a valid gradient ({} errors): {}", errors.len(), s);
            None
        }
    }
}

/// Resolve a color string to RGBA. Gradients resolve to their first stop;
/// anything unparseable is opaque black.
pub fn parse_color(s: &str) -> Rgba {
    match parse_gradient(s) {
        Some(gradient) => gradient
            .representative_color()
            .map(Rgba::parse)
            .unwrap_or_default(),
        None => Rgba::parse(s),
    }
}

/// A background as painted: either a solid color or a gradient
#[derive(Debug, Clone, PartialEq)]
pub enum Fill {
    Solid(String),
    Gradient(Gradient),
}

impl Fill {
    /// Classify a background string. Malformed gradients fall back to solid
    /// handling of the raw string.
    pub fn parse(s: &str) -> Fill {
        match parse_gradient(s) {
            Some(gradient) => Fill::Gradient(gradient),
            None => Fill::Solid(s.trim().to_string()),
        }
    }

    pub fn representative_color(&self) -> &str {
        match self {
            Fill::Solid(color) => color,
            Fill::Gradient(gradient) => gradient.representative_color().unwrap_or("#000000"),
        }
    }

    pub fn to_css(&self) -> String {
        match self {
            Fill::Solid(color) => color.clone(),
            Fill::Gradient(gradient) => gradient.to_string(),
        }
    }
}
