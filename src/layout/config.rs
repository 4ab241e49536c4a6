//! Configuration for the layout engine

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur when loading a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Configuration options for bounds resolution
///
/// Every key is optional in TOML; missing keys keep their default.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Size given to boxes whose constraints leave an axis without a size (width, height)
    pub default_box_size: (f64, f64),

    /// Top-left position for boxes with no usable position (left, top)
    pub default_position: (f64, f64),

    /// Font size assumed for text sections without one
    pub default_font_size: f64,

    /// Line height multiplier assumed for text sections without one
    pub line_height: f64,

    /// Average glyph width as a fraction of the font size
    pub glyph_width_ratio: f64,

    /// Width / height ratio for images without one
    pub default_image_aspect_ratio: f64,

    /// Distance kept between an anchored element and its target
    pub anchor_gap: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_box_size: (200.0, 150.0),
            default_position: (20.0, 20.0),
            default_font_size: 16.0,
            line_height: 1.5,
            glyph_width_ratio: 0.6,
            default_image_aspect_ratio: 4.0 / 3.0,
            anchor_gap: 10.0,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Set the fallback box size
    pub fn with_box_size(mut self, width: f64, height: f64) -> Self {
        self.default_box_size = (width, height);
        self
    }

    /// Set the fallback box position
    pub fn with_position(mut self, left: f64, top: f64) -> Self {
        self.default_position = (left, top);
        self
    }

    /// Set the font size assumed for unstyled text
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.default_font_size = font_size;
        self
    }

    /// Set the anchor gap
    pub fn with_anchor_gap(mut self, gap: f64) -> Self {
        self.anchor_gap = gap;
        self
    }
}
