//! Free-floating decoration images layered over the page

use serde::{Deserialize, Serialize};

use super::anchor::Anchor;
use super::style::{Shadow, Stroke};

/// Horizontal position in percent of the canvas width, vertical in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationPosition {
    #[serde(default)]
    pub x_percent: f64,
    #[serde(default)]
    pub y_px: f64,
}

/// Width in percent of the canvas width; height follows the aspect ratio
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecorationSize {
    pub width: f64,
}

impl Default for DecorationSize {
    fn default() -> Self {
        Self { width: 20.0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecorationScope {
    #[default]
    Page,
    Content,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Decoration {
    pub id: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub position: DecorationPosition,
    #[serde(default)]
    pub size_percent: DecorationSize,
    /// Width divided by height of the source image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    /// Degrees
    #[serde(default)]
    pub angle: f64,
    #[serde(default)]
    pub z_index: i32,
    #[serde(default)]
    pub scope: DecorationScope,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Shadow>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Stroke>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default = "default_visible")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_locked: bool,
}

fn default_visible() -> bool {
    true
}

impl Decoration {
    pub fn new(id: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            image_url: image_url.into(),
            is_visible: true,
            ..Default::default()
        }
    }

    pub fn at(mut self, x_percent: f64, y_px: f64) -> Self {
        self.position = DecorationPosition { x_percent, y_px };
        self
    }

    pub fn with_width_percent(mut self, width: f64) -> Self {
        self.size_percent = DecorationSize { width };
        self
    }
}
