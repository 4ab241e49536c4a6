//! Anchors: positions defined relative to another element

use serde::{Deserialize, Serialize};

use super::length::Length;

/// Horizontal component of an origin point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizontalOrigin {
    Left,
    Center,
    Right,
}

/// Vertical component of an origin point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerticalOrigin {
    Top,
    Center,
    Bottom,
}

/// One of the nine named points of an element's bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OriginPoint {
    #[default]
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl OriginPoint {
    pub fn all() -> &'static [OriginPoint] {
        &[
            Self::TopLeft,
            Self::TopCenter,
            Self::TopRight,
            Self::CenterLeft,
            Self::Center,
            Self::CenterRight,
            Self::BottomLeft,
            Self::BottomCenter,
            Self::BottomRight,
        ]
    }

    pub fn horizontal(&self) -> HorizontalOrigin {
        match self {
            Self::TopLeft | Self::CenterLeft | Self::BottomLeft => HorizontalOrigin::Left,
            Self::TopCenter | Self::Center | Self::BottomCenter => HorizontalOrigin::Center,
            Self::TopRight | Self::CenterRight | Self::BottomRight => HorizontalOrigin::Right,
        }
    }

    pub fn vertical(&self) -> VerticalOrigin {
        match self {
            Self::TopLeft | Self::TopCenter | Self::TopRight => VerticalOrigin::Top,
            Self::CenterLeft | Self::Center | Self::CenterRight => VerticalOrigin::Center,
            Self::BottomLeft | Self::BottomCenter | Self::BottomRight => VerticalOrigin::Bottom,
        }
    }
}

/// Whether the dependent element sits outside or inside the target's bounds.
///
/// Only used to pick default offsets when an anchor is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentMode {
    #[default]
    Outside,
    Inside,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AnchorOffset {
    pub x: Length,
    pub y: Length,
}

impl AnchorOffset {
    pub fn px(x: f64, y: f64) -> Self {
        Self {
            x: Length::Px(x),
            y: Length::Px(y),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Anchor {
    pub element_id: String,
    #[serde(default)]
    pub origin_point: OriginPoint,
    #[serde(default)]
    pub offset: AnchorOffset,
    #[serde(default)]
    pub attachment_mode: AttachmentMode,
}

impl Anchor {
    pub fn new(element_id: impl Into<String>, origin_point: OriginPoint) -> Self {
        Self {
            element_id: element_id.into(),
            origin_point,
            offset: AnchorOffset::default(),
            attachment_mode: AttachmentMode::default(),
        }
    }

    pub fn with_offset(mut self, offset: AnchorOffset) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_mode(mut self, mode: AttachmentMode) -> Self {
        self.attachment_mode = mode;
        self
    }
}
