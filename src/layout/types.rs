//! Core types for the layout engine

use std::collections::HashMap;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// A 2D point in canvas pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width and height in pixels
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether a box of this size can hold anything at all
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Absolute pixel rectangle of a resolved node
///
/// Stores the top-left corner and size; the edges and centre are derived so
/// they can never disagree.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PixelBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelBounds {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Create a zero-sized box at the origin
    pub fn zero() -> Self {
        Self::default()
    }

    /// A box at the origin covering `size`
    pub fn from_size(size: Size) -> Self {
        Self::new(0.0, 0.0, size.width, size.height)
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    pub fn center(&self) -> Point {
        Point::new(self.center_x(), self.center_y())
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Check if this box contains a point, edges included
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x <= self.right()
            && point.y >= self.top
            && point.y <= self.bottom()
    }

    pub fn translate(&self, dx: f64, dy: f64) -> PixelBounds {
        PixelBounds::new(self.left + dx, self.top + dy, self.width, self.height)
    }

    /// The box shrunk by four paddings, never below zero size
    pub fn inset(&self, top: f64, right: f64, bottom: f64, left: f64) -> PixelBounds {
        PixelBounds::new(
            self.left + left,
            self.top + top,
            (self.width - left - right).max(0.0),
            (self.height - top - bottom).max(0.0),
        )
    }

    /// Compute the union of two boxes (smallest box containing both)
    pub fn union(&self, other: &PixelBounds) -> PixelBounds {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        PixelBounds::new(left, top, right - left, bottom - top)
    }
}

impl Serialize for PixelBounds {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("PixelBounds", 8)?;
        s.serialize_field("left", &self.left)?;
        s.serialize_field("top", &self.top)?;
        s.serialize_field("width", &self.width)?;
        s.serialize_field("height", &self.height)?;
        s.serialize_field("right", &self.right())?;
        s.serialize_field("bottom", &self.bottom())?;
        s.serialize_field("centerX", &self.center_x())?;
        s.serialize_field("centerY", &self.center_y())?;
        s.end()
    }
}

/// What a resolved node is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    LayoutBox,
    Text,
    Image,
    Decoration,
}

/// Layout information for a single node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedElement {
    pub id: String,
    pub kind: ElementKind,
    pub bounds: PixelBounds,
    /// Area available to children after padding (boxes only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_box: Option<PixelBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}

impl ResolvedElement {
    pub fn new(id: impl Into<String>, kind: ElementKind, bounds: PixelBounds) -> Self {
        Self {
            id: id.into(),
            kind,
            bounds,
            content_box: None,
            parent: None,
        }
    }
}

/// Result of resolving a tree or a whole document
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LayoutResult {
    /// Resolved nodes by id
    pub elements: HashMap<String, ResolvedElement>,
    /// Ids in resolution order: ancestors before descendants, siblings in list order
    pub order: Vec<String>,
    /// Size everything was resolved against
    pub canvas: Size,
}

impl LayoutResult {
    pub fn new(canvas: Size) -> Self {
        Self {
            canvas,
            ..Default::default()
        }
    }

    /// Record a node. A repeated id keeps the first occurrence's position in
    /// `order` but takes the latest bounds.
    pub fn insert(&mut self, element: ResolvedElement) {
        if !self.elements.contains_key(&element.id) {
            self.order.push(element.id.clone());
        }
        self.elements.insert(element.id.clone(), element);
    }

    pub fn get(&self, id: &str) -> Option<&ResolvedElement> {
        self.elements.get(id)
    }

    pub fn bounds(&self, id: &str) -> Option<PixelBounds> {
        self.elements.get(id).map(|e| e.bounds)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Nodes in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedElement> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Extent of every resolved node together with the canvas
    pub fn extent(&self) -> PixelBounds {
        self.iter()
            .fold(PixelBounds::from_size(self.canvas), |acc, e| {
                acc.union(&e.bounds)
            })
    }
}

impl Serialize for LayoutResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let elements: Vec<&ResolvedElement> = self.iter().collect();
        let mut s = serializer.serialize_struct("LayoutResult", 2)?;
        s.serialize_field("canvas", &self.canvas)?;
        s.serialize_field("elements", &elements)?;
        s.end()
    }
}
