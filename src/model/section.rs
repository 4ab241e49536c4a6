//! Layout boxes and the sections they contain

use serde::{Deserialize, Serialize};

use super::anchor::Anchor;
use super::constraints::Constraints;
use super::length::Length;
use super::style::{Insets, TextStyle};

/// How a box positions itself inside its parent.
///
/// Documents store this as optional `constraints` / `anchor` / `gridColumn` /
/// `gridRow` fields on the box. On read, grid lines take precedence over an
/// anchor, which takes precedence over plain constraints. A grid item keeps
/// the anchored or constrained placement it falls back to when its parent is
/// not a grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "PlacementFields", into = "PlacementFields")]
pub enum Placement {
    Constrained(Constraints),
    Anchored {
        anchor: Anchor,
        width: Option<Length>,
        height: Option<Length>,
    },
    GridItem {
        area: GridArea,
        /// Never itself a `GridItem`
        fallback: Box<Placement>,
    },
}

/// Raw CSS grid line ranges such as `"1 / 3"` or `"span 2"`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GridArea {
    pub column: Option<String>,
    pub row: Option<String>,
}

#[derive(Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlacementFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    constraints: Option<Constraints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<Anchor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    grid_row: Option<String>,
}

impl From<PlacementFields> for Placement {
    fn from(mut fields: PlacementFields) -> Self {
        let area = GridArea {
            column: fields.grid_column.take(),
            row: fields.grid_row.take(),
        };
        let constraints = fields.constraints.unwrap_or_default();
        let placement = match fields.anchor {
            Some(anchor) => Placement::Anchored {
                anchor,
                width: constraints.width,
                height: constraints.height,
            },
            None => Placement::Constrained(constraints),
        };
        if area.column.is_some() || area.row.is_some() {
            Placement::GridItem {
                area,
                fallback: Box::new(placement),
            }
        } else {
            placement
        }
    }
}

impl From<Placement> for PlacementFields {
    fn from(placement: Placement) -> Self {
        match placement {
            Placement::Constrained(constraints) => PlacementFields {
                constraints: Some(constraints),
                ..Default::default()
            },
            Placement::Anchored {
                anchor,
                width,
                height,
            } => {
                let size = Constraints {
                    width,
                    height,
                    ..Default::default()
                };
                PlacementFields {
                    constraints: (!size.is_empty()).then_some(size),
                    anchor: Some(anchor),
                    ..Default::default()
                }
            }
            Placement::GridItem { area, fallback } => {
                let fields = PlacementFields::from(*fallback);
                PlacementFields {
                    constraints: fields.constraints.filter(|c| !c.is_empty()),
                    grid_column: area.column,
                    grid_row: area.row,
                    ..fields
                }
            }
        }
    }
}

impl Default for Placement {
    fn default() -> Self {
        Placement::Constrained(Constraints::default())
    }
}

impl Placement {
    /// Wrap a placement with grid lines, keeping it as the non-grid fallback
    pub fn grid_item(area: GridArea, placement: Placement) -> Self {
        let fallback = match placement {
            Placement::GridItem { fallback, .. } => fallback,
            other => Box::new(other),
        };
        Placement::GridItem { area, fallback }
    }

    /// The placement used when the parent does not lay out a grid
    pub fn outside_grid(&self) -> &Placement {
        match self {
            Placement::GridItem { fallback, .. } => fallback.outside_grid(),
            other => other,
        }
    }

    pub fn outside_grid_mut(&mut self) -> &mut Placement {
        match self {
            Placement::GridItem { fallback, .. } => fallback.outside_grid_mut(),
            other => other,
        }
    }

    /// Explicit width and height, whichever mode the box is in
    pub fn explicit_size(&self) -> (Option<Length>, Option<Length>) {
        match self.outside_grid() {
            Placement::Anchored { width, height, .. } => (*width, *height),
            Placement::Constrained(c) => (c.horizontal().size(), c.vertical().size()),
            Placement::GridItem { .. } => (None, None),
        }
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        match self.outside_grid() {
            Placement::Anchored { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    pub fn anchor_mut(&mut self) -> Option<&mut Anchor> {
        match self.outside_grid_mut() {
            Placement::Anchored { anchor, .. } => Some(anchor),
            _ => None,
        }
    }

    pub fn constraints(&self) -> Option<&Constraints> {
        match self.outside_grid() {
            Placement::Constrained(c) => Some(c),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutMode {
    Flex,
    Grid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FlexDirection {
    Row,
    #[default]
    Column,
    RowReverse,
    ColumnReverse,
}

impl FlexDirection {
    pub fn is_row(&self) -> bool {
        matches!(self, Self::Row | Self::RowReverse)
    }

    pub fn is_reversed(&self) -> bool {
        matches!(self, Self::RowReverse | Self::ColumnReverse)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JustifyContent {
    #[default]
    FlexStart,
    Center,
    FlexEnd,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlignItems {
    FlexStart,
    Center,
    FlexEnd,
    #[default]
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Low,
    Medium,
    High,
}

fn default_true() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Fields every section carries. None of them change pixel geometry except
/// the flex item weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionBase {
    /// Degrees, applied at paint time only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_grow: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_shrink: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_instructions: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_content_locked: bool,
    #[serde(default = "default_true", skip_serializing_if = "is_true")]
    pub is_visible: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_locked: bool,
}

impl Default for SectionBase {
    fn default() -> Self {
        Self {
            rotation: None,
            flex_grow: None,
            flex_shrink: None,
            z_index: None,
            importance: None,
            ai_instructions: None,
            is_content_locked: false,
            is_visible: true,
            is_locked: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextSection {
    pub id: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(flatten)]
    pub base: SectionBase,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSection {
    pub id: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
    /// Width divided by height
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_fit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(flatten)]
    pub base: SectionBase,
}

/// A rectangular container with its own placement and child layout rules
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutBox {
    pub id: String,
    /// Semantic label used when matching AI output to boxes
    #[serde(default)]
    pub role: String,
    #[serde(flatten)]
    pub placement: Placement,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout_mode: Option<LayoutMode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<FlexDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<JustifyContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub align_items: Option<AlignItems>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_gap: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_template_columns: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid_template_rows: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<f64>,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(flatten)]
    pub base: SectionBase,
}

impl LayoutBox {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_constraints(mut self, constraints: Constraints) -> Self {
        self.placement = Placement::Constrained(constraints);
        self
    }

    pub fn with_placement(mut self, placement: Placement) -> Self {
        self.placement = placement;
        self
    }

    pub fn with_layout(mut self, mode: LayoutMode) -> Self {
        self.layout_mode = Some(mode);
        self
    }

    pub fn with_section(mut self, section: impl Into<Section>) -> Self {
        self.sections.push(section.into());
        self
    }

    pub fn padding(&self) -> Insets {
        Insets {
            top: self.padding_top.unwrap_or(0.0),
            right: self.padding_right.unwrap_or(0.0),
            bottom: self.padding_bottom.unwrap_or(0.0),
            left: self.padding_left.unwrap_or(0.0),
        }
    }

    pub fn flex_direction(&self) -> FlexDirection {
        self.flex_direction.unwrap_or_default()
    }

    /// Gap between columns, falling back to the shorthand `gap`
    pub fn column_gap(&self) -> f64 {
        self.column_gap.or(self.gap).unwrap_or(0.0)
    }

    /// Gap between rows, falling back to the shorthand `gap`
    pub fn row_gap(&self) -> f64 {
        self.row_gap.or(self.gap).unwrap_or(0.0)
    }
}

/// Any child of a layout box, in paint order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Section {
    Text(TextSection),
    Image(ImageSection),
    LayoutBox(LayoutBox),
}

impl Section {
    pub fn id(&self) -> &str {
        match self {
            Section::Text(s) => &s.id,
            Section::Image(s) => &s.id,
            Section::LayoutBox(b) => &b.id,
        }
    }

    pub fn set_id(&mut self, id: String) {
        match self {
            Section::Text(s) => s.id = id,
            Section::Image(s) => s.id = id,
            Section::LayoutBox(b) => b.id = id,
        }
    }

    pub fn base(&self) -> &SectionBase {
        match self {
            Section::Text(s) => &s.base,
            Section::Image(s) => &s.base,
            Section::LayoutBox(b) => &b.base,
        }
    }

    pub fn base_mut(&mut self) -> &mut SectionBase {
        match self {
            Section::Text(s) => &mut s.base,
            Section::Image(s) => &mut s.base,
            Section::LayoutBox(b) => &mut b.base,
        }
    }

    /// Short kind name, also used as the prefix of generated ids
    pub fn kind(&self) -> &'static str {
        match self {
            Section::Text(_) => "text",
            Section::Image(_) => "image",
            Section::LayoutBox(_) => "box",
        }
    }

    pub fn as_layout_box(&self) -> Option<&LayoutBox> {
        match self {
            Section::LayoutBox(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_layout_box_mut(&mut self) -> Option<&mut LayoutBox> {
        match self {
            Section::LayoutBox(b) => Some(b),
            _ => None,
        }
    }
}

impl From<TextSection> for Section {
    fn from(s: TextSection) -> Self {
        Section::Text(s)
    }
}

impl From<ImageSection> for Section {
    fn from(s: ImageSection) -> Self {
        Section::Image(s)
    }
}

impl From<LayoutBox> for Section {
    fn from(b: LayoutBox) -> Self {
        Section::LayoutBox(b)
    }
}
