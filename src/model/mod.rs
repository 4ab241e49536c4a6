//! Document data model
//!
//! Plain data, serializable to the JSON format documents are persisted in.
//! Nothing in here computes geometry; see [`crate::layout`] for that.

pub mod anchor;
pub mod constraints;
pub mod decoration;
pub mod length;
pub mod section;
pub mod style;
pub mod template;

pub use anchor::{Anchor, AnchorOffset, AttachmentMode, HorizontalOrigin, OriginPoint, VerticalOrigin};
pub use constraints::{AxisConstraint, ConstraintField, Constraints};
pub use decoration::{Decoration, DecorationPosition, DecorationScope, DecorationSize};
pub use length::{format_number, round_to, Length, LengthParseError, LengthUnit};
pub use section::{
    AlignItems, FlexDirection, GridArea, ImageSection, Importance, JustifyContent, LayoutBox,
    LayoutMode, Placement, Section, SectionBase, TextSection,
};
pub use style::{Insets, Shadow, Stroke, TextAlign, TextStyle};
pub use template::{CanvasSize, ContentContainer, DocumentError, Template, TemplateKind};
