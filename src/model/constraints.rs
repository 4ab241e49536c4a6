//! Constraint records and their per-axis interpretation

use serde::{Deserialize, Serialize};

use super::length::Length;

/// Declarative positioning rules of a box, as persisted in documents.
///
/// The record form allows conflicting combinations; [`Constraints::horizontal`]
/// and [`Constraints::vertical`] interpret it with the normalization
/// precedence so that every record maps to exactly one [`AxisConstraint`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_x: Option<Length>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center_y: Option<Length>,
}

/// Individually addressable constraint fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintField {
    Top,
    Bottom,
    Left,
    Right,
    Width,
    Height,
    CenterX,
    CenterY,
}

impl ConstraintField {
    pub fn all() -> &'static [ConstraintField] {
        &[
            Self::Top,
            Self::Bottom,
            Self::Left,
            Self::Right,
            Self::Width,
            Self::Height,
            Self::CenterX,
            Self::CenterY,
        ]
    }

    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::Left | Self::Right | Self::Width | Self::CenterX)
    }
}

/// One axis of a constraint set, reduced to the combination that drives it.
///
/// `start`/`end` are left/right on the horizontal axis and top/bottom on the
/// vertical axis; `offset` is the distance of the box centre from the parent
/// centre.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisConstraint {
    /// Pinned on both edges, size derived
    Edges { start: Length, end: Length },
    StartSize { start: Length, size: Length },
    EndSize { end: Length, size: Length },
    Center { offset: Length, size: Length },
    /// Only a start edge; size falls back to a default
    Start { start: Length },
    End { end: Length },
    Size { size: Length },
    Unset,
}

impl AxisConstraint {
    fn from_fields(
        start: Option<Length>,
        end: Option<Length>,
        size: Option<Length>,
        center: Option<Length>,
    ) -> Self {
        if let Some(offset) = center {
            return Self::Center {
                offset,
                size: size.unwrap_or(Length::Percent(50.0)),
            };
        }
        match (start, end, size) {
            (Some(start), Some(end), _) => Self::Edges { start, end },
            (Some(start), None, Some(size)) => Self::StartSize { start, size },
            (None, Some(end), Some(size)) => Self::EndSize { end, size },
            (Some(start), None, None) => Self::Start { start },
            (None, Some(end), None) => Self::End { end },
            (None, None, Some(size)) => Self::Size { size },
            (None, None, None) => Self::Unset,
        }
    }

    /// Fields in (start, end, size, center) order
    fn into_fields(self) -> [Option<Length>; 4] {
        match self {
            Self::Edges { start, end } => [Some(start), Some(end), None, None],
            Self::StartSize { start, size } => [Some(start), None, Some(size), None],
            Self::EndSize { end, size } => [None, Some(end), Some(size), None],
            Self::Center { offset, size } => [None, None, Some(size), Some(offset)],
            Self::Start { start } => [Some(start), None, None, None],
            Self::End { end } => [None, Some(end), None, None],
            Self::Size { size } => [None, None, Some(size), None],
            Self::Unset => [None, None, None, None],
        }
    }

    /// Whether both position and size can be resolved from this axis alone
    pub fn is_resolvable(&self) -> bool {
        matches!(
            self,
            Self::Edges { .. } | Self::StartSize { .. } | Self::EndSize { .. } | Self::Center { .. }
        )
    }

    /// Whether the axis pins a position (edge or centre)
    pub fn pins_position(&self) -> bool {
        !matches!(self, Self::Size { .. } | Self::Unset)
    }

    /// The explicit size, if this axis stores one
    pub fn size(&self) -> Option<Length> {
        match self {
            Self::StartSize { size, .. }
            | Self::EndSize { size, .. }
            | Self::Center { size, .. }
            | Self::Size { size } => Some(*size),
            _ => None,
        }
    }

    pub fn lengths_mut(&mut self) -> Vec<&mut Length> {
        match self {
            Self::Edges { start, end } => vec![start, end],
            Self::StartSize { start, size } => vec![start, size],
            Self::EndSize { end, size } => vec![end, size],
            Self::Center { offset, size } => vec![offset, size],
            Self::Start { start } => vec![start],
            Self::End { end } => vec![end],
            Self::Size { size } => vec![size],
            Self::Unset => vec![],
        }
    }
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from two axis interpretations
    pub fn from_axes(horizontal: AxisConstraint, vertical: AxisConstraint) -> Self {
        let [left, right, width, center_x] = horizontal.into_fields();
        let [top, bottom, height, center_y] = vertical.into_fields();
        Self {
            top,
            bottom,
            left,
            right,
            width,
            height,
            center_x,
            center_y,
        }
    }

    pub fn horizontal(&self) -> AxisConstraint {
        AxisConstraint::from_fields(self.left, self.right, self.width, self.center_x)
    }

    pub fn vertical(&self) -> AxisConstraint {
        AxisConstraint::from_fields(self.top, self.bottom, self.height, self.center_y)
    }

    pub fn get(&self, field: ConstraintField) -> Option<Length> {
        match field {
            ConstraintField::Top => self.top,
            ConstraintField::Bottom => self.bottom,
            ConstraintField::Left => self.left,
            ConstraintField::Right => self.right,
            ConstraintField::Width => self.width,
            ConstraintField::Height => self.height,
            ConstraintField::CenterX => self.center_x,
            ConstraintField::CenterY => self.center_y,
        }
    }

    pub fn slot_mut(&mut self, field: ConstraintField) -> &mut Option<Length> {
        match field {
            ConstraintField::Top => &mut self.top,
            ConstraintField::Bottom => &mut self.bottom,
            ConstraintField::Left => &mut self.left,
            ConstraintField::Right => &mut self.right,
            ConstraintField::Width => &mut self.width,
            ConstraintField::Height => &mut self.height,
            ConstraintField::CenterX => &mut self.center_x,
            ConstraintField::CenterY => &mut self.center_y,
        }
    }

    /// Every stored length, in field order
    pub fn lengths_mut(&mut self) -> impl Iterator<Item = &mut Length> {
        [
            &mut self.top,
            &mut self.bottom,
            &mut self.left,
            &mut self.right,
            &mut self.width,
            &mut self.height,
            &mut self.center_x,
            &mut self.center_y,
        ]
        .into_iter()
        .flatten()
    }

    pub fn is_empty(&self) -> bool {
        ConstraintField::all().iter().all(|f| self.get(*f).is_none())
    }

    pub fn with(mut self, field: ConstraintField, value: Length) -> Self {
        *self.slot_mut(field) = Some(value);
        self
    }

    /// Whether any edge or centre pin is present on either axis
    pub fn pins_position(&self) -> bool {
        self.horizontal().pins_position() || self.vertical().pins_position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_defaults_size_to_half() {
        let c = Constraints::new().with(ConstraintField::CenterX, Length::Px(0.0));
        assert_eq!(
            c.horizontal(),
            AxisConstraint::Center {
                offset: Length::Px(0.0),
                size: Length::Percent(50.0)
            }
        );
    }

    #[test]
    fn test_center_wins_over_edges() {
        let c = Constraints::new()
            .with(ConstraintField::Left, Length::Px(10.0))
            .with(ConstraintField::CenterX, Length::Px(5.0))
            .with(ConstraintField::Width, Length::Px(100.0));
        assert!(matches!(c.horizontal(), AxisConstraint::Center { .. }));
    }

    #[test]
    fn test_edges_drop_size() {
        let c = Constraints::new()
            .with(ConstraintField::Top, Length::Px(1.0))
            .with(ConstraintField::Bottom, Length::Px(2.0))
            .with(ConstraintField::Height, Length::Px(3.0));
        let v = c.vertical();
        assert_eq!(
            v,
            AxisConstraint::Edges {
                start: Length::Px(1.0),
                end: Length::Px(2.0)
            }
        );
        assert_eq!(v.size(), None);
    }

    #[test]
    fn test_from_axes_round_trip() {
        let c = Constraints::new()
            .with(ConstraintField::Right, Length::Percent(5.0))
            .with(ConstraintField::Width, Length::Px(80.0))
            .with(ConstraintField::CenterY, Length::Px(-10.0))
            .with(ConstraintField::Height, Length::Px(40.0));
        let rebuilt = Constraints::from_axes(c.horizontal(), c.vertical());
        assert_eq!(rebuilt, c);
    }

    #[test]
    fn test_json_field_names() {
        let c: Constraints =
            serde_json::from_str(r#"{"centerX":"0px","width":"200px"}"#).unwrap();
        assert_eq!(c.center_x, Some(Length::Px(0.0)));
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"width":"200px","centerX":"0px"}"#);
    }
}
