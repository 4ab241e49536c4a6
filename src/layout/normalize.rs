//! Constraint normalization and editor-driven constraint updates
//!
//! Normalizing is a round trip through [`AxisConstraint`]: the per-axis
//! interpretation already encodes the precedence rules (centre beats edges,
//! two edges drop the size, a centre without size gets 50%), so writing it
//! back as a record yields the canonical form.

use serde::Serialize;

use crate::model::{AxisConstraint, ConstraintField, Constraints, Length};

use super::config::LayoutConfig;

/// Canonical form of a constraint set. Idempotent and total.
pub fn normalize_constraints(constraints: &Constraints) -> Constraints {
    Constraints::from_axes(constraints.horizontal(), constraints.vertical())
}

/// Apply one field edit the way the constraint panel does, then normalize.
///
/// Pinning an edge releases the centre on that axis and vice versa. Setting
/// a size while both edges are pinned releases the far edge so the new size
/// takes effect. `None` clears the field.
pub fn apply_constraint_update(
    current: &Constraints,
    field: ConstraintField,
    value: Option<Length>,
) -> Constraints {
    let mut next = current.clone();
    if let Some(value) = value {
        match field {
            ConstraintField::Left | ConstraintField::Right => next.center_x = None,
            ConstraintField::Top | ConstraintField::Bottom => next.center_y = None,
            ConstraintField::CenterX => {
                next.left = None;
                next.right = None;
            }
            ConstraintField::CenterY => {
                next.top = None;
                next.bottom = None;
            }
            ConstraintField::Width => {
                if next.left.is_some() && next.right.is_some() {
                    next.right = None;
                }
            }
            ConstraintField::Height => {
                if next.top.is_some() && next.bottom.is_some() {
                    next.bottom = None;
                }
            }
        }
        *next.slot_mut(field) = Some(value);
    } else {
        *next.slot_mut(field) = None;
    }
    normalize_constraints(&next)
}

/// Which axes of a constraint set resolve on their own
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Resolvability {
    pub horizontal: bool,
    pub vertical: bool,
}

impl Resolvability {
    pub fn is_complete(&self) -> bool {
        self.horizontal && self.vertical
    }
}

pub fn resolvability(constraints: &Constraints) -> Resolvability {
    Resolvability {
        horizontal: constraints.horizontal().is_resolvable(),
        vertical: constraints.vertical().is_resolvable(),
    }
}

fn fill_axis(axis: AxisConstraint, start: f64, size: f64) -> AxisConstraint {
    let start = Length::Px(start);
    let size = Length::Px(size);
    match axis {
        AxisConstraint::Unset => AxisConstraint::StartSize { start, size },
        AxisConstraint::Start { start } => AxisConstraint::StartSize { start, size },
        AxisConstraint::End { end } => AxisConstraint::EndSize { end, size },
        AxisConstraint::Size { size } => AxisConstraint::StartSize { start, size },
        resolvable => resolvable,
    }
}

/// Complete every unresolvable axis with the configured default box
pub fn with_defaults(constraints: &Constraints, config: &LayoutConfig) -> Constraints {
    let (left, top) = config.default_position;
    let (width, height) = config.default_box_size;
    Constraints::from_axes(
        fill_axis(constraints.horizontal(), left, width),
        fill_axis(constraints.vertical(), top, height),
    )
}
