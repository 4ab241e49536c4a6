//! Anchor resolution and conversion between anchored and constrained boxes

use crate::model::{
    Anchor, AnchorOffset, AttachmentMode, Constraints, HorizontalOrigin, Length, LengthUnit,
    OriginPoint, Placement, Template, VerticalOrigin,
};

use super::config::LayoutConfig;
use super::engine::{content_area, resolve_template};
use super::types::{PixelBounds, Point, Size};

/// The named point of `target` selected by `origin`
pub fn origin_point(origin: OriginPoint, target: &PixelBounds) -> Point {
    let x = match origin.horizontal() {
        HorizontalOrigin::Left => target.left,
        HorizontalOrigin::Center => target.center_x(),
        HorizontalOrigin::Right => target.right(),
    };
    let y = match origin.vertical() {
        VerticalOrigin::Top => target.top,
        VerticalOrigin::Center => target.center_y(),
        VerticalOrigin::Bottom => target.bottom(),
    };
    Point::new(x, y)
}

/// Top-left corner of an anchored element.
///
/// The origin point of the target plus the offset; percentage offsets are
/// resolved against the parent size. The attachment mode does not take part.
pub fn resolve_anchor(anchor: &Anchor, target: &PixelBounds, parent: Size) -> Point {
    let origin = origin_point(anchor.origin_point, target);
    Point::new(
        origin.x + anchor.offset.x.resolve(parent.width),
        origin.y + anchor.offset.y.resolve(parent.height),
    )
}

/// One-time conversion of an anchor into absolute constraints.
///
/// `parent` is the content box the element is positioned in. The horizontal
/// position becomes a percentage of the parent width and the vertical one a
/// whole pixel value, the same split decorations use.
pub fn detach_anchor(anchor: &Anchor, target: &PixelBounds, parent: &PixelBounds) -> Constraints {
    position_constraints(resolve_anchor(anchor, target, parent.size()), parent)
}

fn position_constraints(position: Point, parent: &PixelBounds) -> Constraints {
    let x = position.x - parent.left;
    let y = position.y - parent.top;
    Constraints {
        left: Some(Length::Px(x).convert(LengthUnit::Percent, parent.width)),
        top: Some(Length::Px(y.round())),
        ..Default::default()
    }
}

/// Detach an anchored box inside a document, pinning it where it currently
/// resolves and keeping its explicit size.
///
/// Returns the constraints written to the box, or `None` when the document
/// has no anchored box with that id.
pub fn detach_anchor_in_document(
    template: &mut Template,
    box_id: &str,
    config: &LayoutConfig,
) -> Option<Constraints> {
    let layout = resolve_template(template, config);
    let element = layout.get(box_id)?;
    let parent = element
        .parent
        .as_deref()
        .and_then(|id| layout.get(id))
        .and_then(|p| p.content_box)
        .unwrap_or_else(|| content_area(template));
    let current = element.bounds;

    let layout_box = template.find_box_mut(box_id)?;
    let constraints = match layout_box.placement.outside_grid() {
        Placement::Anchored {
            anchor,
            width,
            height,
        } => {
            let mut constraints = match layout.bounds(&anchor.element_id) {
                Some(target) => detach_anchor(anchor, &target, &parent),
                None => position_constraints(Point::new(current.left, current.top), &parent),
            };
            constraints.width = *width;
            constraints.height = *height;
            constraints
        }
        _ => return None,
    };
    log::debug!("detached '{}' from its anchor", box_id);
    *layout_box.placement.outside_grid_mut() = Placement::Constrained(constraints.clone());
    Some(constraints)
}

/// Default offset for a freshly created anchor.
///
/// Outside attachment puts the element beyond the target edge named by the
/// origin, `gap` pixels away; inside attachment insets it by `gap` from that
/// edge. Centre components centre the element on the origin in both modes.
pub fn suggest_offset(
    origin: OriginPoint,
    mode: AttachmentMode,
    size: Size,
    gap: f64,
) -> AnchorOffset {
    let (before_x, after_x) = match mode {
        AttachmentMode::Outside => (-(size.width + gap), gap),
        AttachmentMode::Inside => (gap, -(size.width + gap)),
    };
    let (before_y, after_y) = match mode {
        AttachmentMode::Outside => (-(size.height + gap), gap),
        AttachmentMode::Inside => (gap, -(size.height + gap)),
    };
    let x = match origin.horizontal() {
        HorizontalOrigin::Left => before_x,
        HorizontalOrigin::Center => -size.width / 2.0,
        HorizontalOrigin::Right => after_x,
    };
    let y = match origin.vertical() {
        VerticalOrigin::Top => before_y,
        VerticalOrigin::Center => -size.height / 2.0,
        VerticalOrigin::Bottom => after_y,
    };
    AnchorOffset::px(x.round(), y.round())
}

/// Switch a placement to anchor mode, keeping its explicit size and any grid lines
pub fn attach_anchor(placement: &Placement, anchor: Anchor) -> Placement {
    let (width, height) = placement.explicit_size();
    let anchored = Placement::Anchored {
        anchor,
        width,
        height,
    };
    match placement {
        Placement::GridItem { area, .. } => Placement::grid_item(area.clone(), anchored),
        _ => anchored,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ConstraintField, GridArea};

    fn target() -> PixelBounds {
        PixelBounds::new(100.0, 200.0, 50.0, 40.0)
    }

    #[test]
    fn test_all_origin_points() {
        let expected = [
            (100.0, 200.0),
            (125.0, 200.0),
            (150.0, 200.0),
            (100.0, 220.0),
            (125.0, 220.0),
            (150.0, 220.0),
            (100.0, 240.0),
            (125.0, 240.0),
            (150.0, 240.0),
        ];
        for (origin, (x, y)) in OriginPoint::all().iter().zip(expected) {
            assert_eq!(origin_point(*origin, &target()), Point::new(x, y), "{:?}", origin);
        }
    }

    #[test]
    fn test_offset_adds_to_origin() {
        let anchor = Anchor::new("t", OriginPoint::BottomLeft).with_offset(AnchorOffset {
            x: Length::Percent(10.0),
            y: Length::Px(-5.0),
        });
        let p = resolve_anchor(&anchor, &target(), Size::new(1000.0, 500.0));
        assert_eq!(p, Point::new(200.0, 235.0));
    }

    #[test]
    fn test_attachment_mode_does_not_move_anchor() {
        let outside = Anchor::new("t", OriginPoint::TopRight);
        let inside = outside.clone().with_mode(AttachmentMode::Inside);
        let parent = Size::new(500.0, 500.0);
        assert_eq!(
            resolve_anchor(&outside, &target(), parent),
            resolve_anchor(&inside, &target(), parent)
        );
    }

    #[test]
    fn test_detach_writes_percent_left_and_px_top() {
        let anchor = Anchor::new("t", OriginPoint::TopRight).with_offset(AnchorOffset::px(10.0, 0.5));
        let parent = PixelBounds::new(0.0, 0.0, 800.0, 600.0);
        let c = detach_anchor(&anchor, &target(), &parent);
        assert_eq!(c.left, Some(Length::Percent(20.0)));
        assert_eq!(c.top, Some(Length::Px(201.0)));
        assert_eq!(c.get(ConstraintField::CenterX), None);
    }

    #[test]
    fn test_detach_is_relative_to_parent() {
        let anchor = Anchor::new("t", OriginPoint::TopLeft);
        let parent = PixelBounds::new(50.0, 100.0, 200.0, 200.0);
        let c = detach_anchor(&anchor, &target(), &parent);
        assert_eq!(c.left, Some(Length::Percent(25.0)));
        assert_eq!(c.top, Some(Length::Px(100.0)));
    }

    #[test]
    fn test_detach_in_document_keeps_position() {
        let target = crate::model::LayoutBox::new("target").with_constraints(Constraints {
            left: Some(Length::Px(100.0)),
            top: Some(Length::Px(100.0)),
            width: Some(Length::Px(200.0)),
            height: Some(Length::Px(50.0)),
            ..Default::default()
        });
        let follower = crate::model::LayoutBox::new("follower").with_placement(Placement::Anchored {
            anchor: Anchor::new("target", OriginPoint::BottomLeft).with_offset(AnchorOffset::px(0.0, 10.0)),
            width: Some(Length::Px(80.0)),
            height: Some(Length::Px(20.0)),
        });
        let mut template = Template::new(1000.0, 1000.0).with_box(target).with_box(follower);
        let config = LayoutConfig::default();
        let before = resolve_template(&template, &config).bounds("follower");

        let c = detach_anchor_in_document(&mut template, "follower", &config).unwrap();
        assert_eq!(c.left, Some(Length::Percent(10.0)));
        assert_eq!(c.top, Some(Length::Px(160.0)));
        assert_eq!(c.width, Some(Length::Px(80.0)));
        assert_eq!(resolve_template(&template, &config).bounds("follower"), before);
        assert!(detach_anchor_in_document(&mut template, "follower", &config).is_none());
        assert!(detach_anchor_in_document(&mut template, "missing", &config).is_none());
    }

    #[test]
    fn test_suggest_offset_outside_and_inside() {
        let size = Size::new(60.0, 30.0);
        assert_eq!(
            suggest_offset(OriginPoint::CenterRight, AttachmentMode::Outside, size, 10.0),
            AnchorOffset::px(10.0, -15.0)
        );
        assert_eq!(
            suggest_offset(OriginPoint::TopLeft, AttachmentMode::Outside, size, 10.0),
            AnchorOffset::px(-70.0, -40.0)
        );
        assert_eq!(
            suggest_offset(OriginPoint::BottomRight, AttachmentMode::Inside, size, 10.0),
            AnchorOffset::px(-70.0, -40.0)
        );
    }

    #[test]
    fn test_attach_keeps_size() {
        let placement = Placement::Constrained(Constraints {
            left: Some(Length::Px(0.0)),
            width: Some(Length::Px(120.0)),
            height: Some(Length::Percent(10.0)),
            ..Default::default()
        });
        let anchored = attach_anchor(&placement, Anchor::new("t", OriginPoint::Center));
        assert_eq!(
            anchored.explicit_size(),
            (Some(Length::Px(120.0)), Some(Length::Percent(10.0)))
        );
        assert!(anchored.anchor().is_some());
    }

    #[test]
    fn test_attach_keeps_grid_lines() {
        let area = GridArea {
            column: Some("2".to_string()),
            row: None,
        };
        let placement = Placement::grid_item(area.clone(), Placement::default());
        let attached = attach_anchor(&placement, Anchor::new("t", OriginPoint::TopLeft));
        match &attached {
            Placement::GridItem { area: kept, .. } => assert_eq!(kept, &area),
            other => panic!("expected grid item, got {:?}", other),
        }
        assert_eq!(attached.anchor().map(|a| a.element_id.as_str()), Some("t"));
    }
}
