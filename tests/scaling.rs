//! Whole-document scaling

use poster_layout::model::{Constraints, Length};
use poster_layout::{scale_template, Template};
use pretty_assertions::assert_eq;

const POSTER: &str = r#"{
    "id": "poster",
    "canvas": {"width": 1080, "height": 1080},
    "layoutBoxes": [
        {"id": "hero", "constraints": {"top": "10%", "left": "10%", "width": "80%", "height": "20%"}},
        {"id": "card", "borderRadius": 20, "paddingTop": 12, "gap": 9, "rotation": 15,
         "constraints": {"left": "40px", "top": "600px", "width": "300px", "height": "200px"},
         "sections": [
            {"type": "text", "id": "title", "content": "Hi", "style": {"fontSize": 30, "lineHeight": 1.2}}
         ]}
    ],
    "decorations": [
        {"id": "star", "imageUrl": "star.png", "position": {"xPercent": 50, "yPx": 100}, "angle": 30, "borderRadius": 6}
    ]
}"#;

fn poster() -> Template {
    Template::from_json(POSTER).expect("poster should load")
}

fn constraints(template: &Template, index: usize) -> &Constraints {
    template.layout_boxes[index]
        .placement
        .constraints()
        .expect("constrained box")
}

#[test]
fn test_rescale_poster_to_wider_canvas() {
    let mut template = poster();
    let factor = template.rescale_to_width(1920.0);
    assert!((factor - 1920.0 / 1080.0).abs() < 1e-9);

    assert_eq!(constraints(&template, 0), constraints(&poster(), 0));
    assert_eq!(constraints(&template, 0).left, Some(Length::Percent(10.0)));

    let card = &template.layout_boxes[1];
    assert_eq!(card.border_radius, Some(36.0));
    assert_eq!(card.padding_top, Some(21.0));
    assert_eq!(card.gap, Some(16.0));
    assert_eq!(card.base.rotation, Some(15.0));
    assert_eq!(constraints(&template, 1).left, Some(Length::Px(71.0)));

    assert_eq!(template.canvas.width, 1920.0);
    assert_eq!(template.decorations[0].position.y_px, 178.0);
    assert_eq!(template.decorations[0].position.x_percent, 50.0);
    assert_eq!(template.decorations[0].angle, 30.0);
}

#[test]
fn test_scaling_there_and_back_stays_within_a_pixel() {
    let original = poster();
    let mut template = original.clone();
    let Template {
        layout_boxes,
        decorations,
        content_container,
        ..
    } = &mut template;
    scale_template(layout_boxes, decorations, content_container, 2.0 / 3.0);
    scale_template(layout_boxes, decorations, content_container, 1.5);

    let before = original.layout_boxes[1].border_radius.unwrap_or_default();
    let after = template.layout_boxes[1].border_radius.unwrap_or_default();
    assert!((before - after).abs() <= 1.0);

    let width = |t: &Template| constraints(t, 1).width.map(|w| w.value()).unwrap_or_default();
    assert!((width(&original) - width(&template)).abs() <= 1.0);
}

#[test]
fn test_scaling_keeps_unrelated_fields() {
    let mut template = poster();
    template.scale(2.0);
    let json = template.to_json().expect("serializable");
    let reloaded = Template::from_json(&json).expect("reloadable");
    assert_eq!(reloaded, template);
    assert_eq!(reloaded.id, "poster");
}
