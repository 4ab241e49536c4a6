//! SVG preview through the full pipeline

use poster_layout::{
    normalize_gradient, render, render_with_config, LayoutConfig, RenderConfig, RenderError,
    SvgConfig,
};

const ARTICLE: &str = r##"{
    "kind": "long-article",
    "canvas": {"width": 800, "height": 1200},
    "backgroundColor": "#fafafa",
    "contentContainer": {"margin": {"top": 40, "right": 40, "bottom": 40, "left": 40},
                         "padding": {"top": 20, "right": 20, "bottom": 20, "left": 20},
                         "backgroundColor": "white", "borderRadius": 12},
    "layoutBoxes": [
        {"id": "intro", "backgroundColor": "radial-gradient(circle at 20% 30%, #ffffff, #cccccc)",
         "constraints": {"left": "0px", "right": "0px", "top": "0px", "height": "300px"},
         "sections": [
            {"type": "text", "id": "headline", "content": "Field notes\nfrom the coast",
             "style": {"fontSize": 40, "textAlign": "center", "color": "#222222"}},
            {"type": "image", "id": "hidden-photo", "imageUrl": "coast.jpg", "isVisible": false}
         ]}
    ],
    "decorations": [
        {"id": "gull", "imageUrl": "gull.png", "position": {"xPercent": 75, "yPx": 10}, "angle": -20, "zIndex": 5}
    ]
}"##;

#[test]
fn test_article_preview() {
    let svg = render(ARTICLE).expect("article renders");
    assert!(svg.contains(r#"viewBox="0 0 800 1200""#));
    assert!(svg.contains(r##"fill="#fafafa""##));
    assert!(svg.contains(r#"class="pl-content" x="40" y="40" width="720" height="1120""#));
    assert!(svg.contains(r#"<radialGradient id="pl-gradient-"#));
    assert!(svg.contains(r#"cx="20%" cy="30%""#));
    assert!(svg.contains(r#"<g id="intro">"#));
    assert!(svg.contains(r#"text-anchor="middle""#));
    assert!(svg.contains(">from the coast</tspan>"));
    assert!(!svg.contains("coast.jpg"));

    // Decorations paint above the boxes they share the root z-space with
    let intro = svg.find(r#"<g id="intro">"#).unwrap_or(usize::MAX);
    let gull = svg.find(r#"id="gull""#).unwrap_or(0);
    assert!(intro < gull);
    assert!(svg.contains("rotate(-20 "));
}

#[test]
fn test_config_is_applied() {
    let config = RenderConfig::new()
        .with_layout(LayoutConfig::default().with_box_size(50.0, 40.0))
        .with_svg(SvgConfig::new().with_padding(10.0).with_standalone(false).with_pretty_print(false));
    let svg = render_with_config(
        r#"{"canvas": {"width": 100, "height": 100}, "layoutBoxes": [{"id": "a", "backgroundColor": "red"}]}"#,
        &config,
    )
    .expect("document renders");
    assert!(svg.starts_with("<svg"));
    assert!(!svg.contains('\n'));
    assert!(svg.contains(r#"viewBox="-10 -10 120 120""#));
    assert!(svg.contains(r#"x="20" y="20" width="50" height="40""#));
}

#[test]
fn test_gradient_normalization() {
    assert_eq!(
        normalize_gradient("conic-gradient(red, blue)").expect("valid gradient"),
        "conic-gradient(from 0deg at 50% 50%, red 0%, blue 100%)"
    );
    match normalize_gradient("linear-gradient(90deg, red; blue)") {
        Err(RenderError::Parse(errors)) => assert!(!errors.is_empty()),
        other => panic!("expected parse errors, got {other:?}"),
    }
}

#[test]
fn test_editor_preview_options() {
    let config = RenderConfig::new().with_svg(
        SvgConfig::new()
            .with_background(false)
            .with_hidden_opacity(0.4),
    );
    let svg = render_with_config(ARTICLE, &config).expect("article renders");
    assert!(!svg.contains(r##"fill="#fafafa""##));
    assert!(!svg.contains(r#"class="pl-content""#));
    assert!(svg.contains(r#"<g class="pl-hidden" opacity="0.4">"#));
    assert!(svg.contains("coast.jpg"));
}
