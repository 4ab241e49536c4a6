//! SVG preview of a resolved document

use crate::color::{Fill, Gradient, GradientStop, Rgba};
use crate::layers::{paint_order, section_paint_order, NodeRef};
use crate::layout::{LayoutResult, PixelBounds, Point};
use crate::model::{
    format_number, Decoration, ImageSection, LayoutBox, Section, Template, TemplateKind,
    TextAlign, TextSection,
};

use super::SvgConfig;

const DEFAULT_FONT_SIZE: f64 = 16.0;
const DEFAULT_LINE_HEIGHT: f64 = 1.5;

/// Build SVG elements incrementally
pub struct SvgBuilder {
    config: SvgConfig,
    defs: Vec<String>,
    elements: Vec<String>,
    gradients: usize,
    indent: usize,
}

impl SvgBuilder {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            defs: vec![],
            elements: vec![],
            gradients: 0,
            indent: 1,
        }
    }

    fn prefix(&self) -> String {
        self.config.class_prefix.clone().unwrap_or_default()
    }

    fn indent_str(&self) -> String {
        if self.config.pretty_print {
            "  ".repeat(self.indent)
        } else {
            String::new()
        }
    }

    fn newline(&self) -> &str {
        if self.config.pretty_print {
            "\n"
        } else {
            ""
        }
    }

    /// Paint value for a background string: a plain color, or a reference
    /// to a gradient definition added on the fly. Conic gradients have no
    /// SVG equivalent and paint their first stop.
    pub fn add_fill(&mut self, background: &str) -> String {
        match Fill::parse(background) {
            Fill::Solid(color) => escape_xml(&color),
            Fill::Gradient(gradient) => {
                self.gradients += 1;
                let id = format!("{}gradient-{}", self.prefix(), self.gradients);
                match gradient_def(&id, &gradient) {
                    Some(def) => {
                        self.defs.push(def);
                        format!("url(#{})", id)
                    }
                    None => escape_xml(gradient.representative_color().unwrap_or("#000000")),
                }
            }
        }
    }

    /// Add a rectangle element
    pub fn add_rect(&mut self, id: Option<&str>, bounds: &PixelBounds, class: &str, styles: &str) {
        let prefix = self.prefix();
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        self.elements.push(format!(
            r#"{}<rect{} class="{}{}" x="{}" y="{}" width="{}" height="{}"{}/>"#,
            self.indent_str(),
            id_attr,
            prefix,
            class,
            format_number(bounds.left),
            format_number(bounds.top),
            format_number(bounds.width),
            format_number(bounds.height),
            styles
        ));
    }

    /// Add an image element stretched over `bounds`
    pub fn add_image(&mut self, id: Option<&str>, bounds: &PixelBounds, href: &str, class: &str, styles: &str) {
        let prefix = self.prefix();
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        self.elements.push(format!(
            r#"{}<image{} class="{}{}" x="{}" y="{}" width="{}" height="{}" href="{}" preserveAspectRatio="xMidYMid slice"{}/>"#,
            self.indent_str(),
            id_attr,
            prefix,
            class,
            format_number(bounds.left),
            format_number(bounds.top),
            format_number(bounds.width),
            format_number(bounds.height),
            escape_xml(href),
            styles
        ));
    }

    /// Add a text element, one `tspan` per line
    pub fn add_text(&mut self, id: Option<&str>, lines: &[&str], origin: Point, line_step: f64, anchor: &str, styles: &str) {
        let Point { x, y } = origin;
        let prefix = self.prefix();
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        let spans: String = lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                let dy = if i == 0 { 0.0 } else { line_step };
                format!(
                    r#"<tspan x="{}" dy="{}">{}</tspan>"#,
                    format_number(x),
                    format_number(dy),
                    escape_xml(line)
                )
            })
            .collect();
        self.elements.push(format!(
            r#"{}<text{} class="{}text" x="{}" y="{}" text-anchor="{}" dominant-baseline="hanging"{}>{}</text>"#,
            self.indent_str(),
            id_attr,
            prefix,
            format_number(x),
            format_number(y),
            anchor,
            styles,
            spans
        ));
    }

    /// Add a group element, optionally transformed
    pub fn start_group(&mut self, id: Option<&str>, transform: Option<&str>) {
        let id_attr = id.map(|i| format!(r#" id="{}""#, escape_xml(i))).unwrap_or_default();
        let transform_attr = transform
            .map(|t| format!(r#" transform="{}""#, t))
            .unwrap_or_default();
        self.elements
            .push(format!("{}<g{}{}>", self.indent_str(), id_attr, transform_attr));
        self.indent += 1;
    }

    /// Open a faded group for a node marked invisible. Returns false, opening
    /// nothing, when hidden nodes are left out of the preview.
    pub fn start_hidden_group(&mut self) -> bool {
        let Some(opacity) = self.config.hidden_opacity else {
            return false;
        };
        self.elements.push(format!(
            r#"{}<g class="{}hidden" opacity="{}">"#,
            self.indent_str(),
            self.prefix(),
            format_number(opacity)
        ));
        self.indent += 1;
        true
    }

    /// Close a group element
    pub fn end_group(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.elements.push(format!("{}</g>", self.indent_str()));
    }

    /// Build the final SVG string
    pub fn build(self, canvas: PixelBounds) -> String {
        let padding = self.config.padding;
        let nl = self.newline();
        let mut svg = String::new();

        if self.config.standalone {
            svg.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
            svg.push_str(nl);
        }

        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="{} {} {} {}">"#,
            format_number(canvas.width + 2.0 * padding),
            format_number(canvas.height + 2.0 * padding),
            format_number(canvas.left - padding),
            format_number(canvas.top - padding),
            format_number(canvas.width + 2.0 * padding),
            format_number(canvas.height + 2.0 * padding)
        ));
        svg.push_str(nl);

        if !self.defs.is_empty() {
            let inner = if self.config.pretty_print { "    " } else { "" };
            let outer = if self.config.pretty_print { "  " } else { "" };
            svg.push_str(outer);
            svg.push_str("<defs>");
            svg.push_str(nl);
            for def in &self.defs {
                svg.push_str(inner);
                svg.push_str(def);
                svg.push_str(nl);
            }
            svg.push_str(outer);
            svg.push_str("</defs>");
            svg.push_str(nl);
        }

        for elem in &self.elements {
            svg.push_str(elem);
            svg.push_str(nl);
        }

        svg.push_str("</svg>");
        svg
    }
}

fn stop_def(stop: &GradientStop) -> String {
    let color = Rgba::parse(&stop.color);
    let opacity = if color.a < 1.0 {
        format!(r#" stop-opacity="{}""#, format_number(color.a))
    } else {
        String::new()
    };
    format!(
        r##"<stop offset="{}%" stop-color="#{:02x}{:02x}{:02x}"{}/>"##,
        format_number(stop.position * 100.0),
        color.r,
        color.g,
        color.b,
        opacity
    )
}

/// `<linearGradient>` / `<radialGradient>` definition, `None` for conic
/// gradients
pub fn gradient_def(id: &str, gradient: &Gradient) -> Option<String> {
    let stops: String = gradient.sorted_stops().into_iter().map(stop_def).collect();
    match gradient {
        Gradient::Linear { angle, .. } => {
            // CSS angles point up at 0deg and turn clockwise
            let (sin, cos) = angle.to_radians().sin_cos();
            Some(format!(
                r#"<linearGradient id="{}" x1="{}" y1="{}" x2="{}" y2="{}">{}</linearGradient>"#,
                id,
                format_number(0.5 - sin / 2.0),
                format_number(0.5 + cos / 2.0),
                format_number(0.5 + sin / 2.0),
                format_number(0.5 - cos / 2.0),
                stops
            ))
        }
        Gradient::Radial { position, .. } => Some(format!(
            r#"<radialGradient id="{}" cx="{}%" cy="{}%" r="50%">{}</radialGradient>"#,
            id,
            format_number(position.x),
            format_number(position.y),
            stops
        )),
        Gradient::Conic { .. } => None,
    }
}

/// Rotation about the centre of `bounds`, if any
fn rotation(angle: Option<f64>, bounds: &PixelBounds) -> Option<String> {
    let angle = angle.filter(|a| *a % 360.0 != 0.0)?;
    Some(format!(
        "rotate({} {} {})",
        format_number(angle),
        format_number(bounds.center_x()),
        format_number(bounds.center_y())
    ))
}

fn radius_attr(radius: Option<f64>) -> String {
    match radius {
        Some(r) if r > 0.0 => format!(r#" rx="{}""#, format_number(r)),
        _ => String::new(),
    }
}

fn render_text(text: &TextSection, bounds: &PixelBounds, builder: &mut SvgBuilder) {
    let style = &text.style;
    let font_size = style.font_size.unwrap_or(DEFAULT_FONT_SIZE);
    let line_step = font_size * style.line_height.unwrap_or(DEFAULT_LINE_HEIGHT);
    let (anchor, x) = match style.text_align {
        Some(TextAlign::Center) => ("middle", bounds.center_x()),
        Some(TextAlign::Right) => ("end", bounds.right()),
        _ => ("start", bounds.left),
    };

    let mut styles = format!(r#" font-size="{}""#, format_number(font_size));
    if let Some(color) = &style.color {
        styles.push_str(&format!(r#" fill="{}""#, escape_xml(color)));
    }
    if let Some(weight) = &style.font_weight {
        styles.push_str(&format!(r#" font-weight="{}""#, escape_xml(weight)));
    }
    if let Some(family) = &style.font_family {
        styles.push_str(&format!(r#" font-family="{}""#, escape_xml(family)));
    }
    if let Some(spacing) = style.letter_spacing {
        styles.push_str(&format!(r#" letter-spacing="{}""#, format_number(spacing)));
    }
    if let Some(stroke) = &style.text_stroke {
        styles.push_str(&format!(
            r#" stroke="{}" stroke-width="{}""#,
            escape_xml(&stroke.color),
            format_number(stroke.width)
        ));
    }

    let lines: Vec<&str> = text.content.lines().collect();
    let transform = rotation(text.base.rotation, bounds);
    if transform.is_some() {
        builder.start_group(None, transform.as_deref());
    }
    builder.add_text(Some(&text.id), &lines, Point::new(x, bounds.top), line_step, anchor, &styles);
    if transform.is_some() {
        builder.end_group();
    }
}

fn render_image(image: &ImageSection, bounds: &PixelBounds, builder: &mut SvgBuilder) {
    let transform = rotation(image.base.rotation, bounds);
    if transform.is_some() {
        builder.start_group(None, transform.as_deref());
    }
    builder.add_image(Some(&image.id), bounds, &image.image_url, "image", "");
    if transform.is_some() {
        builder.end_group();
    }
}

/// Paint a node, or its faded form when it is marked invisible
fn with_visibility(visible: bool, builder: &mut SvgBuilder, paint: impl FnOnce(&mut SvgBuilder)) {
    if visible {
        paint(builder);
    } else if builder.start_hidden_group() {
        paint(builder);
        builder.end_group();
    }
}

fn render_box(layout_box: &LayoutBox, layout: &LayoutResult, builder: &mut SvgBuilder) {
    with_visibility(layout_box.base.is_visible, builder, |builder| {
        paint_box(layout_box, layout, builder)
    });
}

fn paint_box(layout_box: &LayoutBox, layout: &LayoutResult, builder: &mut SvgBuilder) {
    let Some(bounds) = layout.bounds(&layout_box.id) else {
        log::debug!("box '{}' has no resolved bounds, not painting it", layout_box.id);
        return;
    };

    let transform = rotation(layout_box.base.rotation, &bounds);
    builder.start_group(Some(&layout_box.id), transform.as_deref());

    if let Some(background) = &layout_box.background_color {
        let fill = builder.add_fill(background);
        let styles = format!(r#" fill="{}"{}"#, fill, radius_attr(layout_box.border_radius));
        builder.add_rect(None, &bounds, "box", &styles);
    }
    if let Some(image) = &layout_box.background_image {
        builder.add_image(None, &bounds, image, "background", "");
    }

    for section in section_paint_order(layout_box) {
        let visible = section.base().is_visible;
        match section {
            Section::LayoutBox(child) => render_box(child, layout, builder),
            Section::Text(text) => {
                if let Some(b) = layout.bounds(&text.id) {
                    with_visibility(visible, builder, |builder| render_text(text, &b, builder));
                }
            }
            Section::Image(image) => {
                if let Some(b) = layout.bounds(&image.id) {
                    with_visibility(visible, builder, |builder| render_image(image, &b, builder));
                }
            }
        }
    }

    builder.end_group();
}

fn render_decoration(decoration: &Decoration, layout: &LayoutResult, builder: &mut SvgBuilder) {
    let Some(bounds) = layout.bounds(&decoration.id) else {
        return;
    };
    with_visibility(decoration.is_visible, builder, |builder| {
        paint_decoration(decoration, &bounds, builder)
    });
}

fn paint_decoration(decoration: &Decoration, bounds: &PixelBounds, builder: &mut SvgBuilder) {
    let mut styles = String::new();
    if let Some(opacity) = decoration.opacity {
        styles.push_str(&format!(r#" opacity="{}""#, format_number(opacity)));
    }
    let transform = rotation(Some(decoration.angle), bounds);
    if transform.is_some() {
        builder.start_group(None, transform.as_deref());
    }
    builder.add_image(Some(&decoration.id), bounds, &decoration.image_url, "decoration", &styles);
    if transform.is_some() {
        builder.end_group();
    }
}

/// Canvas color and, for long articles, the content frame
fn paint_backdrop(template: &Template, canvas: &PixelBounds, builder: &mut SvgBuilder) {
    if let Some(background) = &template.background_color {
        let fill = builder.add_fill(background);
        builder.add_rect(None, canvas, "canvas", &format!(r#" fill="{}""#, fill));
    }
    if template.kind == TemplateKind::LongArticle {
        let container = &template.content_container;
        if let Some(background) = &container.background_color {
            let margin = container.margin;
            let frame = canvas.inset(margin.top, margin.right, margin.bottom, margin.left);
            let fill = builder.add_fill(background);
            let styles = format!(r#" fill="{}"{}"#, fill, radius_attr(container.border_radius));
            builder.add_rect(None, &frame, "content", &styles);
        }
    }
}

/// Paint a document at its resolved bounds
pub fn render_svg(template: &Template, layout: &LayoutResult, config: &SvgConfig) -> String {
    let mut builder = SvgBuilder::new(config.clone());
    let canvas = PixelBounds::from_size(layout.canvas);

    if config.paint_background {
        paint_backdrop(template, &canvas, &mut builder);
    }

    for node in paint_order(template) {
        match node {
            NodeRef::RootBox(layout_box) => render_box(layout_box, layout, &mut builder),
            NodeRef::Decoration(decoration) => render_decoration(decoration, layout, &mut builder),
            NodeRef::Section(_) => {}
        }
    }

    builder.build(canvas)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::parse_gradient;
    use crate::layout::{resolve_template, LayoutConfig};
    use crate::model::{Constraints, Length};

    fn render(template: &Template) -> String {
        let layout = resolve_template(template, &LayoutConfig::default());
        render_svg(template, &layout, &SvgConfig::default())
    }

    fn card(id: &str) -> LayoutBox {
        LayoutBox::new(id).with_constraints(Constraints {
            left: Some(Length::Px(10.0)),
            top: Some(Length::Px(20.0)),
            width: Some(Length::Px(100.0)),
            height: Some(Length::Px(50.0)),
            ..Default::default()
        })
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a < b"), "a &lt; b");
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
    }

    #[test]
    fn test_linear_gradient_def() {
        let gradient = parse_gradient("linear-gradient(90deg, red, blue)").unwrap();
        insta::assert_snapshot!(gradient_def("g", &gradient).unwrap(), @r###"<linearGradient id="g" x1="0" y1="0.5" x2="1" y2="0.5"><stop offset="0%" stop-color="#ff0000"/><stop offset="100%" stop-color="#0000ff"/></linearGradient>"###);
    }

    #[test]
    fn test_conic_has_no_def() {
        let gradient = parse_gradient("conic-gradient(red, blue)").unwrap();
        assert!(gradient_def("g", &gradient).is_none());
    }

    #[test]
    fn test_render_box_with_gradient() {
        let mut b = card("hero");
        b.background_color = Some("linear-gradient(180deg, #fff, rgba(0,0,0,0.5))".into());
        b.border_radius = Some(8.0);
        let svg = render(&Template::new(200.0, 100.0).with_box(b));

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains(r#"viewBox="0 0 200 100""#));
        assert!(svg.contains(r#"<g id="hero">"#));
        assert!(svg.contains(r#"fill="url(#pl-gradient-1)""#));
        assert!(svg.contains(r#"stop-opacity="0.5""#));
        assert!(svg.contains(r#"x="10" y="20" width="100" height="50""#));
        assert!(svg.contains(r#"rx="8""#));
    }

    #[test]
    fn test_conic_background_paints_first_stop() {
        let mut b = card("hero");
        b.background_color = Some("conic-gradient(from 90deg, #123456, red)".into());
        let svg = render(&Template::new(200.0, 100.0).with_box(b));
        assert!(svg.contains(r##"fill="#123456""##));
        assert!(!svg.contains("<defs>"));
    }

    #[test]
    fn test_rotation_and_hidden_nodes() {
        let mut rotated = card("spin");
        rotated.base.rotation = Some(90.0);
        let mut hidden = card("ghost");
        hidden.base.is_visible = false;
        let svg = render(&Template::new(200.0, 100.0).with_box(rotated).with_box(hidden));
        assert!(svg.contains(r#"<g id="spin" transform="rotate(90 60 45)">"#));
        assert!(!svg.contains("ghost"));
    }

    #[test]
    fn test_hidden_nodes_can_be_shown_faded() {
        let mut hidden = card("ghost");
        hidden.base.is_visible = false;
        let mut deco = Decoration::new("shy", "shy.png");
        deco.is_visible = false;
        let template = Template::new(200.0, 100.0).with_box(hidden).with_decoration(deco);
        let layout = resolve_template(&template, &LayoutConfig::default());
        let config = SvgConfig::default().with_hidden_opacity(0.25);
        let svg = render_svg(&template, &layout, &config);
        assert!(svg.contains(r#"<g class="pl-hidden" opacity="0.25">"#));
        assert!(svg.contains(r#"<g id="ghost">"#));
        assert!(svg.contains(r#"id="shy""#));
        assert_eq!(svg.matches("<g").count(), svg.matches("</g>").count());
    }

    #[test]
    fn test_background_can_be_left_out() {
        let mut template = Template::new(200.0, 100.0).with_box(card("hero"));
        template.background_color = Some("#abcdef".into());
        let layout = resolve_template(&template, &LayoutConfig::default());

        let painted = render_svg(&template, &layout, &SvgConfig::default());
        assert!(painted.contains(r#"class="pl-canvas""#));

        let bare = render_svg(&template, &layout, &SvgConfig::default().with_background(false));
        assert!(!bare.contains(r#"class="pl-canvas""#));
        assert!(!bare.contains("#abcdef"));
        assert!(bare.contains(r#"<g id="hero">"#));
    }

    #[test]
    fn test_text_and_decorations() {
        let text = TextSection {
            id: "title".into(),
            content: "Hello\n<World>".into(),
            ..Default::default()
        };
        let mut deco = Decoration::new("star", "star.png").at(50.0, 0.0);
        deco.opacity = Some(0.5);
        let template = Template::new(200.0, 100.0)
            .with_box(card("hero").with_section(text))
            .with_decoration(deco);
        let svg = render(&template);
        assert!(svg.contains(r#"<text id="title""#));
        assert!(svg.contains("&lt;World&gt;</tspan>"));
        assert!(svg.contains(r#"<image id="star" class="pl-decoration" x="100" y="0""#));
        assert!(svg.contains(r#"opacity="0.5""#));
    }
}
