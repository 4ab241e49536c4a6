//! Resolution scaling for whole documents
//!
//! Pixel values are multiplied by a factor and rounded to whole pixels;
//! percentages, angles and unitless multipliers such as `lineHeight` are left
//! alone. Scaling by `f` and then by `1/f` lands within a pixel of the start.

use crate::layout::grid::scale_track_list;
use crate::model::{
    Anchor, ContentContainer, Decoration, LayoutBox, Length, Placement, Section, Shadow, Stroke,
    Template, TextStyle,
};

fn px(value: f64, factor: f64) -> f64 {
    (value * factor).round()
}

fn scale_opt(value: &mut Option<f64>, factor: f64) {
    if let Some(v) = value {
        *v = px(*v, factor);
    }
}

fn scale_length(value: &mut Option<Length>, factor: f64) {
    if let Some(l) = value {
        *l = l.scaled(factor);
    }
}

fn scale_shadow(shadow: &mut Shadow, factor: f64) {
    shadow.offset_x = px(shadow.offset_x, factor);
    shadow.offset_y = px(shadow.offset_y, factor);
    shadow.blur = px(shadow.blur, factor);
}

fn scale_stroke(stroke: &mut Stroke, factor: f64) {
    stroke.width = px(stroke.width, factor);
}

fn scale_anchor(anchor: &mut Anchor, factor: f64) {
    anchor.offset.x = anchor.offset.x.scaled(factor);
    anchor.offset.y = anchor.offset.y.scaled(factor);
}

fn scale_text_style(style: &mut TextStyle, factor: f64) {
    scale_opt(&mut style.font_size, factor);
    scale_opt(&mut style.letter_spacing, factor);
    if let Some(shadow) = &mut style.text_shadow {
        scale_shadow(shadow, factor);
    }
    if let Some(stroke) = &mut style.text_stroke {
        scale_stroke(stroke, factor);
    }
}

fn scale_placement(placement: &mut Placement, factor: f64) {
    match placement {
        Placement::GridItem { fallback, .. } => scale_placement(fallback, factor),
        Placement::Constrained(c) => {
            for length in c.lengths_mut() {
                *length = length.scaled(factor);
            }
        }
        Placement::Anchored {
            anchor,
            width,
            height,
        } => {
            scale_anchor(anchor, factor);
            scale_length(width, factor);
            scale_length(height, factor);
        }
    }
}

fn scale_section(section: &mut Section, factor: f64) {
    match section {
        Section::Text(text) => {
            scale_length(&mut text.width, factor);
            scale_length(&mut text.height, factor);
            scale_text_style(&mut text.style, factor);
        }
        Section::Image(image) => {
            scale_length(&mut image.width, factor);
            scale_length(&mut image.height, factor);
            scale_opt(&mut image.border_radius, factor);
        }
        Section::LayoutBox(layout_box) => scale_box(layout_box, factor),
    }
}

/// Scale one box and everything nested in it
pub fn scale_box(layout_box: &mut LayoutBox, factor: f64) {
    scale_placement(&mut layout_box.placement, factor);
    for value in [
        &mut layout_box.border_radius,
        &mut layout_box.padding_top,
        &mut layout_box.padding_right,
        &mut layout_box.padding_bottom,
        &mut layout_box.padding_left,
        &mut layout_box.gap,
        &mut layout_box.column_gap,
        &mut layout_box.row_gap,
    ] {
        scale_opt(value, factor);
    }
    for template in [
        &mut layout_box.grid_template_columns,
        &mut layout_box.grid_template_rows,
    ]
    .into_iter()
    .flatten()
    {
        *template = scale_track_list(template, factor);
    }
    for section in &mut layout_box.sections {
        scale_section(section, factor);
    }
}

pub fn scale_decoration(decoration: &mut Decoration, factor: f64) {
    decoration.position.y_px = px(decoration.position.y_px, factor);
    scale_opt(&mut decoration.border_radius, factor);
    if let Some(anchor) = &mut decoration.anchor {
        scale_anchor(anchor, factor);
    }
    if let Some(shadow) = &mut decoration.shadow {
        scale_shadow(shadow, factor);
    }
    if let Some(stroke) = &mut decoration.stroke {
        scale_stroke(stroke, factor);
    }
}

/// Scale a document's boxes, decorations and content container in place
pub fn scale_template(
    layout_boxes: &mut [LayoutBox],
    decorations: &mut [Decoration],
    content_container: &mut ContentContainer,
    factor: f64,
) {
    if !factor.is_finite() || factor <= 0.0 {
        log::warn!("ignoring invalid scale factor {}", factor);
        return;
    }
    for layout_box in layout_boxes.iter_mut() {
        scale_box(layout_box, factor);
    }
    for decoration in decorations.iter_mut() {
        scale_decoration(decoration, factor);
    }
    scale_opt(&mut content_container.border_radius, factor);
    for value in content_container
        .margin
        .values_mut()
        .into_iter()
        .chain(content_container.padding.values_mut())
    {
        *value = px(*value, factor);
    }
    log::debug!(
        "scaled {} boxes and {} decorations by {:.4}",
        layout_boxes.len(),
        decorations.len(),
        factor
    );
}

impl Template {
    /// Scale the whole document by `factor`, canvas included
    pub fn scale(&mut self, factor: f64) {
        scale_template(
            &mut self.layout_boxes,
            &mut self.decorations,
            &mut self.content_container,
            factor,
        );
        if factor.is_finite() && factor > 0.0 {
            self.canvas.width = px(self.canvas.width, factor);
            self.canvas.height = px(self.canvas.height, factor);
        }
    }

    /// Scale the document so its canvas becomes `width` pixels wide.
    /// Returns the factor applied.
    pub fn rescale_to_width(&mut self, width: f64) -> f64 {
        if self.canvas.width <= 0.0 {
            log::warn!("template '{}' has no canvas width, not rescaling", self.id);
            return 1.0;
        }
        let factor = width / self.canvas.width;
        self.scale(factor);
        self.canvas.width = width;
        factor
    }
}
