//! Bounds resolution engine
//!
//! Computes absolute pixel bounds for every node of a layout tree, top-down:
//! a box is placed against its parent's content box, then its children are
//! laid out inside its own content box (its bounds minus padding).
//!
//! ## Placement
//!
//! Root boxes, anchored boxes and boxes whose constraints pin a position are
//! placed by their own [`Placement`]. Every other child of a box is an item of
//! the parent's flex or grid layout, and its constraints only contribute a
//! base size. Boxes without a `layoutMode` lay items out as a flex column with
//! `alignItems: stretch`.
//!
//! ## Anchors
//!
//! Anchored nodes may reference any element in the document, so they are
//! deferred until their target has been resolved. Targets that never resolve
//! (missing ids, cycles) fall back to the configured default position.
//!
//! Resolution never fails: malformed input is normalized or defaulted, and a
//! parent with no area yields zero-sized boxes for its whole subtree.

use crate::model::{
    AlignItems, Constraints, Decoration, DecorationScope, LayoutBox, LayoutMode, Length,
    Placement, Section, Template, TemplateKind, TextSection,
};

use super::anchor::resolve_anchor;
use super::config::LayoutConfig;
use super::flex::{layout_flex, FlexContainer, FlexItem};
use super::grid::{
    cell_bounds, parse_line_range, parse_track_list, place_items, resolve_range, size_tracks,
    GridLine, Track,
};
use super::types::*;

/// Resolve a single node against a parent of the given size, with the
/// default configuration
pub fn resolve_bounds(node: &Section, parent: Size) -> PixelBounds {
    resolve_bounds_with_config(node, parent, &LayoutConfig::default())
}

/// Resolve a single node against a parent of the given size.
///
/// Boxes are placed by their own placement; anchors have no targets here and
/// land at the default position. Text and images fill the parent width and
/// take their natural height unless sized explicitly.
pub fn resolve_bounds_with_config(node: &Section, parent: Size, config: &LayoutConfig) -> PixelBounds {
    let parent_box = PixelBounds::from_size(parent);
    if parent.is_degenerate() {
        return PixelBounds::zero();
    }
    match node {
        Section::LayoutBox(layout_box) => {
            Resolver::new(config, parent).own_bounds(layout_box, &parent_box)
        }
        section => {
            let (width, height) = explicit_size(section);
            let width = width.map_or(parent.width, |w| w.resolve(parent.width));
            let height = height.map_or_else(
                || natural_height(section, width, config),
                |h| h.resolve(parent.height),
            );
            PixelBounds::new(0.0, 0.0, width, height)
        }
    }
}

/// Resolve a box and its whole subtree against a parent at the origin
pub fn resolve_tree(root: &LayoutBox, parent: Size, config: &LayoutConfig) -> LayoutResult {
    let mut resolver = Resolver::new(config, parent);
    resolver.place_positioned(root, PixelBounds::from_size(parent), None);
    resolver.resolve_pending();
    log::debug!(
        "resolved tree '{}': {} nodes in {}x{}",
        root.id,
        resolver.result.len(),
        parent.width,
        parent.height
    );
    resolver.result
}

/// Resolve every root box and decoration of a document against its canvas
pub fn resolve_template(template: &Template, config: &LayoutConfig) -> LayoutResult {
    let canvas = Size::new(template.canvas.width, template.canvas.height);
    let page = PixelBounds::from_size(canvas);
    let content = content_area(template);

    let mut resolver = Resolver::new(config, canvas);
    for layout_box in &template.layout_boxes {
        resolver.place_positioned(layout_box, content, None);
    }
    for decoration in &template.decorations {
        let scope = match decoration.scope {
            DecorationScope::Page => page,
            DecorationScope::Content => content,
        };
        resolver.place_decoration(decoration, scope);
    }
    resolver.resolve_pending();
    log::debug!(
        "resolved template '{}': {} elements on a {}x{} canvas",
        template.id,
        resolver.result.len(),
        canvas.width,
        canvas.height
    );
    resolver.result
}

/// The area root boxes are placed in: the whole canvas for posters, the
/// canvas minus the content container's margin and padding for articles
pub fn content_area(template: &Template) -> PixelBounds {
    let page = PixelBounds::new(0.0, 0.0, template.canvas.width, template.canvas.height);
    match template.kind {
        TemplateKind::Poster => page,
        TemplateKind::LongArticle => {
            let margin = template.content_container.margin;
            let padding = template.content_container.padding;
            page.inset(
                margin.top + padding.top,
                margin.right + padding.right,
                margin.bottom + padding.bottom,
                margin.left + padding.left,
            )
        }
    }
}

/// Resolve a constraint set against a parent box.
///
/// Each axis uses whichever of edge+edge, edge+size or centre+size remains
/// after normalization; missing data falls back to the default box.
pub fn resolve_constraints(
    constraints: &Constraints,
    parent: &PixelBounds,
    config: &LayoutConfig,
) -> PixelBounds {
    let (left, width) = resolve_axis(
        constraints.horizontal(),
        parent.width,
        config.default_position.0,
        config.default_box_size.0,
    );
    let (top, height) = resolve_axis(
        constraints.vertical(),
        parent.height,
        config.default_position.1,
        config.default_box_size.1,
    );
    PixelBounds::new(parent.left + left, parent.top + top, width, height)
}

/// Start offset and size along one axis
fn resolve_axis(
    axis: crate::model::AxisConstraint,
    extent: f64,
    default_start: f64,
    default_size: f64,
) -> (f64, f64) {
    use crate::model::AxisConstraint::*;

    match axis {
        Edges { start, end } => {
            let start = start.resolve(extent);
            (start, (extent - start - end.resolve(extent)).max(0.0))
        }
        StartSize { start, size } => (start.resolve(extent), size.resolve(extent).max(0.0)),
        EndSize { end, size } => {
            let size = size.resolve(extent).max(0.0);
            (extent - end.resolve(extent) - size, size)
        }
        Center { offset, size } => {
            let size = size.resolve(extent).max(0.0);
            (extent / 2.0 + offset.resolve(extent) - size / 2.0, size)
        }
        Start { start } => (start.resolve(extent), default_size),
        End { end } => (extent - end.resolve(extent) - default_size, default_size),
        Size { size } => (default_start, size.resolve(extent).max(0.0)),
        Unset => (default_start, default_size),
    }
}

/// Explicit width and height of any section
fn explicit_size(section: &Section) -> (Option<Length>, Option<Length>) {
    match section {
        Section::Text(text) => (text.width, text.height),
        Section::Image(image) => (image.width, image.height),
        Section::LayoutBox(layout_box) => layout_box.placement.explicit_size(),
    }
}

fn font_size(text: &TextSection, config: &LayoutConfig) -> f64 {
    text.style.font_size.unwrap_or(config.default_font_size)
}

/// Estimated height of wrapped text at a given width
fn text_height(text: &TextSection, width: f64, config: &LayoutConfig) -> f64 {
    let font_size = font_size(text, config);
    let line_height = text.style.line_height.unwrap_or(config.line_height);
    let glyph = font_size * config.glyph_width_ratio;
    let per_line = if glyph > 0.0 {
        (width / glyph).floor().max(1.0) as usize
    } else {
        usize::MAX
    };
    let lines: usize = text
        .content
        .lines()
        .map(|line| line.chars().count().div_ceil(per_line).max(1))
        .sum();
    lines.max(1) as f64 * font_size * line_height
}

/// Width a section takes when nothing stretches it
fn natural_width(section: &Section, available: f64, config: &LayoutConfig) -> f64 {
    match section {
        Section::Text(text) => {
            let longest = text
                .content
                .lines()
                .map(|line| line.chars().count())
                .max()
                .unwrap_or(0);
            (longest as f64 * font_size(text, config) * config.glyph_width_ratio).min(available)
        }
        Section::Image(_) | Section::LayoutBox(_) => config.default_box_size.0.min(available),
    }
}

/// Height a section takes at a given width when not sized explicitly
fn natural_height(section: &Section, width: f64, config: &LayoutConfig) -> f64 {
    match section {
        Section::Text(text) => text_height(text, width, config),
        Section::Image(image) => {
            let ratio = image
                .aspect_ratio
                .filter(|r| *r > 0.0)
                .unwrap_or(config.default_image_aspect_ratio);
            width / ratio
        }
        Section::LayoutBox(_) => config.default_box_size.1,
    }
}

/// Whether a child takes part in its parent's flex or grid layout
fn is_in_flow(section: &Section, parent_is_grid: bool) -> bool {
    let Section::LayoutBox(layout_box) = section else {
        return true;
    };
    if parent_is_grid && matches!(layout_box.placement, Placement::GridItem { .. }) {
        return true;
    }
    match layout_box.placement.outside_grid() {
        Placement::Constrained(c) => !c.pins_position(),
        _ => false,
    }
}

fn grid_lines(section: &Section) -> ((GridLine, GridLine), (GridLine, GridLine)) {
    let auto = (GridLine::Auto, GridLine::Auto);
    match section {
        Section::LayoutBox(LayoutBox {
            placement: Placement::GridItem { area, .. },
            ..
        }) => (
            area.column.as_deref().map_or(auto, parse_line_range),
            area.row.as_deref().map_or(auto, parse_line_range),
        ),
        _ => (auto, auto),
    }
}

fn template_tracks(template: Option<&str>, owner: &str) -> Option<Vec<Track>> {
    let template = template?.trim();
    if template.is_empty() {
        return None;
    }
    match parse_track_list(template) {
        Some(tracks) if !tracks.is_empty() => Some(tracks),
        _ => {
            log::warn!("box '{}': ignoring unsupported grid template '{}'", owner, template);
            None
        }
    }
}

/// A node whose position depends on another element's bounds
enum Pending<'a> {
    Box {
        node: &'a LayoutBox,
        parent: PixelBounds,
        parent_id: Option<&'a str>,
    },
    Decoration {
        decoration: &'a Decoration,
        scope: PixelBounds,
    },
}

impl Pending<'_> {
    fn target(&self) -> Option<&str> {
        match self {
            Pending::Box { node, .. } => node.placement.anchor().map(|a| a.element_id.as_str()),
            Pending::Decoration { decoration, .. } => {
                decoration.anchor.as_ref().map(|a| a.element_id.as_str())
            }
        }
    }

    fn id(&self) -> &str {
        match self {
            Pending::Box { node, .. } => &node.id,
            Pending::Decoration { decoration, .. } => &decoration.id,
        }
    }
}

struct Resolver<'a> {
    config: &'a LayoutConfig,
    result: LayoutResult,
    pending: Vec<Pending<'a>>,
}

impl<'a> Resolver<'a> {
    fn new(config: &'a LayoutConfig, canvas: Size) -> Self {
        Self {
            config,
            result: LayoutResult::new(canvas),
            pending: Vec::new(),
        }
    }

    fn insert(&mut self, element: ResolvedElement) {
        log::trace!("{} {:?} -> {:?}", element.id, element.kind, element.bounds);
        self.result.insert(element);
    }

    /// Bounds of a box from its own placement, ignoring its children
    fn own_bounds(&self, node: &LayoutBox, parent: &PixelBounds) -> PixelBounds {
        match node.placement.outside_grid() {
            Placement::Constrained(c) => resolve_constraints(c, parent, self.config),
            Placement::Anchored {
                anchor,
                width,
                height,
            } => {
                let size = self.anchored_size(*width, *height, parent);
                match self.result.bounds(&anchor.element_id) {
                    Some(target) => {
                        let origin = resolve_anchor(anchor, &target, parent.size());
                        PixelBounds::new(origin.x, origin.y, size.width, size.height)
                    }
                    None => self.fallback_bounds(size, parent),
                }
            }
            Placement::GridItem { .. } => {
                resolve_constraints(&Constraints::default(), parent, self.config)
            }
        }
    }

    fn anchored_size(&self, width: Option<Length>, height: Option<Length>, parent: &PixelBounds) -> Size {
        let (default_width, default_height) = self.config.default_box_size;
        Size::new(
            width.map_or(default_width, |w| w.resolve(parent.width).max(0.0)),
            height.map_or(default_height, |h| h.resolve(parent.height).max(0.0)),
        )
    }

    fn fallback_bounds(&self, size: Size, parent: &PixelBounds) -> PixelBounds {
        let (left, top) = self.config.default_position;
        PixelBounds::new(parent.left + left, parent.top + top, size.width, size.height)
    }

    /// Place a box by its own placement, deferring anchored boxes
    fn place_positioned(&mut self, node: &'a LayoutBox, parent: PixelBounds, parent_id: Option<&'a str>) {
        if parent.is_empty() {
            self.place_degenerate(node, &parent, parent_id);
            return;
        }
        if node.placement.anchor().is_some() {
            self.pending.push(Pending::Box {
                node,
                parent,
                parent_id,
            });
            return;
        }
        let bounds = self.own_bounds(node, &parent);
        self.place_box(node, bounds, parent_id);
    }

    /// Record a box at its final bounds and lay out its children
    fn place_box(&mut self, node: &'a LayoutBox, bounds: PixelBounds, parent_id: Option<&'a str>) {
        let padding = node.padding();
        let content = bounds.inset(padding.top, padding.right, padding.bottom, padding.left);
        self.insert(ResolvedElement {
            id: node.id.clone(),
            kind: ElementKind::LayoutBox,
            bounds,
            content_box: Some(content),
            parent: parent_id.map(str::to_string),
        });
        self.layout_children(node, content);
    }

    fn place_section(&mut self, section: &'a Section, bounds: PixelBounds, parent_id: &'a str) {
        let kind = match section {
            Section::LayoutBox(node) => {
                self.place_box(node, bounds, Some(parent_id));
                return;
            }
            Section::Text(_) => ElementKind::Text,
            Section::Image(_) => ElementKind::Image,
        };
        let mut element = ResolvedElement::new(section.id(), kind, bounds);
        element.parent = Some(parent_id.to_string());
        self.insert(element);
    }

    /// Zero boxes at the parent origin for a whole subtree
    fn place_degenerate(&mut self, node: &LayoutBox, parent: &PixelBounds, parent_id: Option<&str>) {
        let origin = PixelBounds::new(parent.left, parent.top, 0.0, 0.0);
        self.insert(ResolvedElement {
            id: node.id.clone(),
            kind: ElementKind::LayoutBox,
            bounds: origin,
            content_box: Some(origin),
            parent: parent_id.map(str::to_string),
        });
        for section in &node.sections {
            match section {
                Section::LayoutBox(child) => self.place_degenerate(child, &origin, Some(&node.id)),
                Section::Text(_) | Section::Image(_) => {
                    let kind = if matches!(section, Section::Text(_)) {
                        ElementKind::Text
                    } else {
                        ElementKind::Image
                    };
                    let mut element = ResolvedElement::new(section.id(), kind, origin);
                    element.parent = Some(node.id.clone());
                    self.insert(element);
                }
            }
        }
    }

    fn layout_children(&mut self, node: &'a LayoutBox, content: PixelBounds) {
        if node.sections.is_empty() {
            return;
        }
        if content.is_empty() {
            for section in &node.sections {
                match section {
                    Section::LayoutBox(child) => self.place_degenerate(child, &content, Some(&node.id)),
                    _ => self.place_section(section, PixelBounds::new(content.left, content.top, 0.0, 0.0), &node.id),
                }
            }
            return;
        }

        let is_grid = node.layout_mode == Some(LayoutMode::Grid);
        let mut in_flow: Vec<&'a Section> = Vec::new();
        for section in &node.sections {
            if is_in_flow(section, is_grid) {
                in_flow.push(section);
            } else if let Section::LayoutBox(child) = section {
                self.place_positioned(child, content, Some(&node.id));
            }
        }

        if is_grid {
            self.layout_grid(node, content, &in_flow);
        } else {
            self.layout_flex(node, content, &in_flow);
        }
    }

    fn flex_item(&self, section: &Section, content: Size, row: bool, align: AlignItems) -> FlexItem {
        let config = self.config;
        let (width, height) = explicit_size(section);
        let width = width.map(|w| w.resolve(content.width).max(0.0));
        let height = height.map(|h| h.resolve(content.height).max(0.0));
        let stretch = align == AlignItems::Stretch;

        let (main, cross) = if row {
            let main = width.unwrap_or_else(|| natural_width(section, content.width, config));
            let cross = match height {
                Some(h) => Some(h),
                None if stretch => None,
                None => Some(natural_height(section, main, config)),
            };
            (main, cross)
        } else {
            let cross = match width {
                Some(w) => Some(w),
                None if stretch => None,
                None => Some(natural_width(section, content.width, config)),
            };
            let main = height.unwrap_or_else(|| {
                natural_height(section, cross.unwrap_or(content.width), config)
            });
            (main, cross)
        };

        let base = section.base();
        FlexItem {
            base: main,
            cross,
            grow: base.flex_grow.unwrap_or(0.0),
            shrink: base.flex_shrink.unwrap_or(1.0),
        }
    }

    fn layout_flex(&mut self, node: &'a LayoutBox, content: PixelBounds, items: &[&'a Section]) {
        let direction = node.flex_direction();
        let align = node.align_items.unwrap_or_default();
        let container = FlexContainer {
            direction,
            justify: node.justify_content.unwrap_or_default(),
            align,
            gap: if direction.is_row() {
                node.column_gap()
            } else {
                node.row_gap()
            },
            size: content.size(),
        };
        let flex_items: Vec<FlexItem> = items
            .iter()
            .map(|s| self.flex_item(s, content.size(), direction.is_row(), align))
            .collect();

        for (section, rect) in items.iter().zip(layout_flex(&container, &flex_items)) {
            self.place_section(section, rect.translate(content.left, content.top), &node.id);
        }
    }

    fn layout_grid(&mut self, node: &'a LayoutBox, content: PixelBounds, items: &[&'a Section]) {
        let config = self.config;
        let column_gap = node.column_gap();
        let row_gap = node.row_gap();
        let columns = template_tracks(node.grid_template_columns.as_deref(), &node.id)
            .unwrap_or_else(|| vec![Track::Fr(1.0)]);
        let explicit_rows =
            template_tracks(node.grid_template_rows.as_deref(), &node.id).unwrap_or_default();

        let spans: Vec<_> = items
            .iter()
            .map(|section| {
                let (column, row) = grid_lines(section);
                (
                    resolve_range(column, columns.len()),
                    resolve_range(row, explicit_rows.len().max(1)),
                )
            })
            .collect();
        let (cells, row_count) = place_items(&spans, columns.len(), explicit_rows.len());

        let mut rows = explicit_rows;
        rows.resize(row_count.max(rows.len()), Track::Auto);

        let column_contributions: Vec<(usize, f64)> = items
            .iter()
            .zip(&cells)
            .filter(|(_, cell)| cell.column_span == 1)
            .filter_map(|(section, cell)| {
                explicit_size(section)
                    .0
                    .map(|w| (cell.column, w.resolve(content.width)))
            })
            .collect();
        let column_sizes = size_tracks(&columns, content.width, column_gap, &column_contributions);

        let row_contributions: Vec<(usize, f64)> = items
            .iter()
            .zip(&cells)
            .filter(|(_, cell)| cell.row_span == 1)
            .map(|(section, cell)| {
                let height = match explicit_size(section).1 {
                    Some(h) => h.resolve(content.height),
                    None => {
                        let width = cell_bounds(cell, &column_sizes, &[0.0], column_gap, 0.0).width;
                        natural_height(section, width, config)
                    }
                };
                (cell.row, height)
            })
            .collect();
        let row_sizes = size_tracks(&rows, content.height, row_gap, &row_contributions);

        for (section, cell) in items.iter().zip(&cells) {
            let rect = cell_bounds(cell, &column_sizes, &row_sizes, column_gap, row_gap);
            self.place_section(section, rect.translate(content.left, content.top), &node.id);
        }
    }

    fn decoration_size(&self, decoration: &Decoration, scope: &PixelBounds) -> Size {
        let width = scope.width * decoration.size_percent.width / 100.0;
        let ratio = decoration.aspect_ratio.filter(|r| *r > 0.0).unwrap_or(1.0);
        Size::new(width, width / ratio)
    }

    fn place_decoration(&mut self, decoration: &'a Decoration, scope: PixelBounds) {
        if decoration.anchor.is_some() {
            self.pending.push(Pending::Decoration { decoration, scope });
            return;
        }
        let size = self.decoration_size(decoration, &scope);
        let bounds = PixelBounds::new(
            scope.left + scope.width * decoration.position.x_percent / 100.0,
            scope.top + decoration.position.y_px,
            size.width,
            size.height,
        );
        self.insert(ResolvedElement::new(&decoration.id, ElementKind::Decoration, bounds));
    }

    fn resolve_one(&mut self, pending: Pending<'a>, fallback: bool) {
        match pending {
            Pending::Box {
                node,
                parent,
                parent_id,
            } => {
                let bounds = self.own_bounds(node, &parent);
                self.place_box(node, bounds, parent_id);
            }
            Pending::Decoration { decoration, scope } => {
                let size = self.decoration_size(decoration, &scope);
                let target = decoration
                    .anchor
                    .as_ref()
                    .and_then(|a| self.result.bounds(&a.element_id).map(|t| (a, t)));
                let bounds = match target {
                    Some((anchor, target)) if !fallback => {
                        let origin = resolve_anchor(anchor, &target, scope.size());
                        PixelBounds::new(origin.x, origin.y, size.width, size.height)
                    }
                    _ => self.fallback_bounds(size, &scope),
                };
                self.insert(ResolvedElement::new(&decoration.id, ElementKind::Decoration, bounds));
            }
        }
    }

    /// Resolve deferred anchored nodes as their targets become available.
    /// Whatever is left when no more progress can be made is dangling.
    fn resolve_pending(&mut self) {
        while !self.pending.is_empty() {
            let mut progressed = false;
            let mut waiting = Vec::new();
            for pending in std::mem::take(&mut self.pending) {
                let ready = pending
                    .target()
                    .map_or(true, |target| self.result.get(target).is_some());
                if ready {
                    self.resolve_one(pending, false);
                    progressed = true;
                } else {
                    waiting.push(pending);
                }
            }
            // Resolving may have queued anchored descendants
            waiting.append(&mut self.pending);
            self.pending = waiting;

            if !progressed {
                if let Some(dangling) = self.pending.first() {
                    log::warn!(
                        "anchor target '{}' of '{}' not found, using default position",
                        dangling.target().unwrap_or_default(),
                        dangling.id()
                    );
                }
                let dangling = self.pending.remove(0);
                self.resolve_one(dangling, true);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        Anchor, AnchorOffset, ConstraintField, FlexDirection, GridArea, ImageSection,
        JustifyContent, OriginPoint, SectionBase,
    };
    use pretty_assertions::assert_eq;

    fn px(v: f64) -> Option<Length> {
        Some(Length::Px(v))
    }

    fn pct(v: f64) -> Option<Length> {
        Some(Length::Percent(v))
    }

    fn sized(id: &str, width: f64, height: f64) -> LayoutBox {
        LayoutBox::new(id).with_constraints(Constraints {
            width: px(width),
            height: px(height),
            ..Default::default()
        })
    }

    fn root(width: f64, height: f64) -> LayoutBox {
        LayoutBox::new("root").with_constraints(Constraints {
            left: px(0.0),
            top: px(0.0),
            width: px(width),
            height: px(height),
            ..Default::default()
        })
    }

    #[test]
    fn test_stretch_between_edges() {
        let node = Section::LayoutBox(LayoutBox::new("a").with_constraints(Constraints {
            left: pct(0.0),
            right: pct(0.0),
            ..Default::default()
        }));
        let b = resolve_bounds(&node, Size::new(1000.0, 500.0));
        assert_eq!(b.width, 1000.0);
        assert_eq!(b.left, 0.0);
    }

    #[test]
    fn test_center_offset() {
        let node = Section::LayoutBox(LayoutBox::new("a").with_constraints(Constraints {
            center_x: px(0.0),
            width: px(200.0),
            ..Default::default()
        }));
        let b = resolve_bounds(&node, Size::new(1000.0, 500.0));
        assert_eq!(b.left, 400.0);
        assert_eq!(b.center_x(), 500.0);
    }

    #[test]
    fn test_end_pinned_axis() {
        let c = Constraints::new()
            .with(ConstraintField::Right, Length::Px(10.0))
            .with(ConstraintField::Width, Length::Percent(10.0))
            .with(ConstraintField::Bottom, Length::Px(0.0))
            .with(ConstraintField::Height, Length::Px(50.0));
        let b = resolve_constraints(&c, &PixelBounds::new(100.0, 100.0, 500.0, 400.0), &LayoutConfig::default());
        assert_eq!(b, PixelBounds::new(540.0, 450.0, 50.0, 50.0));
    }

    #[test]
    fn test_missing_axes_use_defaults() {
        let b = resolve_bounds(&Section::LayoutBox(LayoutBox::new("a")), Size::new(1000.0, 1000.0));
        assert_eq!(b, PixelBounds::new(20.0, 20.0, 200.0, 150.0));
    }

    #[test]
    fn test_degenerate_parent_gives_zero_box() {
        let node = Section::LayoutBox(root(100.0, 100.0));
        assert_eq!(resolve_bounds(&node, Size::new(0.0, 500.0)), PixelBounds::zero());
        let result = resolve_tree(
            &root(100.0, 100.0).with_section(sized("child", 10.0, 10.0)),
            Size::new(-1.0, 100.0),
            &LayoutConfig::default(),
        );
        assert_eq!(result.bounds("child").map(|b| b.is_empty()), Some(true));
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let tree = root(800.0, 600.0)
            .with_section(sized("a", 100.0, 100.0))
            .with_section(sized("b", 100.0, 100.0));
        let config = LayoutConfig::default();
        let first = resolve_tree(&tree, Size::new(1000.0, 1000.0), &config);
        let second = resolve_tree(&tree, Size::new(1000.0, 1000.0), &config);
        assert_eq!(first, second);
    }

    #[test]
    fn test_default_column_stretches_children() {
        let mut tree = root(1000.0, 800.0)
            .with_section(sized("a", 100.0, 100.0))
            .with_section(LayoutBox::new("b").with_constraints(Constraints {
                height: px(50.0),
                ..Default::default()
            }));
        tree.padding_left = Some(10.0);
        tree.padding_right = Some(10.0);
        tree.row_gap = Some(20.0);
        let result = resolve_tree(&tree, Size::new(1000.0, 800.0), &LayoutConfig::default());
        assert_eq!(result.bounds("a"), Some(PixelBounds::new(10.0, 0.0, 100.0, 100.0)));
        assert_eq!(result.bounds("b"), Some(PixelBounds::new(10.0, 120.0, 980.0, 50.0)));
    }

    #[test]
    fn test_flex_row_with_grow() {
        let mut grow = sized("b", 100.0, 40.0);
        grow.base.flex_grow = Some(1.0);
        let mut tree = root(600.0, 100.0)
            .with_layout(LayoutMode::Flex)
            .with_section(sized("a", 100.0, 40.0))
            .with_section(grow);
        tree.flex_direction = Some(FlexDirection::Row);
        tree.align_items = Some(AlignItems::Center);
        let result = resolve_tree(&tree, Size::new(600.0, 100.0), &LayoutConfig::default());
        assert_eq!(result.bounds("b"), Some(PixelBounds::new(100.0, 30.0, 500.0, 40.0)));
    }

    #[test]
    fn test_flex_shrink_floor() {
        let mut rigid = sized("rigid", 400.0, 10.0);
        rigid.base.flex_shrink = Some(0.0);
        let mut tree = root(500.0, 100.0)
            .with_section(rigid)
            .with_section(sized("soft", 400.0, 10.0));
        tree.flex_direction = Some(FlexDirection::Row);
        let result = resolve_tree(&tree, Size::new(1000.0, 1000.0), &LayoutConfig::default());
        assert_eq!(result.bounds("rigid").map(|b| b.width), Some(400.0));
        assert_eq!(result.bounds("soft").map(|b| b.width), Some(100.0));
    }

    #[test]
    fn test_pinned_child_is_out_of_flow() {
        let pinned = LayoutBox::new("badge").with_constraints(Constraints {
            right: px(0.0),
            top: px(0.0),
            width: px(50.0),
            height: px(50.0),
            ..Default::default()
        });
        let tree = root(400.0, 400.0)
            .with_section(pinned)
            .with_section(sized("first", 100.0, 100.0));
        let result = resolve_tree(&tree, Size::new(400.0, 400.0), &LayoutConfig::default());
        assert_eq!(result.bounds("badge"), Some(PixelBounds::new(350.0, 0.0, 50.0, 50.0)));
        assert_eq!(result.bounds("first").map(|b| b.top), Some(0.0));
    }

    #[test]
    fn test_space_between_column() {
        let mut tree = root(100.0, 300.0)
            .with_section(sized("a", 100.0, 50.0))
            .with_section(sized("b", 100.0, 50.0));
        tree.justify_content = Some(JustifyContent::SpaceBetween);
        let result = resolve_tree(&tree, Size::new(100.0, 300.0), &LayoutConfig::default());
        assert_eq!(result.bounds("b").map(|b| b.top), Some(250.0));
    }

    #[test]
    fn test_grid_cells() {
        let mut tree = root(420.0, 210.0).with_layout(LayoutMode::Grid);
        tree.grid_template_columns = Some("100px 1fr".to_string());
        tree.grid_template_rows = Some("repeat(2, 1fr)".to_string());
        tree.gap = Some(20.0);
        let wide = LayoutBox::new("wide").with_placement(Placement::GridItem {
            area: GridArea {
                column: Some("1 / -1".to_string()),
                row: Some("2".to_string()),
            },
            fallback: Box::default(),
        });
        let tree = tree
            .with_section(LayoutBox::new("a"))
            .with_section(wide)
            .with_section(LayoutBox::new("b"));
        let result = resolve_tree(&tree, Size::new(420.0, 210.0), &LayoutConfig::default());
        assert_eq!(result.bounds("a"), Some(PixelBounds::new(0.0, 0.0, 100.0, 95.0)));
        assert_eq!(result.bounds("b"), Some(PixelBounds::new(120.0, 0.0, 300.0, 95.0)));
        assert_eq!(result.bounds("wide"), Some(PixelBounds::new(0.0, 115.0, 420.0, 95.0)));
    }

    #[test]
    fn test_grid_implicit_rows() {
        let mut tree = root(200.0, 300.0).with_layout(LayoutMode::Grid);
        tree.grid_template_columns = Some("1fr 1fr".to_string());
        let tree = tree
            .with_section(LayoutBox::new("a"))
            .with_section(LayoutBox::new("b"))
            .with_section(LayoutBox::new("c"));
        let result = resolve_tree(&tree, Size::new(200.0, 300.0), &LayoutConfig::default());
        assert_eq!(result.bounds("c"), Some(PixelBounds::new(0.0, 150.0, 100.0, 150.0)));
    }

    #[test]
    fn test_grid_line_out_of_range_is_auto_placed() {
        let mut tree = root(200.0, 100.0).with_layout(LayoutMode::Grid);
        tree.grid_template_columns = Some("1fr 1fr".to_string());
        tree.grid_template_rows = Some("1fr".to_string());
        let stray = LayoutBox::new("stray").with_placement(Placement::GridItem {
            area: GridArea {
                column: Some("7".to_string()),
                row: None,
            },
            fallback: Box::default(),
        });
        let tree = tree.with_section(LayoutBox::new("a")).with_section(stray);
        let result = resolve_tree(&tree, Size::new(200.0, 100.0), &LayoutConfig::default());
        assert_eq!(result.bounds("stray"), Some(PixelBounds::new(100.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_text_height_is_estimated() {
        let text = TextSection {
            id: "t".into(),
            content: "x".repeat(25),
            ..Default::default()
        };
        // 16px font, 9.6px glyphs: 10 per line at 100px, 3 lines of 24px
        let b = resolve_bounds(&Section::Text(text), Size::new(100.0, 1000.0));
        assert_eq!(b.height, 72.0);
    }

    #[test]
    fn test_image_height_from_aspect_ratio() {
        let image = ImageSection {
            id: "i".into(),
            aspect_ratio: Some(2.0),
            width: px(300.0),
            ..Default::default()
        };
        let b = resolve_bounds(&Section::Image(image), Size::new(1000.0, 1000.0));
        assert_eq!((b.width, b.height), (300.0, 150.0));
    }

    #[test]
    fn test_anchored_sibling_follows_target() {
        let target = LayoutBox::new("target").with_constraints(Constraints {
            left: px(100.0),
            top: px(100.0),
            width: px(200.0),
            height: px(50.0),
            ..Default::default()
        });
        let follower = LayoutBox::new("follower").with_placement(Placement::Anchored {
            anchor: Anchor::new("target", OriginPoint::BottomLeft)
                .with_offset(AnchorOffset::px(0.0, 10.0)),
            width: px(80.0),
            height: px(20.0),
        });
        // Anchored box listed before its target still resolves
        let template = Template::new(1000.0, 1000.0).with_box(follower).with_box(target);
        let result = resolve_template(&template, &LayoutConfig::default());
        assert_eq!(result.bounds("follower"), Some(PixelBounds::new(100.0, 160.0, 80.0, 20.0)));
    }

    #[test]
    fn test_grid_lines_outside_grid_keep_anchor() {
        let target = sized("target", 100.0, 40.0);
        let badge = LayoutBox::new("badge").with_placement(Placement::grid_item(
            GridArea {
                column: Some("2".to_string()),
                row: None,
            },
            Placement::Anchored {
                anchor: Anchor::new("target", OriginPoint::BottomRight),
                width: px(30.0),
                height: px(30.0),
            },
        ));
        let tree = root(400.0, 400.0)
            .with_layout(LayoutMode::Flex)
            .with_section(target)
            .with_section(badge);
        let result = resolve_tree(&tree, Size::new(400.0, 400.0), &LayoutConfig::default());
        let target = result.bounds("target").unwrap();
        assert_eq!(
            result.bounds("badge"),
            Some(PixelBounds::new(target.right(), target.bottom(), 30.0, 30.0))
        );
    }

    #[test]
    fn test_dangling_anchor_falls_back() {
        let orphan = LayoutBox::new("orphan").with_placement(Placement::Anchored {
            anchor: Anchor::new("gone", OriginPoint::Center),
            width: None,
            height: None,
        });
        let template = Template::new(1000.0, 1000.0).with_box(orphan);
        let result = resolve_template(&template, &LayoutConfig::default());
        assert_eq!(result.bounds("orphan"), Some(PixelBounds::new(20.0, 20.0, 200.0, 150.0)));
    }

    #[test]
    fn test_anchor_cycle_terminates() {
        let a = LayoutBox::new("a").with_placement(Placement::Anchored {
            anchor: Anchor::new("b", OriginPoint::TopRight),
            width: None,
            height: None,
        });
        let b = LayoutBox::new("b").with_placement(Placement::Anchored {
            anchor: Anchor::new("a", OriginPoint::TopRight),
            width: None,
            height: None,
        });
        let template = Template::new(500.0, 500.0).with_box(a).with_box(b);
        let result = resolve_template(&template, &LayoutConfig::default());
        assert_eq!(result.bounds("a").map(|b| b.left), Some(20.0));
        assert_eq!(result.bounds("b").map(|b| b.left), Some(220.0));
    }

    #[test]
    fn test_rotation_does_not_change_bounds() {
        let plain = sized("a", 100.0, 50.0);
        let mut rotated = plain.clone();
        rotated.base = SectionBase {
            rotation: Some(45.0),
            ..Default::default()
        };
        let size = Size::new(500.0, 500.0);
        assert_eq!(
            resolve_bounds(&Section::LayoutBox(plain), size),
            resolve_bounds(&Section::LayoutBox(rotated), size)
        );
    }

    #[test]
    fn test_decorations_and_content_area() {
        let mut template = Template::new(1000.0, 2000.0);
        template.kind = TemplateKind::LongArticle;
        template.content_container.margin = crate::model::Insets::uniform(50.0);
        template.content_container.padding = crate::model::Insets::uniform(25.0);
        let mut deco = Decoration::new("star", "star.png").at(10.0, 30.0).with_width_percent(10.0);
        deco.aspect_ratio = Some(2.0);
        let template = template
            .with_box(LayoutBox::new("body").with_constraints(Constraints {
                left: px(0.0),
                right: px(0.0),
                top: px(0.0),
                height: px(100.0),
                ..Default::default()
            }))
            .with_decoration(deco);
        let result = resolve_template(&template, &LayoutConfig::default());
        assert_eq!(result.bounds("body"), Some(PixelBounds::new(75.0, 75.0, 850.0, 100.0)));
        assert_eq!(result.bounds("star"), Some(PixelBounds::new(100.0, 30.0, 100.0, 50.0)));
    }
}
