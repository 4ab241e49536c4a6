//! Single-line flexbox distribution along one main axis

use crate::model::{AlignItems, FlexDirection, JustifyContent};

use super::types::{PixelBounds, Size};

const EPSILON: f64 = 1e-9;

/// A flex item with its sizes already resolved
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItem {
    /// Main-axis size before growing or shrinking
    pub base: f64,
    /// Cross-axis size; `None` fills the container's cross axis
    pub cross: Option<f64>,
    pub grow: f64,
    pub shrink: f64,
}

impl FlexItem {
    pub fn new(base: f64) -> Self {
        Self {
            base,
            cross: None,
            grow: 0.0,
            shrink: 1.0,
        }
    }

    pub fn with_cross(mut self, cross: f64) -> Self {
        self.cross = Some(cross);
        self
    }

    pub fn with_grow(mut self, grow: f64) -> Self {
        self.grow = grow;
        self
    }

    pub fn with_shrink(mut self, shrink: f64) -> Self {
        self.shrink = shrink;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexContainer {
    pub direction: FlexDirection,
    pub justify: JustifyContent,
    pub align: AlignItems,
    pub gap: f64,
    /// Content box size
    pub size: Size,
}

impl FlexContainer {
    fn main_size(&self) -> f64 {
        if self.direction.is_row() {
            self.size.width
        } else {
            self.size.height
        }
    }

    fn cross_size(&self) -> f64 {
        if self.direction.is_row() {
            self.size.height
        } else {
            self.size.width
        }
    }
}

/// Final main-axis sizes after distributing free space.
///
/// Positive free space goes to growing items in proportion to their grow
/// weights. Overflow is taken from shrinkable items in proportion to
/// `shrink * base`; an item that would drop below zero is frozen at zero and
/// the rest of the overflow is redistributed. Items with `shrink == 0` never
/// go below their base size.
pub fn main_sizes(items: &[FlexItem], available: f64, gap: f64) -> Vec<f64> {
    let mut sizes: Vec<f64> = items.iter().map(|i| i.base.max(0.0)).collect();
    if items.is_empty() {
        return sizes;
    }
    let gaps = gap * (items.len() - 1) as f64;
    let free = available - sizes.iter().sum::<f64>() - gaps;

    if free > EPSILON {
        let total_grow: f64 = items.iter().map(|i| i.grow.max(0.0)).sum();
        if total_grow > 0.0 {
            for (size, item) in sizes.iter_mut().zip(items) {
                *size += free * item.grow.max(0.0) / total_grow;
            }
        }
        return sizes;
    }

    let mut overflow = -free;
    let mut frozen: Vec<bool> = items
        .iter()
        .map(|i| i.shrink <= 0.0 || i.base <= 0.0)
        .collect();

    while overflow > EPSILON {
        let weight: f64 = items
            .iter()
            .zip(&frozen)
            .filter(|(_, f)| !**f)
            .map(|(i, _)| i.shrink * i.base)
            .sum();
        if weight <= 0.0 {
            break;
        }

        let mut clamped = 0.0;
        for (idx, item) in items.iter().enumerate() {
            if frozen[idx] {
                continue;
            }
            let share = overflow * item.shrink * item.base / weight;
            if share >= sizes[idx] {
                clamped += sizes[idx];
                sizes[idx] = 0.0;
                frozen[idx] = true;
            }
        }

        if clamped > 0.0 {
            overflow -= clamped;
            continue;
        }

        for (idx, item) in items.iter().enumerate() {
            if !frozen[idx] {
                sizes[idx] -= overflow * item.shrink * item.base / weight;
            }
        }
        overflow = 0.0;
    }
    sizes
}

/// Leading offset and spacing between items for the remaining free space
fn justify(justify: JustifyContent, free: f64, count: usize, gap: f64) -> (f64, f64) {
    let n = count as f64;
    match justify {
        JustifyContent::FlexStart => (0.0, gap),
        JustifyContent::FlexEnd => (free, gap),
        JustifyContent::Center => (free / 2.0, gap),
        JustifyContent::SpaceBetween if free > 0.0 && count > 1 => (0.0, gap + free / (n - 1.0)),
        JustifyContent::SpaceBetween => (0.0, gap),
        JustifyContent::SpaceAround if free > 0.0 => (free / n / 2.0, gap + free / n),
        JustifyContent::SpaceEvenly if free > 0.0 => (free / (n + 1.0), gap + free / (n + 1.0)),
        JustifyContent::SpaceAround | JustifyContent::SpaceEvenly => (free / 2.0, gap),
    }
}

/// Lay out items in a single line. Returned rectangles are relative to the
/// container's content box origin, in item order.
pub fn layout_flex(container: &FlexContainer, items: &[FlexItem]) -> Vec<PixelBounds> {
    if items.is_empty() {
        return vec![];
    }
    let main_extent = container.main_size();
    let cross_extent = container.cross_size();
    let sizes = main_sizes(items, main_extent, container.gap);

    let used: f64 = sizes.iter().sum::<f64>() + container.gap * (items.len() - 1) as f64;
    let (lead, between) = justify(container.justify, main_extent - used, items.len(), container.gap);

    let mut cursor = lead;
    let mut rects = Vec::with_capacity(items.len());
    for (item, main) in items.iter().zip(sizes) {
        let cross = item.cross.unwrap_or(cross_extent);
        let cross_pos = match container.align {
            AlignItems::FlexStart | AlignItems::Stretch => 0.0,
            AlignItems::Center => (cross_extent - cross) / 2.0,
            AlignItems::FlexEnd => cross_extent - cross,
        };
        let main_pos = if container.direction.is_reversed() {
            main_extent - cursor - main
        } else {
            cursor
        };
        cursor += main + between;

        rects.push(if container.direction.is_row() {
            PixelBounds::new(main_pos, cross_pos, main, cross)
        } else {
            PixelBounds::new(cross_pos, main_pos, cross, main)
        });
    }
    rects
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(width: f64, justify: JustifyContent) -> FlexContainer {
        FlexContainer {
            direction: FlexDirection::Row,
            justify,
            align: AlignItems::FlexStart,
            gap: 0.0,
            size: Size::new(width, 100.0),
        }
    }

    #[test]
    fn test_grow_splits_free_space_by_weight() {
        let items = [
            FlexItem::new(100.0).with_cross(10.0).with_grow(1.0),
            FlexItem::new(100.0).with_cross(10.0).with_grow(3.0),
            FlexItem::new(100.0).with_cross(10.0),
        ];
        let sizes = main_sizes(&items, 700.0, 0.0);
        assert_eq!(sizes, vec![200.0, 400.0, 100.0]);
    }

    #[test]
    fn test_shrink_zero_is_a_floor() {
        let items = [
            FlexItem::new(300.0).with_cross(10.0).with_shrink(0.0),
            FlexItem::new(300.0).with_cross(10.0),
            FlexItem::new(300.0).with_cross(10.0),
        ];
        let sizes = main_sizes(&items, 600.0, 0.0);
        assert_eq!(sizes[0], 300.0);
        assert!((sizes[1] - 150.0).abs() < 1e-9);
        assert!((sizes[2] - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_shrink_freezes_items_at_zero() {
        let items = [
            FlexItem::new(400.0).with_cross(10.0).with_shrink(0.0),
            FlexItem::new(10.0).with_cross(10.0).with_shrink(100.0),
            FlexItem::new(200.0).with_cross(10.0),
        ];
        let sizes = main_sizes(&items, 450.0, 0.0);
        assert_eq!(sizes[0], 400.0);
        assert_eq!(sizes[1], 0.0);
        assert!((sizes[2] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_unshrinkable_items_overflow() {
        let items = [
            FlexItem::new(300.0).with_cross(10.0).with_shrink(0.0),
            FlexItem::new(300.0).with_cross(10.0).with_shrink(0.0),
        ];
        assert_eq!(main_sizes(&items, 400.0, 0.0), vec![300.0, 300.0]);
    }

    #[test]
    fn test_justify_space_between_with_gap() {
        let mut container = row(500.0, JustifyContent::SpaceBetween);
        container.gap = 10.0;
        let items = [FlexItem::new(100.0).with_cross(10.0); 3];
        let xs: Vec<f64> = layout_flex(&container, &items).iter().map(|r| r.left).collect();
        assert_eq!(xs, vec![0.0, 200.0, 400.0]);
    }

    #[test]
    fn test_justify_center_and_end() {
        let items = [FlexItem::new(100.0).with_cross(10.0); 2];
        let centered = layout_flex(&row(400.0, JustifyContent::Center), &items);
        assert_eq!(centered[0].left, 100.0);
        let end = layout_flex(&row(400.0, JustifyContent::FlexEnd), &items);
        assert_eq!(end[1].right(), 400.0);
    }

    #[test]
    fn test_space_evenly() {
        let items = [FlexItem::new(100.0).with_cross(10.0); 2];
        let rects = layout_flex(&row(400.0, JustifyContent::SpaceEvenly), &items);
        let xs: Vec<f64> = rects.iter().map(|r| r.left).collect();
        let expected = 200.0 / 3.0;
        assert!((xs[0] - expected).abs() < 1e-9);
        assert!((xs[1] - (2.0 * expected + 100.0)).abs() < 1e-9);
    }

    #[test]
    fn test_column_stretch_fills_cross_axis() {
        let container = FlexContainer {
            direction: FlexDirection::Column,
            justify: JustifyContent::FlexStart,
            align: AlignItems::Stretch,
            gap: 20.0,
            size: Size::new(1000.0, 800.0),
        };
        let rects = layout_flex(&container, &[FlexItem::new(100.0); 2]);
        assert_eq!(rects[0], PixelBounds::new(0.0, 0.0, 1000.0, 100.0));
        assert_eq!(rects[1], PixelBounds::new(0.0, 120.0, 1000.0, 100.0));
    }

    #[test]
    fn test_align_center_cross_axis() {
        let mut container = row(400.0, JustifyContent::FlexStart);
        container.align = AlignItems::Center;
        let rects = layout_flex(&container, &[FlexItem::new(100.0).with_cross(40.0)]);
        assert_eq!(rects[0].top, 30.0);
    }

    #[test]
    fn test_row_reverse_starts_at_main_end() {
        let mut container = row(400.0, JustifyContent::FlexStart);
        container.direction = FlexDirection::RowReverse;
        let rects = layout_flex(&container, &[FlexItem::new(100.0).with_cross(10.0), FlexItem::new(50.0).with_cross(10.0)]);
        assert_eq!(rects[0].left, 300.0);
        assert_eq!(rects[1].left, 250.0);
    }
}
