//! Paint order and z-index edits
//!
//! Root boxes and decorations share one z-space; the sections of a box share
//! another. Within a z-space nodes paint by ascending z-index, ties keeping
//! list order with root boxes before decorations.

use crate::model::{LayoutBox, Section, Template};

use super::error::PathError;
use super::path::{container_mut, resolve_path, NodeRef};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Box(usize),
    Decoration(usize),
}

fn root_slots(template: &Template) -> Vec<Slot> {
    let mut slots: Vec<(Slot, i32)> = template
        .layout_boxes
        .iter()
        .enumerate()
        .map(|(i, b)| (Slot::Box(i), b.base.z_index.unwrap_or(0)))
        .chain(
            template
                .decorations
                .iter()
                .enumerate()
                .map(|(i, d)| (Slot::Decoration(i), d.z_index)),
        )
        .collect();
    slots.sort_by_key(|(_, z)| *z);
    slots.into_iter().map(|(slot, _)| slot).collect()
}

/// Root-level nodes, bottom first
pub fn paint_order(template: &Template) -> Vec<NodeRef<'_>> {
    root_slots(template)
        .into_iter()
        .map(|slot| match slot {
            Slot::Box(i) => NodeRef::RootBox(&template.layout_boxes[i]),
            Slot::Decoration(i) => NodeRef::Decoration(&template.decorations[i]),
        })
        .collect()
}

/// A box's sections, bottom first
pub fn section_paint_order(layout_box: &LayoutBox) -> Vec<&Section> {
    let mut sections: Vec<&Section> = layout_box.sections.iter().collect();
    sections.sort_by_key(|s| s.base().z_index.unwrap_or(0));
    sections
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Restack {
    Forward,
    Backward,
    ToFront,
    ToBack,
}

/// Move `target` within `order`. Returns false when it is already there.
fn restack_order<T: PartialEq>(order: &mut Vec<T>, target: &T, op: Restack) -> bool {
    let Some(pos) = order.iter().position(|slot| slot == target) else {
        return false;
    };
    let last = order.len() - 1;
    let to = match op {
        Restack::Forward => (pos + 1).min(last),
        Restack::Backward => pos.saturating_sub(1),
        Restack::ToFront => last,
        Restack::ToBack => 0,
    };
    if to == pos {
        return false;
    }
    let slot = order.remove(pos);
    order.insert(to, slot);
    true
}

/// Apply a restack and rewrite the z-indices of the node's z-space to
/// `0..n` in the new paint order
fn restack<S: AsRef<str>>(template: &mut Template, path: &[S], op: Restack) -> Result<bool, PathError> {
    let target = resolve_path(template, path)?.element;

    let Some((first, middle)) = path[..path.len() - 1].split_first() else {
        let slot = match target {
            NodeRef::Decoration(d) => template
                .decorations
                .iter()
                .position(|x| std::ptr::eq(x, d))
                .map(Slot::Decoration),
            NodeRef::RootBox(b) => template
                .layout_boxes
                .iter()
                .position(|x| std::ptr::eq(x, b))
                .map(Slot::Box),
            NodeRef::Section(_) => None,
        };
        let Some(slot) = slot else {
            return Ok(false);
        };
        let mut order = root_slots(template);
        if !restack_order(&mut order, &slot, op) {
            return Ok(false);
        }
        for (z, slot) in order.into_iter().enumerate() {
            match slot {
                Slot::Box(i) => template.layout_boxes[i].base.z_index = Some(z as i32),
                Slot::Decoration(i) => template.decorations[i].z_index = z as i32,
            }
        }
        return Ok(true);
    };

    let target_id = target.id().to_string();
    let container = container_mut(template, first.as_ref(), middle)?;
    let Some(index) = container.sections.iter().position(|s| s.id() == target_id) else {
        return Ok(false);
    };
    let mut order: Vec<usize> = (0..container.sections.len()).collect();
    order.sort_by_key(|i| container.sections[*i].base().z_index.unwrap_or(0));
    if !restack_order(&mut order, &index, op) {
        return Ok(false);
    }
    for (z, i) in order.into_iter().enumerate() {
        container.sections[i].base_mut().z_index = Some(z as i32);
    }
    Ok(true)
}

/// Swap the node with the one painted right above it
pub fn bring_forward<S: AsRef<str>>(template: &mut Template, path: &[S]) -> Result<bool, PathError> {
    restack(template, path, Restack::Forward)
}

/// Swap the node with the one painted right below it
pub fn send_backward<S: AsRef<str>>(template: &mut Template, path: &[S]) -> Result<bool, PathError> {
    restack(template, path, Restack::Backward)
}

pub fn bring_to_front<S: AsRef<str>>(template: &mut Template, path: &[S]) -> Result<bool, PathError> {
    restack(template, path, Restack::ToFront)
}

pub fn send_to_back<S: AsRef<str>>(template: &mut Template, path: &[S]) -> Result<bool, PathError> {
    restack(template, path, Restack::ToBack)
}
