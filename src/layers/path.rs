//! Element paths and path-addressed edits
//!
//! A path lists element ids from a root-level item down to the target.
//! Decorations and root layout boxes live at depth 1; only layout boxes have
//! children.

use std::collections::HashMap;

use crate::model::{Decoration, LayoutBox, Section, Template};

use super::error::PathError;
use super::ids::IdAllocator;

/// A node borrowed from a document
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeRef<'a> {
    Decoration(&'a Decoration),
    RootBox(&'a LayoutBox),
    Section(&'a Section),
}

impl<'a> NodeRef<'a> {
    pub fn id(&self) -> &'a str {
        match *self {
            NodeRef::Decoration(d) => &d.id,
            NodeRef::RootBox(b) => &b.id,
            NodeRef::Section(s) => s.id(),
        }
    }

    pub fn as_layout_box(&self) -> Option<&'a LayoutBox> {
        match *self {
            NodeRef::RootBox(b) => Some(b),
            NodeRef::Section(s) => s.as_layout_box(),
            NodeRef::Decoration(_) => None,
        }
    }
}

/// A node taken out of a document
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Decoration(Decoration),
    RootBox(LayoutBox),
    Section(Section),
}

impl Node {
    pub fn id(&self) -> &str {
        match self {
            Node::Decoration(d) => &d.id,
            Node::RootBox(b) => &b.id,
            Node::Section(s) => s.id(),
        }
    }
}

/// Result of a path lookup. `parent` is `None` for root-level items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Found<'a> {
    pub parent: Option<&'a LayoutBox>,
    pub element: NodeRef<'a>,
}

fn root_ids(template: &Template) -> impl Iterator<Item = &str> {
    template
        .decorations
        .iter()
        .map(|d| d.id.as_str())
        .chain(template.layout_boxes.iter().map(|b| b.id.as_str()))
}

/// Follow a path, reporting where it breaks
pub fn resolve_path<'a, S: AsRef<str>>(
    template: &'a Template,
    path: &[S],
) -> Result<Found<'a>, PathError> {
    let (first, rest) = path.split_first().ok_or(PathError::Empty)?;
    let first = first.as_ref();

    if let Some(decoration) = template.decorations.iter().find(|d| d.id == first) {
        if !rest.is_empty() {
            return Err(PathError::NotAContainer {
                id: first.to_string(),
            });
        }
        return Ok(Found {
            parent: None,
            element: NodeRef::Decoration(decoration),
        });
    }

    let root = template
        .layout_boxes
        .iter()
        .find(|b| b.id == first)
        .ok_or_else(|| PathError::not_found(first, root_ids(template)))?;

    let mut found = Found {
        parent: None,
        element: NodeRef::RootBox(root),
    };
    for id in rest {
        let id = id.as_ref();
        let container = found.element.as_layout_box().ok_or_else(|| PathError::NotAContainer {
            id: found.element.id().to_string(),
        })?;
        let child = container
            .sections
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| PathError::not_found(id, container.sections.iter().map(Section::id)))?;
        found = Found {
            parent: Some(container),
            element: NodeRef::Section(child),
        };
    }
    Ok(found)
}

/// Look up the node at `path`; `None` if any step is missing or descends
/// into a node without children
pub fn find_by_path<'a, S: AsRef<str>>(template: &'a Template, path: &[S]) -> Option<Found<'a>> {
    resolve_path(template, path).ok()
}

/// The list a node lives in
pub(crate) enum Siblings<'a> {
    Decorations(&'a mut Vec<Decoration>),
    Roots(&'a mut Vec<LayoutBox>),
    Sections(&'a mut Vec<Section>),
}

/// The layout box at `first` followed by `rest`
pub(crate) fn container_mut<'a, S: AsRef<str>>(
    template: &'a mut Template,
    first: &str,
    rest: &[S],
) -> Result<&'a mut LayoutBox, PathError> {
    if template.decorations.iter().any(|d| d.id == first) {
        return Err(PathError::NotAContainer {
            id: first.to_string(),
        });
    }
    let index = template
        .layout_boxes
        .iter()
        .position(|b| b.id == first)
        .ok_or_else(|| PathError::not_found(first, root_ids(template)))?;

    let mut current = &mut template.layout_boxes[index];
    for id in rest {
        let id = id.as_ref();
        let index = current
            .sections
            .iter()
            .position(|s| s.id() == id)
            .ok_or_else(|| PathError::not_found(id, current.sections.iter().map(Section::id)))?;
        current = match &mut current.sections[index] {
            Section::LayoutBox(b) => b,
            other => {
                return Err(PathError::NotAContainer {
                    id: other.id().to_string(),
                })
            }
        };
    }
    Ok(current)
}

/// The sibling list holding the node at `path` and its index in it
pub(crate) fn locate<'a, S: AsRef<str>>(
    template: &'a mut Template,
    path: &[S],
) -> Result<(Siblings<'a>, usize), PathError> {
    let (last, parents) = path.split_last().ok_or(PathError::Empty)?;
    let last = last.as_ref();

    let Some((first, middle)) = parents.split_first() else {
        if let Some(index) = template.decorations.iter().position(|d| d.id == last) {
            return Ok((Siblings::Decorations(&mut template.decorations), index));
        }
        if let Some(index) = template.layout_boxes.iter().position(|b| b.id == last) {
            return Ok((Siblings::Roots(&mut template.layout_boxes), index));
        }
        return Err(PathError::not_found(last, root_ids(template)));
    };

    let container = container_mut(template, first.as_ref(), middle)?;
    let index = container
        .sections
        .iter()
        .position(|s| s.id() == last)
        .ok_or_else(|| PathError::not_found(last, container.sections.iter().map(Section::id)))?;
    Ok((Siblings::Sections(&mut container.sections), index))
}

/// Remove the node at `path` from its parent (or the root lists) and return it
pub fn delete_at_path<S: AsRef<str>>(template: &mut Template, path: &[S]) -> Result<Node, PathError> {
    let (siblings, index) = locate(template, path)?;
    let node = match siblings {
        Siblings::Decorations(list) => Node::Decoration(list.remove(index)),
        Siblings::Roots(list) => Node::RootBox(list.remove(index)),
        Siblings::Sections(list) => Node::Section(list.remove(index)),
    };
    log::debug!("deleted '{}'", node.id());
    Ok(node)
}

fn reorder<T>(list: &mut Vec<T>, from: usize, to: usize) -> usize {
    let to = to.min(list.len().saturating_sub(1));
    let item = list.remove(from);
    list.insert(to, item);
    to
}

/// Move the node at `path` to position `to` among its siblings, clamped to
/// the list. Returns the index it ends up at.
pub fn move_at_path<S: AsRef<str>>(template: &mut Template, path: &[S], to: usize) -> Result<usize, PathError> {
    let (siblings, index) = locate(template, path)?;
    Ok(match siblings {
        Siblings::Decorations(list) => reorder(list, index, to),
        Siblings::Roots(list) => reorder(list, index, to),
        Siblings::Sections(list) => reorder(list, index, to),
    })
}

fn reassign_box(layout_box: &mut LayoutBox, ids: &mut IdAllocator, renamed: &mut HashMap<String, String>) {
    let id = ids.next("box");
    renamed.insert(std::mem::replace(&mut layout_box.id, id.clone()), id);
    for section in &mut layout_box.sections {
        reassign_section(section, ids, renamed);
    }
}

fn reassign_section(section: &mut Section, ids: &mut IdAllocator, renamed: &mut HashMap<String, String>) {
    match section {
        Section::LayoutBox(b) => reassign_box(b, ids, renamed),
        other => {
            let id = ids.next(other.kind());
            renamed.insert(other.id().to_string(), id.clone());
            other.set_id(id);
        }
    }
}

/// Point anchors inside a copied subtree at the copies of their targets
fn retarget_anchors(layout_box: &mut LayoutBox, renamed: &HashMap<String, String>) {
    if let Some(anchor) = layout_box.placement.anchor_mut() {
        if let Some(id) = renamed.get(&anchor.element_id) {
            anchor.element_id = id.clone();
        }
    }
    for child in layout_box.sections.iter_mut().filter_map(Section::as_layout_box_mut) {
        retarget_anchors(child, renamed);
    }
}

/// Deep-copy the node at `path`, giving every node of the copy a fresh id,
/// and insert the copy right after the original. Returns the copy's path.
pub fn duplicate_at_path<S: AsRef<str>>(
    template: &mut Template,
    path: &[S],
) -> Result<Vec<String>, PathError> {
    let mut ids = IdAllocator::for_template(template);
    let mut renamed = HashMap::new();
    let (siblings, index) = locate(template, path)?;

    let id = match siblings {
        Siblings::Decorations(list) => {
            let mut copy = list[index].clone();
            copy.id = ids.next("decoration");
            let id = copy.id.clone();
            list.insert(index + 1, copy);
            id
        }
        Siblings::Roots(list) => {
            let mut copy = list[index].clone();
            reassign_box(&mut copy, &mut ids, &mut renamed);
            retarget_anchors(&mut copy, &renamed);
            let id = copy.id.clone();
            list.insert(index + 1, copy);
            id
        }
        Siblings::Sections(list) => {
            let mut copy = list[index].clone();
            reassign_section(&mut copy, &mut ids, &mut renamed);
            if let Some(b) = copy.as_layout_box_mut() {
                retarget_anchors(b, &renamed);
            }
            let id = copy.id().to_string();
            list.insert(index + 1, copy);
            id
        }
    };

    let mut new_path: Vec<String> = path[..path.len() - 1]
        .iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    log::debug!("duplicated '{}' as '{}'", path[path.len() - 1].as_ref(), id);
    new_path.push(id);
    Ok(new_path)
}
