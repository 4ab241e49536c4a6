//! The top-level poster / long-article document

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::decoration::Decoration;
use super::section::{LayoutBox, Section};
use super::style::Insets;

/// Errors that can occur when loading or saving a document
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Failed to read document file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse document JSON: {0}")]
    JsonError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TemplateKind {
    #[default]
    Poster,
    LongArticle,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: f64,
    pub height: f64,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: 1080.0,
            height: 1080.0,
        }
    }
}

/// The framed area long articles flow their content into
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentContainer {
    #[serde(default)]
    pub margin: Insets,
    #[serde(default)]
    pub padding: Insets,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
}

/// A complete document. Every node's lifetime is bounded by it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub kind: TemplateKind,
    #[serde(default)]
    pub canvas: CanvasSize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    #[serde(default)]
    pub content_container: ContentContainer,
    #[serde(default)]
    pub layout_boxes: Vec<LayoutBox>,
    #[serde(default)]
    pub decorations: Vec<Decoration>,
}

impl Template {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            canvas: CanvasSize { width, height },
            ..Default::default()
        }
    }

    pub fn with_box(mut self, layout_box: LayoutBox) -> Self {
        self.layout_boxes.push(layout_box);
        self
    }

    pub fn with_decoration(mut self, decoration: Decoration) -> Self {
        self.decorations.push(decoration);
        self
    }

    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let template: Template = serde_json::from_str(json)?;
        log::debug!(
            "loaded template '{}' ({} boxes, {} decorations)",
            template.id,
            template.layout_boxes.len(),
            template.decorations.len()
        );
        Ok(template)
    }

    pub fn from_file(path: &Path) -> Result<Self, DocumentError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Visit every section in the tree, depth first, parents before children
    pub fn for_each_section<F: FnMut(&Section)>(&self, mut f: F) {
        fn walk<F: FnMut(&Section)>(sections: &[Section], f: &mut F) {
            for section in sections {
                f(section);
                if let Section::LayoutBox(b) = section {
                    walk(&b.sections, f);
                }
            }
        }
        for layout_box in &self.layout_boxes {
            walk(&layout_box.sections, &mut f);
        }
    }

    /// Find a layout box anywhere in the tree by id
    pub fn find_box_mut(&mut self, id: &str) -> Option<&mut LayoutBox> {
        fn walk<'a>(boxes: impl Iterator<Item = &'a mut LayoutBox>, id: &str) -> Option<&'a mut LayoutBox> {
            for layout_box in boxes {
                if layout_box.id == id {
                    return Some(layout_box);
                }
                let nested = layout_box.sections.iter_mut().filter_map(Section::as_layout_box_mut);
                if let Some(found) = walk(nested, id) {
                    return Some(found);
                }
            }
            None
        }
        walk(self.layout_boxes.iter_mut(), id)
    }

    /// Every id in the document: decorations, root boxes and nested sections
    pub fn all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.decorations.iter().map(|d| d.id.clone()).collect();
        ids.extend(self.layout_boxes.iter().map(|b| b.id.clone()));
        self.for_each_section(|s| ids.push(s.id().to_string()));
        ids
    }
}
