//! Layout engine for computing element positions and sizes
//!
//! This module takes a document tree and computes absolute pixel bounds for
//! every node, producing a [`LayoutResult`] indexed by element id. The pieces
//! are usable on their own: constraint normalization, anchor resolution and
//! the flex and grid distributors are pure functions over plain values.

pub mod anchor;
pub mod config;
pub mod engine;
pub mod flex;
pub mod grid;
pub mod normalize;
pub mod types;

pub use anchor::{
    attach_anchor, detach_anchor, detach_anchor_in_document, origin_point, resolve_anchor,
    suggest_offset,
};
pub use config::{ConfigError, LayoutConfig};
pub use engine::{
    content_area, resolve_bounds, resolve_bounds_with_config, resolve_constraints,
    resolve_template, resolve_tree,
};
pub use flex::{layout_flex, main_sizes, FlexContainer, FlexItem};
pub use grid::{parse_line_range, parse_track_list, GridLine, Track};
pub use normalize::{
    apply_constraint_update, normalize_constraints, resolvability, with_defaults, Resolvability,
};
pub use types::*;
