//! Layer tree operations
//!
//! Path-addressed lookup and edits over a document's boxes, sections and
//! decorations, plus paint order and z-index restacking.

pub mod error;
pub mod ids;
pub mod order;
pub mod path;

pub use error::PathError;
pub use ids::IdAllocator;
pub use order::{
    bring_forward, bring_to_front, paint_order, section_paint_order, send_backward, send_to_back,
};
pub use path::{
    delete_at_path, duplicate_at_path, find_by_path, move_at_path, resolve_path, Found, Node,
    NodeRef,
};
