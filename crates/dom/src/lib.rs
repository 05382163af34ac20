//! # dom
//!
//! Mutable, arena-backed document tree used as the host for range-based
//! text operations.
//!
//! - [`Document`]: node arena with DOM-style mutation primitives
//!   (`append_child`, `insert_before`, `replace_child`, `split_text`, ...).
//! - [`traverse`]: tree-order stepping and the text-only [`TextWalker`].
//! - [`DomRange`]: start/end [`BoundaryPoint`]s with DOM comparison rules.
//! - [`snapshot`]: deterministic serialization for tests.
//!
//! Text offsets are UTF-8 byte offsets and must fall on character boundaries.

mod document;
mod error;
pub mod range;
pub mod snapshot;
pub mod traverse;
mod types;

pub use document::Document;
pub use error::DomError;
pub use range::{DomRange, compare_boundary_points, text_position, tree_order};
pub use traverse::TextWalker;
pub use types::{BoundaryPoint, NodeId, NodeKind, NodeType};
