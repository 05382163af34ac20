//! # highlight
//!
//! Wrap the text covered by a [`DomRange`](dom::DomRange) in highlight
//! elements, and undo it later.
//!
//! The pipeline:
//! 1. [`normalize_range`] re-anchors the range endpoints onto text nodes.
//! 2. [`text_nodes_in_range`] splits the partially covered boundary text
//!    nodes and returns the fully covered ones in tree order.
//! 3. [`Highlighter::apply`] replaces each of them with a wrapper element
//!    holding it, inside [`with_restored_range`] so the caller's range still
//!    spans the same text afterwards.
//! 4. [`Highlight::remove`] puts the text nodes back in place of their
//!    wrappers. Split text nodes are not merged again.
//!
//! ```
//! use dom::{BoundaryPoint, Document, DomRange};
//! use highlight::{WrapperSpec, highlight_range};
//!
//! let mut doc = Document::new();
//! let p = doc.create_element("p");
//! let text = doc.create_text("abcdef");
//! doc.append_child(doc.root(), p)?;
//! doc.append_child(p, text)?;
//!
//! let mut range = DomRange::new(&doc, BoundaryPoint::new(text, 2), BoundaryPoint::new(text, 5))?;
//! let highlight = highlight_range(&mut doc, &mut range, WrapperSpec::default())?
//!     .expect("range covers text");
//! assert_eq!(doc.text_content(p)?, "abcdef");
//! assert_eq!(highlight.len(), 1);
//! highlight.remove(&mut doc, &mut range)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod apply;
mod config;
mod error;
mod highlight;
mod normalize;
mod restore;
mod segment;
mod wrapper;

pub use config::HighlightConfig;
pub use error::HighlightError;
pub use highlight::{Highlight, Highlighter, highlight_range};
pub use normalize::normalize_range;
pub use restore::{RangeSnapshot, with_restored_range};
pub use segment::text_nodes_in_range;
pub use wrapper::WrapperSpec;
