//! Fixtures and assertions shared by the `dom` and `highlight` test suites.
//!
//! Helpers panic with a descriptive message instead of returning errors.

pub mod fixture;

pub use fixture::{Fixture, parse_fixture};

use dom::snapshot::to_markup;
use dom::traverse::text_nodes;
use dom::{BoundaryPoint, Document, DomRange, NodeId};

/// First text node (tree order) whose content equals `content`.
pub fn find_text(doc: &Document, content: &str) -> NodeId {
    text_nodes(doc, doc.root())
        .expect("walk document")
        .into_iter()
        .find(|id| doc.text(*id).ok() == Some(content))
        .unwrap_or_else(|| panic!("no text node {content:?} in {}", markup(doc)))
}

/// First element (tree order) with the given tag name.
pub fn find_element(doc: &Document, name: &str) -> NodeId {
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        if doc.element_name(node).ok() == Some(name) {
            return node;
        }
        let children = doc.children(node).expect("live node");
        stack.extend(children.iter().rev().copied());
    }
    panic!("no <{name}> element in {}", markup(doc));
}

/// Number of live, attached elements with the given tag name.
pub fn count_elements(doc: &Document, name: &str) -> usize {
    let mut count = 0;
    let mut stack = vec![doc.root()];
    while let Some(node) = stack.pop() {
        if doc.element_name(node).ok() == Some(name) {
            count += 1;
        }
        stack.extend(doc.children(node).expect("live node").iter().copied());
    }
    count
}

/// Contents of every text node under `node`, in tree order.
pub fn text_fragments(doc: &Document, node: NodeId) -> Vec<String> {
    text_nodes(doc, node)
        .expect("walk subtree")
        .into_iter()
        .map(|id| doc.text(id).expect("text node").to_string())
        .collect()
}

/// Whole document as markup with text-node boundaries marked by `|`.
pub fn markup(doc: &Document) -> String {
    to_markup(doc, doc.root(), true).expect("serialize document")
}

/// Maps a flat text offset to a point inside a text node. An offset on the
/// seam between two nodes resolves to the end of the earlier one.
pub fn point_at_text_offset(doc: &Document, root: NodeId, offset: usize) -> BoundaryPoint {
    let mut consumed = 0;
    for id in text_nodes(doc, root).expect("walk subtree") {
        let length = doc.length(id).expect("text node");
        if offset <= consumed + length {
            return BoundaryPoint::new(id, offset - consumed);
        }
        consumed += length;
    }
    panic!("offset {offset} beyond text length {consumed}");
}

pub fn range_from_text_offsets(doc: &Document, root: NodeId, start: usize, end: usize) -> DomRange {
    let start = point_at_text_offset(doc, root, start);
    let end = point_at_text_offset(doc, root, end);
    DomRange::new(doc, start, end).expect("valid range")
}
