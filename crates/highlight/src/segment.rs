//! Text node segmentation.
//!
//! Splits the boundary text nodes of a normalized range so that every text
//! node is either fully inside or fully outside it, then collects the inside
//! ones in tree order. The range is re-anchored across each split so that it
//! keeps denoting the same text.

use crate::normalize::normalize_range;
use dom::{BoundaryPoint, Document, DomError, DomRange, NodeId, TextWalker};
use std::cmp::Ordering;

/// Text nodes fully covered by `range`, in tree order, after splitting the
/// partially covered ones. Empty when the range covers no text; the tree is
/// not modified in that case.
pub fn text_nodes_in_range(doc: &mut Document, range: &mut DomRange) -> Result<Vec<NodeId>, DomError> {
    if !normalize_range(doc, range)? {
        return Ok(Vec::new());
    }
    split_boundaries(doc, range)?;
    collect_text_nodes(doc, range)
}

/// Expects a range produced by [`normalize_range`].
fn split_boundaries(doc: &mut Document, range: &mut DomRange) -> Result<(), DomError> {
    let start = range.start();
    if start.offset > 0 {
        let end = range.end();
        let created = doc.split_text(start.node, start.offset)?;
        if end.node == start.node {
            // The end now lives in the suffix, shifted by the split point.
            range.set_end(doc, BoundaryPoint::new(created, end.offset - start.offset))?;
        }
        range.set_start(doc, BoundaryPoint::new(created, 0))?;
    }

    let end = range.end();
    if end.offset < doc.length(end.node)? {
        // The prefix keeps the node's identity, so the end point stays valid.
        doc.split_text(end.node, end.offset)?;
    }
    Ok(())
}

fn collect_text_nodes(doc: &Document, range: &DomRange) -> Result<Vec<NodeId>, DomError> {
    let root = range.common_ancestor_container(doc)?;
    let first = range.start_container();
    let last = range.end_container();
    let mut nodes = Vec::new();
    if doc.is_text(first) && doc.length(first)? > 0 {
        nodes.push(first);
    }
    if first == last {
        return Ok(nodes);
    }

    let mut walker = TextWalker::with_current(root, first);
    while let Some(node) = walker.next_text(doc)? {
        if range.compare_point(doc, node, 0)? == Ordering::Greater {
            break;
        }
        if doc.length(node)? > 0 && range.intersects_node(doc, node)? {
            nodes.push(node);
        } else {
            log::trace!(target: "highlight.segment", "skipping empty text node {node:?}");
        }
        if node == last {
            break;
        }
    }
    log::trace!(
        target: "highlight.segment",
        "{} text nodes between {:?} and {:?}",
        nodes.len(),
        range.start(),
        range.end()
    );
    Ok(nodes)
}
