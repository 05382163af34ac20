//! Range normalization: re-anchor both endpoints onto text nodes.
//!
//! After [`normalize_range`] returns `true`, the range's start is strictly
//! inside or at the beginning of a non-empty text node (`offset < length`),
//! its end is strictly inside or at the end of one (`offset > 0`), and start
//! precedes end. The span of text the range denotes is unchanged.

use dom::traverse::last_descendant;
use dom::{BoundaryPoint, Document, DomError, DomRange, NodeId, NodeType, TextWalker};
use std::cmp::Ordering;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    Forward,
    Backward,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum NormalizeError {
    /// No text node can stand in for `point`, in either direction.
    NoTextNodeInDirection {
        point: BoundaryPoint,
        direction: Direction,
    },
    Dom(DomError),
}

impl From<DomError> for NormalizeError {
    fn from(err: DomError) -> Self {
        NormalizeError::Dom(err)
    }
}

/// Re-anchor `range` onto text nodes. Returns `false`, leaving the range
/// untouched, when the range covers no text at all.
pub fn normalize_range(doc: &Document, range: &mut DomRange) -> Result<bool, DomError> {
    if range.collapsed() {
        return Ok(false);
    }
    match resolve_range(doc, range) {
        Ok(Some((start, end))) => {
            *range = DomRange::new(doc, start, end)?;
            Ok(true)
        }
        Ok(None) => Ok(false),
        Err(NormalizeError::NoTextNodeInDirection { point, direction }) => {
            log::debug!(
                target: "highlight.normalize",
                "no text node {direction:?} of {point:?}; nothing to highlight"
            );
            Ok(false)
        }
        Err(NormalizeError::Dom(err)) => Err(err),
    }
}

fn resolve_range(
    doc: &Document,
    range: &DomRange,
) -> Result<Option<(BoundaryPoint, BoundaryPoint)>, NormalizeError> {
    let mut start = resolve_endpoint(doc, range.start())?;
    let mut end = resolve_endpoint(doc, range.end())?;

    // A start at the very end of its node covers nothing of it: move on to
    // the next non-empty text node. Symmetrically for an end at offset 0.
    while start.offset == doc.length(start.node)? {
        let root = doc.root_of(start.node)?;
        match TextWalker::with_current(root, start.node).next_text(doc)? {
            Some(next) => start = BoundaryPoint::new(next, 0),
            None => return Ok(None),
        }
    }
    while end.offset == 0 {
        let root = doc.root_of(end.node)?;
        match TextWalker::with_current(root, end.node).previous_text(doc)? {
            Some(prev) => end = BoundaryPoint::new(prev, doc.length(prev)?),
            None => return Ok(None),
        }
    }

    if dom::compare_boundary_points(doc, start, end)? != Ordering::Less {
        return Ok(None);
    }
    Ok(Some((start, end)))
}

/// Equivalent text-node position for `point`.
///
/// A container point at `(node, child_count)` resolves backward to the end
/// of the nearest preceding text node; any other container point resolves
/// forward to offset 0 of the nearest following one. When the preferred
/// direction has no text, the opposite direction is tried from the other side
/// of the container, since no text lies in between.
pub(crate) fn resolve_endpoint(
    doc: &Document,
    point: BoundaryPoint,
) -> Result<BoundaryPoint, NormalizeError> {
    let node = point.node;
    let root = doc.root_of(node)?;
    match doc.node_type(node)? {
        NodeType::Text => Ok(point),
        NodeType::Comment => {
            // Character data without text: stand in with its neighbours.
            let after = last_descendant(doc, node)?;
            first_of(
                doc,
                point,
                [
                    (Direction::Forward, walk(doc, root, after, Direction::Forward)?),
                    (Direction::Backward, walk(doc, root, node, Direction::Backward)?),
                ],
            )
        }
        NodeType::Document | NodeType::Element => {
            let children = doc.children(node)?;
            match children.get(point.offset).copied() {
                None => {
                    let last = last_descendant(doc, node)?;
                    let backward = if last != node && doc.is_text(last) {
                        Some(last)
                    } else {
                        walk(doc, root, last, Direction::Backward)?
                    };
                    first_of(
                        doc,
                        point,
                        [
                            (Direction::Backward, backward),
                            (Direction::Forward, walk(doc, root, last, Direction::Forward)?),
                        ],
                    )
                }
                Some(child) => {
                    let forward = if doc.is_text(child) {
                        Some(child)
                    } else {
                        walk(doc, root, child, Direction::Forward)?
                    };
                    first_of(
                        doc,
                        point,
                        [
                            (Direction::Forward, forward),
                            (Direction::Backward, walk(doc, root, child, Direction::Backward)?),
                        ],
                    )
                }
            }
        }
    }
}

fn walk(
    doc: &Document,
    root: NodeId,
    from: NodeId,
    direction: Direction,
) -> Result<Option<NodeId>, DomError> {
    let mut walker = TextWalker::with_current(root, from);
    match direction {
        Direction::Forward => walker.next_text(doc),
        Direction::Backward => walker.previous_text(doc),
    }
}

fn first_of(
    doc: &Document,
    point: BoundaryPoint,
    candidates: [(Direction, Option<NodeId>); 2],
) -> Result<BoundaryPoint, NormalizeError> {
    for (direction, found) in candidates {
        if let Some(text) = found {
            return Ok(match direction {
                Direction::Forward => BoundaryPoint::new(text, 0),
                Direction::Backward => BoundaryPoint::new(text, doc.length(text)?),
            });
        }
    }
    Err(NormalizeError::NoTextNodeInDirection {
        point,
        direction: candidates[0].0,
    })
}
