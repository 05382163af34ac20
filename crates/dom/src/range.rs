//! Boundary-point ranges over a [`Document`].
//!
//! A [`DomRange`] is a plain value: tree mutations never update it. Callers
//! that restructure the tree under a range are responsible for re-anchoring
//! its endpoints.

use crate::Document;
use crate::error::DomError;
use crate::traverse::text_nodes;
use crate::types::{BoundaryPoint, NodeId};
use std::cmp::Ordering;

/// Checks that `point` addresses an existing position: the node is live and
/// the offset is within its length (and on a char boundary for character data).
pub fn validate_point(doc: &Document, point: BoundaryPoint) -> Result<(), DomError> {
    let length = doc.length(point.node)?;
    if point.offset > length {
        return Err(DomError::IndexSize {
            node: point.node,
            offset: point.offset,
            length,
        });
    }
    if let Some(text) = doc.kind(point.node)?.character_data()
        && !text.is_char_boundary(point.offset)
    {
        return Err(DomError::NotCharBoundary {
            node: point.node,
            offset: point.offset,
        });
    }
    Ok(())
}

/// Tree order of two nodes: `Less` when `a` precedes `b` (ancestors precede
/// their descendants).
pub fn tree_order(doc: &Document, a: NodeId, b: NodeId) -> Result<Ordering, DomError> {
    if a == b {
        return Ok(Ordering::Equal);
    }
    let path_a = index_path(doc, a)?;
    let path_b = index_path(doc, b)?;
    if path_a.0 != path_b.0 {
        return Err(DomError::DisjointTrees { a, b });
    }
    Ok(path_a.1.cmp(&path_b.1))
}

fn index_path(doc: &Document, node: NodeId) -> Result<(NodeId, Vec<usize>), DomError> {
    let mut path = Vec::new();
    let mut current = node;
    while let Some(parent) = doc.parent(current)? {
        let index = doc
            .index_in_parent(current)?
            .ok_or(DomError::NotAChild {
                parent,
                child: current,
            })?;
        path.push(index);
        current = parent;
    }
    path.reverse();
    Ok((current, path))
}

/// Position of `a` relative to `b` in tree order.
pub fn compare_boundary_points(
    doc: &Document,
    a: BoundaryPoint,
    b: BoundaryPoint,
) -> Result<Ordering, DomError> {
    if a.node == b.node {
        return Ok(a.offset.cmp(&b.offset));
    }
    if tree_order(doc, a.node, b.node)? == Ordering::Greater {
        return Ok(compare_boundary_points(doc, b, a)?.reverse());
    }
    // `a.node` precedes `b.node`; if it is an ancestor, compare against the
    // child of `a.node` that leads down to `b.node`.
    if doc.contains(a.node, b.node)? {
        let mut child = b.node;
        while let Some(parent) = doc.parent(child)? {
            if parent == a.node {
                break;
            }
            child = parent;
        }
        let index = doc.index_in_parent(child)?.unwrap_or(0);
        if index < a.offset {
            return Ok(Ordering::Greater);
        }
    }
    Ok(Ordering::Less)
}

/// Number of text bytes that precede `point` in its root's concatenated text.
pub fn text_position(doc: &Document, point: BoundaryPoint) -> Result<usize, DomError> {
    validate_point(doc, point)?;
    let root = doc.root_of(point.node)?;
    let mut total = 0;
    for text in text_nodes(doc, root)? {
        if text == point.node {
            return Ok(total + point.offset);
        }
        let length = doc.length(text)?;
        let end = BoundaryPoint::new(text, length);
        if compare_boundary_points(doc, end, point)? == Ordering::Greater {
            break;
        }
        total += length;
    }
    Ok(total)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DomRange {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl DomRange {
    /// A collapsed range at `point`.
    pub fn collapsed_at(doc: &Document, point: BoundaryPoint) -> Result<Self, DomError> {
        validate_point(doc, point)?;
        Ok(Self {
            start: point,
            end: point,
        })
    }

    /// Equivalent to creating a collapsed range at `start` and calling `set_end(end)`.
    pub fn new(doc: &Document, start: BoundaryPoint, end: BoundaryPoint) -> Result<Self, DomError> {
        let mut range = Self::collapsed_at(doc, start)?;
        range.set_end(doc, end)?;
        Ok(range)
    }

    pub fn start(&self) -> BoundaryPoint {
        self.start
    }

    pub fn end(&self) -> BoundaryPoint {
        self.end
    }

    pub fn start_container(&self) -> NodeId {
        self.start.node
    }

    pub fn start_offset(&self) -> usize {
        self.start.offset
    }

    pub fn end_container(&self) -> NodeId {
        self.end.node
    }

    pub fn end_offset(&self) -> usize {
        self.end.offset
    }

    pub fn collapsed(&self) -> bool {
        self.start == self.end
    }

    /// Moves the start. If the new start lies after the end, or in another
    /// tree, the range collapses onto it.
    pub fn set_start(&mut self, doc: &Document, point: BoundaryPoint) -> Result<(), DomError> {
        validate_point(doc, point)?;
        if !self.same_root(doc, point.node)?
            || compare_boundary_points(doc, point, self.end)? == Ordering::Greater
        {
            self.end = point;
        }
        self.start = point;
        Ok(())
    }

    /// Moves the end. If the new end lies before the start, or in another
    /// tree, the range collapses onto it.
    pub fn set_end(&mut self, doc: &Document, point: BoundaryPoint) -> Result<(), DomError> {
        validate_point(doc, point)?;
        if !self.same_root(doc, point.node)?
            || compare_boundary_points(doc, point, self.start)? == Ordering::Less
        {
            self.start = point;
        }
        self.end = point;
        Ok(())
    }

    fn same_root(&self, doc: &Document, node: NodeId) -> Result<bool, DomError> {
        // A discarded endpoint means the range lost its tree entirely.
        if !doc.is_live(self.start.node) || !doc.is_live(self.end.node) {
            return Ok(false);
        }
        Ok(doc.root_of(node)? == doc.root_of(self.start.node)?
            && doc.root_of(node)? == doc.root_of(self.end.node)?)
    }

    pub fn select_node(&mut self, doc: &Document, node: NodeId) -> Result<(), DomError> {
        let parent = doc.parent(node)?.ok_or(DomError::Detached(node))?;
        let index = doc
            .index_in_parent(node)?
            .ok_or(DomError::Detached(node))?;
        self.start = BoundaryPoint::new(parent, index);
        self.end = BoundaryPoint::new(parent, index + 1);
        Ok(())
    }

    pub fn select_node_contents(&mut self, doc: &Document, node: NodeId) -> Result<(), DomError> {
        let length = doc.length(node)?;
        self.start = BoundaryPoint::new(node, 0);
        self.end = BoundaryPoint::new(node, length);
        Ok(())
    }

    pub fn common_ancestor_container(&self, doc: &Document) -> Result<NodeId, DomError> {
        doc.common_ancestor(self.start.node, self.end.node)?
            .ok_or(DomError::DisjointTrees {
                a: self.start.node,
                b: self.end.node,
            })
    }

    /// `Less` when the point lies before the range, `Greater` when after,
    /// `Equal` when inside (endpoints included).
    pub fn compare_point(
        &self,
        doc: &Document,
        node: NodeId,
        offset: usize,
    ) -> Result<Ordering, DomError> {
        let point = BoundaryPoint::new(node, offset);
        validate_point(doc, point)?;
        if !self.same_root(doc, node)? {
            return Err(DomError::DisjointTrees {
                a: node,
                b: self.start.node,
            });
        }
        if compare_boundary_points(doc, point, self.start)? == Ordering::Less {
            return Ok(Ordering::Less);
        }
        if compare_boundary_points(doc, point, self.end)? == Ordering::Greater {
            return Ok(Ordering::Greater);
        }
        Ok(Ordering::Equal)
    }

    /// Whether any part of `node` lies inside the range.
    pub fn intersects_node(&self, doc: &Document, node: NodeId) -> Result<bool, DomError> {
        if !self.same_root(doc, node)? {
            return Ok(false);
        }
        let Some(parent) = doc.parent(node)? else {
            return Ok(true);
        };
        let index = doc
            .index_in_parent(node)?
            .ok_or(DomError::Detached(node))?;
        let before = BoundaryPoint::new(parent, index);
        let after = BoundaryPoint::new(parent, index + 1);
        Ok(
            compare_boundary_points(doc, before, self.end)? == Ordering::Less
                && compare_boundary_points(doc, after, self.start)? == Ordering::Greater,
        )
    }

    /// Both endpoints still address existing positions in one tree.
    pub fn is_valid(&self, doc: &Document) -> bool {
        validate_point(doc, self.start).is_ok()
            && validate_point(doc, self.end).is_ok()
            && matches!(self.same_root(doc, self.start.node), Ok(true))
    }

    /// Endpoints projected onto the concatenated text of the range's root.
    pub fn text_offsets(&self, doc: &Document) -> Result<(usize, usize), DomError> {
        Ok((
            text_position(doc, self.start)?,
            text_position(doc, self.end)?,
        ))
    }

    /// The text covered by the range.
    pub fn to_text(&self, doc: &Document) -> Result<String, DomError> {
        let root = doc.root_of(self.start.node)?;
        let (start, end) = self.text_offsets(doc)?;
        let text = doc.text_content(root)?;
        Ok(text.get(start..end).unwrap_or_default().to_string())
    }
}
