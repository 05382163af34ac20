use std::sync::Arc;

/// Opaque arena handle for a node of a [`Document`](crate::Document).
///
/// Ids are handed out in creation order and are never reused, so a stale id
/// can only ever resolve to the node it was created for (or to nothing, once
/// that node has been discarded).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Document,
    Element {
        name: Arc<str>,
        attributes: Vec<(Arc<str>, String)>,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

/// Fieldless discriminant of [`NodeKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeType {
    Document,
    Element,
    Text,
    Comment,
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Document => NodeType::Document,
            NodeKind::Element { .. } => NodeType::Element,
            NodeKind::Text { .. } => NodeType::Text,
            NodeKind::Comment { .. } => NodeType::Comment,
        }
    }

    /// Documents and elements hold children; character data does not.
    pub fn allows_children(&self) -> bool {
        matches!(self, NodeKind::Document | NodeKind::Element { .. })
    }

    /// Payload of text and comment nodes, addressed by byte offsets.
    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeKind::Text { text } | NodeKind::Comment { text } => Some(text),
            NodeKind::Document | NodeKind::Element { .. } => None,
        }
    }
}

/// A position in the tree: `offset` is a byte offset into character data,
/// or a child index for containers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BoundaryPoint {
    pub node: NodeId,
    pub offset: usize,
}

impl BoundaryPoint {
    #[inline]
    pub const fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}
