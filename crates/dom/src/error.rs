//! Failures reported by tree primitives.

use crate::types::NodeId;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("node {0:?} does not exist or was discarded")]
    MissingNode(NodeId),
    #[error("offset {offset} is out of bounds for node {node:?} of length {length}")]
    IndexSize {
        node: NodeId,
        offset: usize,
        length: usize,
    },
    #[error("offset {offset} in node {node:?} is not on a character boundary")]
    NotCharBoundary { node: NodeId, offset: usize },
    #[error("node {0:?} cannot have children")]
    InvalidParent(NodeId),
    #[error("node {0:?} cannot be inserted into a tree")]
    NotInsertable(NodeId),
    #[error("inserting {child:?} under {parent:?} would create a cycle")]
    CycleDetected { parent: NodeId, child: NodeId },
    #[error("node {child:?} is not a child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
    #[error("node {0:?} has no parent")]
    Detached(NodeId),
    #[error("node {0:?} has the wrong kind for this operation")]
    WrongNodeKind(NodeId),
    #[error("nodes {a:?} and {b:?} do not share a root")]
    DisjointTrees { a: NodeId, b: NodeId },
}
