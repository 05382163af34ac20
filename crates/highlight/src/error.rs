use dom::{DomError, NodeId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HighlightError {
    /// The wrapper configuration cannot produce wrapper elements. Reported
    /// before the tree is touched.
    #[error("malformed wrapper spec: {0}")]
    MalformedWrapperSpec(String),
    /// A wrapper factory returned a node that cannot hold the text leaf.
    #[error("wrapper {0:?} cannot contain the highlighted text")]
    InvalidWrapper(NodeId),
    #[error(transparent)]
    Dom(#[from] DomError),
}
