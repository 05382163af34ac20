//! Wrapping text leaves, and unwrapping them again.

use crate::error::HighlightError;
use crate::wrapper::WrapperFactory;
use dom::{Document, DomError, NodeId};

/// Replace `leaf` with a fresh wrapper that holds `leaf` as its only child.
pub(crate) fn wrap_leaf(
    doc: &mut Document,
    leaf: NodeId,
    factory: &mut WrapperFactory<'_>,
) -> Result<NodeId, HighlightError> {
    let wrapper = factory.create(doc, leaf)?;
    // Must be a detached container; its own children are dropped.
    if !doc.allows_children(wrapper)?
        || doc.parent(wrapper)?.is_some()
        || doc.contains(wrapper, leaf)?
    {
        return Err(HighlightError::InvalidWrapper(wrapper));
    }
    let parent = doc.parent(leaf)?.ok_or(DomError::Detached(leaf))?;
    for child in doc.children(wrapper)?.to_vec() {
        doc.discard(child)?;
    }
    doc.replace_child(parent, wrapper, leaf)?;
    doc.append_child(wrapper, leaf)?;
    Ok(wrapper)
}

/// Put the wrapper's content back where the wrapper is, then discard it.
/// Adjacent text nodes are not merged.
pub(crate) fn unwrap_wrapper(doc: &mut Document, wrapper: NodeId) -> Result<(), DomError> {
    let parent = doc.parent(wrapper)?.ok_or(DomError::Detached(wrapper))?;
    let children = doc.children(wrapper)?.to_vec();
    if let [only] = children.as_slice() {
        doc.replace_child(parent, *only, wrapper)?;
    } else {
        unwrap_each(doc, parent, wrapper, &children)?;
    }
    doc.discard(wrapper)
}

/// Something else changed the wrapper's children after it was created; move
/// every child out individually, keeping their order.
fn unwrap_each(
    doc: &mut Document,
    parent: NodeId,
    wrapper: NodeId,
    children: &[NodeId],
) -> Result<(), DomError> {
    log::debug!(
        target: "highlight.remove",
        "wrapper {wrapper:?} holds {} children; moving each out",
        children.len()
    );
    for child in children {
        doc.insert_before(parent, *child, Some(wrapper))?;
    }
    doc.remove_child(parent, wrapper)
}
