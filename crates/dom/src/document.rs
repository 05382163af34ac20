//! Arena-backed mutable document tree.
//!
//! Invariants:
//! - Every node lives in `nodes` at the index of its [`NodeId`]; ids are never reused.
//! - A node has at most one parent, and appears exactly once in that parent's children.
//! - Only documents and elements hold children.
//! - Discarded nodes stay in the arena as tombstones; every accessor reports them as missing.

use crate::error::DomError;
use crate::types::{NodeId, NodeKind, NodeType};
use std::sync::Arc;

#[derive(Clone, Debug)]
struct NodeRecord {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    live: bool,
}

/// Node ids stay valid across a clone.
#[derive(Clone, Debug)]
pub struct Document {
    nodes: Vec<NodeRecord>,
    root: NodeId,
}

impl Document {
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        doc.root = doc.push(NodeKind::Document);
        doc
    }

    /// The document node created together with the arena.
    pub fn root(&self) -> NodeId {
        self.root
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        debug_assert!(
            u32::try_from(self.nodes.len()).is_ok(),
            "node arena exceeds u32 ids"
        );
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeRecord {
            kind,
            parent: None,
            children: Vec::new(),
            live: true,
        });
        id
    }

    fn record(&self, id: NodeId) -> Result<&NodeRecord, DomError> {
        match self.nodes.get(id.index()) {
            Some(record) if record.live => Ok(record),
            _ => Err(DomError::MissingNode(id)),
        }
    }

    fn record_mut(&mut self, id: NodeId) -> Result<&mut NodeRecord, DomError> {
        match self.nodes.get_mut(id.index()) {
            Some(record) if record.live => Ok(record),
            _ => Err(DomError::MissingNode(id)),
        }
    }

    // ---------------------------------------------------------------------
    // Creation
    // ---------------------------------------------------------------------

    pub fn create_element(&mut self, name: &str) -> NodeId {
        self.push(NodeKind::Element {
            name: Arc::from(name),
            attributes: Vec::new(),
        })
    }

    pub fn create_element_with_attributes<K, V>(
        &mut self,
        name: &str,
        attributes: impl IntoIterator<Item = (K, V)>,
    ) -> NodeId
    where
        K: AsRef<str>,
        V: Into<String>,
    {
        let attributes = attributes
            .into_iter()
            .map(|(k, v)| (Arc::from(k.as_ref()), v.into()))
            .collect();
        self.push(NodeKind::Element {
            name: Arc::from(name),
            attributes,
        })
    }

    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text { text: text.into() })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.push(NodeKind::Comment { text: text.into() })
    }

    /// Copy `node` into a new detached node. A shallow clone carries the
    /// node's own data (name, attributes, text) but no children.
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> Result<NodeId, DomError> {
        let kind = self.record(node)?.kind.clone();
        if matches!(kind, NodeKind::Document) {
            return Err(DomError::NotInsertable(node));
        }
        let copy = self.push(kind);
        if deep {
            let children = self.record(node)?.children.clone();
            for child in children {
                let child_copy = self.clone_node(child, true)?;
                self.append_child(copy, child_copy)?;
            }
        }
        Ok(copy)
    }

    // ---------------------------------------------------------------------
    // Inspection & navigation
    // ---------------------------------------------------------------------

    pub fn is_live(&self, id: NodeId) -> bool {
        self.record(id).is_ok()
    }

    /// Number of nodes that have not been discarded, attached or not.
    pub fn live_count(&self) -> usize {
        self.nodes.iter().filter(|record| record.live).count()
    }

    pub fn kind(&self, id: NodeId) -> Result<&NodeKind, DomError> {
        Ok(&self.record(id)?.kind)
    }

    pub fn node_type(&self, id: NodeId) -> Result<NodeType, DomError> {
        Ok(self.record(id)?.kind.node_type())
    }

    /// `false` for missing nodes as well as for non-text nodes.
    pub fn is_text(&self, id: NodeId) -> bool {
        matches!(self.node_type(id), Ok(NodeType::Text))
    }

    pub fn allows_children(&self, id: NodeId) -> Result<bool, DomError> {
        Ok(self.record(id)?.kind.allows_children())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.record(id)?.parent)
    }

    pub fn children(&self, id: NodeId) -> Result<&[NodeId], DomError> {
        Ok(&self.record(id)?.children)
    }

    pub fn first_child(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.record(id)?.children.first().copied())
    }

    pub fn last_child(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.record(id)?.children.last().copied())
    }

    pub fn index_in_parent(&self, id: NodeId) -> Result<Option<usize>, DomError> {
        let Some(parent) = self.record(id)?.parent else {
            return Ok(None);
        };
        let index = self
            .record(parent)?
            .children
            .iter()
            .position(|c| *c == id);
        debug_assert!(index.is_some(), "child missing from its parent's list");
        Ok(index)
    }

    pub fn next_sibling(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        let Some(parent) = self.record(id)?.parent else {
            return Ok(None);
        };
        let Some(index) = self.index_in_parent(id)? else {
            return Ok(None);
        };
        Ok(self.record(parent)?.children.get(index + 1).copied())
    }

    pub fn previous_sibling(&self, id: NodeId) -> Result<Option<NodeId>, DomError> {
        let Some(parent) = self.record(id)?.parent else {
            return Ok(None);
        };
        match self.index_in_parent(id)? {
            Some(index) if index > 0 => Ok(self.record(parent)?.children.get(index - 1).copied()),
            _ => Ok(None),
        }
    }

    /// Byte length of character data, or the child count of a container.
    pub fn length(&self, id: NodeId) -> Result<usize, DomError> {
        let record = self.record(id)?;
        Ok(match record.kind.character_data() {
            Some(text) => text.len(),
            None => record.children.len(),
        })
    }

    /// Character data of a text or comment node.
    pub fn text(&self, id: NodeId) -> Result<&str, DomError> {
        self.record(id)?
            .kind
            .character_data()
            .ok_or(DomError::WrongNodeKind(id))
    }

    /// Concatenation of every descendant text node, in tree order.
    pub fn text_content(&self, id: NodeId) -> Result<String, DomError> {
        let mut out = String::new();
        self.collect_text(id, &mut out)?;
        Ok(out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String) -> Result<(), DomError> {
        let record = self.record(id)?;
        match &record.kind {
            NodeKind::Text { text } => out.push_str(text),
            NodeKind::Comment { .. } => {}
            NodeKind::Document | NodeKind::Element { .. } => {
                for child in &record.children {
                    self.collect_text(*child, out)?;
                }
            }
        }
        Ok(())
    }

    pub fn root_of(&self, id: NodeId) -> Result<NodeId, DomError> {
        let mut current = id;
        while let Some(parent) = self.record(current)?.parent {
            current = parent;
        }
        Ok(current)
    }

    /// Inclusive ancestor test: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> Result<bool, DomError> {
        self.record(ancestor)?;
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return Ok(true);
            }
            current = self.record(id)?.parent;
        }
        Ok(false)
    }

    /// Inclusive ancestors of `id`, starting with `id` itself.
    pub fn ancestors(&self, id: NodeId) -> Result<Vec<NodeId>, DomError> {
        let mut out = vec![id];
        let mut current = id;
        while let Some(parent) = self.record(current)?.parent {
            out.push(parent);
            current = parent;
        }
        Ok(out)
    }

    /// Deepest node that is an inclusive ancestor of both `a` and `b`.
    pub fn common_ancestor(&self, a: NodeId, b: NodeId) -> Result<Option<NodeId>, DomError> {
        let chain = self.ancestors(a)?;
        let mut current = Some(b);
        while let Some(id) = current {
            if chain.contains(&id) {
                return Ok(Some(id));
            }
            current = self.record(id)?.parent;
        }
        Ok(None)
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    fn ensure_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if !self.record(parent)?.kind.allows_children() {
            return Err(DomError::InvalidParent(parent));
        }
        if matches!(self.record(child)?.kind, NodeKind::Document) {
            return Err(DomError::NotInsertable(child));
        }
        if self.contains(child, parent)? {
            return Err(DomError::CycleDetected { parent, child });
        }
        Ok(())
    }

    /// Remove `node` from its parent, if it has one. The node stays live.
    pub fn detach(&mut self, node: NodeId) -> Result<(), DomError> {
        let Some(parent) = self.record_mut(node)?.parent.take() else {
            return Ok(());
        };
        let siblings = &mut self.record_mut(parent)?.children;
        let before = siblings.len();
        siblings.retain(|c| *c != node);
        debug_assert_eq!(before, siblings.len() + 1, "child listed exactly once");
        Ok(())
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `before`, or at the end when
    /// `before` is `None`. An attached `child` is moved.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        before: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.ensure_insertable(parent, child)?;
        if let Some(before) = before
            && self.record(before)?.parent != Some(parent)
        {
            return Err(DomError::NotAChild {
                parent,
                child: before,
            });
        }
        if before == Some(child) {
            return Ok(());
        }
        self.detach(child)?;
        let siblings = &mut self.record_mut(parent)?.children;
        match before {
            Some(before) => {
                let pos = siblings
                    .iter()
                    .position(|c| *c == before)
                    .ok_or(DomError::NotAChild {
                        parent,
                        child: before,
                    })?;
                siblings.insert(pos, child);
            }
            None => siblings.push(child),
        }
        self.record_mut(child)?.parent = Some(parent);
        Ok(())
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.record(child)?.parent != Some(parent) {
            return Err(DomError::NotAChild { parent, child });
        }
        self.detach(child)
    }

    /// Put `new_child` at the position `old_child` occupies in `parent`;
    /// `old_child` ends up detached.
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        new_child: NodeId,
        old_child: NodeId,
    ) -> Result<(), DomError> {
        if self.record(old_child)?.parent != Some(parent) {
            return Err(DomError::NotAChild {
                parent,
                child: old_child,
            });
        }
        if new_child == old_child {
            return Ok(());
        }
        self.ensure_insertable(parent, new_child)?;
        self.detach(new_child)?;
        let siblings = &mut self.record_mut(parent)?.children;
        let pos = siblings
            .iter()
            .position(|c| *c == old_child)
            .ok_or(DomError::NotAChild {
                parent,
                child: old_child,
            })?;
        siblings[pos] = new_child;
        self.record_mut(old_child)?.parent = None;
        self.record_mut(new_child)?.parent = Some(parent);
        Ok(())
    }

    /// Detach `node` and tombstone its whole subtree.
    pub fn discard(&mut self, node: NodeId) -> Result<(), DomError> {
        if node == self.root {
            return Err(DomError::NotInsertable(node));
        }
        self.detach(node)?;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let record = self.record_mut(id)?;
            record.live = false;
            record.parent = None;
            stack.extend(record.children.drain(..));
        }
        Ok(())
    }

    /// Split a text node at byte `offset`. The original node keeps
    /// `[0, offset)`; the returned node holds the rest and is inserted right
    /// after it when the original has a parent.
    pub fn split_text(&mut self, node: NodeId, offset: usize) -> Result<NodeId, DomError> {
        let NodeKind::Text { text } = &self.record(node)?.kind else {
            return Err(DomError::WrongNodeKind(node));
        };
        if offset > text.len() {
            return Err(DomError::IndexSize {
                node,
                offset,
                length: text.len(),
            });
        }
        if !text.is_char_boundary(offset) {
            return Err(DomError::NotCharBoundary { node, offset });
        }
        let tail = text[offset..].to_string();
        let parent = self.record(node)?.parent;
        let next = self.next_sibling(node)?;
        if let NodeKind::Text { text } = &mut self.record_mut(node)?.kind {
            text.truncate(offset);
        }
        let created = self.create_text(tail);
        if let Some(parent) = parent {
            self.insert_before(parent, created, next)?;
        }
        log::trace!(target: "dom.split", "split {node:?} at {offset} -> {created:?}");
        Ok(created)
    }

    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let NodeKind::Element { attributes, .. } = &mut self.record_mut(element)?.kind else {
            return Err(DomError::WrongNodeKind(element));
        };
        let value = value.into();
        match attributes.iter_mut().find(|(k, _)| &**k == name) {
            Some((_, existing)) => *existing = value,
            None => attributes.push((Arc::from(name), value)),
        }
        Ok(())
    }

    pub fn attribute(&self, element: NodeId, name: &str) -> Result<Option<&str>, DomError> {
        let NodeKind::Element { attributes, .. } = &self.record(element)?.kind else {
            return Err(DomError::WrongNodeKind(element));
        };
        Ok(attributes
            .iter()
            .find(|(k, _)| &**k == name)
            .map(|(_, v)| v.as_str()))
    }

    pub fn element_name(&self, element: NodeId) -> Result<&str, DomError> {
        match &self.record(element)?.kind {
            NodeKind::Element { name, .. } => Ok(name),
            _ => Err(DomError::WrongNodeKind(element)),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph(doc: &mut Document, texts: &[&str]) -> (NodeId, Vec<NodeId>) {
        let p = doc.create_element("p");
        doc.append_child(doc.root(), p).unwrap();
        let ids = texts
            .iter()
            .map(|t| {
                let id = doc.create_text(*t);
                doc.append_child(p, id).unwrap();
                id
            })
            .collect();
        (p, ids)
    }

    #[test]
    fn split_text_keeps_order_and_content() {
        let mut doc = Document::new();
        let (p, ids) = paragraph(&mut doc, &["abcdef", "!"]);
        let tail = doc.split_text(ids[0], 2).unwrap();
        assert_eq!(doc.text(ids[0]).unwrap(), "ab");
        assert_eq!(doc.text(tail).unwrap(), "cdef");
        assert_eq!(doc.children(p).unwrap(), &[ids[0], tail, ids[1]]);
        assert_eq!(doc.text_content(p).unwrap(), "abcdef!");
    }

    #[test]
    fn split_text_rejects_bad_offsets() {
        let mut doc = Document::new();
        let (_, ids) = paragraph(&mut doc, &["héllo"]);
        assert_eq!(
            doc.split_text(ids[0], 2),
            Err(DomError::NotCharBoundary {
                node: ids[0],
                offset: 2
            })
        );
        assert!(matches!(
            doc.split_text(ids[0], 99),
            Err(DomError::IndexSize { .. })
        ));
        let p = doc.parent(ids[0]).unwrap().unwrap();
        assert_eq!(doc.split_text(p, 0), Err(DomError::WrongNodeKind(p)));
    }

    #[test]
    fn split_detached_text_produces_detached_tail() {
        let mut doc = Document::new();
        let text = doc.create_text("hello");
        let tail = doc.split_text(text, 3).unwrap();
        assert_eq!(doc.parent(tail).unwrap(), None);
        assert_eq!(doc.text(tail).unwrap(), "lo");
    }

    #[test]
    fn replace_child_swaps_in_place() {
        let mut doc = Document::new();
        let (p, ids) = paragraph(&mut doc, &["a", "b", "c"]);
        let mark = doc.create_element("mark");
        doc.replace_child(p, mark, ids[1]).unwrap();
        assert_eq!(doc.children(p).unwrap(), &[ids[0], mark, ids[2]]);
        assert_eq!(doc.parent(ids[1]).unwrap(), None);
        doc.append_child(mark, ids[1]).unwrap();
        assert_eq!(doc.text_content(p).unwrap(), "abc");
    }

    #[test]
    fn insert_rejects_cycles_and_leaf_parents() {
        let mut doc = Document::new();
        let (p, ids) = paragraph(&mut doc, &["a"]);
        let span = doc.create_element("span");
        doc.append_child(p, span).unwrap();
        assert_eq!(
            doc.append_child(span, p),
            Err(DomError::CycleDetected {
                parent: span,
                child: p
            })
        );
        assert_eq!(
            doc.append_child(ids[0], span),
            Err(DomError::InvalidParent(ids[0]))
        );
        assert_eq!(
            doc.append_child(p, doc.root()),
            Err(DomError::NotInsertable(doc.root()))
        );
    }

    #[test]
    fn insert_before_moves_attached_nodes() {
        let mut doc = Document::new();
        let (p, ids) = paragraph(&mut doc, &["a", "b", "c"]);
        doc.insert_before(p, ids[2], Some(ids[0])).unwrap();
        assert_eq!(doc.children(p).unwrap(), &[ids[2], ids[0], ids[1]]);
    }

    #[test]
    fn discard_tombstones_subtree() {
        let mut doc = Document::new();
        let (p, ids) = paragraph(&mut doc, &["a", "b"]);
        let before = doc.live_count();
        doc.discard(p).unwrap();
        assert_eq!(doc.live_count(), before - 3);
        assert_eq!(doc.parent(ids[0]), Err(DomError::MissingNode(ids[0])));
        assert!(doc.children(doc.root()).unwrap().is_empty());
    }

    #[test]
    fn shallow_clone_drops_children() {
        let mut doc = Document::new();
        let template =
            doc.create_element_with_attributes("mark", [("class", "hl"), ("data-id", "7")]);
        let inner = doc.create_text("x");
        doc.append_child(template, inner).unwrap();
        let copy = doc.clone_node(template, false).unwrap();
        assert!(doc.children(copy).unwrap().is_empty());
        assert_eq!(doc.attribute(copy, "data-id").unwrap(), Some("7"));
        let deep = doc.clone_node(template, true).unwrap();
        assert_eq!(doc.text_content(deep).unwrap(), "x");
    }

    #[test]
    fn common_ancestor_of_cousins() {
        let mut doc = Document::new();
        let (p, ids) = paragraph(&mut doc, &["a"]);
        let em = doc.create_element("em");
        let b = doc.create_text("b");
        doc.append_child(p, em).unwrap();
        doc.append_child(em, b).unwrap();
        assert_eq!(doc.common_ancestor(ids[0], b).unwrap(), Some(p));
        assert_eq!(doc.common_ancestor(b, b).unwrap(), Some(b));
        let loose = doc.create_text("z");
        assert_eq!(doc.common_ancestor(loose, b).unwrap(), None);
    }
}
