//! Tree-order traversal bounded by a root node.

use crate::Document;
use crate::error::DomError;
use crate::types::{NodeId, NodeType};

/// Next node in tree order (pre-order) after `node`, never leaving `root`.
pub fn next_in_tree(doc: &Document, node: NodeId, root: NodeId) -> Result<Option<NodeId>, DomError> {
    if let Some(child) = doc.first_child(node)? {
        return Ok(Some(child));
    }
    next_skipping_children(doc, node, root)
}

/// Next node in tree order that is not a descendant of `node`.
pub fn next_skipping_children(
    doc: &Document,
    node: NodeId,
    root: NodeId,
) -> Result<Option<NodeId>, DomError> {
    let mut current = node;
    loop {
        if current == root {
            return Ok(None);
        }
        if let Some(sibling) = doc.next_sibling(current)? {
            return Ok(Some(sibling));
        }
        match doc.parent(current)? {
            Some(parent) => current = parent,
            None => return Ok(None),
        }
    }
}

/// Previous node in tree order before `node`, never leaving `root`.
pub fn previous_in_tree(
    doc: &Document,
    node: NodeId,
    root: NodeId,
) -> Result<Option<NodeId>, DomError> {
    if node == root {
        return Ok(None);
    }
    match doc.previous_sibling(node)? {
        Some(sibling) => Ok(Some(last_descendant(doc, sibling)?)),
        None => doc.parent(node),
    }
}

/// Last node in tree order within `node`'s subtree (`node` itself when it has no children).
pub fn last_descendant(doc: &Document, node: NodeId) -> Result<NodeId, DomError> {
    let mut current = node;
    while let Some(child) = doc.last_child(current)? {
        current = child;
    }
    Ok(current)
}

/// Text-only tree walker, seeded at an arbitrary node and steppable both ways.
///
/// The current node need not be a text node; stepping moves to the nearest
/// text node in the requested direction, staying inside `root`.
#[derive(Clone, Copy, Debug)]
pub struct TextWalker {
    root: NodeId,
    current: NodeId,
}

impl TextWalker {
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            current: root,
        }
    }

    pub fn with_current(root: NodeId, current: NodeId) -> Self {
        Self { root, current }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn current(&self) -> NodeId {
        self.current
    }

    pub fn next_text(&mut self, doc: &Document) -> Result<Option<NodeId>, DomError> {
        let mut node = self.current;
        while let Some(next) = next_in_tree(doc, node, self.root)? {
            if doc.node_type(next)? == NodeType::Text {
                self.current = next;
                return Ok(Some(next));
            }
            node = next;
        }
        Ok(None)
    }

    pub fn previous_text(&mut self, doc: &Document) -> Result<Option<NodeId>, DomError> {
        let mut node = self.current;
        while let Some(prev) = previous_in_tree(doc, node, self.root)? {
            if doc.node_type(prev)? == NodeType::Text {
                self.current = prev;
                return Ok(Some(prev));
            }
            node = prev;
        }
        Ok(None)
    }
}

/// All text nodes under `root` (inclusive), in tree order.
pub fn text_nodes(doc: &Document, root: NodeId) -> Result<Vec<NodeId>, DomError> {
    let mut out = Vec::new();
    if doc.is_text(root) {
        out.push(root);
        return Ok(out);
    }
    let mut walker = TextWalker::new(root);
    while let Some(text) = walker.next_text(doc)? {
        out.push(text);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    // <div><p>a<em>b</em></p><!--c-->d</div>
    fn fixture() -> (Document, NodeId, [NodeId; 4]) {
        let mut doc = Document::new();
        let div = doc.create_element("div");
        let p = doc.create_element("p");
        let a = doc.create_text("a");
        let em = doc.create_element("em");
        let b = doc.create_text("b");
        let c = doc.create_comment("c");
        let d = doc.create_text("d");
        doc.append_child(doc.root(), div).unwrap();
        doc.append_child(div, p).unwrap();
        doc.append_child(p, a).unwrap();
        doc.append_child(p, em).unwrap();
        doc.append_child(em, b).unwrap();
        doc.append_child(div, c).unwrap();
        doc.append_child(div, d).unwrap();
        (doc, div, [a, b, c, d])
    }

    #[test]
    fn walker_visits_text_in_both_directions() {
        let (doc, div, [a, b, _, d]) = fixture();
        let mut walker = TextWalker::new(div);
        assert_eq!(walker.next_text(&doc).unwrap(), Some(a));
        assert_eq!(walker.next_text(&doc).unwrap(), Some(b));
        assert_eq!(walker.next_text(&doc).unwrap(), Some(d));
        assert_eq!(walker.next_text(&doc).unwrap(), None);
        assert_eq!(walker.current(), d);
        assert_eq!(walker.previous_text(&doc).unwrap(), Some(b));
        assert_eq!(walker.previous_text(&doc).unwrap(), Some(a));
        assert_eq!(walker.previous_text(&doc).unwrap(), None);
    }

    #[test]
    fn walker_stays_inside_root() {
        let (doc, _, [a, b, _, _]) = fixture();
        let em = doc.parent(b).unwrap().unwrap();
        let mut walker = TextWalker::with_current(em, b);
        assert_eq!(walker.next_text(&doc).unwrap(), None);
        assert_eq!(walker.previous_text(&doc).unwrap(), None);
        let p = doc.parent(a).unwrap().unwrap();
        assert_eq!(text_nodes(&doc, p).unwrap(), vec![a, b]);
    }

    #[test]
    fn previous_in_tree_descends_into_previous_sibling() {
        let (doc, div, [_, b, c, _]) = fixture();
        assert_eq!(previous_in_tree(&doc, c, div).unwrap(), Some(b));
        assert_eq!(last_descendant(&doc, div).unwrap(), doc.children(div).unwrap()[2]);
    }
}
