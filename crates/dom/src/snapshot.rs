//! Deterministic serialization for tests and debugging.
//! Not a stable interchange format.

use crate::Document;
use crate::error::DomError;
use crate::types::{NodeId, NodeKind};

/// Compact markup: `<p>f<mark class="highlight">oo</mark></p>`.
///
/// Text is written verbatim (no escaping); adjacent text nodes are separated
/// by `|` when `show_text_boundaries` is set, which makes fragmentation visible.
pub fn to_markup(doc: &Document, node: NodeId, show_text_boundaries: bool) -> Result<String, DomError> {
    let mut out = String::new();
    write_markup(doc, node, show_text_boundaries, &mut out)?;
    Ok(out)
}

fn write_markup(
    doc: &Document,
    node: NodeId,
    show_text_boundaries: bool,
    out: &mut String,
) -> Result<(), DomError> {
    match doc.kind(node)? {
        NodeKind::Document => write_children(doc, node, show_text_boundaries, out)?,
        NodeKind::Element { name, attributes } => {
            out.push('<');
            out.push_str(name);
            for (k, v) in attributes {
                out.push_str(&format!(r#" {k}="{v}""#));
            }
            out.push('>');
            write_children(doc, node, show_text_boundaries, out)?;
            out.push_str(&format!("</{name}>"));
        }
        NodeKind::Text { text } => out.push_str(text),
        NodeKind::Comment { text } => out.push_str(&format!("<!--{text}-->")),
    }
    Ok(())
}

fn write_children(
    doc: &Document,
    node: NodeId,
    show_text_boundaries: bool,
    out: &mut String,
) -> Result<(), DomError> {
    let mut previous_was_text = false;
    for child in doc.children(node)? {
        let is_text = doc.is_text(*child);
        if show_text_boundaries && is_text && previous_was_text {
            out.push('|');
        }
        write_markup(doc, *child, show_text_boundaries, out)?;
        previous_was_text = is_text;
    }
    Ok(())
}

/// One line per node, indented by depth, capped at `cap` lines.
pub fn outline(doc: &Document, root: NodeId, cap: usize) -> Result<Vec<String>, DomError> {
    fn walk(
        doc: &Document,
        node: NodeId,
        depth: usize,
        out: &mut Vec<String>,
        left: &mut usize,
    ) -> Result<(), DomError> {
        if *left == 0 {
            return Ok(());
        }
        *left -= 1;
        let indent = "  ".repeat(depth);
        match doc.kind(node)? {
            NodeKind::Document => out.push(format!("{indent}#document")),
            NodeKind::Element { name, attributes } => {
                let class = attributes
                    .iter()
                    .find(|(k, _)| &**k == "class")
                    .map(|(_, v)| v.as_str())
                    .unwrap_or("");
                if class.is_empty() {
                    out.push(format!("{indent}<{name}>"));
                } else {
                    out.push(format!(r#"{indent}<{name} class="{class}">"#));
                }
            }
            NodeKind::Text { text } => {
                let show = if text.chars().count() > 40 {
                    format!("{}…", text.chars().take(40).collect::<String>())
                } else {
                    text.clone()
                };
                out.push(format!("{indent}\"{show}\""));
            }
            NodeKind::Comment { text } => out.push(format!("{indent}<!-- {text} -->")),
        }
        for child in doc.children(node)? {
            walk(doc, *child, depth + 1, out, left)?;
        }
        Ok(())
    }

    let mut out = Vec::new();
    let mut left = cap;
    walk(doc, root, 0, &mut out, &mut left)?;
    Ok(out)
}
