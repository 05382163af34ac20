//! A tiny markup reader for test fixtures.
//!
//! Supports elements with quoted or bare attributes, comments and text.
//! Range endpoints can be embedded in the markup:
//! - `[` / `]` inside text mark a start / end point inside the text node;
//! - `{` / `}` mark a start / end point on the enclosing element, addressed
//!   by child index.
//!
//! No entity decoding, no implied end tags: the input must be well formed.

use dom::snapshot::to_markup;
use dom::{BoundaryPoint, Document, DomRange, NodeId};
use memchr::{memchr, memchr3, memmem};

#[derive(Debug)]
pub struct Fixture {
    pub doc: Document,
    pub start: Option<BoundaryPoint>,
    pub end: Option<BoundaryPoint>,
}

impl Fixture {
    /// The range described by the embedded markers. A lone marker yields a
    /// collapsed range.
    pub fn range(&self) -> DomRange {
        let start = self.start.or(self.end).expect("fixture has no range markers");
        let end = self.end.unwrap_or(start);
        DomRange::new(&self.doc, start, end).expect("fixture markers form a valid range")
    }

    pub fn markup(&self) -> String {
        to_markup(&self.doc, self.doc.root(), true).expect("serialize fixture")
    }
}

#[derive(Clone, Copy)]
enum Marker {
    Start,
    End,
}

struct Reader {
    doc: Document,
    open: Vec<NodeId>,
    run: String,
    pending: Vec<(Marker, usize)>,
    start: Option<BoundaryPoint>,
    end: Option<BoundaryPoint>,
}

impl Reader {
    fn parent(&self) -> NodeId {
        self.open.last().copied().unwrap_or(self.doc.root())
    }

    fn record(&mut self, marker: Marker, point: BoundaryPoint) {
        let slot = match marker {
            Marker::Start => &mut self.start,
            Marker::End => &mut self.end,
        };
        assert!(slot.is_none(), "duplicate range marker in fixture");
        *slot = Some(point);
    }

    fn flush_text(&mut self) {
        let parent = self.parent();
        let pending = std::mem::take(&mut self.pending);
        if self.run.is_empty() {
            let index = self.doc.children(parent).expect("open element").len();
            for (marker, _) in pending {
                self.record(marker, BoundaryPoint::new(parent, index));
            }
            return;
        }
        let text = self.doc.create_text(std::mem::take(&mut self.run));
        self.doc.append_child(parent, text).expect("append text");
        for (marker, offset) in pending {
            self.record(marker, BoundaryPoint::new(text, offset));
        }
    }

    fn element_marker(&mut self, marker: Marker) {
        self.flush_text();
        let parent = self.parent();
        let index = self.doc.children(parent).expect("open element").len();
        self.record(marker, BoundaryPoint::new(parent, index));
    }

    fn text(&mut self, mut input: &str) {
        while !input.is_empty() {
            let bytes = input.as_bytes();
            let Some(pos) = memchr3(b'[', b']', b'{', bytes)
                .into_iter()
                .chain(memchr(b'}', bytes))
                .min()
            else {
                self.run.push_str(input);
                return;
            };
            self.run.push_str(&input[..pos]);
            match bytes[pos] {
                b'[' => self.pending.push((Marker::Start, self.run.len())),
                b']' => self.pending.push((Marker::End, self.run.len())),
                b'{' => self.element_marker(Marker::Start),
                _ => self.element_marker(Marker::End),
            }
            input = &input[pos + 1..];
        }
    }

    fn start_tag(&mut self, body: &str) {
        self.flush_text();
        let (body, self_closing) = match body.strip_suffix('/') {
            Some(rest) => (rest.trim_end(), true),
            None => (body, false),
        };
        let mut parts = body.splitn(2, char::is_whitespace);
        let name = parts.next().filter(|n| !n.is_empty()).expect("tag name");
        let attributes = parse_attributes(parts.next().unwrap_or(""));
        let element = self.doc.create_element_with_attributes(name, attributes);
        let parent = self.parent();
        self.doc.append_child(parent, element).expect("append element");
        if !self_closing {
            self.open.push(element);
        }
    }

    fn end_tag(&mut self, name: &str) {
        self.flush_text();
        let open = self.open.pop().unwrap_or_else(|| panic!("stray </{name}>"));
        let open_name = self.doc.element_name(open).expect("open element");
        assert_eq!(open_name, name.trim(), "mismatched end tag");
    }
}

fn parse_attributes(mut input: &str) -> Vec<(String, String)> {
    let mut out = Vec::new();
    loop {
        input = input.trim_start();
        if input.is_empty() {
            return out;
        }
        let name_end = input
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(input.len());
        let name = input[..name_end].to_string();
        input = &input[name_end..];
        if let Some(rest) = input.strip_prefix('=') {
            let (value, rest) = match rest.as_bytes().first() {
                Some(quote @ (b'"' | b'\'')) => {
                    let close = memchr(*quote, &rest.as_bytes()[1..])
                        .expect("unterminated attribute value");
                    (&rest[1..close + 1], &rest[close + 2..])
                }
                _ => {
                    let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
                    (&rest[..end], &rest[end..])
                }
            };
            out.push((name, value.to_string()));
            input = rest;
        } else {
            out.push((name, String::new()));
        }
    }
}

/// Build a document from fixture markup, appending everything under the
/// document node.
pub fn parse_fixture(markup: &str) -> Fixture {
    let mut reader = Reader {
        doc: Document::new(),
        open: Vec::new(),
        run: String::new(),
        pending: Vec::new(),
        start: None,
        end: None,
    };
    let mut rest = markup;
    while let Some(lt) = memchr(b'<', rest.as_bytes()) {
        reader.text(&rest[..lt]);
        rest = &rest[lt..];
        if let Some(comment) = rest.strip_prefix("<!--") {
            let close = memmem::find(comment.as_bytes(), b"-->").expect("unterminated comment");
            reader.flush_text();
            let node = reader.doc.create_comment(&comment[..close]);
            let parent = reader.parent();
            reader.doc.append_child(parent, node).expect("append comment");
            rest = &comment[close + 3..];
            continue;
        }
        let gt = memchr(b'>', rest.as_bytes()).expect("unterminated tag");
        let tag = &rest[1..gt];
        match tag.strip_prefix('/') {
            Some(name) => reader.end_tag(name),
            None => reader.start_tag(tag.trim()),
        }
        rest = &rest[gt + 1..];
    }
    reader.text(rest);
    reader.flush_text();
    assert!(reader.open.is_empty(), "unclosed element in fixture");
    Fixture {
        doc: reader.doc,
        start: reader.start,
        end: reader.end,
    }
}
