//! Range restoration around tree mutations.
//!
//! [`DomRange`] endpoints are plain `(node, offset)` values. A block that
//! restructures the tree can leave them pointing somewhere else; the
//! snapshot re-asserts the captured values through the range's setters
//! once the block is done.

use dom::{BoundaryPoint, Document, DomError, DomRange};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RangeSnapshot {
    start: BoundaryPoint,
    end: BoundaryPoint,
}

impl RangeSnapshot {
    pub fn capture(range: &DomRange) -> Self {
        Self {
            start: range.start(),
            end: range.end(),
        }
    }

    pub fn start(&self) -> BoundaryPoint {
        self.start
    }

    pub fn end(&self) -> BoundaryPoint {
        self.end
    }

    pub fn restore(&self, doc: &Document, range: &mut DomRange) -> Result<(), DomError> {
        range.set_start(doc, self.start)?;
        range.set_end(doc, self.end)
    }
}

/// Run `block` on the tree, then put `range` back on the endpoints it had
/// before. Nothing is restored if the block fails.
pub fn with_restored_range<T, E>(
    doc: &mut Document,
    range: &mut DomRange,
    block: impl FnOnce(&mut Document) -> Result<T, E>,
) -> Result<T, E>
where
    E: From<DomError>,
{
    let snapshot = RangeSnapshot::capture(range);
    let out = block(doc)?;
    snapshot.restore(doc, range)?;
    Ok(out)
}
