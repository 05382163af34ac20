use crate::apply::{unwrap_wrapper, wrap_leaf};
use crate::config::HighlightConfig;
use crate::error::HighlightError;
use crate::restore::with_restored_range;
use crate::segment::text_nodes_in_range;
use crate::wrapper::WrapperSpec;
use dom::{Document, DomRange, NodeId};

/// Applies highlights with a fixed [`HighlightConfig`].
#[derive(Clone, Debug, Default)]
pub struct Highlighter {
    config: HighlightConfig,
}

impl Highlighter {
    pub fn new(config: HighlightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HighlightConfig {
        &self.config
    }

    /// Wrap every text node covered by `range` in its own wrapper element.
    ///
    /// Boundary text nodes are split first so that no wrapper holds text
    /// outside the range. Returns `Ok(None)` without touching the tree when
    /// the range is collapsed or covers no text. `spec` is validated before
    /// anything else happens.
    ///
    /// On return `range` spans exactly the wrapped text nodes.
    pub fn apply(
        &self,
        doc: &mut Document,
        range: &mut DomRange,
        spec: WrapperSpec<'_>,
    ) -> Result<Option<Highlight>, HighlightError> {
        let mut factory = spec.resolve(doc, &self.config)?;
        if range.collapsed() {
            return Ok(None);
        }
        let leaves = text_nodes_in_range(doc, range)?;
        if leaves.is_empty() {
            return Ok(None);
        }
        let wrappers = with_restored_range(doc, range, |doc| {
            leaves
                .iter()
                .map(|leaf| wrap_leaf(doc, *leaf, &mut factory))
                .collect::<Result<Vec<_>, _>>()
        })?;
        log::debug!(target: "highlight", "wrapped {} text nodes", wrappers.len());
        Ok(Some(Highlight { wrappers }))
    }
}

/// [`Highlighter::apply`] with the default configuration.
pub fn highlight_range(
    doc: &mut Document,
    range: &mut DomRange,
    spec: WrapperSpec<'_>,
) -> Result<Option<Highlight>, HighlightError> {
    Highlighter::default().apply(doc, range, spec)
}

/// The wrappers created by one [`Highlighter::apply`] call, in tree order.
///
/// Dropping the handle keeps the wrappers in the tree.
#[derive(Debug, PartialEq, Eq)]
pub struct Highlight {
    wrappers: Vec<NodeId>,
}

impl Highlight {
    pub fn wrappers(&self) -> &[NodeId] {
        &self.wrappers
    }

    pub fn len(&self) -> usize {
        self.wrappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wrappers.is_empty()
    }

    /// Unwrap every wrapper of this highlight and put `range` back on the
    /// endpoints it has now. Text nodes split by `apply` stay split.
    pub fn remove(self, doc: &mut Document, range: &mut DomRange) -> Result<(), HighlightError> {
        with_restored_range(doc, range, |doc| {
            for wrapper in &self.wrappers {
                unwrap_wrapper(doc, *wrapper)?;
            }
            log::debug!(target: "highlight", "removed {} wrappers", self.wrappers.len());
            Ok(())
        })
    }

    /// Keep the wrappers for good and hand back their ids.
    pub fn commit(self) -> Vec<NodeId> {
        self.wrappers
    }

    /// [`Highlight::remove`] as a one-shot closure.
    pub fn into_cleanup(
        self,
    ) -> impl FnOnce(&mut Document, &mut DomRange) -> Result<(), HighlightError> {
        move |doc, range| self.remove(doc, range)
    }
}
