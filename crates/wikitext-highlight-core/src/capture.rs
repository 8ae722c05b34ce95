//! Query captures and their reduction to highlight ranges.
//!
//! The query engine reports every (capture name, node) pair a pattern
//! matched, in document order. A node matched by several patterns shows up
//! several times in a row; only the first of such a run is kept.

use smol_str::SmolStr;

use crate::range::HighlightRange;

/// Identity of a syntax node within one tree.
///
/// Two captures refer to the same node iff their ids are equal; offsets are
/// not used for identity (distinct nodes can share a span).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

/// A syntax node as seen by the reducer.
pub trait CaptureNode {
    fn id(&self) -> NodeId;
    fn start_index(&self) -> usize;
    fn end_index(&self) -> usize;
}

/// A (tag, node) pair produced by running the query against a tree.
#[derive(Debug, Clone)]
pub struct Capture<N> {
    pub tag: SmolStr,
    pub node: N,
}

impl<N> Capture<N> {
    pub fn new(tag: impl Into<SmolStr>, node: N) -> Self {
        Self {
            tag: tag.into(),
            node,
        }
    }
}

/// Convert captures into ranges, dropping a capture whose node is the same
/// as the immediately preceding emitted one.
///
/// The de-duplication window is one capture wide: a node that reappears after
/// a different node is emitted again.
pub fn reduce_captures<N, I>(captures: I) -> Vec<HighlightRange>
where
    N: CaptureNode,
    I: IntoIterator<Item = Capture<N>>,
{
    let mut ranges = Vec::new();
    let mut last_node: Option<NodeId> = None;

    for Capture { tag, node } in captures {
        let id = node.id();
        if last_node == Some(id) {
            tracing::trace!(?id, %tag, "skipping repeated capture");
            continue;
        }
        last_node = Some(id);
        ranges.push(HighlightRange {
            start_index: node.start_index(),
            end_index: node.end_index(),
            tag,
        });
    }

    ranges
}
