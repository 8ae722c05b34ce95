//! The highlight pipeline: parse → query → reduce → apply.
//!
//! Generic over where captures come from (`QueryEngine`) and where ranges go
//! (`HighlightTarget`), so the same pass runs behind the custom element, an
//! injected element, and the tests.

use crate::capture::{Capture, CaptureNode, reduce_captures};
use crate::error::HighlightError;
use crate::highlight::{HighlightTarget, apply_ranges};
use crate::range::HighlightRange;

/// A parser with the highlight query compiled for its grammar.
pub trait QueryEngine {
    type Node: CaptureNode;

    /// Parse `text`, replacing any previous tree, and return the query
    /// captures over the new tree in engine order.
    fn captures(&mut self, text: &str) -> Result<Vec<Capture<Self::Node>>, HighlightError>;
}

/// How a highlight pass ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// No text; nothing parsed or applied.
    Empty,
    /// A newer pass started (or the host detached) before this one could apply.
    Superseded,
    /// Ranges were applied.
    Applied { ranges: usize },
}

impl PassOutcome {
    pub fn ranges(self) -> usize {
        match self {
            Self::Applied { ranges } => ranges,
            Self::Empty | Self::Superseded => 0,
        }
    }
}

/// Run one full pass over `text`.
///
/// The target is cleared first. Empty text stops there; otherwise the text is
/// parsed, captures are reduced to ranges, and the ranges are applied. On
/// error the target is left clear, never holding part of a pass.
pub fn highlight_text<E, T>(
    engine: &mut E,
    text: &str,
    target: &mut T,
) -> Result<Vec<HighlightRange>, HighlightError>
where
    E: QueryEngine + ?Sized,
    T: HighlightTarget + ?Sized,
{
    target.clear();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let captures = engine.captures(text)?;
    let capture_count = captures.len();
    let ranges = reduce_captures(captures);
    tracing::debug!(
        captures = capture_count,
        ranges = ranges.len(),
        "reduced query captures"
    );

    if !ranges.is_empty() {
        if let Err(e) = apply_ranges(target, &ranges) {
            target.clear();
            return Err(e);
        }
    }
    Ok(ranges)
}
