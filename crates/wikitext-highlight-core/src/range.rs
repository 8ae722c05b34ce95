//! Tagged text ranges produced by the capture reducer.

use std::ops::Range;

use serde::Serialize;
use smol_str::SmolStr;

use crate::highlight::HighlightKey;

/// A text-offset interval tagged with a highlight category.
///
/// Offsets are in the units of the host text (UTF-16 code units in the
/// browser, matching both the parsing engine and DOM ranges).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRange {
    pub start_index: usize,
    pub end_index: usize,
    pub tag: SmolStr,
}

impl HighlightRange {
    pub fn new(start_index: usize, end_index: usize, tag: impl Into<SmolStr>) -> Self {
        Self {
            start_index,
            end_index,
            tag: tag.into(),
        }
    }

    /// The highlight-set key this range is registered under.
    pub fn key(&self) -> HighlightKey {
        HighlightKey::from_tag(&self.tag)
    }

    pub fn span(&self) -> Range<usize> {
        self.start_index..self.end_index
    }

    pub fn is_empty(&self) -> bool {
        self.start_index == self.end_index
    }

    /// Whether this range shares at least one offset with `other`. Zero-width
    /// ranges cover no offset and never overlap.
    pub fn overlaps(&self, other: &HighlightRange) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.start_index < other.end_index
            && other.start_index < self.end_index
    }
}
