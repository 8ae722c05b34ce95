//! Named highlight sets.
//!
//! Ranges are grouped by a key derived from their capture tag. Host
//! highlight registries (the CSS Custom Highlight API in particular) reject
//! `.` in names, so every `.` becomes `-`.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use serde::Serialize;
use smol_str::SmolStr;

use crate::error::HighlightError;
use crate::range::HighlightRange;

/// Sanitized highlight-set name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct HighlightKey(SmolStr);

impl HighlightKey {
    /// Derive the key for a capture tag (`markup.heading.1` → `markup-heading-1`).
    pub fn from_tag(tag: &str) -> Self {
        if tag.contains('.') {
            Self(SmolStr::new(tag.replace('.', "-")))
        } else {
            Self(SmolStr::new(tag))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HighlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for HighlightKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Somewhere ranges can be registered under a highlight-set key.
///
/// The browser implementation builds DOM ranges over the host's text node and
/// registers them in `CSS.highlights`; [`HighlightSets`] keeps them in memory.
pub trait HighlightTarget {
    /// Remove everything this target registered previously.
    fn clear(&mut self);

    /// Append `range` to the set under `key`, creating the set if needed.
    fn add(&mut self, key: &HighlightKey, range: &HighlightRange) -> Result<(), HighlightError>;
}

/// Register every range with the target, in order.
///
/// Stops at the first range the target rejects.
pub fn apply_ranges<T>(target: &mut T, ranges: &[HighlightRange]) -> Result<(), HighlightError>
where
    T: HighlightTarget + ?Sized,
{
    for range in ranges {
        let key = range.key();
        tracing::trace!(%key, start = range.start_index, end = range.end_index, "apply range");
        target.add(&key, range)?;
    }
    Ok(())
}

/// In-memory highlight sets, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HighlightSets {
    sets: BTreeMap<HighlightKey, Vec<Range<usize>>>,
}

impl HighlightSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the sets for a list of ranges.
    pub fn from_ranges(ranges: &[HighlightRange]) -> Self {
        let mut sets = Self::new();
        for range in ranges {
            sets.insert(range.key(), range.span());
        }
        sets
    }

    fn insert(&mut self, key: HighlightKey, span: Range<usize>) {
        self.sets.entry(key).or_default().push(span);
    }

    pub fn get(&self, key: &str) -> Option<&[Range<usize>]> {
        self.sets
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, spans)| spans.as_slice())
    }

    pub fn keys(&self) -> impl Iterator<Item = &HighlightKey> {
        self.sets.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&HighlightKey, &[Range<usize>])> {
        self.sets.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of sets.
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Total number of ranges across all sets.
    pub fn range_count(&self) -> usize {
        self.sets.values().map(Vec::len).sum()
    }
}

impl HighlightTarget for HighlightSets {
    fn clear(&mut self) {
        self.sets.clear();
    }

    fn add(&mut self, key: &HighlightKey, range: &HighlightRange) -> Result<(), HighlightError> {
        self.insert(key.clone(), range.span());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_sanitization() {
        assert_eq!(
            HighlightKey::from_tag("markup.heading.1").as_str(),
            "markup-heading-1"
        );
        assert_eq!(HighlightKey::from_tag("comment").as_str(), "comment");
        assert_eq!(HighlightKey::from_tag("a..b").as_str(), "a--b");
    }

    #[test]
    fn test_one_set_per_tag() {
        let ranges = vec![
            HighlightRange::new(0, 1, "punctuation.special"),
            HighlightRange::new(1, 8, "markup.heading.1"),
            HighlightRange::new(8, 9, "punctuation.special"),
            HighlightRange::new(20, 27, "markup.heading.1"),
        ];
        let mut sets = HighlightSets::new();
        apply_ranges(&mut sets, &ranges).unwrap();

        assert_eq!(sets.len(), 2);
        assert_eq!(sets.range_count(), 4);
        assert_eq!(sets.get("markup-heading-1"), Some(&[1..8, 20..27][..]));
        assert_eq!(sets.get("punctuation-special"), Some(&[0..1, 8..9][..]));
        assert_eq!(sets.get("markup.heading.1"), None);
        assert_eq!(sets, HighlightSets::from_ranges(&ranges));
    }

    #[test]
    fn test_apply_stops_at_rejected_range() {
        struct Bounded {
            len: usize,
            added: usize,
        }

        impl HighlightTarget for Bounded {
            fn clear(&mut self) {
                self.added = 0;
            }

            fn add(
                &mut self,
                _key: &HighlightKey,
                range: &HighlightRange,
            ) -> Result<(), HighlightError> {
                if range.end_index > self.len {
                    return Err(HighlightError::RangeConstruction {
                        start: range.start_index,
                        end: range.end_index,
                        message: "out of bounds".into(),
                    });
                }
                self.added += 1;
                Ok(())
            }
        }

        let mut target = Bounded { len: 5, added: 0 };
        let ranges = vec![
            HighlightRange::new(0, 2, "a"),
            HighlightRange::new(2, 9, "b"),
            HighlightRange::new(3, 4, "c"),
        ];
        let err = apply_ranges(&mut target, &ranges).unwrap_err();
        assert!(matches!(
            err,
            HighlightError::RangeConstruction { start: 2, end: 9, .. }
        ));
        assert_eq!(target.added, 1);
    }

    #[test]
    fn test_clear_resets_sets() {
        let mut sets = HighlightSets::from_ranges(&[HighlightRange::new(0, 3, "comment")]);
        assert!(!sets.is_empty());
        sets.clear();
        assert!(sets.is_empty());
    }
}
