//! wikitext-highlight-core: platform-independent highlighting logic.
//!
//! This crate provides:
//! - `HIGHLIGHT_QUERY` - the capture rules run against the wikitext grammar
//! - `reduce_captures` - query captures to ordered `HighlightRange`s
//! - `HighlightTarget` / `apply_ranges` - grouping ranges into named highlight sets
//! - `highlight_text` - the parse → query → reduce → apply pipeline over
//!   the `QueryEngine` and `HighlightTarget` seams
//! - Host state decisions (editable state, observed attributes, shortcut
//!   filtering, pass generations) shared by the browser adapters

pub mod capture;
pub mod config;
pub mod error;
pub mod generation;
pub mod highlight;
pub mod host;
pub mod keys;
pub mod pipeline;
pub mod query;
pub mod range;

pub use capture::{Capture, CaptureNode, NodeId, reduce_captures};
pub use config::{DEFAULT_ELEMENT_NAME, GrammarConfig, HighlighterConfig};
pub use error::HighlightError;
pub use generation::{PassGeneration, PassTicket};
pub use highlight::{HighlightKey, HighlightSets, HighlightTarget, apply_ranges};
pub use host::{
    AttributeEffect, EditableState, Lifecycle, OBSERVED_ATTRIBUTES, ObservedAttribute,
    attribute_effect,
};
pub use keys::{FormattingShortcut, Key, KeyCombo, KeydownResult, Modifiers, ShortcutFilter};
pub use pipeline::{PassOutcome, QueryEngine, highlight_text};
pub use query::{HIGHLIGHT_QUERY, capture_names, highlight_names};
pub use range::HighlightRange;
pub use smol_str::SmolStr;
