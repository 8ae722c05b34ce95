//! Types exposed to JavaScript via wasm-bindgen.

use serde::{Deserialize, Serialize};
use tsify_next::Tsify;
use wasm_bindgen::prelude::*;
use wikitext_highlight_core::{HighlightRange, HighlighterConfig};

/// Decode the options argument of `new WikitextHighlighter(..)` and
/// `defineWikitextHighlighter(..)`.
///
/// Accepts any subset of `engineModule`, `grammarPath`, `markupClass`,
/// `blockedShortcuts` and `elementName`; missing fields keep their defaults.
/// `undefined` and `null` mean all defaults.
pub fn highlighter_config(options: JsValue) -> Result<HighlighterConfig, JsError> {
    if options.is_undefined() || options.is_null() {
        return Ok(HighlighterConfig::default());
    }
    serde_wasm_bindgen::from_value(options)
        .map_err(|e| JsError::new(&format!("Invalid options: {}", e)))
}

/// One applied highlight range.
#[derive(Debug, Clone, Serialize, Deserialize, Tsify)]
#[tsify(into_wasm_abi, from_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct JsHighlightRange {
    pub start_index: usize,
    pub end_index: usize,
    /// Capture tag, e.g. `markup.heading.1`.
    pub tag: String,
    /// Highlight set the range was added to, e.g. `markup-heading-1`.
    pub key: String,
}

impl From<&HighlightRange> for JsHighlightRange {
    fn from(range: &HighlightRange) -> Self {
        Self {
            start_index: range.start_index,
            end_index: range.end_index,
            tag: range.tag.to_string(),
            key: range.key().to_string(),
        }
    }
}
