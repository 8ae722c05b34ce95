//! Browser DOM layer for the wikitext highlighter.
//!
//! This crate binds the parsing engine and the CSS Custom Highlight API and
//! wires them to an editable host element. It assumes a
//! `wasm32-unknown-unknown` target environment.
//!
//! # Architecture
//!
//! - `engine`: web-tree-sitter bindings and the per-host parser adapter
//! - `highlights`: `CSS.highlights` bindings and the per-host scoped applier
//! - `events`: keydown and paste handling for plain-text editing
//! - `host`: `EditableHost`, the lifecycle shared by both element adapters
//!
//! # Re-exports
//!
//! This crate re-exports `wikitext-highlight-core` for convenience, so
//! consumers only need to depend on `wikitext-highlight-browser`.

// Re-export core crate
pub use wikitext_highlight_core;
pub use wikitext_highlight_core::*;

pub mod engine;
pub mod events;
pub mod highlights;
pub mod host;

pub use engine::{ParserSlot, WikitextParser};
pub use highlights::{ScopedHighlights, TextNodeTarget, highlight_registry};
pub use host::EditableHost;

use wasm_bindgen::{JsCast, JsValue};

/// Best-effort human readable message for a thrown JS value.
pub fn js_error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}
