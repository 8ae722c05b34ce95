//! Keydown and paste handling for plain-text editing.
//!
//! The host is `contenteditable="plaintext-only"`, but browsers still honor
//! formatting shortcuts and rich paste in some configurations. These handlers
//! keep the content a single text node.

use wasm_bindgen::JsCast;
use web_sys::{ClipboardEvent, DataTransfer, KeyboardEvent};
use wikitext_highlight_core::{
    HighlightError, Key, KeyCombo, KeydownResult, Modifiers, ShortcutFilter,
};

use crate::js_error_message;

/// Read the key and modifiers from a browser keyboard event.
pub fn key_combo(event: &KeyboardEvent) -> KeyCombo {
    KeyCombo::with_modifiers(
        Key::from_dom(&event.key()),
        Modifiers {
            ctrl: event.ctrl_key(),
            alt: event.alt_key(),
            shift: event.shift_key(),
            meta: event.meta_key(),
        },
    )
}

/// Suppress blocked formatting shortcuts.
pub fn handle_keydown(event: &KeyboardEvent, shortcuts: &ShortcutFilter) -> KeydownResult {
    let result = shortcuts.handle(&key_combo(event));
    if result == KeydownResult::Handled {
        event.prevent_default();
    }
    result
}

/// The `text/plain` flavor of a clipboard payload, if it has one.
pub fn plain_text_payload(data: &DataTransfer) -> Option<String> {
    data.get_data("text/plain").ok().filter(|text| !text.is_empty())
}

/// Replace the browser's paste with a plain-text insertion.
///
/// Always cancels the native paste. Returns the inserted text, or `None`
/// when the clipboard had no plain text.
pub fn handle_paste(event: &ClipboardEvent) -> Result<Option<String>, HighlightError> {
    event.prevent_default();

    let Some(text) = event.clipboard_data().as_ref().and_then(plain_text_payload) else {
        tracing::debug!("paste without text/plain payload ignored");
        return Ok(None);
    };
    insert_plain_text(&text)?;
    Ok(Some(text))
}

/// Insert `text` at the current selection as an undoable edit.
pub fn insert_plain_text(text: &str) -> Result<(), HighlightError> {
    let document = gloo_utils::document()
        .dyn_into::<web_sys::HtmlDocument>()
        .map_err(|_| HighlightError::Unsupported("HTMLDocument"))?;
    document
        .exec_command_with_show_ui_and_value("insertText", false, text)
        .map_err(|e| HighlightError::Dom(js_error_message(&e)))?;
    Ok(())
}
