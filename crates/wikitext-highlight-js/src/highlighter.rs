//! WikitextHighlighter - the highlighter wrapper for JavaScript.

use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::future_to_promise;

use wikitext_highlight_browser::EditableHost;

use crate::types::{JsHighlightRange, highlighter_config};

/// Highlighter bound to one element.
///
/// `new WikitextHighlighter(el)` is what the custom element uses: it stays
/// inert until `connected()`. Pages highlighting an element they own use
/// `WikitextHighlighter.attach(el)`, which starts immediately, and call
/// `destroy()` when done.
#[wasm_bindgen]
pub struct WikitextHighlighter {
    host: EditableHost,
}

impl WikitextHighlighter {
    pub(crate) fn from_host(host: EditableHost) -> Self {
        Self { host }
    }
}

#[wasm_bindgen]
impl WikitextHighlighter {
    /// Wrap `element` without attaching. Throws if `element` is missing.
    #[wasm_bindgen(constructor)]
    pub fn new(element: JsValue, options: JsValue) -> Result<WikitextHighlighter, JsError> {
        let config = highlighter_config(options)?;
        let host = EditableHost::from_js(&element, config)?;
        Ok(Self::from_host(host))
    }

    /// Wrap `element` and attach right away.
    pub fn attach(element: JsValue, options: JsValue) -> Result<WikitextHighlighter, JsError> {
        let highlighter = Self::new(element, options)?;
        highlighter.host.connect();
        Ok(highlighter)
    }

    // === Lifecycle ===

    pub fn connected(&self) {
        self.host.connect();
    }

    pub fn disconnected(&self) {
        self.host.disconnect();
    }

    #[wasm_bindgen(js_name = attributeChanged)]
    pub fn attribute_changed(&self, name: &str, old_value: Option<String>, new_value: Option<String>) {
        self.host
            .attribute_changed(name, old_value.as_deref(), new_value.as_deref());
    }

    /// Detach and remove this element's highlights.
    pub fn destroy(&self) {
        self.host.disconnect();
    }

    #[wasm_bindgen(getter, js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.host.is_attached()
    }

    // === Content ===

    #[wasm_bindgen(getter)]
    pub fn value(&self) -> String {
        self.host.value()
    }

    #[wasm_bindgen(setter)]
    pub fn set_value(&self, value: &str) {
        self.host.set_value(value);
    }

    #[wasm_bindgen(getter)]
    pub fn editable(&self) -> bool {
        self.host.editable()
    }

    #[wasm_bindgen(setter)]
    pub fn set_editable(&self, editable: bool) -> Result<(), JsError> {
        self.host.set_editable(editable)?;
        Ok(())
    }

    // === Highlighting ===

    /// Run a pass now.
    ///
    /// Resolves with the number of ranges applied (0 for empty text or a pass
    /// overtaken by a newer one). Rejects if the parser cannot be loaded or
    /// a range cannot be built.
    pub fn highlight(&self) -> js_sys::Promise {
        let pass = self.host.highlight();
        future_to_promise(async move {
            let outcome = pass.await.map_err(|e| JsValue::from(JsError::from(e)))?;
            Ok(JsValue::from(outcome.ranges() as u32))
        })
    }

    /// Ranges applied by the last completed pass.
    pub fn ranges(&self) -> Result<JsValue, JsError> {
        let ranges: Vec<JsHighlightRange> =
            self.host.last_ranges().iter().map(JsHighlightRange::from).collect();
        serde_wasm_bindgen::to_value(&ranges)
            .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
    }
}
