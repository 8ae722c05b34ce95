//! CSS Custom Highlight API bindings.
//!
//! web-sys does not expose `Highlight` or `HighlightRegistry`, so they are
//! bound here. Every host keeps a [`ScopedHighlights`] recording exactly the
//! `(key, Range)` pairs it registered; clearing removes only those, so hosts
//! sharing a page never clear each other's highlights.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Node;
use wikitext_highlight_core::{HighlightError, HighlightKey, HighlightRange, HighlightTarget};

use crate::js_error_message;

#[wasm_bindgen]
extern "C" {
    /// A named set of ranges styled through `::highlight(name)`.
    #[derive(Debug, Clone)]
    pub type Highlight;

    #[wasm_bindgen(constructor, catch, js_class = "Highlight")]
    pub fn new() -> Result<Highlight, JsValue>;

    #[wasm_bindgen(method, structural, js_name = add)]
    pub fn add_range(this: &Highlight, range: &web_sys::Range);

    #[wasm_bindgen(method, structural, js_name = delete)]
    pub fn delete_range(this: &Highlight, range: &web_sys::Range) -> bool;

    #[wasm_bindgen(method, getter, structural)]
    pub fn size(this: &Highlight) -> u32;

    /// `CSS.highlights`.
    #[derive(Debug, Clone)]
    pub type HighlightRegistry;

    #[wasm_bindgen(method, structural)]
    pub fn get(this: &HighlightRegistry, name: &str) -> Option<Highlight>;

    #[wasm_bindgen(method, structural, js_name = set)]
    pub fn register(this: &HighlightRegistry, name: &str, highlight: &Highlight);

    #[wasm_bindgen(method, structural, js_name = delete)]
    pub fn unregister(this: &HighlightRegistry, name: &str) -> bool;

    #[wasm_bindgen(method, structural)]
    pub fn has(this: &HighlightRegistry, name: &str) -> bool;
}

/// The page's highlight registry.
pub fn highlight_registry() -> Result<HighlightRegistry, HighlightError> {
    const API: &str = "CSS Custom Highlight API";

    let css = js_sys::Reflect::get(&js_sys::global(), &JsValue::from_str("CSS"))
        .map_err(|_| HighlightError::Unsupported(API))?;
    if css.is_undefined() {
        return Err(HighlightError::Unsupported(API));
    }
    let registry = js_sys::Reflect::get(&css, &JsValue::from_str("highlights"))
        .map_err(|_| HighlightError::Unsupported(API))?;
    if registry.is_undefined() || registry.is_null() {
        return Err(HighlightError::Unsupported(API));
    }
    Ok(registry.unchecked_into())
}

/// The ranges one host has registered.
#[derive(Debug, Default)]
pub struct ScopedHighlights {
    registry: Option<HighlightRegistry>,
    entries: Vec<(HighlightKey, web_sys::Range)>,
}

impl ScopedHighlights {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&mut self) -> Result<&HighlightRegistry, HighlightError> {
        if self.registry.is_none() {
            self.registry = Some(highlight_registry()?);
        }
        self.registry
            .as_ref()
            .ok_or(HighlightError::Unsupported("CSS Custom Highlight API"))
    }

    /// Number of ranges currently registered by this scope.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Register `range` under `key`, creating the named set if needed.
    pub fn register(&mut self, key: &HighlightKey, range: web_sys::Range) -> Result<(), HighlightError> {
        let registry = self.registry()?;
        let highlight = match registry.get(key.as_str()) {
            Some(existing) => existing,
            None => {
                let created =
                    Highlight::new().map_err(|e| HighlightError::Dom(js_error_message(&e)))?;
                registry.register(key.as_str(), &created);
                created
            }
        };
        highlight.add_range(&range);
        self.entries.push((key.clone(), range));
        Ok(())
    }

    /// Remove every range this scope registered. Sets left empty are
    /// unregistered.
    pub fn clear(&mut self) {
        let entries = std::mem::take(&mut self.entries);
        let Some(registry) = self.registry.as_ref() else {
            return;
        };
        for (key, range) in entries {
            if let Some(highlight) = registry.get(key.as_str()) {
                highlight.delete_range(&range);
                if highlight.size() == 0 {
                    registry.unregister(key.as_str());
                }
            }
        }
    }
}

impl Drop for ScopedHighlights {
    fn drop(&mut self) {
        self.clear();
    }
}

/// Builds DOM ranges over a single text node and registers them in a scope.
///
/// Offsets are UTF-16 code units into the node's data.
pub struct TextNodeTarget<'a> {
    node: &'a Node,
    scope: &'a mut ScopedHighlights,
}

impl<'a> TextNodeTarget<'a> {
    pub fn new(node: &'a Node, scope: &'a mut ScopedHighlights) -> Self {
        Self { node, scope }
    }

    fn dom_range(&self, range: &HighlightRange) -> Result<web_sys::Range, HighlightError> {
        let construction = |message: String| HighlightError::RangeConstruction {
            start: range.start_index,
            end: range.end_index,
            message,
        };
        let start = u32::try_from(range.start_index).map_err(|e| construction(e.to_string()))?;
        let end = u32::try_from(range.end_index).map_err(|e| construction(e.to_string()))?;

        let dom = web_sys::Range::new().map_err(|e| construction(js_error_message(&e)))?;
        dom.set_start(self.node, start)
            .map_err(|e| construction(js_error_message(&e)))?;
        dom.set_end(self.node, end)
            .map_err(|e| construction(js_error_message(&e)))?;
        Ok(dom)
    }
}

impl HighlightTarget for TextNodeTarget<'_> {
    fn clear(&mut self) {
        self.scope.clear();
    }

    fn add(&mut self, key: &HighlightKey, range: &HighlightRange) -> Result<(), HighlightError> {
        let dom = self.dom_range(range)?;
        self.scope.register(key, dom)
    }
}
