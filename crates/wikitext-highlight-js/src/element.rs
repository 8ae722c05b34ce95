//! The `<wikitext-highlighter>` custom element.
//!
//! The element class itself has to be a JS class extending `HTMLElement`;
//! everything it does is forwarded to a `WikitextHighlighter` made by a Rust
//! factory when the element is constructed.

use wasm_bindgen::prelude::*;
use web_sys::HtmlElement;

use wikitext_highlight_browser::{EditableHost, OBSERVED_ATTRIBUTES};

use crate::highlighter::WikitextHighlighter;
use crate::types::highlighter_config;

#[wasm_bindgen(inline_js = r#"
export function define_element(name, factory, observed) {
    if (customElements.get(name)) {
        return false;
    }
    class WikitextHighlighterElement extends HTMLElement {
        static get observedAttributes() {
            return observed;
        }
        constructor() {
            super();
            this._highlighter = factory(this);
        }
        connectedCallback() {
            this._highlighter.connected();
        }
        disconnectedCallback() {
            this._highlighter.disconnected();
        }
        attributeChangedCallback(name, oldValue, newValue) {
            this._highlighter.attributeChanged(name, oldValue, newValue);
        }
        get value() {
            return this._highlighter.value;
        }
        set value(text) {
            this._highlighter.value = text;
        }
        get editable() {
            return this._highlighter.editable;
        }
        set editable(on) {
            this._highlighter.editable = on;
        }
        highlight() {
            return this._highlighter.highlight();
        }
        ranges() {
            return this._highlighter.ranges();
        }
    }
    customElements.define(name, WikitextHighlighterElement);
    return true;
}
"#)]
extern "C" {
    #[wasm_bindgen(catch)]
    fn define_element(
        name: &str,
        factory: &JsValue,
        observed: &js_sys::Array,
    ) -> Result<bool, JsValue>;
}

/// Register the `<wikitext-highlighter>` custom element.
///
/// Returns `false` if the tag name is already taken, in which case nothing
/// changes.
#[wasm_bindgen(js_name = defineWikitextHighlighter)]
pub fn define_wikitext_highlighter(options: JsValue) -> Result<bool, JsError> {
    let config = highlighter_config(options)?;
    let name = config.element_name.clone();

    let factory = Closure::<dyn Fn(HtmlElement) -> JsValue>::new(move |element: HtmlElement| {
        JsValue::from(WikitextHighlighter::from_host(EditableHost::new(
            element,
            config.clone(),
        )))
    });
    let observed: js_sys::Array = OBSERVED_ATTRIBUTES.iter().map(|a| JsValue::from_str(a)).collect();

    let defined = define_element(&name, factory.as_ref(), &observed).map_err(|e| {
        JsError::new(&format!(
            "Failed to define <{}>: {}",
            name,
            wikitext_highlight_browser::js_error_message(&e)
        ))
    })?;

    if defined {
        // The element class calls the factory for as long as the page lives.
        factory.forget();
        tracing::debug!(element = %name, "custom element defined");
    } else {
        tracing::debug!(element = %name, "custom element already defined");
    }
    Ok(defined)
}
