//! WASM browser tests for wikitext-highlight-browser.
//!
//! Run with: `wasm-pack test --headless --chrome`
//!
//! None of these load the real parsing engine; they cover everything around
//! it. The engine URL points at a module that does not exist.

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

use web_sys::{
    ClipboardEvent, ClipboardEventInit, DataTransfer, HtmlElement, InputEvent, KeyboardEvent,
    KeyboardEventInit,
};
use wikitext_highlight_browser::events::{handle_keydown, handle_paste, plain_text_payload};
use wikitext_highlight_browser::{
    EditableHost, GrammarConfig, HighlightError, HighlightKey, HighlightRange, HighlightTarget,
    HighlighterConfig, KeydownResult, PassOutcome, ScopedHighlights, ShortcutFilter,
    TextNodeTarget, highlight_registry,
};

fn test_config() -> HighlighterConfig {
    HighlighterConfig {
        grammar: GrammarConfig {
            engine_module: "./missing-engine.js".to_owned(),
            grammar_path: "./missing-grammar.wasm".to_owned(),
        },
        ..HighlighterConfig::default()
    }
}

fn make_element(text: &str) -> HtmlElement {
    let document = gloo_utils::document();
    let element: HtmlElement = document
        .create_element("div")
        .unwrap()
        .dyn_into()
        .unwrap();
    if !text.is_empty() {
        element.set_text_content(Some(text));
    }
    gloo_utils::body().append_child(&element).unwrap();
    element
}

fn keydown(key: &str, ctrl: bool, meta: bool) -> KeyboardEvent {
    let init = KeyboardEventInit::new();
    init.set_key(key);
    init.set_ctrl_key(ctrl);
    init.set_meta_key(meta);
    init.set_cancelable(true);
    init.set_bubbles(true);
    KeyboardEvent::new_with_keyboard_event_init_dict("keydown", &init).unwrap()
}

// === Keydown ===

#[wasm_bindgen_test]
fn test_ctrl_b_prevented() {
    let event = keydown("b", true, false);
    let result = handle_keydown(&event, &ShortcutFilter::default());
    assert_eq!(result, KeydownResult::Handled);
    assert!(event.default_prevented());
}

#[wasm_bindgen_test]
fn test_meta_uppercase_k_prevented() {
    let event = keydown("K", false, true);
    assert_eq!(
        handle_keydown(&event, &ShortcutFilter::default()),
        KeydownResult::Handled
    );
    assert!(event.default_prevented());
}

#[wasm_bindgen_test]
fn test_plain_b_passes_through() {
    let event = keydown("b", false, false);
    let result = handle_keydown(&event, &ShortcutFilter::default());
    assert_eq!(result, KeydownResult::NotHandled);
    assert!(!event.default_prevented());
}

#[wasm_bindgen_test]
fn test_listener_blocks_shortcut_on_editable_host() {
    let element = make_element("");
    element.set_attribute("editable", "").unwrap();
    let host = EditableHost::new(element.clone(), test_config());
    host.connect();

    // dispatch_event returns false when a listener cancelled the event
    assert!(!element.dispatch_event(&keydown("i", true, false)).unwrap());
    assert!(element.dispatch_event(&keydown("x", true, false)).unwrap());

    host.disconnect();
    assert!(element.dispatch_event(&keydown("i", true, false)).unwrap());
}

// === Paste ===

#[wasm_bindgen_test]
fn test_paste_reads_only_plain_text() {
    let data = DataTransfer::new().unwrap();
    data.set_data("text/html", "<b>bold</b>").unwrap();
    data.set_data("text/plain", "'''bold'''").unwrap();

    let init = ClipboardEventInit::new();
    init.set_clipboard_data(Some(&data));
    init.set_cancelable(true);
    let event = ClipboardEvent::new_with_event_init_dict("paste", &init).unwrap();

    let inserted = handle_paste(&event).unwrap();
    assert_eq!(inserted.as_deref(), Some("'''bold'''"));
    assert!(event.default_prevented());
}

#[wasm_bindgen_test]
fn test_html_only_payload_has_no_plain_text() {
    let data = DataTransfer::new().unwrap();
    data.set_data("text/html", "<i>x</i>").unwrap();
    assert_eq!(plain_text_payload(&data), None);
}

// === Editable state ===

#[wasm_bindgen_test]
fn test_editable_toggle_does_not_start_pass() {
    let element = make_element("");
    let host = EditableHost::new(element.clone(), test_config());
    host.connect();
    let passes = host.passes_started();

    assert!(!host.has_listeners());
    assert_eq!(element.content_editable(), "false");

    host.set_editable(true).unwrap();
    assert!(host.editable());
    assert!(host.has_listeners());
    assert_eq!(element.content_editable(), "plaintext-only");

    // idempotent
    host.attribute_changed("editable", None, Some(""));
    assert!(host.has_listeners());

    host.set_editable(false).unwrap();
    assert!(!host.has_listeners());
    assert_eq!(element.content_editable(), "false");

    assert_eq!(host.passes_started(), passes);
    host.disconnect();
}

#[wasm_bindgen_test]
fn test_connect_adds_markup_class() {
    let element = make_element("");
    let host = EditableHost::new(element.clone(), test_config());
    host.connect();
    assert!(host.is_attached());
    assert!(element.class_list().contains("wikitext-markup"));
    host.disconnect();
    assert!(!host.is_attached());
}

#[wasm_bindgen_test]
fn test_value_attribute_replaces_text_while_detached() {
    let element = make_element("old");
    let host = EditableHost::new(element, test_config());

    host.attribute_changed("value", Some("old"), Some("[[Page]]"));
    assert_eq!(host.value(), "[[Page]]");
    assert_eq!(host.passes_started(), 0);

    host.attribute_changed("value", Some("[[Page]]"), None);
    assert_eq!(host.value(), "");

    host.attribute_changed("title", None, Some("ignored"));
    assert_eq!(host.value(), "");
}

#[wasm_bindgen_test]
fn test_null_host_rejected() {
    let result = EditableHost::from_js(&JsValue::NULL, test_config());
    assert!(matches!(result, Err(HighlightError::MissingHost)));
}

// === Passes ===

#[wasm_bindgen_test]
async fn test_empty_text_pass() {
    let registry = highlight_registry().unwrap();
    let key = HighlightKey::from_tag("test.empty.pass");
    let text = gloo_utils::document().create_text_node("other host");
    let mut other = ScopedHighlights::new();
    TextNodeTarget::new(&text, &mut other)
        .add(&key, &HighlightRange::new(0, 5, "test.empty.pass"))
        .unwrap();

    let element = make_element("");
    let host = EditableHost::new(element, test_config());
    host.connect();

    let outcome = host.highlight().await.unwrap();
    assert_eq!(outcome, PassOutcome::Empty);
    assert_eq!(host.highlight_count(), 0);
    assert!(host.last_ranges().is_empty());

    // another host's ranges are untouched
    assert_eq!(registry.get(key.as_str()).unwrap().size(), 1);
    host.disconnect();
    assert_eq!(registry.get(key.as_str()).unwrap().size(), 1);
    other.clear();
}

#[wasm_bindgen_test]
async fn test_failed_pass_leaves_no_highlights() {
    let element = make_element("");
    let span = gloo_utils::document().create_element("span").unwrap();
    span.set_text_content(Some("[[Page]]"));
    element.append_child(&span).unwrap();

    let host = EditableHost::new(element, test_config());
    host.connect();

    assert!(host.highlight().await.is_err());
    assert_eq!(host.highlight_count(), 0);
    assert!(host.last_ranges().is_empty());
    host.disconnect();
}

#[wasm_bindgen_test]
fn test_input_event_starts_pass() {
    let element = make_element("= T =");
    element.set_attribute("editable", "").unwrap();
    let host = EditableHost::new(element.clone(), test_config());
    host.connect();
    let passes = host.passes_started();

    element
        .dispatch_event(&InputEvent::new("input").unwrap())
        .unwrap();
    assert_eq!(host.passes_started(), passes + 1);

    host.disconnect();
    element
        .dispatch_event(&InputEvent::new("input").unwrap())
        .unwrap();
    assert_eq!(host.passes_started(), passes + 1);
}

#[wasm_bindgen_test]
fn test_set_value_starts_pass_while_attached() {
    let element = make_element("");
    let host = EditableHost::new(element, test_config());
    host.connect();
    let passes = host.passes_started();

    host.set_value("= T =");
    assert_eq!(host.value(), "= T =");
    assert_eq!(host.passes_started(), passes + 1);

    host.disconnect();
    host.set_value("== U ==");
    assert_eq!(host.value(), "== U ==");
    assert_eq!(host.passes_started(), passes + 1);
}

#[wasm_bindgen_test]
async fn test_engine_failure_propagates() {
    let element = make_element("== Heading ==");
    let host = EditableHost::new(element, test_config());
    host.connect();

    let err = host.highlight().await.unwrap_err();
    assert!(err.is_parser_acquisition(), "unexpected error: {err}");
    assert_eq!(host.highlight_count(), 0);
    host.disconnect();
}

#[wasm_bindgen_test]
async fn test_detached_pass_is_superseded() {
    let element = make_element("text");
    let host = EditableHost::new(element, test_config());

    let outcome = host.highlight().await.unwrap();
    assert_eq!(outcome, PassOutcome::Superseded);
}

// === Scoped highlights ===

#[wasm_bindgen_test]
fn test_scopes_only_remove_their_own_ranges() {
    let registry = highlight_registry().unwrap();
    let text = gloo_utils::document().create_text_node("abcdefgh");
    let key = HighlightKey::from_tag("test.shared.scope");

    let mut first = ScopedHighlights::new();
    let mut second = ScopedHighlights::new();
    TextNodeTarget::new(&text, &mut first)
        .add(&key, &HighlightRange::new(0, 2, "test.shared.scope"))
        .unwrap();
    TextNodeTarget::new(&text, &mut second)
        .add(&key, &HighlightRange::new(4, 6, "test.shared.scope"))
        .unwrap();

    assert_eq!(registry.get(key.as_str()).unwrap().size(), 2);

    first.clear();
    assert!(first.is_empty());
    assert_eq!(registry.get(key.as_str()).unwrap().size(), 1);

    second.clear();
    assert!(!registry.has(key.as_str()));
}

#[wasm_bindgen_test]
fn test_out_of_range_offsets_rejected() {
    let text = gloo_utils::document().create_text_node("short");
    let mut scope = ScopedHighlights::new();
    let key = HighlightKey::from_tag("test.out-of-range");

    let err = TextNodeTarget::new(&text, &mut scope)
        .add(&key, &HighlightRange::new(2, 40, "test.out-of-range"))
        .unwrap_err();
    assert!(matches!(
        err,
        HighlightError::RangeConstruction { start: 2, end: 40, .. }
    ));
    assert!(scope.is_empty());
}
