//! The editable host: one element, its parser, and its highlights.
//!
//! Both element adapters (the self-registering custom element and the
//! injected wrapper) delegate here, so lifecycle, editing and pass
//! sequencing behave the same no matter who owns the element.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::{Rc, Weak};

use gloo_events::{EventListener, EventListenerOptions};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;
use web_sys::{ClipboardEvent, EventTarget, HtmlElement, KeyboardEvent, Node};
use wikitext_highlight_core::{
    AttributeEffect, EditableState, HighlightError, HighlightRange, HighlighterConfig, Lifecycle,
    PassGeneration, PassOutcome, PassTicket, ShortcutFilter, attribute_effect, highlight_text,
};

use crate::engine::ParserSlot;
use crate::events::{handle_keydown, handle_paste};
use crate::highlights::{ScopedHighlights, TextNodeTarget};
use crate::js_error_message;

/// Listener handles. Dropping them removes the listeners.
struct InputListeners {
    _input: EventListener,
    _keydown: EventListener,
    _paste: EventListener,
}

struct HostInner {
    element: HtmlElement,
    config: HighlighterConfig,
    shortcuts: ShortcutFilter,
    parser: ParserSlot,
    highlights: RefCell<ScopedHighlights>,
    passes: PassGeneration,
    lifecycle: Cell<Lifecycle>,
    listeners: RefCell<Option<InputListeners>>,
    last_ranges: RefCell<Vec<HighlightRange>>,
}

/// Highlighting state for one editable element.
///
/// Cheap to clone; clones share the same host.
#[derive(Clone)]
pub struct EditableHost {
    inner: Rc<HostInner>,
}

impl EditableHost {
    pub fn new(element: HtmlElement, config: HighlighterConfig) -> Self {
        let shortcuts = config.shortcut_filter();
        Self {
            inner: Rc::new(HostInner {
                element,
                config,
                shortcuts,
                parser: ParserSlot::new(),
                highlights: RefCell::new(ScopedHighlights::new()),
                passes: PassGeneration::new(),
                lifecycle: Cell::new(Lifecycle::Detached),
                listeners: RefCell::new(None),
                last_ranges: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Wrap an element handed over from JS. `null`/`undefined` is rejected.
    pub fn from_js(element: &JsValue, config: HighlighterConfig) -> Result<Self, HighlightError> {
        if element.is_null() || element.is_undefined() {
            return Err(HighlightError::MissingHost);
        }
        let element = element
            .clone()
            .dyn_into::<HtmlElement>()
            .map_err(|v| HighlightError::Dom(format!("host is not an HTMLElement: {v:?}")))?;
        Ok(Self::new(element, config))
    }

    pub fn element(&self) -> &HtmlElement {
        &self.inner.element
    }

    pub fn config(&self) -> &HighlighterConfig {
        &self.inner.config
    }

    // === Lifecycle ===

    /// Attach: mark the element, apply editable state, run the first pass.
    pub fn connect(&self) {
        let inner = &self.inner;
        inner.lifecycle.set(Lifecycle::Attached);
        if let Err(e) = inner.element.class_list().add_1(&inner.config.markup_class) {
            tracing::warn!(error = %js_error_message(&e), "failed to add markup class");
        }
        self.update_editable_state();
        self.request_highlight();
    }

    /// Detach: drop listeners, invalidate in-flight passes, remove this
    /// host's highlights.
    pub fn disconnect(&self) {
        let inner = &self.inner;
        inner.lifecycle.set(Lifecycle::Detached);
        inner.listeners.borrow_mut().take();
        inner.passes.invalidate();
        inner.clear_highlights();
        tracing::debug!("host detached");
    }

    pub fn is_attached(&self) -> bool {
        self.inner.lifecycle.get().is_attached()
    }

    // === Editing ===

    pub fn editable_state(&self) -> EditableState {
        EditableState::from_attribute(self.inner.element.has_attribute("editable"))
    }

    /// Sync `contentEditable` and listener installation with the `editable`
    /// attribute. Idempotent; never starts a pass.
    pub fn update_editable_state(&self) {
        let state = self.editable_state();
        self.inner.element.set_content_editable(state.content_editable());

        let mut listeners = self.inner.listeners.borrow_mut();
        if state.wants_listeners() && self.is_attached() {
            if listeners.is_none() {
                *listeners = Some(install_listeners(&self.inner));
                tracing::debug!("input listeners installed");
            }
        } else if listeners.take().is_some() {
            tracing::debug!("input listeners removed");
        }
    }

    pub fn has_listeners(&self) -> bool {
        self.inner.listeners.borrow().is_some()
    }

    /// React to an observed attribute changing.
    pub fn attribute_changed(&self, name: &str, old: Option<&str>, new: Option<&str>) {
        match attribute_effect(name, old, new) {
            AttributeEffect::ReplaceText(text) => self.set_value(&text),
            AttributeEffect::RefreshEditable => self.update_editable_state(),
            AttributeEffect::Ignore => {}
        }
    }

    /// Current text content.
    pub fn value(&self) -> String {
        self.inner.element.text_content().unwrap_or_default()
    }

    /// Replace the text content; highlights again if attached.
    pub fn set_value(&self, value: &str) {
        self.inner.element.set_text_content(Some(value));
        if self.is_attached() {
            self.request_highlight();
        }
    }

    pub fn editable(&self) -> bool {
        self.editable_state() == EditableState::Editable
    }

    pub fn set_editable(&self, editable: bool) -> Result<(), HighlightError> {
        let element = &self.inner.element;
        let result = if editable {
            element.set_attribute("editable", "")
        } else {
            element.remove_attribute("editable")
        };
        result.map_err(|e| HighlightError::Dom(js_error_message(&e)))?;
        self.update_editable_state();
        Ok(())
    }

    // === Passes ===

    /// Start a pass in the background; failures are logged.
    pub fn request_highlight(&self) {
        let pass = self.highlight();
        spawn_local(async move {
            match pass.await {
                Ok(outcome) => tracing::debug!(?outcome, "highlight pass finished"),
                Err(e) => tracing::warn!(error = %e, "highlight pass failed"),
            }
        });
    }

    /// Start a pass and return its completion.
    ///
    /// The pass is sequenced when this is called, not when the future is
    /// first polled: any later call supersedes it.
    pub fn highlight(&self) -> impl Future<Output = Result<PassOutcome, HighlightError>> + 'static {
        let inner = Rc::clone(&self.inner);
        let ticket = inner.passes.begin();
        async move { inner.run_pass(ticket).await }
    }

    /// Passes started since creation.
    pub fn passes_started(&self) -> u64 {
        self.inner.passes.started()
    }

    /// Ranges of the last applied pass.
    pub fn last_ranges(&self) -> Vec<HighlightRange> {
        self.inner.last_ranges.borrow().clone()
    }

    /// Ranges this host currently has registered.
    pub fn highlight_count(&self) -> usize {
        self.inner.highlights.borrow().len()
    }
}

impl HostInner {
    /// A failed pass that is still current leaves nothing behind: no ranges
    /// in the registry and no `last_ranges`.
    async fn run_pass(&self, ticket: PassTicket) -> Result<PassOutcome, HighlightError> {
        let result = self.try_pass(ticket).await;
        if result.is_err() && self.passes.is_current(ticket) {
            self.clear_highlights();
        }
        result
    }

    async fn try_pass(&self, ticket: PassTicket) -> Result<PassOutcome, HighlightError> {
        if !self.lifecycle.get().is_attached() {
            return Ok(PassOutcome::Superseded);
        }
        if self.clear_if_empty() {
            return Ok(PassOutcome::Empty);
        }

        let parser = self.parser.acquire(&self.config.grammar).await?;
        if !self.passes.is_current(ticket) {
            tracing::debug!(ticket = ticket.value(), "pass superseded");
            return Ok(PassOutcome::Superseded);
        }

        // The text may have changed while the parser loaded.
        if self.clear_if_empty() {
            return Ok(PassOutcome::Empty);
        }
        self.last_ranges.borrow_mut().clear();
        let text = self.element.text_content().unwrap_or_default();
        let node = self
            .element
            .first_child()
            .filter(|child| child.node_type() == Node::TEXT_NODE)
            .ok_or(HighlightError::NoTextNode)?;

        let mut highlights = self.highlights.borrow_mut();
        let mut target = TextNodeTarget::new(&node, &mut highlights);
        let ranges = highlight_text(&mut *parser.borrow_mut(), &text, &mut target)?;

        let count = ranges.len();
        *self.last_ranges.borrow_mut() = ranges;
        Ok(PassOutcome::Applied { ranges: count })
    }

    /// Clear this host's highlights when there is no text. Returns whether it
    /// did.
    fn clear_if_empty(&self) -> bool {
        let empty = self
            .element
            .text_content()
            .is_none_or(|text| text.is_empty());
        if empty {
            self.clear_highlights();
        }
        empty
    }

    fn clear_highlights(&self) {
        self.highlights.borrow_mut().clear();
        self.last_ranges.borrow_mut().clear();
    }
}

fn install_listeners(inner: &Rc<HostInner>) -> InputListeners {
    let target: &EventTarget = inner.element.as_ref();

    let weak = Rc::downgrade(inner);
    let input = EventListener::new(target, "input", move |_event| {
        if let Some(host) = upgrade(&weak) {
            host.request_highlight();
        }
    });

    let weak = Rc::downgrade(inner);
    let keydown = EventListener::new_with_options(
        target,
        "keydown",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let (Some(inner), Some(event)) = (weak.upgrade(), event.dyn_ref::<KeyboardEvent>())
            else {
                return;
            };
            handle_keydown(event, &inner.shortcuts);
        },
    );

    let paste = EventListener::new_with_options(
        target,
        "paste",
        EventListenerOptions::enable_prevent_default(),
        move |event| {
            let Some(event) = event.dyn_ref::<ClipboardEvent>() else {
                return;
            };
            if let Err(e) = handle_paste(event) {
                tracing::warn!(error = %e, "plain-text paste failed");
            }
        },
    );

    InputListeners {
        _input: input,
        _keydown: keydown,
        _paste: paste,
    }
}

fn upgrade(weak: &Weak<HostInner>) -> Option<EditableHost> {
    weak.upgrade().map(|inner| EditableHost { inner })
}
