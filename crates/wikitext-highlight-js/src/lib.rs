//! WASM bindings for the wikitext highlighter.
//!
//! Highlights wikitext inside an editable element using the CSS Custom
//! Highlight API. Two ways in:
//!
//! - `defineWikitextHighlighter()` registers `<wikitext-highlighter>`, which
//!   manages its own lifecycle
//! - `WikitextHighlighter.attach(element)` highlights an element the page
//!   already owns, until `destroy()`
//!
//! Styling is up to the page: one `::highlight(<name>)` rule per name from
//! `highlightNames()`.

mod element;
mod highlighter;
mod types;

pub use element::*;
pub use highlighter::*;
pub use types::*;

use wasm_bindgen::prelude::*;

/// Initialize panic hook and console logging.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();

    use tracing::Level;
    use tracing::subscriber::set_global_default;
    use tracing_subscriber::Registry;
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::layer::SubscriberExt;

    let console_level = if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let wasm_layer = tracing_wasm::WASMLayer::new(
        tracing_wasm::WASMLayerConfigBuilder::new()
            .set_max_level(console_level)
            .build(),
    );

    let filter = EnvFilter::new(
        "info,wikitext_highlight_core=debug,wikitext_highlight_browser=debug,wikitext_highlight_js=debug",
    );

    let reg = Registry::default().with(filter).with(wasm_layer);

    let _ = set_global_default(reg);
}

/// Names of every highlight set the built-in query can produce.
#[wasm_bindgen(js_name = highlightNames)]
pub fn highlight_names() -> Vec<String> {
    wikitext_highlight_core::highlight_names()
        .into_iter()
        .map(|key| key.to_string())
        .collect()
}
