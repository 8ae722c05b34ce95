//! Highlighter configuration.
//!
//! Deserialized from the options object a page passes when creating a
//! highlighter or registering the custom element. Every field has a default,
//! so `{}` is a complete configuration.

use serde::{Deserialize, Serialize};

use crate::keys::{FormattingShortcut, ShortcutFilter};

/// Tag name the custom element is registered under by default.
pub const DEFAULT_ELEMENT_NAME: &str = "wikitext-highlighter";

/// Where the parsing engine and the grammar artifact are loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GrammarConfig {
    /// ES module exporting web-tree-sitter's `Parser` and `Language`.
    pub engine_module: String,
    /// Path or URL of the compiled wikitext grammar.
    pub grammar_path: String,
}

impl Default for GrammarConfig {
    fn default() -> Self {
        Self {
            engine_module: "https://tree-sitter.github.io/web-tree-sitter.js".to_owned(),
            grammar_path: "./tree-sitter-wikitext.wasm".to_owned(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HighlighterConfig {
    #[serde(flatten)]
    pub grammar: GrammarConfig,
    /// Class added to the host when it is attached.
    pub markup_class: String,
    /// Formatting shortcuts suppressed while editable.
    pub blocked_shortcuts: Vec<FormattingShortcut>,
    /// Custom element tag name used by the self-registering adapter.
    pub element_name: String,
}

impl Default for HighlighterConfig {
    fn default() -> Self {
        Self {
            grammar: GrammarConfig::default(),
            markup_class: "wikitext-markup".to_owned(),
            blocked_shortcuts: FormattingShortcut::ALL.to_vec(),
            element_name: DEFAULT_ELEMENT_NAME.to_owned(),
        }
    }
}

impl HighlighterConfig {
    pub fn shortcut_filter(&self) -> ShortcutFilter {
        ShortcutFilter::new(self.blocked_shortcuts.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config: HighlighterConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, HighlighterConfig::default());
        assert_eq!(config.grammar.grammar_path, "./tree-sitter-wikitext.wasm");
        assert_eq!(config.shortcut_filter(), ShortcutFilter::default());
    }

    #[test]
    fn test_partial_override() {
        let config: HighlighterConfig = serde_json::from_str(
            r#"{
                "grammarPath": "/assets/wikitext.wasm",
                "engineModule": "/assets/web-tree-sitter.js",
                "blockedShortcuts": ["bold", "link"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.grammar.grammar_path, "/assets/wikitext.wasm");
        assert_eq!(config.grammar.engine_module, "/assets/web-tree-sitter.js");
        assert_eq!(config.markup_class, "wikitext-markup");
        assert_eq!(config.element_name, DEFAULT_ELEMENT_NAME);
        assert_eq!(
            config.shortcut_filter().blocked(),
            &[FormattingShortcut::Bold, FormattingShortcut::Link]
        );
    }

    #[test]
    fn test_unknown_shortcut_rejected() {
        let result: Result<HighlighterConfig, _> =
            serde_json::from_str(r#"{"blockedShortcuts": ["strike"]}"#);
        assert!(result.is_err());
    }
}
