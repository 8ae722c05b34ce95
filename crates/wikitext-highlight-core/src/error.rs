//! Error types for highlighting operations.

use thiserror::Error;

/// Errors that can occur while acquiring a parser or applying highlights.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HighlightError {
    /// The parsing engine module could not be imported or initialized.
    #[error("failed to initialize parsing engine: {0}")]
    EngineInit(String),

    /// The grammar artifact could not be loaded or bound to a parser.
    #[error("failed to load grammar from {path}: {message}")]
    GrammarLoad { path: String, message: String },

    /// The highlight query did not compile against the grammar.
    #[error("invalid highlight query: {0}")]
    Query(String),

    /// The engine failed to produce a syntax tree for the text.
    #[error("parse failed: {0}")]
    Parse(String),

    /// No host element was supplied.
    #[error("a host element is required")]
    MissingHost,

    /// The host has text but no leading text node to anchor ranges on.
    #[error("host element has no text node to highlight")]
    NoTextNode,

    /// The DOM rejected a range (usually offsets beyond the text node).
    #[error("cannot build range {start}..{end}: {message}")]
    RangeConstruction {
        start: usize,
        end: usize,
        message: String,
    },

    /// The environment lacks a required API.
    #[error("unsupported environment: {0}")]
    Unsupported(&'static str),

    /// Any other DOM call failure.
    #[error("DOM error: {0}")]
    Dom(String),
}

impl HighlightError {
    /// Whether the error came from acquiring the parser (engine, grammar, query).
    pub fn is_parser_acquisition(&self) -> bool {
        matches!(
            self,
            Self::EngineInit(_) | Self::GrammarLoad { .. } | Self::Query(_)
        )
    }
}
