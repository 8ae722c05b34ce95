//! Highlight query for the tree-sitter wikitext grammar.
//!
//! The query text is a versioned contract with the grammar artifact and with
//! stylesheets that target `::highlight(...)` names. Keep it in sync with the
//! grammar rather than editing it locally.

use smol_str::SmolStr;

use crate::highlight::HighlightKey;

/// Capture rules run against the wikitext syntax tree.
pub const HIGHLIGHT_QUERY: &str = r#"
  ;; Highlighting rules for Wikitext

;; Highlight headings
(heading1
  (heading_marker) @punctuation.special
  (text) @markup.heading.1
  (heading_marker) @punctuation.special
)
(heading2
  (heading_marker) @punctuation.special
  (text) @markup.heading.2
  (heading_marker) @punctuation.special
)
(heading3
  (heading_marker) @punctuation.special
  (text) @markup.heading.3
  (heading_marker) @punctuation.special
)
(heading4
  (heading_marker) @punctuation.special
  (text) @markup.heading.4
  (heading_marker) @punctuation.special
)
(heading5
  (heading_marker) @punctuation.special
  (text) @markup.heading.5
  (heading_marker) @punctuation.special
)

(heading6
  (heading_marker) @punctuation.special
  (text) @markup.heading.6
  (heading_marker) @punctuation.special
)

(wikilink
  (wikilink_page) @markup.link.url
  (page_name_segment)? @markup.link.label
)
(external_link
  (url) @markup.link.url
  (page_name_segment)? @markup.link.label
)
(template
  (template_name)? @module
  (template_argument
  (template_param_name)? @tag.attribute
  (template_param_value)? @string
  )?
)

(comment) @comment

[
  "[["
  "]]"
  "{{"
  "}}"
  "{|"
  "|}"
  "["
  "]"
  "<"
  ">"
  "</"
] @punctuation.bracket

[
  "|"
  "|-"
  "|+"
  "!"
  "!!"
  "||"
] @punctuation.delimiter

(table_cell_block
  (content) @text
)
(table_cell_inline
  (content) @text
)
(table_header_block
  (content) @text.special
)
(table_header_inline
  (content) @text.special
)
(table_cell_inline
  (content) @text
)

(html_attribute
  (html_attribute_name) @attribute
  (html_attribute_value) @string
)

(paragraph
  (italic)? @markup.italic
  (bold)? @markup.strong
)
"#;

/// Capture names declared in a query, in order of first appearance.
pub fn capture_names(query: &str) -> Vec<SmolStr> {
    let mut names: Vec<SmolStr> = Vec::new();
    for line in query.lines() {
        // `;` starts a comment for the rest of the line.
        let code = line.split(';').next().unwrap_or_default();
        let mut rest = code;
        while let Some(at) = rest.find('@') {
            let tail = &rest[at + 1..];
            let len = tail
                .find(|c: char| !(c.is_alphanumeric() || matches!(c, '.' | '_' | '-')))
                .unwrap_or(tail.len());
            let name = &tail[..len];
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(SmolStr::new(name));
            }
            rest = &tail[len..];
        }
    }
    names
}

/// Highlight-set keys that [`HIGHLIGHT_QUERY`] can produce.
///
/// Useful for stylesheet authors: each key is a valid `::highlight(<key>)` name.
pub fn highlight_names() -> Vec<HighlightKey> {
    capture_names(HIGHLIGHT_QUERY)
        .iter()
        .map(|name| HighlightKey::from_tag(name))
        .collect()
}
