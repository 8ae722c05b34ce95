//! Parsing engine bindings and the per-host parser adapter.
//!
//! The engine (web-tree-sitter) is an ES module loaded with a dynamic
//! `import()` from a configurable URL, so nothing about it is resolved when
//! the wasm module itself is instantiated. Classes are reached through the
//! module namespace and called structurally.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use js_sys::{Array, Function, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wikitext_highlight_core::{
    Capture, CaptureNode, GrammarConfig, HIGHLIGHT_QUERY, HighlightError, NodeId, QueryEngine,
};

use crate::js_error_message;

// Relative engine URLs resolve against the page, not the snippet file.
#[wasm_bindgen(inline_js = "export function import_module(url) { \
    return import(new URL(url, document.baseURI).href); \
}")]
extern "C" {
    #[wasm_bindgen(catch)]
    fn import_module(url: &str) -> Result<Promise, JsValue>;
}

// === web-tree-sitter bindings ===

#[wasm_bindgen]
extern "C" {
    /// Namespace object of the imported engine module.
    #[derive(Debug, Clone)]
    pub type EngineModule;

    #[wasm_bindgen(method, getter, structural, js_name = Parser)]
    fn parser_class(this: &EngineModule) -> JsValue;

    #[wasm_bindgen(method, getter, structural, js_name = Language)]
    fn language_class(this: &EngineModule) -> JsValue;

    /// Only exported by newer engine releases.
    #[wasm_bindgen(method, getter, structural, js_name = Query)]
    fn query_class(this: &EngineModule) -> JsValue;

    type ParserClass;

    #[wasm_bindgen(method, structural, catch, js_name = init)]
    fn init(this: &ParserClass) -> Result<Promise, JsValue>;

    type LanguageClass;

    #[wasm_bindgen(method, structural, catch, js_name = load)]
    fn load(this: &LanguageClass, path: &str) -> Result<Promise, JsValue>;

    #[derive(Debug, Clone)]
    pub type Parser;

    #[wasm_bindgen(method, structural, catch, js_name = setLanguage)]
    fn set_language(this: &Parser, language: &Language) -> Result<JsValue, JsValue>;

    /// Returns a `Tree`, or `null` if parsing was cancelled.
    #[wasm_bindgen(method, structural, catch, js_name = parse)]
    fn parse_text(this: &Parser, input: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(method, structural, js_name = delete)]
    fn delete_parser(this: &Parser);

    #[derive(Debug, Clone)]
    pub type Language;

    #[wasm_bindgen(method, structural, catch, js_name = query)]
    fn compile_query(this: &Language, source: &str) -> Result<Query, JsValue>;

    #[derive(Debug, Clone)]
    pub type Tree;

    #[wasm_bindgen(method, getter, structural, js_name = rootNode)]
    pub fn root_node(this: &Tree) -> SyntaxNode;

    #[wasm_bindgen(method, structural, js_name = delete)]
    fn delete_tree(this: &Tree);

    #[derive(Debug, Clone)]
    pub type Query;

    #[wasm_bindgen(method, structural, catch, js_name = captures)]
    fn captures_of(this: &Query, node: &SyntaxNode) -> Result<Array, JsValue>;

    #[wasm_bindgen(method, structural, js_name = delete)]
    fn delete_query(this: &Query);

    /// `{ name, node }` pair returned by `Query.captures`.
    type QueryCapture;

    #[wasm_bindgen(method, getter, structural)]
    fn name(this: &QueryCapture) -> String;

    #[wasm_bindgen(method, getter, structural)]
    fn node(this: &QueryCapture) -> SyntaxNode;

    #[derive(Debug, Clone)]
    pub type SyntaxNode;

    #[wasm_bindgen(method, getter, structural, js_name = id)]
    fn node_id(this: &SyntaxNode) -> f64;

    #[wasm_bindgen(method, getter, structural, js_name = startIndex)]
    fn start_offset(this: &SyntaxNode) -> u32;

    #[wasm_bindgen(method, getter, structural, js_name = endIndex)]
    fn end_offset(this: &SyntaxNode) -> u32;
}

impl CaptureNode for SyntaxNode {
    fn id(&self) -> NodeId {
        NodeId(self.node_id() as u64)
    }

    fn start_index(&self) -> usize {
        self.start_offset() as usize
    }

    fn end_index(&self) -> usize {
        self.end_offset() as usize
    }
}

// === Global engine ===

thread_local! {
    /// Initialized engine modules, by URL.
    static ENGINES: RefCell<HashMap<String, EngineModule>> = RefCell::new(HashMap::new());
}

/// Import the engine module and run its one-time `Parser.init()`.
///
/// Successful initializations are shared process-wide. Two hosts racing on
/// the first load may both initialize; the engine tolerates repeat init.
pub async fn load_engine(url: &str) -> Result<EngineModule, HighlightError> {
    if let Some(engine) = ENGINES.with(|engines| engines.borrow().get(url).cloned()) {
        return Ok(engine);
    }

    let init_err = |e: JsValue| HighlightError::EngineInit(js_error_message(&e));

    let module: EngineModule = JsFuture::from(import_module(url).map_err(init_err)?)
        .await
        .map_err(init_err)?
        .unchecked_into();

    let parser_class = module.parser_class();
    if !parser_class.is_function() {
        return Err(HighlightError::EngineInit(format!(
            "{url} does not export Parser"
        )));
    }
    let init = parser_class.unchecked_ref::<ParserClass>().init().map_err(init_err)?;
    JsFuture::from(init).await.map_err(init_err)?;

    tracing::debug!(url, "parsing engine initialized");
    ENGINES.with(|engines| {
        engines
            .borrow_mut()
            .insert(url.to_owned(), module.clone());
    });
    Ok(module)
}

// === Parser ===

/// Releases the engine-side tree when dropped.
#[derive(Debug)]
struct OwnedTree(Tree);

impl Drop for OwnedTree {
    fn drop(&mut self) {
        self.0.delete_tree();
    }
}

/// A parser bound to the wikitext grammar, with the highlight query compiled.
///
/// Holds the tree of the most recent parse; each parse replaces (and
/// releases) the previous one.
#[derive(Debug)]
pub struct WikitextParser {
    parser: Parser,
    query: Query,
    tree: Option<OwnedTree>,
}

impl WikitextParser {
    /// Initialize the engine (once per process), load the grammar, and
    /// compile [`HIGHLIGHT_QUERY`].
    pub async fn load(config: &GrammarConfig) -> Result<Self, HighlightError> {
        let engine = load_engine(&config.engine_module).await?;

        let grammar_err = |e: JsValue| HighlightError::GrammarLoad {
            path: config.grammar_path.clone(),
            message: js_error_message(&e),
        };

        let language_class = engine.language_class();
        if !language_class.is_function() {
            return Err(HighlightError::EngineInit(format!(
                "{} does not export Language",
                config.engine_module
            )));
        }
        let loading = language_class
            .unchecked_ref::<LanguageClass>()
            .load(&config.grammar_path)
            .map_err(grammar_err)?;
        let language: Language = JsFuture::from(loading)
            .await
            .map_err(grammar_err)?
            .unchecked_into();

        let parser: Parser = Reflect::construct(engine.parser_class().unchecked_ref::<Function>(), &Array::new())
            .map_err(|e| HighlightError::EngineInit(js_error_message(&e)))?
            .unchecked_into();
        parser.set_language(&language).map_err(grammar_err)?;

        let query = compile(&engine, &language)?;
        tracing::debug!(grammar = %config.grammar_path, "wikitext parser ready");

        Ok(Self {
            parser,
            query,
            tree: None,
        })
    }

    /// Tree of the most recent parse.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref().map(|t| &t.0)
    }
}

/// Prefer `new Query(language, source)`; older engines only offer
/// `language.query(source)`.
fn compile(engine: &EngineModule, language: &Language) -> Result<Query, HighlightError> {
    let query_class = engine.query_class();
    let compiled = if query_class.is_function() {
        let args = Array::of2(language, &JsValue::from_str(HIGHLIGHT_QUERY));
        Reflect::construct(query_class.unchecked_ref::<Function>(), &args)
            .map(|q| q.unchecked_into::<Query>())
    } else {
        language.compile_query(HIGHLIGHT_QUERY)
    };
    compiled.map_err(|e| HighlightError::Query(js_error_message(&e)))
}

impl QueryEngine for WikitextParser {
    type Node = SyntaxNode;

    fn captures(&mut self, text: &str) -> Result<Vec<Capture<SyntaxNode>>, HighlightError> {
        let parsed = self
            .parser
            .parse_text(text)
            .map_err(|e| HighlightError::Parse(js_error_message(&e)))?;
        if parsed.is_null() || parsed.is_undefined() {
            return Err(HighlightError::Parse("parser returned no tree".into()));
        }

        // Replacing drops (and deletes) the previous tree.
        let tree = self.tree.insert(OwnedTree(parsed.unchecked_into()));
        let root = tree.0.root_node();

        let captures = self
            .query
            .captures_of(&root)
            .map_err(|e| HighlightError::Query(js_error_message(&e)))?;

        Ok(captures
            .iter()
            .map(|value| {
                let capture: QueryCapture = value.unchecked_into();
                Capture::new(capture.name(), capture.node())
            })
            .collect())
    }
}

impl Drop for WikitextParser {
    fn drop(&mut self) {
        self.tree = None;
        self.query.delete_query();
        self.parser.delete_parser();
    }
}

// === Per-host adapter ===

/// Memoized parser for one host.
///
/// The first successful [`acquire`](Self::acquire) is kept and handed out to
/// every later pass. Failures are not cached; the next pass tries again.
#[derive(Debug, Default)]
pub struct ParserSlot {
    parser: RefCell<Option<Rc<RefCell<WikitextParser>>>>,
}

impl ParserSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Rc<RefCell<WikitextParser>>> {
        self.parser.borrow().clone()
    }

    pub fn is_ready(&self) -> bool {
        self.parser.borrow().is_some()
    }

    pub async fn acquire(
        &self,
        config: &GrammarConfig,
    ) -> Result<Rc<RefCell<WikitextParser>>, HighlightError> {
        if let Some(parser) = self.get() {
            return Ok(parser);
        }

        let loaded = Rc::new(RefCell::new(WikitextParser::load(config).await?));
        // An overlapping acquire may have finished first; keep that one.
        let mut slot = self.parser.borrow_mut();
        Ok(Rc::clone(slot.get_or_insert(loaded)))
    }
}
