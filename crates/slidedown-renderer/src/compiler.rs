//! Node compiler.
//!
//! Walks a parsed [`Document`] depth-first and turns every node into HTML
//! through its registered handler. Children are rendered before their parent
//! so a handler always sees fully rendered content.
//!
//! # Example
//!
//! ```
//! use slidedown_renderer::{Compiler, Parser};
//!
//! let document = Parser::new()
//!     .parse(".slide{.body{.o{one} .o{two}}}")
//!     .unwrap();
//! let output = Compiler::new().compile(&document);
//!
//! assert_eq!(output.slide_count, 1);
//! assert!(output.html.contains(r#"id="order-1-2""#));
//! assert!(output.warnings.is_empty());
//! ```

use crate::directive::{DirectiveRegistry, RenderContext, RenderedNode};
use crate::highlight::{CodeBlock, Highlighter, PlainHighlighter};
use crate::node::{Node, Segment};
use crate::parser::{Document, SideTables};
use crate::util::escape_html;

/// Result of compiling a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CompileOutput {
    /// Rendered top-level nodes joined by newlines.
    pub html: String,
    /// Number of slides produced.
    pub slide_count: usize,
    /// Non-fatal problems met while rendering.
    pub warnings: Vec<String>,
}

/// HTML compiler.
pub struct Compiler<'r> {
    registry: &'r DirectiveRegistry,
    highlighter: Box<dyn Highlighter>,
}

impl Compiler<'static> {
    /// Create a compiler over the global built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(DirectiveRegistry::global())
    }
}

impl Default for Compiler<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Compiler<'r> {
    /// Create a compiler over a custom registry.
    #[must_use]
    pub fn with_registry(registry: &'r DirectiveRegistry) -> Self {
        Self {
            registry,
            highlighter: Box::new(PlainHighlighter),
        }
    }

    /// Use a different code block highlighter.
    #[must_use]
    pub fn with_highlighter(mut self, highlighter: impl Highlighter + 'static) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Compile a whole document with fresh counters.
    pub fn compile(&self, document: &Document) -> CompileOutput {
        let mut ctx = RenderContext::new();
        let html = self.render_nodes(document.nodes(), document.tables(), &mut ctx);
        let slide_count = ctx.current_slide();
        let warnings = ctx.into_warnings();

        tracing::debug!(slide_count, warnings = warnings.len(), "Compiled document");

        CompileOutput {
            html,
            slide_count,
            warnings,
        }
    }

    /// Render sibling nodes in order, joined by newlines.
    pub fn render_nodes(&self, nodes: &[Node], tables: &SideTables, ctx: &mut RenderContext) -> String {
        nodes
            .iter()
            .map(|node| self.render_node(node, tables, ctx))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Render one node and its subtree.
    pub fn render_node(&self, node: &Node, tables: &SideTables, ctx: &mut RenderContext) -> String {
        let spec = self.registry.lookup(node.directive());
        if let Some(spec) = spec
            && spec.requires_children()
            && node.children().is_empty()
        {
            tracing::debug!(
                directive = node.directive(),
                line = node.line(),
                "Directive has no nested directives"
            );
        }

        let ordinal = spec.and_then(|spec| spec.handler().enter(node, ctx));
        let slide = ctx.current_slide();

        let children: Vec<String> = node
            .children()
            .iter()
            .map(|child| self.render_node(child, tables, ctx))
            .collect();
        let content = self.substitute(node, &children, tables, ctx);

        if let Some(spec) = spec {
            return spec
                .handler()
                .render(&RenderedNode::new(node, content, ordinal, slide), ctx);
        }

        ctx.warn(format!(
            "Line {}: unknown directive '.{}'",
            node.line(),
            node.directive()
        ));
        format!(
            "<div class=\"directive-{}\">{content}</div>",
            escape_html(node.directive())
        )
    }

    /// Replace every placeholder in the node's content with its HTML.
    fn substitute(
        &self,
        node: &Node,
        children: &[String],
        tables: &SideTables,
        ctx: &mut RenderContext,
    ) -> String {
        let mut html = String::new();
        for segment in node.content().segments() {
            match segment {
                Segment::Text(text) => html.push_str(text),
                Segment::LineBreak => html.push_str("<br>"),
                Segment::Child(index) => match children.get(*index) {
                    Some(child) => html.push_str(child),
                    None => ctx.warn(format!(
                        "Line {}: '.{}' references missing child {index}",
                        node.line(),
                        node.directive()
                    )),
                },
                Segment::Escape(id) => match tables.escape(*id) {
                    Some(literal) => html.push_str(&escape_html(literal)),
                    None => ctx.warn(format!("Line {}: missing escaped text {id}", node.line())),
                },
                Segment::RawBlock(id) => match tables.raw_block(*id) {
                    Some(raw) => html.push_str(&self.highlight(raw, node.line(), ctx)),
                    None => ctx.warn(format!("Line {}: missing code block {id}", node.line())),
                },
            }
        }
        html
    }

    fn highlight(&self, raw: &str, line: usize, ctx: &mut RenderContext) -> String {
        let block = CodeBlock::split(raw);
        match self.highlighter.highlight(block.language, block.code) {
            Ok(html) => html,
            Err(err) => {
                ctx.warn(format!("Line {line}: {err}"));
                format!(
                    "<!-- {} -->\n<pre><code>{}</code></pre>",
                    escape_html(&err.to_string()),
                    escape_html(block.code)
                )
            }
        }
    }
}
