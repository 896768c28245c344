//! Parser and HTML compiler for the slidedown directive markup.
//!
//! Slides are written as nested directives, `.name{content}`:
//!
//! ```text
//! .slide{
//!     .title{Welcome}
//!     .body{
//!         .o{.bf{Fast} parsing}
//!         .o{Escapes like \.bf\{this\} stay literal}
//!         .code{.syntax{python}
//!         print({'braces': 'are fine here'})
//!         }
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`Parser`] runs a protection pass that hides escaped directives, line
//!   breaks and syntax-marked code blocks behind placeholders, then builds a
//!   tree of [`Node`]s.
//! - [`DirectiveRegistry`] decides which names are directives and maps each
//!   to a [`DirectiveHandler`].
//! - [`Compiler`] renders the tree bottom-up through the handlers, numbering
//!   slides, snippets and typewriters in document order.
//! - [`HtmlDocument`] wraps the result in the presentation page.
//!
//! # Example
//!
//! ```
//! use slidedown_renderer::{Compiler, HtmlDocument, Parser};
//!
//! let document = Parser::new()
//!     .parse(".slide{.title{Hello} .body{.bf{World}}}")
//!     .unwrap();
//! let output = Compiler::new().compile(&document);
//!
//! assert_eq!(output.slide_count, 1);
//! assert!(output.html.contains("<strong>World</strong>"));
//!
//! let page = HtmlDocument::new(&output.html, output.slide_count).render();
//! assert!(page.contains(r#"<div class="formLayout">"#));
//! ```

mod compiler;
pub mod directive;
mod document;
mod highlight;
mod node;
mod parser;
mod util;

pub use compiler::{CompileOutput, Compiler};
pub use directive::{
    DirectiveCategory, DirectiveHandler, DirectivePattern, DirectiveRegistry, DirectiveSpec,
    RenderContext, RenderedNode,
};
pub use document::{HtmlDocument, HtmlTemplates, RUNTIME_SCRIPT, SLIDE_ID_PREFIX};
pub use highlight::{CodeBlock, HighlightError, Highlighter, PlainHighlighter};
pub use node::{Content, Modifiers, Node, Segment};
pub use parser::{
    Document, MODIFIER_NAMES, ParseError, ParseErrorKind, Parser, ParserOptions, Processed,
    SideTables, UnbalancedBrace, find_matching_close, is_modifier,
};
pub use util::escape_html;
