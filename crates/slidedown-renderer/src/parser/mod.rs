//! Structural parser.
//!
//! Turns protected source text into a tree of [`Node`]s. Parsing runs in two
//! stages:
//!
//! 1. The protection pass (see [`protect`]) hides escaped directives, line
//!    breaks and syntax-marked code blocks behind placeholders.
//! 2. A scanner walks the protected text. At the top level it looks for
//!    `.name{`, matches the closing brace and processes the body: modifiers
//!    first, then nested directives, recursively.
//!
//! Tokens whose name is not registered are literal text, both at the top
//! level and inside bodies. Only the top level raises
//! [`ParseErrorKind::MissingBrace`].
//!
//! # Example
//!
//! ```
//! use slidedown_renderer::Parser;
//!
//! let document = Parser::new()
//!     .parse(".slide{.title{Hello} .body{.bf{World}}}")
//!     .unwrap();
//! let slide = &document.nodes()[0];
//!
//! assert_eq!(slide.directive(), "slide");
//! assert_eq!(slide.children().len(), 2);
//! assert_eq!(slide.children()[1].children()[0].directive(), "bf");
//! ```

mod braces;
mod error;
mod modifiers;
mod protect;

use std::sync::LazyLock;

use regex::Regex;

pub use braces::{UnbalancedBrace, find_matching_close};
pub use error::{ParseError, ParseErrorKind};
pub use modifiers::{MODIFIER_NAMES, is_modifier};
use protect::EscapeForm;
pub(crate) use protect::Placeholder;
pub use protect::SideTables;

use crate::directive::DirectiveRegistry;
use crate::node::{Content, Modifiers, Node, Segment};

static TOP_LEVEL_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\w+(?:-\w+)*)(\{)?").unwrap());

static NESTED_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(\w+(?:-\w+)*)\{").unwrap());

/// Parser settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Only treat registered names as directives. When disabled, any
    /// `.name{` opens a directive.
    pub validate_directives: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            validate_directives: true,
        }
    }
}

/// Parsed document: top-level nodes plus the protected side tables their
/// placeholders point into.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Document {
    nodes: Vec<Node>,
    tables: SideTables,
}

impl Document {
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[must_use]
    pub fn tables(&self) -> &SideTables {
        &self.tables
    }

    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

/// Result of processing one directive body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Processed {
    pub modifiers: Modifiers,
    pub content: Content,
    pub children: Vec<Node>,
}

impl Processed {
    fn into_node(self, directive: &str, line: usize) -> Node {
        Node::new(directive, self.modifiers, self.content, self.children, line)
    }
}

/// Protected text being scanned, with the tables needed to report
/// author-facing line numbers.
struct Source<'a> {
    text: &'a str,
    tables: &'a SideTables,
}

impl Source<'_> {
    fn newlines(&self, start: usize, end: usize) -> usize {
        let slice = &self.text[start..end];
        slice.matches('\n').count() + self.tables.hidden_newlines(slice)
    }

    fn unbalanced(&self, directive: &str, err: UnbalancedBrace) -> ParseError {
        ParseError::unbalanced(Some(directive), self.text, err.open_pos, self.tables)
    }
}

/// Directive markup parser.
pub struct Parser<'r> {
    registry: &'r DirectiveRegistry,
    options: ParserOptions,
}

impl Parser<'static> {
    /// Create a parser over the global built-in registry.
    #[must_use]
    pub fn new() -> Self {
        Self::with_registry(DirectiveRegistry::global())
    }
}

impl Default for Parser<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'r> Parser<'r> {
    /// Create a parser over a custom registry.
    #[must_use]
    pub fn with_registry(registry: &'r DirectiveRegistry) -> Self {
        Self {
            registry,
            options: ParserOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ParserOptions) -> Self {
        self.options = options;
        self
    }

    /// Parse a whole document.
    pub fn parse(&self, source: &str) -> Result<Document, ParseError> {
        let mut tables = SideTables::default();
        let sanitized = protect::sanitize(source);
        let escaped = protect::protect_escapes(&sanitized, &mut tables);
        let broken = protect::convert_line_breaks(&escaped);
        let text = protect::protect_raw_blocks(&broken, &mut tables)?;

        let nodes = self.parse_top_level(&Source {
            text: &text,
            tables: &tables,
        })?;

        tracing::debug!(
            nodes = nodes.len(),
            escapes = tables.escapes().len(),
            raw_blocks = tables.raw_blocks().len(),
            "Parsed document"
        );

        Ok(Document { nodes, tables })
    }

    /// Process the body of one directive: modifiers, then nested directives.
    ///
    /// `line` is the line of the enclosing directive; every child inherits it.
    pub fn process(&self, interior: &str, line: usize) -> Result<Processed, ParseError> {
        let tables = SideTables::default();
        let src = Source {
            text: interior,
            tables: &tables,
        };
        self.process_range(&src, 0, interior.len(), line)
    }

    fn is_directive(&self, name: &str) -> bool {
        !self.options.validate_directives || self.registry.contains(name)
    }

    fn parse_top_level(&self, src: &Source<'_>) -> Result<Vec<Node>, ParseError> {
        let text = src.text;
        let mut nodes = Vec::new();
        let mut line = 1;
        let mut pos = 0;

        loop {
            let skipped = skip_whitespace(text, pos, text.len());
            line += src.newlines(pos, skipped);
            pos = skipped;
            if pos >= text.len() {
                break;
            }

            let Some(caps) = TOP_LEVEL_TOKEN.captures_at(text, pos) else {
                break;
            };
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let name = name.as_str();
            let registered = self.is_directive(name);

            if caps.get(2).is_none() || !registered {
                if registered && !text[token.end()..].contains('{') {
                    return Err(ParseError::missing_brace(
                        name,
                        text,
                        token.start(),
                        src.tables,
                    ));
                }
                line += src.newlines(pos, token.end());
                pos = token.end();
                continue;
            }

            line += src.newlines(pos, token.start());
            let open = token.end() - 1;
            let close = find_matching_close(text, open).map_err(|err| src.unbalanced(name, err))?;

            let node = self.process_range(src, open + 1, close, line)?.into_node(name, line);
            tracing::trace!(directive = name, line, "Parsed top-level directive");
            nodes.push(node);

            line += src.newlines(token.start(), close + 1);
            pos = close + 1;
        }

        Ok(nodes)
    }

    fn process_range(
        &self,
        src: &Source<'_>,
        start: usize,
        end: usize,
        line: usize,
    ) -> Result<Processed, ParseError> {
        let (modifiers, body_start) = Self::extract_modifiers(src, start, end)?;
        let (content, children) = self.extract_nested(src, body_start, end, line)?;
        Ok(Processed {
            modifiers,
            content,
            children,
        })
    }

    /// Consume leading modifiers. Returns where the body proper starts:
    /// `start` itself when there were none, otherwise past the whitespace
    /// following the last one.
    fn extract_modifiers(
        src: &Source<'_>,
        start: usize,
        end: usize,
    ) -> Result<(Modifiers, usize), ParseError> {
        let text = &src.text[..end];
        let mut modifiers = Modifiers::new();
        let mut pos = skip_whitespace(text, start, end);
        let mut found = false;

        while let Some(caps) = modifiers::MODIFIER_OPENER.captures(&text[pos..]) {
            let name = &caps[1];
            let open = pos + caps[0].len() - 1;
            let close = find_matching_close(text, open).map_err(|err| src.unbalanced(name, err))?;
            let value = protect::restore(&text[open + 1..close], src.tables, EscapeForm::Literal);
            modifiers::apply(&mut modifiers, name, &value);
            found = true;
            pos = skip_whitespace(text, close + 1, end);
        }

        Ok((modifiers, if found { pos } else { start }))
    }

    fn extract_nested(
        &self,
        src: &Source<'_>,
        start: usize,
        end: usize,
        line: usize,
    ) -> Result<(Content, Vec<Node>), ParseError> {
        let text = &src.text[..end];
        let mut content = Content::new();
        let mut children = Vec::new();
        let mut pos = start;
        let mut literal_start = start;

        while let Some(caps) = NESTED_TOKEN.captures_at(text, pos) {
            let (Some(token), Some(name)) = (caps.get(0), caps.get(1)) else {
                break;
            };
            let name = name.as_str();
            if !self.is_directive(name) {
                pos = token.end();
                continue;
            }

            let open = token.end() - 1;
            let close = find_matching_close(text, open).map_err(|err| src.unbalanced(name, err))?;

            protect::push_literal(&mut content, &text[literal_start..token.start()]);
            let child = self.process_range(src, open + 1, close, line)?.into_node(name, line);
            children.push(child);
            content.push(Segment::Child(children.len() - 1));

            pos = close + 1;
            literal_start = pos;
        }

        protect::push_literal(&mut content, &text[literal_start..end]);
        Ok((content, children))
    }
}

fn skip_whitespace(text: &str, start: usize, end: usize) -> usize {
    text[start..end]
        .char_indices()
        .find(|(_, ch)| !ch.is_whitespace())
        .map_or(end, |(offset, _)| start + offset)
}
