//! Document tree produced by the parser.
//!
//! A [`Node`] owns its children exclusively. Its [`Content`] is a sequence of
//! [`Segment`]s: literal text interleaved with references to children,
//! protected raw blocks, escaped literals and line breaks. Child references
//! are indexed so that `Segment::Child(i)` always points at `children[i]`.

use std::collections::BTreeMap;
use std::fmt;

use crate::parser::Placeholder;

/// Modifier values extracted from the start of a directive body.
///
/// Keys are unique (`style`, `class`, `syntax`, plus `align` and `width`
/// pulled out of `style`).
pub type Modifiers = BTreeMap<String, String>;

/// One piece of a node's content.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(
    feature = "serde",
    serde(tag = "kind", content = "value", rename_all = "snake_case")
)]
pub enum Segment {
    /// Literal text and raw passthrough markup.
    Text(String),
    /// Position where the rendered output of `children[i]` is substituted.
    Child(usize),
    /// Protected raw block, keyed into [`SideTables`](crate::SideTables).
    RawBlock(usize),
    /// Escaped literal directive text, keyed into [`SideTables`](crate::SideTables).
    Escape(usize),
    /// Line break produced from a literal double backslash.
    LineBreak,
}

impl Segment {
    /// Create a text segment.
    #[must_use]
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }
}

/// Content of a node: literal text with placeholders for everything the
/// parser pulled out of it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Content {
    segments: Vec<Segment>,
}

impl Content {
    /// Create empty content.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build content from segments, merging adjacent text.
    #[must_use]
    pub fn from_segments(segments: impl IntoIterator<Item = Segment>) -> Self {
        let mut content = Self::new();
        for segment in segments {
            content.push(segment);
        }
        content
    }

    /// Append a segment. Empty text is dropped and adjacent text is merged.
    pub fn push(&mut self, segment: Segment) {
        match segment {
            Segment::Text(text) => self.push_text(&text),
            other => self.segments.push(other),
        }
    }

    /// Append literal text.
    pub fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(Segment::Text(last)) = self.segments.last_mut() {
            last.push_str(text);
        } else {
            self.segments.push(Segment::Text(text.to_owned()));
        }
    }

    /// The segments in document order.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether there are no segments at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Whether the content is empty once surrounding whitespace is stripped.
    ///
    /// Any placeholder counts as non-blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.segments.iter().all(|segment| match segment {
            Segment::Text(text) => text.trim().is_empty(),
            _ => false,
        })
    }

    /// Child indices referenced by this content, in document order.
    pub fn child_refs(&self) -> impl Iterator<Item = usize> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Child(index) => Some(*index),
            _ => None,
        })
    }

    /// The raw block id if the content is exactly one protected raw block.
    #[must_use]
    pub fn single_raw_block(&self) -> Option<usize> {
        match self.segments.as_slice() {
            [Segment::RawBlock(id)] => Some(*id),
            _ => None,
        }
    }

    /// Literal text of the content, or `None` if it holds any placeholder.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self.segments.as_slice() {
            [] => Some(""),
            [Segment::Text(text)] => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Content {
    /// Writes the content in its textual form, with the same sentinel
    /// placeholder tokens the protection pass splices into the source.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => f.write_str(text)?,
                Segment::Child(index) => write!(f, "{}", Placeholder::Child(*index))?,
                Segment::RawBlock(id) => write!(f, "{}", Placeholder::RawBlock(*id))?,
                Segment::Escape(id) => write!(f, "{}", Placeholder::Escape(*id))?,
                Segment::LineBreak => write!(f, "{}", Placeholder::LineBreak)?,
            }
        }
        Ok(())
    }
}

/// A parsed directive: `.directive{content}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    directive: String,
    modifiers: Modifiers,
    content: Content,
    children: Vec<Node>,
    line: usize,
}

impl Node {
    /// Create a node.
    ///
    /// Callers building trees by hand must keep `content` referencing each
    /// child index exactly once.
    #[must_use]
    pub fn new(
        directive: impl Into<String>,
        modifiers: Modifiers,
        content: Content,
        children: Vec<Node>,
        line: usize,
    ) -> Self {
        Self {
            directive: directive.into(),
            modifiers,
            content,
            children,
            line,
        }
    }

    /// Directive name, e.g. `slide` or `font-doom`.
    #[must_use]
    pub fn directive(&self) -> &str {
        &self.directive
    }

    /// Extracted modifiers.
    #[must_use]
    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    /// Look up one modifier value.
    #[must_use]
    pub fn modifier(&self, name: &str) -> Option<&str> {
        self.modifiers.get(name).map(String::as_str)
    }

    /// Content with placeholders.
    #[must_use]
    pub fn content(&self) -> &Content {
        &self.content
    }

    /// Children, indexed to match `Segment::Child` references.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// 1-based source line of the directive's opening token.
    #[must_use]
    pub fn line(&self) -> usize {
        self.line
    }

    /// Whether every child is referenced exactly once and nothing else is.
    #[must_use]
    pub fn has_consistent_children(&self) -> bool {
        let mut seen = vec![false; self.children.len()];
        for index in self.content.child_refs() {
            match seen.get_mut(index) {
                Some(slot) if !*slot => *slot = true,
                _ => return false,
            }
        }
        seen.into_iter().all(|s| s)
    }
}
