//! Protection pass.
//!
//! Runs before structural parsing and rewrites the source so the parser never
//! sees text it must not interpret:
//!
//! 1. Escaped directives (`\.name{...}` or `\.name\{...\}`) are replaced by
//!    `ESCAPE` placeholders holding the de-escaped literal text.
//! 2. Literal `\\` becomes a line-break placeholder.
//! 3. Code blocks whose body starts with `.syntax{...}` have their body
//!    replaced by a `CODE` placeholder. Other code blocks stay as they are.
//!
//! Placeholders are sentinel tokens wrapped in NUL characters. NULs in the
//! author's source are replaced with U+FFFD first, so no source text can
//! collide with a placeholder.

use std::fmt::{self, Write};
use std::sync::LazyLock;

use regex::Regex;

use super::braces::find_matching_close;
use super::error::ParseError;
use crate::node::{Content, Segment};

static ESCAPED_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\\\.(\w+(?:-\w+)*)\\?\{").unwrap());

static CODE_OPENER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.code\{").unwrap());

static SYNTAX_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\.syntax\{").unwrap());

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\x00(?:(CHILD|ESCAPE|CODE)_(\d+)|BR)\x00").unwrap());

/// Sentinel token spliced into text in place of protected content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Child(usize),
    Escape(usize),
    RawBlock(usize),
    LineBreak,
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Child(id) => write!(f, "\0CHILD_{id}\0"),
            Self::Escape(id) => write!(f, "\0ESCAPE_{id}\0"),
            Self::RawBlock(id) => write!(f, "\0CODE_{id}\0"),
            Self::LineBreak => f.write_str("\0BR\0"),
        }
    }
}

/// Protected text pulled out of the source, keyed by placeholder id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SideTables {
    raw_blocks: Vec<String>,
    escapes: Vec<String>,
    /// Escaped directives as the author wrote them, parallel to `escapes`.
    #[cfg_attr(feature = "serde", serde(skip))]
    escape_sources: Vec<String>,
}

impl SideTables {
    /// Body of raw block `id`, starting at its `.syntax{...}` marker.
    #[must_use]
    pub fn raw_block(&self, id: usize) -> Option<&str> {
        self.raw_blocks.get(id).map(String::as_str)
    }

    /// De-escaped literal text of escape `id`.
    #[must_use]
    pub fn escape(&self, id: usize) -> Option<&str> {
        self.escapes.get(id).map(String::as_str)
    }

    #[must_use]
    pub fn raw_blocks(&self) -> &[String] {
        &self.raw_blocks
    }

    #[must_use]
    pub fn escapes(&self) -> &[String] {
        &self.escapes
    }

    fn push_raw_block(&mut self, body: &str) -> usize {
        self.raw_blocks.push(body.to_owned());
        self.raw_blocks.len() - 1
    }

    fn push_escape(&mut self, literal: String, source: &str) -> usize {
        self.escapes.push(literal);
        self.escape_sources.push(source.to_owned());
        self.escapes.len() - 1
    }

    /// Newlines the author wrote inside placeholders occurring in `text`.
    pub(crate) fn hidden_newlines(&self, text: &str) -> usize {
        PLACEHOLDER
            .captures_iter(text)
            .filter_map(|caps| {
                let id = caps.get(2)?.as_str().parse::<usize>().ok()?;
                match caps.get(1)?.as_str() {
                    "ESCAPE" => self.escape(id),
                    "CODE" => self.raw_block(id),
                    _ => None,
                }
            })
            .map(|stored| stored.matches('\n').count())
            .sum()
    }
}

/// How [`restore`] spells an escaped directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EscapeForm {
    /// Backslashes kept, as written in the source (`\.bf{x}`).
    Source,
    /// De-escaped literal (`.bf{x}`).
    Literal,
}

/// Turn protection placeholders in `text` back into plain text.
///
/// Line breaks become `\\` again and code placeholders their stored body.
/// Child placeholders are left alone.
pub(crate) fn restore(text: &str, tables: &SideTables, form: EscapeForm) -> String {
    PLACEHOLDER
        .replace_all(text, |caps: &regex::Captures<'_>| {
            let id = caps.get(2).and_then(|m| m.as_str().parse::<usize>().ok());
            let stored = match (caps.get(1).map(|m| m.as_str()), id) {
                (None, _) => Some("\\\\"),
                (Some("ESCAPE"), Some(id)) => match form {
                    EscapeForm::Source => tables.escape_sources.get(id).map(String::as_str),
                    EscapeForm::Literal => tables.escape(id),
                },
                (Some("CODE"), Some(id)) => tables.raw_block(id),
                _ => None,
            };
            stored.unwrap_or(&caps[0]).to_owned()
        })
        .into_owned()
}

/// Replace NUL characters so source text can never forge a placeholder.
pub(crate) fn sanitize(source: &str) -> String {
    source.replace('\0', "\u{FFFD}")
}

/// Replace escaped directives with `ESCAPE` placeholders.
///
/// A `\.` that does not start a well-formed escaped directive is kept as
/// literal text.
pub(crate) fn protect_escapes(source: &str, tables: &mut SideTables) -> String {
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;

    while let Some(found) = source[pos..].find("\\.") {
        let start = pos + found;
        out.push_str(&source[pos..start]);
        if let Some((len, literal)) = match_escaped(&source[start..]) {
            let id = tables.push_escape(literal, &source[start..start + len]);
            let _ = write!(out, "{}", Placeholder::Escape(id));
            pos = start + len;
        } else {
            out.push('\\');
            pos = start + 1;
        }
    }

    out.push_str(&source[pos..]);
    out
}

/// Match one escaped directive at the start of `text`.
///
/// Returns the matched length and the literal text with escapes removed.
/// Both escaped and unescaped braces count towards nesting.
fn match_escaped(text: &str) -> Option<(usize, String)> {
    let caps = ESCAPED_OPENER.captures(text)?;
    let name = &caps[1];
    let bytes = text.as_bytes();

    let mut interior = String::new();
    let mut depth = 1usize;
    let mut i = caps.get(0)?.end();
    let mut run_start = i;

    let literal = |interior: &str| format!(".{name}{{{interior}}}");

    while i < bytes.len() {
        match bytes[i] {
            b'\\' if matches!(bytes.get(i + 1), Some(b'{' | b'}' | b'.')) => {
                interior.push_str(&text[run_start..i]);
                let escaped = bytes[i + 1];
                match escaped {
                    b'{' => depth += 1,
                    b'}' => depth -= 1,
                    _ => {}
                }
                if depth == 0 {
                    return Some((i + 2, literal(&interior)));
                }
                interior.push(char::from(escaped));
                i += 2;
                run_start = i;
            }
            b'{' => {
                depth += 1;
                i += 1;
            }
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    interior.push_str(&text[run_start..i]);
                    return Some((i + 1, literal(&interior)));
                }
                i += 1;
            }
            _ => i += 1,
        }
    }

    None
}

/// Replace literal `\\` with line-break placeholders.
pub(crate) fn convert_line_breaks(text: &str) -> String {
    text.replace("\\\\", &Placeholder::LineBreak.to_string())
}

/// Replace the bodies of syntax-marked code blocks with `CODE` placeholders.
pub(crate) fn protect_raw_blocks(text: &str, tables: &mut SideTables) -> Result<String, ParseError> {
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;

    while let Some(found) = CODE_OPENER.find_at(text, pos) {
        let open = found.end() - 1;
        let close = find_matching_close(text, open)
            .map_err(|err| ParseError::unbalanced(Some("code"), text, err.open_pos, tables))?;
        let body = &text[open + 1..close];

        out.push_str(&text[pos..=open]);
        if SYNTAX_MARKER.is_match(body) {
            let raw = restore(body, tables, EscapeForm::Source);
            let id = tables.push_raw_block(&raw);
            let _ = write!(out, "{}", Placeholder::RawBlock(id));
        } else {
            out.push_str(body);
        }
        out.push('}');
        pos = close + 1;
    }

    out.push_str(&text[pos..]);
    Ok(out)
}

/// Split literal text on placeholder tokens and append the pieces.
pub(crate) fn push_literal(content: &mut Content, text: &str) {
    let mut last = 0;
    for caps in PLACEHOLDER.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        let id = caps.get(2).and_then(|m| m.as_str().parse::<usize>().ok());
        let segment = match (caps.get(1).map(|m| m.as_str()), id) {
            (None, _) => Segment::LineBreak,
            (Some("CHILD"), Some(id)) => Segment::Child(id),
            (Some("ESCAPE"), Some(id)) => Segment::Escape(id),
            (Some("CODE"), Some(id)) => Segment::RawBlock(id),
            _ => continue,
        };
        content.push_text(&text[last..whole.start()]);
        content.push(segment);
        last = whole.end();
    }
    content.push_text(&text[last..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn escapes(source: &str) -> (String, SideTables) {
        let mut tables = SideTables::default();
        let out = protect_escapes(source, &mut tables);
        (out, tables)
    }

    #[test]
    fn test_escape_with_plain_braces() {
        let (out, tables) = escapes(r"Use \.slide{content} here");

        assert_eq!(out, "Use \0ESCAPE_0\0 here");
        assert_eq!(tables.escape(0), Some(".slide{content}"));
    }

    #[test]
    fn test_escape_with_escaped_braces() {
        let (out, tables) = escapes(r"\.bf\{bold\}");

        assert_eq!(out, "\0ESCAPE_0\0");
        assert_eq!(tables.escape(0), Some(".bf{bold}"));
    }

    #[test]
    fn test_escape_nested_braces() {
        let (_, tables) = escapes(r"\.slide{.bf{x} \.em\{y\}}");

        assert_eq!(tables.escape(0), Some(".slide{.bf{x} .em{y}}"));
    }

    #[test]
    fn test_escape_without_directive_is_literal() {
        let (out, tables) = escapes(r"path\.txt and \.slide without brace");

        assert_eq!(out, r"path\.txt and \.slide without brace");
        assert!(tables.escapes().is_empty());
    }

    #[test]
    fn test_unterminated_escape_is_literal() {
        let (out, tables) = escapes(r"\.slide{never closed");

        assert_eq!(out, r"\.slide{never closed");
        assert!(tables.escapes().is_empty());
    }

    #[test]
    fn test_line_breaks() {
        assert_eq!(convert_line_breaks(r"a \\ b"), "a \0BR\0 b");
        assert_eq!(convert_line_breaks(r"a \ b"), r"a \ b");
    }

    #[test]
    fn test_raw_block_protected() {
        let mut tables = SideTables::default();
        let out = protect_raw_blocks(".code{.syntax{rust}\nfn f() { .bf{x} }\n}", &mut tables).unwrap();

        assert_eq!(out, ".code{\0CODE_0\0}");
        assert_eq!(tables.raw_block(0), Some(".syntax{rust}\nfn f() { .bf{x} }\n"));
    }

    #[test]
    fn test_inline_code_left_alone() {
        let mut tables = SideTables::default();
        let out = protect_raw_blocks("x .code{let a = 1;} y", &mut tables).unwrap();

        assert_eq!(out, "x .code{let a = 1;} y");
        assert!(tables.raw_blocks().is_empty());
    }

    #[test]
    fn test_raw_block_restores_line_breaks() {
        let mut tables = SideTables::default();
        let text = convert_line_breaks(r".code{.syntax{tex} a \\ b}");
        protect_raw_blocks(&text, &mut tables).unwrap();

        assert_eq!(tables.raw_block(0), Some(r".syntax{tex} a \\ b"));
    }

    #[test]
    fn test_raw_block_restores_escapes_as_written() {
        let (escaped, mut tables) = escapes(".code{.syntax{text}\nwrite \\.bf{x} for bold\n}");
        let out = protect_raw_blocks(&escaped, &mut tables).unwrap();

        assert_eq!(out, ".code{\0CODE_0\0}");
        assert_eq!(
            tables.raw_block(0),
            Some(".syntax{text}\nwrite \\.bf{x} for bold\n")
        );
        assert!(!tables.raw_block(0).unwrap().contains('\0'));
    }

    #[test]
    fn test_restore_forms() {
        let (escaped, tables) = escapes(r"a \.bf\{x\} b");
        let text = convert_line_breaks(&format!("{escaped} \\\\ c"));

        assert_eq!(restore(&text, &tables, EscapeForm::Source), r"a \.bf\{x\} b \\ c");
        assert_eq!(restore(&text, &tables, EscapeForm::Literal), r"a .bf{x} b \\ c");
    }

    #[test]
    fn test_unbalanced_code_block_is_fatal() {
        let mut tables = SideTables::default();
        let err = protect_raw_blocks("intro\n.code{.syntax{rust} fn f() {", &mut tables).unwrap_err();

        assert_eq!(err.line, 2);
        assert!(err.to_string().contains("'.code'"));
    }

    #[test]
    fn test_push_literal_splits_placeholders() {
        let mut content = Content::new();
        push_literal(&mut content, "a\0BR\0b\0ESCAPE_2\0\0CODE_1\0c");

        assert_eq!(
            content.segments(),
            &[
                Segment::text("a"),
                Segment::LineBreak,
                Segment::text("b"),
                Segment::Escape(2),
                Segment::RawBlock(1),
                Segment::text("c"),
            ]
        );
    }

    #[test]
    fn test_hidden_newlines() {
        let (out, tables) = escapes("\\.slide{a\nb\nc}");
        assert_eq!(tables.hidden_newlines(&out), 2);
    }

    #[test]
    fn test_sanitize_replaces_nul() {
        assert_eq!(sanitize("a\0b"), "a\u{FFFD}b");
    }
}
