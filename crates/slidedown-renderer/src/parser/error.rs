//! Parse errors with source location and context.

use std::fmt;

use super::protect::SideTables;

/// Characters of context shown on each side of the failure point.
const CONTEXT_RADIUS: usize = 40;

/// Width of the `Context: ...` prefix the caret line is aligned under.
const CONTEXT_PREFIX: usize = "Context: ...".len();

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ParseErrorKind {
    /// A registered directive name is not followed by `{` and no `{`
    /// appears anywhere after it.
    MissingBrace { directive: String },
    /// A `{` has no matching `}`.
    UnbalancedBrace {
        directive: Option<String>,
        /// Character offset of the unmatched `{`.
        open_position: usize,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingBrace { directive } => {
                write!(f, "Missing opening brace for directive '.{directive}'")
            }
            Self::UnbalancedBrace {
                directive: Some(directive),
                ..
            } => write!(f, "Unbalanced braces in directive '.{directive}'"),
            Self::UnbalancedBrace { directive: None, .. } => f.write_str("Unbalanced braces"),
        }
    }
}

/// Fatal parse failure.
///
/// Renders as:
///
/// ```text
/// Unbalanced braces in directive '.slide'
/// Line 3, position 17
/// Context: ...some text .slide{ more text...
///                              ^
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[error(
    "{kind}\nLine {line}, position {position}\nContext: ...{context}...\n{}^",
    caret_pad(.column)
)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    /// 1-based line number in the source deck.
    pub line: usize,
    /// Character offset of the failure in the protected text.
    ///
    /// Each escaped directive or syntax-marked code body before the failure
    /// counts as its placeholder, not as the characters the author wrote,
    /// so the offset can differ from the source. Use `line` to locate it.
    pub position: usize,
    /// Up to 40 characters either side of the failure, on one line. Protected
    /// spans show as their placeholder name, e.g. `ESCAPE_0`.
    pub context: String,
    /// Column of the failure within `context`.
    pub column: usize,
}

#[allow(clippy::trivially_copy_pass_by_ref)] // thiserror passes fields by reference
fn caret_pad(column: &usize) -> String {
    " ".repeat(CONTEXT_PREFIX + column)
}

impl ParseError {
    /// Build an error for a failure at `offset` (a byte offset into `text`).
    ///
    /// Newlines hidden inside placeholders are added back so the line
    /// number matches the author's source.
    pub(crate) fn at(kind: ParseErrorKind, text: &str, offset: usize, tables: &SideTables) -> Self {
        let offset = offset.min(text.len());
        let prefix = &text[..offset];
        let line = 1 + prefix.matches('\n').count() + tables.hidden_newlines(prefix);
        let position = prefix.chars().count();

        let start = position.saturating_sub(CONTEXT_RADIUS);
        let mut context = String::new();
        let mut column = 0;
        for (index, ch) in text
            .chars()
            .enumerate()
            .skip(start)
            .take(position + CONTEXT_RADIUS - start)
        {
            if ch == '\0' {
                continue;
            }
            if index < position {
                column += 1;
            }
            context.push(if ch.is_whitespace() { ' ' } else { ch });
        }

        Self {
            kind,
            line,
            position,
            context,
            column,
        }
    }

    pub(crate) fn missing_brace(directive: &str, text: &str, offset: usize, tables: &SideTables) -> Self {
        Self::at(
            ParseErrorKind::MissingBrace {
                directive: directive.to_owned(),
            },
            text,
            offset,
            tables,
        )
    }

    pub(crate) fn unbalanced(
        directive: Option<&str>,
        text: &str,
        open_pos: usize,
        tables: &SideTables,
    ) -> Self {
        let open_position = text[..open_pos.min(text.len())].chars().count();
        Self::at(
            ParseErrorKind::UnbalancedBrace {
                directive: directive.map(str::to_owned),
                open_position,
            },
            text,
            open_pos,
            tables,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location() {
        let text = "line one\nline two .slide{";
        let err = ParseError::unbalanced(Some("slide"), text, text.len() - 1, &SideTables::default());

        assert_eq!(err.line, 2);
        assert_eq!(err.position, text.chars().count() - 1);
        assert_eq!(
            err.kind,
            ParseErrorKind::UnbalancedBrace {
                directive: Some("slide".to_owned()),
                open_position: text.chars().count() - 1,
            }
        );
    }

    #[test]
    fn test_context_is_bounded() {
        let text = format!("{}.slide{{{}", "a".repeat(100), "b".repeat(100));
        let err = ParseError::unbalanced(Some("slide"), &text, 106, &SideTables::default());

        assert_eq!(err.context.chars().count(), 80);
        assert_eq!(err.column, 40);
        assert_eq!(err.context.chars().nth(err.column), Some('{'));
    }

    #[test]
    fn test_caret_aligned_under_failure() {
        let text = "ab\n.cd{";
        let err = ParseError::unbalanced(Some("cd"), text, 6, &SideTables::default());
        let rendered = err.to_string();
        let lines: Vec<&str> = rendered.lines().collect();

        assert_eq!(lines[0], "Unbalanced braces in directive '.cd'");
        assert_eq!(lines[1], "Line 2, position 6");
        assert_eq!(lines[2], "Context: ...ab .cd{...");
        let caret = lines[3].find('^').unwrap();
        assert_eq!(&lines[2][caret..=caret], "{");
    }

    #[test]
    fn test_offsets_follow_protected_text() {
        let err = crate::Parser::new()
            .parse("\\.bf{a\nb} .slide{open")
            .unwrap_err();

        assert_eq!(err.line, 2);
        assert_eq!(err.position, "\0ESCAPE_0\0 .slide".chars().count());
        assert!(err.context.starts_with("ESCAPE_0 .slide{"));
    }

    #[test]
    fn test_missing_brace_message() {
        let err = ParseError::missing_brace("slide", ".slide", 0, &SideTables::default());
        assert!(err.to_string().starts_with("Missing opening brace for directive '.slide'"));
        assert_eq!(err.line, 1);
        assert_eq!(err.position, 0);
    }
}
