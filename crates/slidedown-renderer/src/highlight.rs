//! Code block highlighting.
//!
//! Raw blocks keep their `.syntax{...}` marker. [`CodeBlock::split`] pulls the
//! language out of it and a [`Highlighter`] turns the code into HTML.

use std::sync::LazyLock;

use regex::Regex;

use crate::parser::find_matching_close;
use crate::util::escape_html;

static SYNTAX_OPENER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\.syntax\{").unwrap());

static LANGUAGE_SETTING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(?:language|lang)\s*=\s*([^\s;,]+)").unwrap());

static LANGUAGE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_+#.-]+$").unwrap());

/// Failure to highlight a code block.
#[derive(Debug, thiserror::Error)]
pub enum HighlightError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Highlighting failed: {0}")]
    Failed(String),
}

/// Turns source code into HTML.
pub trait Highlighter: Send + Sync {
    fn highlight(&self, language: Option<&str>, code: &str) -> Result<String, HighlightError>;
}

/// Highlighter that escapes the code and tags it with its language class.
///
/// # Example
///
/// ```
/// use slidedown_renderer::{Highlighter, PlainHighlighter};
///
/// let html = PlainHighlighter.highlight(Some("rust"), "a < b").unwrap();
/// assert_eq!(html, r#"<pre><code class="language-rust">a &lt; b</code></pre>"#);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainHighlighter;

impl Highlighter for PlainHighlighter {
    fn highlight(&self, language: Option<&str>, code: &str) -> Result<String, HighlightError> {
        let code = escape_html(code);
        match language {
            None => Ok(format!("<pre><code>{code}</code></pre>")),
            Some(language) if LANGUAGE_NAME.is_match(language) => Ok(format!(
                r#"<pre><code class="language-{language}">{code}</code></pre>"#
            )),
            Some(language) => Err(HighlightError::UnsupportedLanguage(language.to_owned())),
        }
    }
}

/// A raw block split into its language and code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub language: Option<&'a str>,
    pub code: &'a str,
}

impl<'a> CodeBlock<'a> {
    /// Split a raw block body that starts with `.syntax{...}`.
    ///
    /// The marker accepts a bare language (`.syntax{python}`) or settings
    /// (`.syntax{language=python}`). The rest of the marker's line is
    /// dropped when it is blank, as is trailing whitespace.
    ///
    /// # Example
    ///
    /// ```
    /// use slidedown_renderer::CodeBlock;
    ///
    /// let block = CodeBlock::split(".syntax{language=rust}\nfn main() {}\n");
    /// assert_eq!(block.language, Some("rust"));
    /// assert_eq!(block.code, "fn main() {}");
    /// ```
    #[must_use]
    pub fn split(raw: &'a str) -> Self {
        let Some(marker) = SYNTAX_OPENER.find(raw) else {
            return Self {
                language: None,
                code: raw.trim_end(),
            };
        };
        let open = marker.end() - 1;
        let Ok(close) = find_matching_close(raw, open) else {
            return Self {
                language: None,
                code: raw.trim_end(),
            };
        };

        let setting = raw[open + 1..close].trim();
        let language = if setting.contains('=') {
            LANGUAGE_SETTING
                .captures(setting)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        } else {
            Some(setting)
        }
        .filter(|language| !language.is_empty());

        let rest = &raw[close + 1..];
        let rest = match rest.find('\n') {
            Some(newline) if rest[..newline].trim().is_empty() => &rest[newline + 1..],
            _ => rest.trim_start_matches([' ', '\t']),
        };

        Self {
            language,
            code: rest.trim_end(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_bare_language() {
        let block = CodeBlock::split(".syntax{python}\ndef f():\n    return 1\n");

        assert_eq!(block.language, Some("python"));
        assert_eq!(block.code, "def f():\n    return 1");
    }

    #[test]
    fn test_split_keeps_leading_indentation() {
        let block = CodeBlock::split("\n  .syntax{c}  \n    int x;\n");

        assert_eq!(block.language, Some("c"));
        assert_eq!(block.code, "    int x;");
    }

    #[test]
    fn test_split_same_line_code() {
        let block = CodeBlock::split(".syntax{sh} ls -la");

        assert_eq!(block.code, "ls -la");
    }

    #[test]
    fn test_split_empty_language() {
        let block = CodeBlock::split(".syntax{}\nx");

        assert_eq!(block.language, None);
        assert_eq!(block.code, "x");
    }

    #[test]
    fn test_split_settings_without_language() {
        let block = CodeBlock::split(".syntax{theme=dark}\nx");
        assert_eq!(block.language, None);
    }

    #[test]
    fn test_split_nested_braces_in_marker() {
        let block = CodeBlock::split(".syntax{lang=js}\nconst o = {a: 1};");

        assert_eq!(block.language, Some("js"));
        assert_eq!(block.code, "const o = {a: 1};");
    }

    #[test]
    fn test_plain_highlighter_escapes() {
        let html = PlainHighlighter.highlight(None, "<b>&</b>").unwrap();
        assert_eq!(html, "<pre><code>&lt;b&gt;&amp;&lt;/b&gt;</code></pre>");
    }

    #[test]
    fn test_plain_highlighter_rejects_odd_language() {
        let err = PlainHighlighter
            .highlight(Some("x\"><script>"), "code")
            .unwrap_err();
        assert!(matches!(err, HighlightError::UnsupportedLanguage(_)));
    }
}
