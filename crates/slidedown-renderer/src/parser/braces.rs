//! Brace matching.

/// An opening brace with no matching close before the end of the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unbalanced brace opened on line {line} at byte {open_pos}")]
pub struct UnbalancedBrace {
    /// Byte offset of the unmatched `{`.
    pub open_pos: usize,
    /// 1-based line of the unmatched `{`.
    pub line: usize,
}

/// Find the `}` that closes the `{` at `open_pos`.
///
/// Counts every `{` and `}` after `open_pos`, including ones inside
/// placeholder-free literal text. Escaped braces must be removed by the
/// protection pass before calling this.
///
/// # Example
///
/// ```
/// use slidedown_renderer::find_matching_close;
///
/// let text = ".slide{.bf{x}}";
/// assert_eq!(find_matching_close(text, 6), Ok(13));
/// assert_eq!(find_matching_close(text, 10), Ok(12));
/// ```
pub fn find_matching_close(text: &str, open_pos: usize) -> Result<usize, UnbalancedBrace> {
    let bytes = text.as_bytes();
    debug_assert_eq!(bytes.get(open_pos), Some(&b'{'));

    let mut depth = 1usize;
    for (offset, byte) in bytes.iter().enumerate().skip(open_pos + 1) {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(offset);
                }
            }
            _ => {}
        }
    }

    Err(UnbalancedBrace {
        open_pos,
        line: 1 + bytes[..open_pos.min(bytes.len())]
            .iter()
            .filter(|b| **b == b'\n')
            .count(),
    })
}
