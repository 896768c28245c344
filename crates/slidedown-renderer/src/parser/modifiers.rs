//! Modifier values: `.style{...}`, `.class{...}` and `.syntax{...}`.

use std::sync::LazyLock;

use regex::Regex;

use crate::node::Modifiers;

/// Reserved directive names recognized as modifiers at the start of a body.
pub const MODIFIER_NAMES: [&str; 3] = ["style", "class", "syntax"];

pub(crate) static MODIFIER_OPENER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\.(style|class|syntax)\{").unwrap());

static ALIGN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\balign\s*=\s*(\w+)\s*;?\s*").unwrap());

static WIDTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bwidth\s*=\s*([\w%]+)\s*;?\s*").unwrap());

/// Whether `name` is a reserved modifier name.
pub fn is_modifier(name: &str) -> bool {
    MODIFIER_NAMES.contains(&name)
}

/// Record one modifier, splitting `align=` and `width=` out of styles.
///
/// Style values are trimmed and lose a trailing `;`. An empty style is not
/// recorded.
pub(crate) fn apply(modifiers: &mut Modifiers, name: &str, value: &str) {
    if name != "style" {
        modifiers.insert(name.to_owned(), value.to_owned());
        return;
    }

    let mut style = value.to_owned();
    for (key, pattern) in [("align", &*ALIGN), ("width", &*WIDTH)] {
        if let Some(caps) = pattern.captures(&style) {
            modifiers.insert(key.to_owned(), caps[1].to_owned());
            style = pattern.replace_all(&style, "").into_owned();
        }
    }

    let cleaned = style.trim().trim_end_matches(';').trim();
    if !cleaned.is_empty() {
        modifiers.insert("style".to_owned(), cleaned.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn styled(value: &str) -> Modifiers {
        let mut modifiers = Modifiers::new();
        apply(&mut modifiers, "style", value);
        modifiers
    }

    #[test]
    fn test_plain_style_kept() {
        let modifiers = styled("background: black; color: lightgreen; font-size: 2em;");

        assert_eq!(
            modifiers.get("style").map(String::as_str),
            Some("background: black; color: lightgreen; font-size: 2em")
        );
        assert_eq!(modifiers.len(), 1);
    }

    #[test]
    fn test_align_and_width_extracted() {
        let modifiers = styled("align=center; width=50%; color: red");

        assert_eq!(modifiers.get("align").map(String::as_str), Some("center"));
        assert_eq!(modifiers.get("width").map(String::as_str), Some("50%"));
        assert_eq!(modifiers.get("style").map(String::as_str), Some("color: red"));
    }

    #[test]
    fn test_style_dropped_when_only_layout() {
        let modifiers = styled("align = right;");

        assert_eq!(modifiers.get("align").map(String::as_str), Some("right"));
        assert!(!modifiers.contains_key("style"));
    }

    #[test]
    fn test_empty_style_not_recorded() {
        assert!(styled("").is_empty());
        assert!(styled("  ; ").is_empty());
    }

    #[test]
    fn test_style_trimmed() {
        let modifiers = styled(" color: red; ");
        assert_eq!(modifiers.get("style").map(String::as_str), Some("color: red"));
    }

    #[test]
    fn test_other_modifiers_verbatim() {
        let mut modifiers = Modifiers::new();
        apply(&mut modifiers, "class", " big  red ");
        apply(&mut modifiers, "syntax", "rust");

        assert_eq!(modifiers.get("class").map(String::as_str), Some(" big  red "));
        assert_eq!(modifiers.get("syntax").map(String::as_str), Some("rust"));
    }

    #[test]
    fn test_is_modifier() {
        assert!(is_modifier("style"));
        assert!(is_modifier("syntax"));
        assert!(!is_modifier("slide"));
    }
}
