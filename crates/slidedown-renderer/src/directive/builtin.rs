//! Built-in directive set.

use std::fmt::Write;

use super::context::RenderContext;
use super::handler::{DirectiveHandler, RenderedNode};
use super::registry::{DirectiveCategory, DirectiveRegistry, DirectiveSpec};
use crate::node::Node;
use crate::util::escape_html;

const HEADINGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Register every built-in directive.
pub(crate) fn register(registry: &mut DirectiveRegistry) {
    register_structural(registry);
    register_formatting(registry);
    register_layout(registry);
    register_effects(registry);
    register_transforms(registry);
    register_modifiers(registry);
}

fn register_structural(registry: &mut DirectiveRegistry) {
    registry.register(
        DirectiveSpec::new("slide", DirectiveCategory::Structural, Slide)
            .with_description("Defines a presentation slide")
            .with_examples([".slide{.title{Hello} .body{World}}"])
            .requiring_children(),
    );
    registry.register(
        DirectiveSpec::new("title", DirectiveCategory::Structural, passthrough)
            .with_description("Slide title")
            .with_examples([".title{My Slide Title}"]),
    );
    registry.register(
        DirectiveSpec::new("body", DirectiveCategory::Structural, passthrough)
            .with_description("Slide content area")
            .with_examples([".body{Content goes here}"]),
    );
    registry.register(
        DirectiveSpec::new("comment", DirectiveCategory::Structural, discard)
            .with_description("Author note, not rendered")
            .with_examples([".comment{Remember to update the numbers}"]),
    );
}

fn register_formatting(registry: &mut DirectiveRegistry) {
    for (name, tag, description, example) in [
        ("bf", "strong", "Bold text", ".bf{important}"),
        ("em", "em", "Emphasized text", ".em{stressed}"),
        ("tt", "tt", "Monospace text", ".tt{fixed width}"),
        ("underline", "u", "Underlined text", ".underline{noted}"),
    ] {
        registry.register(
            DirectiveSpec::new(name, DirectiveCategory::Formatting, wrap(tag, None))
                .with_description(description)
                .with_examples([example]),
        );
    }
    for tag in HEADINGS {
        registry.register(
            DirectiveSpec::new(tag, DirectiveCategory::Formatting, wrap(tag, None))
                .with_description(format!("Level {} heading", &tag[1..]))
                .with_examples([format!(".{tag}{{Heading}}")]),
        );
    }
    registry.register(
        DirectiveSpec::new("code", DirectiveCategory::Formatting, code)
            .with_description("Inline code, or a highlighted block when it starts with .syntax{}")
            .with_examples([".code{x = 1}", ".code{.syntax{python}\nprint('hi')\n}"]),
    );
}

fn register_layout(registry: &mut DirectiveRegistry) {
    registry.register(
        DirectiveSpec::new("column", DirectiveCategory::Layout, wrap("div", Some("column")))
            .with_description("Side-by-side column")
            .with_examples([".column{.style{width=50%} Left half}"]),
    );
}

fn register_effects(registry: &mut DirectiveRegistry) {
    registry.register(
        DirectiveSpec::new("typewriter", DirectiveCategory::Effect, Typewriter)
            .with_description("Character-by-character typing animation")
            .with_examples([".typewriter{Text appears slowly}"]),
    );
    registry.register(
        DirectiveSpec::new("o", DirectiveCategory::Effect, Snippet)
            .with_description("Progressive reveal bullet")
            .with_examples([".o{First bullet}", ".o{Second bullet}"]),
    );
}

fn register_transforms(registry: &mut DirectiveRegistry) {
    registry.register(
        DirectiveSpec::new("font-*", DirectiveCategory::Transform, ascii_art("font"))
            .with_description("ASCII art banner in the named font")
            .with_examples([".font-standard{Text}", ".font-doom{DOOM}"]),
    );
    registry.register(
        DirectiveSpec::new("cowpy-*", DirectiveCategory::Transform, ascii_art("cowpy"))
            .with_description("Speech bubble spoken by the named character")
            .with_examples([".cowpy-cow{Moo!}", ".cowpy-tux{Hello from Linux}"]),
    );
}

fn register_modifiers(registry: &mut DirectiveRegistry) {
    for (name, description, example) in [
        ("style", "Inline CSS for the enclosing directive", ".style{color: red}"),
        ("class", "CSS classes for the enclosing directive", ".class{highlight}"),
        ("syntax", "Language of a code block", ".syntax{python}"),
    ] {
        registry.register(
            DirectiveSpec::new(name, DirectiveCategory::Modifier, discard)
                .with_description(description)
                .with_examples([example]),
        );
    }
}

/// Whether a slide node produces a slide: it has children or non-blank content.
pub fn is_real_slide(node: &Node) -> bool {
    !node.children().is_empty() || !node.content().is_blank()
}

/// Combined inline style: authored style plus `align`/`width` settings.
fn style_value(node: &RenderedNode<'_>) -> Option<String> {
    let mut style = node.modifier("style").map(str::trim).unwrap_or_default().to_owned();
    for (property, value) in [("text-align", node.modifier("align")), ("width", node.modifier("width"))] {
        let Some(value) = value else { continue };
        if !style.is_empty() {
            if !style.ends_with(';') {
                style.push(';');
            }
            style.push(' ');
        }
        let _ = write!(style, "{property}: {value};");
    }
    (!style.is_empty()).then_some(style)
}

fn class_value(node: &RenderedNode<'_>, base: Option<&str>) -> Option<String> {
    let authored = node.modifier("class").map(str::trim).filter(|c| !c.is_empty());
    match (base, authored) {
        (Some(base), Some(authored)) => Some(format!("{base} {authored}")),
        (Some(base), None) => Some(base.to_owned()),
        (None, authored) => authored.map(str::to_owned),
    }
}

/// `class` and `style` attributes, each with a leading space, or nothing.
fn attributes(node: &RenderedNode<'_>, base_class: Option<&str>) -> String {
    let mut attrs = String::new();
    if let Some(class) = class_value(node, base_class) {
        let _ = write!(attrs, r#" class="{}""#, escape_html(&class));
    }
    if let Some(style) = style_value(node) {
        let _ = write!(attrs, r#" style="{}""#, escape_html(&style));
    }
    attrs
}

fn passthrough(node: &RenderedNode<'_>, _ctx: &mut RenderContext) -> String {
    node.content().to_owned()
}

fn discard(_node: &RenderedNode<'_>, _ctx: &mut RenderContext) -> String {
    String::new()
}

fn wrap(
    tag: &'static str,
    base_class: Option<&'static str>,
) -> impl Fn(&RenderedNode<'_>, &mut RenderContext) -> String + Send + Sync + 'static {
    move |node: &RenderedNode<'_>, _: &mut RenderContext| {
        format!(
            "<{tag}{}>{}</{tag}>",
            attributes(node, base_class),
            node.content()
        )
    }
}

/// Highlighted blocks arrive fully rendered; everything else is inline code.
fn code(node: &RenderedNode<'_>, _ctx: &mut RenderContext) -> String {
    if node.node().content().single_raw_block().is_some() {
        return node.content().to_owned();
    }
    format!("<code{}>{}</code>", attributes(node, None), node.content())
}

fn ascii_art(
    kind: &'static str,
) -> impl Fn(&RenderedNode<'_>, &mut RenderContext) -> String + Send + Sync + 'static {
    move |node: &RenderedNode<'_>, _: &mut RenderContext| {
        let variant = node
            .directive()
            .split_once('-')
            .map_or("", |(_, variant)| variant);
        let base = format!("{kind} {kind}-{variant}");
        format!(
            "<pre{}>{}</pre>",
            attributes(node, Some(&base)),
            node.content()
        )
    }
}

struct Slide;

impl DirectiveHandler for Slide {
    fn enter(&self, node: &Node, ctx: &mut RenderContext) -> Option<usize> {
        is_real_slide(node).then(|| ctx.begin_slide())
    }

    fn render(&self, node: &RenderedNode<'_>, _ctx: &mut RenderContext) -> String {
        let Some(number) = node.ordinal() else {
            tracing::debug!(line = node.node().line(), "Skipping empty slide");
            return String::new();
        };
        let class = class_value(node, Some("container slide")).unwrap_or_default();
        let style = style_value(node).map_or_else(
            || "display:none;".to_owned(),
            |style| format!("display:none; {style}"),
        );

        format!(
            "<div id=\"slide-{number}-title\" style=\"display: none;\"></div>\n\
             <div class=\"{}\" id=\"slide-{number}\" name=\"slide-{number}\" style=\"{}\">\n{}\n</div>",
            escape_html(&class),
            escape_html(&style),
            node.content()
        )
    }
}

struct Typewriter;

impl DirectiveHandler for Typewriter {
    fn enter(&self, _node: &Node, ctx: &mut RenderContext) -> Option<usize> {
        Some(ctx.next_typewriter())
    }

    fn render(&self, node: &RenderedNode<'_>, _ctx: &mut RenderContext) -> String {
        let slide = node.slide();
        let id = match node.ordinal() {
            Some(1) | None => format!("typewriter-{slide}"),
            Some(n) => format!("typewriter-{slide}-{n}"),
        };
        format!(
            "<pre id=\"{id}\"{}>{}</pre>",
            attributes(node, None),
            node.content()
        )
    }
}

struct Snippet;

impl DirectiveHandler for Snippet {
    fn enter(&self, _node: &Node, ctx: &mut RenderContext) -> Option<usize> {
        Some(ctx.next_snippet())
    }

    fn render(&self, node: &RenderedNode<'_>, _ctx: &mut RenderContext) -> String {
        format!(
            "<div id=\"order-{}-{}\"{}>{}</div>",
            node.slide(),
            node.ordinal().unwrap_or(1),
            attributes(node, Some("snippet")),
            node.content()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Content, Modifiers, Segment};
    use pretty_assertions::assert_eq;

    fn node(directive: &str, modifiers: &[(&str, &str)]) -> Node {
        let modifiers: Modifiers = modifiers
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        Node::new(
            directive,
            modifiers,
            Content::from_segments([Segment::text("x")]),
            Vec::new(),
            1,
        )
    }

    fn render(node: &Node, content: &str, ordinal: Option<usize>, slide: usize) -> String {
        let rendered = RenderedNode::new(node, content.to_owned(), ordinal, slide);
        DirectiveRegistry::global()
            .lookup(node.directive())
            .unwrap()
            .handler()
            .render(&rendered, &mut RenderContext::new())
    }

    #[test]
    fn test_wrapper_with_style() {
        let bf = node("bf", &[("style", "color: red")]);
        assert_eq!(
            render(&bf, "Bold", None, 1),
            r#"<strong style="color: red">Bold</strong>"#
        );
    }

    #[test]
    fn test_wrapper_combines_layout_modifiers() {
        let column = node("column", &[("width", "50%"), ("align", "center"), ("class", "left")]);
        assert_eq!(
            render(&column, "c", None, 1),
            r#"<div class="column left" style="text-align: center; width: 50%;">c</div>"#
        );
    }

    #[test]
    fn test_underline_and_headings() {
        assert_eq!(render(&node("underline", &[]), "u", None, 1), "<u>u</u>");
        assert_eq!(render(&node("h3", &[]), "t", None, 1), "<h3>t</h3>");
    }

    #[test]
    fn test_slide_markup() {
        let slide = node("slide", &[("style", "color: blue")]);
        let html = render(&slide, "<p>c</p>", Some(2), 2);

        assert_eq!(
            html,
            "<div id=\"slide-2-title\" style=\"display: none;\"></div>\n\
             <div class=\"container slide\" id=\"slide-2\" name=\"slide-2\" style=\"display:none; color: blue\">\n\
             <p>c</p>\n</div>"
        );
    }

    #[test]
    fn test_slide_without_ordinal_renders_nothing() {
        assert_eq!(render(&node("slide", &[]), "", None, 0), "");
    }

    #[test]
    fn test_real_slide_predicate() {
        let blank = Node::new(
            "slide",
            Modifiers::new(),
            Content::from_segments([Segment::text("  \n ")]),
            Vec::new(),
            1,
        );
        assert!(!is_real_slide(&blank));
        assert!(is_real_slide(&node("slide", &[])));
    }

    #[test]
    fn test_typewriter_ids() {
        let tw = node("typewriter", &[]);
        assert_eq!(render(&tw, "a", Some(1), 3), r#"<pre id="typewriter-3">a</pre>"#);
        assert_eq!(render(&tw, "b", Some(2), 3), r#"<pre id="typewriter-3-2">b</pre>"#);
    }

    #[test]
    fn test_snippet_markup() {
        let o = node("o", &[("class", "red")]);
        assert_eq!(
            render(&o, "point", Some(4), 1),
            r#"<div id="order-1-4" class="snippet red">point</div>"#
        );
    }

    #[test]
    fn test_ascii_art_variant_class() {
        assert_eq!(
            render(&node("font-doom", &[]), "BIG", None, 1),
            r#"<pre class="font font-doom">BIG</pre>"#
        );
        assert_eq!(
            render(&node("cowpy-tux", &[]), "hi", None, 1),
            r#"<pre class="cowpy cowpy-tux">hi</pre>"#
        );
    }

    #[test]
    fn test_comment_and_modifiers_render_nothing() {
        for name in ["comment", "style", "class", "syntax"] {
            assert_eq!(render(&node(name, &[]), "hidden", None, 1), "", "{name}");
        }
    }

    #[test]
    fn test_attribute_values_escaped() {
        let em = node("em", &[("class", "a\"b")]);
        assert_eq!(render(&em, "e", None, 1), r#"<em class="a&quot;b">e</em>"#);
    }
}
