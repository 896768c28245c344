//! Directive registry.
//!
//! Maps directive names to their [`DirectiveSpec`]. Exact names are looked
//! up first, then wildcard prefixes (`font-*`) in registration order.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use super::builtin;
use super::handler::DirectiveHandler;

static GLOBAL: LazyLock<DirectiveRegistry> = LazyLock::new(DirectiveRegistry::builtin);

/// Grouping used for documentation and the `directives` listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DirectiveCategory {
    /// Slides and their sections.
    Structural,
    /// Inline text styling.
    Formatting,
    /// Headings, columns and comments.
    Layout,
    /// Progressive reveal effects.
    Effect,
    /// Content rewritten by an external renderer.
    Transform,
    /// Reserved modifier names.
    Modifier,
}

impl DirectiveCategory {
    pub const ALL: [Self; 6] = [
        Self::Structural,
        Self::Formatting,
        Self::Layout,
        Self::Effect,
        Self::Transform,
        Self::Modifier,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::Formatting => "formatting",
            Self::Layout => "layout",
            Self::Effect => "effect",
            Self::Transform => "transform",
            Self::Modifier => "modifier",
        }
    }
}

impl fmt::Display for DirectiveCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Name pattern a spec answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectivePattern {
    /// Exactly this name.
    Exact(String),
    /// Any name starting with this prefix, written `prefix*`.
    Prefix(String),
}

impl DirectivePattern {
    /// Parse `"slide"` as exact and `"font-*"` as the prefix `"font-"`.
    #[must_use]
    pub fn parse(pattern: &str) -> Self {
        match pattern.strip_suffix('*') {
            Some(prefix) => Self::Prefix(prefix.to_owned()),
            None => Self::Exact(pattern.to_owned()),
        }
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        match self {
            Self::Exact(exact) => exact == name,
            Self::Prefix(prefix) => name.len() > prefix.len() && name.starts_with(prefix.as_str()),
        }
    }

    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Self::Prefix(_))
    }
}

impl fmt::Display for DirectivePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(name) => f.write_str(name),
            Self::Prefix(prefix) => write!(f, "{prefix}*"),
        }
    }
}

/// Registered directive: pattern, metadata and rendering handler.
pub struct DirectiveSpec {
    pattern: DirectivePattern,
    category: DirectiveCategory,
    description: String,
    examples: Vec<String>,
    requires_children: bool,
    handler: Box<dyn DirectiveHandler>,
}

impl DirectiveSpec {
    /// Create a spec for `pattern` (`"name"` or `"prefix-*"`).
    ///
    /// # Example
    ///
    /// ```
    /// use slidedown_renderer::{DirectiveCategory, DirectiveSpec, RenderContext, RenderedNode};
    ///
    /// let spec = DirectiveSpec::new(
    ///     "kbd",
    ///     DirectiveCategory::Formatting,
    ///     |node: &RenderedNode<'_>, _: &mut RenderContext| format!("<kbd>{}</kbd>", node.content()),
    /// )
    /// .with_description("Keyboard shortcut")
    /// .with_examples([".kbd{Ctrl+C}"]);
    ///
    /// assert_eq!(spec.pattern().to_string(), "kbd");
    /// ```
    #[must_use]
    pub fn new(
        pattern: &str,
        category: DirectiveCategory,
        handler: impl DirectiveHandler + 'static,
    ) -> Self {
        Self {
            pattern: DirectivePattern::parse(pattern),
            category,
            description: String::new(),
            examples: Vec::new(),
            requires_children: false,
            handler: Box::new(handler),
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the directive as expected to contain nested directives.
    #[must_use]
    pub fn requiring_children(mut self) -> Self {
        self.requires_children = true;
        self
    }

    #[must_use]
    pub fn pattern(&self) -> &DirectivePattern {
        &self.pattern
    }

    #[must_use]
    pub fn category(&self) -> DirectiveCategory {
        self.category
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    #[must_use]
    pub fn requires_children(&self) -> bool {
        self.requires_children
    }

    #[must_use]
    pub fn handler(&self) -> &dyn DirectiveHandler {
        self.handler.as_ref()
    }
}

impl fmt::Debug for DirectiveSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectiveSpec")
            .field("pattern", &self.pattern)
            .field("category", &self.category)
            .field("description", &self.description)
            .field("requires_children", &self.requires_children)
            .finish_non_exhaustive()
    }
}

/// Directive lookup table.
///
/// # Example
///
/// ```
/// use slidedown_renderer::{DirectiveCategory, DirectiveRegistry};
///
/// let registry = DirectiveRegistry::global();
///
/// assert!(registry.contains("slide"));
/// assert!(registry.contains("font-doom"));
/// assert!(!registry.contains("font-"));
/// assert!(!registry.contains("nothing"));
/// assert!(registry.specs_in(DirectiveCategory::Modifier).count() == 3);
/// ```
#[derive(Debug, Default)]
pub struct DirectiveRegistry {
    specs: Vec<DirectiveSpec>,
    exact: HashMap<String, usize>,
    wildcards: Vec<usize>,
}

impl DirectiveRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in directive set.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        builtin::register(&mut registry);
        registry
    }

    /// Shared built-in registry, initialized on first use.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Add a spec. An exact name registered twice keeps the later spec.
    pub fn register(&mut self, spec: DirectiveSpec) {
        match spec.pattern() {
            DirectivePattern::Exact(name) => {
                if let Some(&index) = self.exact.get(name) {
                    tracing::debug!(directive = %name, "Replacing registered directive");
                    self.specs[index] = spec;
                } else {
                    self.exact.insert(name.clone(), self.specs.len());
                    self.specs.push(spec);
                }
            }
            DirectivePattern::Prefix(_) => {
                self.wildcards.push(self.specs.len());
                self.specs.push(spec);
            }
        }
    }

    #[must_use]
    pub fn with(mut self, spec: DirectiveSpec) -> Self {
        self.register(spec);
        self
    }

    /// Find the spec for a directive name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&DirectiveSpec> {
        if let Some(&index) = self.exact.get(name) {
            return self.specs.get(index);
        }
        self.wildcards
            .iter()
            .filter_map(|&index| self.specs.get(index))
            .find(|spec| spec.pattern().matches(name))
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// All specs in registration order.
    pub fn specs(&self) -> impl Iterator<Item = &DirectiveSpec> {
        self.specs.iter()
    }

    /// Specs of one category in registration order.
    pub fn specs_in(&self, category: DirectiveCategory) -> impl Iterator<Item = &DirectiveSpec> {
        self.specs.iter().filter(move |spec| spec.category() == category)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.specs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RenderContext, RenderedNode};

    fn constant(
        html: &'static str,
    ) -> impl Fn(&RenderedNode<'_>, &mut RenderContext) -> String + Send + Sync + 'static {
        move |_: &RenderedNode<'_>, _: &mut RenderContext| html.to_owned()
    }

    fn render_with(registry: &DirectiveRegistry, name: &str) -> String {
        let node = crate::Node::new(name, crate::Modifiers::new(), crate::Content::new(), Vec::new(), 1);
        let rendered = RenderedNode::new(&node, String::new(), None, 0);
        registry
            .lookup(name)
            .unwrap()
            .handler()
            .render(&rendered, &mut RenderContext::new())
    }

    #[test]
    fn test_pattern_parse() {
        assert_eq!(DirectivePattern::parse("slide"), DirectivePattern::Exact("slide".to_owned()));
        assert_eq!(DirectivePattern::parse("font-*"), DirectivePattern::Prefix("font-".to_owned()));
        assert_eq!(DirectivePattern::parse("font-*").to_string(), "font-*");
    }

    #[test]
    fn test_prefix_requires_suffix() {
        let pattern = DirectivePattern::parse("font-*");

        assert!(pattern.matches("font-doom"));
        assert!(!pattern.matches("font-"));
        assert!(!pattern.matches("fontdoom"));
    }

    #[test]
    fn test_exact_before_wildcard() {
        let registry = DirectiveRegistry::new()
            .with(DirectiveSpec::new("x-*", DirectiveCategory::Transform, constant("wild")))
            .with(DirectiveSpec::new("x-special", DirectiveCategory::Layout, constant("exact")));

        assert_eq!(render_with(&registry, "x-special"), "exact");
        assert_eq!(render_with(&registry, "x-other"), "wild");
    }

    #[test]
    fn test_wildcards_in_registration_order() {
        let registry = DirectiveRegistry::new()
            .with(DirectiveSpec::new("a-*", DirectiveCategory::Transform, constant("short")))
            .with(DirectiveSpec::new("a-b-*", DirectiveCategory::Transform, constant("long")));

        assert_eq!(render_with(&registry, "a-b-c"), "short");
    }

    #[test]
    fn test_last_exact_registration_wins() {
        let registry = DirectiveRegistry::new()
            .with(DirectiveSpec::new("k", DirectiveCategory::Formatting, constant("first")))
            .with(DirectiveSpec::new("k", DirectiveCategory::Formatting, constant("second")));

        assert_eq!(render_with(&registry, "k"), "second");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_builtin_set() {
        let registry = DirectiveRegistry::builtin();

        for name in [
            "slide", "title", "body", "comment", "bf", "em", "tt", "code", "underline", "h1", "h6",
            "column", "typewriter", "o", "font-big", "cowpy-tux", "style", "class", "syntax",
        ] {
            assert!(registry.contains(name), "{name}");
        }
        assert!(!registry.contains("h7"));
        assert!(!registry.contains("cowpy"));
    }

    #[test]
    fn test_specs_in_category() {
        let registry = DirectiveRegistry::builtin();
        let structural: Vec<String> = registry
            .specs_in(DirectiveCategory::Structural)
            .map(|spec| spec.pattern().to_string())
            .collect();

        assert_eq!(structural, ["slide", "title", "body", "comment"]);
        assert!(
            registry
                .specs()
                .all(|spec| !spec.description().is_empty())
        );
    }

    #[test]
    fn test_global_is_shared() {
        assert!(std::ptr::eq(DirectiveRegistry::global(), DirectiveRegistry::global()));
    }
}
