//! Directive handler trait.

use super::context::RenderContext;
use crate::node::{Modifiers, Node};

/// Renders one directive to HTML.
///
/// The compiler calls [`enter`](Self::enter) before descending into the
/// node's children, so counters it allocates follow document order. It then
/// renders the children, substitutes them into the content and calls
/// [`render`](Self::render).
///
/// Plain closures taking `(&RenderedNode, &mut RenderContext)` implement
/// this trait.
///
/// # Example
///
/// ```
/// use slidedown_renderer::{DirectiveHandler, RenderContext, RenderedNode};
///
/// struct Kbd;
///
/// impl DirectiveHandler for Kbd {
///     fn render(&self, node: &RenderedNode<'_>, _ctx: &mut RenderContext) -> String {
///         format!("<kbd>{}</kbd>", node.content())
///     }
/// }
/// ```
pub trait DirectiveHandler: Send + Sync {
    /// Called in document order before the node's children are rendered.
    ///
    /// The returned ordinal is handed back through [`RenderedNode::ordinal`].
    fn enter(&self, _node: &Node, _ctx: &mut RenderContext) -> Option<usize> {
        None
    }

    /// Produce the HTML for a node whose content is already rendered.
    fn render(&self, node: &RenderedNode<'_>, ctx: &mut RenderContext) -> String;
}

impl<F> DirectiveHandler for F
where
    F: Fn(&RenderedNode<'_>, &mut RenderContext) -> String + Send + Sync,
{
    fn render(&self, node: &RenderedNode<'_>, ctx: &mut RenderContext) -> String {
        self(node, ctx)
    }
}

/// A node with its children rendered and substituted into its content.
#[derive(Debug, Clone)]
pub struct RenderedNode<'a> {
    node: &'a Node,
    content: String,
    ordinal: Option<usize>,
    slide: usize,
}

impl<'a> RenderedNode<'a> {
    #[must_use]
    pub fn new(node: &'a Node, content: String, ordinal: Option<usize>, slide: usize) -> Self {
        Self {
            node,
            content,
            ordinal,
            slide,
        }
    }

    /// The parsed node.
    #[must_use]
    pub fn node(&self) -> &'a Node {
        self.node
    }

    #[must_use]
    pub fn directive(&self) -> &'a str {
        self.node.directive()
    }

    #[must_use]
    pub fn modifiers(&self) -> &'a Modifiers {
        self.node.modifiers()
    }

    #[must_use]
    pub fn modifier(&self, name: &str) -> Option<&'a str> {
        self.node.modifier(name)
    }

    /// Rendered HTML content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Value returned by [`DirectiveHandler::enter`].
    #[must_use]
    pub fn ordinal(&self) -> Option<usize> {
        self.ordinal
    }

    /// Slide number current when the node was entered (0 before the first slide).
    #[must_use]
    pub fn slide(&self) -> usize {
        self.slide
    }
}
