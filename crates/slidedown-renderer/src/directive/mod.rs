//! Pluggable directive API.
//!
//! Every `.name{...}` construct the parser recognizes is backed by a
//! [`DirectiveSpec`] in a [`DirectiveRegistry`]. A spec carries the name
//! pattern (exact, or a `prefix-*` wildcard), documentation metadata and a
//! [`DirectiveHandler`] that turns a rendered node into HTML.
//!
//! # Directive categories
//!
//! - **Structural**: `slide`, `title`, `body`, `comment`
//! - **Formatting**: `bf`, `em`, `tt`, `underline`, `h1`-`h6`, `code`
//! - **Layout**: `column`
//! - **Effect**: `typewriter`, `o`
//! - **Transform**: `font-*`, `cowpy-*`
//! - **Modifier**: `style`, `class`, `syntax` (extracted by the parser)
//!
//! # Example
//!
//! ```
//! use slidedown_renderer::{
//!     Compiler, DirectiveCategory, DirectiveRegistry, DirectiveSpec, Parser,
//!     RenderContext, RenderedNode,
//! };
//!
//! let registry = DirectiveRegistry::builtin().with(DirectiveSpec::new(
//!     "kbd",
//!     DirectiveCategory::Formatting,
//!     |node: &RenderedNode<'_>, _: &mut RenderContext| format!("<kbd>{}</kbd>", node.content()),
//! ));
//!
//! let document = Parser::with_registry(&registry).parse(".kbd{Ctrl+C}").unwrap();
//! let output = Compiler::with_registry(&registry).compile(&document);
//!
//! assert_eq!(output.html, "<kbd>Ctrl+C</kbd>");
//! ```

mod builtin;
mod context;
mod handler;
mod registry;

pub use builtin::is_real_slide;
pub use context::RenderContext;
pub use handler::{DirectiveHandler, RenderedNode};
pub use registry::{DirectiveCategory, DirectivePattern, DirectiveRegistry, DirectiveSpec};
