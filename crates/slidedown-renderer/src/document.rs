//! Full HTML page assembly.
//!
//! Wraps compiled slides in the presentation shell: the head, navbar and
//! footer templates from `<assets>/html/`, the metadata the runtime script
//! reads, and the script tag itself.

use std::fs;
use std::path::Path;

/// Prefix of slide element ids, published to the runtime script.
pub const SLIDE_ID_PREFIX: &str = "slide-";

/// Runtime script path relative to the output directory.
pub const RUNTIME_SCRIPT: &str = "js/slidedown.js";

/// Page fragments loaded from the assets directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlTemplates {
    pub head: String,
    pub navbar: String,
    pub footer: String,
}

impl HtmlTemplates {
    /// Load `head.html`, `navbar.html` and `footer.html` from
    /// `<assets_dir>/html/`.
    ///
    /// A missing template is logged and left empty.
    pub fn load(assets_dir: &Path) -> Self {
        let dir = assets_dir.join("html");
        let read = |name: &str| {
            let path = dir.join(name);
            fs::read_to_string(&path).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Template not loaded");
                String::new()
            })
        };

        Self {
            head: read("head.html"),
            navbar: read("navbar.html"),
            footer: read("footer.html"),
        }
    }
}

/// Builder for the final page.
///
/// # Example
///
/// ```
/// use slidedown_renderer::{HtmlDocument, HtmlTemplates};
///
/// let page = HtmlDocument::new("<div>slides</div>", 3)
///     .with_templates(HtmlTemplates::default())
///     .render();
///
/// assert!(page.starts_with("<!DOCTYPE html>"));
/// assert!(page.contains(r#"id="numberOfSlides" style="display: none;">3</div>"#));
/// ```
#[derive(Debug, Clone)]
pub struct HtmlDocument<'a> {
    content: &'a str,
    slide_count: usize,
    templates: HtmlTemplates,
}

impl<'a> HtmlDocument<'a> {
    #[must_use]
    pub fn new(content: &'a str, slide_count: usize) -> Self {
        Self {
            content,
            slide_count,
            templates: HtmlTemplates::default(),
        }
    }

    #[must_use]
    pub fn with_templates(mut self, templates: HtmlTemplates) -> Self {
        self.templates = templates;
        self
    }

    /// Render the complete page.
    #[must_use]
    pub fn render(&self) -> String {
        let HtmlTemplates { head, navbar, footer } = &self.templates;
        format!(
            r#"<!DOCTYPE html>
<html>
{head}
<body>
    <div class="metaData" id="numberOfSlides" style="display: none;">{slide_count}</div>
    <div class="metaData" id="slideIDprefix" style="display: none;">{SLIDE_ID_PREFIX}</div>

    {navbar}

    <div class="formLayout">
        {content}
    </div>

    {footer}

    <script src="{RUNTIME_SCRIPT}"></script>
</body>
</html>
"#,
            slide_count = self.slide_count,
            content = self.content,
        )
    }
}
