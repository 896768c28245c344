//! Render context.
//!
//! Mutable state threaded through one compile: slide, snippet and typewriter
//! counters plus collected warnings.

/// Per-compile rendering state.
///
/// Counters are 1-based. Starting a slide resets the snippet and typewriter
/// counters.
///
/// # Example
///
/// ```
/// use slidedown_renderer::RenderContext;
///
/// let mut ctx = RenderContext::new();
/// assert_eq!(ctx.begin_slide(), 1);
/// assert_eq!(ctx.next_snippet(), 1);
/// assert_eq!(ctx.next_snippet(), 2);
/// assert_eq!(ctx.begin_slide(), 2);
/// assert_eq!(ctx.next_snippet(), 1);
/// ```
#[derive(Debug, Default)]
pub struct RenderContext {
    slide: usize,
    snippets: usize,
    typewriters: usize,
    warnings: Vec<String>,
}

impl RenderContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the next slide and return its number.
    pub fn begin_slide(&mut self) -> usize {
        self.slide += 1;
        self.snippets = 0;
        self.typewriters = 0;
        self.slide
    }

    /// Number of the current slide, 0 before the first one.
    #[must_use]
    pub fn current_slide(&self) -> usize {
        self.slide
    }

    /// Allocate the next snippet number within the current slide.
    pub fn next_snippet(&mut self) -> usize {
        self.snippets += 1;
        self.snippets
    }

    /// Allocate the next typewriter number within the current slide.
    pub fn next_typewriter(&mut self) -> usize {
        self.typewriters += 1;
        self.typewriters
    }

    /// Record a non-fatal problem.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("{message}");
        self.warnings.push(message);
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typewriter_counter_resets_per_slide() {
        let mut ctx = RenderContext::new();
        ctx.begin_slide();
        assert_eq!(ctx.next_typewriter(), 1);
        assert_eq!(ctx.next_typewriter(), 2);
        ctx.begin_slide();
        assert_eq!(ctx.next_typewriter(), 1);
        assert_eq!(ctx.current_slide(), 2);
    }

    #[test]
    fn test_warnings_collected() {
        let mut ctx = RenderContext::new();
        ctx.warn("first");
        ctx.warn(String::from("second"));

        assert_eq!(ctx.warnings(), ["first", "second"]);
        assert_eq!(ctx.into_warnings().len(), 2);
    }
}
