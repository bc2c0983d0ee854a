//! Progressive rendering contract for deferred sections.

use std::sync::Arc;

use crate::handle::PendingHandle;

/// What to show for a section while its data is pending.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Fallback {
    /// Render placeholder markup.
    Markup(String),
    /// Show nothing until the data arrives.
    #[default]
    Skip,
}

impl Fallback {
    /// Placeholder from raw markup.
    pub fn html(html: impl Into<String>) -> Self {
        Self::Markup(html.into())
    }

    /// Placeholder showing a short, escaped message.
    pub fn message(message: &str) -> Self {
        Self::Markup(format!(
            r#"<div class="section-fallback">{}</div>"#,
            html_escape(message)
        ))
    }

    /// Markup to emit, if any.
    pub fn markup(&self) -> Option<&str> {
        match self {
            Self::Markup(html) => Some(html),
            Self::Skip => None,
        }
    }
}

/// Receives the output of a progressively rendered section.
///
/// `fallback` is called at most once, before `resolved`; `resolved` is called
/// exactly once. A `None` value means the request failed and the section
/// should be omitted.
pub trait ProgressiveRenderer<T> {
    /// Show the placeholder for `name`.
    fn fallback(&mut self, name: &str);

    /// Replace the placeholder with the resolved content.
    fn resolved(&mut self, name: &str, value: Option<Arc<T>>);
}

/// How [`render_progressively`] delivered the section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Already resolved; no placeholder was shown.
    Immediate,
    /// Placeholder first, content on resolution.
    AfterFallback,
}

/// Drive `renderer` for one deferred section.
pub async fn render_progressively<T, R>(handle: &PendingHandle<T>, renderer: &mut R) -> Delivery
where
    T: Send + Sync + 'static,
    R: ProgressiveRenderer<T> + ?Sized,
{
    if let Some(value) = handle.peek() {
        renderer.resolved(handle.name(), value);
        return Delivery::Immediate;
    }

    renderer.fallback(handle.name());
    let value = handle.clone().await;
    renderer.resolved(handle.name(), value);
    Delivery::AfterFallback
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
