// Page automation seam used by the crawler, the state explorer and the auditor

use crate::error::Result;
use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// When a navigation counts as finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaitUntil {
    Load,
    #[default]
    DomContentLoaded,
    NetworkIdle,
}

#[derive(Debug, Clone)]
pub struct GotoOptions {
    pub wait_until: WaitUntil,
    pub timeout: Duration,
}

impl Default for GotoOptions {
    fn default() -> Self {
        Self {
            wait_until: WaitUntil::DomContentLoaded,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenshotOptions {
    pub full_page: bool,
}

/// How to find an element on the loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Locator {
    /// A CSS selector.
    Css(&'static str),
    /// An element of `tag` whose trimmed text equals `text`, ignoring ASCII case.
    Text { tag: &'static str, text: &'static str },
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => f.write_str(selector),
            Locator::Text { tag, text } => write!(f, "{}:has-text(\"{}\")", tag, text),
        }
    }
}

/// A browser tab (or something that behaves like one).
///
/// Queries always act on the first element matched by a locator.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Load `url`, replacing the current page.
    async fn goto(&mut self, url: &str, options: &GotoOptions) -> Result<()>;

    /// Document title of the current page, if it has one.
    async fn title(&self) -> Result<Option<String>>;

    /// Serialized HTML of the current page.
    async fn content(&self) -> Result<String>;

    /// Absolute `href` of every anchor on the current page, in document order.
    async fn links(&self) -> Result<Vec<String>>;

    async fn is_visible(&self, locator: &Locator) -> Result<bool>;

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>>;

    async fn click(&mut self, locator: &Locator) -> Result<()>;

    /// PNG bytes of the current viewport (or full page).
    async fn screenshot(&self, options: &ScreenshotOptions) -> Result<Vec<u8>>;

    fn current_url(&self) -> Option<&str>;

    /// Release whatever the session holds. Called exactly once per acquired session.
    async fn close(&mut self) -> Result<()>;
}

/// Hands out navigator sessions.
#[async_trait]
pub trait Browser: Send + Sync {
    async fn acquire(&self) -> Result<Box<dyn Navigator>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::Css("#cookie button").to_string(), "#cookie button");
        assert_eq!(
            Locator::Text { tag: "button", text: "Got it" }.to_string(),
            "button:has-text(\"Got it\")"
        );
    }
}
