// Static HTML navigator backed by reqwest + scraper

use crate::error::{Result, ScanError};
use crate::navigator::{Browser, GotoOptions, Locator, Navigator, ScreenshotOptions};
use async_trait::async_trait;
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Builds one pooled HTTP client per acquired session.
pub struct HttpBrowser {
    timeout_secs: u64,
}

impl HttpBrowser {
    pub fn new() -> Self {
        Self::with_timeout(30)
    }

    pub fn with_timeout(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

impl Default for HttpBrowser {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Browser for HttpBrowser {
    async fn acquire(&self) -> Result<Box<dyn Navigator>> {
        let client = Client::builder()
            .user_agent("Deepscan/0.1 (https://github.com/trapdoorsec/deepscan)")
            .timeout(Duration::from_secs(self.timeout_secs))
            .connect_timeout(Duration::from_secs(self.timeout_secs.div_ceil(2)))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(60))
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Box::new(HttpNavigator::new(client)))
    }
}

struct LoadedPage {
    url: String,
    html: String,
}

/// Navigator over server-rendered HTML.
///
/// There is no script execution or layout: an element is "visible" when it
/// exists, and clicks and screenshots are reported as unsupported.
pub struct HttpNavigator {
    client: Client,
    page: Option<LoadedPage>,
}

impl HttpNavigator {
    pub fn new(client: Client) -> Self {
        Self { client, page: None }
    }

    fn page(&self) -> Result<&LoadedPage> {
        self.page.as_ref().ok_or(ScanError::NoPage)
    }

    fn with_first_match<T>(
        &self,
        locator: &Locator,
        f: impl FnOnce(Option<ElementRef<'_>>) -> T,
    ) -> Result<T> {
        let page = self.page()?;
        let document = Html::parse_document(&page.html);
        let found = select_first(&document, locator)?;
        Ok(f(found))
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScanError::ParseError(format!("{}: {}", selector, e)))
}

fn select_first<'a>(document: &'a Html, locator: &Locator) -> Result<Option<ElementRef<'a>>> {
    match locator {
        Locator::Css(selector) => {
            let selector = parse_selector(selector)?;
            Ok(document.select(&selector).next())
        }
        Locator::Text { tag, text } => {
            let selector = parse_selector(tag)?;
            Ok(document.select(&selector).find(|element| {
                element
                    .text()
                    .collect::<String>()
                    .trim()
                    .eq_ignore_ascii_case(text)
            }))
        }
    }
}

fn resolve_href(base: &Url, href: &str) -> Option<String> {
    if href.trim().is_empty() {
        return None;
    }
    base.join(href.trim()).ok().map(|u| u.to_string())
}

#[async_trait]
impl Navigator for HttpNavigator {
    async fn goto(&mut self, url: &str, options: &GotoOptions) -> Result<()> {
        debug!("Fetching {}", url);
        self.page = None;

        let response = self.client.get(url).timeout(options.timeout).send().await?;

        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let is_html = response
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(|ct| ct.contains("text/html"))
            .unwrap_or(false);
        if !is_html {
            return Err(ScanError::NotHtml(url.to_string()));
        }

        let final_url = response.url().to_string();
        let html = response.text().await?;

        self.page = Some(LoadedPage {
            url: final_url,
            html,
        });
        Ok(())
    }

    async fn title(&self) -> Result<Option<String>> {
        let page = self.page()?;
        let document = Html::parse_document(&page.html);
        let selector = parse_selector("title")?;
        Ok(document
            .select(&selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .filter(|t| !t.is_empty()))
    }

    async fn content(&self) -> Result<String> {
        Ok(self.page()?.html.clone())
    }

    async fn links(&self) -> Result<Vec<String>> {
        let page = self.page()?;
        let base = Url::parse(&page.url).map_err(|e| ScanError::InvalidUrl(e.to_string()))?;
        let document = Html::parse_document(&page.html);
        let selector = parse_selector("a[href]")?;

        Ok(document
            .select(&selector)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| resolve_href(&base, href))
            .collect())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool> {
        self.with_first_match(locator, |found| found.is_some())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>> {
        self.with_first_match(locator, |found| {
            found.and_then(|el| el.value().attr(name).map(|v| v.to_string()))
        })
    }

    async fn click(&mut self, _locator: &Locator) -> Result<()> {
        Err(ScanError::Unsupported("click"))
    }

    async fn screenshot(&self, _options: &ScreenshotOptions) -> Result<Vec<u8>> {
        Err(ScanError::Unsupported("screenshot"))
    }

    fn current_url(&self) -> Option<&str> {
        self.page.as_ref().map(|p| p.url.as_str())
    }

    async fn close(&mut self) -> Result<()> {
        self.page = None;
        Ok(())
    }
}
