// Scripted in-memory browser, page and auditor used by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use deepscan_core::{AccessibilityAuditor, AuditNode, AuditReport, AuditViolation, DeepScanError};
use deepscan_scanner::{Browser, GotoOptions, Locator, Navigator, ScanError, ScreenshotOptions};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct FakeElement {
    pub locator: Locator,
    pub attrs: HashMap<String, String>,
    pub clickable: bool,
}

impl FakeElement {
    pub fn new(locator: Locator) -> Self {
        Self {
            locator,
            attrs: HashMap::new(),
            clickable: true,
        }
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }

    pub fn unclickable(mut self) -> Self {
        self.clickable = false;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakePage {
    pub title: Option<String>,
    pub html: String,
    pub links: Vec<String>,
    pub elements: Vec<FakeElement>,
}

impl FakePage {
    pub fn new(title: &str) -> Self {
        Self {
            title: Some(title.to_string()),
            html: format!("<html><head><title>{}</title></head><body></body></html>", title),
            ..Self::default()
        }
    }

    pub fn html(mut self, html: &str) -> Self {
        self.html = html.to_string();
        self
    }

    pub fn links(mut self, links: &[&str]) -> Self {
        self.links = links.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn element(mut self, element: FakeElement) -> Self {
        self.elements.push(element);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct FakeSite {
    pub pages: HashMap<String, FakePage>,
    pub broken: HashSet<String>,
    pub screenshot: Option<Vec<u8>>,
}

impl FakeSite {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, page: FakePage) -> Self {
        self.pages.insert(url.to_string(), page);
        self
    }

    pub fn broken(mut self, url: &str) -> Self {
        self.broken.insert(url.to_string());
        self
    }

    pub fn screenshot(mut self, bytes: &[u8]) -> Self {
        self.screenshot = Some(bytes.to_vec());
        self
    }
}

/// Shared record of what the fake browser was asked to do.
#[derive(Debug, Default)]
pub struct Journal {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub gotos: Mutex<Vec<String>>,
    pub clicks: Mutex<Vec<String>>,
}

impl Journal {
    pub fn gotos(&self) -> Vec<String> {
        self.gotos.lock().unwrap().clone()
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }
}

pub struct FakeNavigator {
    site: Arc<FakeSite>,
    journal: Arc<Journal>,
    current: Option<String>,
}

impl FakeNavigator {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site: Arc::new(site),
            journal: Arc::new(Journal::default()),
            current: None,
        }
    }

    pub fn journal(&self) -> Arc<Journal> {
        self.journal.clone()
    }

    fn page(&self) -> Result<&FakePage, ScanError> {
        let url = self.current.as_ref().ok_or(ScanError::NoPage)?;
        self.site.pages.get(url).ok_or(ScanError::NoPage)
    }

    fn element(&self, locator: &Locator) -> Result<Option<&FakeElement>, ScanError> {
        Ok(self.page()?.elements.iter().find(|e| &e.locator == locator))
    }
}

#[async_trait]
impl Navigator for FakeNavigator {
    async fn goto(&mut self, url: &str, _options: &GotoOptions) -> Result<(), ScanError> {
        self.journal.gotos.lock().unwrap().push(url.to_string());
        if self.site.broken.contains(url) || !self.site.pages.contains_key(url) {
            self.current = None;
            return Err(ScanError::HttpStatus {
                url: url.to_string(),
                status: 500,
            });
        }
        self.current = Some(url.to_string());
        Ok(())
    }

    async fn title(&self) -> Result<Option<String>, ScanError> {
        Ok(self.page()?.title.clone())
    }

    async fn content(&self) -> Result<String, ScanError> {
        Ok(self.page()?.html.clone())
    }

    async fn links(&self) -> Result<Vec<String>, ScanError> {
        Ok(self.page()?.links.clone())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, ScanError> {
        Ok(self.element(locator)?.is_some())
    }

    async fn attribute(&self, locator: &Locator, name: &str) -> Result<Option<String>, ScanError> {
        Ok(self.element(locator)?.and_then(|e| e.attrs.get(name).cloned()))
    }

    async fn click(&mut self, locator: &Locator) -> Result<(), ScanError> {
        let clickable = self.element(locator)?.map(|e| e.clickable).unwrap_or(false);
        if !clickable {
            return Err(ScanError::Timeout(3000));
        }
        self.journal.clicks.lock().unwrap().push(locator.to_string());
        Ok(())
    }

    async fn screenshot(&self, _options: &ScreenshotOptions) -> Result<Vec<u8>, ScanError> {
        self.site
            .screenshot
            .clone()
            .ok_or(ScanError::Unsupported("screenshot"))
    }

    fn current_url(&self) -> Option<&str> {
        self.current.as_deref()
    }

    async fn close(&mut self) -> Result<(), ScanError> {
        self.journal.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeBrowser {
    site: FakeSite,
    journal: Arc<Journal>,
    unavailable: bool,
}

impl FakeBrowser {
    pub fn new(site: FakeSite) -> Self {
        Self {
            site,
            journal: Arc::new(Journal::default()),
            unavailable: false,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            site: FakeSite::default(),
            journal: Arc::new(Journal::default()),
            unavailable: true,
        }
    }

    pub fn journal(&self) -> Arc<Journal> {
        self.journal.clone()
    }
}

#[async_trait]
impl Browser for FakeBrowser {
    async fn acquire(&self) -> Result<Box<dyn Navigator>, ScanError> {
        if self.unavailable {
            return Err(ScanError::IoError(std::io::Error::other(
                "browser failed to launch",
            )));
        }
        self.journal.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(FakeNavigator {
            site: Arc::new(self.site.clone()),
            journal: self.journal.clone(),
            current: None,
        }))
    }
}

/// Returns the same canned violations every time a given URL is audited.
#[derive(Default)]
pub struct ScriptedAuditor {
    reports: HashMap<String, AuditReport>,
    failing: HashSet<String>,
    failing_calls: HashSet<(String, usize)>,
    hanging: HashSet<String>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedAuditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one node-level violation of `rule` at `selector` on `url`.
    pub fn finding(mut self, url: &str, rule: &str, selector: &str) -> Self {
        let report = self.reports.entry(url.to_string()).or_default();
        report.violations.push(AuditViolation {
            id: rule.to_string(),
            nodes: vec![AuditNode {
                target: vec![selector.to_string()],
                html: format!("<div class=\"{}\"></div>", selector),
                impact: Some("serious".to_string()),
            }],
            description: format!("{} description", rule),
            help_url: format!("https://dequeuniversity.com/rules/axe/4.8/{}", rule),
            tags: vec!["wcag2a".to_string()],
            impact: None,
        });
        self
    }

    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Fails only the `nth` audit (1-based) of `url`.
    pub fn failing_call(mut self, url: &str, nth: usize) -> Self {
        self.failing_calls.insert((url.to_string(), nth));
        self
    }

    /// Audits of `url` never finish.
    pub fn hanging(mut self, url: &str) -> Self {
        self.hanging.insert(url.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl AccessibilityAuditor for ScriptedAuditor {
    async fn run(&self, page: &dyn Navigator) -> Result<AuditReport, DeepScanError> {
        let url = page.current_url().unwrap_or_default().to_string();
        let nth = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.clone());
            calls.iter().filter(|u| **u == url).count()
        };
        if self.hanging.contains(&url) {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        if self.failing.contains(&url) || self.failing_calls.contains(&(url.clone(), nth)) {
            return Err(DeepScanError::Audit(format!("checker injection failed on {}", url)));
        }
        Ok(self.reports.get(&url).cloned().unwrap_or_default())
    }

    fn name(&self) -> &'static str {
        "scripted"
    }
}
