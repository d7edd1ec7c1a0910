//! Scan orchestration.
//!
//! One browser session per scan. The crawler picks the pages, then each page
//! is loaded, walked through its UI states and audited once per state, strictly
//! one page after another. Only failing to acquire the session (or bad caller
//! input) aborts a scan; every other failure drops a page, a state or an
//! optional extra.

use crate::audit::AccessibilityAuditor;
use crate::classifier::{classify, summarize_by_tier};
use crate::config::{FeatureFlags, ResolvedProfile, ScanProfile, resolve_profile};
use crate::dedupe::dedupe;
use crate::error::{DeepScanError, Result};
use crate::explorer::{ExplorerOptions, StateExplorer};
use crate::model::{DeepScanIssue, DeepScanResult, PageScanResult, PageState};
use crate::platform::detect_platform;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use deepscan_scanner::{
    Browser, FrontierCrawler, GotoOptions, Navigator, PageToScan, ScanError, ScreenshotOptions,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};
use url::Url;

/// Callback for human-readable progress messages
pub type ScanProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub goto: GotoOptions,
    pub explorer: ExplorerOptions,
    /// Upper bound for one accessibility audit of one state.
    pub audit_timeout: Duration,
    pub capture_screenshot: bool,
    pub flags: FeatureFlags,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            goto: GotoOptions::default(),
            explorer: ExplorerOptions::default(),
            audit_timeout: Duration::from_secs(60),
            capture_screenshot: true,
            flags: FeatureFlags::default(),
        }
    }
}

pub struct ScanOrchestrator {
    browser: Arc<dyn Browser>,
    auditor: Arc<dyn AccessibilityAuditor>,
    explorer: StateExplorer,
    options: ScanOptions,
    progress_callback: Option<ScanProgressCallback>,
}

/// Everything gathered while the session was held.
struct SessionOutput {
    pages: Vec<PageScanResult>,
    states_audited: usize,
    screenshot: Option<String>,
    platform: Option<String>,
}

/// Extras captured from the seed page only.
#[derive(Default)]
struct SeedCapture {
    screenshot: Option<String>,
    html: Option<String>,
}

impl ScanOrchestrator {
    pub fn new(browser: Arc<dyn Browser>, auditor: Arc<dyn AccessibilityAuditor>) -> Self {
        Self::with_options(browser, auditor, ScanOptions::default())
    }

    pub fn with_options(
        browser: Arc<dyn Browser>,
        auditor: Arc<dyn AccessibilityAuditor>,
        options: ScanOptions,
    ) -> Self {
        Self {
            browser,
            auditor,
            explorer: StateExplorer::new(options.explorer.clone()),
            options,
            progress_callback: None,
        }
    }

    pub fn with_progress_callback(mut self, callback: ScanProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    fn report(&self, message: String) {
        if let Some(ref callback) = self.progress_callback {
            callback(message);
        }
    }

    pub async fn scan(&self, url: &str, profile_name: &str) -> Result<DeepScanResult> {
        let profile = resolve_profile(profile_name, self.options.flags)?;
        let seed = validate_seed(url)?;

        let started_at = Utc::now();
        let clock = Instant::now();

        info!(url = %seed, profile = %profile.name, auditor = self.auditor.name(), "scan-start");

        let mut session = self
            .browser
            .acquire()
            .await
            .map_err(|e| DeepScanError::Browser(e.to_string()))?;

        let outcome = self.run(session.as_mut(), &seed, &profile).await;

        if let Err(e) = session.close().await {
            warn!("Failed to release browser session: {}", e);
        }

        let output = outcome?;

        let issues = dedupe(
            output
                .pages
                .iter()
                .flat_map(|page| page.issues.iter().cloned())
                .collect(),
        );
        let summary = summarize_by_tier(&issues);
        let duration_ms = clock.elapsed().as_millis() as u64;

        info!(
            pages = output.pages.len(),
            states = output.states_audited,
            issues = summary.total,
            violations = summary.violations,
            advisories = summary.advisories,
            duration_ms,
            "scan-complete"
        );

        Ok(DeepScanResult {
            url: seed,
            profile: profile.name,
            pages_scanned: output.pages.len(),
            states_audited: output.states_audited,
            total_issues: summary.total,
            violations_count: summary.violations,
            advisories_count: summary.advisories,
            pages: output.pages,
            issues,
            started_at,
            completed_at: Utc::now(),
            duration_ms,
            platform: output.platform,
            screenshot: output.screenshot,
        })
    }

    async fn run(&self, nav: &mut dyn Navigator, seed: &str, profile: &ResolvedProfile) -> Result<SessionOutput> {
        let mut crawler = FrontierCrawler::new().with_goto_options(self.options.goto.clone());
        if let Some(ref callback) = self.progress_callback {
            let callback = callback.clone();
            crawler = crawler.with_progress_callback(Arc::new(move |found: usize, url: String| {
                callback(format!("Discovering pages... {} found, loading {}", found, url));
            }));
        }

        let pages = crawler.crawl(nav, seed, &profile.config.crawl_limits()).await?;

        let mut results = Vec::with_capacity(pages.len());
        let mut states_audited = 0;
        let mut seed_capture = SeedCapture::default();

        for (idx, page) in pages.iter().enumerate() {
            info!(url = %page.url, depth = page.depth, "page-start");
            self.report(format!("Scanning page {}/{}: {}", idx + 1, pages.len(), page.url));

            match self.scan_page(nav, page, profile.explorer, &mut seed_capture).await {
                Ok((result, audited)) => {
                    states_audited += audited;
                    results.push(result);
                }
                Err(e) => {
                    warn!(url = %page.url, error = %e, "page-skipped");
                }
            }
        }

        let platform_html = match seed_capture.html {
            Some(html) => Some(html),
            None => nav.content().await.ok(),
        };
        let platform = platform_html
            .as_deref()
            .and_then(detect_platform)
            .map(str::to_string);
        if let Some(ref name) = platform {
            debug!("Detected platform: {}", name);
        }

        Ok(SessionOutput {
            pages: results,
            states_audited,
            screenshot: seed_capture.screenshot,
            platform,
        })
    }

    /// Audit one page in every reachable state. Returns the page result and
    /// the number of audits that completed.
    async fn scan_page(
        &self,
        nav: &mut dyn Navigator,
        page: &PageToScan,
        profile: ScanProfile,
        seed_capture: &mut SeedCapture,
    ) -> Result<(PageScanResult, usize)> {
        self.navigate(nav, &page.url).await?;

        if page.depth == 0 {
            self.capture_seed(nav, seed_capture).await;
        }

        let default_state = PageState::default_state();
        let mut issues = self.audit_state(nav, &page.url, &default_state).await?;
        let mut audited = 1;
        let mut states = vec![default_state];

        for transition in StateExplorer::plan(profile) {
            let Some(state) = self.explorer.advance(nav, transition).await else {
                debug!(url = %page.url, ?transition, "No state produced");
                continue;
            };
            info!(
                url = %page.url,
                state = %state.name,
                success = state.success,
                "state-result"
            );

            if state.is_auditable() {
                match self.audit_state(nav, &page.url, &state).await {
                    Ok(found) => {
                        issues.extend(found);
                        audited += 1;
                    }
                    Err(e) => {
                        warn!(url = %page.url, state = %state.name, error = %e, "audit-failed");
                    }
                }
            }
            states.push(state);
        }

        let issues = dedupe(issues);
        let summary = summarize_by_tier(&issues);

        Ok((
            PageScanResult {
                url: page.url.clone(),
                title: page.title.clone(),
                states,
                issues,
                violations: summary.violations,
                advisories: summary.advisories,
            },
            audited,
        ))
    }

    async fn navigate(&self, nav: &mut dyn Navigator, url: &str) -> Result<()> {
        let limit = self.options.goto.timeout;
        let result = match timeout(limit, nav.goto(url, &self.options.goto)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Timeout(limit.as_millis() as u64)),
        };
        result.map_err(|e| DeepScanError::Navigation {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }

    async fn capture_seed(&self, nav: &dyn Navigator, capture: &mut SeedCapture) {
        if capture.html.is_none() {
            capture.html = nav.content().await.ok();
        }

        if !self.options.capture_screenshot || capture.screenshot.is_some() {
            return;
        }
        match nav.screenshot(&ScreenshotOptions { full_page: false }).await {
            Ok(bytes) => capture.screenshot = Some(BASE64.encode(bytes)),
            Err(e) => warn!("Screenshot capture failed: {}", e),
        }
    }

    async fn audit_state(&self, nav: &dyn Navigator, page_url: &str, state: &PageState) -> Result<Vec<DeepScanIssue>> {
        let limit = self.options.audit_timeout;
        let report = match timeout(limit, self.auditor.run(nav)).await {
            Ok(report) => report?,
            Err(_) => {
                return Err(DeepScanError::Audit(format!(
                    "{} auditor timed out after {} ms",
                    self.auditor.name(),
                    limit.as_millis()
                )));
            }
        };
        Ok(report
            .into_findings()
            .into_iter()
            .map(|finding| {
                let tier = classify(&finding.rule);
                DeepScanIssue::from_finding(finding, page_url, state.name, &tier)
            })
            .collect())
    }
}

fn validate_seed(url: &str) -> Result<String> {
    let mut parsed = Url::parse(url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ScanError::InvalidUrl(format!("unsupported scheme: {}", url)).into());
    }
    parsed.set_fragment(None);
    Ok(parsed.to_string())
}
