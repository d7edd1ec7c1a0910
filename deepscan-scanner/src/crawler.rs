use crate::budget::CrawlLimits;
use crate::error::{Result, ScanError};
use crate::navigator::{GotoOptions, Navigator};
use crate::result::PageToScan;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tokio::time::{Instant, timeout};
use tracing::{debug, info, warn};
use url::Url;

pub type ProgressCallback = Arc<dyn Fn(usize, String) + Send + Sync>;

/// Path fragments that mark a link as worth visiting early.
pub const IMPORTANT_PATHS: &[&str] = &[
    "/about",
    "/pricing",
    "/features",
    "/products",
    "/services",
    "/contact",
    "/blog",
];

/// No single page may contribute more links than this.
pub const PER_PAGE_LINK_CAP: usize = 30;

/// Breadth-first, same-origin page discovery bounded by a crawl budget.
///
/// Runs on a navigator session owned by the caller and visits pages one at a
/// time. A page that fails to load is marked visited and skipped.
pub struct FrontierCrawler {
    goto_options: GotoOptions,
    progress_callback: Option<ProgressCallback>,
}

impl FrontierCrawler {
    pub fn new() -> Self {
        Self {
            goto_options: GotoOptions::default(),
            progress_callback: None,
        }
    }

    pub fn with_goto_options(mut self, options: GotoOptions) -> Self {
        self.goto_options = options;
        self
    }

    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    pub async fn crawl(
        &self,
        nav: &mut dyn Navigator,
        seed_url: &str,
        limits: &CrawlLimits,
    ) -> Result<Vec<PageToScan>> {
        let seed = normalize_seed(seed_url)?;
        let origin = seed.origin().ascii_serialization();
        let deadline = Instant::now() + limits.max_duration;
        let frontier_cap = frontier_cap(limits.max_urls);
        let max_depth = limits.max_depth.unwrap_or(usize::MAX);

        info!(
            seed = %seed,
            max_urls = limits.max_urls,
            max_duration_ms = limits.max_duration.as_millis() as u64,
            "crawl-start"
        );

        let mut frontier = Frontier::new(frontier_cap);
        let mut visited: HashSet<String> = HashSet::new();
        let mut discovered: Vec<PageToScan> = Vec::new();

        frontier.push(PageToScan::new(seed.to_string(), 0));

        while discovered.len() < limits.max_urls {
            if Instant::now() >= deadline {
                info!(discovered = discovered.len(), "Crawl deadline reached");
                break;
            }

            let Some(entry) = frontier.pop_front() else {
                break;
            };

            if visited.contains(&entry.url) {
                continue;
            }
            if entry.depth > max_depth {
                debug!("Skipping {} (depth {} > {})", entry.url, entry.depth, max_depth);
                continue;
            }

            if let Some(ref callback) = self.progress_callback {
                callback(discovered.len(), entry.url.clone());
            }

            if let Err(e) = self.load(nav, &entry.url).await {
                warn!("Crawl error for {}: {}", entry.url, e);
                visited.insert(entry.url);
                continue;
            }
            visited.insert(entry.url.clone());

            let title = nav.title().await.ok().flatten();
            let depth = entry.depth;
            let current_url = entry.url.clone();
            discovered.push(entry.with_title(title));
            debug!("Discovered {} at depth {}", current_url, depth);

            let remaining = limits.max_urls.saturating_sub(discovered.len());
            if remaining == 0 || depth >= max_depth {
                continue;
            }

            let links = match nav.links().await {
                Ok(links) => links,
                Err(e) => {
                    debug!("Link extraction failed for {}: {}", current_url, e);
                    continue;
                }
            };

            let cap = (remaining * 5).max(10).min(PER_PAGE_LINK_CAP);
            let candidates = rank_links(same_origin_links(&links, &current_url, &origin, cap));

            let mut enqueued = 0;
            for url in candidates {
                if visited.contains(&url) {
                    continue;
                }
                if frontier.push(PageToScan::new(url, depth + 1)) {
                    enqueued += 1;
                }
            }

            let dropped = frontier.enforce_cap();
            if dropped > 0 {
                debug!("Frontier truncated by {} to {}", dropped, frontier_cap);
            }

            debug!("[{}] queued {} new links, frontier {}", current_url, enqueued, frontier.len());
        }

        info!(pages = discovered.len(), "crawl-complete");
        Ok(discovered)
    }

    async fn load(&self, nav: &mut dyn Navigator, url: &str) -> Result<()> {
        let limit = self.goto_options.timeout;
        match timeout(limit, nav.goto(url, &self.goto_options)).await {
            Ok(result) => result,
            Err(_) => Err(ScanError::Timeout(limit.as_millis() as u64)),
        }
    }
}

impl Default for FrontierCrawler {
    fn default() -> Self {
        Self::new()
    }
}

/// Most URLs the frontier may hold for a crawl of `max_urls` pages.
pub fn frontier_cap(max_urls: usize) -> usize {
    max_urls.saturating_mul(20).max(50)
}

/// FIFO of pages waiting to be visited.
///
/// A URL is accepted at most once per crawl, even if it was later dropped by
/// [`Frontier::enforce_cap`].
struct Frontier {
    queue: VecDeque<PageToScan>,
    queued: HashSet<String>,
    cap: usize,
}

impl Frontier {
    fn new(cap: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            cap,
        }
    }

    /// Returns false if the URL was already queued.
    fn push(&mut self, page: PageToScan) -> bool {
        if !self.queued.insert(page.url.clone()) {
            return false;
        }
        self.queue.push_back(page);
        true
    }

    fn pop_front(&mut self) -> Option<PageToScan> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drops the newest entries past the cap. Returns how many were dropped.
    fn enforce_cap(&mut self) -> usize {
        let excess = self.queue.len().saturating_sub(self.cap);
        self.queue.truncate(self.cap);
        excess
    }
}

fn normalize_seed(seed_url: &str) -> Result<Url> {
    let mut url = Url::parse(seed_url).map_err(|e| ScanError::InvalidUrl(format!("{}: {}", seed_url, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ScanError::InvalidUrl(format!("unsupported scheme: {}", seed_url)));
    }
    url.set_fragment(None);
    Ok(url)
}

/// Filters raw hrefs down to crawlable same-origin page URLs, fragments removed.
///
/// Anchors into the current page are dropped, as are duplicates. At most
/// `cap` URLs are returned, in document order.
pub fn same_origin_links(links: &[String], current_url: &str, origin: &str, cap: usize) -> Vec<String> {
    let current_path = Url::parse(current_url).ok().map(|u| u.path().to_string());
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for href in links {
        if out.len() >= cap {
            break;
        }
        let Ok(mut url) = Url::parse(href) else {
            continue;
        };
        if !matches!(url.scheme(), "http" | "https") {
            continue;
        }
        if url.origin().ascii_serialization() != origin {
            continue;
        }
        if url.fragment().is_some() && current_path.as_deref() == Some(url.path()) {
            continue;
        }
        url.set_fragment(None);

        let normalized = url.to_string();
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    }

    out
}

/// 100 for an important path, 0 otherwise, minus the number of path segments.
pub fn priority_score(url: &str) -> i64 {
    let path = Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default();
    let base = if IMPORTANT_PATHS.iter().any(|p| path.contains(p)) {
        100
    } else {
        0
    };
    let segments = path.split('/').filter(|s| !s.is_empty()).count() as i64;
    base - segments
}

/// Sorts by priority score, highest first. Equal scores keep document order.
pub fn rank_links(mut links: Vec<String>) -> Vec<String> {
    links.sort_by_cached_key(|url| std::cmp::Reverse(priority_score(url)));
    links
}
