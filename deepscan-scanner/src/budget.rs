// Crawl budgets for the QUICK / SMART / DEEP scan profiles

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Budgeted scan profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BudgetProfile {
    Quick,
    Smart,
    Deep,
}

impl BudgetProfile {
    pub const ALL: [BudgetProfile; 3] = [BudgetProfile::Quick, BudgetProfile::Smart, BudgetProfile::Deep];

    pub fn as_str(&self) -> &'static str {
        match self {
            BudgetProfile::Quick => "QUICK",
            BudgetProfile::Smart => "SMART",
            BudgetProfile::Deep => "DEEP",
        }
    }

    /// Parses the exact upper-case profile name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "QUICK" => Some(BudgetProfile::Quick),
            "SMART" => Some(BudgetProfile::Smart),
            "DEEP" => Some(BudgetProfile::Deep),
            _ => None,
        }
    }
}

impl fmt::Display for BudgetProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a budget expects the frontier to be worked through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CrawlStrategy {
    Complete,
    PrioritySampling,
    Comprehensive,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlBudget {
    pub max_urls: usize,
    pub max_duration_ms: u64,
    pub strategy: CrawlStrategy,
    pub sitemap_first: bool,
    pub priority_order: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enterprise_detection_threshold: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resumable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkpoint_interval: Option<usize>,
}

/// Resolve a budgeted profile to its crawl budget.
///
/// `max_urls` and `max_duration_ms` are strictly ascending QUICK < SMART < DEEP.
pub fn resolve_budget(profile: BudgetProfile) -> CrawlBudget {
    let order = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();

    match profile {
        BudgetProfile::Quick => CrawlBudget {
            max_urls: 1,
            max_duration_ms: 60_000,
            strategy: CrawlStrategy::Complete,
            sitemap_first: false,
            priority_order: order(&["homepage"]),
            enterprise_detection_threshold: None,
            resumable: None,
            checkpoint_interval: None,
        },
        BudgetProfile::Smart => CrawlBudget {
            max_urls: 25,
            max_duration_ms: 300_000,
            strategy: CrawlStrategy::PrioritySampling,
            sitemap_first: true,
            priority_order: order(&["homepage", "navigation", "conversion", "content"]),
            enterprise_detection_threshold: Some(500),
            resumable: None,
            checkpoint_interval: None,
        },
        BudgetProfile::Deep => CrawlBudget {
            max_urls: 100,
            max_duration_ms: 900_000,
            strategy: CrawlStrategy::Comprehensive,
            sitemap_first: true,
            priority_order: order(&["homepage", "navigation", "conversion", "content", "long-tail"]),
            enterprise_detection_threshold: None,
            resumable: Some(true),
            checkpoint_interval: Some(10),
        },
    }
}

/// The limits the frontier crawler actually enforces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlLimits {
    pub max_urls: usize,
    pub max_duration: Duration,
    /// `None` means no depth limit; the crawl is still bounded by URLs and time.
    pub max_depth: Option<usize>,
}

impl From<&CrawlBudget> for CrawlLimits {
    fn from(budget: &CrawlBudget) -> Self {
        Self {
            max_urls: budget.max_urls,
            max_duration: Duration::from_millis(budget.max_duration_ms),
            max_depth: None,
        }
    }
}
