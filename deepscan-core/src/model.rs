// Issues, page states and scan results

use crate::classifier::{IssueTier, Tier};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Named UI configuration a page was audited in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StateName {
    Default,
    CookiesDismissed,
    MenuOpen,
    ModalOpen,
    AccordionOpen,
    TabSwitched,
}

impl StateName {
    pub fn as_str(&self) -> &'static str {
        match self {
            StateName::Default => "default",
            StateName::CookiesDismissed => "cookies-dismissed",
            StateName::MenuOpen => "menu-open",
            StateName::ModalOpen => "modal-open",
            StateName::AccordionOpen => "accordion-open",
            StateName::TabSwitched => "tab-switched",
        }
    }
}

impl fmt::Display for StateName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub name: StateName,
    pub description: String,
    pub success: bool,
}

impl PageState {
    pub fn new(name: StateName, description: impl Into<String>, success: bool) -> Self {
        Self {
            name,
            description: description.into(),
            success,
        }
    }

    pub fn default_state() -> Self {
        Self::new(StateName::Default, "Page as loaded", true)
    }

    /// `default` is always audited; other states only when they were reached.
    pub fn is_auditable(&self) -> bool {
        self.name == StateName::Default || self.success
    }
}

/// One node-level result from the accessibility checker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawFinding {
    pub rule: String,
    pub impact: Option<String>,
    pub description: String,
    pub help_url: String,
    pub selector: String,
    pub html: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepScanIssue {
    pub rule: String,
    pub impact: Option<String>,
    pub description: String,
    pub help_url: String,
    pub selector: String,
    pub html: String,
    pub page_url: String,
    pub page_state: StateName,
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_reference: Option<String>,
    pub requires_manual_review: bool,
}

impl DeepScanIssue {
    pub fn from_finding(finding: RawFinding, page_url: &str, state: StateName, tier: &IssueTier) -> Self {
        Self {
            rule: finding.rule,
            impact: finding.impact,
            description: finding.description,
            help_url: finding.help_url,
            selector: finding.selector,
            html: finding.html,
            page_url: page_url.to_string(),
            page_state: state,
            tier: tier.tier,
            wcag_reference: tier.wcag_reference.map(str::to_string),
            requires_manual_review: tier.requires_manual_review,
        }
    }

    /// `rule::selector::pageUrl`. The page state is not part of it.
    pub fn fingerprint(&self) -> String {
        format!("{}::{}::{}", self.rule, self.selector, self.page_url)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageScanResult {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub states: Vec<PageState>,
    pub issues: Vec<DeepScanIssue>,
    pub violations: usize,
    pub advisories: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepScanResult {
    pub url: String,
    pub profile: String,
    pub pages_scanned: usize,
    pub states_audited: usize,
    pub total_issues: usize,
    pub violations_count: usize,
    pub advisories_count: usize,
    pub pages: Vec<PageScanResult>,
    pub issues: Vec<DeepScanIssue>,
    pub started_at: chrono::DateTime<chrono::Utc>,
    pub completed_at: chrono::DateTime<chrono::Utc>,
    pub duration_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    /// Base64-encoded PNG of the seed page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<String>,
}
