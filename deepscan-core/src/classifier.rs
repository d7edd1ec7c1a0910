// Rule classification: confirmed WCAG violations vs best-practice advisories

use crate::model::DeepScanIssue;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Counts toward compliance.
    Violation,
    /// Best practice only.
    Advisory,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Violation => "violation",
            Tier::Advisory => "advisory",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WCAG conformance level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WcagLevel {
    A,
    AA,
    AAA,
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WcagLevel::A => write!(f, "A"),
            WcagLevel::AA => write!(f, "AA"),
            WcagLevel::AAA => write!(f, "AAA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueTier {
    pub tier: Tier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_reference: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wcag_level: Option<WcagLevel>,
    pub requires_manual_review: bool,
    pub reason: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct TierSummary {
    pub violations: usize,
    pub advisories: usize,
    pub total: usize,
}

pub struct RuleEntry {
    pub id: &'static str,
    pub wcag: Option<(&'static str, WcagLevel)>,
    pub manual_review: bool,
    pub reason: &'static str,
}

const fn rule(
    id: &'static str,
    wcag: Option<(&'static str, WcagLevel)>,
    manual_review: bool,
    reason: &'static str,
) -> RuleEntry {
    RuleEntry {
        id,
        wcag,
        manual_review,
        reason,
    }
}

use WcagLevel::{A, AA, AAA};

pub static VIOLATION_RULES: &[RuleEntry] = &[
    rule("area-alt", Some(("1.1.1", A)), false, "Image map areas need alternative text"),
    rule("image-alt", Some(("1.1.1", A)), false, "Images need alternative text"),
    rule("input-image-alt", Some(("1.1.1", A)), false, "Image buttons need alternative text"),
    rule("object-alt", Some(("1.1.1", A)), false, "Embedded objects need alternative text"),
    rule("role-img-alt", Some(("1.1.1", A)), false, "Elements with role=img need an accessible name"),
    rule("svg-img-alt", Some(("1.1.1", A)), false, "SVG images need an accessible name"),
    rule("audio-caption", Some(("1.2.1", A)), true, "Audio needs a transcript; presence cannot be verified automatically"),
    rule("video-caption", Some(("1.2.2", A)), true, "Video needs captions; caption quality cannot be verified automatically"),
    rule("definition-list", Some(("1.3.1", A)), false, "Definition lists must be structured correctly"),
    rule("dlitem", Some(("1.3.1", A)), false, "Definition items must be inside a definition list"),
    rule("list", Some(("1.3.1", A)), false, "Lists must only contain list items"),
    rule("listitem", Some(("1.3.1", A)), false, "List items must be inside a list"),
    rule("aria-required-children", Some(("1.3.1", A)), false, "ARIA roles must contain their required children"),
    rule("aria-required-parent", Some(("1.3.1", A)), false, "ARIA roles must be inside their required parent"),
    rule("td-headers-attr", Some(("1.3.1", A)), false, "Table cell headers must refer to cells in the same table"),
    rule("th-has-data-cells", Some(("1.3.1", A)), false, "Table headers must describe data cells"),
    rule("autocomplete-valid", Some(("1.3.5", AA)), false, "Autocomplete values must be valid for the field"),
    rule("css-orientation-lock", Some(("1.3.4", AA)), false, "Content must not be locked to one orientation"),
    rule("link-in-text-block", Some(("1.4.1", A)), false, "Links must be distinguishable without relying on color"),
    rule("color-contrast", Some(("1.4.3", AA)), false, "Text must meet the minimum contrast ratio"),
    rule("meta-viewport", Some(("1.4.4", AA)), false, "Zooming and scaling must not be disabled"),
    rule("color-contrast-enhanced", Some(("1.4.6", AAA)), false, "Text must meet the enhanced contrast ratio"),
    rule("avoid-inline-spacing", Some(("1.4.12", AA)), false, "Inline text spacing must be adjustable"),
    rule("scrollable-region-focusable", Some(("2.1.1", A)), false, "Scrollable regions must be keyboard reachable"),
    rule("server-side-image-map", Some(("2.1.1", A)), false, "Server-side image maps are not keyboard accessible"),
    rule("meta-refresh", Some(("2.2.1", A)), false, "Timed refreshes must not be used"),
    rule("blink", Some(("2.2.2", A)), false, "Blinking content must not be used"),
    rule("marquee", Some(("2.2.2", A)), false, "Scrolling marquee content must not be used"),
    rule("bypass", Some(("2.4.1", A)), false, "Pages need a way to bypass repeated blocks"),
    rule("document-title", Some(("2.4.2", A)), false, "Documents need a title"),
    rule("link-name", Some(("2.4.4", A)), false, "Links need discernible text"),
    rule("target-size", Some(("2.5.8", AA)), false, "Touch targets must be large enough"),
    rule("html-has-lang", Some(("3.1.1", A)), false, "The html element needs a lang attribute"),
    rule("html-lang-valid", Some(("3.1.1", A)), false, "The lang attribute must be a valid language"),
    rule("html-xml-lang-mismatch", Some(("3.1.1", A)), false, "lang and xml:lang must agree"),
    rule("valid-lang", Some(("3.1.2", AA)), false, "lang attributes must use valid values"),
    rule("form-field-multiple-labels", Some(("3.3.2", A)), false, "Form fields must not have multiple labels"),
    rule("duplicate-id-aria", Some(("4.1.1", A)), false, "IDs referenced by ARIA must be unique"),
    rule("aria-allowed-attr", Some(("4.1.2", A)), false, "ARIA attributes must be allowed for the role"),
    rule("aria-command-name", Some(("4.1.2", A)), false, "ARIA commands need an accessible name"),
    rule("aria-hidden-body", Some(("4.1.2", A)), false, "aria-hidden must not be set on the document body"),
    rule("aria-hidden-focus", Some(("4.1.2", A)), false, "aria-hidden elements must not be focusable"),
    rule("aria-input-field-name", Some(("4.1.2", A)), false, "ARIA input fields need an accessible name"),
    rule("aria-required-attr", Some(("4.1.2", A)), false, "ARIA roles must have their required attributes"),
    rule("aria-roles", Some(("4.1.2", A)), false, "ARIA roles must be valid"),
    rule("aria-toggle-field-name", Some(("4.1.2", A)), false, "ARIA toggle fields need an accessible name"),
    rule("aria-valid-attr", Some(("4.1.2", A)), false, "ARIA attributes must be valid names"),
    rule("aria-valid-attr-value", Some(("4.1.2", A)), false, "ARIA attributes must have valid values"),
    rule("button-name", Some(("4.1.2", A)), false, "Buttons need discernible text"),
    rule("frame-title", Some(("4.1.2", A)), false, "Frames need a title"),
    rule("input-button-name", Some(("4.1.2", A)), false, "Input buttons need discernible text"),
    rule("label", Some(("4.1.2", A)), false, "Form elements need labels"),
    rule("nested-interactive", Some(("4.1.2", A)), false, "Interactive controls must not be nested"),
    rule("select-name", Some(("4.1.2", A)), false, "Select elements need an accessible name"),
];

pub static ADVISORY_RULES: &[RuleEntry] = &[
    rule("accesskeys", None, false, "Best practice: accesskey values should be unique"),
    rule("aria-allowed-role", None, false, "Best practice: ARIA role should suit the element"),
    rule("aria-dialog-name", None, false, "Best practice: dialogs should have an accessible name"),
    rule("aria-text", None, false, "Best practice: role=text should have no focusable descendants"),
    rule("aria-treeitem-name", None, false, "Best practice: tree items should have an accessible name"),
    rule("empty-heading", None, false, "Best practice: headings should not be empty"),
    rule("empty-table-header", None, false, "Best practice: table headers should have text"),
    rule("frame-tested", None, false, "Best practice: frames should be tested with the checker"),
    rule("heading-order", None, false, "Structure: heading levels should increase by one"),
    rule("identical-links-same-purpose", None, true, "Best practice: same-named links should share a purpose; needs human judgement"),
    rule("image-redundant-alt", None, false, "Best practice: alt text should not repeat surrounding text"),
    rule("label-title-only", None, false, "Best practice: fields should not be labelled by title alone"),
    rule("landmark-banner-is-top-level", None, false, "Structure: banner landmark should be top level"),
    rule("landmark-complementary-is-top-level", None, false, "Structure: complementary landmark should be top level"),
    rule("landmark-contentinfo-is-top-level", None, false, "Structure: contentinfo landmark should be top level"),
    rule("landmark-main-is-top-level", None, false, "Structure: main landmark should be top level"),
    rule("landmark-no-duplicate-banner", None, false, "Structure: at most one banner landmark"),
    rule("landmark-no-duplicate-contentinfo", None, false, "Structure: at most one contentinfo landmark"),
    rule("landmark-no-duplicate-main", None, false, "Structure: at most one main landmark"),
    rule("landmark-one-main", None, false, "Structure: page should have a main landmark"),
    rule("landmark-unique", None, false, "Structure: landmarks should be distinguishable"),
    rule("meta-viewport-large", None, false, "Best practice: allow significant zoom"),
    rule("page-has-heading-one", None, false, "Structure: page should have a level-one heading"),
    rule("presentation-role-conflict", None, false, "Best practice: presentational elements should stay presentational"),
    rule("region", None, false, "Structure: content should be inside landmarks"),
    rule("scope-attr-valid", None, false, "Best practice: scope should be used correctly"),
    rule("skip-link", None, false, "Best practice: skip links should have a focusable target"),
    rule("tabindex", None, false, "Best practice: avoid positive tabindex"),
    rule("table-duplicate-name", None, false, "Best practice: table caption and summary should differ"),
];

static VIOLATIONS: LazyLock<HashMap<&'static str, &'static RuleEntry>> =
    LazyLock::new(|| VIOLATION_RULES.iter().map(|r| (r.id, r)).collect());

static ADVISORIES: LazyLock<HashMap<&'static str, &'static RuleEntry>> =
    LazyLock::new(|| ADVISORY_RULES.iter().map(|r| (r.id, r)).collect());

fn to_tier(tier: Tier, entry: &RuleEntry) -> IssueTier {
    IssueTier {
        tier,
        wcag_reference: entry.wcag.map(|(reference, _)| reference),
        wcag_level: entry.wcag.map(|(_, level)| level),
        requires_manual_review: entry.manual_review,
        reason: entry.reason.to_string(),
    }
}

/// Classify a rule id. Total: unknown ids are reported as violations.
pub fn classify(rule_id: &str) -> IssueTier {
    if let Some(entry) = VIOLATIONS.get(rule_id) {
        return to_tier(Tier::Violation, entry);
    }
    if let Some(entry) = ADVISORIES.get(rule_id) {
        return to_tier(Tier::Advisory, entry);
    }

    IssueTier {
        tier: Tier::Violation,
        wcag_reference: None,
        wcag_level: None,
        requires_manual_review: false,
        reason: format!("Unknown rule: {} (defaulting to violation)", rule_id),
    }
}

/// Counts issues per tier by re-classifying each rule id.
pub fn summarize_by_tier(issues: &[DeepScanIssue]) -> TierSummary {
    let mut summary = TierSummary::default();
    for issue in issues {
        match classify(&issue.rule).tier {
            Tier::Violation => summary.violations += 1,
            Tier::Advisory => summary.advisories += 1,
        }
    }
    summary.total = issues.len();
    summary
}
