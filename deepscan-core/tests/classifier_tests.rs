// Tests for rule classification

use deepscan_core::classifier::{ADVISORY_RULES, VIOLATION_RULES};
use deepscan_core::{DeepScanIssue, RawFinding, StateName, Tier, WcagLevel, classify, summarize_by_tier};

fn issue(rule: &str, selector: &str) -> DeepScanIssue {
    let finding = RawFinding {
        rule: rule.to_string(),
        impact: None,
        description: String::new(),
        help_url: String::new(),
        selector: selector.to_string(),
        html: String::new(),
    };
    DeepScanIssue::from_finding(finding, "https://example.com/", StateName::Default, &classify(rule))
}

// ============================================================================
// Lookup Tests
// ============================================================================

#[test]
fn test_known_violation() {
    let tier = classify("image-alt");
    assert_eq!(tier.tier, Tier::Violation);
    assert_eq!(tier.wcag_reference, Some("1.1.1"));
    assert_eq!(tier.wcag_level, Some(WcagLevel::A));
    assert!(!tier.requires_manual_review);
}

#[test]
fn test_contrast_is_level_aa() {
    let tier = classify("color-contrast");
    assert_eq!(tier.tier, Tier::Violation);
    assert_eq!(tier.wcag_level, Some(WcagLevel::AA));
}

#[test]
fn test_captions_need_manual_review() {
    assert!(classify("video-caption").requires_manual_review);
    assert!(classify("audio-caption").requires_manual_review);
}

#[test]
fn test_known_advisory() {
    let tier = classify("region");
    assert_eq!(tier.tier, Tier::Advisory);
    assert_eq!(tier.wcag_reference, None);

    assert_eq!(classify("heading-order").tier, Tier::Advisory);
    assert_eq!(classify("landmark-one-main").tier, Tier::Advisory);
}

#[test]
fn test_unknown_rule_defaults_to_violation() {
    let tier = classify("made-up-rule-123");
    assert_eq!(tier.tier, Tier::Violation);
    assert!(!tier.requires_manual_review);
    assert_eq!(tier.wcag_reference, None);
    assert_eq!(tier.reason, "Unknown rule: made-up-rule-123 (defaulting to violation)");
}

#[test]
fn test_empty_rule_id_is_classified() {
    let tier = classify("");
    assert_eq!(tier.tier, Tier::Violation);
    assert_eq!(tier.reason, "Unknown rule:  (defaulting to violation)");
}

#[test]
fn test_rule_ids_are_case_sensitive() {
    assert!(classify("IMAGE-ALT").reason.starts_with("Unknown rule"));
}

#[test]
fn test_classification_is_deterministic() {
    for entry in VIOLATION_RULES.iter().chain(ADVISORY_RULES.iter()) {
        assert_eq!(classify(entry.id), classify(entry.id));
    }
}

#[test]
fn test_every_table_entry_resolves_to_its_own_table() {
    for entry in VIOLATION_RULES {
        assert_eq!(classify(entry.id).tier, Tier::Violation, "{}", entry.id);
    }
    for entry in ADVISORY_RULES {
        assert_eq!(classify(entry.id).tier, Tier::Advisory, "{}", entry.id);
    }
}

// ============================================================================
// Summary Tests
// ============================================================================

#[test]
fn test_summarize_by_tier() {
    let issues = vec![
        issue("image-alt", "img.logo"),
        issue("color-contrast", "p.muted"),
        issue("region", "div.content"),
        issue("made-up-rule-123", "span"),
    ];

    let summary = summarize_by_tier(&issues);
    assert_eq!(summary.violations, 3);
    assert_eq!(summary.advisories, 1);
    assert_eq!(summary.total, 4);
}

#[test]
fn test_summary_reclassifies_instead_of_trusting_issue() {
    let mut stale = issue("region", "div.content");
    stale.tier = Tier::Violation;

    let summary = summarize_by_tier(&[stale]);
    assert_eq!(summary.violations, 0);
    assert_eq!(summary.advisories, 1);
}

#[test]
fn test_summarize_empty() {
    let summary = summarize_by_tier(&[]);
    assert_eq!(summary.total, 0);
    assert_eq!(summary.violations, 0);
    assert_eq!(summary.advisories, 0);
}
