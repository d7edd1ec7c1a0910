// Report rendering for scan results

use crate::classifier::Tier;
use crate::error::Result;
use crate::model::DeepScanResult;
use colored::Colorize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

pub fn render_report(result: &DeepScanResult, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(render_text_report(result)),
        ReportFormat::Json => render_json_report(result),
    }
}

pub fn render_json_report(result: &DeepScanResult) -> Result<String> {
    Ok(serde_json::to_string_pretty(result)?)
}

pub fn render_text_report(result: &DeepScanResult) -> String {
    let mut report = String::new();
    let rule = "━".repeat(52);

    report.push_str(&format!("{}\n\n", rule));
    report.push_str("# Summary:\n");
    report.push_str(&format!("  Target: {}\n", result.url));
    report.push_str(&format!("  Profile: {}\n", result.profile));
    report.push_str(&format!("  Pages scanned: {}\n", result.pages_scanned));
    report.push_str(&format!("  States audited: {}\n", result.states_audited));
    report.push_str(&format!("  Total issues: {}\n", result.total_issues));
    report.push_str(&format!("  Violations: {}\n", result.violations_count));
    report.push_str(&format!("  Advisories: {}\n", result.advisories_count));
    if let Some(ref platform) = result.platform {
        report.push_str(&format!("  Platform: {}\n", platform));
    }
    report.push_str(&format!("  Duration: {:.1}s\n", result.duration_ms as f64 / 1000.0));
    report.push_str(&format!("\n{}\n\n", rule));

    for page in &result.pages {
        match page.title {
            Some(ref title) => report.push_str(&format!("## {} ({})\n", page.url, title)),
            None => report.push_str(&format!("## {}\n", page.url)),
        }

        let states: Vec<String> = page
            .states
            .iter()
            .map(|s| {
                if s.success {
                    s.name.to_string()
                } else {
                    format!("{} (not reached)", s.name)
                }
            })
            .collect();
        report.push_str(&format!("  States: {}\n", states.join(", ")));
        report.push_str(&format!(
            "  {} violations, {} advisories\n\n",
            page.violations, page.advisories
        ));

        for issue in &page.issues {
            let tier = match issue.tier {
                Tier::Violation => issue.tier.as_str().red().bold().to_string(),
                Tier::Advisory => issue.tier.as_str().yellow().to_string(),
            };
            let wcag = issue
                .wcag_reference
                .as_ref()
                .map(|r| format!(" WCAG {}", r))
                .unwrap_or_default();
            let review = if issue.requires_manual_review {
                " [manual review]".cyan().to_string()
            } else {
                String::new()
            };

            report.push_str(&format!(
                "  {} {}{}{} {}\n",
                tier,
                issue.rule,
                wcag,
                review,
                format!("[{}]", issue.page_state).as_str().bright_black()
            ));
            report.push_str(&format!("      {}\n", issue.selector));
        }
        report.push('\n');
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!(ReportFormat::from_str("JSON"), Some(ReportFormat::Json));
        assert_eq!(ReportFormat::from_str("text"), Some(ReportFormat::Text));
        assert_eq!(ReportFormat::from_str("csv"), None);
    }
}
