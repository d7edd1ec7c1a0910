//! Accessibility checker seam.
//!
//! The rule engine itself lives outside this crate. An auditor inspects the
//! page currently loaded in a [`Navigator`] and reports axe-style violations.

use crate::error::{DeepScanError, Result};
use crate::model::RawFinding;
use async_trait::async_trait;
use deepscan_scanner::Navigator;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditReport {
    #[serde(default)]
    pub violations: Vec<AuditViolation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditViolation {
    pub id: String,
    #[serde(default)]
    pub nodes: Vec<AuditNode>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub help_url: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Rule-level impact, used when a node carries none of its own.
    #[serde(default)]
    pub impact: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditNode {
    #[serde(default)]
    pub target: Vec<String>,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub impact: Option<String>,
}

impl AuditReport {
    /// Flatten to one finding per violating node.
    pub fn into_findings(self) -> Vec<RawFinding> {
        let mut findings = Vec::new();
        for violation in self.violations {
            for node in violation.nodes {
                findings.push(RawFinding {
                    rule: violation.id.clone(),
                    impact: node.impact.or_else(|| violation.impact.clone()),
                    description: violation.description.clone(),
                    help_url: violation.help_url.clone(),
                    selector: node.target.join(" "),
                    html: node.html,
                });
            }
        }
        findings
    }
}

#[async_trait]
pub trait AccessibilityAuditor: Send + Sync {
    /// Audit whatever the navigator currently shows.
    async fn run(&self, page: &dyn Navigator) -> Result<AuditReport>;

    /// Human-readable name for this auditor.
    fn name(&self) -> &'static str;
}

/// Runs an external checker program once per audited state.
///
/// The page HTML is written to the program's stdin and the page URL is passed
/// in `DEEPSCAN_PAGE_URL`. The program must print an [`AuditReport`] as JSON
/// on stdout and exit successfully.
pub struct ExternalAuditor {
    program: PathBuf,
    args: Vec<String>,
}

impl ExternalAuditor {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }
}

#[async_trait]
impl AccessibilityAuditor for ExternalAuditor {
    async fn run(&self, page: &dyn Navigator) -> Result<AuditReport> {
        let html = page.content().await?;
        let url = page.current_url().unwrap_or_default().to_string();

        debug!("Running {} for {}", self.program.display(), url);

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .env("DEEPSCAN_PAGE_URL", &url)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| DeepScanError::Audit(format!("failed to start {}: {}", self.program.display(), e)))?;

        // Feed stdin while draining stdout so neither side can block the other.
        let stdin = child.stdin.take();
        let feed = async move {
            let Some(mut stdin) = stdin else {
                return Ok(());
            };
            match stdin.write_all(html.as_bytes()).await {
                Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
                    debug!("Checker closed stdin early");
                    Ok(())
                }
                other => other,
            }
        };

        let (fed, output) = tokio::join!(feed, child.wait_with_output());
        let output = output?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DeepScanError::Audit(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                stderr.trim()
            )));
        }

        fed?;

        let report: AuditReport = serde_json::from_slice(&output.stdout)?;
        Ok(report)
    }

    fn name(&self) -> &'static str {
        "external"
    }
}
