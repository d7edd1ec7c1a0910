//! Deepscan core: multi-state accessibility scanning across a crawled site.
//!
//! - [`classifier`] maps rule ids to violation/advisory tiers
//! - [`explorer`] walks a loaded page through its UI states
//! - [`dedupe`] collapses repeated findings
//! - [`orchestrator`] ties crawl, exploration and auditing together

pub mod audit;
pub mod classifier;
pub mod config;
pub mod dedupe;
pub mod error;
pub mod explorer;
pub mod model;
pub mod orchestrator;
pub mod platform;
pub mod report;

pub use audit::{AccessibilityAuditor, AuditNode, AuditReport, AuditViolation, ExternalAuditor};
pub use classifier::{IssueTier, Tier, TierSummary, WcagLevel, classify, summarize_by_tier};
pub use config::{FeatureFlags, LegacyConfig, ScanConfig, ScanProfile, resolve_profile, resolve_scan_config};
pub use dedupe::dedupe;
pub use error::DeepScanError;
pub use explorer::{Exploration, ExplorerOptions, StateExplorer, Transition};
pub use model::{DeepScanIssue, DeepScanResult, PageScanResult, PageState, RawFinding, StateName};
pub use orchestrator::{ScanOptions, ScanOrchestrator, ScanProgressCallback};
pub use report::{ReportFormat, render_json_report, render_report, render_text_report};
