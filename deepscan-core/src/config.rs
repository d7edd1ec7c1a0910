// Profile resolution: budgeted QUICK/SMART/DEEP or the legacy three-tier config

use crate::error::{DeepScanError, Result};
use deepscan_scanner::{BudgetProfile, CrawlBudget, CrawlLimits, resolve_budget};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How much UI state exploration a page gets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanProfile {
    Quick,
    Standard,
    Deep,
}

impl ScanProfile {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanProfile::Quick => "quick",
            ScanProfile::Standard => "standard",
            ScanProfile::Deep => "deep",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "quick" => Some(ScanProfile::Quick),
            "standard" => Some(ScanProfile::Standard),
            "deep" => Some(ScanProfile::Deep),
            _ => None,
        }
    }
}

impl fmt::Display for ScanProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<BudgetProfile> for ScanProfile {
    fn from(profile: BudgetProfile) -> Self {
        match profile {
            BudgetProfile::Quick => ScanProfile::Quick,
            BudgetProfile::Smart => ScanProfile::Standard,
            BudgetProfile::Deep => ScanProfile::Deep,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyConfig {
    pub max_pages: usize,
    pub max_depth: usize,
    pub timeout_ms: u64,
}

pub fn legacy_config(profile: ScanProfile) -> LegacyConfig {
    match profile {
        ScanProfile::Quick => LegacyConfig {
            max_pages: 1,
            max_depth: 0,
            timeout_ms: 60_000,
        },
        ScanProfile::Standard => LegacyConfig {
            max_pages: 3,
            max_depth: 1,
            timeout_ms: 120_000,
        },
        ScanProfile::Deep => LegacyConfig {
            max_pages: 5,
            max_depth: 2,
            timeout_ms: 180_000,
        },
    }
}

/// Capabilities switched on by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FeatureFlags {
    pub budgeted_profiles: bool,
}

/// Either a budgeted config or the legacy one; serializes to exactly one of the two shapes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ScanConfig {
    Budgeted {
        profile: BudgetProfile,
        budget: CrawlBudget,
    },
    Legacy(LegacyConfig),
}

impl ScanConfig {
    pub fn crawl_limits(&self) -> CrawlLimits {
        match self {
            ScanConfig::Budgeted { budget, .. } => CrawlLimits::from(budget),
            ScanConfig::Legacy(legacy) => CrawlLimits {
                max_urls: legacy.max_pages,
                max_duration: Duration::from_millis(legacy.timeout_ms),
                max_depth: Some(legacy.max_depth),
            },
        }
    }
}

/// A profile name resolved against the feature flags, plus the name it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProfile {
    pub name: String,
    pub explorer: ScanProfile,
    pub config: ScanConfig,
}

/// Resolve a profile name to its scan config.
///
/// Lower-case legacy names always give the legacy config. Upper-case budgeted
/// names give a budget when `budgeted_profiles` is on, and the matching legacy
/// tier when it is off.
pub fn resolve_scan_config(name: &str, flags: FeatureFlags) -> Result<ScanConfig> {
    Ok(resolve_profile(name, flags)?.config)
}

pub fn resolve_profile(name: &str, flags: FeatureFlags) -> Result<ResolvedProfile> {
    if let Some(profile) = ScanProfile::from_name(name) {
        return Ok(ResolvedProfile {
            name: name.to_string(),
            explorer: profile,
            config: ScanConfig::Legacy(legacy_config(profile)),
        });
    }

    let budgeted = BudgetProfile::from_name(name)
        .ok_or_else(|| DeepScanError::InvalidProfile(name.to_string()))?;
    let explorer = ScanProfile::from(budgeted);

    let config = if flags.budgeted_profiles {
        ScanConfig::Budgeted {
            profile: budgeted,
            budget: resolve_budget(budgeted),
        }
    } else {
        ScanConfig::Legacy(legacy_config(explorer))
    };

    Ok(ResolvedProfile {
        name: name.to_string(),
        explorer,
        config,
    })
}
