//! The policy configuration entity.
//!
//! Mirrors the external JSON shape (camelCase). Enforcement levels are
//! carried as strings and validated against the closed set separately,
//! so a typo is a reported problem rather than a failed parse that
//! throws away the whole document.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::errors::ConfigError;
use crate::rules::Severity;

/// Enforcement level for a category or the whole organization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Enforcement {
    /// Deny rules block: their failures are blocking violations.
    #[default]
    Enforce,
    /// Deny rules are downgraded: every failure lands in warnings.
    Warn,
    /// Record only; classification-wise identical to `warn`.
    Audit,
}

impl Enforcement {
    pub const LEVELS: [&'static str; 3] = ["enforce", "warn", "audit"];

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "enforce" => Some(Self::Enforce),
            "warn" => Some(Self::Warn),
            "audit" => Some(Self::Audit),
            _ => None,
        }
    }

    /// Whether deny actions keep their blocking classification.
    pub fn blocks(&self) -> bool {
        matches!(self, Self::Enforce)
    }
}

/// Top-level configuration supplied by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolicyConfig {
    pub organization: Organization,
    pub global: GlobalPolicy,
    /// Per-category gating and enforcement, keyed by category name.
    pub categories: BTreeMap<String, CategoryPolicy>,
    /// Custom rules kept as raw JSON so one malformed rule is reported
    /// individually instead of failing the whole document.
    pub custom_rules: Vec<Value>,
    /// Overrides applied to existing rules by id.
    pub rule_overrides: BTreeMap<String, RuleOverride>,
    pub notifications: Notifications,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Organization {
    pub name: String,
    pub environment: String,
    /// Compliance frameworks the organization targets (informational).
    pub compliance: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlobalPolicy {
    /// One of `enforce` / `warn` / `audit`; validated, not parsed.
    pub enforcement: String,
    pub auto_fix: bool,
    pub excluded_namespaces: Vec<String>,
}

impl Default for GlobalPolicy {
    fn default() -> Self {
        Self {
            enforcement: "enforce".to_string(),
            auto_fix: false,
            excluded_namespaces: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CategoryPolicy {
    pub enabled: bool,
    /// Falls back to the global level when unset.
    pub enforcement: Option<String>,
    /// Falls back to the global flag when unset.
    pub auto_fix: Option<bool>,
}

impl Default for CategoryPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            enforcement: None,
            auto_fix: None,
        }
    }
}

/// Partial overwrite of an existing rule, matched by id.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RuleOverride {
    pub enabled: Option<bool>,
    pub severity: Option<Severity>,
    pub enforcement: Option<String>,
}

/// Notification settings. Carried for the external notifier; the core
/// itself never sends anything.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Notifications {
    pub enabled: bool,
    pub channels: Vec<String>,
}

impl PolicyConfig {
    /// Load a configuration file, or `None` when the caller should run
    /// with defaults only. Absence and malformed content both fall back;
    /// neither propagates an error past this boundary.
    pub fn load(path: &Path) -> Option<Self> {
        match Self::try_load(path) {
            Ok(config) => Some(config),
            Err(ConfigError::FileNotFound { path }) => {
                debug!(%path, "no policy configuration file, using defaults");
                None
            }
            Err(err) => {
                warn!(%err, "failed to load policy configuration, using defaults");
                None
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}
