//! Structural validation of a policy configuration.
//!
//! Validation reports, it never throws: an invalid configuration leaves
//! the built-in defaults active and the caller decides what to do with
//! the report.

use serde::Serialize;

use crate::rules::{Category, PolicyRule};

use super::policy_config::{Enforcement, PolicyConfig};

/// A structured validation result: `{is_valid, errors, warnings}`.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
    }

    pub fn warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

/// Validate a configuration's structure and enum values.
///
/// Unmatched rule-override ids are checked later, during catalog
/// layering, because they require the effective default set.
pub fn validate_config(config: &PolicyConfig) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.organization.name.is_empty() {
        report.error("organization.name is required");
    }
    if config.organization.environment.is_empty() {
        report.warning("organization.environment is not set");
    }

    check_enforcement(&mut report, "global.enforcement", &config.global.enforcement);

    for (name, category) in &config.categories {
        if Category::parse(name).is_none() {
            report.error(format!("unknown category '{name}'"));
        }
        if let Some(ref level) = category.enforcement {
            check_enforcement(&mut report, &format!("categories.{name}.enforcement"), level);
        }
    }

    for (id, rule_override) in &config.rule_overrides {
        if let Some(ref level) = rule_override.enforcement {
            check_enforcement(&mut report, &format!("ruleOverrides.{id}.enforcement"), level);
        }
    }

    for (index, raw) in config.custom_rules.iter().enumerate() {
        match serde_json::from_value::<PolicyRule>(raw.clone()) {
            Ok(rule) if rule.id.is_empty() => {
                report.error(format!("customRules[{index}]: rule id is empty"));
            }
            Ok(rule) if rule.conditions.is_empty() => {
                report.warning(format!("customRules[{index}] ('{}') has no conditions", rule.id));
            }
            Ok(_) => {}
            Err(err) => {
                report.error(format!("customRules[{index}] is malformed: {err}"));
            }
        }
    }

    report
}

fn check_enforcement(report: &mut ValidationReport, field: &str, level: &str) {
    if Enforcement::parse(level).is_none() {
        report.error(format!(
            "{field}: invalid enforcement level '{level}' (expected one of {})",
            Enforcement::LEVELS.join(", ")
        ));
    }
}
