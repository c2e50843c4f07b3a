//! The rule catalog and its layered construction.

use rustc_hash::FxHashMap;
use tracing::debug;

use warden_core::config::{validate_config, PolicyConfig, ValidationReport};
use warden_core::rules::{Category, PolicyRule};

use super::defaults::builtin_rules;

/// Id-keyed set of effective rules. Owned by one engine instance;
/// fixed after construction.
#[derive(Debug, Default)]
pub struct RuleCatalog {
    rules: FxHashMap<String, PolicyRule>,
}

impl RuleCatalog {
    /// An empty catalog, mainly for tests and programmatic assembly.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A catalog holding only the built-in defaults.
    pub fn with_defaults() -> Self {
        let mut catalog = Self::default();
        for rule in builtin_rules() {
            catalog.add(rule);
        }
        catalog
    }

    /// Build the effective catalog from defaults plus an optional
    /// configuration, in deterministic order:
    ///
    /// 1. register built-in defaults;
    /// 2. validate the configuration structurally (reported, never thrown;
    ///    an invalid configuration leaves the defaults active);
    /// 3. apply `ruleOverrides` in place (unmatched ids warn);
    /// 4. register `customRules` by id (last-write-wins);
    /// 5. force-disable all rules in categories gated `enabled: false`.
    ///
    /// Category enforcement and auto-fix settings do not filter
    /// membership here; they are consumed during evaluation and
    /// remediation.
    pub fn from_config(config: Option<&PolicyConfig>) -> (Self, ValidationReport) {
        let mut catalog = Self::with_defaults();
        let Some(config) = config else {
            return (catalog, ValidationReport::new());
        };

        let mut report = validate_config(config);

        for (id, rule_override) in &config.rule_overrides {
            match catalog.rules.get_mut(id) {
                Some(rule) => {
                    if let Some(enabled) = rule_override.enabled {
                        rule.enabled = enabled;
                    }
                    if let Some(severity) = rule_override.severity {
                        rule.severity = severity;
                    }
                }
                None => {
                    report.warning(format!("ruleOverrides: no rule with id '{id}'"));
                }
            }
        }

        for raw in &config.custom_rules {
            // Malformed rules were already reported by validation.
            if let Ok(rule) = serde_json::from_value::<PolicyRule>(raw.clone()) {
                if !rule.id.is_empty() {
                    debug!(id = %rule.id, "registering custom rule");
                    catalog.add(rule);
                }
            }
        }

        for (name, category_policy) in &config.categories {
            if category_policy.enabled {
                continue;
            }
            if let Some(category) = Category::parse(name) {
                for rule in catalog.rules.values_mut() {
                    if rule.category == category {
                        rule.enabled = false;
                    }
                }
            }
        }

        (catalog, report)
    }

    /// Register a rule. A later registration with the same id replaces
    /// the earlier one.
    pub fn add(&mut self, rule: PolicyRule) {
        self.rules.insert(rule.id.clone(), rule);
    }

    /// Remove a rule by id. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.rules.remove(id).is_some()
    }

    pub fn get(&self, id: &str) -> Option<&PolicyRule> {
        self.rules.get(id)
    }

    /// All rules, ordered by id for deterministic output.
    pub fn list(&self) -> Vec<&PolicyRule> {
        let mut rules: Vec<&PolicyRule> = self.rules.values().collect();
        rules.sort_by(|a, b| a.id.cmp(&b.id));
        rules
    }

    pub fn list_by_category(&self, category: Category) -> Vec<&PolicyRule> {
        let mut rules: Vec<&PolicyRule> = self
            .rules
            .values()
            .filter(|r| r.category == category)
            .collect();
        rules.sort_by(|a, b| a.id.cmp(&b.id));
        rules
    }

    /// Enable or disable a rule by id. Returns whether it existed.
    pub fn toggle(&mut self, id: &str, enabled: bool) -> bool {
        match self.rules.get_mut(id) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Enabled rules whose scope matches the given resource kind,
    /// ordered by id.
    pub fn effective(&self, scope: &str) -> Vec<&PolicyRule> {
        let mut rules: Vec<&PolicyRule> = self
            .rules
            .values()
            .filter(|r| r.enabled && r.scope == scope)
            .collect();
        rules.sort_by(|a, b| a.id.cmp(&b.id));
        rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
