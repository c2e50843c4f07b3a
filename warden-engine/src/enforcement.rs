//! Effective enforcement settings derived from the configuration.
//!
//! Category gating removes rules from the effective set at catalog
//! construction; the settings here are the ones the catalog *retains*
//! for later use: enforcement level (violation vs warning downgrade
//! during evaluation), auto-fix permission (checked by the remediator),
//! and namespace exclusions (checked by the aggregator).

use std::collections::BTreeMap;

use warden_core::config::{Enforcement, PolicyConfig};
use warden_core::rules::Category;

#[derive(Debug, Clone, Copy, Default)]
struct CategorySettings {
    enforcement: Option<Enforcement>,
    auto_fix: Option<bool>,
}

/// Resolved enforcement policy: global level plus per-category overrides.
#[derive(Debug, Clone, Default)]
pub struct EnforcementPolicy {
    global: Enforcement,
    global_auto_fix: bool,
    excluded_namespaces: Vec<String>,
    categories: BTreeMap<Category, CategorySettings>,
}

impl EnforcementPolicy {
    /// Derive the policy from an optional configuration. Invalid
    /// enforcement strings were already reported during validation and
    /// fall back to the global default here.
    pub fn from_config(config: Option<&PolicyConfig>) -> Self {
        let Some(config) = config else {
            return Self::default();
        };

        let mut categories = BTreeMap::new();
        for (name, policy) in &config.categories {
            if let Some(category) = Category::parse(name) {
                categories.insert(
                    category,
                    CategorySettings {
                        enforcement: policy.enforcement.as_deref().and_then(Enforcement::parse),
                        auto_fix: policy.auto_fix,
                    },
                );
            }
        }

        Self {
            global: Enforcement::parse(&config.global.enforcement).unwrap_or_default(),
            global_auto_fix: config.global.auto_fix,
            excluded_namespaces: config.global.excluded_namespaces.clone(),
            categories,
        }
    }

    /// The enforcement level in effect for a category.
    pub fn enforcement_for(&self, category: Category) -> Enforcement {
        self.categories
            .get(&category)
            .and_then(|s| s.enforcement)
            .unwrap_or(self.global)
    }

    /// Whether auto-remediation is permitted for a category.
    pub fn auto_fix_allowed(&self, category: Category) -> bool {
        self.categories
            .get(&category)
            .and_then(|s| s.auto_fix)
            .unwrap_or(self.global_auto_fix)
    }

    /// Whether a namespace is excluded from aggregation.
    pub fn is_excluded(&self, namespace: &str) -> bool {
        self.excluded_namespaces.iter().any(|ns| ns == namespace)
    }
}
