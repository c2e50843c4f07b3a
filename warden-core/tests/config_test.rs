//! Tests for the Warden configuration system.

use serde_json::json;

use warden_core::config::{validate_config, Enforcement, PolicyConfig};

/// Helper: write a config document to a temp file and load it.
fn load(doc: &serde_json::Value) -> Option<PolicyConfig> {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("warden.json");
    std::fs::write(&path, serde_json::to_string_pretty(doc).unwrap()).unwrap();
    PolicyConfig::load(&path)
}

#[test]
fn test_full_config_round_trip() {
    let config = load(&json!({
        "organization": {
            "name": "acme",
            "environment": "prod",
            "compliance": ["cis", "soc2"]
        },
        "global": {
            "enforcement": "enforce",
            "autoFix": true,
            "excludedNamespaces": ["kube-system", "monitoring"]
        },
        "categories": {
            "security": {"enforcement": "enforce"},
            "cost": {"enabled": false, "autoFix": false}
        },
        "customRules": [{
            "id": "acme-team-label",
            "name": "Require team label",
            "severity": "medium",
            "category": "compliance",
            "conditions": [{"field": "metadata.labels.team", "operator": "exists"}],
            "actions": [{"type": "warn", "message": "Add a team label"}]
        }],
        "ruleOverrides": {
            "disallow-privileged": {"severity": "high"}
        },
        "notifications": {"enabled": true, "channels": ["#platform-alerts"]}
    }))
    .expect("config should load");

    assert_eq!(config.organization.compliance, vec!["cis", "soc2"]);
    assert_eq!(config.global.excluded_namespaces.len(), 2);
    assert_eq!(config.custom_rules.len(), 1);
    assert!(config.notifications.enabled);

    let report = validate_config(&config);
    assert!(report.is_valid, "errors: {:?}", report.errors);
}

#[test]
fn test_partial_config_fills_defaults() {
    let config = load(&json!({
        "organization": {"name": "acme"}
    }))
    .expect("partial config should load");

    assert_eq!(config.global.enforcement, "enforce");
    assert!(!config.global.auto_fix);
    assert!(config.categories.is_empty());
    assert!(config.custom_rules.is_empty());

    // Missing environment is a warning, not an error.
    let report = validate_config(&config);
    assert!(report.is_valid);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn test_malformed_document_never_escapes_the_boundary() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("warden.json");
    std::fs::write(&path, "{ definitely not json").unwrap();
    assert!(PolicyConfig::load(&path).is_none());
}

#[test]
fn test_enforcement_levels_parse() {
    assert_eq!(Enforcement::parse("enforce"), Some(Enforcement::Enforce));
    assert_eq!(Enforcement::parse("warn"), Some(Enforcement::Warn));
    assert_eq!(Enforcement::parse("audit"), Some(Enforcement::Audit));
    assert_eq!(Enforcement::parse("strict"), None);
    assert!(Enforcement::Enforce.blocks());
    assert!(!Enforcement::Warn.blocks());
    assert!(!Enforcement::Audit.blocks());
}
