//! Built-in default rules.
//!
//! Every category carries at least one rule so category gating and the
//! compliance recommendations have real coverage out of the box. All
//! defaults are scoped to `Deployment`.

use serde_json::{json, Value};

use warden_core::rules::{
    Action, ActionType, Category, Condition, Operator, PolicyRule, Quantifier, Severity,
};

const CONTAINERS: &str = "spec.template.spec.containers[*]";

fn condition(field: String, operator: Operator, value: Value, description: &str) -> Condition {
    Condition {
        field,
        operator,
        value,
        quantifier: Quantifier::All,
        description: description.to_string(),
    }
}

fn action(action_type: ActionType, message: &str) -> Action {
    Action {
        action_type,
        message: message.to_string(),
        auto_fix: false,
        fix_action: None,
    }
}

fn fix(fix_action: &str) -> Action {
    Action {
        action_type: ActionType::Modify,
        message: String::new(),
        auto_fix: true,
        fix_action: Some(fix_action.to_string()),
    }
}

fn rule(
    id: &str,
    name: &str,
    description: &str,
    severity: Severity,
    category: Category,
    conditions: Vec<Condition>,
    actions: Vec<Action>,
) -> PolicyRule {
    PolicyRule {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        severity,
        category,
        enabled: true,
        scope: "Deployment".to_string(),
        conditions,
        actions,
    }
}

/// The built-in default rule set, registered before any configuration
/// layering.
pub fn builtin_rules() -> Vec<PolicyRule> {
    vec![
        rule(
            "require-security-context",
            "Require container security context",
            "Every container must declare a securityContext",
            Severity::High,
            Category::Security,
            vec![condition(
                format!("{CONTAINERS}.securityContext"),
                Operator::Exists,
                Value::Null,
                "container securityContext is set",
            )],
            vec![
                action(ActionType::Deny, "Containers must declare a security context"),
                fix("add_security_context"),
            ],
        ),
        rule(
            "disallow-privileged",
            "Disallow privileged containers",
            "Privileged mode grants full host access and is forbidden",
            Severity::Critical,
            Category::Security,
            vec![condition(
                format!("{CONTAINERS}.securityContext.privileged"),
                Operator::NotEquals,
                json!(true),
                "container is not privileged",
            )],
            vec![
                action(ActionType::Deny, "Privileged containers are not allowed"),
                fix("remove_privileged"),
            ],
        ),
        rule(
            "require-non-root",
            "Require non-root execution",
            "Containers must run as a non-root user",
            Severity::High,
            Category::Security,
            vec![condition(
                format!("{CONTAINERS}.securityContext.runAsNonRoot"),
                Operator::Equals,
                json!(true),
                "runAsNonRoot is true",
            )],
            vec![
                action(ActionType::Warn, "Containers should run as non-root"),
                fix("set_run_as_non_root"),
            ],
        ),
        rule(
            "require-readonly-rootfs",
            "Require read-only root filesystem",
            "Containers should mount their root filesystem read-only",
            Severity::Medium,
            Category::Security,
            vec![condition(
                format!("{CONTAINERS}.securityContext.readOnlyRootFilesystem"),
                Operator::Equals,
                json!(true),
                "readOnlyRootFilesystem is true",
            )],
            vec![action(
                ActionType::Warn,
                "Root filesystems should be read-only",
            )],
        ),
        rule(
            "disallow-privilege-escalation",
            "Disallow privilege escalation",
            "allowPrivilegeEscalation must not be enabled",
            Severity::High,
            Category::Security,
            vec![condition(
                format!("{CONTAINERS}.securityContext.allowPrivilegeEscalation"),
                Operator::NotEquals,
                json!(true),
                "privilege escalation is not allowed",
            )],
            vec![action(
                ActionType::Deny,
                "Privilege escalation is not allowed",
            )],
        ),
        rule(
            "require-app-label",
            "Require app label",
            "Workloads must carry the standard app label",
            Severity::Medium,
            Category::Compliance,
            vec![condition(
                "metadata.labels.app".to_string(),
                Operator::Exists,
                Value::Null,
                "metadata.labels.app is set",
            )],
            vec![action(ActionType::Warn, "Add a metadata.labels.app label")],
        ),
        rule(
            "disallow-latest-tag",
            "Disallow :latest image tags",
            "Images must be pinned to a version tag",
            Severity::High,
            Category::Compliance,
            vec![condition(
                format!("{CONTAINERS}.image"),
                Operator::NotContains,
                json!(":latest"),
                "image tag is pinned",
            )],
            vec![action(
                ActionType::Deny,
                "Images must not use the :latest tag",
            )],
        ),
        rule(
            "require-image-registry",
            "Require a named image registry",
            "Images must be pulled from an explicit registry host",
            Severity::Medium,
            Category::Compliance,
            vec![condition(
                format!("{CONTAINERS}.image"),
                Operator::RegexMatch,
                json!(r"^[^/]+\.[^/]+/"),
                "image references a registry host",
            )],
            vec![action(
                ActionType::Warn,
                "Pull images from an explicit registry host",
            )],
        ),
        rule(
            "require-liveness-probe",
            "Require liveness probe",
            "Containers must declare a liveness probe",
            Severity::Medium,
            Category::Performance,
            vec![condition(
                format!("{CONTAINERS}.livenessProbe"),
                Operator::Exists,
                Value::Null,
                "livenessProbe is set",
            )],
            vec![
                action(ActionType::Warn, "Add a liveness probe"),
                fix("add_probes"),
            ],
        ),
        rule(
            "require-readiness-probe",
            "Require readiness probe",
            "Containers must declare a readiness probe",
            Severity::Medium,
            Category::Performance,
            vec![condition(
                format!("{CONTAINERS}.readinessProbe"),
                Operator::Exists,
                Value::Null,
                "readinessProbe is set",
            )],
            vec![
                action(ActionType::Warn, "Add a readiness probe"),
                fix("add_probes"),
            ],
        ),
        rule(
            "require-resource-limits",
            "Require resource limits",
            "Containers must declare cpu/memory limits",
            Severity::Medium,
            Category::Cost,
            vec![condition(
                format!("{CONTAINERS}.resources.limits"),
                Operator::Exists,
                Value::Null,
                "resources.limits is set",
            )],
            vec![
                action(ActionType::Warn, "Set container resource limits"),
                fix("add_resource_limits"),
            ],
        ),
        rule(
            "require-resource-requests",
            "Require resource requests",
            "Containers must declare cpu/memory requests",
            Severity::Low,
            Category::Cost,
            vec![condition(
                format!("{CONTAINERS}.resources.requests"),
                Operator::Exists,
                Value::Null,
                "resources.requests is set",
            )],
            vec![
                action(ActionType::Warn, "Set container resource requests"),
                fix("add_resource_limits"),
            ],
        ),
        rule(
            "limit-replica-count",
            "Limit replica count",
            "Deployments should not exceed 10 replicas without review",
            Severity::Low,
            Category::Cost,
            vec![condition(
                "spec.replicas".to_string(),
                Operator::LessThan,
                json!(11),
                "replicas is at most 10",
            )],
            vec![action(
                ActionType::Warn,
                "Review deployments running more than 10 replicas",
            )],
        ),
        rule(
            "require-min-replicas",
            "Require at least two replicas",
            "Single-replica deployments have no availability margin",
            Severity::Low,
            Category::Operations,
            vec![condition(
                "spec.replicas".to_string(),
                Operator::GreaterThan,
                json!(1),
                "replicas is at least 2",
            )],
            vec![action(
                ActionType::Warn,
                "Run at least two replicas for availability",
            )],
        ),
    ]
}
