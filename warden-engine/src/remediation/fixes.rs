//! The fix routine registry.
//!
//! Each routine inspects a resource and emits the patches that bring it
//! into compliance, touching container-level fields only where they are
//! currently absent (except `remove_privileged`, which strips the flag
//! wherever it is set). Routines are pure: applying one twice leaves
//! the document identical after the second application.

use serde_json::{json, Value};

use super::patch::Patch;

/// A named remediation routine: resource in, patch set out.
pub type FixRoutine = fn(&Value) -> Vec<Patch>;

/// Resolve a routine by the name a rule's `fixAction` declares.
pub fn lookup_routine(name: &str) -> Option<FixRoutine> {
    match name {
        "add_security_context" => Some(add_security_context),
        "remove_privileged" => Some(remove_privileged),
        "set_run_as_non_root" => Some(set_run_as_non_root),
        "add_resource_limits" => Some(add_resource_limits),
        "add_probes" => Some(add_probes),
        _ => None,
    }
}

/// All registered routine names.
pub fn routine_names() -> &'static [&'static str] {
    &[
        "add_security_context",
        "remove_privileged",
        "set_run_as_non_root",
        "add_resource_limits",
        "add_probes",
    ]
}

/// JSON pointers to every container in the pod template.
fn container_pointers(resource: &Value) -> Vec<String> {
    resource
        .pointer("/spec/template/spec/containers")
        .and_then(Value::as_array)
        .map(|containers| {
            (0..containers.len())
                .map(|i| format!("/spec/template/spec/containers/{i}"))
                .collect()
        })
        .unwrap_or_default()
}

/// Inject a default security context into containers missing one.
fn add_security_context(resource: &Value) -> Vec<Patch> {
    container_pointers(resource)
        .into_iter()
        .map(|ptr| {
            Patch::set_if_absent(
                format!("{ptr}/securityContext"),
                json!({"runAsNonRoot": true, "allowPrivilegeEscalation": false}),
            )
        })
        .collect()
}

/// Strip the privileged flag wherever it is set.
fn remove_privileged(resource: &Value) -> Vec<Patch> {
    container_pointers(resource)
        .into_iter()
        .map(|ptr| Patch::remove(format!("{ptr}/securityContext/privileged")))
        .collect()
}

/// Force non-root execution where the field is absent. An explicit
/// `runAsNonRoot: false` is an operator decision and is left alone.
fn set_run_as_non_root(resource: &Value) -> Vec<Patch> {
    container_pointers(resource)
        .into_iter()
        .map(|ptr| Patch::set_if_absent(format!("{ptr}/securityContext/runAsNonRoot"), json!(true)))
        .collect()
}

/// Inject default resource limits and requests where missing.
fn add_resource_limits(resource: &Value) -> Vec<Patch> {
    container_pointers(resource)
        .into_iter()
        .flat_map(|ptr| {
            [
                Patch::set_if_absent(
                    format!("{ptr}/resources/limits"),
                    json!({"cpu": "500m", "memory": "512Mi"}),
                ),
                Patch::set_if_absent(
                    format!("{ptr}/resources/requests"),
                    json!({"cpu": "100m", "memory": "128Mi"}),
                ),
            ]
        })
        .collect()
}

/// Inject default liveness/readiness probes where missing.
fn add_probes(resource: &Value) -> Vec<Patch> {
    let probe = json!({"tcpSocket": {"port": 8080}, "initialDelaySeconds": 10, "periodSeconds": 10});
    container_pointers(resource)
        .into_iter()
        .flat_map(|ptr| {
            [
                Patch::set_if_absent(format!("{ptr}/livenessProbe"), probe.clone()),
                Patch::set_if_absent(format!("{ptr}/readinessProbe"), probe.clone()),
            ]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remediation::patch::apply_all;
    use serde_json::json;

    fn resource(containers: Value) -> Value {
        json!({
            "kind": "Deployment",
            "metadata": {"name": "t", "namespace": "default"},
            "spec": {"template": {"spec": {"containers": containers}}}
        })
    }

    #[test]
    fn test_add_security_context_only_where_missing() {
        let mut doc = resource(json!([
            {"name": "a"},
            {"name": "b", "securityContext": {"runAsUser": 1000}}
        ]));
        let patches = add_security_context(&doc);
        assert!(apply_all(&mut doc, &patches).unwrap());
        let containers = &doc["spec"]["template"]["spec"]["containers"];
        assert_eq!(containers[0]["securityContext"]["runAsNonRoot"], json!(true));
        // Existing context untouched.
        assert_eq!(containers[1]["securityContext"], json!({"runAsUser": 1000}));
    }

    #[test]
    fn test_remove_privileged_strips_flag() {
        let mut doc = resource(json!([
            {"name": "a", "securityContext": {"privileged": true, "runAsUser": 0}}
        ]));
        let patches = remove_privileged(&doc);
        assert!(apply_all(&mut doc, &patches).unwrap());
        let ctx = &doc["spec"]["template"]["spec"]["containers"][0]["securityContext"];
        assert!(ctx.get("privileged").is_none());
        assert_eq!(ctx["runAsUser"], json!(0));
    }

    #[test]
    fn test_set_run_as_non_root_respects_explicit_false() {
        let mut doc = resource(json!([
            {"name": "a", "securityContext": {"runAsNonRoot": false}},
            {"name": "b"}
        ]));
        let patches = set_run_as_non_root(&doc);
        assert!(apply_all(&mut doc, &patches).unwrap());
        let containers = &doc["spec"]["template"]["spec"]["containers"];
        assert_eq!(containers[0]["securityContext"]["runAsNonRoot"], json!(false));
        assert_eq!(containers[1]["securityContext"]["runAsNonRoot"], json!(true));
    }

    #[test]
    fn test_add_resource_limits_injects_defaults() {
        let mut doc = resource(json!([{"name": "a"}]));
        let patches = add_resource_limits(&doc);
        assert!(apply_all(&mut doc, &patches).unwrap());
        let resources = &doc["spec"]["template"]["spec"]["containers"][0]["resources"];
        assert_eq!(resources["limits"], json!({"cpu": "500m", "memory": "512Mi"}));
        assert_eq!(resources["requests"], json!({"cpu": "100m", "memory": "128Mi"}));
    }

    #[test]
    fn test_routines_are_idempotent() {
        for name in routine_names() {
            let routine = lookup_routine(name).unwrap();
            let mut doc = resource(json!([
                {"name": "a"},
                {"name": "b", "securityContext": {"privileged": true}}
            ]));
            let patches = routine(&doc);
            apply_all(&mut doc, &patches).unwrap();
            let after_first = doc.clone();
            let patches = routine(&doc);
            let changed = apply_all(&mut doc, &patches).unwrap();
            assert!(!changed, "{name} changed the document on second application");
            assert_eq!(doc, after_first, "{name} is not idempotent");
        }
    }

    #[test]
    fn test_unknown_routine_is_none() {
        assert!(lookup_routine("reticulate_splines").is_none());
    }
}
