//! Property tests: every fix routine is idempotent over arbitrary
//! container shapes.

use proptest::prelude::*;
use serde_json::{json, Value};

use warden_engine::remediation::{lookup_routine, routine_names};

#[derive(Debug, Clone)]
struct ContainerShape {
    has_security_context: bool,
    privileged: Option<bool>,
    run_as_non_root: Option<bool>,
    has_limits: bool,
    has_requests: bool,
    has_liveness: bool,
    has_readiness: bool,
}

fn container_shape() -> impl Strategy<Value = ContainerShape> {
    (
        any::<bool>(),
        proptest::option::of(any::<bool>()),
        proptest::option::of(any::<bool>()),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(has_security_context, privileged, run_as_non_root, has_limits, has_requests, has_liveness, has_readiness)| {
                ContainerShape {
                    has_security_context,
                    privileged,
                    run_as_non_root,
                    has_limits,
                    has_requests,
                    has_liveness,
                    has_readiness,
                }
            },
        )
}

fn render(shapes: &[ContainerShape]) -> Value {
    let containers: Vec<Value> = shapes
        .iter()
        .enumerate()
        .map(|(i, shape)| {
            let mut container = json!({"name": format!("c{i}"), "image": "registry.internal/app:1"});
            if shape.has_security_context || shape.privileged.is_some() || shape.run_as_non_root.is_some() {
                let mut ctx = serde_json::Map::new();
                if let Some(privileged) = shape.privileged {
                    ctx.insert("privileged".into(), json!(privileged));
                }
                if let Some(non_root) = shape.run_as_non_root {
                    ctx.insert("runAsNonRoot".into(), json!(non_root));
                }
                container["securityContext"] = Value::Object(ctx);
            }
            let mut resources = serde_json::Map::new();
            if shape.has_limits {
                resources.insert("limits".into(), json!({"cpu": "250m"}));
            }
            if shape.has_requests {
                resources.insert("requests".into(), json!({"cpu": "50m"}));
            }
            if !resources.is_empty() {
                container["resources"] = Value::Object(resources);
            }
            if shape.has_liveness {
                container["livenessProbe"] = json!({"httpGet": {"path": "/healthz", "port": 8080}});
            }
            if shape.has_readiness {
                container["readinessProbe"] = json!({"httpGet": {"path": "/ready", "port": 8080}});
            }
            container
        })
        .collect();

    json!({
        "kind": "Deployment",
        "metadata": {"name": "prop", "namespace": "default"},
        "spec": {"template": {"spec": {"containers": containers}}}
    })
}

fn apply(routine_name: &str, doc: &mut Value) -> bool {
    let routine = lookup_routine(routine_name).unwrap();
    let patches = routine(doc);
    warden_engine::remediation::patch::apply_all(doc, &patches).unwrap()
}

proptest! {
    #[test]
    fn test_every_routine_is_idempotent(shapes in proptest::collection::vec(container_shape(), 0..5)) {
        for name in routine_names() {
            let mut doc = render(&shapes);
            apply(name, &mut doc);
            let after_first = doc.clone();
            let changed = apply(name, &mut doc);
            prop_assert!(!changed, "{} reported a change on second application", name);
            prop_assert_eq!(&doc, &after_first, "{} mutated an already-fixed document", name);
        }
    }

    #[test]
    fn test_remove_privileged_never_touches_other_fields(shapes in proptest::collection::vec(container_shape(), 1..4)) {
        let mut doc = render(&shapes);
        let before = doc.clone();
        apply("remove_privileged", &mut doc);

        let containers = doc["spec"]["template"]["spec"]["containers"].as_array().unwrap();
        let original = before["spec"]["template"]["spec"]["containers"].as_array().unwrap();
        for (fixed, orig) in containers.iter().zip(original.iter()) {
            prop_assert!(fixed.pointer("/securityContext/privileged").is_none());
            // Everything except the privileged flag is untouched.
            let mut expected = orig.clone();
            if let Some(ctx) = expected.pointer_mut("/securityContext").and_then(Value::as_object_mut) {
                ctx.remove("privileged");
            }
            prop_assert_eq!(fixed, &expected);
        }
    }
}
