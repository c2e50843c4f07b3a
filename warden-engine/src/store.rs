//! Resource store: the external collaborator that owns cluster access.
//!
//! The engine performs an optimistic read-modify-write during
//! remediation with no lock held across the window; a concurrent
//! external mutation of the same resource between read and write is
//! overwritten (last-writer-wins). Implementations wanting stronger
//! consistency should reject `replace` on version mismatch and surface
//! that as a transport error.

use std::sync::Mutex;

use rustc_hash::FxHashMap;
use serde_json::Value;

use warden_core::errors::StoreError;

/// Synchronous access to workload resource documents. Deadlines, retry,
/// and authentication all belong to the implementation, not the engine.
pub trait ResourceStore {
    fn fetch_one(&self, namespace: &str, name: &str) -> Result<Value, StoreError>;

    /// Fetch every resource in a namespace; `"*"` means the whole fleet.
    fn fetch_many(&self, namespace: &str) -> Result<Vec<Value>, StoreError>;

    fn replace(&self, namespace: &str, name: &str, resource: &Value) -> Result<(), StoreError>;
}

/// In-memory store backing tests and what-if evaluation.
#[derive(Debug, Default)]
pub struct MemoryStore {
    resources: Mutex<FxHashMap<(String, String), Value>>,
    replaces: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, namespace: &str, name: &str, resource: Value) {
        self.resources
            .lock()
            .expect("store lock poisoned")
            .insert((namespace.to_string(), name.to_string()), resource);
    }

    /// Number of `replace` calls observed, for write-back assertions.
    pub fn replace_count(&self) -> usize {
        *self.replaces.lock().expect("store lock poisoned")
    }
}

impl ResourceStore for MemoryStore {
    fn fetch_one(&self, namespace: &str, name: &str) -> Result<Value, StoreError> {
        self.resources
            .lock()
            .expect("store lock poisoned")
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
            .ok_or_else(|| StoreError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            })
    }

    fn fetch_many(&self, namespace: &str) -> Result<Vec<Value>, StoreError> {
        let resources = self.resources.lock().expect("store lock poisoned");
        let mut out: Vec<(String, Value)> = resources
            .iter()
            .filter(|((ns, _), _)| namespace == "*" || ns == namespace)
            .map(|((ns, name), v)| (format!("{ns}/{name}"), v.clone()))
            .collect();
        // Deterministic listing order for reproducible reports.
        out.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(out.into_iter().map(|(_, v)| v).collect())
    }

    fn replace(&self, namespace: &str, name: &str, resource: &Value) -> Result<(), StoreError> {
        let mut resources = self.resources.lock().expect("store lock poisoned");
        let key = (namespace.to_string(), name.to_string());
        if !resources.contains_key(&key) {
            return Err(StoreError::NotFound {
                namespace: namespace.to_string(),
                name: name.to_string(),
            });
        }
        resources.insert(key, resource.clone());
        *self.replaces.lock().expect("store lock poisoned") += 1;
        Ok(())
    }
}
