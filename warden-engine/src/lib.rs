//! # warden-engine
//!
//! The Warden policy engine: layered rule catalog, condition evaluator,
//! patch-based auto-remediation, and fleet compliance aggregation over a
//! pluggable resource store.
//!
//! Entry point is [`engine::PolicyEngine`], which owns one immutable
//! catalog per instance. Side-by-side what-if comparisons use two engine
//! instances over the same store snapshot; catalogs are never shared.

pub mod catalog;
pub mod compliance;
pub mod enforcement;
pub mod engine;
pub mod evaluation;
pub mod remediation;
pub mod store;

pub use engine::PolicyEngine;
