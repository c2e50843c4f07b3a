//! Configuration system for Warden.
//! JSON document, loaded once at engine construction, immutable after.
//! Content problems surface as a [`ValidationReport`], never as errors.

pub mod policy_config;
pub mod validation;

pub use policy_config::{
    CategoryPolicy, Enforcement, GlobalPolicy, Notifications, Organization, PolicyConfig,
    RuleOverride,
};
pub use validation::{validate_config, ValidationReport};
