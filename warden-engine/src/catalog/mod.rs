//! Rule catalog: layered construction from defaults, overrides, custom
//! rules, and category gating.

pub mod defaults;
pub mod registry;

pub use defaults::builtin_rules;
pub use registry::RuleCatalog;
