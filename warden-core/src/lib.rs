//! # warden-core
//!
//! Core building blocks for the Warden policy engine: rule and violation
//! types, the field-path document accessor, quantity parsing, the
//! configuration entity with structural validation, and the error enums.
//! No engine logic lives here; `warden-engine` builds on these types.

pub mod config;
pub mod document;
pub mod errors;
pub mod rules;
