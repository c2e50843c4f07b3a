//! Remediation: named, idempotent fix routines expressed as patches.

pub mod fixes;
pub mod patch;
pub mod remediator;

pub use fixes::{lookup_routine, routine_names};
pub use patch::Patch;
pub use remediator::{FixOutcome, Remediator};
