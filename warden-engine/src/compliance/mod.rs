//! Compliance aggregation: fleet or namespace reports.

pub mod aggregator;
pub mod types;

pub use aggregator::ComplianceAggregator;
pub use types::ComplianceReport;
