//! Quantity parsing for numeric comparisons.
//!
//! Workload manifests express cpu and memory as suffixed strings.
//! Comparison semantics: integers and floats pass through; a trailing
//! `m` means the value is already in the smallest unit, so `"500m"`
//! parses as 500; `Ki`/`Mi`/`Gi` multiply by powers of 1024; anything
//! unparseable (including null and missing values) compares as 0.

use serde_json::Value;

/// Parse a resolved value into a comparable number.
pub fn parse_quantity(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => parse_quantity_str(s),
        _ => 0.0,
    }
}

fn parse_quantity_str(s: &str) -> f64 {
    let s = s.trim();

    for (suffix, factor) in [("Ki", 1024.0), ("Mi", 1024.0 * 1024.0), ("Gi", 1024.0 * 1024.0 * 1024.0)] {
        if let Some(prefix) = s.strip_suffix(suffix) {
            return prefix.parse::<f64>().map_or(0.0, |v| v * factor);
        }
    }

    // Millivalue suffix: the leading integer is already in the smallest
    // unit ("500m" -> 500).
    if let Some(prefix) = s.strip_suffix('m') {
        if let Ok(v) = prefix.parse::<i64>() {
            return v as f64;
        }
    }

    s.parse::<f64>().unwrap_or(0.0)
}
