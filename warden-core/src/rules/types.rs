//! Rule, condition, and action types.
//!
//! The JSON shape mirrors the external rule documents (camelCase field
//! names, snake_case enum values), so custom rules supplied through the
//! configuration file deserialize directly into these types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rule severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Policy category a rule is tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Security,
    Compliance,
    Performance,
    Cost,
    Operations,
}

impl Category {
    /// All known categories, used for configuration validation.
    pub const ALL: [Category; 5] = [
        Self::Security,
        Self::Compliance,
        Self::Performance,
        Self::Cost,
        Self::Operations,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Compliance => "compliance",
            Self::Performance => "performance",
            Self::Cost => "cost",
            Self::Operations => "operations",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.as_str() == s)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Condition operator. Exhaustively matched in the evaluator, so an
/// unrecognized operator is a deserialization error, not a silent `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    RegexMatch,
    Exists,
    NotExists,
}

/// How per-element results of an array projection combine into one
/// condition outcome. Only meaningful when the field path projects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quantifier {
    /// Every projected element must satisfy the operator. An empty
    /// projection passes vacuously. This is the default: policy
    /// requirements read universally ("every container must ...").
    #[default]
    All,
    /// At least one projected element must satisfy the operator.
    Any,
}

/// Action type attached to a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Deny,
    Warn,
    Modify,
    Audit,
    Notify,
}

/// A single field-path test.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    /// Dotted field path; at most one `[*]` projection segment.
    pub field: String,
    pub operator: Operator,
    /// Comparator literal. Ignored by `exists` / `not_exists`.
    #[serde(default)]
    pub value: Value,
    #[serde(default)]
    pub quantifier: Quantifier,
    #[serde(default)]
    pub description: String,
}

/// An action a rule declares for its failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Action {
    #[serde(rename = "type")]
    pub action_type: ActionType,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub auto_fix: bool,
    /// Name of the remediation routine, resolved by the remediator.
    #[serde(default)]
    pub fix_action: Option<String>,
}

/// A named, categorized policy unit composed of conditions and actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyRule {
    /// Unique key within a catalog; later registrations replace earlier ones.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Resource kind this rule applies to (e.g. `"Deployment"`).
    #[serde(default = "default_scope")]
    pub scope: String,
    pub conditions: Vec<Condition>,
    pub actions: Vec<Action>,
}

fn default_true() -> bool {
    true
}

fn default_scope() -> String {
    "Deployment".to_string()
}

impl PolicyRule {
    /// Classification is a property of the rule's action set: any `deny`
    /// action makes every failure of this rule a blocking violation.
    pub fn is_blocking(&self) -> bool {
        self.actions
            .iter()
            .any(|a| a.action_type == ActionType::Deny)
    }

    /// Auto-fix eligibility is rule-scoped: any action with `autoFix`
    /// marks every failure of this rule as fixable.
    pub fn auto_fixable(&self) -> bool {
        self.actions.iter().any(|a| a.auto_fix)
    }

    /// The declared remediation routine, if any. The first action naming
    /// one wins.
    pub fn fix_action(&self) -> Option<&str> {
        self.actions
            .iter()
            .find_map(|a| a.fix_action.as_deref())
    }

    /// The message attached to the rule's first action, falling back to
    /// the rule description.
    pub fn primary_message(&self) -> &str {
        self.actions
            .iter()
            .find(|a| !a.message.is_empty())
            .map(|a| a.message.as_str())
            .unwrap_or(&self.description)
    }
}
