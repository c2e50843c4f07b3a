//! Policy rule model: rules, conditions, actions, and their closed enums.

pub mod types;

pub use types::{
    Action, ActionType, Category, Condition, Operator, PolicyRule, Quantifier, Severity,
};
