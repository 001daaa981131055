//! Admission policy applied to candidate rules.

use crate::types::Rule;

/// Admission predicate applied to every rule before it enters a system,
/// both at load time and on `add_rule`.
///
/// Implementations must be pure, side-effect-free, and deterministic: the
/// engine may evaluate the same rule any number of times and expects the
/// same answer.
pub trait Validator: Send + Sync {
    /// Whether the rule may be admitted.
    fn is_valid(&self, rule: &Rule) -> bool;
}

/// The default policy: any structurally complete rule with a non-empty
/// output id is admissible, wildcards included.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValidator;

impl Validator for DefaultValidator {
    fn is_valid(&self, rule: &Rule) -> bool {
        !rule.output_id().is_empty() && rule.inputs().len() == rule.schema().len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::types::{Column, Schema};

    #[test]
    fn default_validator_accepts_complete_rule() {
        let schema = Arc::new(Schema::new(vec![Column::text("brand", 1)]).unwrap());
        let rule = Rule::from_values(
            &schema,
            &HashMap::from([("rule_output_id".to_owned(), "100".to_owned())]),
        )
        .unwrap();
        assert!(DefaultValidator.is_valid(&rule));
    }
}
