use std::sync::Arc;

use thiserror::Error;

use crate::parse::ParseError;
use crate::store::StoreError;
use crate::types::{Rule, SchemaError};

/// Unified error type covering schema validation, rule parsing, storage,
/// and admission.
///
/// Returned by [`RuleSystem`](crate::RuleSystem) construction and write
/// operations; queries never error on well-formed inputs.
#[derive(Debug, Error)]
pub enum RulebookError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A rule cannot be admitted without a non-empty `rule_output_id`.
    #[error("rule has no rule_output_id; an output id is required")]
    MissingOutputId,

    /// Admission found existing rules overlapping the candidate on every
    /// column; the offenders are carried for reporting.
    #[error("existing rules conflict with the candidate: {}", list_rules(.0))]
    Conflict(Vec<Arc<Rule>>),
}

fn list_rules(rules: &[Arc<Rule>]) -> String {
    rules
        .iter()
        .map(|rule| rule.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
