use std::fmt;

use crate::parse::{self, ParseError};

use super::column::{Column, ColumnKind};

/// A column-bound match predicate: a wildcard, a literal, or an inclusive
/// integer range.
///
/// Equality and hashing are content-based over the variant and its payload;
/// that identity is what keys sibling edges in the lookup trie. Overlap is
/// the deliberately broader relation used for conflict detection and must
/// never stand in for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RuleInput {
    /// Matches any request value, including the empty string a missing
    /// request key reads as.
    Any,
    /// Matches exactly this literal, byte for byte.
    Value(String),
    /// Matches any integer in `low..=high`.
    Range { low: i64, high: i64 },
}

impl RuleInput {
    /// Parse the raw textual form of an input for the given column.
    ///
    /// The empty string is the wildcard for every column kind. Text
    /// columns take the raw value verbatim; numeric-range columns expect
    /// `lower..upper` with integer bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] for a malformed or inverted range.
    pub fn parse(column: &Column, raw: &str) -> Result<Self, ParseError> {
        if raw.is_empty() {
            return Ok(RuleInput::Any);
        }
        match column.kind {
            ColumnKind::Text => Ok(RuleInput::Value(raw.to_owned())),
            ColumnKind::NumericRange => {
                let (low, high) = parse::range_literal(raw)?;
                Ok(RuleInput::Range { low, high })
            }
        }
    }

    /// Whether this is the wildcard.
    #[must_use]
    pub fn is_any(&self) -> bool {
        matches!(self, RuleInput::Any)
    }

    /// Whether a concrete request value is matched by this input.
    ///
    /// A range input rejects request values that do not parse as integers,
    /// including the empty string.
    #[must_use]
    pub fn satisfies(&self, request_value: &str) -> bool {
        match self {
            RuleInput::Any => true,
            RuleInput::Value(v) => v == request_value,
            RuleInput::Range { low, high } => request_value
                .parse::<i64>()
                .is_ok_and(|point| (*low..=*high).contains(&point)),
        }
    }

    /// Whether two inputs admit at least one common request value.
    ///
    /// Mixed value/range pairs cannot share a column by construction and
    /// never overlap.
    #[must_use]
    pub fn overlaps(&self, other: &RuleInput) -> bool {
        match (self, other) {
            (RuleInput::Any, _) | (_, RuleInput::Any) => true,
            (RuleInput::Value(a), RuleInput::Value(b)) => a == b,
            (
                RuleInput::Range { low: a_low, high: a_high },
                RuleInput::Range { low: b_low, high: b_high },
            ) => a_low.max(b_low) <= a_high.min(b_high),
            _ => false,
        }
    }

    /// The textual form [`parse`](Self::parse) accepts; the wildcard
    /// renders as the empty string. Used for the storage row form.
    #[must_use]
    pub fn render(&self) -> String {
        match self {
            RuleInput::Any => String::new(),
            RuleInput::Value(v) => v.clone(),
            RuleInput::Range { low, high } => format!("{low}..{high}"),
        }
    }
}

impl fmt::Display for RuleInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleInput::Any => write!(f, "*"),
            RuleInput::Value(v) => write!(f, "{v}"),
            RuleInput::Range { low, high } => write!(f, "{low}..{high}"),
        }
    }
}
