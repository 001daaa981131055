//! Textual forms of rule-input literals.
//!
//! Range columns are written `lower..upper` with inclusive integer bounds
//! (`1000..2000`, `-5..5`). The empty string is the wildcard for every
//! column kind and is handled before parsing.

use thiserror::Error;
use winnow::Parser;
use winnow::ascii::dec_int;
use winnow::combinator::separated_pair;
use winnow::error::ModalResult;

/// Errors produced when parsing rule-input literals.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    /// A range literal without the `..` separator.
    #[error("range '{raw}' is missing the '..' separator")]
    MissingSeparator {
        /// The offending literal.
        raw: String,
    },

    /// A range bound that is not a decimal integer.
    #[error("range '{raw}' has a malformed integer bound")]
    InvalidBound {
        /// The offending literal.
        raw: String,
    },

    /// A range whose lower bound exceeds its upper bound.
    #[error("range lower bound {low} exceeds upper bound {high}")]
    InvertedBounds {
        /// The parsed lower bound.
        low: i64,
        /// The parsed upper bound.
        high: i64,
    },

    /// A `rule_id` row entry that is not an unsigned integer.
    #[error("'{raw}' is not a valid rule id")]
    InvalidRuleId {
        /// The offending literal.
        raw: String,
    },
}

fn range(input: &mut &str) -> ModalResult<(i64, i64)> {
    separated_pair(dec_int, "..", dec_int).parse_next(input)
}

/// Parse an inclusive `lower..upper` range literal.
///
/// # Errors
///
/// Returns [`ParseError`] when the separator is absent, a bound is not a
/// decimal integer, or the bounds are inverted.
pub(crate) fn range_literal(raw: &str) -> Result<(i64, i64), ParseError> {
    let (low, high) = range.parse(raw).map_err(|_| {
        if raw.contains("..") {
            ParseError::InvalidBound {
                raw: raw.to_owned(),
            }
        } else {
            ParseError::MissingSeparator {
                raw: raw.to_owned(),
            }
        }
    })?;
    if low > high {
        return Err(ParseError::InvertedBounds { low, high });
    }
    Ok((low, high))
}
