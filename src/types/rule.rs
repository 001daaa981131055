use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RulebookError;
use crate::parse::ParseError;

use super::column::{RULE_ID_COLUMN, RULE_OUTPUT_COLUMN};
use super::input::RuleInput;
use super::request::Request;
use super::schema::Schema;

/// An immutable mapping from every schema column to one [`RuleInput`],
/// plus the output identifier the rule yields when it matches.
///
/// Rules are built with [`Rule::from_values`] against a schema and are not
/// mutated after admission; `id` stays `None` until a store has persisted
/// the rule and assigned one.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    schema: Arc<Schema>,
    id: Option<u64>,
    output_id: String,
    inputs: Vec<RuleInput>,
}

impl Rule {
    /// Build a rule from raw column values keyed by column name.
    ///
    /// Missing or empty values parse to the wildcard. The reserved
    /// `rule_output_id` entry is required and must be non-empty; a
    /// `rule_id` entry, when present, is taken as the persisted id.
    ///
    /// # Errors
    ///
    /// [`RulebookError::MissingOutputId`] without a non-empty output id,
    /// [`ParseError`] for malformed ranges or a malformed id.
    pub fn from_values(
        schema: &Arc<Schema>,
        values: &HashMap<String, String>,
    ) -> Result<Self, RulebookError> {
        let output_id = values.get(RULE_OUTPUT_COLUMN).map_or("", String::as_str);
        if output_id.is_empty() {
            return Err(RulebookError::MissingOutputId);
        }

        let id = match values.get(RULE_ID_COLUMN).filter(|raw| !raw.is_empty()) {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| ParseError::InvalidRuleId {
                raw: raw.clone(),
            })?),
            None => None,
        };

        let mut inputs = Vec::with_capacity(schema.len());
        for column in schema.columns() {
            let raw = values.get(&column.name).map_or("", String::as_str);
            inputs.push(RuleInput::parse(column, raw)?);
        }

        Ok(Self {
            schema: Arc::clone(schema),
            id,
            output_id: output_id.to_owned(),
            inputs,
        })
    }

    /// The persisted id, once a store has assigned one.
    #[must_use]
    pub fn id(&self) -> Option<u64> {
        self.id
    }

    /// The opaque identifier this rule yields when it matches.
    #[must_use]
    pub fn output_id(&self) -> &str {
        &self.output_id
    }

    /// The schema this rule was built against.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Inputs in schema (priority) order, one per column.
    #[must_use]
    pub fn inputs(&self) -> &[RuleInput] {
        &self.inputs
    }

    /// The input bound to a declared column; `None` for unknown names.
    #[must_use]
    pub fn column_data(&self, name: &str) -> Option<&RuleInput> {
        self.schema.position(name).map(|idx| &self.inputs[idx])
    }

    /// True iff every column's input matches the request.
    #[must_use]
    pub fn evaluate(&self, request: &Request) -> bool {
        self.schema
            .columns()
            .iter()
            .zip(&self.inputs)
            .all(|(column, input)| input.satisfies(request.get(&column.name)))
    }

    /// True iff the two rules could match a common request: every column's
    /// inputs overlap. Symmetric; both rules must share a schema.
    #[must_use]
    pub fn conflicts_with(&self, other: &Rule) -> bool {
        self.inputs
            .iter()
            .zip(&other.inputs)
            .all(|(a, b)| a.overlaps(b))
    }

    /// Row form for the storage port: one entry per column (wildcards as
    /// the empty string) plus the reserved id and output entries.
    #[must_use]
    pub fn to_values(&self) -> HashMap<String, String> {
        let mut values = HashMap::with_capacity(self.schema.len() + 2);
        for (column, input) in self.schema.columns().iter().zip(&self.inputs) {
            values.insert(column.name.clone(), input.render());
        }
        if let Some(id) = self.id {
            values.insert(RULE_ID_COLUMN.to_owned(), id.to_string());
        }
        values.insert(RULE_OUTPUT_COLUMN.to_owned(), self.output_id.clone());
        values
    }

    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "rule #{id} [")?,
            None => write!(f, "rule [")?,
        }
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{input}")?;
        }
        write!(f, "] -> {}", self.output_id)
    }
}
