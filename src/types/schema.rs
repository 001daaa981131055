use std::collections::HashMap;

use thiserror::Error;

use super::column::Column;

/// Errors produced when validating a rule-system schema.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// The store returned no columns for the rule system.
    #[error("a rule system needs at least one input column")]
    Empty,

    /// Two columns share a name.
    #[error("duplicate column name '{name}'")]
    DuplicateName {
        /// The duplicated column name.
        name: String,
    },

    /// Two columns share a priority, so their order would be ambiguous.
    #[error("columns '{first}' and '{second}' share priority {priority}")]
    DuplicatePriority {
        /// The contested priority value.
        priority: u32,
        /// The column declared first.
        first: String,
        /// The column declared second.
        second: String,
    },

    /// A user column uses one of the reserved row-entry names.
    #[error("'{name}' is reserved and cannot be used as a column name")]
    Reserved {
        /// The offending column name.
        name: String,
    },
}

/// A validated schema: the user columns of a rule system sorted by
/// ascending priority, most important first.
///
/// The column order is load-bearing: it is the depth order of the lookup
/// trie and the tie-break spine when ranking eligible rules.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    columns: Vec<Column>,
    positions: HashMap<String, usize>,
}

impl Schema {
    /// Validate and priority-sort a column list.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError`] on an empty list, duplicate names or
    /// priorities, or a reserved column name.
    pub fn new(mut columns: Vec<Column>) -> Result<Self, SchemaError> {
        if columns.is_empty() {
            return Err(SchemaError::Empty);
        }

        columns.sort_by_key(|c| c.priority);
        for pair in columns.windows(2) {
            if pair[0].priority == pair[1].priority {
                return Err(SchemaError::DuplicatePriority {
                    priority: pair[0].priority,
                    first: pair[0].name.clone(),
                    second: pair[1].name.clone(),
                });
            }
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (idx, col) in columns.iter().enumerate() {
            if Column::is_reserved_name(&col.name) {
                return Err(SchemaError::Reserved {
                    name: col.name.clone(),
                });
            }
            if positions.insert(col.name.clone(), idx).is_some() {
                return Err(SchemaError::DuplicateName {
                    name: col.name.clone(),
                });
            }
        }

        Ok(Self { columns, positions })
    }

    /// Columns in priority order (most important first).
    #[must_use]
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name.
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.positions.get(name).map(|&idx| &self.columns[idx])
    }

    /// The priority-order position of a named column.
    #[must_use]
    pub(crate) fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// The number of declared columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether the schema has no columns. Always false for a validated
    /// schema; present for API completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
