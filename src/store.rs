//! Storage port and the in-memory reference implementation.
//!
//! A *row* is the map form of a rule: one entry per declared column (the
//! empty string encodes the wildcard) plus the reserved `rule_id` and
//! `rule_output_id` entries. The engine converts between rows and typed
//! rules; stores only move rows.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use thiserror::Error;

use crate::types::{Column, RULE_ID_COLUMN};

/// Errors surfaced by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The named rule system does not exist in the store.
    #[error("rule system '{name}' is not present in the store")]
    UnknownSystem {
        /// The rule-system name that failed to resolve.
        name: String,
    },

    /// The backend refused to persist a write.
    #[error("store rejected the write: {reason}")]
    WriteRejected {
        /// Backend-specific explanation.
        reason: String,
    },

    /// Persisted data that cannot be interpreted.
    #[error("stored data is corrupt: {reason}")]
    Corrupt {
        /// What failed to interpret.
        reason: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json-store")]
    #[error("malformed store document: {0}")]
    Document(#[from] serde_json::Error),
}

/// Durable source of schemas and rules; the only I/O boundary of the
/// engine. Implementations must be safe to share across threads.
pub trait RuleStore: Send + Sync {
    /// Whether the store is reachable and the named rule system exists.
    fn is_ready(&self, system: &str) -> bool;

    /// The declared input columns of a rule system, in any order; the
    /// engine sorts by priority.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the system is unknown or unreadable.
    fn load_columns(&self, system: &str) -> Result<Vec<Column>, StoreError>;

    /// Every persisted rule row of a rule system, in any order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the system is unknown or unreadable.
    fn load_rules(&self, system: &str) -> Result<Vec<HashMap<String, String>>, StoreError>;

    /// Persist a new rule row atomically and return the id the store
    /// assigned to it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the system is unknown or the backend
    /// rejects the write.
    fn save_rule(&self, system: &str, row: &HashMap<String, String>) -> Result<u64, StoreError>;

    /// Remove a persisted rule; `Ok(false)` when the id is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the system is unknown or the backend
    /// fails the removal.
    fn delete_rule(&self, system: &str, rule_id: u64) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
struct SystemData {
    columns: Vec<Column>,
    rows: Vec<HashMap<String, String>>,
    next_id: u64,
}

/// Shared-handle in-memory store: the default embedded backend and the
/// swap-in test double for the port.
///
/// Clones share the same underlying data, so one handle can seed a system
/// while another backs a live engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<HashMap<String, SystemData>>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) a rule system with the given columns and no
    /// rules.
    pub fn create_system(&self, name: impl Into<String>, columns: Vec<Column>) {
        self.inner.write().insert(
            name.into(),
            SystemData {
                columns,
                rows: Vec::new(),
                next_id: 1,
            },
        );
    }
}

impl RuleStore for MemoryStore {
    fn is_ready(&self, system: &str) -> bool {
        self.inner.read().contains_key(system)
    }

    fn load_columns(&self, system: &str) -> Result<Vec<Column>, StoreError> {
        let inner = self.inner.read();
        let data = inner.get(system).ok_or_else(|| StoreError::UnknownSystem {
            name: system.to_owned(),
        })?;
        Ok(data.columns.clone())
    }

    fn load_rules(&self, system: &str) -> Result<Vec<HashMap<String, String>>, StoreError> {
        let inner = self.inner.read();
        let data = inner.get(system).ok_or_else(|| StoreError::UnknownSystem {
            name: system.to_owned(),
        })?;
        Ok(data.rows.clone())
    }

    fn save_rule(&self, system: &str, row: &HashMap<String, String>) -> Result<u64, StoreError> {
        let mut inner = self.inner.write();
        let data = inner
            .get_mut(system)
            .ok_or_else(|| StoreError::UnknownSystem {
                name: system.to_owned(),
            })?;

        let id = data.next_id;
        data.next_id += 1;

        let mut stored = row.clone();
        stored.insert(RULE_ID_COLUMN.to_owned(), id.to_string());
        data.rows.push(stored);
        Ok(id)
    }

    fn delete_rule(&self, system: &str, rule_id: u64) -> Result<bool, StoreError> {
        let mut inner = self.inner.write();
        let data = inner
            .get_mut(system)
            .ok_or_else(|| StoreError::UnknownSystem {
                name: system.to_owned(),
            })?;

        let id = rule_id.to_string();
        let before = data.rows.len();
        data.rows.retain(|row| row.get(RULE_ID_COLUMN) != Some(&id));
        Ok(data.rows.len() < before)
    }
}
