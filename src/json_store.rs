//! Single-file JSON store.
//!
//! The whole document is held in memory and rewritten on every mutation,
//! which suits rule sets sized for operator editing rather than bulk data.
//! Core types stay serde-free: the document speaks through its own
//! serialized mirror types.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::store::{RuleStore, StoreError};
use crate::types::{Column, ColumnKind, RULE_ID_COLUMN};

#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    systems: HashMap<String, SystemDoc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SystemDoc {
    columns: Vec<ColumnDoc>,
    next_id: u64,
    rules: Vec<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ColumnDoc {
    name: String,
    priority: u32,
    kind: KindDoc,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
enum KindDoc {
    Text,
    NumericRange,
}

impl From<&Column> for ColumnDoc {
    fn from(column: &Column) -> Self {
        Self {
            name: column.name.clone(),
            priority: column.priority,
            kind: match column.kind {
                ColumnKind::Text => KindDoc::Text,
                ColumnKind::NumericRange => KindDoc::NumericRange,
            },
        }
    }
}

impl From<&ColumnDoc> for Column {
    fn from(doc: &ColumnDoc) -> Self {
        Self {
            name: doc.name.clone(),
            priority: doc.priority,
            kind: match doc.kind {
                KindDoc::Text => ColumnKind::Text,
                KindDoc::NumericRange => ColumnKind::NumericRange,
            },
        }
    }
}

/// File-backed [`RuleStore`] persisting rule systems as one JSON document.
///
/// Mutations only commit to the in-memory document after the file write
/// succeeds, so a failed flush leaves both file and store unchanged.
#[derive(Debug)]
pub struct JsonStore {
    path: PathBuf,
    doc: Mutex<Document>,
}

impl JsonStore {
    /// Open a store file, starting from an empty document when the file
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] on I/O failure or a malformed document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let doc = match std::fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Document::default(),
            Err(err) => return Err(StoreError::Io(err)),
        };
        Ok(Self {
            path,
            doc: Mutex::new(doc),
        })
    }

    /// Create (or replace) a rule system with the given columns and no
    /// rules, and flush the document.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the flush fails.
    pub fn create_system(
        &self,
        name: impl Into<String>,
        columns: &[Column],
    ) -> Result<(), StoreError> {
        let mut doc = self.doc.lock();
        doc.systems.insert(
            name.into(),
            SystemDoc {
                columns: columns.iter().map(ColumnDoc::from).collect(),
                next_id: 1,
                rules: Vec::new(),
            },
        );
        self.flush(&doc)
    }

    fn flush(&self, doc: &Document) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(doc)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl RuleStore for JsonStore {
    fn is_ready(&self, system: &str) -> bool {
        self.doc.lock().systems.contains_key(system)
    }

    fn load_columns(&self, system: &str) -> Result<Vec<Column>, StoreError> {
        let doc = self.doc.lock();
        let data = doc
            .systems
            .get(system)
            .ok_or_else(|| StoreError::UnknownSystem {
                name: system.to_owned(),
            })?;
        Ok(data.columns.iter().map(Column::from).collect())
    }

    fn load_rules(&self, system: &str) -> Result<Vec<HashMap<String, String>>, StoreError> {
        let doc = self.doc.lock();
        let data = doc
            .systems
            .get(system)
            .ok_or_else(|| StoreError::UnknownSystem {
                name: system.to_owned(),
            })?;
        Ok(data.rules.clone())
    }

    fn save_rule(&self, system: &str, row: &HashMap<String, String>) -> Result<u64, StoreError> {
        let mut doc = self.doc.lock();
        let data = doc
            .systems
            .get_mut(system)
            .ok_or_else(|| StoreError::UnknownSystem {
                name: system.to_owned(),
            })?;

        let id = data.next_id;
        let mut stored = row.clone();
        stored.insert(RULE_ID_COLUMN.to_owned(), id.to_string());

        data.next_id += 1;
        data.rules.push(stored);

        if let Err(err) = self.flush(&doc) {
            if let Some(data) = doc.systems.get_mut(system) {
                data.rules.pop();
                data.next_id -= 1;
            }
            return Err(err);
        }
        Ok(id)
    }

    fn delete_rule(&self, system: &str, rule_id: u64) -> Result<bool, StoreError> {
        let mut doc = self.doc.lock();
        let data = doc
            .systems
            .get_mut(system)
            .ok_or_else(|| StoreError::UnknownSystem {
                name: system.to_owned(),
            })?;

        let id = rule_id.to_string();
        let original = data.rules.clone();
        data.rules
            .retain(|row| row.get(RULE_ID_COLUMN) != Some(&id));
        if data.rules.len() == original.len() {
            return Ok(false);
        }

        if let Err(err) = self.flush(&doc) {
            if let Some(data) = doc.systems.get_mut(system) {
                data.rules = original;
            }
            return Err(err);
        }
        Ok(true)
    }
}
