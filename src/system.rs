//! The rule-system facade: lifecycle, queries, and writes.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::error::RulebookError;
use crate::index::RuleIndex;
use crate::rank;
use crate::store::{RuleStore, StoreError};
use crate::types::{Request, Rule, Schema};
use crate::validator::{DefaultValidator, Validator};

/// One immutable view of the admitted rules and their index. Replaced
/// wholesale on every write so readers never observe a torn state.
#[derive(Debug)]
struct Snapshot {
    rules: Vec<Arc<Rule>>,
    index: RuleIndex,
}

impl Snapshot {
    fn new(schema: &Arc<Schema>, rules: Vec<Arc<Rule>>) -> Self {
        let index = RuleIndex::build(Arc::clone(schema), &rules);
        Self { rules, index }
    }
}

/// An initialized rule system: a named schema, its admitted rules, and a
/// priority-ordered lookup index, served concurrently.
///
/// Reads take no lock beyond cloning the current snapshot handle; writes
/// are serialised against each other and publish a fresh snapshot, so
/// conflict check, persistence, and cache update are atomic relative to
/// other writes.
///
/// # Example
///
/// ```
/// use std::collections::HashMap;
/// use rulebook::{Column, MemoryStore, Request, RuleSystem};
///
/// # fn main() -> Result<(), rulebook::RulebookError> {
/// let store = MemoryStore::new();
/// store.create_system(
///     "discounts",
///     vec![Column::text("brand", 1), Column::text("article_type", 2)],
/// );
///
/// let system = RuleSystem::new("discounts", store)?;
/// system.add_rule_from_values(&HashMap::from([
///     ("brand".to_owned(), "Adidas".to_owned()),
///     ("article_type".to_owned(), "T Shirt".to_owned()),
///     ("rule_output_id".to_owned(), "100".to_owned()),
/// ]))?;
///
/// let request = Request::new()
///     .set("brand", "Adidas")
///     .set("article_type", "T Shirt");
/// assert_eq!(system.best_match(&request).unwrap().output_id(), "100");
/// # Ok(())
/// # }
/// ```
pub struct RuleSystem<S> {
    name: String,
    schema: Arc<Schema>,
    validator: Box<dyn Validator>,
    store: S,
    snapshot: RwLock<Arc<Snapshot>>,
    writer: Mutex<()>,
}

impl<S: RuleStore> RuleSystem<S> {
    /// Initialize a named rule system against a store, admitting rules
    /// through the [`DefaultValidator`].
    ///
    /// # Errors
    ///
    /// Returns [`RulebookError`] when the store is unreachable or has no
    /// system of this name, the schema fails validation, or a stored rule
    /// row cannot be parsed.
    pub fn new(name: impl Into<String>, store: S) -> Result<Self, RulebookError> {
        Self::with_validator(name, store, Box::new(DefaultValidator))
    }

    /// Initialize with a custom admission policy.
    ///
    /// Stored rules the validator rejects are skipped with a warning
    /// rather than failing initialization.
    ///
    /// # Errors
    ///
    /// Same conditions as [`RuleSystem::new`].
    pub fn with_validator(
        name: impl Into<String>,
        store: S,
        validator: Box<dyn Validator>,
    ) -> Result<Self, RulebookError> {
        let name = name.into();
        if !store.is_ready(&name) {
            return Err(StoreError::UnknownSystem { name }.into());
        }

        let schema = Arc::new(Schema::new(store.load_columns(&name)?)?);

        let mut rules: Vec<Arc<Rule>> = Vec::new();
        for row in store.load_rules(&name)? {
            let rule = Rule::from_values(&schema, &row)?;
            if validator.is_valid(&rule) {
                rules.push(Arc::new(rule));
            } else {
                warn!(system = %name, rule = %rule, "skipping stored rule rejected by the validator");
            }
        }

        info!(
            system = %name,
            columns = schema.len(),
            rules = rules.len(),
            "rule system initialized"
        );

        let snapshot = Arc::new(Snapshot::new(&schema, rules));
        Ok(Self {
            name,
            schema,
            validator,
            store,
            snapshot: RwLock::new(snapshot),
            writer: Mutex::new(()),
        })
    }

    /// The name this system was initialized under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The validated, priority-ordered schema.
    #[must_use]
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// A snapshot of all admitted rules; order unspecified.
    #[must_use]
    pub fn rules(&self) -> Vec<Arc<Rule>> {
        self.current().rules.clone()
    }

    /// Look up a rule by its persisted id.
    #[must_use]
    pub fn rule_by_id(&self, id: u64) -> Option<Arc<Rule>> {
        self.current()
            .rules
            .iter()
            .find(|rule| rule.id() == Some(id))
            .cloned()
    }

    /// The single best-matching rule for a request: among all rules whose
    /// every column matches, the one ranking first on specificity, earlier
    /// columns dominating. `None` when nothing matches.
    #[must_use]
    pub fn best_match(&self, request: &Request) -> Option<Arc<Rule>> {
        self.eligible(request).into_iter().next()
    }

    /// The rule that would apply if the current best match were deleted.
    ///
    /// The runner-up is only surfaced when more than two rules are
    /// eligible; with exactly two, this returns `None`.
    #[must_use]
    pub fn next_best_match(&self, request: &Request) -> Option<Arc<Rule>> {
        let eligible = self.eligible(request);
        if eligible.len() > 2 {
            eligible.into_iter().nth(1)
        } else {
            None
        }
    }

    /// Admitted rules that overlap the candidate on every column, i.e.
    /// could match a common request. Empty when the candidate is safe to
    /// add.
    #[must_use]
    pub fn conflicting_rules(&self, rule: &Rule) -> Vec<Arc<Rule>> {
        self.current()
            .rules
            .iter()
            .filter(|existing| existing.conflicts_with(rule))
            .cloned()
            .collect()
    }

    /// Build a rule from raw column values and admit it. See
    /// [`add_rule`](Self::add_rule).
    ///
    /// # Errors
    ///
    /// Everything [`add_rule`](Self::add_rule) returns, plus the
    /// construction errors of [`Rule::from_values`].
    pub fn add_rule_from_values(
        &self,
        values: &HashMap<String, String>,
    ) -> Result<Option<Arc<Rule>>, RulebookError> {
        let rule = Rule::from_values(&self.schema, values)?;
        self.add_rule(rule)
    }

    /// Admit a rule: validate, conflict-check against the admitted rules,
    /// persist through the store, then publish it to queries with its
    /// assigned id.
    ///
    /// Returns `Ok(None)` when the validator rejects the rule.
    ///
    /// # Errors
    ///
    /// [`RulebookError::Conflict`] carrying the overlapping rules, or a
    /// [`StoreError`](crate::StoreError) when persistence fails. Either
    /// way the in-memory state is unchanged.
    pub fn add_rule(&self, rule: Rule) -> Result<Option<Arc<Rule>>, RulebookError> {
        if !self.validator.is_valid(&rule) {
            debug!(system = %self.name, rule = %rule, "validator rejected rule");
            return Ok(None);
        }

        let _write = self.writer.lock();

        let conflicts = self.conflicting_rules(&rule);
        if !conflicts.is_empty() {
            return Err(RulebookError::Conflict(conflicts));
        }

        let id = self.store.save_rule(&self.name, &rule.to_values())?;
        let rule = Arc::new(rule.with_id(id));

        let mut rules = self.current().rules.clone();
        rules.push(Arc::clone(&rule));
        self.publish(rules);

        debug!(system = %self.name, rule = %rule, "rule admitted");
        Ok(Some(rule))
    }

    /// Delete by persisted id. `false` when no admitted rule has the id
    /// or the store refuses the removal.
    pub fn delete_rule_by_id(&self, id: u64) -> bool {
        match self.rule_by_id(id) {
            Some(rule) => self.delete_rule(&rule),
            None => false,
        }
    }

    /// Delete an admitted rule. `false` for never-persisted rules,
    /// unknown ids, and store failures; the in-memory state only changes
    /// when the store confirms the removal.
    pub fn delete_rule(&self, rule: &Rule) -> bool {
        let Some(id) = rule.id() else {
            return false;
        };

        let _write = self.writer.lock();

        if !self.current().rules.iter().any(|r| r.id() == Some(id)) {
            return false;
        }

        match self.store.delete_rule(&self.name, id) {
            Ok(true) => {
                let rules = self
                    .current()
                    .rules
                    .iter()
                    .filter(|r| r.id() != Some(id))
                    .cloned()
                    .collect();
                self.publish(rules);
                debug!(system = %self.name, rule_id = id, "rule deleted");
                true
            }
            Ok(false) => false,
            Err(err) => {
                warn!(system = %self.name, rule_id = id, error = %err, "store failed to delete rule");
                false
            }
        }
    }

    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    /// Matching rules ranked best-first.
    fn eligible(&self, request: &Request) -> Vec<Arc<Rule>> {
        let snapshot = self.current();
        let mut matches = snapshot.index.matches(request);
        matches.sort_by(|a, b| rank::by_specificity(&self.schema, a, b));
        matches
    }

    fn publish(&self, rules: Vec<Arc<Rule>>) {
        let snapshot = Arc::new(Snapshot::new(&self.schema, rules));
        *self.snapshot.write() = snapshot;
    }
}

impl<S> fmt::Debug for RuleSystem<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleSystem")
            .field("name", &self.name)
            .field("columns", &self.schema.len())
            .field("rules", &self.snapshot.read().rules.len())
            .finish_non_exhaustive()
    }
}
