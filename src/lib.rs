//! Embeddable best-match rule engine.
//!
//! A rule system maps structured inputs to a single output identifier.
//! Its schema is an ordered list of columns, each holding a literal, an
//! inclusive integer range, or a wildcard per rule; a lookup request
//! supplies one concrete value per column and gets back the single
//! best-matching rule, with exact values beating wildcards and earlier
//! (higher-priority) columns dominating later ones. Overlapping rules are
//! rejected at admission, so the best match is never ambiguous.
//!
//! Rules live behind a [`RuleStore`] port ([`MemoryStore`] in-process, or
//! the file-backed `JsonStore` with the `json-store` feature) and are
//! served from an immutable snapshot, so lookups are cheap and safe to
//! share across threads.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use rulebook::{Column, MemoryStore, Request, RuleSystem};
//!
//! # fn main() -> Result<(), rulebook::RulebookError> {
//! let store = MemoryStore::new();
//! store.create_system(
//!     "discounts",
//!     vec![
//!         Column::text("brand", 1),
//!         Column::text("article_type", 2),
//!         Column::numeric_range("valid_date_range", 3),
//!     ],
//! );
//!
//! let system = RuleSystem::new("discounts", store)?;
//! system.add_rule_from_values(&HashMap::from([
//!     ("brand".to_owned(), "Adidas".to_owned()),
//!     ("article_type".to_owned(), "T Shirt".to_owned()),
//!     ("valid_date_range".to_owned(), "0..9999999999".to_owned()),
//!     ("rule_output_id".to_owned(), "100".to_owned()),
//! ]))?;
//!
//! let request = Request::new()
//!     .set("brand", "Adidas")
//!     .set("article_type", "T Shirt")
//!     .set("valid_date_range", "1700000000");
//! let best = system.best_match(&request).expect("a rule matches");
//! assert_eq!(best.output_id(), "100");
//! # Ok(())
//! # }
//! ```

mod error;
mod index;
#[cfg(feature = "json-store")]
mod json_store;
mod parse;
mod rank;
mod store;
mod system;
mod types;
mod validator;

pub use error::RulebookError;
#[cfg(feature = "json-store")]
pub use json_store::JsonStore;
pub use parse::ParseError;
pub use store::{MemoryStore, RuleStore, StoreError};
pub use system::RuleSystem;
pub use types::{
    Column, ColumnKind, RULE_ID_COLUMN, RULE_OUTPUT_COLUMN, Request, Rule, RuleInput, Schema,
    SchemaError,
};
pub use validator::{DefaultValidator, Validator};
