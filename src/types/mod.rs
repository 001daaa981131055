mod column;
mod input;
mod request;
mod rule;
mod schema;

pub use column::{Column, ColumnKind, RULE_ID_COLUMN, RULE_OUTPUT_COLUMN};
pub use input::RuleInput;
pub use request::Request;
pub use rule::Rule;
pub use schema::{Schema, SchemaError};
