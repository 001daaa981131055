use std::fmt;

/// Reserved name under which a persisted rule's unique id travels in row
/// form. Never a valid user column name.
pub const RULE_ID_COLUMN: &str = "rule_id";

/// Reserved name under which a rule's output identifier travels in row
/// form. Never a valid user column name.
pub const RULE_OUTPUT_COLUMN: &str = "rule_output_id";

/// How values in a column are matched against a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Byte-equal string comparison; no case folding, no trimming.
    Text,
    /// Inclusive `i64` interval. The request supplies a single decimal
    /// literal (e.g. seconds since the epoch) tested for containment.
    NumericRange,
}

/// A named, priority-ranked input dimension of a rule system.
///
/// Lower `priority` numbers rank earlier: they set both the depth order of
/// the lookup trie and which column dominates when ranking eligible rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub priority: u32,
    pub kind: ColumnKind,
}

impl Column {
    /// A string-valued column.
    #[must_use]
    pub fn text(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            kind: ColumnKind::Text,
        }
    }

    /// A numeric-range column.
    #[must_use]
    pub fn numeric_range(name: impl Into<String>, priority: u32) -> Self {
        Self {
            name: name.into(),
            priority,
            kind: ColumnKind::NumericRange,
        }
    }

    /// Whether a name collides with one of the reserved row entries.
    #[must_use]
    pub fn is_reserved_name(name: &str) -> bool {
        name == RULE_ID_COLUMN || name == RULE_OUTPUT_COLUMN
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ColumnKind::Text => "text",
            ColumnKind::NumericRange => "numeric-range",
        };
        write!(f, "{} ({kind}, priority {})", self.name, self.priority)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_constructor() {
        let col = Column::text("brand", 1);
        assert_eq!(col.name, "brand");
        assert_eq!(col.priority, 1);
        assert_eq!(col.kind, ColumnKind::Text);
    }

    #[test]
    fn numeric_range_constructor() {
        let col = Column::numeric_range("valid_date_range", 5);
        assert_eq!(col.kind, ColumnKind::NumericRange);
    }

    #[test]
    fn reserved_names() {
        assert!(Column::is_reserved_name("rule_id"));
        assert!(Column::is_reserved_name("rule_output_id"));
        assert!(!Column::is_reserved_name("brand"));
    }

    #[test]
    fn display() {
        assert_eq!(
            Column::text("brand", 1).to_string(),
            "brand (text, priority 1)"
        );
        assert_eq!(
            Column::numeric_range("valid_date_range", 5).to_string(),
            "valid_date_range (numeric-range, priority 5)"
        );
    }
}
