//! Specificity ordering over eligible rules.

use std::cmp::Ordering;

use crate::types::{Rule, Schema};

/// Rank two rules that both match the same request: walk the columns in
/// priority order and, at the first column where the stored inputs differ,
/// rank the non-wildcard side earlier. Rules with identical inputs on
/// every column compare equal.
///
/// Two admitted rules can only reach a pair of differing non-wildcard
/// inputs if they overlap everywhere else, which conflict admission rules
/// out; that branch falls back to representation order so the relation
/// stays a total order on arbitrary pairs.
///
/// The order is only meaningful for rules pre-filtered against one
/// request, which is why it is not exposed as an `Ord` impl on `Rule`.
pub(crate) fn by_specificity(schema: &Schema, a: &Rule, b: &Rule) -> Ordering {
    for position in 0..schema.len() {
        let lhs = &a.inputs()[position];
        let rhs = &b.inputs()[position];
        if lhs == rhs {
            continue;
        }
        return match (lhs.is_any(), rhs.is_any()) {
            (true, false) => Ordering::Greater,
            (false, true) => Ordering::Less,
            _ => lhs.render().cmp(&rhs.render()),
        };
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use super::*;
    use crate::types::Column;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new(vec![
                Column::text("brand", 1),
                Column::text("article_type", 2),
                Column::text("is_active", 3),
            ])
            .unwrap(),
        )
    }

    fn rule(schema: &Arc<Schema>, brand: &str, article: &str, active: &str) -> Rule {
        let mut values: HashMap<String, String> = HashMap::from([(
            "rule_output_id".to_owned(),
            "1".to_owned(),
        )]);
        values.insert("brand".to_owned(), brand.to_owned());
        values.insert("article_type".to_owned(), article.to_owned());
        values.insert("is_active".to_owned(), active.to_owned());
        Rule::from_values(schema, &values).unwrap()
    }

    #[test]
    fn specific_beats_wildcard() {
        let schema = schema();
        let specific = rule(&schema, "Adidas", "T Shirt", "1");
        let broad = rule(&schema, "", "T Shirt", "1");
        assert_eq!(by_specificity(&schema, &specific, &broad), Ordering::Less);
        assert_eq!(by_specificity(&schema, &broad, &specific), Ordering::Greater);
    }

    #[test]
    fn earlier_column_dominates() {
        let schema = schema();
        // Wildcard on the first column loses even when every later column
        // is more specific.
        let late_specific = rule(&schema, "", "T Shirt", "1");
        let early_specific = rule(&schema, "Adidas", "", "");
        assert_eq!(
            by_specificity(&schema, &early_specific, &late_specific),
            Ordering::Less
        );
    }

    #[test]
    fn identical_inputs_compare_equal() {
        let schema = schema();
        let a = rule(&schema, "Adidas", "", "1");
        let b = rule(&schema, "Adidas", "", "1");
        assert_eq!(by_specificity(&schema, &a, &b), Ordering::Equal);
    }

    #[test]
    fn all_wildcards_rank_last() {
        let schema = schema();
        let any = rule(&schema, "", "", "");
        let barely_specific = rule(&schema, "", "", "1");
        assert_eq!(
            by_specificity(&schema, &barely_specific, &any),
            Ordering::Less
        );
    }

    #[test]
    fn differing_literals_order_deterministically() {
        let schema = schema();
        let a = rule(&schema, "Adidas", "", "");
        let b = rule(&schema, "Nike", "", "");
        let ab = by_specificity(&schema, &a, &b);
        let ba = by_specificity(&schema, &b, &a);
        assert_eq!(ab, ba.reverse());
        assert_ne!(ab, Ordering::Equal);
    }
}
