//! Prefix-trie index over admitted rules.
//!
//! Children at depth `k` are keyed by [`RuleInput`] identity for the
//! `k`-th column in priority order, so sibling choice narrows the most
//! important column first. A root-to-leaf path spells a rule's inputs and
//! the leaf holds the rule; the trie's depth equals the column count.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::types::{ColumnKind, Request, Rule, RuleInput, Schema};

#[derive(Debug, Default)]
struct Node {
    children: HashMap<RuleInput, Node>,
    rule: Option<Arc<Rule>>,
}

/// The lookup structure behind `best_match`. Immutable once built; writes
/// construct a fresh index as part of the snapshot swap.
#[derive(Debug)]
pub(crate) struct RuleIndex {
    schema: Arc<Schema>,
    root: Node,
}

impl RuleIndex {
    pub(crate) fn build(schema: Arc<Schema>, rules: &[Arc<Rule>]) -> Self {
        let mut index = Self {
            schema,
            root: Node::default(),
        };
        for rule in rules {
            index.insert(Arc::clone(rule));
        }
        index
    }

    /// Insert a rule, reusing existing edges and creating the rest of the
    /// path of its inputs in priority order.
    fn insert(&mut self, rule: Arc<Rule>) {
        let mut node = &mut self.root;
        for input in rule.inputs() {
            node = node.children.entry(input.clone()).or_default();
        }
        if let Some(first) = &node.rule {
            // Identical inputs on every column; only reachable through
            // store seeding. The first admitted rule keeps the slot, which
            // matches what a stable specificity sort would pick.
            warn!(kept = %first, dropped = %rule, "duplicate rule inputs in index");
            return;
        }
        node.rule = Some(rule);
    }

    /// Every rule whose inputs all match the request, unranked.
    pub(crate) fn matches(&self, request: &Request) -> Vec<Arc<Rule>> {
        let mut found = Vec::new();
        collect(&self.root, &self.schema, 0, request, &mut found);
        found
    }
}

fn collect(
    node: &Node,
    schema: &Schema,
    depth: usize,
    request: &Request,
    found: &mut Vec<Arc<Rule>>,
) {
    let Some(column) = schema.columns().get(depth) else {
        if let Some(rule) = &node.rule {
            found.push(Arc::clone(rule));
        }
        return;
    };

    let value = request.get(&column.name);
    match column.kind {
        // Exact-literal child first, then the wildcard branch.
        ColumnKind::Text => {
            if !value.is_empty() {
                if let Some(child) = node.children.get(&RuleInput::Value(value.to_owned())) {
                    collect(child, schema, depth + 1, request, found);
                }
            }
            if let Some(child) = node.children.get(&RuleInput::Any) {
                collect(child, schema, depth + 1, request, found);
            }
        }
        // A hash lookup by the request literal cannot see the ranges that
        // contain it; scan the siblings at this level instead.
        ColumnKind::NumericRange => {
            for (input, child) in &node.children {
                if input.satisfies(value) {
                    collect(child, schema, depth + 1, request, found);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::types::Column;

    fn schema() -> Arc<Schema> {
        Arc::new(
            Schema::new(vec![
                Column::text("brand", 1),
                Column::numeric_range("valid_date_range", 2),
            ])
            .unwrap(),
        )
    }

    fn rule(schema: &Arc<Schema>, brand: &str, range: &str, out: &str) -> Arc<Rule> {
        let values: HashMap<String, String> = HashMap::from([
            ("brand".to_owned(), brand.to_owned()),
            ("valid_date_range".to_owned(), range.to_owned()),
            ("rule_output_id".to_owned(), out.to_owned()),
        ]);
        Arc::new(Rule::from_values(schema, &values).unwrap())
    }

    fn outputs(mut rules: Vec<Arc<Rule>>) -> Vec<String> {
        rules.sort_by(|a, b| a.output_id().cmp(b.output_id()));
        rules.iter().map(|r| r.output_id().to_owned()).collect()
    }

    #[test]
    fn exact_and_wildcard_branches_both_found() {
        let schema = schema();
        let rules = vec![
            rule(&schema, "Adidas", "", "100"),
            rule(&schema, "", "", "200"),
            rule(&schema, "Nike", "", "300"),
        ];
        let index = RuleIndex::build(Arc::clone(&schema), &rules);

        let request = Request::new().set("brand", "Adidas");
        assert_eq!(outputs(index.matches(&request)), ["100", "200"]);
    }

    #[test]
    fn range_children_scanned_for_containment() {
        let schema = schema();
        let rules = vec![
            rule(&schema, "Adidas", "0..100", "100"),
            rule(&schema, "Adidas", "200..300", "200"),
            rule(&schema, "Adidas", "", "300"),
        ];
        let index = RuleIndex::build(Arc::clone(&schema), &rules);

        let request = Request::new()
            .set("brand", "Adidas")
            .set("valid_date_range", "50");
        assert_eq!(outputs(index.matches(&request)), ["100", "300"]);

        let outside = Request::new()
            .set("brand", "Adidas")
            .set("valid_date_range", "150");
        assert_eq!(outputs(index.matches(&outside)), ["300"]);
    }

    #[test]
    fn shared_prefix_rules_diverge_below() {
        let schema = schema();
        let rules = vec![
            rule(&schema, "Adidas", "0..100", "100"),
            rule(&schema, "Adidas", "101..200", "200"),
        ];
        let index = RuleIndex::build(Arc::clone(&schema), &rules);

        let request = Request::new()
            .set("brand", "Adidas")
            .set("valid_date_range", "150");
        assert_eq!(outputs(index.matches(&request)), ["200"]);
    }

    #[test]
    fn empty_request_only_reaches_wildcard_paths() {
        let schema = schema();
        let rules = vec![
            rule(&schema, "Adidas", "0..100", "100"),
            rule(&schema, "", "", "200"),
        ];
        let index = RuleIndex::build(Arc::clone(&schema), &rules);

        assert_eq!(outputs(index.matches(&Request::new())), ["200"]);
    }

    #[test]
    fn duplicate_inputs_keep_first_rule() {
        let schema = schema();
        let rules = vec![
            rule(&schema, "Adidas", "0..100", "100"),
            rule(&schema, "Adidas", "0..100", "999"),
        ];
        let index = RuleIndex::build(Arc::clone(&schema), &rules);

        let request = Request::new()
            .set("brand", "Adidas")
            .set("valid_date_range", "50");
        assert_eq!(outputs(index.matches(&request)), ["100"]);
    }
}
