use std::cmp::Ordering;
use std::collections::HashMap;

use proptest::prelude::*;
use rulebook::{Column, MemoryStore, Request, Rule, RuleSystem};

// --- Fixed column schema ---
// brand            : text, one of {Adidas, Nike, Puma} or Any
// article_type     : text, one of {T Shirt, Shirt, Shoe} or Any
// is_active        : text, one of {0, 1} or Any
// valid_date_range : numeric range over small bounds, or Any

const BRANDS: &[&str] = &["Adidas", "Nike", "Puma"];
const ARTICLES: &[&str] = &["T Shirt", "Shirt", "Shoe"];
const FLAGS: &[&str] = &["0", "1"];

/// A store seeded with the fixed schema and no rules.
pub fn empty_store() -> MemoryStore {
    let store = MemoryStore::new();
    store.create_system(
        "proptest",
        vec![
            Column::text("brand", 1),
            Column::text("article_type", 2),
            Column::text("is_active", 3),
            Column::numeric_range("valid_date_range", 4),
        ],
    );
    store
}

fn arb_text(pool: &'static [&'static str]) -> impl Strategy<Value = String> {
    prop_oneof![
        2 => prop::sample::select(pool).prop_map(str::to_owned),
        1 => Just(String::new()),
    ]
}

fn arb_range() -> impl Strategy<Value = String> {
    prop_oneof![
        2 => (0_i64..=8, 0_i64..=8).prop_map(|(a, b)| {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            format!("{low}..{high}")
        }),
        1 => Just(String::new()),
    ]
}

/// Raw column values for one candidate rule.
pub fn arb_rule_values() -> impl Strategy<Value = HashMap<String, String>> {
    (
        arb_text(BRANDS),
        arb_text(ARTICLES),
        arb_text(FLAGS),
        arb_range(),
        1_u32..=999,
    )
        .prop_map(|(brand, article, active, range, out)| {
            HashMap::from([
                ("brand".to_owned(), brand),
                ("article_type".to_owned(), article),
                ("is_active".to_owned(), active),
                ("valid_date_range".to_owned(), range),
                ("rule_output_id".to_owned(), out.to_string()),
            ])
        })
}

/// A request aligned with the fixed schema.
pub fn arb_request() -> impl Strategy<Value = Request> {
    (
        prop::sample::select(BRANDS),
        prop::sample::select(ARTICLES),
        prop::sample::select(FLAGS),
        0_i64..=8,
    )
        .prop_map(|(brand, article, active, point)| {
            Request::new()
                .set("brand", brand)
                .set("article_type", article)
                .set("is_active", active)
                .set("valid_date_range", point.to_string())
        })
}

/// Admit candidates in order through `add_rule`, dropping the ones that
/// conflict with an earlier admission. The result honors the engine's
/// no-coexisting-conflicts guarantee by construction.
pub fn build_system(candidates: &[HashMap<String, String>]) -> RuleSystem<MemoryStore> {
    let system = RuleSystem::new("proptest", empty_store()).expect("store is seeded");
    for values in candidates {
        match system.add_rule_from_values(values) {
            Ok(_) | Err(rulebook::RulebookError::Conflict(_)) => {}
            Err(other) => panic!("unexpected admission error: {other}"),
        }
    }
    system
}

/// Test-side reimplementation of the expected specificity order, built
/// only from the public rule surface: first differing column in priority
/// order, non-wildcard first.
pub fn expected_order(a: &Rule, b: &Rule) -> Ordering {
    for (lhs, rhs) in a.inputs().iter().zip(b.inputs()) {
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
