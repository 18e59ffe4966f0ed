//! Property tests for the query language
//!
//! Chains, arithmetic and membership checked against plain Rust
//! computations, plus cache transparency.

use proptest::prelude::*;

use crate::property::Value;
use crate::query::ast::AstNode;
use crate::query::cache::compile;
use crate::query::interpreter::Interpreter;
use crate::query::parser::parse;
use crate::tree::Component;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

/// Generate a relational operator with its Rust counterpart
fn relation_strategy() -> impl Strategy<Value = (&'static str, fn(i64, i64) -> bool)> {
    prop_oneof![
        Just((">", (|a: i64, b: i64| a > b) as fn(i64, i64) -> bool)),
        Just((">=", (|a: i64, b: i64| a >= b) as fn(i64, i64) -> bool)),
        Just(("<", (|a: i64, b: i64| a < b) as fn(i64, i64) -> bool)),
        Just(("<=", (|a: i64, b: i64| a <= b) as fn(i64, i64) -> bool)),
    ]
}

/// Generate small operands that never overflow under `+`, `-`, `*`
fn operand_strategy() -> impl Strategy<Value = i64> {
    -1000..=1000i64
}

/// Generate a well-formed query over `value` and `name`
fn query_strategy() -> impl Strategy<Value = String> {
    (operand_strategy(), operand_strategy(), "[a-z]{1,6}").prop_map(|(low, high, name)| {
        format!("{} < value <= {} or name like '{}*'", low, high, name)
    })
}

fn evaluate(source: &str, component: &Component) -> Value {
    Interpreter::new(component).interpret(source).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// `a op1 b op2 c` holds exactly when both adjacent comparisons hold
    #[test]
    fn prop_chain_is_pairwise_conjunction(
        a in operand_strategy(),
        b in operand_strategy(),
        c in operand_strategy(),
        (op1, rel1) in relation_strategy(),
        (op2, rel2) in relation_strategy()
    ) {
        let component = Component::new();
        let chained = evaluate(&format!("{} {} {} {} {}", a, op1, b, op2, c), &component);
        let expanded = evaluate(
            &format!("({} {} {}) and ({} {} {})", a, op1, b, b, op2, c),
            &component,
        );

        prop_assert_eq!(&chained, &Value::Bool(rel1(a, b) && rel2(b, c)));
        prop_assert_eq!(chained, expanded);
    }

    /// Chains read their middle operand from the bound component
    #[test]
    fn prop_chain_over_property(
        low in operand_strategy(),
        value in operand_strategy(),
        high in operand_strategy()
    ) {
        let component = Component::new().with("value", value);
        let result = evaluate(&format!("{} < value <= {}", low, high), &component);
        prop_assert_eq!(result, Value::Bool(low < value && value <= high));
    }

    /// Integer arithmetic follows precedence and stays integral
    #[test]
    fn prop_arithmetic_matches_rust(
        a in operand_strategy(),
        b in operand_strategy(),
        c in operand_strategy()
    ) {
        let component = Component::new().with("a", a).with("b", b).with("c", c);
        let sum = evaluate(&format!("a + b * c == {}", a + b * c), &component);
        prop_assert_eq!(sum, Value::Bool(true));
        let product = evaluate(&format!("(a - b) * c == {}", (a - b) * c), &component);
        prop_assert_eq!(product, Value::Bool(true));
        let off_by_one = evaluate(&format!("a + b * c == {}", a + b * c + 1), &component);
        prop_assert_eq!(off_by_one, Value::Bool(false));

        let ast = parse(&format!("a + b * c == {}", a + b * c)).unwrap();
        match &ast {
            AstNode::Equals(left, _) => {
                let value = Interpreter::new(&component).execute(left).unwrap();
                prop_assert_eq!(value, Value::Integer(a + b * c));
            }
            other => prop_assert!(false, "Expected equality, got {:?}", other),
        }
    }

    /// Membership agrees with `contains` on the literal list
    #[test]
    fn prop_in_matches_contains(
        value in -5..=5i64,
        items in prop::collection::vec(-5..=5i64, 1..6)
    ) {
        let component = Component::new().with("value", value);
        let list = items
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        let result = evaluate(&format!("value in [{}]", list), &component);
        prop_assert_eq!(result, Value::Bool(items.contains(&value)));
    }

    /// Parsing is a pure function of the text
    #[test]
    fn prop_parse_is_deterministic(source in query_strategy()) {
        prop_assert_eq!(parse(&source).unwrap(), parse(&source).unwrap());
    }

    /// Going through the cache never changes the compiled query
    #[test]
    fn prop_cache_is_transparent(source in query_strategy()) {
        let direct = parse(&source).unwrap();
        let cached = compile(&source).unwrap();
        let again = compile(&source).unwrap();
        prop_assert_eq!(&*cached, &direct);
        prop_assert_eq!(&*again, &direct);
    }
}
