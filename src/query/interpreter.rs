//! Query interpreter
//!
//! Walks an AST with one entity bound as the source of property lookups.

use crate::error::{QueryError, Result};
use crate::property::Value;
use crate::query::ast::{ArithOp, AstNode, ChainOperand, CompChain, RelOp};
use crate::query::glob;
use crate::query::parser::parse;
use crate::tree::Entity;
use std::cmp::Ordering;

/// Tree-walking evaluator bound to one entity
pub struct Interpreter<'a> {
    entity: &'a dyn Entity,
}

impl<'a> Interpreter<'a> {
    pub fn new(entity: &'a dyn Entity) -> Self {
        Self { entity }
    }

    /// Lex, parse and execute `source` against the bound entity
    pub fn interpret(&self, source: &str) -> Result<Value> {
        let ast = parse(source)?;
        self.execute(&ast)
    }

    /// Evaluate an AST node
    pub fn execute(&self, ast: &AstNode) -> Result<Value> {
        match ast {
            AstNode::Name(name) => self.entity.get(name),
            AstNode::Integer(i) => Ok(Value::Integer(*i)),
            AstNode::Float(f) => Ok(Value::Float(*f)),
            AstNode::Str(s) => Ok(Value::String(s.clone())),
            AstNode::Sequence(elements) => elements
                .iter()
                .map(|element| self.execute(element))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            AstNode::Arithmetic { op, left, right } => {
                let left = self.execute(left)?;
                let right = self.execute(right)?;
                arithmetic(*op, &left, &right)
            }
            AstNode::Group(inner) => self.execute(inner),
            AstNode::Equals(left, right) => {
                let left = self.execute(left)?;
                let right = self.execute(right)?;
                Ok(Value::Bool(left.equals(&right)))
            }
            AstNode::Differs(left, right) => {
                let left = self.execute(left)?;
                let right = self.execute(right)?;
                Ok(Value::Bool(!left.equals(&right)))
            }
            AstNode::In(left, right) => {
                let needle = self.execute(left)?;
                let haystack = self.execute(right)?;
                let found = match &haystack {
                    Value::Sequence(items) => items.iter().any(|item| item.equals(&needle)),
                    other => {
                        return Err(QueryError::TypeMismatch(format!(
                            "'in' needs a sequence, found {}",
                            other.type_name()
                        )))
                    }
                };
                Ok(Value::Bool(found))
            }
            AstNode::Like(left, right) => {
                let text = self.execute(left)?.to_text();
                let pattern = self.execute(right)?.to_text();
                glob::matches(&text, &pattern).map(Value::Bool)
            }
            AstNode::Comparison(chain) => {
                self.execute_chain(chain).map(|(holds, _)| Value::Bool(holds))
            }
            AstNode::And(left, right) => {
                if !self.execute(left)?.truthy() {
                    return Ok(Value::Bool(false));
                }
                Ok(Value::Bool(self.execute(right)?.truthy()))
            }
            AstNode::Or(left, right) => {
                if self.execute(left)?.truthy() {
                    return Ok(Value::Bool(true));
                }
                Ok(Value::Bool(self.execute(right)?.truthy()))
            }
        }
    }

    /// Evaluate a chain link to `(accumulated result, right operand)`
    fn execute_chain(&self, chain: &CompChain) -> Result<(bool, Value)> {
        let (accumulated, left) = match &chain.left {
            ChainOperand::First(expr) => (true, self.execute(expr)?),
            ChainOperand::Link(previous) => self.execute_chain(previous)?,
        };
        let right = self.execute(&chain.right)?;
        let holds = accumulated && relation(chain.op, &left, &right)?;
        Ok((holds, right))
    }
}

/// Evaluate an AST against an entity and reduce the result to a boolean
pub fn check(ast: &AstNode, entity: &dyn Entity) -> Result<bool> {
    Interpreter::new(entity).execute(ast).map(|value| value.truthy())
}

fn relation(op: RelOp, left: &Value, right: &Value) -> Result<bool> {
    let Some(ordering) = left.compare(right)? else {
        return Ok(false);
    };
    Ok(match op {
        RelOp::Greater => ordering == Ordering::Greater,
        RelOp::GreaterEqual => ordering != Ordering::Less,
        RelOp::Less => ordering == Ordering::Less,
        RelOp::LessEqual => ordering != Ordering::Greater,
    })
}

fn arithmetic(op: ArithOp, left: &Value, right: &Value) -> Result<Value> {
    match (op, left, right) {
        (ArithOp::Add, Value::String(a), Value::String(b)) => {
            Ok(Value::String(format!("{}{}", a, b)))
        }
        (ArithOp::Add, Value::Sequence(a), Value::Sequence(b)) => {
            Ok(Value::Sequence(a.iter().chain(b).cloned().collect()))
        }
        (_, Value::Integer(a), Value::Integer(b)) => integer_arithmetic(op, *a, *b),
        _ => match (left.as_f64(), right.as_f64()) {
            (Some(a), Some(b)) => float_arithmetic(op, a, b),
            _ => Err(QueryError::TypeMismatch(format!(
                "unsupported operand types for {}: {} and {}",
                symbol(op),
                left.type_name(),
                right.type_name()
            ))),
        },
    }
}

fn integer_arithmetic(op: ArithOp, a: i64, b: i64) -> Result<Value> {
    let result = match op {
        ArithOp::Add => a.checked_add(b),
        ArithOp::Sub => a.checked_sub(b),
        ArithOp::Mul => a.checked_mul(b),
        // Division never truncates
        ArithOp::Div => return float_arithmetic(op, a as f64, b as f64),
    };
    result.map(Value::Integer).ok_or_else(|| {
        QueryError::Arithmetic(format!("integer overflow in {} {} {}", a, symbol(op), b))
    })
}

fn float_arithmetic(op: ArithOp, a: f64, b: f64) -> Result<Value> {
    let result = match op {
        ArithOp::Add => a + b,
        ArithOp::Sub => a - b,
        ArithOp::Mul => a * b,
        ArithOp::Div => {
            if b == 0.0 {
                return Err(QueryError::Arithmetic("division by zero".to_string()));
            }
            a / b
        }
    };
    Ok(Value::Float(result))
}

fn symbol(op: ArithOp) -> &'static str {
    match op {
        ArithOp::Add => "+",
        ArithOp::Sub => "-",
        ArithOp::Mul => "*",
        ArithOp::Div => "/",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Component;

    fn component() -> Component {
        Component::new().with("name", "toto").with("value", 10)
    }

    fn eval(query: &str) -> Result<Value> {
        let component = component();
        Interpreter::new(&component).interpret(query)
    }

    fn truth(query: &str) -> bool {
        match eval(query) {
            Ok(Value::Bool(b)) => b,
            other => panic!("Expected boolean for {:?}, got {:?}", query, other),
        }
    }

    #[test]
    fn test_equals() {
        assert!(truth("name == 'toto'"));
        assert!(!truth("name == 'titi'"));
        assert!(!truth("value == 11"));
        assert!(truth("value == 10"));
        assert!(truth("value == 10.0"));
    }

    #[test]
    fn test_differs() {
        assert!(!truth("name != 'toto'"));
        assert!(truth("name != 'tutu'"));
    }

    #[test]
    fn test_and_or() {
        assert!(!truth("name == 'tutu' or name == 'tata'"));
        assert!(truth("name == 'tutu' or value == 10"));
        assert!(truth("name == 'toto' or value == 11"));
        assert!(!truth("name == 'toto' and value == 11"));
        assert!(!truth("name == 'tutu' and value == 10"));
        assert!(truth("name == 'toto' and value == 10"));
    }

    #[test]
    fn test_greater() {
        assert!(truth("11 > 10 > 9"));
        assert!(truth("value >= 10"));
        assert!(truth("value > 9"));
        assert!(!truth("value >= 11"));
        assert!(!truth("value > 10"));
        assert!(truth("value > -10.2"));
        assert!(truth("value >= 9.99"));
    }

    #[test]
    fn test_lower_and_chains() {
        assert!(truth("1 <= 2 <= 3"));
        assert!(truth("1 < 4 < 5"));
        assert!(truth("1 < 2 <= 2"));
        assert!(truth("value <= 10"));
        assert!(truth("value < 11"));
        assert!(!truth("value <= 9"));
        assert!(!truth("value < 10"));
        assert!(truth("8 < value <= 11"));
        assert!(truth("12 > value <= 15"));
        assert!(!truth("12 > value <= 8"));
    }

    #[test]
    fn test_chain_compares_adjacent_pairs_only() {
        // 1 < 5 and 5 > 2: the non-adjacent pair 1 > 2 is never checked
        assert!(truth("1 < 5 > 2"));
        assert!(!truth("1 < 5 > 7"));
        assert!(truth("1 < 2 < 3 < 4 < 5 < 6"));
        assert!(!truth("1 < 2 < 3 < 3 < 5 < 6"));
    }

    #[test]
    fn test_chain_stops_comparing_after_false() {
        // 'a' is only reached after 2 < 1 already failed
        assert!(!truth("2 < 1 < 'a'"));
        assert!(matches!(eval("1 < 2 < 'a'"), Err(QueryError::TypeMismatch(_))));
    }

    #[test]
    fn test_in() {
        assert!(truth("name in ['toto', 'tutu', 'tata']"));
        assert!(!truth("name in ['tutu', 'tata', -12.13]"));
        assert!(!truth("name in [['toto', 'tata'], -12.13]"));
        assert!(truth("name in [{'tutu', 'tata'}, 'toto']"));
        assert!(truth("['a', 'b'] in [['a', 'b'], 1]"));
        assert!(truth("value in [1, 10.0]"));
    }

    #[test]
    fn test_like() {
        assert!(truth("name like 'tot?'"));
        assert!(truth("name like '*to'"));
        assert!(!truth("name like 'tata'"));
        assert!(!truth("name like 12.34"));
        assert!(truth("value like '1?'"));
        assert!(truth("name like '[a-z]oto'"));
    }

    #[test]
    fn test_parenthesis() {
        assert!(truth(
            "(name == 'tutu' and value <= 10) or (name == 'toto' and value > 5)"
        ));
    }

    #[test]
    fn test_maths() {
        assert!(truth("1 + 2 == 3"));
        assert!(truth("2 * 3 == 6"));
        assert!(truth("2 - 3 == -1"));
        assert!(truth("2-3 == -1"));
        assert!(truth("1.0 / 2.0 == 0.5"));
        assert!(truth("1 / 2 == 0.5"));
        assert!(truth("1 + 2 * 3 == 7"));
        assert!(truth("(1 + 2) * 3 == 9"));
        assert!(truth("(1+2)*3==9"));
        assert!(truth("1 + (2 * 3) == 7"));
        assert!(truth("(1 + 2) * (5 - 3) == 1 + (3 * 2) - 1"));
        assert!(truth("3 * (1 - (6 / 3 + 2)) == -9"));
        assert!(truth("3 * 1 - 6 / 3 + 2 == 3"));
        assert!(truth("value * 2 - 5 == 15"));
    }

    #[test]
    fn test_concatenation() {
        assert!(truth("name + '!' == 'toto!'"));
        assert!(truth("[1] + [2, 3] == [1, 2, 3]"));
    }

    #[test]
    fn test_sequence_value() {
        let component = component();
        let ast = AstNode::Sequence(vec![
            AstNode::Name("value".to_string()),
            AstNode::Sequence(vec![AstNode::Integer(1)]),
        ]);
        let value = Interpreter::new(&component).execute(&ast).unwrap();
        assert_eq!(
            value,
            Value::Sequence(vec![
                Value::Integer(10),
                Value::Sequence(vec![Value::Integer(1)]),
            ])
        );
    }

    #[test]
    fn test_missing_property_propagates() {
        assert_eq!(
            eval("missing == 1"),
            Err(QueryError::PropertyMissing("missing".to_string()))
        );
    }

    #[test]
    fn test_hidden_component_reads_null() {
        let mut component = component();
        component.set_visible(false);
        let interpreter = Interpreter::new(&component);
        assert_eq!(interpreter.interpret("name == 'toto'"), Ok(Value::Bool(false)));
        assert_eq!(interpreter.interpret("missing != 1"), Ok(Value::Bool(true)));
    }

    #[test]
    fn test_type_mismatch() {
        assert!(matches!(eval("name > 1"), Err(QueryError::TypeMismatch(_))));
        assert!(matches!(eval("name - 1 == 0"), Err(QueryError::TypeMismatch(_))));
    }

    #[test]
    fn test_arithmetic_errors() {
        assert!(matches!(eval("value / 0 == 1"), Err(QueryError::Arithmetic(_))));
        assert!(matches!(
            eval("9223372036854775807 + 1 == 0"),
            Err(QueryError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_check_reduces_to_bool() {
        let component = component();
        let ast = parse("value > 5").unwrap();
        assert!(check(&ast, &component).unwrap());
    }
}
