//! Predicates: boolean tests over entities
//!
//! A predicate is built either from query text, compiled on each call
//! (through the query cache when enabled), or from a native callback.
//! A missing property on the tested entity is not an error: the predicate
//! simply does not match.

use crate::error::{QueryError, Result};
use crate::query;
use crate::tree::Entity;
use std::fmt;
use std::rc::Rc;
use tracing::trace;

/// Native predicate callback; return `QueryError::PropertyMissing` (for
/// example through `entity.get(..)?`) to take part in the "missing means
/// false" rule
pub type NativePredicate = dyn Fn(&dyn Entity) -> Result<bool>;

/// Boolean test over an entity
#[derive(Clone)]
pub enum Predicate {
    /// Query text such as `"value > 3 and name like 'card*'"`
    Query(String),
    /// Native callback used as-is
    Native(Rc<NativePredicate>),
}

impl Predicate {
    pub fn query(source: impl Into<String>) -> Self {
        Predicate::Query(source.into())
    }

    pub fn native<F>(callback: F) -> Self
    where
        F: Fn(&dyn Entity) -> Result<bool> + 'static,
    {
        Predicate::Native(Rc::new(callback))
    }

    /// Predicate matching every entity
    pub fn always() -> Self {
        Predicate::native(|_| Ok(true))
    }

    /// Query predicate whose text is checked up front, so lexical and
    /// syntax errors surface here rather than on first use
    pub fn compile(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        query::compile(&source)?;
        Ok(Predicate::Query(source))
    }

    /// Query text, if this is a query predicate
    pub fn source(&self) -> Option<&str> {
        match self {
            Predicate::Query(source) => Some(source),
            Predicate::Native(_) => None,
        }
    }

    /// Evaluate against `entity`.
    ///
    /// `PropertyMissing` becomes `Ok(false)`; malformed queries, type
    /// mismatches and arithmetic errors are returned to the caller.
    pub fn test(&self, entity: &dyn Entity) -> Result<bool> {
        let outcome = match self {
            Predicate::Query(source) => {
                let ast = query::compile(source)?;
                query::check(&ast, entity)
            }
            Predicate::Native(callback) => callback(entity),
        };

        match outcome {
            Err(QueryError::PropertyMissing(name)) => {
                trace!(
                    property = %name,
                    entity = %entity.id(),
                    "missing property, predicate is false"
                );
                Ok(false)
            }
            other => other,
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Query(source) => f.debug_tuple("Query").field(source).finish(),
            Predicate::Native(_) => f.write_str("Native(..)"),
        }
    }
}

impl From<&str> for Predicate {
    fn from(source: &str) -> Self {
        Predicate::Query(source.to_string())
    }
}

impl From<String> for Predicate {
    fn from(source: String) -> Self {
        Predicate::Query(source)
    }
}

impl From<&Predicate> for Predicate {
    fn from(predicate: &Predicate) -> Self {
        predicate.clone()
    }
}

impl<F> From<F> for Predicate
where
    F: Fn(&dyn Entity) -> Result<bool> + 'static,
{
    fn from(callback: F) -> Self {
        Predicate::native(callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::Value;
    use crate::tree::Component;

    fn component() -> Component {
        Component::new().with("name", "toto").with("value", 10)
    }

    #[test]
    fn test_query() {
        let component = component();
        assert!(Predicate::from("name == 'toto'").test(&component).unwrap());
        assert!(!Predicate::from("name == 'titi'").test(&component).unwrap());
        assert!(Predicate::from("1 <= value <= 10").test(&component).unwrap());
    }

    #[test]
    fn test_chains() {
        let component = component();
        let anything = Component::new();
        assert!(Predicate::from("1 < 2 <= 2").test(&anything).unwrap());
        assert!(Predicate::from("8 < value <= 11").test(&component).unwrap());
        assert!(!Predicate::from("12 > value <= 8").test(&component).unwrap());
    }

    #[test]
    fn test_missing_property_is_false() {
        let component = component();
        assert!(!Predicate::from("x == 1").test(&component).unwrap());
        assert!(!Predicate::from("Value >= 1").test(&component).unwrap());
        // Missing on one side of `or` still makes the whole query false
        assert!(!Predicate::from("x == 1 or value == 10").test(&component).unwrap());
    }

    #[test]
    fn test_malformed_query_propagates() {
        let component = component();
        assert!(matches!(
            Predicate::from("name == == 'toto'").test(&component),
            Err(QueryError::Syntax(_))
        ));
        assert!(matches!(
            Predicate::from("name === 'toto'").test(&component),
            Err(QueryError::Lexical { character: '=', .. })
        ));
        assert!(matches!(
            Predicate::from("name == 'toto' && value").test(&component),
            Err(QueryError::Lexical { character: '&', .. })
        ));
        assert!(matches!(
            Predicate::from("name > 3").test(&component),
            Err(QueryError::TypeMismatch(_))
        ));
    }

    #[test]
    fn test_deeply_nested_query_is_an_error() {
        let query = format!("{}1 == 1{}", "(".repeat(2000), ")".repeat(2000));
        assert!(matches!(
            Predicate::from(query).test(&component()),
            Err(QueryError::Syntax(_))
        ));
    }

    #[test]
    fn test_compile_validates_eagerly() {
        assert!(Predicate::compile("value > 3").is_ok());
        assert!(matches!(
            Predicate::compile("value >"),
            Err(QueryError::Syntax(_))
        ));
    }

    #[test]
    fn test_native() {
        let component = component();
        let predicate = Predicate::native(|entity| Ok(entity.get("name")? == Value::from("toto")));
        assert!(predicate.test(&component).unwrap());
        assert_eq!(predicate.source(), None);
    }

    #[test]
    fn test_native_missing_property_is_false() {
        let component = component();
        let predicate = Predicate::native(|entity| Ok(entity.get("x")?.truthy()));
        assert!(!predicate.test(&component).unwrap());
    }

    #[test]
    fn test_native_other_errors_propagate() {
        let predicate =
            Predicate::native(|_| Err(QueryError::TypeMismatch("custom".to_string())));
        assert!(predicate.test(&component()).is_err());
    }

    #[test]
    fn test_closure_conversion() {
        let callback = |entity: &dyn Entity| -> Result<bool> {
            Ok(entity.get("value")? == Value::Integer(10))
        };
        let predicate: Predicate = callback.into();
        assert!(predicate.test(&component()).unwrap());
    }

    #[test]
    fn test_always() {
        let mut hidden = Component::new();
        hidden.set_visible(false);
        assert!(Predicate::always().test(&hidden).unwrap());
    }

    #[test]
    fn test_reusable_across_components() {
        let predicate = Predicate::from("value > 5");
        let high = Component::new().with("value", 9);
        let low = Component::new().with("value", 1);
        assert!(predicate.test(&high).unwrap());
        assert!(!predicate.test(&low).unwrap());
        assert!(predicate.test(&high).unwrap());
    }
}
