//! Error types for the tabletop core

use thiserror::Error;

/// Main error type for query compilation, evaluation and tree access
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    #[error("Illegal character '{character}' at line {line}")]
    Lexical { character: char, line: usize },

    #[error("Syntax error: {0}")]
    Syntax(String),

    #[error("Property not found: {0}")]
    PropertyMissing(String),

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl QueryError {
    /// Whether this error is the "absent property" signal that predicates
    /// turn into a plain `false`
    #[inline]
    pub fn is_property_missing(&self) -> bool {
        matches!(self, QueryError::PropertyMissing(_))
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        QueryError::Deserialization(err.to_string())
    }
}

/// Result type alias for the tabletop core
pub type Result<T> = std::result::Result<T, QueryError>;
