//! Query language: lexing, parsing and evaluation
//!
//! Queries are small boolean expressions such as
//! `"8 < value <= 11 and name like 'card*'"`, evaluated against the
//! properties of one entity.

mod ast;
pub mod cache;
mod glob;
mod interpreter;
pub mod lexer;
pub mod parser;
mod token;

#[cfg(test)]
mod property_tests;

pub use ast::*;
pub use cache::*;
pub use interpreter::*;
pub use lexer::*;
pub use parser::*;
pub use token::*;
