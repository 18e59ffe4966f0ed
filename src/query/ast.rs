//! Abstract Syntax Tree for queries

/// AST node for query expressions and conditions
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Property lookup on the bound component
    Name(String),
    Integer(i64),
    Float(f64),
    Str(String),
    /// `[a, b]` or `{a, b}`
    Sequence(Vec<AstNode>),
    /// `a + b`, `a - b`, `a * b`, `a / b`
    Arithmetic {
        op: ArithOp,
        left: Box<AstNode>,
        right: Box<AstNode>,
    },
    /// Parenthesized expression or condition
    Group(Box<AstNode>),
    Equals(Box<AstNode>, Box<AstNode>),
    Differs(Box<AstNode>, Box<AstNode>),
    /// Membership test; the right side is always a `Sequence`
    In(Box<AstNode>, Box<AstNode>),
    /// Glob match of the left side against the right side's text
    Like(Box<AstNode>, Box<AstNode>),
    /// Reduction of a comparison chain to its accumulated boolean
    Comparison(CompChain),
    And(Box<AstNode>, Box<AstNode>),
    Or(Box<AstNode>, Box<AstNode>),
}

impl AstNode {
    /// Whether the node produces a boolean condition rather than a value
    pub fn is_condition(&self) -> bool {
        match self {
            AstNode::Equals(..)
            | AstNode::Differs(..)
            | AstNode::In(..)
            | AstNode::Like(..)
            | AstNode::Comparison(_)
            | AstNode::And(..)
            | AstNode::Or(..) => true,
            AstNode::Group(inner) => inner.is_condition(),
            _ => false,
        }
    }
}

/// One link of a relational chain: `left op right`
///
/// `a < b <= c` is `Link(a < b) <= c`, so each link only compares its own
/// right operand with the right operand of the link before it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompChain {
    pub op: RelOp,
    pub left: ChainOperand,
    pub right: Box<AstNode>,
}

/// Left side of a chain link, decided by the parser
#[derive(Debug, Clone, PartialEq)]
pub enum ChainOperand {
    /// Plain expression: this link starts the chain
    First(Box<AstNode>),
    /// Earlier link whose right operand is reused
    Link(Box<CompChain>),
}

/// Relational operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelOp {
    /// Greater than (>)
    Greater,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than (<)
    Less,
    /// Less than or equal (<=)
    LessEqual,
}

/// Arithmetic operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}
