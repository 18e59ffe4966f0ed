//! Tokens produced by the query lexer

use std::fmt;

/// Token kinds with their literal payloads
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Name(String),
    Integer(i64),
    Float(f64),
    Str(String),
    /// `==`
    Equals,
    /// `!=`
    Differs,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    And,
    Or,
    In,
    Like,
    Comma,
    LeftBracket,
    RightBracket,
    LeftBrace,
    RightBrace,
    LeftParen,
    RightParen,
    Plus,
    Minus,
    Star,
    Slash,
}

impl TokenKind {
    /// Reserved words are only recognized as whole identifiers
    pub fn keyword(ident: &str) -> Option<TokenKind> {
        match ident {
            "and" => Some(TokenKind::And),
            "or" => Some(TokenKind::Or),
            "in" => Some(TokenKind::In),
            "like" => Some(TokenKind::Like),
            _ => None,
        }
    }

    /// True for tokens after which an operand can no longer follow directly,
    /// i.e. a `-` right after them is the minus operator
    pub fn ends_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Name(_)
                | TokenKind::Integer(_)
                | TokenKind::Float(_)
                | TokenKind::Str(_)
                | TokenKind::RightBracket
                | TokenKind::RightBrace
                | TokenKind::RightParen
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Name(name) => write!(f, "{}", name),
            TokenKind::Integer(i) => write!(f, "{}", i),
            TokenKind::Float(x) => write!(f, "{:?}", x),
            TokenKind::Str(s) => write!(f, "'{}'", s),
            TokenKind::Equals => write!(f, "=="),
            TokenKind::Differs => write!(f, "!="),
            TokenKind::Greater => write!(f, ">"),
            TokenKind::GreaterEqual => write!(f, ">="),
            TokenKind::Less => write!(f, "<"),
            TokenKind::LessEqual => write!(f, "<="),
            TokenKind::And => write!(f, "and"),
            TokenKind::Or => write!(f, "or"),
            TokenKind::In => write!(f, "in"),
            TokenKind::Like => write!(f, "like"),
            TokenKind::Comma => write!(f, ","),
            TokenKind::LeftBracket => write!(f, "["),
            TokenKind::RightBracket => write!(f, "]"),
            TokenKind::LeftBrace => write!(f, "{{"),
            TokenKind::RightBrace => write!(f, "}}"),
            TokenKind::LeftParen => write!(f, "("),
            TokenKind::RightParen => write!(f, ")"),
            TokenKind::Plus => write!(f, "+"),
            TokenKind::Minus => write!(f, "-"),
            TokenKind::Star => write!(f, "*"),
            TokenKind::Slash => write!(f, "/"),
        }
    }
}

/// A token with the line it was read on
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}
