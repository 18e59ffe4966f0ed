//! Query parser
//!
//! Recursive descent over the token stream, one function per precedence
//! level: `or` < `and` < relations (`== != < <= > >= in like`) < `+ -` < `* /`.

use crate::error::{QueryError, Result};
use crate::query::ast::{ArithOp, AstNode, ChainOperand, CompChain, RelOp};
use crate::query::lexer::tokenize;
use crate::query::token::{Token, TokenKind};

/// Deepest AST a query may produce; bounds recursion in the parser and
/// the interpreter
pub const MAX_DEPTH: usize = 256;

/// Parse a query string into an AST
pub fn parse(source: &str) -> Result<AstNode> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(QueryError::Syntax("empty query".to_string()));
    }
    parse_tokens(&tokens)
}

/// Parse an already tokenized query
pub fn parse_tokens(tokens: &[Token]) -> Result<AstNode> {
    let mut parser = Parser {
        tokens,
        position: 0,
        nesting: 0,
        depth: 0,
    };
    let statement = parser.parse_or()?;

    if let Some(token) = parser.peek() {
        return Err(unexpected(token));
    }
    if !statement.is_condition() {
        return Err(QueryError::Syntax(
            "query must be a condition, not a bare expression".to_string(),
        ));
    }
    Ok(statement)
}

fn unexpected(token: &Token) -> QueryError {
    QueryError::Syntax(format!(
        "unexpected token '{}' at line {}",
        token.kind, token.line
    ))
}

fn too_deep() -> QueryError {
    QueryError::Syntax(format!("query nested too deeply (limit {})", MAX_DEPTH))
}

fn require_condition(node: AstNode, operator: &str) -> Result<Box<AstNode>> {
    if node.is_condition() {
        Ok(Box::new(node))
    } else {
        Err(QueryError::Syntax(format!(
            "operands of '{}' must be conditions",
            operator
        )))
    }
}

fn require_expr(node: AstNode, operator: &str) -> Result<Box<AstNode>> {
    if node.is_condition() {
        Err(QueryError::Syntax(format!(
            "operands of '{}' must be expressions, found a condition",
            operator
        )))
    } else {
        Ok(Box::new(node))
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    position: usize,
    /// Open `(`, `[` and `{` around the current position
    nesting: usize,
    /// Depth of the node most recently returned by a `parse_*` method
    depth: usize,
}

impl<'t> Parser<'t> {
    #[inline]
    fn peek(&self) -> Option<&'t Token> {
        self.tokens.get(self.position)
    }

    #[inline]
    fn peek_kind(&self) -> Option<&'t TokenKind> {
        self.peek().map(|token| &token.kind)
    }

    fn next(&mut self) -> Result<&'t Token> {
        let token = self
            .tokens
            .get(self.position)
            .ok_or_else(|| QueryError::Syntax("unexpected end of query".to_string()))?;
        self.position += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<()> {
        let token = self.next()?;
        if token.kind == kind {
            Ok(())
        } else {
            Err(unexpected(token))
        }
    }

    /// Record the depth of a node built over children of depth `left`
    /// and `self.depth`
    fn grow(&mut self, left: usize) -> Result<usize> {
        let depth = left.max(self.depth) + 1;
        if depth > MAX_DEPTH {
            return Err(too_deep());
        }
        self.depth = depth;
        Ok(depth)
    }

    fn open(&mut self) -> Result<()> {
        self.nesting += 1;
        if self.nesting > MAX_DEPTH {
            return Err(too_deep());
        }
        Ok(())
    }

    fn parse_or(&mut self) -> Result<AstNode> {
        let mut left = self.parse_and()?;
        let mut depth = self.depth;
        while self.peek_kind() == Some(&TokenKind::Or) {
            self.position += 1;
            let right = self.parse_and()?;
            depth = self.grow(depth)?;
            left = AstNode::Or(require_condition(left, "or")?, require_condition(right, "or")?);
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<AstNode> {
        let mut left = self.parse_relation()?;
        let mut depth = self.depth;
        while self.peek_kind() == Some(&TokenKind::And) {
            self.position += 1;
            let right = self.parse_relation()?;
            depth = self.grow(depth)?;
            left = AstNode::And(
                require_condition(left, "and")?,
                require_condition(right, "and")?,
            );
        }
        self.depth = depth;
        Ok(left)
    }

    /// Equality, membership, pattern and relational operators share one
    /// left-associative level. Only relational operators may chain.
    fn parse_relation(&mut self) -> Result<AstNode> {
        let mut left = self.parse_additive()?;
        let mut depth = self.depth;
        loop {
            let Some(kind) = self.peek_kind() else {
                break;
            };
            left = match kind {
                TokenKind::Equals => {
                    self.position += 1;
                    let right = self.parse_additive()?;
                    depth = self.grow(depth)?;
                    AstNode::Equals(require_expr(left, "==")?, require_expr(right, "==")?)
                }
                TokenKind::Differs => {
                    self.position += 1;
                    let right = self.parse_additive()?;
                    depth = self.grow(depth)?;
                    AstNode::Differs(require_expr(left, "!=")?, require_expr(right, "!=")?)
                }
                TokenKind::Like => {
                    self.position += 1;
                    let right = self.parse_additive()?;
                    depth = self.grow(depth)?;
                    AstNode::Like(require_expr(left, "like")?, require_expr(right, "like")?)
                }
                TokenKind::In => {
                    self.position += 1;
                    let left = require_expr(left, "in")?;
                    let sequence = self.parse_sequence()?;
                    depth = self.grow(depth)?;
                    AstNode::In(left, Box::new(sequence))
                }
                TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::Less
                | TokenKind::LessEqual => {
                    let op = match kind {
                        TokenKind::Greater => RelOp::Greater,
                        TokenKind::GreaterEqual => RelOp::GreaterEqual,
                        TokenKind::Less => RelOp::Less,
                        _ => RelOp::LessEqual,
                    };
                    self.position += 1;
                    let right = self.parse_additive()?;
                    depth = self.grow(depth)?;
                    let left = match left {
                        AstNode::Comparison(chain) => ChainOperand::Link(Box::new(chain)),
                        other => ChainOperand::First(require_expr(other, "comparison")?),
                    };
                    AstNode::Comparison(CompChain {
                        op,
                        left,
                        right: require_expr(right, "comparison")?,
                    })
                }
                _ => break,
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<AstNode> {
        let mut left = self.parse_term()?;
        let mut depth = self.depth;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => ArithOp::Add,
                Some(TokenKind::Minus) => ArithOp::Sub,
                _ => break,
            };
            self.position += 1;
            let right = self.parse_term()?;
            depth = self.grow(depth)?;
            left = AstNode::Arithmetic {
                op,
                left: require_expr(left, "arithmetic")?,
                right: require_expr(right, "arithmetic")?,
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_term(&mut self) -> Result<AstNode> {
        let mut left = self.parse_primary()?;
        let mut depth = self.depth;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => ArithOp::Mul,
                Some(TokenKind::Slash) => ArithOp::Div,
                _ => break,
            };
            self.position += 1;
            let right = self.parse_primary()?;
            depth = self.grow(depth)?;
            left = AstNode::Arithmetic {
                op,
                left: require_expr(left, "arithmetic")?,
                right: require_expr(right, "arithmetic")?,
            };
        }
        self.depth = depth;
        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<AstNode> {
        let token = self.peek().ok_or_else(|| {
            QueryError::Syntax("unexpected end of query".to_string())
        })?;
        self.depth = 1;
        match &token.kind {
            TokenKind::LeftBracket | TokenKind::LeftBrace => self.parse_sequence(),
            TokenKind::LeftParen => {
                self.position += 1;
                self.open()?;
                let inner = self.parse_or()?;
                self.expect(TokenKind::RightParen)?;
                self.nesting -= 1;
                self.grow(0)?;
                Ok(AstNode::Group(Box::new(inner)))
            }
            TokenKind::Name(name) => {
                self.position += 1;
                Ok(AstNode::Name(name.clone()))
            }
            TokenKind::Integer(value) => {
                self.position += 1;
                Ok(AstNode::Integer(*value))
            }
            TokenKind::Float(value) => {
                self.position += 1;
                Ok(AstNode::Float(*value))
            }
            TokenKind::Str(value) => {
                self.position += 1;
                Ok(AstNode::Str(value.clone()))
            }
            _ => Err(unexpected(token)),
        }
    }

    /// `[` arglist `]` or `{` arglist `}`; at least one element
    fn parse_sequence(&mut self) -> Result<AstNode> {
        let open = self.next()?;
        let close = match open.kind {
            TokenKind::LeftBracket => TokenKind::RightBracket,
            TokenKind::LeftBrace => TokenKind::RightBrace,
            _ => return Err(unexpected(open)),
        };

        self.open()?;
        let mut elements = Vec::new();
        let mut deepest = 0;
        loop {
            let element = self.parse_additive()?;
            deepest = deepest.max(self.depth);
            elements.push(*require_expr(element, "sequence")?);
            match self.next()? {
                token if token.kind == TokenKind::Comma => continue,
                token if token.kind == close => break,
                token => return Err(unexpected(token)),
            }
        }
        self.nesting -= 1;
        self.depth = deepest;
        self.grow(0)?;
        Ok(AstNode::Sequence(elements))
    }
}
