//! Query lexer

use crate::error::{QueryError, Result};
use crate::query::token::{Token, TokenKind};
use smallvec::SmallVec;

/// Token buffer; typical queries fit inline
pub type Tokens = SmallVec<[Token; 16]>;

/// Split a query string into tokens
pub fn tokenize(source: &str) -> Result<Tokens> {
    Lexer::new(source).run()
}

struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    tokens: Tokens,
}

impl Lexer {
    fn new(source: &str) -> Self {
        Self {
            input: source.chars().collect(),
            position: 0,
            line: 1,
            tokens: SmallVec::new(),
        }
    }

    #[inline]
    fn current(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    #[inline]
    fn push(&mut self, kind: TokenKind) {
        self.tokens.push(Token {
            kind,
            line: self.line,
        });
    }

    fn illegal(&self, character: char) -> QueryError {
        QueryError::Lexical {
            character,
            line: self.line,
        }
    }

    /// A leading `-` starts a literal only where an operand is expected
    fn expects_operand(&self) -> bool {
        self.tokens
            .last()
            .map_or(true, |token| !token.kind.ends_operand())
    }

    fn run(mut self) -> Result<Tokens> {
        while let Some(c) = self.current() {
            match c {
                '\n' => {
                    self.line += 1;
                    self.position += 1;
                }
                c if c.is_whitespace() => self.position += 1,
                '0'..='9' => self.read_number()?,
                '-' if self.expects_operand()
                    && self.peek(1).is_some_and(|d| d.is_ascii_digit()) =>
                {
                    self.read_number()?
                }
                '\'' | '"' => self.read_string(c)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.read_word(),
                '=' | '!' | '<' | '>' => self.read_operator(c)?,
                ',' => self.single(TokenKind::Comma),
                '[' => self.single(TokenKind::LeftBracket),
                ']' => self.single(TokenKind::RightBracket),
                '{' => self.single(TokenKind::LeftBrace),
                '}' => self.single(TokenKind::RightBrace),
                '(' => self.single(TokenKind::LeftParen),
                ')' => self.single(TokenKind::RightParen),
                '+' => self.single(TokenKind::Plus),
                '-' => self.single(TokenKind::Minus),
                '*' => self.single(TokenKind::Star),
                '/' => self.single(TokenKind::Slash),
                other => return Err(self.illegal(other)),
            }
        }
        Ok(self.tokens)
    }

    #[inline]
    fn single(&mut self, kind: TokenKind) {
        self.position += 1;
        self.push(kind);
    }

    fn read_operator(&mut self, c: char) -> Result<()> {
        let followed_by_equals = self.peek(1) == Some('=');
        let kind = match (c, followed_by_equals) {
            ('=', true) => TokenKind::Equals,
            ('!', true) => TokenKind::Differs,
            ('>', true) => TokenKind::GreaterEqual,
            ('<', true) => TokenKind::LessEqual,
            ('>', false) => TokenKind::Greater,
            ('<', false) => TokenKind::Less,
            _ => return Err(self.illegal(c)),
        };
        self.position += if followed_by_equals { 2 } else { 1 };
        self.push(kind);
        Ok(())
    }

    fn read_number(&mut self) -> Result<()> {
        let start = self.position;
        let first = self.input[start];
        if first == '-' {
            self.position += 1;
        }
        while self.current().is_some_and(|d| d.is_ascii_digit()) {
            self.position += 1;
        }

        let is_float = self.current() == Some('.');
        if is_float {
            self.position += 1;
            while self.current().is_some_and(|d| d.is_ascii_digit()) {
                self.position += 1;
            }
        }

        let text: String = self.input[start..self.position].iter().collect();
        let kind = if is_float {
            TokenKind::Float(text.parse::<f64>().map_err(|_| self.illegal(first))?)
        } else {
            TokenKind::Integer(text.parse::<i64>().map_err(|_| self.illegal(first))?)
        };
        self.push(kind);
        Ok(())
    }

    /// Quoted literal, taken up to the next matching quote. No escapes.
    fn read_string(&mut self, quote: char) -> Result<()> {
        let start = self.position + 1;
        let Some(len) = self.input[start..].iter().position(|&c| c == quote) else {
            return Err(self.illegal(quote));
        };
        let text: String = self.input[start..start + len].iter().collect();
        let newlines = text.matches('\n').count();
        self.push(TokenKind::Str(text));
        self.line += newlines;
        self.position = start + len + 1;
        Ok(())
    }

    fn read_word(&mut self) {
        let start = self.position;
        while self
            .current()
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            self.position += 1;
        }
        let word: String = self.input[start..self.position].iter().collect();
        let kind = TokenKind::keyword(&word).unwrap_or(TokenKind::Name(word));
        self.push(kind);
    }
}
