use std::fmt;
use std::fmt::Formatter;

/// The closed set of token classes the parser can see.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Number,
    Plus,
    Minus,
    Times,
    Divide,
    LeftParenthesis,
    RightParenthesis,
    EndOfInput,
}

impl TokenKind {
    /// The name used when reporting this kind in an error, e.g. `RPAREN`.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::Number => "NUMBER",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Times => "TIMES",
            TokenKind::Divide => "DIVIDE",
            TokenKind::LeftParenthesis => "LPAREN",
            TokenKind::RightParenthesis => "RPAREN",
            TokenKind::EndOfInput => "END-OF-INPUT",
        }
    }

    /// The fixed source text of a kind, if it has one.
    pub fn symbol(&self) -> Option<&'static str> {
        match self {
            TokenKind::Plus => Some("+"),
            TokenKind::Minus => Some("-"),
            TokenKind::Times => Some("*"),
            TokenKind::Divide => Some("/"),
            TokenKind::LeftParenthesis => Some("("),
            TokenKind::RightParenthesis => Some(")"),
            TokenKind::Number | TokenKind::EndOfInput => None,
        }
    }

    pub fn is_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Times | TokenKind::Divide
        )
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A discrete part of an expression, along with the text it was scanned from.
///
/// Tokens are never changed once the lexer has produced them.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: String,
    offset: usize,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Token {
        Token {
            kind,
            text: text.into(),
            offset,
        }
    }

    /// Creates a token of a fixed-text kind, such as `+` or `(`.
    ///
    /// Number and end-of-input tokens have no fixed text and get an empty one.
    pub fn new_symbol(kind: TokenKind, offset: usize) -> Token {
        Token::new(kind, kind.symbol().unwrap_or_default(), offset)
    }

    pub fn new_number(value: i64, offset: usize) -> Token {
        Token::new(TokenKind::Number, value.to_string(), offset)
    }

    pub fn end_of_input(offset: usize) -> Token {
        Token::new(TokenKind::EndOfInput, "", offset)
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The exact substring of the input this token was matched from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Byte offset into the input where this token starts.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_end_of_input(&self) -> bool {
        self.kind == TokenKind::EndOfInput
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::EndOfInput => write!(f, "{}", self.kind),
            _ => write!(f, "{}", self.text),
        }
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?})@{}", self.kind, self.text, self.offset)
    }
}
