use crate::interpreter::error::LexError;
use crate::interpreter::token::{Token, TokenKind};
use anyhow::{Context, Result};
use log::trace;
use std::iter::FusedIterator;

/// A class of input text the lexer knows how to match.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum Pattern {
    Number,
    Plus,
    Minus,
    Times,
    Divide,
    LeftParenthesis,
    RightParenthesis,
    Whitespace,
}

/// Patterns are tried in this order at every offset; the first match wins.
const PRIORITY: [Pattern; 8] = [
    Pattern::Number,
    Pattern::Plus,
    Pattern::Minus,
    Pattern::Times,
    Pattern::Divide,
    Pattern::LeftParenthesis,
    Pattern::RightParenthesis,
    Pattern::Whitespace,
];

impl Pattern {
    fn matches(&self, character: char) -> bool {
        match self {
            Pattern::Number => character.is_ascii_digit(),
            Pattern::Plus => character == '+',
            Pattern::Minus => character == '-',
            Pattern::Times => character == '*',
            Pattern::Divide => character == '/',
            Pattern::LeftParenthesis => character == '(',
            Pattern::RightParenthesis => character == ')',
            Pattern::Whitespace => matches!(character, ' ' | '\t' | '\n' | '\r'),
        }
    }

    /// Whether the pattern takes the whole contiguous run of matching characters.
    fn is_repeating(&self) -> bool {
        matches!(self, Pattern::Number | Pattern::Whitespace)
    }

    /// The kind of token produced, or `None` for text that is skipped.
    fn token_kind(&self) -> Option<TokenKind> {
        match self {
            Pattern::Number => Some(TokenKind::Number),
            Pattern::Plus => Some(TokenKind::Plus),
            Pattern::Minus => Some(TokenKind::Minus),
            Pattern::Times => Some(TokenKind::Times),
            Pattern::Divide => Some(TokenKind::Divide),
            Pattern::LeftParenthesis => Some(TokenKind::LeftParenthesis),
            Pattern::RightParenthesis => Some(TokenKind::RightParenthesis),
            Pattern::Whitespace => None,
        }
    }

    fn find(character: char) -> Option<Pattern> {
        PRIORITY
            .iter()
            .copied()
            .find(|pattern| pattern.matches(character))
    }
}

/// Produces tokens from an input text on demand, left to right.
///
/// Whitespace is skipped. Once the input runs out a single end-of-input token
/// is produced, after which the lexer is exhausted and produces nothing more.
/// A lexer that hits an unrecognized character is exhausted as well.
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    text: &'a str,
    offset: usize,
    exhausted: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(text: &'a str) -> Lexer<'a> {
        Lexer {
            text,
            offset: 0,
            exhausted: false,
        }
    }

    /// Byte offset of the next character to be scanned.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Scans the next token.
    ///
    /// returns: The next token, the end-of-input token when the text runs out,
    /// or `None` once that end-of-input token has already been produced.
    pub fn next_token(&mut self) -> Result<Option<Token>, LexError> {
        while !self.exhausted {
            let rest = &self.text[self.offset..];
            let character = match rest.chars().next() {
                Some(character) => character,
                None => {
                    self.exhausted = true;
                    trace!("end of input at offset {}", self.offset);
                    return Ok(Some(Token::end_of_input(self.offset)));
                }
            };

            let pattern = match Pattern::find(character) {
                Some(pattern) => pattern,
                None => {
                    self.exhausted = true;
                    return Err(LexError {
                        character,
                        offset: self.offset,
                    });
                }
            };

            let length = if pattern.is_repeating() {
                rest.find(|next: char| !pattern.matches(next))
                    .unwrap_or(rest.len())
            } else {
                character.len_utf8()
            };
            let start = self.offset;
            self.offset += length;

            match pattern.token_kind() {
                Some(kind) => {
                    let token = Token::new(kind, &rest[..length], start);
                    trace!("scanned {:?}", token);
                    return Ok(Some(token));
                }
                None => trace!("skipped {} whitespace characters at offset {}", length, start),
            }
        }
        Ok(None)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().transpose()
    }
}

impl<'a> FusedIterator for Lexer<'a> {}

/// Scans the whole expression into a vector of tokens, ending with the
/// end-of-input token.
///
/// # Arguments
///
/// * `expression`: The text to scan.
///
/// returns: Every token of the expression, in input order.
///
/// # Examples
///
/// ```
/// use arithmetic_evaluator::interpreter::lexer::tokenize;
/// use arithmetic_evaluator::interpreter::token::TokenKind;
/// # use anyhow::Result;
///
/// # fn main() -> Result<()> {
/// let tokens = tokenize("2 + 3")?;
/// let kinds: Vec<TokenKind> = tokens.iter().map(|token| token.kind()).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Number, TokenKind::Plus, TokenKind::Number, TokenKind::EndOfInput]
/// );
/// # Ok::<(), anyhow::Error>(()) }
/// ```
pub fn tokenize(expression: &str) -> Result<Vec<Token>> {
    Lexer::new(expression)
        .collect::<Result<Vec<Token>, LexError>>()
        .with_context(|| format!("could not tokenize expression {:?}", expression))
}

#[cfg(test)]
mod tests {
    use super::*;
    use parameterized_macro::parameterized;
    use pretty_assertions::assert_eq;

    fn kinds(expression: &str) -> Vec<TokenKind> {
        Lexer::new(expression)
            .map(|token| token.unwrap().kind())
            .collect()
    }

    #[test]
    fn expression_is_scanned_into_tokens_with_offsets() {
        let tokens: Vec<Token> = Lexer::new("12+(3)").map(|token| token.unwrap()).collect();

        assert_eq!(
            tokens,
            [
                Token::new(TokenKind::Number, "12", 0),
                Token::new(TokenKind::Plus, "+", 2),
                Token::new(TokenKind::LeftParenthesis, "(", 3),
                Token::new(TokenKind::Number, "3", 4),
                Token::new(TokenKind::RightParenthesis, ")", 5),
                Token::end_of_input(6),
            ]
        );
    }

    #[test]
    fn digits_are_taken_as_one_number() {
        let tokens: Vec<Token> = Lexer::new("  4096 ").map(|token| token.unwrap()).collect();

        assert_eq!(tokens[0], Token::new(TokenKind::Number, "4096", 2));
        assert_eq!(tokens[1], Token::end_of_input(7));
    }

    #[parameterized(
    expression = {
    "2+3",
    " 2 + 3 ",
    "\t2\n+\r\n3\n",
    }
    )]
    fn whitespace_never_reaches_the_consumer(expression: &str) {
        pretty_assertions::assert_eq!(
            kinds(expression),
            [
                TokenKind::Number,
                TokenKind::Plus,
                TokenKind::Number,
                TokenKind::EndOfInput
            ]
        );
    }

    #[test]
    fn every_operator_symbol_is_recognized() {
        assert_eq!(
            kinds("+-*/()"),
            [
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Times,
                TokenKind::Divide,
                TokenKind::LeftParenthesis,
                TokenKind::RightParenthesis,
                TokenKind::EndOfInput
            ]
        );
    }

    #[test]
    fn empty_input_yields_only_end_of_input() {
        assert_eq!(kinds(""), [TokenKind::EndOfInput]);
        assert_eq!(kinds("   "), [TokenKind::EndOfInput]);
    }

    #[test]
    fn exhausted_lexer_produces_nothing_more() {
        let mut lexer = Lexer::new("1");

        assert_eq!(lexer.next_token().unwrap().unwrap().kind(), TokenKind::Number);
        assert!(lexer.next_token().unwrap().unwrap().is_end_of_input());
        assert!(lexer.is_exhausted());
        assert_eq!(lexer.next_token(), Ok(None));
        assert_eq!(lexer.next_token(), Ok(None));
    }

    #[test]
    fn unknown_character_fails_with_its_offset() {
        let mut lexer = Lexer::new("2 & 3");

        assert_eq!(lexer.next().unwrap().unwrap().kind(), TokenKind::Number);
        assert_eq!(
            lexer.next(),
            Some(Err(LexError {
                character: '&',
                offset: 2
            }))
        );
        assert_eq!(lexer.next(), None);
    }

    #[test]
    fn tokens_are_produced_lazily() {
        let mut lexer = Lexer::new("1 + $");

        assert!(lexer.next_token().is_ok());
        assert!(lexer.next_token().is_ok());
        assert_eq!(lexer.offset(), 3);
        assert!(lexer.next_token().is_err());
    }

    #[test]
    fn non_ascii_character_is_reported_whole() {
        let error = Lexer::new("1 × 2").nth(1).unwrap().unwrap_err();

        assert_eq!(
            error,
            LexError {
                character: '×',
                offset: 2
            }
        );
    }

    #[test]
    fn two_lexers_over_same_text_agree() {
        let expression = "(10 - 2) * 3 / 4";

        let first: Vec<Token> = Lexer::new(expression).map(|token| token.unwrap()).collect();
        let second: Vec<Token> = Lexer::new(expression).map(|token| token.unwrap()).collect();

        assert_eq!(first, second);
    }

    #[test]
    fn tokenize_reports_the_expression_on_failure() {
        let error = tokenize("1 ? 2").unwrap_err();

        assert_eq!(
            error.downcast_ref::<LexError>(),
            Some(&LexError {
                character: '?',
                offset: 2
            })
        );
        assert!(error.to_string().contains("\"1 ? 2\""));
    }
}
