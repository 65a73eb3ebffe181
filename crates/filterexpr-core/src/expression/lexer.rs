//! Tokenizer for filter expressions.
//!
//! The lexer knows nothing about the grammar: a dotted member path such as
//! `Company.Name.Contains` is a single identifier token, and splitting it into
//! segments is left to the parser.

use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// A character that cannot begin or continue any token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unexpected character '{character}' at offset {offset}")]
pub struct TokenizeError {
    /// The offending character.
    pub character: char,
    /// 0-based character offset of the offending character.
    pub offset: usize,
}

// ---------------------------------------------------------------------------
// Token type
// ---------------------------------------------------------------------------

/// Classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum TokenKind {
    /// Identifier or dotted member path (`Age`, `Company.Name`).
    Identifier,
    /// Double-quoted string literal; the raw text keeps its quotes.
    String,
    /// Integer or decimal number literal.
    Number,
    /// `true` or `false`.
    Boolean,
    /// `null`.
    Null,
    /// `&&`
    And,
    /// `||`
    Or,
    /// `!`
    Not,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,
    /// End of input.
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::String => write!(f, "string literal"),
            Self::Number => write!(f, "number literal"),
            Self::Boolean => write!(f, "boolean literal"),
            Self::Null => write!(f, "null"),
            Self::And => write!(f, "'&&'"),
            Self::Or => write!(f, "'||'"),
            Self::Not => write!(f, "'!'"),
            Self::Eq => write!(f, "'=='"),
            Self::Ne => write!(f, "'!='"),
            Self::Gt => write!(f, "'>'"),
            Self::Ge => write!(f, "'>='"),
            Self::Lt => write!(f, "'<'"),
            Self::Le => write!(f, "'<='"),
            Self::LParen => write!(f, "'('"),
            Self::RParen => write!(f, "')'"),
            Self::Comma => write!(f, "','"),
            Self::Eof => write!(f, "end of input"),
        }
    }
}

/// A classified lexeme with its position in the source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Token {
    /// Token classification.
    pub kind: TokenKind,
    /// Raw source text (empty for [`TokenKind::Eof`]).
    pub text: String,
    /// 0-based character offset where the token starts.
    pub offset: usize,
}

impl Token {
    fn new(kind: TokenKind, text: impl Into<String>, offset: usize) -> Self {
        Self {
            kind,
            text: text.into(),
            offset,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => write!(f, "end of input"),
            _ => write!(f, "'{}'", self.text),
        }
    }
}

// ---------------------------------------------------------------------------
// Lexer
// ---------------------------------------------------------------------------

/// Tokenizer over a single expression string.
struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Character offset of the next unread character.
    offset: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            offset: 0,
        }
    }

    /// Tokenize the entire input, terminating the stream with an `Eof` token.
    fn tokenize(&mut self) -> Result<Vec<Token>, TokenizeError> {
        let mut tokens = Vec::new();
        loop {
            let tok = self.next_token()?;
            let done = tok.kind == TokenKind::Eof;
            tokens.push(tok);
            if done {
                break;
            }
        }
        Ok(tokens)
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.chars.next();
        if c.is_some() {
            self.offset += 1;
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn next_token(&mut self) -> Result<Token, TokenizeError> {
        self.skip_whitespace();

        let start = self.offset;
        let Some(ch) = self.peek() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };

        match ch {
            '(' => Ok(self.single(TokenKind::LParen, "(")),
            ')' => Ok(self.single(TokenKind::RParen, ")")),
            ',' => Ok(self.single(TokenKind::Comma, ",")),
            '"' => self.read_string(),
            '&' => self.read_pair('&', TokenKind::And, None),
            '|' => self.read_pair('|', TokenKind::Or, None),
            '=' => self.read_pair('=', TokenKind::Eq, None),
            '!' => self.read_pair('=', TokenKind::Ne, Some(TokenKind::Not)),
            '>' => self.read_pair('=', TokenKind::Ge, Some(TokenKind::Gt)),
            '<' => self.read_pair('=', TokenKind::Le, Some(TokenKind::Lt)),
            c if c.is_ascii_digit() => Ok(self.read_number()),
            c if is_ident_start(c) => Ok(self.read_identifier()),
            _ => Err(TokenizeError {
                character: ch,
                offset: start,
            }),
        }
    }

    fn single(&mut self, kind: TokenKind, text: &str) -> Token {
        let start = self.offset;
        self.bump();
        Token::new(kind, text, start)
    }

    /// Read an operator whose second character is `second`.
    ///
    /// Two-character operators win over their one-character prefix. When the
    /// prefix alone is not an operator (`&`, `|`, `=`) the lone character is
    /// rejected.
    fn read_pair(
        &mut self,
        second: char,
        double: TokenKind,
        lone: Option<TokenKind>,
    ) -> Result<Token, TokenizeError> {
        let start = self.offset;
        let Some(first) = self.bump() else {
            return Ok(Token::new(TokenKind::Eof, "", start));
        };
        if self.peek() == Some(second) {
            self.bump();
            let mut text = String::with_capacity(2);
            text.push(first);
            text.push(second);
            return Ok(Token::new(double, text, start));
        }
        match lone {
            Some(kind) => Ok(Token::new(kind, first.to_string(), start)),
            None => Err(TokenizeError {
                character: first,
                offset: start,
            }),
        }
    }

    /// Read a double-quoted string. No escapes; an unterminated literal is
    /// reported at its opening quote.
    fn read_string(&mut self) -> Result<Token, TokenizeError> {
        let start = self.offset;
        let mut text = String::new();
        if let Some(quote) = self.bump() {
            text.push(quote);
        }
        loop {
            match self.bump() {
                Some('"') => {
                    text.push('"');
                    return Ok(Token::new(TokenKind::String, text, start));
                }
                Some(c) => text.push(c),
                None => {
                    return Err(TokenizeError {
                        character: '"',
                        offset: start,
                    });
                }
            }
        }
    }

    /// Digits with at most one decimal point. A second point ends the token.
    fn read_number(&mut self) -> Token {
        let start = self.offset;
        let mut text = String::new();
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                text.push(c);
            } else if c == '.' && !seen_dot {
                seen_dot = true;
                text.push(c);
            } else {
                break;
            }
            self.bump();
        }
        Token::new(TokenKind::Number, text, start)
    }

    fn read_identifier(&mut self) -> Token {
        let start = self.offset;
        let mut text = String::new();
        while let Some(c) = self.peek() {
            if is_ident_continue(c) {
                text.push(c);
                self.bump();
            } else {
                break;
            }
        }
        let kind = match text.as_str() {
            "true" | "false" => TokenKind::Boolean,
            "null" => TokenKind::Null,
            _ => TokenKind::Identifier,
        };
        Token::new(kind, text, start)
    }
}

/// Returns `true` if `c` can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

/// Returns `true` if `c` can continue an identifier or member path.
fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.'
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split an expression into tokens, ending with a [`TokenKind::Eof`] marker.
///
/// # Errors
///
/// Returns [`TokenizeError`] at the first character that cannot start or
/// continue a token.
pub fn tokenize(input: &str) -> Result<Vec<Token>, TokenizeError> {
    Lexer::new(input).tokenize()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
