//! Recursive-descent parser for filter expressions.
//!
//! Grammar, lowest precedence first:
//!
//! ```text
//! expression   := or_expr
//! or_expr      := and_expr ( '||' and_expr )*
//! and_expr     := unary_expr ( '&&' unary_expr )*
//! unary_expr   := '!' unary_expr | comparison
//! comparison   := primary ( compare_op primary )?
//! primary      := member_or_call | literal | '(' expression ')'
//! member_or_call := path ( '(' arg_list? ')' )?
//! arg_list     := expression ( ',' expression )*
//! ```
//!
//! Comparisons do not chain: `a > b > c` stops after the first comparison and
//! the second operator is reported as a trailing token.

use super::ast::{BinaryOp, Expr, Literal, UnaryOp};
use super::lexer::{Token, TokenKind};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Why a token sequence was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A token of the wrong kind was found.
    UnexpectedToken {
        /// What the grammar allowed at this point.
        expected: String,
    },
    /// A parenthesis without a partner.
    UnmatchedParenthesis,
    /// Tokens remain after a complete expression.
    TrailingTokens,
    /// The input contains no tokens.
    EmptyInput,
    /// A member path with an empty or malformed segment, or a method call
    /// without a target.
    InvalidMemberPath,
}

/// A token sequence that does not match the grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}", self.describe())]
pub struct ParseError {
    /// Failure classification.
    pub kind: ParseErrorKind,
    /// Text of the offending token (empty at end of input).
    pub token: String,
    /// 0-based character offset of the offending token.
    pub offset: usize,
}

impl ParseError {
    fn at(token: &Token, kind: ParseErrorKind) -> Self {
        Self {
            kind,
            token: token.text.clone(),
            offset: token.offset,
        }
    }

    fn found(&self) -> String {
        if self.token.is_empty() {
            "end of input".to_owned()
        } else {
            format!("'{}'", self.token)
        }
    }

    fn describe(&self) -> String {
        let offset = self.offset;
        match &self.kind {
            ParseErrorKind::UnexpectedToken { expected } => format!(
                "unexpected {} at offset {offset}: expected {expected}",
                self.found()
            ),
            ParseErrorKind::UnmatchedParenthesis => {
                format!("unmatched parenthesis at offset {offset}")
            }
            ParseErrorKind::TrailingTokens => format!(
                "unexpected {} at offset {offset}: expected end of expression",
                self.found()
            ),
            ParseErrorKind::EmptyInput => "expression is empty".to_owned(),
            ParseErrorKind::InvalidMemberPath => {
                format!("invalid member path {} at offset {offset}", self.found())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Parser
// ---------------------------------------------------------------------------

/// Recursive-descent parser over a token stream.
struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
    /// Parentheses (grouping or call) opened and not yet closed.
    open_parens: usize,
    eof: Token,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        let end = tokens.last().map_or(0, |t| t.offset + t.text.chars().count());
        Self {
            tokens,
            pos: 0,
            open_parens: 0,
            eof: Token {
                kind: TokenKind::Eof,
                text: String::new(),
                offset: end,
            },
        }
    }

    fn peek(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    fn advance(&mut self) -> &Token {
        let tok = self.tokens.get(self.pos).unwrap_or(&self.eof);
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    fn at_end(&self) -> bool {
        self.peek_kind() == TokenKind::Eof
    }

    /// Consume the `)` that closes the `(` at `open`.
    fn expect_close(&mut self, open: &Token) -> Result<(), ParseError> {
        match self.peek_kind() {
            TokenKind::RParen => {
                self.advance();
                self.open_parens -= 1;
                Ok(())
            }
            TokenKind::Eof => Err(ParseError::at(open, ParseErrorKind::UnmatchedParenthesis)),
            _ => Err(ParseError::at(
                self.peek(),
                ParseErrorKind::UnexpectedToken {
                    expected: "')'".to_owned(),
                },
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// Expression parsing (precedence climbing)
// ---------------------------------------------------------------------------

impl Parser<'_> {
    /// Parse a full expression (OR is lowest precedence).
    fn parse_or_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and_expr()?;
        while self.peek_kind() == TokenKind::Or {
            let offset = self.advance().offset;
            let right = self.parse_and_expr()?;
            left = Expr::Binary {
                op: BinaryOp::Or,
                left: Box::new(left),
                right: Box::new(right),
                offset,
            };
        }
        Ok(left)
    }

    /// Parse AND expressions.
    fn parse_and_expr(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary_expr()?;
        while self.peek_kind() == TokenKind::And {
            let offset = self.advance().offset;
            let right = self.parse_unary_expr()?;
            left = Expr::Binary {
                op: BinaryOp::And,
                left: Box::new(left),
                right: Box::new(right),
                offset,
            };
        }
        Ok(left)
    }

    /// Parse `!` prefixes.
    fn parse_unary_expr(&mut self) -> Result<Expr, ParseError> {
        if self.peek_kind() == TokenKind::Not {
            let offset = self.advance().offset;
            let operand = self.parse_unary_expr()?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
                offset,
            });
        }
        self.parse_comparison()
    }

    /// Parse a primary optionally followed by a single comparison.
    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_primary()?;
        let Some(op) = compare_op(self.peek_kind()) else {
            return Ok(left);
        };
        let offset = self.advance().offset;
        let right = self.parse_primary()?;
        Ok(Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
            offset,
        })
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let tok = self.peek().clone();
        match tok.kind {
            TokenKind::LParen => {
                self.advance();
                self.open_parens += 1;
                let expr = self.parse_or_expr()?;
                self.expect_close(&tok)?;
                Ok(expr)
            }
            TokenKind::Identifier => {
                self.advance();
                self.parse_member_or_call(&tok)
            }
            TokenKind::String => {
                self.advance();
                let inner = tok
                    .text
                    .strip_prefix('"')
                    .and_then(|t| t.strip_suffix('"'))
                    .ok_or_else(|| {
                        ParseError::at(
                            &tok,
                            ParseErrorKind::UnexpectedToken {
                                expected: "quoted string literal".to_owned(),
                            },
                        )
                    })?;
                Ok(constant(Literal::String(inner.to_owned()), &tok))
            }
            TokenKind::Number => {
                self.advance();
                Ok(constant(Literal::Number(tok.text.clone()), &tok))
            }
            TokenKind::Boolean => {
                self.advance();
                Ok(constant(Literal::Bool(tok.text == "true"), &tok))
            }
            TokenKind::Null => {
                self.advance();
                Ok(constant(Literal::Null, &tok))
            }
            TokenKind::RParen if self.open_parens == 0 => {
                Err(ParseError::at(&tok, ParseErrorKind::UnmatchedParenthesis))
            }
            _ => Err(ParseError::at(
                &tok,
                ParseErrorKind::UnexpectedToken {
                    expected: "member, literal, or '('".to_owned(),
                },
            )),
        }
    }

    /// Split a dotted path token; a following `(` turns its last segment into
    /// a method name applied to the rest of the path.
    fn parse_member_or_call(&mut self, tok: &Token) -> Result<Expr, ParseError> {
        let mut path = split_path(tok)?;

        if self.peek_kind() != TokenKind::LParen {
            return Ok(Expr::Member {
                path,
                offset: tok.offset,
            });
        }

        if path.len() < 2 {
            return Err(ParseError::at(tok, ParseErrorKind::InvalidMemberPath));
        }
        let open = self.advance().clone();
        let method = path.pop().unwrap_or_default();
        let target_len: usize = path.iter().map(|s| s.chars().count() + 1).sum();
        let args = self.parse_arg_list(&open)?;

        Ok(Expr::MethodCall {
            target: Box::new(Expr::Member {
                path,
                offset: tok.offset,
            }),
            method,
            args,
            offset: tok.offset + target_len,
        })
    }

    /// Parse call arguments after `(` up to and including `)`.
    fn parse_arg_list(&mut self, open: &Token) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if self.peek_kind() == TokenKind::RParen {
            self.advance();
            return Ok(args);
        }
        self.open_parens += 1;
        args.push(self.parse_or_expr()?);
        while self.peek_kind() == TokenKind::Comma {
            self.advance();
            args.push(self.parse_or_expr()?);
        }
        self.expect_close(open)?;
        Ok(args)
    }
}

fn compare_op(kind: TokenKind) -> Option<BinaryOp> {
    match kind {
        TokenKind::Eq => Some(BinaryOp::Eq),
        TokenKind::Ne => Some(BinaryOp::Ne),
        TokenKind::Gt => Some(BinaryOp::Gt),
        TokenKind::Ge => Some(BinaryOp::Ge),
        TokenKind::Lt => Some(BinaryOp::Lt),
        TokenKind::Le => Some(BinaryOp::Le),
        _ => None,
    }
}

fn constant(value: Literal, tok: &Token) -> Expr {
    Expr::Constant {
        value,
        offset: tok.offset,
    }
}

/// Split `A.B.C` into segments; each must start with a letter or underscore.
fn split_path(tok: &Token) -> Result<Vec<String>, ParseError> {
    let segments: Vec<String> = tok.text.split('.').map(str::to_owned).collect();
    let valid = segments.iter().all(|s| {
        s.chars()
            .next()
            .is_some_and(|c| c.is_alphabetic() || c == '_')
    });
    if valid {
        Ok(segments)
    } else {
        Err(ParseError::at(tok, ParseErrorKind::InvalidMemberPath))
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Parse a token stream (as produced by [`tokenize`](super::tokenize)) into an
/// AST root.
///
/// # Errors
///
/// Returns [`ParseError`] for empty input, unexpected tokens, unmatched
/// parentheses, malformed member paths, or tokens left after a complete
/// expression.
pub fn parse(tokens: &[Token]) -> Result<Expr, ParseError> {
    let mut parser = Parser::new(tokens);
    if parser.at_end() {
        return Err(ParseError::at(parser.peek(), ParseErrorKind::EmptyInput));
    }
    let expr = parser.parse_or_expr()?;
    if !parser.at_end() {
        let tok = parser.peek();
        let kind = if tok.kind == TokenKind::RParen {
            ParseErrorKind::UnmatchedParenthesis
        } else {
            ParseErrorKind::TrailingTokens
        };
        return Err(ParseError::at(tok, kind));
    }
    Ok(expr)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
