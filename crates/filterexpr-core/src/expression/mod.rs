//! Filter expression compilation.
//!
//! The pipeline is:
//!
//! 1. **Lexing**: Tokenize the expression string into a token stream.
//! 2. **Parsing**: Build an untyped AST from the tokens using recursive descent.
//! 3. **Building**: Resolve members, methods, and literal types against a target
//!    type's metadata and lower the AST into a reusable [`Predicate`].

pub mod ast;
pub mod builder;
mod convert;
mod evaluator;
pub mod lexer;
mod methods;
pub mod parser;

pub use ast::{BinaryOp, Expr, Literal, UnaryOp};
pub use builder::{BuildError, Predicate, build};
pub use lexer::{Token, TokenKind, TokenizeError, tokenize};
pub use parser::{ParseError, ParseErrorKind, parse};

pub(crate) use convert::{Ty, coerce_scalar};
