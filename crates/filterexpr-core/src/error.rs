//! Errors surfaced by [`compile`](crate::compile) and rendering helpers for
//! showing them next to the offending expression.

use std::fmt;

use crate::expression::{BuildError, ParseError, TokenizeError};

/// Which caller-imposed limit rejected an expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Limit {
    /// Maximum expression length in characters.
    ExpressionLength,
    /// Maximum nesting of parentheses and `!` prefixes.
    NestingDepth,
}

impl fmt::Display for Limit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExpressionLength => write!(f, "expression length"),
            Self::NestingDepth => write!(f, "nesting depth"),
        }
    }
}

/// Any failure of the tokenize, parse, build pipeline.
///
/// Stage errors pass through unchanged; match on the variant to reach them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// Unrecognized character.
    #[error(transparent)]
    Tokenize(#[from] TokenizeError),
    /// Token sequence that does not match the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// Expression that cannot be resolved against the target type.
    #[error(transparent)]
    Build(#[from] BuildError),
    /// A configured limit was exceeded before compilation started.
    #[error("{limit} limit exceeded at offset {offset}: {actual} > {max}")]
    LimitExceeded {
        /// The limit that tripped.
        limit: Limit,
        /// Observed value.
        actual: usize,
        /// Configured maximum.
        max: usize,
        /// Offset where the limit was crossed.
        offset: usize,
    },
}

impl CompileError {
    /// Character offset the error points at.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::Tokenize(e) => e.offset,
            Self::Parse(e) => e.offset,
            Self::Build(e) => e.offset(),
            Self::LimitExceeded { offset, .. } => *offset,
        }
    }

    /// Render the error under the source line it points at, with a caret
    /// marking the offending column.
    #[must_use]
    pub fn render(&self, source: &str) -> String {
        let (line, column, text) = locate(source, self.offset());
        format!(
            "error at line {line}, column {}:\n{text}\n{}^\n{self}",
            column + 1,
            " ".repeat(column),
        )
    }
}

/// 1-based line number, 0-based column, and text of the line holding the
/// character at `offset`. Offsets past the end point just after the last
/// character.
fn locate(source: &str, offset: usize) -> (usize, usize, &str) {
    let mut remaining = offset;
    let mut lines = source.split('\n').enumerate().peekable();
    while let Some((index, text)) = lines.next() {
        let width = text.chars().count();
        if remaining <= width || lines.peek().is_none() {
            return (index + 1, remaining.min(width), text);
        }
        remaining -= width + 1;
    }
    (1, 0, "")
}
