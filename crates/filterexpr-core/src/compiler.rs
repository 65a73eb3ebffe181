//! The `tokenize -> parse -> build` pipeline.

use tracing::{debug, warn};

use crate::config::CompilerConfig;
use crate::error::{CompileError, Limit};
use crate::expression::{Predicate, Token, TokenKind, build, parse, tokenize};
use crate::reflect::Record;

/// Compile `expression` into a predicate over `T`.
///
/// No limits are applied; use [`Compiler`] to cap length or nesting.
///
/// # Errors
///
/// Returns the first tokenize, parse, or build error unchanged, wrapped in
/// the matching [`CompileError`] variant.
///
/// # Examples
///
/// ```
/// use filterexpr_core::{compile, record, TypeRef};
///
/// struct Person {
///     age: u32,
/// }
///
/// record! {
///     Person {
///         property Age: TypeRef::Int => |p| p.age,
///     }
/// }
///
/// let adults = compile::<Person>("Age >= 18").unwrap();
/// assert!(adults.evaluate(&Person { age: 30 }));
/// assert!(!adults.evaluate(&Person { age: 12 }));
/// ```
pub fn compile<T: Record>(expression: &str) -> Result<Predicate<T>, CompileError> {
    Compiler::default().compile(expression)
}

/// Expression compiler with optional input limits.
///
/// Holds no per-call state, so one instance can serve any number of threads.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: CompilerConfig,
}

impl Compiler {
    /// Create a compiler enforcing `config`.
    #[must_use]
    pub fn new(config: CompilerConfig) -> Self {
        Self { config }
    }

    /// Create a compiler from [`CompilerConfig::from_env`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(CompilerConfig::from_env())
    }

    /// The limits this compiler enforces.
    #[must_use]
    pub fn config(&self) -> &CompilerConfig {
        &self.config
    }

    /// Compile `expression` into a predicate over `T`.
    ///
    /// The length limit is checked before tokenizing and the nesting limit
    /// before parsing.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::LimitExceeded`] when a configured limit is
    /// crossed, otherwise the first stage error.
    pub fn compile<T: Record>(&self, expression: &str) -> Result<Predicate<T>, CompileError> {
        let target_type = T::type_info().name;
        let length = expression.chars().count();
        debug!(length, target_type, "compiling expression");

        if let Some(max) = self.config.max_expression_length
            && length > max
        {
            warn!(length, max, "expression rejected: too long");
            return Err(CompileError::LimitExceeded {
                limit: Limit::ExpressionLength,
                actual: length,
                max,
                offset: max,
            });
        }

        let tokens = tokenize(expression)?;
        debug!(tokens = tokens.len(), "tokenized expression");

        if let Some(max) = self.config.max_nesting_depth {
            check_nesting(&tokens, max)?;
        }

        let expr = parse(&tokens)?;
        debug!(depth = expr.depth(), "parsed expression");

        Ok(build(&expr)?)
    }
}

/// Reject token streams whose open parentheses plus pending `!` prefixes
/// exceed `max` at any point.
fn check_nesting(tokens: &[Token], max: usize) -> Result<(), CompileError> {
    let mut parens = 0usize;
    let mut prefixes = 0usize;
    for token in tokens {
        match token.kind {
            TokenKind::LParen => parens += 1,
            TokenKind::RParen => parens = parens.saturating_sub(1),
            TokenKind::Not => prefixes += 1,
            _ => prefixes = 0,
        }
        let depth = parens + prefixes;
        if depth > max {
            warn!(depth, max, offset = token.offset, "expression rejected: too deeply nested");
            return Err(CompileError::LimitExceeded {
                limit: Limit::NestingDepth,
                actual: depth,
                max,
                offset: token.offset,
            });
        }
    }
    Ok(())
}
