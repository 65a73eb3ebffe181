//! AST types for filter expressions.
//!
//! The tree is produced by the parser and consumed read-only by the predicate
//! builder. Literals stay untyped here; the builder decides their types.
//! Every node records the character offset of the token that introduced it so
//! build errors can point back into the source string.

use std::fmt;

/// Expression AST node.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Expr {
    /// Binary operation: `left op right`.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left-hand operand.
        left: Box<Expr>,
        /// Right-hand operand.
        right: Box<Expr>,
        /// Offset of the operator token.
        offset: usize,
    },
    /// Unary operation: `op operand`.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
        /// Offset of the operator token.
        offset: usize,
    },
    /// Chained member access from the predicate's parameter, e.g. `Company.Name`.
    Member {
        /// Non-empty path segments in access order.
        path: Vec<String>,
        /// Offset of the first segment.
        offset: usize,
    },
    /// Literal value, exactly as written.
    Constant {
        /// The literal.
        value: Literal,
        /// Offset of the literal token.
        offset: usize,
    },
    /// Method call on a target: `target.method(args...)`.
    MethodCall {
        /// Expression the method is invoked on.
        target: Box<Expr>,
        /// Method name.
        method: String,
        /// Arguments in order.
        args: Vec<Expr>,
        /// Offset of the method name.
        offset: usize,
    },
}

impl Expr {
    /// Offset of the token that introduced this node.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::Binary { offset, .. }
            | Self::Unary { offset, .. }
            | Self::Member { offset, .. }
            | Self::Constant { offset, .. }
            | Self::MethodCall { offset, .. } => *offset,
        }
    }

    /// Depth of the tree rooted at this node (a leaf has depth 1).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Binary { left, right, .. } => 1 + left.depth().max(right.depth()),
            Self::Unary { operand, .. } => 1 + operand.depth(),
            Self::Member { .. } | Self::Constant { .. } => 1,
            Self::MethodCall { target, args, .. } => {
                1 + args
                    .iter()
                    .map(Expr::depth)
                    .fold(target.depth(), usize::max)
            }
        }
    }
}

impl fmt::Display for Expr {
    /// Fully parenthesized rendering, handy for checking precedence.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Binary {
                op, left, right, ..
            } => write!(f, "({left} {op} {right})"),
            Self::Unary { op, operand, .. } => write!(f, "{op}{operand}"),
            Self::Member { path, .. } => write!(f, "{}", path.join(".")),
            Self::Constant { value, .. } => write!(f, "{value}"),
            Self::MethodCall {
                target,
                method,
                args,
                ..
            } => {
                write!(f, "{target}.{method}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum BinaryOp {
    /// Logical AND (`&&`).
    And,
    /// Logical OR (`||`).
    Or,
    /// Equal (`==`).
    Eq,
    /// Not equal (`!=`).
    Ne,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal (`>=`).
    Ge,
    /// Less than (`<`).
    Lt,
    /// Less than or equal (`<=`).
    Le,
}

impl BinaryOp {
    /// Returns `true` for `&&` and `||`.
    #[must_use]
    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    /// Returns `true` for `>`, `>=`, `<` and `<=`.
    #[must_use]
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Gt | Self::Ge | Self::Lt | Self::Le)
    }

    /// Operator symbol as written in expressions.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::And => "&&",
            Self::Or => "||",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Unary operators. Only negation exists today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum UnaryOp {
    /// Logical NOT (`!`).
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Not => write!(f, "!"),
        }
    }
}

/// An untyped literal as it appeared in the source.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Literal {
    /// String literal, without its quotes.
    String(String),
    /// Number literal in its source form (`18`, `2.50`).
    Number(String),
    /// `true` or `false`.
    Bool(bool),
    /// `null`.
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => write!(f, "null"),
        }
    }
}
