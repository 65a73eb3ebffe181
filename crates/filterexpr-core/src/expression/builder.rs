//! Predicate builder: resolves an [`Expr`] against a target type's metadata
//! and lowers it into an executable [`Predicate`].
//!
//! Member lookups are case-insensitive (properties before fields), method
//! lookups are exact by name with an arity-only fallback that converts
//! arguments implicitly. Every literal is typed here, not in the parser.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::reflect::{Record, TypeInfo, TypeRef, names_match};

use super::ast::{BinaryOp, Expr, UnaryOp};
use super::convert::{Base, Conversion, Ty, conversion, convert_constant, infer_literal};
use super::evaluator::Node;
use super::methods::{BuiltinOp, builtins_for};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// An expression that parses but cannot be resolved against the target type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// A member path segment that does not exist (or is ambiguous).
    #[error("unknown member '{member}' on type {type_name} at offset {offset}")]
    UnknownMember {
        /// The unresolved segment.
        member: String,
        /// Type the segment was looked up on.
        type_name: String,
        /// Offset of the segment.
        offset: usize,
    },
    /// No method with this name, or none taking this many arguments.
    #[error("no method '{method}' taking {arity} argument(s) on type {type_name} at offset {offset}")]
    UnknownMethod {
        /// Method name as written.
        method: String,
        /// Type of the call target.
        type_name: String,
        /// Number of arguments supplied.
        arity: usize,
        /// Offset of the method name.
        offset: usize,
    },
    /// An operator applied to operands that do not support it.
    #[error("operator '{operator}' is not supported for {operand} at offset {offset}")]
    UnsupportedOperator {
        /// Operator symbol.
        operator: String,
        /// Operand type.
        operand: String,
        /// Offset of the operator.
        offset: usize,
    },
    /// Operand types that cannot be converted to each other.
    #[error("type mismatch at offset {offset}: expected {expected}, found {found}")]
    TypeMismatch {
        /// Type required at this position.
        expected: String,
        /// Type actually supplied.
        found: String,
        /// Offset of the offending sub-expression.
        offset: usize,
    },
}

impl BuildError {
    /// Character offset the error points at.
    #[must_use]
    pub fn offset(&self) -> usize {
        match self {
            Self::UnknownMember { offset, .. }
            | Self::UnknownMethod { offset, .. }
            | Self::UnsupportedOperator { offset, .. }
            | Self::TypeMismatch { offset, .. } => *offset,
        }
    }

    fn mismatch(expected: impl fmt::Display, found: impl fmt::Display, offset: usize) -> Self {
        Self::TypeMismatch {
            expected: expected.to_string(),
            found: found.to_string(),
            offset,
        }
    }

    fn unsupported(op: BinaryOp, operand: &str, offset: usize) -> Self {
        Self::UnsupportedOperator {
            operator: op.symbol().to_owned(),
            operand: operand.to_owned(),
            offset,
        }
    }
}

// ---------------------------------------------------------------------------
// Predicate
// ---------------------------------------------------------------------------

/// A compiled filter over values of type `T`.
///
/// Evaluation is pure and never fails. Cloning is cheap and the predicate can
/// be shared across threads.
pub struct Predicate<T: ?Sized> {
    plan: Arc<Node>,
    _target: PhantomData<fn(&T) -> bool>,
}

impl<T: Record> Predicate<T> {
    fn new(plan: Node) -> Self {
        Self {
            plan: Arc::new(plan),
            _target: PhantomData,
        }
    }

    /// Returns `true` if `item` satisfies the expression.
    pub fn evaluate(&self, item: &T) -> bool {
        self.plan.truthy(item)
    }

    /// Collect the items that satisfy the expression, preserving order.
    pub fn filter<'t, I>(&self, items: I) -> Vec<&'t T>
    where
        I: IntoIterator<Item = &'t T>,
        T: 't,
    {
        items
            .into_iter()
            .filter(|item| self.evaluate(item))
            .collect()
    }
}

impl<T: ?Sized> Clone for Predicate<T> {
    fn clone(&self) -> Self {
        Self {
            plan: Arc::clone(&self.plan),
            _target: PhantomData,
        }
    }
}

impl<T: ?Sized> fmt::Debug for Predicate<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate")
            .field("target", &std::any::type_name::<T>())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// A lowered sub-expression together with its static type.
#[derive(Debug, Clone)]
struct Built {
    node: Node,
    ty: Ty,
    offset: usize,
    /// Literal text, kept for constants so they convert back to `Str` exactly.
    source: Option<String>,
}

impl Built {
    fn is_const(&self) -> bool {
        matches!(self.node, Node::Const(_))
    }

    fn is_null(&self) -> bool {
        matches!(self.ty.base, Base::Null)
    }

    fn into_bool(self) -> Result<Self, BuildError> {
        if self.ty.is_bool() {
            Ok(self)
        } else {
            Err(BuildError::mismatch("Bool", self.ty, self.offset))
        }
    }

    /// Convert to `to`, folding constants.
    fn coerce(&self, to: Ty) -> Option<Self> {
        if let Node::Const(value) = &self.node {
            let value = convert_constant(value, self.source.as_deref(), to)?;
            let ty = if value.is_null() {
                Ty::NULL
            } else {
                Ty::new(to.base, false)
            };
            return Some(Self {
                node: Node::Const(value),
                ty,
                offset: self.offset,
                source: self.source.clone(),
            });
        }
        let node = match conversion(self.ty, to)? {
            Conversion::Identity => self.node.clone(),
            other => Node::Convert {
                conversion: other,
                operand: Box::new(self.node.clone()),
            },
        };
        Some(Self {
            node,
            ty: Ty::new(to.base, self.ty.nullable),
            offset: self.offset,
            source: None,
        })
    }
}

/// How a resolved method is dispatched.
#[derive(Debug, Clone, Copy)]
enum Call {
    Builtin(BuiltinOp),
    Invoke(&'static str),
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    params: &'static [TypeRef],
    returns: TypeRef,
    call: Call,
}

/// Stateless visitor; one per build.
struct Builder {
    root: &'static TypeInfo,
}

impl Builder {
    fn build(&self, expr: &Expr) -> Result<Built, BuildError> {
        match expr {
            Expr::Binary {
                op,
                left,
                right,
                offset,
            } => {
                let left = self.build(left)?;
                let right = self.build(right)?;
                if op.is_logical() {
                    build_logical(*op, left, right, *offset)
                } else {
                    build_comparison(*op, left, right, *offset)
                }
            }
            Expr::Unary {
                op: UnaryOp::Not,
                operand,
                offset,
            } => {
                let operand = self.build(operand)?.into_bool()?;
                Ok(Built {
                    node: Node::Not(Box::new(operand.node)),
                    ty: operand.ty,
                    offset: *offset,
                    source: None,
                })
            }
            Expr::Member { path, offset } => self.build_member(path, *offset),
            Expr::Constant { value, offset } => {
                let (value, source) = infer_literal(value);
                Ok(Built {
                    ty: Ty::of_scalar(&value),
                    node: Node::Const(value),
                    offset: *offset,
                    source,
                })
            }
            Expr::MethodCall {
                target,
                method,
                args,
                offset,
            } => {
                let target = self.build(target)?;
                let args = args
                    .iter()
                    .map(|arg| self.build(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                build_call(target, method, args, *offset)
            }
        }
    }

    /// Walk `path` from the predicate parameter, one segment at a time.
    fn build_member(&self, path: &[String], offset: usize) -> Result<Built, BuildError> {
        let mut node = Node::Param;
        let mut ty = Ty::record(self.root);
        let mut segment_offset = offset;

        for segment in path {
            match ty.base {
                Base::Record(info) => {
                    let member = info.resolve_member(segment).ok_or_else(|| {
                        BuildError::UnknownMember {
                            member: segment.clone(),
                            type_name: info.name.to_owned(),
                            offset: segment_offset,
                        }
                    })?;
                    trace!(
                        segment = %segment,
                        type_name = info.name,
                        resolved = member.name,
                        kind = ?member.kind,
                        "resolved member"
                    );
                    node = Node::Member {
                        target: Box::new(node),
                        name: member.name,
                    };
                    ty = Ty::of(&member.ty);
                }
                Base::Str if names_match(segment, "Length") => {
                    node = Node::Length(Box::new(node));
                    ty = Ty::new(Base::Int, ty.nullable);
                }
                base => {
                    return Err(BuildError::UnknownMember {
                        member: segment.clone(),
                        type_name: Ty::new(base, false).to_string(),
                        offset: segment_offset,
                    });
                }
            }
            segment_offset += segment.chars().count() + 1;
        }

        Ok(Built {
            node,
            ty,
            offset,
            source: None,
        })
    }
}

fn build_logical(
    op: BinaryOp,
    left: Built,
    right: Built,
    offset: usize,
) -> Result<Built, BuildError> {
    let left = Box::new(left.into_bool()?.node);
    let right = Box::new(right.into_bool()?.node);
    let node = if op == BinaryOp::And {
        Node::And(left, right)
    } else {
        Node::Or(left, right)
    };
    Ok(Built {
        node,
        ty: Ty::BOOL,
        offset,
        source: None,
    })
}

fn build_comparison(
    op: BinaryOp,
    left: Built,
    right: Built,
    offset: usize,
) -> Result<Built, BuildError> {
    let (left, right) = if left.is_null() || right.is_null() {
        let (null, other) = if left.is_null() {
            (&left, &right)
        } else {
            (&right, &left)
        };
        if op.is_ordering() {
            return Err(BuildError::unsupported(op, "null", offset));
        }
        if !other.ty.nullable {
            return Err(BuildError::mismatch(
                other.ty.lifted(),
                "null",
                null.offset,
            ));
        }
        (left, right)
    } else {
        let (left, right, base) = unify(left, right, offset)?;
        match base {
            Base::Record(info) => return Err(BuildError::unsupported(op, info.name, offset)),
            Base::Bool if op.is_ordering() => {
                return Err(BuildError::unsupported(op, "Bool", offset));
            }
            _ => {}
        }
        (left, right)
    };

    Ok(Built {
        node: Node::Compare {
            op,
            left: Box::new(left.node),
            right: Box::new(right.node),
        },
        ty: Ty::BOOL,
        offset,
        source: None,
    })
}

/// Bring two non-null operands to a common type.
///
/// Constants convert to the other side first; otherwise integers promote to
/// floats and enums compare as their integer values.
fn unify(left: Built, right: Built, offset: usize) -> Result<(Built, Built, Base), BuildError> {
    let (lb, rb) = (left.ty.base, right.ty.base);
    if lb.same(rb) {
        return Ok((left, right, lb));
    }
    if right.is_const()
        && let Some(right) = right.coerce(left.ty)
    {
        return Ok((left, right, lb));
    }
    if left.is_const()
        && let Some(left) = left.coerce(right.ty)
    {
        return Ok((left, right, rb));
    }

    let promoted = match (lb, rb) {
        (Base::Int, Base::Float) => left.coerce(Ty::FLOAT).map(|l| (l, right.clone(), rb)),
        (Base::Float, Base::Int) => right.coerce(Ty::FLOAT).map(|r| (left.clone(), r, lb)),
        (Base::Enum(_), Base::Int) | (Base::Int, Base::Enum(_)) => {
            Some((left.clone(), right.clone(), Base::Int))
        }
        _ => None,
    };
    promoted.ok_or_else(|| {
        if right.is_const() {
            BuildError::mismatch(left.ty, right.ty, right.offset)
        } else if left.is_const() {
            BuildError::mismatch(right.ty, left.ty, left.offset)
        } else {
            BuildError::mismatch(left.ty, right.ty, offset)
        }
    })
}

fn candidates_for(target: Ty, method: &str) -> Vec<Candidate> {
    match target.base {
        Base::Record(info) => info
            .methods_named(method)
            .map(|m| Candidate {
                params: m.params,
                returns: m.returns,
                call: Call::Invoke(m.name),
            })
            .collect(),
        base => builtins_for(base)
            .iter()
            .filter(|b| b.name == method)
            .map(|b| Candidate {
                params: b.params,
                returns: b.returns,
                call: Call::Builtin(b.op),
            })
            .collect(),
    }
}

/// Resolve `target.method(args)`: exact parameter match first, then the
/// first same-arity overload whose parameters every argument converts to.
fn build_call(
    target: Built,
    method: &str,
    args: Vec<Built>,
    offset: usize,
) -> Result<Built, BuildError> {
    let type_name = target.ty.base.name();
    let arity = args.len();
    let unknown = || BuildError::UnknownMethod {
        method: method.to_owned(),
        type_name: type_name.to_owned(),
        arity,
        offset,
    };

    let named = candidates_for(target.ty, method);
    let same_arity: Vec<&Candidate> = named
        .iter()
        .filter(|c| c.params.len() == args.len())
        .collect();
    if same_arity.is_empty() {
        return Err(unknown());
    }

    let exact = same_arity.iter().find(|c| {
        c.params
            .iter()
            .zip(&args)
            .all(|(param, arg)| !arg.is_null() && Ty::of(param).base.same(arg.ty.base))
    });

    let (candidate, converted) = if let Some(candidate) = exact {
        (**candidate, args)
    } else {
        let mut first_failure = None;
        let mut resolved = None;
        for candidate in &same_arity {
            match convert_args(candidate.params, &args) {
                Ok(converted) => {
                    resolved = Some((**candidate, converted));
                    break;
                }
                Err(err) => {
                    first_failure.get_or_insert(err);
                }
            }
        }
        match (resolved, first_failure) {
            (Some(found), _) => found,
            (None, Some(err)) => return Err(err),
            (None, None) => return Err(unknown()),
        }
    };

    trace!(method, type_name, arity, "resolved method");

    let target_nullable = target.ty.nullable;
    let target = Box::new(target.node);
    let args: Vec<Node> = converted.into_iter().map(|a| a.node).collect();
    let node = match candidate.call {
        Call::Builtin(op) => Node::Builtin { op, target, args },
        Call::Invoke(method) => Node::Invoke {
            target,
            method,
            args,
        },
    };
    let returns = Ty::of(&candidate.returns);
    Ok(Built {
        node,
        ty: Ty::new(returns.base, returns.nullable || target_nullable),
        offset,
        source: None,
    })
}

fn convert_args(params: &[TypeRef], args: &[Built]) -> Result<Vec<Built>, BuildError> {
    params
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let to = Ty::of(param);
            arg.coerce(to)
                .ok_or_else(|| BuildError::mismatch(to, arg.ty, arg.offset))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Build a predicate over `T` from a parsed expression.
///
/// The expression must evaluate to a boolean.
///
/// # Errors
///
/// Returns [`BuildError`] when a member or method cannot be resolved on `T`,
/// when operand types are incompatible, or when an operator is applied to a
/// type that does not support it.
pub fn build<T: Record>(expr: &Expr) -> Result<Predicate<T>, BuildError> {
    let builder = Builder {
        root: T::type_info(),
    };
    let built = builder.build(expr)?.into_bool()?;
    debug!(
        target_type = builder.root.name,
        depth = expr.depth(),
        "built predicate"
    );
    Ok(Predicate::new(built.node))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
