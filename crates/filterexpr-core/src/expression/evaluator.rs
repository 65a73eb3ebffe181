//! Compiled predicate plans and their evaluation.
//!
//! The builder lowers a typed AST into a [`Node`] tree in which every member
//! name, method, and conversion is already resolved. Evaluation walks that
//! tree against a record through [`Reflect`] and never fails: missing or
//! mistyped runtime values collapse to `null`, comparisons involving `null`
//! follow lifted semantics, and logical operators read `null` as `false`.

use std::borrow::Cow;
use std::cmp::Ordering;

use crate::reflect::Reflect;
use crate::value::{Scalar, Value};

use super::ast::BinaryOp;
use super::convert::Conversion;
use super::methods::{self, BuiltinOp};

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// A resolved, type-checked predicate node.
#[derive(Debug, Clone)]
pub(crate) enum Node {
    /// Constant already converted to its use-site type.
    Const(Scalar),
    /// The record the predicate is evaluated against.
    Param,
    /// Read a member (by canonical name) of a record-valued target.
    Member {
        target: Box<Node>,
        name: &'static str,
    },
    /// Character count of a string.
    Length(Box<Node>),
    And(Box<Node>, Box<Node>),
    Or(Box<Node>, Box<Node>),
    Not(Box<Node>),
    /// Equality or ordering between operands of a unified type.
    Compare {
        op: BinaryOp,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Built-in method on a scalar target.
    Builtin {
        op: BuiltinOp,
        target: Box<Node>,
        args: Vec<Node>,
    },
    /// Method declared in a record's metadata.
    Invoke {
        target: Box<Node>,
        method: &'static str,
        args: Vec<Node>,
    },
    /// Runtime conversion of a non-constant operand.
    Convert {
        conversion: Conversion,
        operand: Box<Node>,
    },
}

// ---------------------------------------------------------------------------
// Evaluation
// ---------------------------------------------------------------------------

impl Node {
    /// Evaluate this node with `root` bound to the predicate parameter.
    pub(crate) fn eval<'a>(&'a self, root: &'a dyn Reflect) -> Value<'a> {
        match self {
            Self::Const(value) => scalar_value(value),
            Self::Param => Value::Record(root),
            Self::Member { target, name } => target
                .eval(root)
                .as_record()
                .map_or(Value::Null, |record| record.member(name)),
            Self::Length(target) => match target.eval(root) {
                Value::Str(s) => Value::Int(i64::try_from(s.chars().count()).unwrap_or(i64::MAX)),
                _ => Value::Null,
            },
            Self::And(left, right) => Value::Bool(left.truthy(root) && right.truthy(root)),
            Self::Or(left, right) => Value::Bool(left.truthy(root) || right.truthy(root)),
            Self::Not(operand) => Value::Bool(!operand.truthy(root)),
            Self::Compare { op, left, right } => {
                Value::Bool(compare(*op, &left.eval(root), &right.eval(root)))
            }
            Self::Builtin { op, target, args } => {
                let target = target.eval(root);
                if target.is_null() {
                    return Value::Null;
                }
                let args: Vec<Value<'a>> = args.iter().map(|a| a.eval(root)).collect();
                methods::apply(*op, target, &args)
            }
            Self::Invoke {
                target,
                method,
                args,
            } => match target.eval(root) {
                Value::Record(record) => {
                    let args: Vec<Value<'a>> = args.iter().map(|a| a.eval(root)).collect();
                    record.invoke(method, &args)
                }
                _ => Value::Null,
            },
            Self::Convert {
                conversion,
                operand,
            } => convert(*conversion, operand.eval(root)),
        }
    }

    /// `true` only for a boolean `true`; `null` counts as false.
    pub(crate) fn truthy(&self, root: &dyn Reflect) -> bool {
        self.eval(root).as_bool() == Some(true)
    }
}

fn scalar_value(value: &Scalar) -> Value<'_> {
    match value {
        Scalar::Null => Value::Null,
        Scalar::Bool(b) => Value::Bool(*b),
        Scalar::Int(i) => Value::Int(*i),
        Scalar::Float(f) => Value::Float(*f),
        Scalar::Str(s) => Value::Str(Cow::Borrowed(s)),
    }
}

fn convert(conversion: Conversion, value: Value<'_>) -> Value<'_> {
    match conversion {
        Conversion::Identity => value,
        Conversion::ToFloat => value.as_float().map_or(Value::Null, Value::Float),
        Conversion::ToStr => match value {
            Value::Int(i) => Value::from(i.to_string()),
            Value::Float(f) => Value::from(f.to_string()),
            Value::Bool(b) => Value::from(b.to_string()),
            s @ Value::Str(_) => s,
            _ => Value::Null,
        },
    }
}

/// Order two non-null values of compatible kinds. Integers compare exactly,
/// mixed numbers as floats, strings ordinally.
pub(crate) fn compare_values(left: &Value<'_>, right: &Value<'_>) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        (Value::Str(a), Value::Str(b)) => Some(a.as_ref().cmp(b.as_ref())),
        (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
            left.as_float()?.partial_cmp(&right.as_float()?)
        }
        _ => None,
    }
}

/// Lifted comparison: `null == null` holds, `null != x` holds, and ordering
/// against `null` is false.
fn compare(op: BinaryOp, left: &Value<'_>, right: &Value<'_>) -> bool {
    if left.is_null() || right.is_null() {
        let both = left.is_null() && right.is_null();
        return match op {
            BinaryOp::Eq => both,
            BinaryOp::Ne => !both,
            _ => false,
        };
    }
    let ordering = compare_values(left, right);
    match op {
        BinaryOp::Eq => ordering == Some(Ordering::Equal),
        BinaryOp::Ne => ordering != Some(Ordering::Equal),
        BinaryOp::Gt => ordering == Some(Ordering::Greater),
        BinaryOp::Ge => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        BinaryOp::Lt => ordering == Some(Ordering::Less),
        BinaryOp::Le => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
        BinaryOp::And | BinaryOp::Or => false,
    }
}
