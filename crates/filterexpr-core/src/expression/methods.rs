//! Built-in methods available on scalar members.

use std::cmp::Ordering;

use crate::reflect::TypeRef;
use crate::value::Value;

use super::convert::Base;
use super::evaluator::compare_values;

/// Operation behind a built-in method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinOp {
    Contains,
    StartsWith,
    EndsWith,
    IndexOf,
    ToLower,
    ToUpper,
    Trim,
    ToString,
    Equals,
    CompareTo,
}

/// Signature of a built-in method.
#[derive(Debug)]
pub(crate) struct BuiltinMethod {
    pub(crate) name: &'static str,
    pub(crate) params: &'static [TypeRef],
    pub(crate) returns: TypeRef,
    pub(crate) op: BuiltinOp,
}

const fn method(
    name: &'static str,
    params: &'static [TypeRef],
    returns: TypeRef,
    op: BuiltinOp,
) -> BuiltinMethod {
    BuiltinMethod {
        name,
        params,
        returns,
        op,
    }
}

static STR_METHODS: &[BuiltinMethod] = &[
    method("Contains", &[TypeRef::Str], TypeRef::Bool, BuiltinOp::Contains),
    method("StartsWith", &[TypeRef::Str], TypeRef::Bool, BuiltinOp::StartsWith),
    method("EndsWith", &[TypeRef::Str], TypeRef::Bool, BuiltinOp::EndsWith),
    method("Equals", &[TypeRef::Str], TypeRef::Bool, BuiltinOp::Equals),
    method("IndexOf", &[TypeRef::Str], TypeRef::Int, BuiltinOp::IndexOf),
    method("CompareTo", &[TypeRef::Str], TypeRef::Int, BuiltinOp::CompareTo),
    method("ToLower", &[], TypeRef::Str, BuiltinOp::ToLower),
    method("ToUpper", &[], TypeRef::Str, BuiltinOp::ToUpper),
    method("Trim", &[], TypeRef::Str, BuiltinOp::Trim),
    method("ToString", &[], TypeRef::Str, BuiltinOp::ToString),
];

static INT_METHODS: &[BuiltinMethod] = &[
    method("Equals", &[TypeRef::Int], TypeRef::Bool, BuiltinOp::Equals),
    method("CompareTo", &[TypeRef::Int], TypeRef::Int, BuiltinOp::CompareTo),
    method("ToString", &[], TypeRef::Str, BuiltinOp::ToString),
];

static FLOAT_METHODS: &[BuiltinMethod] = &[
    method("Equals", &[TypeRef::Float], TypeRef::Bool, BuiltinOp::Equals),
    method("CompareTo", &[TypeRef::Float], TypeRef::Int, BuiltinOp::CompareTo),
    method("ToString", &[], TypeRef::Str, BuiltinOp::ToString),
];

static BOOL_METHODS: &[BuiltinMethod] = &[
    method("Equals", &[TypeRef::Bool], TypeRef::Bool, BuiltinOp::Equals),
    method("CompareTo", &[TypeRef::Bool], TypeRef::Int, BuiltinOp::CompareTo),
    method("ToString", &[], TypeRef::Str, BuiltinOp::ToString),
];

/// Built-in methods of a scalar type; records and enums have none.
pub(crate) fn builtins_for(base: Base) -> &'static [BuiltinMethod] {
    match base {
        Base::Str => STR_METHODS,
        Base::Int => INT_METHODS,
        Base::Float => FLOAT_METHODS,
        Base::Bool => BOOL_METHODS,
        Base::Null | Base::Enum(_) | Base::Record(_) => &[],
    }
}

/// Run a built-in on a non-null target.
pub(crate) fn apply<'a>(op: BuiltinOp, target: Value<'a>, args: &[Value<'a>]) -> Value<'a> {
    let arg = args.first();
    match op {
        BuiltinOp::Contains => with_str_arg(&target, arg, |s, p| Value::Bool(s.contains(p))),
        BuiltinOp::StartsWith => with_str_arg(&target, arg, |s, p| Value::Bool(s.starts_with(p))),
        BuiltinOp::EndsWith => with_str_arg(&target, arg, |s, p| Value::Bool(s.ends_with(p))),
        BuiltinOp::IndexOf => with_str_arg(&target, arg, |s, p| {
            let index = s.find(p).map_or(-1, |byte| {
                i64::try_from(s[..byte].chars().count()).unwrap_or(i64::MAX)
            });
            Value::Int(index)
        }),
        BuiltinOp::ToLower => target
            .as_str()
            .map_or(Value::Null, |s| Value::from(s.to_lowercase())),
        BuiltinOp::ToUpper => target
            .as_str()
            .map_or(Value::Null, |s| Value::from(s.to_uppercase())),
        BuiltinOp::Trim => target
            .as_str()
            .map_or(Value::Null, |s| Value::from(s.trim().to_owned())),
        BuiltinOp::ToString => match target {
            Value::Int(i) => Value::from(i.to_string()),
            Value::Float(f) => Value::from(f.to_string()),
            Value::Bool(b) => Value::from(b.to_string()),
            s @ Value::Str(_) => s,
            _ => Value::Null,
        },
        BuiltinOp::Equals => match arg {
            Some(arg) if !arg.is_null() => {
                Value::Bool(compare_values(&target, arg) == Some(Ordering::Equal))
            }
            _ => Value::Bool(false),
        },
        BuiltinOp::CompareTo => match arg {
            Some(arg) if !arg.is_null() => compare_values(&target, arg)
                .map_or(Value::Null, |ord| Value::Int(ord as i64)),
            // Any value sorts after null.
            _ => Value::Int(1),
        },
    }
}

fn with_str_arg<'a>(
    target: &Value<'a>,
    arg: Option<&Value<'a>>,
    f: impl FnOnce(&str, &str) -> Value<'a>,
) -> Value<'a> {
    match (target.as_str(), arg.and_then(Value::as_str)) {
        (Some(s), Some(p)) => f(s, p),
        _ => Value::Null,
    }
}
