//! Static types seen by the predicate builder and the implicit conversions
//! allowed between them.
//!
//! Constants are converted once at build time. Non-constant operands get a
//! [`Conversion`] that the evaluator applies on every call.

use std::fmt;

use crate::reflect::{EnumInfo, TypeInfo, TypeRef};
use crate::value::Scalar;

use super::ast::Literal;

/// Underlying kind of a static type.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Base {
    /// Type of the `null` literal.
    Null,
    Bool,
    Int,
    Float,
    Str,
    Enum(&'static EnumInfo),
    Record(&'static TypeInfo),
}

impl Base {
    /// Structural equality; enums and records compare by identity.
    pub(crate) fn same(self, other: Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null)
            | (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::Str, Self::Str) => true,
            (Self::Enum(a), Self::Enum(b)) => std::ptr::eq(a, b),
            (Self::Record(a), Self::Record(b)) => std::ptr::eq(a, b),
            _ => false,
        }
    }

    pub(crate) fn name(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "Bool",
            Self::Int => "Int",
            Self::Float => "Float",
            Self::Str => "Str",
            Self::Enum(info) => info.name,
            Self::Record(info) => info.name,
        }
    }
}

/// Static type of a built sub-expression.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ty {
    pub(crate) base: Base,
    /// Whether `null` is a legal value (optional members, records, `null`).
    pub(crate) nullable: bool,
}

impl Ty {
    pub(crate) const NULL: Self = Self::new(Base::Null, true);
    pub(crate) const BOOL: Self = Self::new(Base::Bool, false);
    pub(crate) const INT: Self = Self::new(Base::Int, false);
    pub(crate) const FLOAT: Self = Self::new(Base::Float, false);
    pub(crate) const STR: Self = Self::new(Base::Str, false);

    pub(crate) const fn new(base: Base, nullable: bool) -> Self {
        Self { base, nullable }
    }

    pub(crate) fn record(info: &'static TypeInfo) -> Self {
        Self::new(Base::Record(info), true)
    }

    pub(crate) fn of(tref: &TypeRef) -> Self {
        match tref {
            TypeRef::Bool => Self::BOOL,
            TypeRef::Int => Self::INT,
            TypeRef::Float => Self::FLOAT,
            TypeRef::Str => Self::STR,
            TypeRef::Enum(info) => Self::new(Base::Enum(info), false),
            TypeRef::Record(info) => Self::record(info()),
            TypeRef::Optional(inner) => Self {
                nullable: true,
                ..Self::of(inner)
            },
        }
    }

    pub(crate) fn of_scalar(value: &Scalar) -> Self {
        match value {
            Scalar::Null => Self::NULL,
            Scalar::Bool(_) => Self::BOOL,
            Scalar::Int(_) => Self::INT,
            Scalar::Float(_) => Self::FLOAT,
            Scalar::Str(_) => Self::STR,
        }
    }

    pub(crate) fn is_bool(self) -> bool {
        matches!(self.base, Base::Bool)
    }

    /// Same base, nullable.
    pub(crate) fn lifted(self) -> Self {
        Self {
            nullable: true,
            ..self
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.base {
            Base::Null | Base::Record(_) => f.write_str(self.base.name()),
            base if self.nullable => write!(f, "Optional<{}>", base.name()),
            base => f.write_str(base.name()),
        }
    }
}

/// Runtime conversion applied to a non-constant operand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Conversion {
    /// Value already has the target representation.
    Identity,
    /// Widen an integer to a float.
    ToFloat,
    /// Render a number or boolean as a string.
    ToStr,
}

/// How a non-constant value of type `from` reaches type `to`, if it can.
pub(crate) fn conversion(from: Ty, to: Ty) -> Option<Conversion> {
    match (from.base, to.base) {
        (a, b) if a.same(b) => Some(Conversion::Identity),
        (Base::Int, Base::Float) => Some(Conversion::ToFloat),
        (Base::Enum(_), Base::Int) => Some(Conversion::Identity),
        (Base::Int | Base::Float | Base::Bool, Base::Str) => Some(Conversion::ToStr),
        _ => None,
    }
}

/// Type a literal as written.
///
/// Returns the value plus the source text kept for conversions back to
/// `Str`. Number literals without a decimal point are integers, falling back
/// to float on overflow. String literals go through [`infer_text`].
pub(crate) fn infer_literal(literal: &Literal) -> (Scalar, Option<String>) {
    match literal {
        Literal::Null => (Scalar::Null, None),
        Literal::Bool(b) => (Scalar::Bool(*b), Some(b.to_string())),
        Literal::Number(text) => {
            let value = if text.contains('.') {
                text.parse().map_or(Scalar::Str(text.clone()), Scalar::Float)
            } else {
                match text.parse::<i64>() {
                    Ok(i) => Scalar::Int(i),
                    Err(_) => text.parse().map_or(Scalar::Str(text.clone()), Scalar::Float),
                }
            };
            (value, Some(text.clone()))
        }
        Literal::String(text) => (infer_text(text), Some(text.clone())),
    }
}

/// Infer the type of string content: integer, then float, then boolean,
/// else it stays a string.
pub(crate) fn infer_text(text: &str) -> Scalar {
    if let Ok(i) = text.parse::<i64>() {
        return Scalar::Int(i);
    }
    if let Ok(f) = text.parse::<f64>()
        && f.is_finite()
    {
        return Scalar::Float(f);
    }
    if text.eq_ignore_ascii_case("true") {
        return Scalar::Bool(true);
    }
    if text.eq_ignore_ascii_case("false") {
        return Scalar::Bool(false);
    }
    Scalar::Str(text.to_owned())
}

/// Convert a constant to type `to`.
///
/// `source` is the literal's original text; it wins when rendering to `Str`
/// so that `"007"` stays `"007"`.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub(crate) fn convert_constant(value: &Scalar, source: Option<&str>, to: Ty) -> Option<Scalar> {
    let rendered = |fallback: String| Scalar::Str(source.map_or(fallback, str::to_owned));
    match (value, to.base) {
        (Scalar::Null, _) => to.nullable.then_some(Scalar::Null),
        (Scalar::Bool(b), Base::Bool) => Some(Scalar::Bool(*b)),
        (Scalar::Int(i), Base::Int) => Some(Scalar::Int(*i)),
        (Scalar::Int(i), Base::Float) => Some(Scalar::Float(*i as f64)),
        (Scalar::Float(f), Base::Float) => Some(Scalar::Float(*f)),
        (Scalar::Float(f), Base::Int)
            if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
        {
            Some(Scalar::Int(*f as i64))
        }
        (Scalar::Str(s), Base::Str) => Some(Scalar::Str(s.clone())),
        (Scalar::Int(i), Base::Str) => Some(rendered(i.to_string())),
        (Scalar::Float(f), Base::Str) => Some(rendered(f.to_string())),
        (Scalar::Bool(b), Base::Str) => Some(rendered(b.to_string())),
        (Scalar::Int(i), Base::Enum(info)) => info.name_of(*i).map(|_| Scalar::Int(*i)),
        (Scalar::Str(s), Base::Enum(info)) => info.value_of(s).map(Scalar::Int),
        _ => None,
    }
}

/// Coerce a caller-supplied value to `to`, inferring string content first.
pub(crate) fn coerce_scalar(value: &Scalar, to: Ty) -> Option<Scalar> {
    match value {
        Scalar::Str(text) => convert_constant(&infer_text(text), Some(text), to),
        other => convert_constant(other, None, to),
    }
}
