//! Expression-free filter conditions.
//!
//! A [`FilterCriteria`] names a member, a comparison, and a value. It is a
//! plain data record handed to downstream query builders; nothing here
//! combines or evaluates criteria.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::expression::{Ty, coerce_scalar};
use crate::reflect::{Record, TypeRef};
use crate::value::Scalar;

/// The condition a [`FilterCriteria`] expresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComparisonKind {
    /// `==`
    Equal,
    /// `!=`
    NotEqual,
    /// `>`
    GreaterThan,
    /// `>=`
    GreaterThanOrEqual,
    /// `<`
    LessThan,
    /// `<=`
    LessThanOrEqual,
    /// Substring match.
    Contains,
    /// Prefix match.
    StartsWith,
    /// Suffix match.
    EndsWith,
}

impl ComparisonKind {
    /// Returns `true` for comparisons that only apply to strings.
    #[must_use]
    pub fn is_string_only(self) -> bool {
        matches!(self, Self::Contains | Self::StartsWith | Self::EndsWith)
    }
}

impl fmt::Display for ComparisonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Invalid [`FilterCriteria`] arguments.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    /// The member name is empty or whitespace.
    #[error("criteria name must not be blank")]
    BlankName,
    /// A `null` value for a type that cannot hold it.
    #[error("null is not allowed for '{name}' of type {property_type}")]
    NullNotAllowed {
        /// Member name.
        name: String,
        /// Declared member type.
        property_type: String,
    },
    /// The target type has no such member.
    #[error("type {type_name} has no member '{name}'")]
    UnknownProperty {
        /// Requested member name.
        name: String,
        /// Target type.
        type_name: String,
    },
    /// The value cannot be converted to the member type.
    #[error("value {value} cannot be converted to {property_type} for '{name}'")]
    ValueConversion {
        /// Member name.
        name: String,
        /// The rejected value.
        value: String,
        /// Member type.
        property_type: String,
    },
    /// A string-only comparison on a non-string member.
    #[error("comparison {comparison} is not supported for '{name}' of type {property_type}")]
    UnsupportedComparison {
        /// Member name.
        name: String,
        /// The rejected comparison.
        comparison: ComparisonKind,
        /// Member type.
        property_type: String,
    },
}

/// A single member condition, described without an expression string.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    property_type: TypeRef,
    name: String,
    value: Scalar,
    comparison: ComparisonKind,
}

impl FilterCriteria {
    /// Create criteria from an explicit property type.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError`] when `name` is blank, when `value` is null
    /// and `property_type` is not nullable, or when a string-only comparison
    /// targets a non-string type.
    pub fn new(
        property_type: TypeRef,
        name: impl Into<String>,
        value: impl Into<Scalar>,
        comparison: ComparisonKind,
    ) -> Result<Self, ArgumentError> {
        let name = name.into();
        let value = value.into();

        if name.trim().is_empty() {
            return Err(ArgumentError::BlankName);
        }
        if value.is_null() && !property_type.accepts_null() {
            return Err(ArgumentError::NullNotAllowed {
                name,
                property_type: property_type.to_string(),
            });
        }
        if comparison.is_string_only() && *property_type.unwrap_optional() != TypeRef::Str {
            return Err(ArgumentError::UnsupportedComparison {
                name,
                comparison,
                property_type: property_type.to_string(),
            });
        }

        Ok(Self {
            property_type,
            name,
            value,
            comparison,
        })
    }

    /// Create criteria for a member of `T`, resolved through its metadata.
    ///
    /// The member is looked up case-insensitively and recorded under its
    /// canonical name. Optional wrappers are dropped unless `value` is null,
    /// enumerations become `Int` (variant names and declared values are both
    /// accepted), and `value` is converted to the member type.
    ///
    /// # Errors
    ///
    /// Returns [`ArgumentError`] when the member does not exist, the value
    /// cannot be converted, or [`FilterCriteria::new`] rejects the result.
    pub fn for_member<T: Record>(
        name: &str,
        value: impl Into<Scalar>,
        comparison: ComparisonKind,
    ) -> Result<Self, ArgumentError> {
        if name.trim().is_empty() {
            return Err(ArgumentError::BlankName);
        }
        let info = T::type_info();
        let member = info
            .resolve_member(name)
            .ok_or_else(|| ArgumentError::UnknownProperty {
                name: name.to_owned(),
                type_name: info.name.to_owned(),
            })?;

        let declared = &member.ty;
        let inner = declared.unwrap_optional();
        let is_enum = matches!(inner, TypeRef::Enum(_));
        let value = value.into();

        if value.is_null() {
            let property_type = match inner {
                TypeRef::Record(_) => *inner,
                _ if !declared.accepts_null() => *declared,
                TypeRef::Enum(_) => TypeRef::Optional(&TypeRef::Int),
                _ => TypeRef::Optional(inner),
            };
            return Self::new(property_type, member.name, Scalar::Null, comparison);
        }

        let coerced = coerce_scalar(&value, Ty::of(inner)).ok_or_else(|| {
            ArgumentError::ValueConversion {
                name: member.name.to_owned(),
                value: value.to_string(),
                property_type: inner.to_string(),
            }
        })?;

        let property_type = if is_enum { TypeRef::Int } else { *inner };
        Self::new(property_type, member.name, coerced, comparison)
    }

    /// Declared (normalized) member type.
    #[must_use]
    pub fn property_type(&self) -> TypeRef {
        self.property_type
    }

    /// Member name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Comparison value.
    #[must_use]
    pub fn value(&self) -> &Scalar {
        &self.value
    }

    /// Comparison kind.
    #[must_use]
    pub fn comparison(&self) -> ComparisonKind {
        self.comparison
    }
}
