//! Type metadata and the member-access capability a target type provides.
//!
//! A predicate is compiled against a type's [`TypeInfo`] and evaluated through
//! its [`Reflect`] implementation. Metadata is static: hand-written tables or
//! the [`record!`](crate::record) macro produce it once per type.

use std::fmt;

use crate::value::Value;

/// Static type of a member, method parameter, or method result.
#[derive(Clone, Copy)]
pub enum TypeRef {
    /// Boolean.
    Bool,
    /// Signed 64-bit integer (narrower integers widen to it).
    Int,
    /// 64-bit floating point.
    Float,
    /// String. Not nullable; use `Optional(&TypeRef::Str)` for that.
    Str,
    /// Enumeration whose values travel as their integer representation.
    Enum(&'static EnumInfo),
    /// Nested record. Stored as a function so records may refer to each other.
    Record(fn() -> &'static TypeInfo),
    /// Explicitly nullable wrapper.
    Optional(&'static TypeRef),
}

impl TypeRef {
    /// Record type reference for `T`, usable in `static` metadata tables.
    #[must_use]
    pub const fn record<T: Record>() -> Self {
        Self::Record(T::type_info)
    }

    /// Returns `true` when `null` is an acceptable value of this type.
    #[must_use]
    pub fn accepts_null(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Record(_))
    }

    /// Strip any `Optional` wrappers.
    #[must_use]
    pub fn unwrap_optional(&self) -> &TypeRef {
        let mut current = self;
        while let Self::Optional(inner) = current {
            current = inner;
        }
        current
    }
}

impl PartialEq for TypeRef {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool, Self::Bool)
            | (Self::Int, Self::Int)
            | (Self::Float, Self::Float)
            | (Self::Str, Self::Str) => true,
            (Self::Enum(a), Self::Enum(b)) => std::ptr::eq(*a, *b),
            (Self::Record(a), Self::Record(b)) => std::ptr::eq(a(), b()),
            (Self::Optional(a), Self::Optional(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "Bool"),
            Self::Int => write!(f, "Int"),
            Self::Float => write!(f, "Float"),
            Self::Str => write!(f, "Str"),
            Self::Enum(info) => write!(f, "{}", info.name),
            Self::Record(info) => write!(f, "{}", info().name),
            Self::Optional(inner) => write!(f, "Optional<{inner}>"),
        }
    }
}

impl fmt::Debug for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl serde::Serialize for TypeRef {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Whether a member is a property or a field. Properties win lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// A property.
    Property,
    /// A plain field.
    Field,
}

/// Metadata for a single member.
#[derive(Debug, Clone, Copy)]
pub struct MemberInfo {
    /// Canonical member name, handed to [`Reflect::member`].
    pub name: &'static str,
    /// Property or field.
    pub kind: MemberKind,
    /// Declared type.
    pub ty: TypeRef,
}

/// Metadata for a callable method.
#[derive(Debug, Clone, Copy)]
pub struct MethodInfo {
    /// Method name (matched exactly).
    pub name: &'static str,
    /// Parameter types, in order.
    pub params: &'static [TypeRef],
    /// Result type.
    pub returns: TypeRef,
}

/// Case-insensitive name comparison using full Unicode lowercase mapping.
pub(crate) fn names_match(a: &str, b: &str) -> bool {
    a.chars()
        .flat_map(char::to_lowercase)
        .eq(b.chars().flat_map(char::to_lowercase))
}

/// Metadata for an enumeration.
#[derive(Debug)]
pub struct EnumInfo {
    /// Enumeration name.
    pub name: &'static str,
    /// `(variant name, integer value)` pairs.
    pub variants: &'static [(&'static str, i64)],
}

impl EnumInfo {
    /// Integer value of the variant called `name` (case-insensitive).
    #[must_use]
    pub fn value_of(&self, name: &str) -> Option<i64> {
        self.variants
            .iter()
            .find(|(variant, _)| names_match(variant, name))
            .map(|(_, value)| *value)
    }

    /// Name of the variant with integer value `value`.
    #[must_use]
    pub fn name_of(&self, value: i64) -> Option<&'static str> {
        self.variants
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }
}

/// Metadata describing a record type.
#[derive(Debug)]
pub struct TypeInfo {
    /// Type name used in diagnostics.
    pub name: &'static str,
    /// Members in declaration order.
    pub members: &'static [MemberInfo],
    /// Methods in declaration order.
    pub methods: &'static [MethodInfo],
}

impl TypeInfo {
    /// Resolve a member name case-insensitively, properties before fields.
    ///
    /// Returns `None` when nothing matches or when more than one member of the
    /// winning kind matches.
    #[must_use]
    pub fn resolve_member(&self, name: &str) -> Option<&'static MemberInfo> {
        [MemberKind::Property, MemberKind::Field]
            .into_iter()
            .find_map(|kind| {
                let mut matches = self
                    .members
                    .iter()
                    .filter(|m| m.kind == kind && names_match(m.name, name));
                let first = matches.next()?;
                Some(if matches.next().is_some() {
                    None
                } else {
                    Some(first)
                })
            })
            .flatten()
    }

    /// Methods whose name equals `name` exactly.
    pub fn methods_named<'a>(
        &'static self,
        name: &'a str,
    ) -> impl Iterator<Item = &'static MethodInfo> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }
}

/// Member and method access on a live value.
///
/// Implementations are looked up by canonical names taken from the type's
/// [`TypeInfo`]; unknown names return [`Value::Null`].
pub trait Reflect: Send + Sync {
    /// Read the member called `name`.
    fn member(&self, name: &str) -> Value<'_>;

    /// Invoke the method called `method` with already converted arguments.
    fn invoke<'s>(&'s self, method: &str, args: &[Value<'_>]) -> Value<'s> {
        let _ = (method, args);
        Value::Null
    }
}

/// A type predicates can be compiled against.
pub trait Record: Reflect {
    /// Static metadata for this type.
    fn type_info() -> &'static TypeInfo;
}

/// Implement [`Record`] and [`Reflect`] from a member table.
///
/// Each entry names the member kind (`property` or `field`), the member name,
/// its [`TypeRef`], and an accessor closure whose result converts into
/// [`Value`].
///
/// ```
/// use filterexpr_core::{record, TypeRef};
///
/// struct Person {
///     name: String,
///     age: u32,
///     nickname: Option<String>,
/// }
///
/// record! {
///     Person {
///         property Name: TypeRef::Str => |p| &p.name,
///         property Age: TypeRef::Int => |p| p.age,
///         field Nickname: TypeRef::Optional(&TypeRef::Str) => |p| p.nickname.as_deref(),
///     }
/// }
/// ```
#[macro_export]
macro_rules! record {
    (@kind property) => { $crate::MemberKind::Property };
    (@kind field) => { $crate::MemberKind::Field };
    (
        $ty:ident {
            $( $kind:ident $name:ident : $tref:expr => |$this:ident| $get:expr ),* $(,)?
        }
    ) => {
        impl $crate::Record for $ty {
            fn type_info() -> &'static $crate::TypeInfo {
                static INFO: $crate::TypeInfo = $crate::TypeInfo {
                    name: stringify!($ty),
                    members: &[
                        $(
                            $crate::MemberInfo {
                                name: stringify!($name),
                                kind: $crate::record!(@kind $kind),
                                ty: $tref,
                            },
                        )*
                    ],
                    methods: &[],
                };
                &INFO
            }
        }

        impl $crate::Reflect for $ty {
            fn member(&self, name: &str) -> $crate::Value<'_> {
                $(
                    if name == stringify!($name) {
                        let $this = self;
                        return $crate::Value::from($get);
                    }
                )*
                $crate::Value::Null
            }
        }
    };
}
