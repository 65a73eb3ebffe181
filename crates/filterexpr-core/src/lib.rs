//! Filter expressions compiled into typed predicates.
//!
//! An expression such as `Age > 18 && Company.Name.Contains("Acme")` is
//! tokenized, parsed into an untyped AST, and resolved against the metadata of
//! a target type implementing [`Record`]. The result is a [`Predicate`] that
//! can be evaluated against any number of values of that type.
//!
//! [`FilterCriteria`] describes single-member conditions without going
//! through an expression string.

pub mod compiler;
pub mod config;
pub mod criteria;
pub mod error;
pub mod expression;
pub mod reflect;
pub mod value;

pub use compiler::{Compiler, compile};
pub use config::CompilerConfig;
pub use criteria::{ArgumentError, ComparisonKind, FilterCriteria};
pub use error::{CompileError, Limit};
pub use expression::{BuildError, ParseError, ParseErrorKind, Predicate, TokenizeError};
pub use reflect::{EnumInfo, MemberInfo, MemberKind, MethodInfo, Record, Reflect, TypeInfo, TypeRef};
pub use value::{Scalar, Value};
