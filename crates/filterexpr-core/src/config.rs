//! Compiler configuration.
//!
//! Compilation imposes no limits by default. Callers that accept expressions
//! from untrusted sources can cap input size and nesting through
//! [`CompilerConfig`], either in code or from environment variables.

use serde::{Deserialize, Serialize};
use tracing::warn;
use typed_builder::TypedBuilder;

/// Environment variable holding the maximum expression length.
pub const MAX_LENGTH_ENV: &str = "FILTEREXPR_MAX_LENGTH";
/// Environment variable holding the maximum nesting depth.
pub const MAX_DEPTH_ENV: &str = "FILTEREXPR_MAX_DEPTH";

/// Limits enforced by [`Compiler`](crate::Compiler) before compiling.
///
/// # Examples
///
/// ```
/// use filterexpr_core::CompilerConfig;
///
/// let config = CompilerConfig::builder().max_expression_length(256).build();
/// assert_eq!(config.max_expression_length, Some(256));
/// assert_eq!(config.max_nesting_depth, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct CompilerConfig {
    /// Maximum expression length in characters.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub max_expression_length: Option<usize>,

    /// Maximum nesting of parentheses and `!` prefixes.
    #[builder(default, setter(strip_option))]
    #[serde(default)]
    pub max_nesting_depth: Option<usize>,
}

impl CompilerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `FILTEREXPR_MAX_LENGTH` | unlimited |
    /// | `FILTEREXPR_MAX_DEPTH` | unlimited |
    ///
    /// Values that are not non-negative integers are ignored with a warning.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            max_expression_length: env_limit(MAX_LENGTH_ENV),
            max_nesting_depth: env_limit(MAX_DEPTH_ENV),
        }
    }

    /// Returns `true` when no limit is configured.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        self.max_expression_length.is_none() && self.max_nesting_depth.is_none()
    }
}

fn env_limit(key: &str) -> Option<usize> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<usize>() {
        Ok(n) => Some(n),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable limit");
            None
        }
    }
}
