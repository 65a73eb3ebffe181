//! Command-line arguments.

use clap::{Parser, Subcommand, ValueEnum};
use filterexpr_core::ComparisonKind;

/// filterexpr - inspect, check and run filter expressions
#[derive(Parser, Debug)]
#[command(name = "filterexpr")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log level filter (overridden by RUST_LOG)
    #[arg(long, global = true, env = "FILTEREXPR_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the token stream of an expression
    Tokens {
        /// Expression to tokenize
        expression: String,

        /// Print tokens as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the parsed AST as JSON
    Parse {
        /// Expression to parse
        expression: String,
    },

    /// Compile an expression against the sample Person type
    Check {
        /// Expression to compile
        expression: String,
    },

    /// Run an expression over the bundled sample people
    Eval {
        /// Expression to evaluate
        expression: String,
    },

    /// Build a FilterCriteria for a Person member and print it as JSON
    Criteria {
        /// Member name (case-insensitive)
        member: String,

        /// Comparison kind
        #[arg(value_enum)]
        comparison: Comparison,

        /// Comparison value as JSON (`18`, `"Ann"`, `null`); bare words are strings
        value: String,
    },
}

/// Comparison kinds accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Contains,
    StartsWith,
    EndsWith,
}

impl From<Comparison> for ComparisonKind {
    fn from(c: Comparison) -> Self {
        match c {
            Comparison::Eq => Self::Equal,
            Comparison::Ne => Self::NotEqual,
            Comparison::Gt => Self::GreaterThan,
            Comparison::Ge => Self::GreaterThanOrEqual,
            Comparison::Lt => Self::LessThan,
            Comparison::Le => Self::LessThanOrEqual,
            Comparison::Contains => Self::Contains,
            Comparison::StartsWith => Self::StartsWith,
            Comparison::EndsWith => Self::EndsWith,
        }
    }
}
