//! filterexpr - inspect, check and run filter expressions from the shell.
//!
//! # Usage
//!
//! ```text
//! filterexpr tokens 'Age > 18'
//! filterexpr parse 'Age > 18 && Name.Contains("Doe")'
//! filterexpr check 'Company.Name == "Acme Corp"'
//! filterexpr eval 'Role == "Engineer" || Salary > 100000'
//! filterexpr criteria email eq null
//! ```
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FILTEREXPR_LOG_LEVEL` | `warn` | Log level filter |
//! | `RUST_LOG` | *(unset)* | Fine-grained tracing filter (overrides `FILTEREXPR_LOG_LEVEL`) |
//! | `FILTEREXPR_MAX_LENGTH` | *(unset)* | Reject longer expressions |
//! | `FILTEREXPR_MAX_DEPTH` | *(unset)* | Reject deeper nesting |

mod cli;
mod sample;

use anyhow::{Context, Result};
use clap::Parser;
use filterexpr_core::expression::{parse, tokenize};
use filterexpr_core::{CompileError, Compiler, FilterCriteria, Predicate, Scalar};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::sample::Person;

/// Initialize the tracing subscriber.
///
/// Uses `RUST_LOG` if set, otherwise falls back to the `--log-level` value.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

/// Compile against [`Person`], turning failures into a rendered diagnostic.
fn compile_person(expression: &str) -> Result<Predicate<Person>> {
    let compiler = Compiler::from_env();
    debug!(config = ?compiler.config(), "loaded compiler configuration");
    compiler
        .compile::<Person>(expression)
        .map_err(|err: CompileError| anyhow::anyhow!(err.render(expression)))
}

/// Parse a command-line value as JSON, treating anything else as a string.
fn parse_value(raw: &str) -> Scalar {
    serde_json::from_str(raw).unwrap_or_else(|_| Scalar::from(raw))
}

fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Tokens { expression, json } => {
            let tokens = tokenize(&expression)
                .map_err(|err| anyhow::anyhow!(CompileError::from(err).render(&expression)))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in &tokens {
                    println!("{:>4}  {:<10} {}", token.offset, token.kind.to_string(), token.text);
                }
            }
        }
        Commands::Parse { expression } => {
            let ast = tokenize(&expression)
                .map_err(CompileError::from)
                .and_then(|tokens| parse(&tokens).map_err(CompileError::from))
                .map_err(|err| anyhow::anyhow!(err.render(&expression)))?;
            println!("{}", serde_json::to_string_pretty(&ast)?);
        }
        Commands::Check { expression } => {
            compile_person(&expression)?;
            println!("ok");
        }
        Commands::Eval { expression } => {
            let predicate = compile_person(&expression)?;
            let people = sample::people();
            let matched = predicate.filter(&people);
            info!(total = people.len(), matched = matched.len(), "evaluated expression");
            for person in matched {
                println!("{} ({})", person.name, person.age);
            }
        }
        Commands::Criteria {
            member,
            comparison,
            value,
        } => {
            let criteria =
                FilterCriteria::for_member::<Person>(&member, parse_value(&value), comparison.into())?;
            println!("{}", serde_json::to_string_pretty(&criteria)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level)?;
    run(cli.command)
}
