//! CLI command implementations for Evosym.

pub(crate) mod eval;
pub(crate) mod evolve;
pub(crate) mod validate;

mod output;

use clap::ValueEnum;
use std::error::Error;
use std::fmt;

/// Output format for the `evolve` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<evosym::LoadError> for CliError {
    fn from(e: evosym::LoadError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<evosym::ConfigError> for CliError {
    fn from(e: evosym::ConfigError) -> Self {
        Self::new(format!("invalid configuration: {e}"))
    }
}

impl From<evosym::EvolutionError> for CliError {
    fn from(e: evosym::EvolutionError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<evosym::EvalError> for CliError {
    fn from(e: evosym::EvalError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<evosym::ParseError> for CliError {
    fn from(e: evosym::ParseError) -> Self {
        Self::new(format!("invalid expression: {e}"))
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}
