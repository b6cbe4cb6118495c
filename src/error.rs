//! Error types for expression evaluation, configuration, and runs.

use std::path::PathBuf;

use thiserror::Error;

/// Structural failure while evaluating an expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvalError {
    /// An operator node carries a different number of children than its arity.
    #[error("operator `{symbol}` expected {expected} operand(s), got {found}")]
    ArityMismatch {
        /// Operator symbol.
        symbol: &'static str,
        /// Registered arity.
        expected: usize,
        /// Children actually present.
        found: usize,
    },
}

/// Invalid run parameters, detected before the first generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Population size of zero.
    #[error("population size must be positive")]
    EmptyPopulation,
    /// Generation count of zero.
    #[error("generation count must be positive")]
    NoGenerations,
    /// Tournament size of zero.
    #[error("tournament size must be positive")]
    EmptyTournament,
    /// Tournament larger than the population it samples from.
    #[error("tournament size {tournament_size} exceeds population size {population_size}")]
    TournamentTooLarge {
        /// Configured tournament size.
        tournament_size: usize,
        /// Configured population size.
        population_size: usize,
    },
    /// Maximum depth of zero.
    #[error("max depth must be at least 1")]
    ZeroDepth,
    /// Mutation rate outside `[0, 1]`.
    #[error("mutation rate {0} is outside [0, 1]")]
    MutationRate(f64),
    /// A retention percentage outside `[0, 100]`.
    #[error("{name} percentage {value} is outside [0, 100]")]
    Percentage {
        /// Parameter name.
        name: &'static str,
        /// Offending value.
        value: f64,
    },
    /// Elite and worst retention leave a negative number of breeding slots.
    #[error("best ({best}%) and worst ({worst}%) candidates exceed 100%")]
    RetentionOverflow {
        /// Elite percentage.
        best: f64,
        /// Worst percentage.
        worst: f64,
    },
    /// The dataset has no samples.
    #[error("dataset is empty")]
    EmptyDataset,
    /// No variable identifiers were declared.
    #[error("no variables declared")]
    NoVariables,
    /// A variable identifier that would not survive rendering and parsing.
    #[error("variable name `{0}` must be non-empty and use only letters, digits, `_` or `.`")]
    VariableName(String),
    /// A sample's input vector does not line up with the variables.
    #[error("sample {row} has {found} inputs, expected {expected}")]
    RowWidth {
        /// Zero-based sample index.
        row: usize,
        /// Declared variable count.
        expected: usize,
        /// Inputs in the sample.
        found: usize,
    },
    /// A sample contains NaN or an infinity.
    #[error("sample {row} contains a non-finite value")]
    NonFinite {
        /// Zero-based sample index.
        row: usize,
    },
}

/// Failure while loading a dataset or configuration file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// File could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: std::io::Error,
    },
    /// Dataset JSON was malformed.
    #[error("invalid dataset JSON in {}: {source}", path.display())]
    Json {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// Configuration TOML was malformed.
    #[error("invalid configuration in {}: {source}", path.display())]
    Toml {
        /// File that failed.
        path: PathBuf,
        /// Underlying error.
        source: toml::de::Error,
    },
    /// The `[dataset]` section names neither inline samples nor a file.
    #[error("dataset section needs either `path` or `variables` + `samples`")]
    MissingDataset,
}

/// Failure while parsing the infix text form of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input ended before the expression was complete.
    #[error("unexpected end of input")]
    UnexpectedEnd,
    /// A character that cannot start or continue the expected token.
    #[error("unexpected `{found}` at offset {offset}")]
    Unexpected {
        /// Offending character.
        found: char,
        /// Byte offset in the input.
        offset: usize,
    },
    /// An operator symbol outside the table, or one used with the wrong arity.
    #[error("unknown operator `{0}`")]
    UnknownOperator(String),
    /// Nesting exceeded the parser's depth limit.
    #[error("expression nests deeper than {0} levels")]
    TooDeep(usize),
    /// Text remained after a complete expression.
    #[error("trailing input at offset {0}")]
    Trailing(usize),
}

/// Failure that aborts an evolution run.
#[derive(Debug, Error)]
pub enum EvolutionError {
    /// Parameters rejected before the loop started.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An individual violated the arity invariant.
    #[error(transparent)]
    Eval(#[from] EvalError),
}
