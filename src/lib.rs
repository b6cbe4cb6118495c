// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
#![cfg_attr(test, allow(clippy::float_cmp))]
//! Evosym: symbolic regression by tree-based genetic programming.
//!
//! This crate evolves mathematical expressions that approximate a dataset of
//! `(inputs, output)` samples. It is designed for:
//! - Numerically safe evaluation (no overflow, NaN, or division errors)
//! - Bit-exact reproducible runs under a fixed seed
//! - Infix rendering that downstream algebra tools can parse back
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │      CLI / Config files (TOML)      │
//! ├─────────────────────────────────────┤
//! │     Evolution Engine (gp)           │
//! ├─────────────────────────────────────┤
//! │     Dataset + Safe Primitives       │
//! └─────────────────────────────────────┘
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod gp;

pub use config::{Config, DatasetSource, load_run};
pub use dataset::{Dataset, RowBindings, Sample};
pub use error::{ConfigError, EvalError, EvolutionError, LoadError, ParseError};
pub use gp::{Evolution, EvolutionConfig, Expr, GenerationResult, Operator, evolve};
