//! Genetic Programming module for symbolic regression.
//!
//! This module provides the evolutionary engine that searches for expression
//! trees approximating a dataset. Trees are built from a fixed table of
//! numerically safe operators and scored by their deviation (RMSE) from the
//! expected outputs.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         Evolution Loop              │
//! ├─────────────────────────────────────┤
//! │  Selection │ Crossover │ Mutation   │
//! ├─────────────────────────────────────┤
//! │         Fitness Evaluation          │
//! ├─────────────────────────────────────┤
//! │   Expression Trees │ Operator Table │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use evosym::Dataset;
//! use evosym::gp::{EvolutionConfig, evolve};
//!
//! let dataset = Dataset::from_pairs(["x"], [(vec![1.0], 2.0), (vec![2.0], 4.0)]);
//! let config = EvolutionConfig {
//!     population_size: 20,
//!     generations: 3,
//!     seed: Some(7),
//!     ..EvolutionConfig::default()
//! };
//!
//! let evolution = evolve(&config, &dataset)?;
//! assert_eq!(evolution.generations.len(), 3);
//! # Ok::<(), evosym::error::EvolutionError>(())
//! ```

mod crossover;
mod evolution;
mod expr;
mod fitness;
mod mutation;
mod ops;
mod selection;

pub use crossover::crossover;
pub use evolution::{
    Evolution, EvolutionConfig, GenerationResult, evolve, evolve_observed, evolve_with,
};
pub use expr::{Bindings, Expr, MAX_PARSE_DEPTH, is_identifier};
pub use fitness::{deviation, evaluate_population};
pub use mutation::{MutationConfig, mutate};
pub use ops::{EXP_LIMIT, Operator, safe_add, safe_div, safe_exp, safe_mul, safe_sqr, safe_sub};
pub use selection::{
    Retention, SelectionStats, Survivors, best_index, rank, select_survivors, tournament_select,
};
