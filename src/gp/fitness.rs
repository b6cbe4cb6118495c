//! Fitness evaluation for genetic programming.
//!
//! Fitness is the deviation of an expression from the dataset: the root mean
//! square of the per-sample errors. Lower is better and 0 is a perfect fit.

// Sample counts are converted to f64 for the mean
#![allow(clippy::cast_precision_loss)]

use rayon::prelude::*;

use crate::dataset::Dataset;
use crate::error::EvalError;
use crate::gp::expr::Expr;
use crate::gp::ops::{safe_add, safe_sqr, safe_sub};

/// Root-mean-square error of `expr` over `dataset`.
///
/// Squared errors saturate at `f64::MAX` and so does their running sum, so
/// the result is always finite and non-negative.
///
/// The dataset must be non-empty, as [`Dataset::validate`] enforces. There is
/// no meaningful error over zero samples.
///
/// # Errors
///
/// Returns an error if the expression violates the arity invariant.
pub fn deviation(expr: &Expr, dataset: &Dataset) -> Result<f64, EvalError> {
    debug_assert!(!dataset.is_empty(), "deviation over an empty dataset");

    let mut total = 0.0;
    for sample in &dataset.samples {
        let predicted = expr.evaluate(&dataset.bindings(sample))?;
        total = safe_add(total, safe_sqr(safe_sub(predicted, sample.output)));
    }

    Ok((total / dataset.len() as f64).sqrt())
}

/// Score every individual of a population in parallel.
///
/// Returns deviations in the same order as the input population.
///
/// # Errors
///
/// Returns the first structural error encountered.
pub fn evaluate_population(population: &[Expr], dataset: &Dataset) -> Result<Vec<f64>, EvalError> {
    population
        .par_iter()
        .map(|expr| deviation(expr, dataset))
        .collect()
}
