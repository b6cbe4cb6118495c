//! Expression scoring command implementation.

use super::CliError;
use evosym::gp::deviation;
use evosym::{Expr, load_run};
use std::path::PathBuf;

/// Execute the eval command.
///
/// # Errors
///
/// Returns an error if the expression does not parse, the dataset cannot be
/// loaded, or evaluation fails.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(config_path: PathBuf, expr: String) -> Result<(), CliError> {
    let (_, dataset) = load_run(&config_path)?;
    dataset.validate()?;

    let expr: Expr = expr.parse()?;
    let score = deviation(&expr, &dataset)?;

    println!("Expression: {expr}");
    println!("Samples:    {}", dataset.len());
    println!("Deviation:  {score:.6}");

    Ok(())
}
