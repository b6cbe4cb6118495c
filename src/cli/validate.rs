//! Configuration validation command implementation.

use super::CliError;
use evosym::load_run;
use std::path::PathBuf;

/// Execute the validate command.
///
/// # Errors
///
/// Returns an error if the configuration or dataset cannot be loaded or is
/// invalid.
#[allow(clippy::needless_pass_by_value)]
pub(crate) fn execute(config_path: PathBuf) -> Result<(), CliError> {
    println!("Validating: {}", config_path.display());

    let (config, dataset) = load_run(&config_path)?;
    print_check("Configuration file", true);

    let dataset_check = dataset.validate();
    print_check("Dataset shape", dataset_check.is_ok());
    dataset_check?;

    let params = &config.evolution;
    let params_check = params.validate(&dataset);
    print_check("Evolution parameters", params_check.is_ok());
    params_check?;

    let retention = params.retention();

    println!();
    println!("Summary:");
    println!("  Variables:    {}", dataset.variables.join(", "));
    println!("  Samples:      {}", dataset.len());
    println!("  Population:   {}", params.population_size);
    println!("  Generations:  {}", params.generations);
    println!("  Tournament:   {}", params.tournament_size);
    println!("  Max depth:    {}", params.max_depth);
    println!("  Mutation:     {}", params.mutation_rate);
    println!(
        "  Per generation: {} elite + {} bred + {} worst",
        retention.elite, retention.offspring, retention.worst
    );
    match params.seed {
        Some(seed) => println!("  Seed:         {seed}"),
        None => println!("  Seed:         random"),
    }

    println!();
    println!("Validation successful!");

    Ok(())
}

fn print_check(name: &str, ok: bool) {
    let status = if ok { "OK" } else { "FAILED" };
    let symbol = if ok { "✓" } else { "✗" };
    println!("  {symbol} {name}: {status}");
}
