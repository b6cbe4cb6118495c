//! CLI command for running an evolution.

#![allow(clippy::needless_pass_by_value)]

use super::output::{JsonReport, format_text};
use super::{CliError, OutputFormat};
use evosym::gp::evolve_observed;
use evosym::load_run;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use std::fs;
use std::path::PathBuf;

/// Execute the evolve command.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or the run fails.
#[allow(clippy::too_many_arguments)]
pub(crate) fn execute(
    config_path: PathBuf,
    seed: Option<u64>,
    generations: Option<usize>,
    population: Option<usize>,
    format: OutputFormat,
    output: Option<PathBuf>,
    progress: bool,
) -> Result<(), CliError> {
    let (config, dataset) = load_run(&config_path)?;

    // Command-line overrides win over the file
    let mut params = config.evolution;
    if let Some(generations) = generations {
        params.generations = generations;
    }
    if let Some(population) = population {
        params.population_size = population;
    }
    params.seed = seed.or(params.seed);
    params.validate(&dataset)?;

    let bar = progress.then(|| {
        let pb = ProgressBar::new(params.generations as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations (best {msg})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=>-"),
        );
        pb
    });

    let evolution = evolve_observed(&params, &dataset, |result| {
        if let Some(pb) = &bar {
            pb.set_message(format!("{:.6}", result.deviation));
            pb.inc(1);
        }
    })?;
    if let Some(pb) = &bar {
        pb.finish_and_clear();
    }

    let report = JsonReport::from_evolution(&evolution);
    if let Some(path) = &output {
        fs::write(path, serde_json::to_string_pretty(&report)?).map_err(|e| {
            CliError::new(format!("Failed to write {}: {e}", path.display()))
        })?;
        info!("report written to {}", path.display());
    }

    match format {
        OutputFormat::Text => print!("{}", format_text(&evolution)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
