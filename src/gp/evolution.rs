//! Main evolution loop for genetic programming.
//!
//! This module orchestrates the evolutionary process: initialization,
//! deviation scoring, survivor selection, crossover, and mutation, repeated
//! for a fixed number of generations. There is no early stopping.

use std::time::Instant;

use log::{debug, info, trace};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::error::{ConfigError, EvolutionError};
use crate::gp::crossover::crossover;
use crate::gp::expr::Expr;
use crate::gp::fitness::evaluate_population;
use crate::gp::mutation::{MutationConfig, mutate};
use crate::gp::selection::{
    Retention, SelectionStats, best_index, select_survivors, tournament_select,
};

/// Configuration for the evolution process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvolutionConfig {
    /// Individuals per generation.
    pub population_size: usize,
    /// Number of generations to run.
    #[serde(alias = "populations_amount")]
    pub generations: usize,
    /// Individuals competing in each tournament.
    pub tournament_size: usize,
    /// Maximum tree depth; a lone leaf has depth 1.
    pub max_depth: usize,
    /// Per-node mutation probability.
    pub mutation_rate: f64,
    /// Percentage of the best individuals kept unchanged.
    pub best_candidates: f64,
    /// Percentage of the worst individuals kept unchanged.
    pub worst_candidates: f64,
    /// RNG seed for reproducibility; a fresh seed is drawn when absent.
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            generations: 50,
            tournament_size: 5,
            max_depth: 4,
            mutation_rate: 0.1,
            best_candidates: 10.0,
            worst_candidates: 10.0,
            seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Check the parameters and the dataset before a run.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self, dataset: &Dataset) -> Result<(), ConfigError> {
        if self.population_size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if self.generations == 0 {
            return Err(ConfigError::NoGenerations);
        }
        if self.tournament_size == 0 {
            return Err(ConfigError::EmptyTournament);
        }
        if self.tournament_size > self.population_size {
            return Err(ConfigError::TournamentTooLarge {
                tournament_size: self.tournament_size,
                population_size: self.population_size,
            });
        }
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(ConfigError::MutationRate(self.mutation_rate));
        }
        for (name, value) in [
            ("best_candidates", self.best_candidates),
            ("worst_candidates", self.worst_candidates),
        ] {
            if !(0.0..=100.0).contains(&value) {
                return Err(ConfigError::Percentage { name, value });
            }
        }
        if self.best_candidates + self.worst_candidates > 100.0 {
            return Err(ConfigError::RetentionOverflow {
                best: self.best_candidates,
                worst: self.worst_candidates,
            });
        }

        dataset.validate()
    }

    /// Slot split used for every generation.
    #[must_use]
    pub fn retention(&self) -> Retention {
        Retention::new(
            self.population_size,
            self.best_candidates,
            self.worst_candidates,
        )
    }
}

/// Best individual of one generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Zero-based generation number.
    pub generation: usize,
    /// Lowest-deviation individual after replacement.
    pub best: Expr,
    /// Its deviation.
    pub deviation: f64,
    /// Mean deviation of the population.
    pub mean_deviation: f64,
    /// Standard deviation of the population's deviations.
    pub deviation_std: f64,
    /// Individuals in the generation.
    pub population_size: usize,
}

/// Outcome of an evolution run.
#[derive(Debug, Clone, Serialize)]
pub struct Evolution {
    /// Seed the run was started from.
    pub seed: u64,
    /// One entry per generation, in order.
    pub generations: Vec<GenerationResult>,
    /// Wall-clock time in seconds.
    pub elapsed_seconds: f64,
}

impl Evolution {
    /// Result of the final generation.
    #[must_use]
    pub fn best(&self) -> Option<&GenerationResult> {
        self.generations.last()
    }
}

/// Run the evolution process.
///
/// Seeds a [`SmallRng`] from `config.seed`, or from a fresh random seed that
/// is reported back in [`Evolution::seed`].
///
/// # Errors
///
/// Returns an error if the configuration or dataset is invalid, or if an
/// individual violates the arity invariant.
pub fn evolve(config: &EvolutionConfig, dataset: &Dataset) -> Result<Evolution, EvolutionError> {
    evolve_observed(config, dataset, |_| {})
}

/// Run the evolution process, calling `on_generation` with each result as
/// soon as it is recorded.
///
/// # Errors
///
/// Same as [`evolve`].
pub fn evolve_observed<F>(
    config: &EvolutionConfig,
    dataset: &Dataset,
    on_generation: F,
) -> Result<Evolution, EvolutionError>
where
    F: FnMut(&GenerationResult),
{
    let seed = config.seed.unwrap_or_else(rand::random);
    let mut rng = SmallRng::seed_from_u64(seed);
    let start_time = Instant::now();

    info!(
        "evolving {} individuals for {} generations over {} samples (seed {seed})",
        config.population_size,
        config.generations,
        dataset.len()
    );

    let generations = evolve_with(config, dataset, &mut rng, on_generation)?;

    let elapsed_seconds = start_time.elapsed().as_secs_f64();
    if let Some(last) = generations.last() {
        info!(
            "finished in {elapsed_seconds:.2}s: deviation {:.6} for {}",
            last.deviation, last.best
        );
    }

    Ok(Evolution {
        seed,
        generations,
        elapsed_seconds,
    })
}

/// Run the evolution loop with a caller-supplied RNG.
///
/// `on_generation` is called with each result as soon as it is recorded.
///
/// # Errors
///
/// Returns an error if the configuration or dataset is invalid, or if an
/// individual violates the arity invariant.
pub fn evolve_with<R, F>(
    config: &EvolutionConfig,
    dataset: &Dataset,
    rng: &mut R,
    mut on_generation: F,
) -> Result<Vec<GenerationResult>, EvolutionError>
where
    R: Rng,
    F: FnMut(&GenerationResult),
{
    config.validate(dataset)?;

    let variables = dataset.variables.as_slice();
    let retention = config.retention();
    let mutation = MutationConfig {
        max_depth: config.max_depth,
        rate: config.mutation_rate,
        variables,
    };

    // Initialize population
    let mut population: Vec<Expr> = (0..config.population_size)
        .map(|_| Expr::random(rng, config.max_depth, variables))
        .collect();
    let mut deviations = evaluate_population(&population, dataset)?;

    let mut results = Vec::with_capacity(config.generations);

    for generation in 0..config.generations {
        let survivors = select_survivors(&deviations, retention);
        trace!(
            "generation {generation}: {} elite, {} bred, {} worst",
            survivors.elite.len(),
            retention.offspring,
            survivors.worst.len()
        );

        let mut next_population = Vec::with_capacity(config.population_size);

        // Preserve elite
        for &idx in &survivors.elite {
            next_population.push(population[idx].clone());
        }

        // Breed the remaining slots
        for _ in 0..retention.offspring {
            let p1 = tournament_select(&deviations, config.tournament_size, rng);
            let p2 = tournament_select(&deviations, config.tournament_size, rng);
            let child = crossover(&population[p1], &population[p2], rng);
            next_population.push(mutate(&child, &mutation, 0, rng));
        }

        // Keep the worst performers verbatim for diversity
        for &idx in &survivors.worst {
            next_population.push(population[idx].clone());
        }

        population = next_population;
        deviations = evaluate_population(&population, dataset)?;

        let stats = SelectionStats::from_deviations(&deviations);
        let Some(best) = best_index(&deviations) else {
            break;
        };
        let result = GenerationResult {
            generation,
            best: population[best].clone(),
            deviation: deviations[best],
            mean_deviation: stats.mean,
            deviation_std: stats.std_dev,
            population_size: population.len(),
        };

        debug!(
            "Gen {:>5}: best={:.6} mean={:.6} std={:.6} expr={}",
            generation, result.deviation, stats.mean, stats.std_dev, result.best
        );

        on_generation(&result);
        results.push(result);
    }

    Ok(results)
}
