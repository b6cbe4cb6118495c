//! Output formatting utilities for CLI.

use evosym::{Evolution, GenerationResult};
use serde::Serialize;

/// JSON-serializable run report.
#[derive(Debug, Serialize)]
pub(super) struct JsonReport {
    /// Seed the run started from.
    pub(super) seed: u64,
    /// Wall-clock time in seconds.
    pub(super) elapsed_seconds: f64,
    /// Best expression of the final generation, in infix form.
    pub(super) best_expression: Option<String>,
    /// Deviation of that expression.
    pub(super) best_deviation: Option<f64>,
    /// Per-generation results.
    pub(super) generations: Vec<JsonGeneration>,
}

/// JSON-serializable generation result.
#[derive(Debug, Serialize)]
pub(super) struct JsonGeneration {
    /// Zero-based generation number.
    pub(super) generation: usize,
    /// Best deviation.
    pub(super) deviation: f64,
    /// Mean deviation of the population.
    pub(super) mean_deviation: f64,
    /// Best expression in infix form.
    pub(super) expression: String,
}

impl JsonReport {
    /// Create from an evolution outcome.
    pub(super) fn from_evolution(evolution: &Evolution) -> Self {
        let best = evolution.best();
        Self {
            seed: evolution.seed,
            elapsed_seconds: evolution.elapsed_seconds,
            best_expression: best.map(|r| r.best.to_string()),
            best_deviation: best.map(|r| r.deviation),
            generations: evolution
                .generations
                .iter()
                .map(JsonGeneration::from_result)
                .collect(),
        }
    }
}

impl JsonGeneration {
    fn from_result(result: &GenerationResult) -> Self {
        Self {
            generation: result.generation,
            deviation: result.deviation,
            mean_deviation: result.mean_deviation,
            expression: result.best.to_string(),
        }
    }
}

/// Format an evolution outcome as human-readable text.
pub(super) fn format_text(evolution: &Evolution) -> String {
    let mut output = String::new();

    output.push_str(&format!("Evolution (seed: {})\n", evolution.seed));
    output.push_str(&format!(
        "  {:>5}  {:>14}  {:>14}  expression\n",
        "gen", "deviation", "mean"
    ));
    for result in &evolution.generations {
        output.push_str(&format!(
            "  {:>5}  {:>14.6}  {:>14.6e}  {}\n",
            result.generation, result.deviation, result.mean_deviation, result.best
        ));
    }

    if let Some(best) = evolution.best() {
        output.push('\n');
        output.push_str(&format!("Best solution: {}\n", best.best));
        output.push_str(&format!("Deviation:     {:.6}\n", best.deviation));
    }
    output.push_str(&format!("Elapsed:       {:.2}s\n", evolution.elapsed_seconds));

    output
}
