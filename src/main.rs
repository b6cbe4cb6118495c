//! Evosym CLI - Command-line interface for symbolic regression runs.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Evosym - Symbolic regression by genetic programming
#[derive(Parser, Debug)]
#[command(name = "evosym")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log per-generation progress
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve an expression that fits the configured dataset
    Evolve {
        /// Run configuration file (TOML)
        #[arg(short, long, required = true)]
        config: PathBuf,

        /// Random seed (default: config value, else random)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Override the number of generations
        #[arg(short, long)]
        generations: Option<usize>,

        /// Override the population size
        #[arg(short, long)]
        population: Option<usize>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Write a JSON report to file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Check a run configuration and its dataset
    Validate {
        /// Run configuration file (TOML)
        #[arg(short, long, required = true)]
        config: PathBuf,
    },

    /// Score an expression against the configured dataset
    Eval {
        /// Run configuration file (TOML)
        #[arg(short, long, required = true)]
        config: PathBuf,

        /// Expression in infix form, e.g. "(x * exp(y))"
        #[arg(short, long, required = true)]
        expr: String,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = if args.verbose {
        "debug"
    } else if args.quiet {
        "warn"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match args.command {
        Commands::Evolve {
            config,
            seed,
            generations,
            population,
            format,
            output,
            progress,
        } => cli::evolve::execute(config, seed, generations, population, format, output, progress),

        Commands::Validate { config } => cli::validate::execute(config),

        Commands::Eval { config, expr } => cli::eval::execute(config, expr),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
