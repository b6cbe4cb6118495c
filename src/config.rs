//! Run configuration files.
//!
//! A run is described by a TOML file with an `[evolution]` table of
//! [`EvolutionConfig`] parameters and a `[dataset]` table that either embeds
//! the samples or points at a JSON dataset file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, Sample};
use crate::error::LoadError;
use crate::gp::EvolutionConfig;

/// Where the dataset comes from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatasetSource {
    /// JSON dataset file; relative paths resolve against the config file.
    pub path: Option<PathBuf>,
    /// Inline variable identifiers.
    pub variables: Option<Vec<String>>,
    /// Inline samples.
    pub samples: Option<Vec<Sample>>,
}

/// Contents of a run configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Evolution parameters; missing keys take their defaults.
    #[serde(default)]
    pub evolution: EvolutionConfig,
    /// Dataset location.
    pub dataset: DatasetSource,
}

impl Config {
    /// Parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML for
    /// this schema.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&contents).map_err(|source| LoadError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Materialize the dataset.
    ///
    /// Inline samples win over `path`. `base_dir` anchors a relative `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if no dataset is described or the file fails to load.
    pub fn dataset(&self, base_dir: &Path) -> Result<Dataset, LoadError> {
        match &self.dataset {
            DatasetSource {
                variables: Some(variables),
                samples: Some(samples),
                ..
            } => Ok(Dataset::new(variables.clone(), samples.clone())),
            DatasetSource {
                path: Some(path), ..
            } => Dataset::load(&base_dir.join(path)),
            _ => Err(LoadError::MissingDataset),
        }
    }
}

/// Load a configuration file and the dataset it describes.
///
/// # Errors
///
/// Returns an error if either the configuration or the dataset fails to load.
pub fn load_run(path: &Path) -> Result<(Config, Dataset), LoadError> {
    let config = Config::load(path)?;
    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    let dataset = config.dataset(base_dir)?;
    Ok((config, dataset))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INLINE: &str = r#"
[evolution]
population_size = 50
populations_amount = 30
tournament_size = 5
max_depth = 3
mutation_rate = 0.1
best_candidates = 10
worst_candidates = 10
seed = 7

[dataset]
variables = ["x"]
samples = [
    { inputs = [1.0], output = 2.0 },
    { inputs = [2.0], output = 4.0 },
]
"#;

    #[test]
    fn test_parse_inline_config() {
        let config: Config = toml::from_str(INLINE).unwrap();
        assert_eq!(config.evolution.population_size, 50);
        assert_eq!(config.evolution.generations, 30);
        assert_eq!(config.evolution.seed, Some(7));

        let dataset = config.dataset(Path::new(".")).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.variables, vec!["x".to_string()]);
    }

    #[test]
    fn test_missing_evolution_uses_defaults() {
        let config: Config = toml::from_str("[dataset]\npath = \"data.json\"\n").unwrap();
        assert_eq!(config.evolution, EvolutionConfig::default());
    }

    #[test]
    fn test_partial_evolution_fills_defaults() {
        let config: Config =
            toml::from_str("[evolution]\nmax_depth = 6\n[dataset]\npath = \"d.json\"\n").unwrap();
        assert_eq!(config.evolution.max_depth, 6);
        assert_eq!(
            config.evolution.population_size,
            EvolutionConfig::default().population_size
        );
    }

    #[test]
    fn test_unknown_keys_rejected() {
        let result: Result<Config, _> =
            toml::from_str("[evolution]\npopulation = 5\n[dataset]\npath = \"d.json\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_dataset_section() {
        let config: Config = toml::from_str("[dataset]\n").unwrap();
        assert!(matches!(
            config.dataset(Path::new(".")),
            Err(LoadError::MissingDataset)
        ));
    }

    #[test]
    fn test_load_run_resolves_relative_dataset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("data.json"),
            r#"{"variables": ["x", "y"], "samples": [{"inputs": [1.0, 2.0], "output": 3.0}]}"#,
        )
        .unwrap();
        let config_path = dir.path().join("run.toml");
        fs::write(&config_path, "[dataset]\npath = \"data.json\"\n").unwrap();

        let (_, dataset) = load_run(&config_path).unwrap();
        assert_eq!(dataset.variables.len(), 2);
        assert_eq!(dataset.samples[0].output, 3.0);
    }
}
