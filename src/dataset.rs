//! Training data: ordered samples aligned with named variables.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, LoadError};
use crate::gp::{Bindings, is_identifier};

/// One observation: input values in variable order plus the expected output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Inputs, positionally aligned with [`Dataset::variables`].
    pub inputs: Vec<f64>,
    /// Expected output.
    pub output: f64,
}

impl Sample {
    /// Create a sample.
    #[must_use]
    pub fn new(inputs: Vec<f64>, output: f64) -> Self {
        Self { inputs, output }
    }
}

/// A dataset of samples over a fixed, ordered set of variables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Variable identifiers, in input-vector order.
    pub variables: Vec<String>,
    /// Observations.
    pub samples: Vec<Sample>,
}

impl Dataset {
    /// Create a dataset.
    #[must_use]
    pub fn new(variables: Vec<String>, samples: Vec<Sample>) -> Self {
        Self { variables, samples }
    }

    /// Build a dataset from `(inputs, output)` pairs.
    #[must_use]
    pub fn from_pairs<S: Into<String>>(
        variables: impl IntoIterator<Item = S>,
        pairs: impl IntoIterator<Item = (Vec<f64>, f64)>,
    ) -> Self {
        Self {
            variables: variables.into_iter().map(Into::into).collect(),
            samples: pairs
                .into_iter()
                .map(|(inputs, output)| Sample::new(inputs, output))
                .collect(),
        }
    }

    /// Load a dataset from a JSON file of the form
    /// `{"variables": [...], "samples": [{"inputs": [...], "output": ...}]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed. Shape checks
    /// happen in [`Dataset::validate`].
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| LoadError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Check that the dataset can be scored against.
    ///
    /// # Errors
    ///
    /// Rejects empty datasets and empty variable lists. Also rejects variable
    /// names outside the expression grammar, rows whose width differs from
    /// the variable count, and non-finite values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.samples.is_empty() {
            return Err(ConfigError::EmptyDataset);
        }
        if self.variables.is_empty() {
            return Err(ConfigError::NoVariables);
        }
        if let Some(name) = self.variables.iter().find(|name| !is_identifier(name)) {
            return Err(ConfigError::VariableName(name.clone()));
        }

        for (row, sample) in self.samples.iter().enumerate() {
            if sample.inputs.len() != self.variables.len() {
                return Err(ConfigError::RowWidth {
                    row,
                    expected: self.variables.len(),
                    found: sample.inputs.len(),
                });
            }
            if !sample.output.is_finite() || sample.inputs.iter().any(|v| !v.is_finite()) {
                return Err(ConfigError::NonFinite { row });
            }
        }

        Ok(())
    }

    /// Positional bindings for one sample.
    #[must_use]
    pub fn bindings<'a>(&'a self, sample: &'a Sample) -> RowBindings<'a> {
        RowBindings {
            names: &self.variables,
            values: &sample.inputs,
        }
    }
}

/// Variables zipped with one input vector.
#[derive(Debug, Clone, Copy)]
pub struct RowBindings<'a> {
    names: &'a [String],
    values: &'a [f64],
}

impl<'a> RowBindings<'a> {
    /// Bind `names[i]` to `values[i]`; extra names or values are ignored.
    #[must_use]
    pub fn new(names: &'a [String], values: &'a [f64]) -> Self {
        Self { names, values }
    }
}

impl Bindings for RowBindings<'_> {
    fn value_of(&self, name: &str) -> Option<f64> {
        // First match wins, as with a map built from the pairs in order
        self.names
            .iter()
            .zip(self.values)
            .find(|(n, _)| n.as_str() == name)
            .map(|(_, v)| *v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn linear() -> Dataset {
        Dataset::from_pairs(["x"], [(vec![1.0], 2.0), (vec![2.0], 4.0)])
    }

    #[test]
    fn test_validate_accepts_aligned_rows() {
        assert_eq!(linear().validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_bad_shapes() {
        let empty = Dataset::new(vec!["x".into()], Vec::new());
        assert_eq!(empty.validate(), Err(ConfigError::EmptyDataset));

        let no_vars = Dataset::from_pairs(Vec::<String>::new(), [(vec![], 1.0)]);
        assert_eq!(no_vars.validate(), Err(ConfigError::NoVariables));

        let ragged = Dataset::from_pairs(["x", "y"], [(vec![1.0, 2.0], 0.0), (vec![1.0], 0.0)]);
        assert_eq!(
            ragged.validate(),
            Err(ConfigError::RowWidth {
                row: 1,
                expected: 2,
                found: 1,
            })
        );

        let nan = Dataset::from_pairs(["x"], [(vec![f64::NAN], 0.0)]);
        assert_eq!(nan.validate(), Err(ConfigError::NonFinite { row: 0 }));
    }

    #[test]
    fn test_validate_rejects_unparseable_names() {
        for name in ["wind speed", "x-1", "", "f(x)"] {
            let dataset = Dataset::from_pairs(["x", name], [(vec![1.0, 2.0], 0.0)]);
            assert_eq!(
                dataset.validate(),
                Err(ConfigError::VariableName(name.to_string()))
            );
        }

        let fine = Dataset::from_pairs(["wind_speed", "x.1", "exp"], [(vec![1.0, 2.0, 3.0], 0.0)]);
        assert_eq!(fine.validate(), Ok(()));
    }

    #[test]
    fn test_validated_names_round_trip() {
        let dataset = Dataset::from_pairs(["wind_speed", "exp"], [(vec![1.0, 2.0], 0.0)]);
        assert_eq!(dataset.validate(), Ok(()));

        let expr = crate::gp::Expr::binary(
            crate::gp::Operator::Add,
            crate::gp::Expr::var("wind_speed"),
            crate::gp::Expr::var("exp"),
        );
        let parsed: crate::gp::Expr = expr.to_string().parse().unwrap();
        assert_eq!(parsed, expr);
    }

    #[test]
    fn test_row_bindings_are_positional() {
        let names = vec!["x".to_string(), "y".to_string()];
        let values = [3.0, 4.0];
        let bindings = RowBindings::new(&names, &values);

        assert_eq!(bindings.value_of("y"), Some(4.0));
        assert_eq!(bindings.value_of("z"), None);
    }

    #[test]
    fn test_load_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"variables": ["x"], "samples": [{{"inputs": [1.0], "output": 2.0}}]}}"#
        )
        .unwrap();

        let dataset = Dataset::load(file.path()).unwrap();
        assert_eq!(dataset.variables, vec!["x".to_string()]);
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_load_reports_path() {
        let err = Dataset::load(Path::new("/nonexistent/data.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/data.json"));
    }
}
