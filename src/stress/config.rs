use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parameters of the stress harness.
///
/// Every field has a default, so a TOML file only needs to name what it changes.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StressConfig {
    /// Number of random tables generated per tree type.
    pub trials: usize,
    /// Inclusive range of the number of attributes.
    pub dimensions: [usize; 2],
    /// Half-open range of the number of rows.
    pub points: [usize; 2],
    /// Inclusive range of the leaf size.
    pub leaf_size: [usize; 2],
    /// Range of the generated attribute values.
    pub values: [f64; 2],
    /// Range of the generated row weights.
    pub weights: [f64; 2],
    /// Number of points sampled inside the root bound.
    pub bound_samples: usize,
    /// Seed of the random generator; drawn from entropy when absent.
    pub seed: Option<u64>,
    /// Directory for the persisted tables; the system temp dir when absent.
    pub workdir: Option<PathBuf>,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            trials: 10,
            dimensions: [3, 20],
            points: [130_000, 200_001],
            leaf_size: [15, 25],
            values: [0.1, 1.0],
            weights: [1.0, 5.0],
            bound_samples: 1000,
            seed: None,
            workdir: None,
        }
    }
}

impl StressConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.dimensions[0] == 0 || self.dimensions[0] > self.dimensions[1] {
            return Err(ConfigError::Invalid(format!("dimensions {:?}", self.dimensions)));
        }
        if self.points[0] >= self.points[1] {
            return Err(ConfigError::Invalid(format!("points {:?}", self.points)));
        }
        if self.leaf_size[0] == 0 || self.leaf_size[0] > self.leaf_size[1] {
            return Err(ConfigError::Invalid(format!("leaf_size {:?}", self.leaf_size)));
        }
        if !(self.values[0] < self.values[1]) {
            return Err(ConfigError::Invalid(format!("values {:?}", self.values)));
        }
        if !(self.weights[0] < self.weights[1]) {
            return Err(ConfigError::Invalid(format!("weights {:?}", self.weights)));
        }
        Ok(())
    }

    pub fn workdir(&self) -> PathBuf {
        self.workdir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join("gentree-stress"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = StressConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.trials, 10);
        assert_eq!(config.points, [130_000, 200_001]);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: StressConfig = toml::from_str("trials = 2\npoints = [100, 200]\nseed = 42\n").unwrap();
        assert_eq!(config.trials, 2);
        assert_eq!(config.points, [100, 200]);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.leaf_size, [15, 25]);
    }

    #[test]
    fn test_rejects_inverted_ranges() {
        let config = StressConfig {
            leaf_size: [10, 5],
            ..StressConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let config = StressConfig {
            points: [10, 10],
            ..StressConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
