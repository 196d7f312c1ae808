//! Run configuration for the fracture pipeline.
//!
//! Read from a JSON file; every field except the mesh paths has a default.
//!
//! ```json
//! { "input_mesh": "in.exo", "output_mesh": "out.exo", "probability": 0.3, "seed": 7 }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshFractureError;

pub const DEFAULT_PROBABILITY: f64 = 0.5;
pub const DEFAULT_SEED: u64 = 42;

fn default_probability() -> f64 {
    DEFAULT_PROBABILITY
}

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// Settings for one fracture run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FractureConfig {
    pub input_mesh: PathBuf,
    pub output_mesh: PathBuf,
    /// Chance that an internal boundary entity is opened.
    #[serde(default = "default_probability")]
    pub probability: f64,
    /// Seed of the Bernoulli criterion.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Write the fractured cell complex (before cleanup) as GraphViz here.
    #[serde(default)]
    pub graphviz_output: Option<PathBuf>,
}

impl FractureConfig {
    pub fn new(input_mesh: impl Into<PathBuf>, output_mesh: impl Into<PathBuf>) -> Self {
        FractureConfig {
            input_mesh: input_mesh.into(),
            output_mesh: output_mesh.into(),
            probability: DEFAULT_PROBABILITY,
            seed: DEFAULT_SEED,
            graphviz_output: None,
        }
    }

    /// Reject probabilities outside `[0, 1]` (including NaN).
    pub fn validate(&self) -> Result<(), MeshFractureError> {
        if !(0.0..=1.0).contains(&self.probability) {
            return Err(MeshFractureError::InvalidProbability(self.probability));
        }
        Ok(())
    }

    /// Parse and validate a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self, MeshFractureError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, MeshFractureError> {
        let config: FractureConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_in() {
        let c = FractureConfig::from_json_str(r#"{"input_mesh":"a.exo","output_mesh":"b.exo"}"#)
            .unwrap();
        assert_eq!(c, FractureConfig::new("a.exo", "b.exo"));
        assert_eq!(c.probability, 0.5);
        assert_eq!(c.seed, 42);
    }

    #[test]
    fn bad_probability_rejected() {
        let c = r#"{"input_mesh":"a","output_mesh":"b","probability":1.5}"#;
        assert_eq!(
            FractureConfig::from_json_str(c),
            Err(MeshFractureError::InvalidProbability(1.5))
        );
        let mut cfg = FractureConfig::new("a", "b");
        cfg.probability = f64::NAN;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        assert!(matches!(
            FractureConfig::from_json_str(r#"{"input_mesh":"a"}"#),
            Err(MeshFractureError::Config(_))
        ));
        assert!(matches!(
            FractureConfig::from_json_str(r#"{"input_mesh":"a","output_mesh":"b","sed":1}"#),
            Err(MeshFractureError::Config(_))
        ));
    }
}
