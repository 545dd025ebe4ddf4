use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for a [`train_cyclic`](crate::train::train_cyclic) run.
///
/// # Fields
/// - `epochs`    — number of single-sample training steps; sample `epoch % len` is used
/// - `tolerance` — absolute distance from the target that still counts as correct
/// - `log_every` — emit an `info!` progress line every this many epochs; `0` disables it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub tolerance: f64,
    pub log_every: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 10_000,
            tolerance: 1e-2,
            log_every: 0,
        }
    }
}

impl TrainConfig {
    pub fn new(epochs: usize) -> Self {
        TrainConfig {
            epochs,
            ..TrainConfig::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.tolerance.is_finite() && self.tolerance >= 0.0) {
            return Err(Error::config(format!(
                "tolerance must be finite and >= 0, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    pub fn from_json_str(json: &str) -> Result<TrainConfig> {
        let config: TrainConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config from a JSON file; missing fields take their defaults.
    pub fn load_json(path: impl AsRef<Path>) -> Result<TrainConfig> {
        let json = std::fs::read_to_string(path)?;
        TrainConfig::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = TrainConfig::from_json_str(r#"{"epochs": 400}"#).unwrap();
        assert_eq!(config.epochs, 400);
        assert_eq!(config.tolerance, 1e-2);
        assert_eq!(config.log_every, 0);
    }

    #[test]
    fn negative_tolerance_is_rejected() {
        assert!(matches!(
            TrainConfig::from_json_str(r#"{"tolerance": -1.0}"#),
            Err(Error::Config(_))
        ));
        assert!(matches!(TrainConfig::from_json_str("{"), Err(Error::Json(_))));
    }
}
