use std::io::Write;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::layers::InitScale;
use crate::math::random;
use crate::network::network::Network;

/// A serializable description of a network architecture.
///
/// Only the shape, activations and initialization are described; trained parameters
/// are never written out.
///
/// Activations are applied in order: `hidden_activation` to every layer but the last,
/// then `final_activation`, then any per-layer entries in `layer_activations`. Layers
/// not covered stay linear.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Human-readable name, used for logging.
    #[serde(default)]
    pub name: String,
    pub learning_rate: f64,
    /// Input size, hidden sizes, output size.
    pub sizes: Vec<usize>,
    #[serde(default)]
    pub hidden_activation: Option<ActivationFunction>,
    #[serde(default)]
    pub final_activation: Option<ActivationFunction>,
    /// One entry per layer (`sizes.len() - 1`).
    #[serde(default)]
    pub layer_activations: Option<Vec<ActivationFunction>>,
    #[serde(default)]
    pub init: InitScale,
}

impl NetworkSpec {
    pub fn new(learning_rate: f64, sizes: Vec<usize>) -> Self {
        NetworkSpec {
            name: String::new(),
            learning_rate,
            sizes,
            hidden_activation: None,
            final_activation: None,
            layer_activations: None,
            init: InitScale::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(Error::config(format!(
                "learning rate must be finite and > 0, got {}",
                self.learning_rate
            )));
        }
        if self.sizes.len() < 2 {
            return Err(Error::config("need at least an input and an output size"));
        }
        if let Some(acts) = &self.layer_activations {
            let layers = self.sizes.len() - 1;
            if acts.len() != layers {
                return Err(Error::config(format!(
                    "{} layer activations given for {layers} layers",
                    acts.len()
                )));
            }
        }
        for (what, value) in [("weight_std", self.init.weight_std), ("bias_std", self.init.bias_std)] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(Error::config(format!("{what} must be finite and >= 0, got {value}")));
            }
        }
        Ok(())
    }

    /// Builds a freshly initialized network from the shared random source.
    pub fn build(&self) -> Result<Network> {
        random::with_rng(|rng| self.build_with_rng(rng))
    }

    pub fn build_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Network> {
        self.validate()?;
        let mut network = Network::with_init(self.learning_rate, &self.sizes, self.init, rng)?;

        if let Some(a) = self.hidden_activation {
            network.set_all_except_final_activation(a);
        }
        if let Some(a) = self.final_activation {
            network.set_final_layer_activation(a);
        }
        if let Some(acts) = &self.layer_activations {
            for (i, &a) in acts.iter().enumerate() {
                network.set_layer_activation(i, a)?;
            }
        }

        debug!(name = %self.name, sizes = ?self.sizes, "built network from spec");
        Ok(network)
    }

    pub fn from_json_str(json: &str) -> Result<NetworkSpec> {
        let spec: NetworkSpec = serde_json::from_str(json)?;
        spec.validate()?;
        Ok(spec)
    }

    /// Serializes the spec to a pretty-printed JSON file.
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let mut writer = std::io::BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    /// Deserializes and validates a `NetworkSpec` from a JSON file.
    pub fn load_json(path: impl AsRef<Path>) -> Result<NetworkSpec> {
        let json = std::fs::read_to_string(path)?;
        NetworkSpec::from_json_str(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const SPEC: &str = r#"{
        "name": "parity",
        "learning_rate": 0.05,
        "sizes": [4, 8, 6, 1],
        "hidden_activation": "hard-tanh",
        "final_activation": "hard-sigmoid"
    }"#;

    #[test]
    fn builds_the_described_network() {
        let spec = NetworkSpec::from_json_str(SPEC).unwrap();
        assert_eq!(spec.init, InitScale::default());

        let net = spec.build_with_rng(&mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(net.layer_count(), 3);
        assert_eq!(net.learning_rate(), 0.05);
        let acts: Vec<_> = net.layers().iter().map(|l| l.activation).collect();
        assert_eq!(
            acts,
            vec![
                ActivationFunction::HardTanh,
                ActivationFunction::HardTanh,
                ActivationFunction::HardSigmoid
            ]
        );
    }

    #[test]
    fn per_layer_activations_override_the_defaults() {
        let mut spec = NetworkSpec::new(0.1, vec![2, 2, 1]);
        spec.hidden_activation = Some(ActivationFunction::Tanh);
        spec.layer_activations = Some(vec![ActivationFunction::ReLU, ActivationFunction::Sigmoid]);
        let net = spec.build().unwrap();
        assert_eq!(net.layers()[0].activation, ActivationFunction::ReLU);
        assert_eq!(net.layers()[1].activation, ActivationFunction::Sigmoid);
    }

    #[test]
    fn invalid_specs_are_rejected() {
        let mut spec = NetworkSpec::new(0.0, vec![2, 1]);
        assert!(matches!(spec.validate(), Err(Error::Config(_))));

        spec.learning_rate = 0.1;
        spec.layer_activations = Some(vec![]);
        assert!(matches!(spec.build(), Err(Error::Config(_))));

        spec.layer_activations = None;
        spec.init.weight_std = -1.0;
        assert!(spec.validate().is_err());

        assert!(matches!(
            NetworkSpec::from_json_str(r#"{"learning_rate": 0.1, "sizes": [2, 1], "final_activation": "softmax"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn save_and_load_round_trip() {
        let spec = NetworkSpec::from_json_str(SPEC).unwrap();
        let path = std::env::temp_dir().join(format!("ferrite-evo-spec-{}.json", std::process::id()));
        spec.save_json(&path).unwrap();
        let loaded = NetworkSpec::load_json(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, spec);

        assert!(matches!(
            NetworkSpec::load_json(std::env::temp_dir().join("ferrite-evo-missing.json")),
            Err(Error::Io(_))
        ));
    }
}
