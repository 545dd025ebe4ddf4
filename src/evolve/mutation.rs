use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::math::random;
use crate::network::Network;

/// Stock perturbations applied independently to every weight and bias.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Mutation {
    /// `w + U(-magnitude, magnitude)`
    Uniform { magnitude: f64 },
    /// `w + N(0, std_dev)`
    Gaussian { std_dev: f64 },
}

impl Mutation {
    /// The scale must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        let (name, scale) = match *self {
            Mutation::Uniform { magnitude } => ("uniform magnitude", magnitude),
            Mutation::Gaussian { std_dev } => ("gaussian std_dev", std_dev),
        };
        if !(scale.is_finite() && scale >= 0.0) {
            return Err(Error::config(format!(
                "{name} must be finite and >= 0, got {scale}"
            )));
        }
        Ok(())
    }

    pub fn perturb<R: Rng + ?Sized>(&self, value: f64, rng: &mut R) -> f64 {
        match *self {
            Mutation::Uniform { magnitude } => value + random::uniform(rng, magnitude),
            Mutation::Gaussian { std_dev } => value + random::gaussian(rng, 0.0, std_dev),
        }
    }

    /// Mutated copy of `network`; the source is never modified.
    pub fn apply<R: Rng + ?Sized>(&self, network: &Network, rng: &mut R) -> Result<Network> {
        self.validate()?;
        debug!(mutation = ?self, layers = network.layer_count(), "mutating network");
        Ok(network.mutate(|w| self.perturb(w, rng)))
    }

    /// Like [`apply`](Self::apply), drawing from the process-wide random source.
    pub fn apply_shared(&self, network: &Network) -> Result<Network> {
        random::with_rng(|rng| self.apply(network, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::ActivationFunction;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn network() -> Network {
        let mut net = Network::new_with_rng(0.05, &[4, 8, 6, 1], &mut StdRng::seed_from_u64(5)).unwrap();
        net.set_all_layers_activation(ActivationFunction::HardTanh);
        net.set_final_layer_activation(ActivationFunction::HardSigmoid);
        net
    }

    fn parameters(net: &Network) -> Vec<f64> {
        net.layers()
            .iter()
            .flat_map(|l| {
                l.weights()
                    .data
                    .iter()
                    .flatten()
                    .copied()
                    .chain(l.biases().iter().copied())
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    fn assert_same_shape(a: &Network, b: &Network) {
        assert_eq!(a.layer_count(), b.layer_count());
        assert_eq!(a.learning_rate(), b.learning_rate());
        for (x, y) in a.layers().iter().zip(b.layers()) {
            assert_eq!(x.input_size(), y.input_size());
            assert_eq!(x.output_size(), y.output_size());
            assert_eq!(x.activation, y.activation);
        }
    }

    #[test]
    fn uniform_mutation_stays_within_magnitude() {
        let net = network();
        let mut rng = StdRng::seed_from_u64(9);
        let mutated = net.uniform_mutate_with_rng(0.1, &mut rng).unwrap();

        assert_same_shape(&net, &mutated);
        let before = parameters(&net);
        let after = parameters(&mutated);
        assert_eq!(before.len(), after.len());
        assert!(before.iter().zip(&after).all(|(b, a)| (a - b).abs() <= 0.1 + 1e-12));
        assert!(before.iter().zip(&after).any(|(b, a)| a != b));
    }

    #[test]
    fn gaussian_mutation_preserves_structure_and_source() {
        let net = network();
        let x = [0.2, -0.4, 0.6, 1.0];
        let out = net.forward(&x).unwrap();

        let mutated = net.gaussian_mutate_with_rng(0.3, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_same_shape(&net, &mutated);
        assert_ne!(parameters(&net), parameters(&mutated));
        assert_eq!(net.forward(&x).unwrap(), out);
    }

    #[test]
    fn zero_scale_is_an_exact_copy() {
        let net = network();
        assert_eq!(net.uniform_mutate(0.0).unwrap(), net);
        assert_eq!(net.gaussian_mutate(0.0).unwrap(), net);
    }

    #[test]
    fn invalid_scales_are_rejected() {
        let net = network();
        assert!(matches!(net.uniform_mutate(-0.1), Err(Error::Config(_))));
        assert!(matches!(net.gaussian_mutate(f64::NAN), Err(Error::Config(_))));
        assert!(Mutation::Uniform { magnitude: f64::INFINITY }.validate().is_err());
    }

    #[test]
    fn huge_finite_magnitude_mutates_without_overflow() {
        let net = network();
        assert!(Mutation::Uniform { magnitude: f64::MAX }.validate().is_ok());

        let mutated = net.uniform_mutate_with_rng(f64::MAX, &mut StdRng::seed_from_u64(1)).unwrap();
        assert_same_shape(&net, &mutated);
        assert!(parameters(&mutated).iter().all(|w| w.is_finite()));
    }

    #[test]
    fn strategies_deserialize_from_tagged_json() {
        let m: Mutation = serde_json::from_str(r#"{"kind":"gaussian","std_dev":0.25}"#).unwrap();
        assert_eq!(m, Mutation::Gaussian { std_dev: 0.25 });
    }
}
