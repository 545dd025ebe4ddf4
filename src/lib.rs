//! A from-scratch feedforward network with two ways to change its parameters:
//! per-sample gradient descent ([`Network::train`]) and gradient-free mutation
//! ([`Network::mutate`], [`Network::uniform_mutate`], [`Network::gaussian_mutate`]).
//!
//! ```rust
//! use ferrite_evo::{ActivationFunction, Network};
//!
//! # fn main() -> ferrite_evo::Result<()> {
//! let mut net = Network::new(0.5, &[2, 2, 1])?;
//! net.set_all_except_final_activation(ActivationFunction::Tanh);
//! net.set_final_layer_activation(ActivationFunction::Sigmoid);
//!
//! net.train(&[1.0, 0.0], &[1.0])?;
//! let child = net.gaussian_mutate(0.1)?;
//! assert_eq!(child.forward(&[1.0, 0.0])?.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod activation;
pub mod error;
pub mod evolve;
pub mod layers;
pub mod loss;
pub mod math;
pub mod network;
pub mod train;

// Convenience re-exports
pub use activation::{ActivationFunction, DerivativeInput};
pub use error::{Error, Result};
pub use evolve::{hill_climb, Mutation, SearchConfig};
pub use layers::{ForwardPass, InitScale, Layer};
pub use loss::MseLoss;
pub use math::Matrix;
pub use network::{residual, Network, NetworkSpec};
pub use train::{evaluate, train_cyclic, Sample, TrainConfig};
