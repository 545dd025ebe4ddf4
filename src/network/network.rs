use std::fmt;

use rand::Rng;
use tracing::{debug, trace};

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::evolve::Mutation;
use crate::layers::{ForwardPass, InitScale, Layer};
use crate::math::random;

/// Default error function: the residual `target - output`.
pub fn residual(target: f64, output: f64) -> f64 {
    target - output
}

/// A linear chain of dense layers trained with per-sample gradient descent.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    learning_rate: f64,
}

impl Network {
    /// Builds one layer per adjacent pair in `sizes` (input size first, output size
    /// last), all with linear activation and random parameters from the shared source.
    pub fn new(learning_rate: f64, sizes: &[usize]) -> Result<Network> {
        random::with_rng(|rng| Network::new_with_rng(learning_rate, sizes, rng))
    }

    pub fn new_with_rng<R: Rng + ?Sized>(
        learning_rate: f64,
        sizes: &[usize],
        rng: &mut R,
    ) -> Result<Network> {
        Network::with_init(learning_rate, sizes, InitScale::default(), rng)
    }

    pub fn with_init<R: Rng + ?Sized>(
        learning_rate: f64,
        sizes: &[usize],
        init: InitScale,
        rng: &mut R,
    ) -> Result<Network> {
        if sizes.len() < 2 {
            return Err(Error::config(format!(
                "need at least an input and an output size, got {} sizes",
                sizes.len()
            )));
        }
        if let Some(i) = sizes.iter().position(|&s| s == 0) {
            return Err(Error::config(format!("layer size at position {i} is zero")));
        }

        let layers = sizes
            .windows(2)
            .map(|pair| Layer::with_init(pair[0], pair[1], ActivationFunction::Linear, init, rng))
            .collect();

        debug!(?sizes, learning_rate, "built network");
        Ok(Network { layers, learning_rate })
    }

    /// Chains existing layers, checking that adjacent sizes agree.
    pub fn from_layers(learning_rate: f64, layers: Vec<Layer>) -> Result<Network> {
        if layers.is_empty() {
            return Err(Error::config("a network needs at least one layer"));
        }
        for (i, pair) in layers.windows(2).enumerate() {
            if pair[0].output_size() != pair[1].input_size() {
                return Err(Error::config(format!(
                    "layer {i} outputs {} values but layer {} expects {}",
                    pair[0].output_size(),
                    i + 1,
                    pair[1].input_size()
                )));
            }
        }
        Ok(Network { layers, learning_rate })
    }

    /// Builds a network from explicit `(weights, biases)` per layer, all linear.
    pub fn from_parameters(
        learning_rate: f64,
        parameters: Vec<(Vec<Vec<f64>>, Vec<f64>)>,
    ) -> Result<Network> {
        let layers = parameters
            .into_iter()
            .map(|(weights, biases)| Layer::from_parameters(weights, biases, ActivationFunction::Linear))
            .collect::<Result<Vec<_>>>()?;
        Network::from_layers(learning_rate, layers)
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Result<&Layer> {
        self.layers.get(index).ok_or(Error::LayerIndex {
            index,
            count: self.layers.len(),
        })
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of neurons (outputs) of layer `index`.
    pub fn neurons_in_layer(&self, index: usize) -> Result<usize> {
        self.layer(index).map(Layer::output_size)
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].input_size()
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1].output_size()
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        Error::check_len("network input", self.input_size(), input.len())?;
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current)?.output;
        }
        Ok(current)
    }

    /// Forward pass that keeps every layer's intermediate values.
    pub fn forward_trace(&self, input: &[f64]) -> Result<Vec<ForwardPass>> {
        Error::check_len("network input", self.input_size(), input.len())?;
        let mut trace: Vec<ForwardPass> = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let pass = match trace.last() {
                Some(prev) => layer.forward(&prev.output)?,
                None => layer.forward(input)?,
            };
            trace.push(pass);
        }
        Ok(trace)
    }

    /// One training step with the default residual error. Returns the per-output error.
    pub fn train(&mut self, input: &[f64], target: &[f64]) -> Result<Vec<f64>> {
        self.train_with(input, target, residual)
    }

    /// One training step with a custom error function `error_fn(target, output)`.
    ///
    /// The error is read as a residual pointing from the output towards the target, so
    /// the gradient handed to the last layer is its negation. Layers are updated from
    /// last to first as the gradient flows back.
    pub fn train_with<F>(&mut self, input: &[f64], target: &[f64], error_fn: F) -> Result<Vec<f64>>
    where
        F: Fn(f64, f64) -> f64,
    {
        Error::check_len("network target", self.output_size(), target.len())?;
        let passes = self.forward_trace(input)?;
        let Some(last) = passes.last() else {
            return Err(Error::config("a network needs at least one layer"));
        };

        let error: Vec<f64> = target
            .iter()
            .zip(&last.output)
            .map(|(&t, &o)| error_fn(t, o))
            .collect();

        let mut gradient: Vec<f64> = error.iter().map(|e| -e).collect();
        for (layer, pass) in self.layers.iter_mut().zip(&passes).rev() {
            gradient = layer.backward(pass, &gradient, self.learning_rate)?;
        }

        trace!(?error, "training step");
        Ok(error)
    }

    pub fn set_layer_activation(&mut self, index: usize, activation: ActivationFunction) -> Result<()> {
        let count = self.layers.len();
        let layer = self
            .layers
            .get_mut(index)
            .ok_or(Error::LayerIndex { index, count })?;
        layer.activation = activation;
        Ok(())
    }

    pub fn set_all_layers_activation(&mut self, activation: ActivationFunction) {
        for layer in &mut self.layers {
            layer.activation = activation;
        }
    }

    pub fn set_final_layer_activation(&mut self, activation: ActivationFunction) {
        if let Some(layer) = self.layers.last_mut() {
            layer.activation = activation;
        }
    }

    pub fn set_all_except_final_activation(&mut self, activation: ActivationFunction) {
        let hidden = self.layers.len() - 1;
        for layer in &mut self.layers[..hidden] {
            layer.activation = activation;
        }
    }

    /// New network with `transform` applied to every weight and bias. `self` is untouched.
    pub fn mutate<F>(&self, mut transform: F) -> Network
    where
        F: FnMut(f64) -> f64,
    {
        Network {
            layers: self.layers.iter().map(|l| l.mapped(&mut transform)).collect(),
            learning_rate: self.learning_rate,
        }
    }

    /// Adds `U(-magnitude, magnitude)` noise to every parameter of a copy.
    pub fn uniform_mutate(&self, magnitude: f64) -> Result<Network> {
        Mutation::Uniform { magnitude }.apply_shared(self)
    }

    pub fn uniform_mutate_with_rng<R: Rng + ?Sized>(&self, magnitude: f64, rng: &mut R) -> Result<Network> {
        Mutation::Uniform { magnitude }.apply(self, rng)
    }

    /// Adds `N(0, std_dev)` noise to every parameter of a copy.
    pub fn gaussian_mutate(&self, std_dev: f64) -> Result<Network> {
        Mutation::Gaussian { std_dev }.apply_shared(self)
    }

    pub fn gaussian_mutate_with_rng<R: Rng + ?Sized>(&self, std_dev: f64, rng: &mut R) -> Result<Network> {
        Mutation::Gaussian { std_dev }.apply(self, rng)
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Network (learning rate {})", self.learning_rate)?;
        for (i, layer) in self.layers.iter().enumerate() {
            writeln!(
                f,
                "  layer {i}: {} -> {} ({})",
                layer.input_size(),
                layer.output_size(),
                layer.activation
            )?;
            for (row, bias) in layer.weights().data.iter().zip(layer.biases()) {
                let weights: Vec<String> = row.iter().map(|w| format!("{w:.4}")).collect();
                writeln!(f, "    [{}] + {bias:.4}", weights.join(", "))?;
            }
        }
        Ok(())
    }
}
