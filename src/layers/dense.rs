use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::activation::ActivationFunction;
use crate::error::{Error, Result};
use crate::math::{random, Matrix};

/// Standard deviations used when parameters are drawn at random.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitScale {
    pub weight_std: f64,
    pub bias_std: f64,
}

impl Default for InitScale {
    fn default() -> Self {
        InitScale {
            weight_std: 0.5,
            bias_std: 0.05,
        }
    }
}

/// Everything `backward` needs from the matching `forward` call.
#[derive(Debug, Clone, PartialEq)]
pub struct ForwardPass {
    pub input: Vec<f64>,
    /// Pre-activation sums `z = W·x + b`.
    pub z: Vec<f64>,
    /// Activated outputs `y = f(z)`.
    pub output: Vec<f64>,
}

/// Fully connected layer: `output_size × input_size` weights plus one bias per output.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    input_size: usize,
    output_size: usize,
    weights: Matrix,
    biases: Vec<f64>,
    pub activation: ActivationFunction,
}

impl Layer {
    /// Randomly initialized layer drawing from the process-wide random source.
    pub fn new(input_size: usize, output_size: usize, activation: ActivationFunction) -> Layer {
        random::with_rng(|rng| Layer::new_with_rng(input_size, output_size, activation, rng))
    }

    pub fn new_with_rng<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        Layer::with_init(input_size, output_size, activation, InitScale::default(), rng)
    }

    pub fn with_init<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        activation: ActivationFunction,
        init: InitScale,
        rng: &mut R,
    ) -> Layer {
        let weights = Matrix::gaussian(output_size, input_size, init.weight_std, rng);
        let biases = (0..output_size)
            .map(|_| random::gaussian(rng, 0.0, init.bias_std))
            .collect();

        Layer {
            input_size,
            output_size,
            weights,
            biases,
            activation,
        }
    }

    /// Builds a layer from explicit parameters; `weights[i]` holds the incoming weights
    /// of output neuron `i`.
    pub fn from_parameters(
        weights: Vec<Vec<f64>>,
        biases: Vec<f64>,
        activation: ActivationFunction,
    ) -> Result<Layer> {
        let weights = Matrix::from_rows(weights)?;
        if biases.len() != weights.rows {
            return Err(Error::config(format!(
                "bias vector has length {}, expected {} (one per weight row)",
                biases.len(),
                weights.rows
            )));
        }

        Ok(Layer {
            input_size: weights.cols,
            output_size: weights.rows,
            weights,
            biases,
            activation,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn weights(&self) -> &Matrix {
        &self.weights
    }

    pub fn biases(&self) -> &[f64] {
        &self.biases
    }

    pub fn forward(&self, input: &[f64]) -> Result<ForwardPass> {
        Error::check_len("layer input", self.input_size, input.len())?;

        let z: Vec<f64> = self
            .weights
            .mul_vec(input)
            .into_iter()
            .zip(&self.biases)
            .map(|(sum, b)| sum + b)
            .collect();
        let output = z.iter().map(|&x| self.activation.apply(x)).collect();

        Ok(ForwardPass {
            input: input.to_vec(),
            z,
            output,
        })
    }

    /// Per-neuron delta for `grad_output = ∂L/∂y`.
    ///
    /// The step activation has no usable derivative, so it falls back to the perceptron
    /// rule and passes the gradient through unchanged.
    pub fn delta(&self, pass: &ForwardPass, grad_output: &[f64]) -> Result<Vec<f64>> {
        self.check_pass(pass)?;
        Error::check_len("layer output gradient", self.output_size, grad_output.len())?;

        if !self.activation.is_differentiable() {
            return Ok(grad_output.to_vec());
        }

        Ok(grad_output
            .iter()
            .zip(pass.z.iter().zip(&pass.output))
            .map(|(g, (&z, &y))| g * self.activation.derivative_at(z, y))
            .collect())
    }

    /// Backpropagates `grad_output` through the layer and takes one descent step.
    ///
    /// Returns `∂L/∂x` for the preceding layer, computed from the weights as they were
    /// before this step.
    pub fn backward(
        &mut self,
        pass: &ForwardPass,
        grad_output: &[f64],
        learning_rate: f64,
    ) -> Result<Vec<f64>> {
        let delta = self.delta(pass, grad_output)?;

        let grad_input = self.weights.transpose_mul_vec(&delta);

        self.weights.sub_outer(learning_rate, &delta, &pass.input);
        for (b, d) in self.biases.iter_mut().zip(&delta) {
            *b -= learning_rate * d;
        }

        Ok(grad_input)
    }

    /// Copy of this layer with `f` applied to every weight and bias.
    pub fn mapped<F>(&self, mut f: F) -> Layer
    where
        F: FnMut(f64) -> f64,
    {
        Layer {
            input_size: self.input_size,
            output_size: self.output_size,
            weights: self.weights.map(&mut f),
            biases: self.biases.iter().map(|&b| f(b)).collect(),
            activation: self.activation,
        }
    }

    fn check_pass(&self, pass: &ForwardPass) -> Result<()> {
        Error::check_len("forward pass input", self.input_size, pass.input.len())?;
        Error::check_len("forward pass z", self.output_size, pass.z.len())?;
        Error::check_len("forward pass output", self.output_size, pass.output.len())
    }
}
