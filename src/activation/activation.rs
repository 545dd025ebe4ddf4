use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Which value a derivative is evaluated at.
///
/// Some closed forms are cheapest in terms of the activated output `y` (sigmoid, tanh),
/// others need the pre-activation sum `z` (ReLU and the piecewise variants).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivativeInput {
    PreActivation,
    Output,
}

/// Element-wise activation, addressed by its kebab-case name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivationFunction {
    Linear,
    #[serde(rename = "relu")]
    ReLU,
    #[serde(rename = "leaky-relu")]
    LeakyReLU,
    Sigmoid,
    HardSigmoid,
    Tanh,
    HardTanh,
    HeavisideStep,
    SoftSign,
}

const LEAKY_SLOPE: f64 = 0.01;
const HARD_SIGMOID_EDGE: f64 = 2.5;
const HARD_SIGMOID_SLOPE: f64 = 0.2;

impl ActivationFunction {
    /// Every registered activation.
    pub const ALL: [ActivationFunction; 9] = [
        ActivationFunction::Linear,
        ActivationFunction::ReLU,
        ActivationFunction::LeakyReLU,
        ActivationFunction::Sigmoid,
        ActivationFunction::HardSigmoid,
        ActivationFunction::Tanh,
        ActivationFunction::HardTanh,
        ActivationFunction::HeavisideStep,
        ActivationFunction::SoftSign,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ActivationFunction::Linear => "linear",
            ActivationFunction::ReLU => "relu",
            ActivationFunction::LeakyReLU => "leaky-relu",
            ActivationFunction::Sigmoid => "sigmoid",
            ActivationFunction::HardSigmoid => "hard-sigmoid",
            ActivationFunction::Tanh => "tanh",
            ActivationFunction::HardTanh => "hard-tanh",
            ActivationFunction::HeavisideStep => "heaviside-step",
            ActivationFunction::SoftSign => "soft-sign",
        }
    }

    pub fn apply(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Linear => x,
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::LeakyReLU => if x >= 0.0 { x } else { LEAKY_SLOPE * x },
            ActivationFunction::Sigmoid => sigmoid(x),
            ActivationFunction::HardSigmoid => {
                if x < -HARD_SIGMOID_EDGE {
                    0.0
                } else if x > HARD_SIGMOID_EDGE {
                    1.0
                } else {
                    HARD_SIGMOID_SLOPE * x + 0.5
                }
            }
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::HardTanh => x.clamp(-1.0, 1.0),
            ActivationFunction::HeavisideStep => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::SoftSign => x / (1.0 + x.abs()),
        }
    }

    /// The argument [`derive`](Self::derive) expects.
    pub fn derivative_input(&self) -> DerivativeInput {
        match self {
            ActivationFunction::Sigmoid | ActivationFunction::Tanh => DerivativeInput::Output,
            _ => DerivativeInput::PreActivation,
        }
    }

    /// Derivative of the activation.
    ///
    /// `arg` is the activated output `y` for sigmoid and tanh, and the pre-activation
    /// sum `z` for everything else. Use [`derivative_at`](Self::derivative_at) when both
    /// values are at hand.
    pub fn derive(&self, arg: f64) -> f64 {
        match self {
            ActivationFunction::Linear => 1.0,
            ActivationFunction::ReLU => if arg > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::LeakyReLU => if arg >= 0.0 { 1.0 } else { LEAKY_SLOPE },
            ActivationFunction::Sigmoid => arg * (1.0 - arg),
            ActivationFunction::HardSigmoid => {
                if (-HARD_SIGMOID_EDGE..=HARD_SIGMOID_EDGE).contains(&arg) {
                    HARD_SIGMOID_SLOPE
                } else {
                    0.0
                }
            }
            ActivationFunction::Tanh => 1.0 - arg * arg,
            ActivationFunction::HardTanh => if (-1.0..=1.0).contains(&arg) { 1.0 } else { 0.0 },
            ActivationFunction::HeavisideStep => 0.0,
            ActivationFunction::SoftSign => {
                if arg > 0.0 {
                    1.0 / ((1.0 + arg) * (1.0 + arg))
                } else if arg < 0.0 {
                    1.0 / ((1.0 - arg) * (1.0 - arg))
                } else {
                    1.0
                }
            }
        }
    }

    /// Derivative given both the pre-activation `z` and the output `y = apply(z)`.
    pub fn derivative_at(&self, z: f64, y: f64) -> f64 {
        match self.derivative_input() {
            DerivativeInput::PreActivation => self.derive(z),
            DerivativeInput::Output => self.derive(y),
        }
    }

    /// False for the step function, whose derivative is zero everywhere.
    pub fn is_differentiable(&self) -> bool {
        !matches!(self, ActivationFunction::HeavisideStep)
    }
}

impl Default for ActivationFunction {
    fn default() -> Self {
        ActivationFunction::Linear
    }
}

impl fmt::Display for ActivationFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ActivationFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ActivationFunction::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| Error::config(format!("unknown activation function `{s}`")))
    }
}

fn sigmoid(x: f64) -> f64 {
    // Split on sign so exp never overflows.
    if x >= 0.0 {
        1.0 / (1.0 + (-x).exp())
    } else {
        let e = x.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    /// Central finite difference of `apply` at `z`.
    fn numeric_derivative(a: ActivationFunction, z: f64) -> f64 {
        let h = 1e-6;
        (a.apply(z + h) - a.apply(z - h)) / (2.0 * h)
    }

    #[test]
    fn derivatives_match_finite_differences_away_from_kinks() {
        let points = [-3.1, -1.7, -0.4, 0.3, 0.9, 1.6, 2.8];
        for a in ActivationFunction::ALL {
            for &z in &points {
                let analytic = a.derivative_at(z, a.apply(z));
                assert_abs_diff_eq!(analytic, numeric_derivative(a, z), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn table_values() {
        use ActivationFunction::*;
        assert_eq!(ReLU.apply(-2.0), 0.0);
        assert_eq!(LeakyReLU.apply(-2.0), -0.02);
        assert_eq!(LeakyReLU.derive(0.0), 1.0);
        assert_abs_diff_eq!(Sigmoid.apply(0.0), 0.5);
        assert_eq!(HardSigmoid.apply(-3.0), 0.0);
        assert_eq!(HardSigmoid.apply(3.0), 1.0);
        assert_abs_diff_eq!(HardSigmoid.apply(1.0), 0.7, epsilon = 1e-12);
        assert_eq!(HardTanh.apply(4.0), 1.0);
        assert_eq!(HardTanh.apply(-4.0), -1.0);
        assert_eq!(HeavisideStep.apply(0.0), 0.0);
        assert_eq!(HeavisideStep.apply(1e-9), 1.0);
        assert_eq!(HeavisideStep.derive(1.0), 0.0);
        assert_eq!(SoftSign.apply(1.0), 0.5);
        assert_eq!(SoftSign.derive(0.0), 1.0);
        assert_eq!(SoftSign.derive(1.0), 0.25);
        assert_eq!(SoftSign.derive(-1.0), 0.25);

        // Kinks: the hard variants are closed at their edges, relu is open at zero.
        assert_eq!(HardSigmoid.derive(2.5), 0.2);
        assert_eq!(HardSigmoid.derive(-2.5), 0.2);
        assert_eq!(HardSigmoid.derive(2.5 + 1e-9), 0.0);
        assert_eq!(HardTanh.derive(1.0), 1.0);
        assert_eq!(HardTanh.derive(-1.0), 1.0);
        assert_eq!(HardTanh.derive(-1.0 - 1e-9), 0.0);
        assert_eq!(ReLU.derive(0.0), 0.0);
    }

    #[test]
    fn output_based_derivatives_take_the_activated_value() {
        let y = ActivationFunction::Sigmoid.apply(0.0);
        assert_abs_diff_eq!(ActivationFunction::Sigmoid.derive(y), 0.25);
        assert_abs_diff_eq!(ActivationFunction::Sigmoid.derivative_at(0.0, y), 0.25);

        let y = ActivationFunction::Tanh.apply(0.5);
        assert_abs_diff_eq!(ActivationFunction::Tanh.derivative_at(0.5, y), 1.0 - y * y);
    }

    #[test]
    fn sigmoid_saturates_without_overflow() {
        assert_eq!(ActivationFunction::Sigmoid.apply(-1000.0), 0.0);
        assert_eq!(ActivationFunction::Sigmoid.apply(1000.0), 1.0);
    }

    #[test]
    fn names_round_trip_through_from_str_and_serde() {
        for a in ActivationFunction::ALL {
            assert_eq!(a.name().parse::<ActivationFunction>().unwrap(), a);
            let json = serde_json::to_string(&a).unwrap();
            assert_eq!(json, format!("\"{}\"", a.name()));
        }
        assert!("softmax".parse::<ActivationFunction>().is_err());
    }
}
