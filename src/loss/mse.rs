use crate::error::{Error, Result};
use crate::network::Network;
use crate::train::Sample;

/// Mean squared error, used to report progress. Training itself is driven by the
/// network's elementwise error function.
pub struct MseLoss;

impl MseLoss {
    /// Scalar MSE: mean((predicted - expected)²)
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        let n = predicted.len() as f64;
        predicted.iter().zip(expected.iter())
            .map(|(a, b)| (a - b).powi(2))
            .sum::<f64>() / n
    }

    /// Mean of the per-sample MSE over a dataset.
    pub fn over_samples(network: &Network, samples: &[Sample]) -> Result<f64> {
        if samples.is_empty() {
            return Err(Error::config("cannot compute a loss over zero samples"));
        }
        let mut total = 0.0;
        for sample in samples {
            let output = network.forward(&sample.input)?;
            Error::check_len("sample target", output.len(), sample.target.len())?;
            total += MseLoss::loss(&output, &sample.target);
        }
        Ok(total / samples.len() as f64)
    }
}
