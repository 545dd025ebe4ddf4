use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::loss::MseLoss;
use crate::network::Network;
use crate::train::train_config::TrainConfig;

/// One input/target pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
}

impl Sample {
    pub fn new(input: Vec<f64>, target: Vec<f64>) -> Sample {
        Sample { input, target }
    }
}

/// Result of a [`train_cyclic`] run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    pub epochs: usize,
    /// Mean MSE over all samples after the last step.
    pub final_loss: f64,
}

/// Trains on one sample per epoch, cycling through `samples` in order.
pub fn train_cyclic(network: &mut Network, samples: &[Sample], config: &TrainConfig) -> Result<TrainReport> {
    if samples.is_empty() {
        return Err(Error::config("training needs at least one sample"));
    }
    config.validate()?;

    for epoch in 0..config.epochs {
        let sample = &samples[epoch % samples.len()];
        network.train(&sample.input, &sample.target)?;

        if config.log_every > 0 && (epoch + 1) % config.log_every == 0 {
            let loss = MseLoss::over_samples(network, samples)?;
            info!(epoch = epoch + 1, loss, "training progress");
        }
    }

    let final_loss = MseLoss::over_samples(network, samples)?;
    info!(epochs = config.epochs, final_loss, "training finished");
    Ok(TrainReport {
        epochs: config.epochs,
        final_loss,
    })
}

/// Network output for one sample, compared against its target.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    pub input: Vec<f64>,
    pub target: Vec<f64>,
    pub output: Vec<f64>,
    pub correct: bool,
}

impl fmt::Display for SampleResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let output: Vec<String> = self.output.iter().map(|o| format!("{o:.3}")).collect();
        write!(
            f,
            "Input: {:?}\tOutput: [{}]\tTarget: {:?}\t{}",
            self.input,
            output.join(", "),
            self.target,
            if self.correct { "Correct" } else { "Wrong" }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub results: Vec<SampleResult>,
}

impl Evaluation {
    pub fn all_correct(&self) -> bool {
        self.results.iter().all(|r| r.correct)
    }

    pub fn correct_count(&self) -> usize {
        self.results.iter().filter(|r| r.correct).count()
    }

    /// Largest absolute output error over every sample and output.
    pub fn max_abs_error(&self) -> f64 {
        self.results
            .iter()
            .flat_map(|r| r.output.iter().zip(&r.target).map(|(o, t)| (o - t).abs()))
            .fold(0.0, f64::max)
    }
}

/// Runs every sample forward; an output counts as correct when each value is within
/// `tolerance` of its target.
pub fn evaluate(network: &Network, samples: &[Sample], tolerance: f64) -> Result<Evaluation> {
    let mut results = Vec::with_capacity(samples.len());
    for sample in samples {
        let output = network.forward(&sample.input)?;
        Error::check_len("sample target", output.len(), sample.target.len())?;
        let correct = output
            .iter()
            .zip(&sample.target)
            .all(|(o, t)| (o - t).abs() < tolerance);
        results.push(SampleResult {
            input: sample.input.clone(),
            target: sample.target.clone(),
            output,
            correct,
        });
    }
    Ok(Evaluation { results })
}
