use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::evolve::Mutation;
use crate::loss::MseLoss;
use crate::network::Network;
use crate::train::Sample;

/// Settings for [`hill_climb`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub generations: usize,
    /// Mutants drawn from the current best each generation.
    pub population: usize,
    pub mutation: Mutation,
}

/// Best network found by a search, with its mean MSE over the samples.
#[derive(Debug, Clone)]
pub struct SearchResult {
    pub network: Network,
    pub loss: f64,
    /// Generations in which a mutant replaced the incumbent.
    pub improvements: usize,
}

/// Gradient-free (1 + λ) search: each generation mutates the current best
/// `population` times and keeps a mutant only if it strictly lowers the loss.
pub fn hill_climb<R: Rng + ?Sized>(
    parent: &Network,
    samples: &[Sample],
    config: &SearchConfig,
    rng: &mut R,
) -> Result<SearchResult> {
    if config.population == 0 {
        return Err(Error::config("search population must be at least 1"));
    }
    config.mutation.validate()?;

    let mut best = parent.clone();
    let mut best_loss = MseLoss::over_samples(&best, samples)?;
    let mut improvements = 0;

    for generation in 0..config.generations {
        let mut improved = false;
        for _ in 0..config.population {
            let candidate = config.mutation.apply(&best, rng)?;
            let loss = MseLoss::over_samples(&candidate, samples)?;
            if loss < best_loss {
                best = candidate;
                best_loss = loss;
                improved = true;
            }
        }
        if improved {
            improvements += 1;
            debug!(generation, loss = best_loss, "search improved");
        }
    }

    info!(generations = config.generations, loss = best_loss, improvements, "search finished");
    Ok(SearchResult {
        network: best,
        loss: best_loss,
        improvements,
    })
}
