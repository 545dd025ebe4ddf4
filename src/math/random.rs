//! Process-wide random source.
//!
//! Weight initialization and the stock mutators draw from one shared `StdRng` unless the
//! caller hands in its own generator. The shared generator starts from OS entropy; call
//! [`seed`] to make a run reproducible.

use std::sync::{Mutex, OnceLock, PoisonError};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

static SOURCE: OnceLock<Mutex<StdRng>> = OnceLock::new();

fn source() -> &'static Mutex<StdRng> {
    SOURCE.get_or_init(|| Mutex::new(StdRng::from_entropy()))
}

/// Re-seeds the shared generator.
pub fn seed(seed: u64) {
    with_rng(|rng| *rng = StdRng::seed_from_u64(seed));
}

/// Runs `f` with exclusive access to the shared generator.
///
/// The lock is not reentrant: `f` must use the generator it is given and never call
/// back into this module's shared functions.
pub fn with_rng<T>(f: impl FnOnce(&mut StdRng) -> T) -> T {
    // A panic inside `f` cannot leave the generator in an invalid state.
    let mut guard = source().lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut guard)
}

/// Uniform sample from `[-magnitude, magnitude]`. `magnitude` must be finite and >= 0.
///
/// Scales a unit sample, so any finite magnitude up to `f64::MAX` is accepted.
pub fn uniform<R: Rng + ?Sized>(rng: &mut R, magnitude: f64) -> f64 {
    magnitude * rng.gen_range(-1.0_f64..=1.0)
}

/// Sample from N(mean, std_dev).
pub fn gaussian<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let n: f64 = rng.sample(StandardNormal);
    mean + n * std_dev
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let x = uniform(&mut rng, 0.25);
            assert!((-0.25..=0.25).contains(&x));
        }
        assert_eq!(uniform(&mut rng, 0.0), 0.0);
    }

    #[test]
    fn uniform_accepts_the_largest_finite_magnitude() {
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..100 {
            assert!(uniform(&mut rng, f64::MAX).is_finite());
        }
    }

    #[test]
    fn gaussian_has_roughly_the_requested_moments() {
        let mut rng = StdRng::seed_from_u64(11);
        let n = 20_000;
        let samples: Vec<f64> = (0..n).map(|_| gaussian(&mut rng, 1.0, 2.0)).collect();
        let mean = samples.iter().sum::<f64>() / n as f64;
        let var = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n as f64;
        assert!((mean - 1.0).abs() < 0.1, "mean {mean}");
        assert!((var.sqrt() - 2.0).abs() < 0.1, "std {}", var.sqrt());
    }

    #[test]
    fn shared_source_is_usable() {
        let x = with_rng(|rng| uniform(rng, 1.0));
        assert!((-1.0..=1.0).contains(&x));
    }
}
