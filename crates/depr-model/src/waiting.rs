//! Inter-visit waiting times.

use rand::Rng;
use rand_distr::{Distribution, Pareto};

use depr_core::DeprParams;

use crate::{ModelError, ModelResult};

/// A source of waiting times between consecutive visits.
///
/// Implementations are stateless: each call is an independent draw from
/// `rng`, so one sampler is shared by every individual in a run.
pub trait WaitingTime: Send + Sync {
    /// Draw one strictly positive duration.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64;
}

/// Power-law waiting time: density `∝ t^-(1+beta)` for `t ≥ 1/tau`.
///
/// Sampled by inverse CDF as `(1/tau) * (1-u)^(-1/beta)`.  For `beta ≤ 1`
/// the mean is infinite, which is what produces the bursty mix of short
/// stops and long stays.
#[derive(Clone, Debug)]
pub struct PowerLawWaitingTime {
    beta: f64,
    tau:  f64,
    dist: Pareto<f64>,
}

impl PowerLawWaitingTime {
    pub fn new(beta: f64, tau: f64) -> ModelResult<Self> {
        if !(beta.is_finite() && beta > 0.0 && tau.is_finite() && tau > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "waiting time needs finite beta > 0 and tau > 0, got beta={beta} tau={tau}"
            )));
        }
        let dist = Pareto::new(1.0 / tau, beta)
            .map_err(|e| ModelError::InvalidParameter(e.to_string()))?;
        Ok(Self { beta, tau, dist })
    }

    pub fn from_params(params: &DeprParams) -> ModelResult<Self> {
        Self::new(params.beta, params.tau)
    }

    /// The density exponent, `1 + beta`.
    pub fn exponent(&self) -> f64 {
        1.0 + self.beta
    }

    /// The shortest possible waiting time, `1/tau`.
    pub fn min_wait(&self) -> f64 {
        1.0 / self.tau
    }
}

impl WaitingTime for PowerLawWaitingTime {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        self.dist.sample(rng)
    }
}

/// Constant waiting time.  Makes trajectory timing deterministic.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedWaitingTime(f64);

impl FixedWaitingTime {
    pub fn new(wait: f64) -> ModelResult<Self> {
        if !(wait.is_finite() && wait > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "fixed waiting time must be finite and > 0, got {wait}"
            )));
        }
        Ok(Self(wait))
    }
}

impl WaitingTime for FixedWaitingTime {
    #[inline]
    fn sample<R: Rng + ?Sized>(&self, _rng: &mut R) -> f64 {
        self.0
    }
}
