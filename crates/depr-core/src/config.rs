//! Run configuration.
//!
//! Typically assembled by the application from command-line flags and passed
//! to the population driver.  There are no implicit defaults for the model
//! parameters; the caller always states them.

use crate::{DeprError, DeprResult};

/// DEPR model parameters, shared by every individual in a run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeprParams {
    /// Exploration strength: P(explore) = `rho * n_visited^-gamma`.
    pub rho: f64,
    /// Exploration decay with the number of distinct visited locations.
    pub gamma: f64,
    /// Waiting-time tail exponent; the density decays as `t^-(1+beta)`.
    pub beta: f64,
    /// Waiting-time scale; the shortest possible stay is `1/tau`.
    pub tau: f64,
    /// Time horizon (hours).  Visits at or after it are discarded.
    pub duration: f64,
}

impl DeprParams {
    pub fn new(rho: f64, gamma: f64, beta: f64, tau: f64, duration: f64) -> Self {
        Self { rho, gamma, beta, tau, duration }
    }

    /// Check ranges.  Every field must be finite.
    pub fn validate(&self) -> DeprResult<()> {
        let fields = [
            ("rho", self.rho),
            ("gamma", self.gamma),
            ("beta", self.beta),
            ("tau", self.tau),
            ("duration", self.duration),
        ];
        if let Some((name, v)) = fields.iter().find(|(_, v)| !v.is_finite()) {
            return Err(DeprError::Config(format!("{name} must be finite, got {v}")));
        }
        if !(0.0..=1.0).contains(&self.rho) {
            return Err(DeprError::Config(format!("rho must be in [0, 1], got {}", self.rho)));
        }
        if self.gamma < 0.0 {
            return Err(DeprError::Config(format!("gamma must be >= 0, got {}", self.gamma)));
        }
        if self.beta <= 0.0 || self.tau <= 0.0 {
            return Err(DeprError::Config(format!(
                "beta and tau must be > 0, got beta={} tau={}",
                self.beta, self.tau
            )));
        }
        if self.duration <= 0.0 {
            return Err(DeprError::Config(format!(
                "duration must be > 0, got {}",
                self.duration
            )));
        }
        Ok(())
    }
}

/// What the trip arena does when the pre-sized capacity is not enough.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OverflowPolicy {
    /// Abort the run with `CapacityExceeded`.
    #[default]
    Fail,
    /// Reallocate and keep going.
    Grow,
}

/// Top-level configuration for one population run.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimConfig {
    pub params: DeprParams,

    /// Master RNG seed.  The same seed always produces identical trips.
    /// `None` draws a fresh seed from OS entropy.
    pub seed: Option<u64>,

    /// Trip-arena capacity per simulated individual.  Default: 10.
    pub records_per_individual: usize,

    /// Behaviour when the arena fills up.  Default: `Fail`.
    pub overflow: OverflowPolicy,

    /// Worker thread count passed to Rayon.  `None` uses all logical cores.
    /// Ignored without the `parallel` feature of `depr-sim`.
    pub num_threads: Option<usize>,
}

impl SimConfig {
    /// Records reserved per individual when the caller does not say otherwise.
    pub const DEFAULT_RECORDS_PER_INDIVIDUAL: usize = 10;

    pub fn new(params: DeprParams, seed: Option<u64>) -> Self {
        Self {
            params,
            seed,
            records_per_individual: Self::DEFAULT_RECORDS_PER_INDIVIDUAL,
            overflow: OverflowPolicy::Fail,
            num_threads: None,
        }
    }

    /// Arena capacity for `individuals` people.
    #[inline]
    pub fn capacity_for(&self, individuals: usize) -> usize {
        individuals.saturating_mul(self.records_per_individual)
    }

    pub fn validate(&self) -> DeprResult<()> {
        self.params.validate()?;
        if self.num_threads == Some(0) {
            return Err(DeprError::Config("num_threads must be > 0".into()));
        }
        Ok(())
    }
}
