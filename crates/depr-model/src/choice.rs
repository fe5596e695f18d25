//! Explore-or-return location choice.

use rand::Rng;
use rustc_hash::FxHashMap;

use depr_core::{DeprParams, LocationId};

use crate::{ModelError, ModelResult, WeightModel};

/// Which branch of the model produced a location.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Move {
    /// Drawn from the current location's weight vector.
    Explore,
    /// Drawn from the individual's own visit frequencies.
    Return,
}

// ── VisitHistory ──────────────────────────────────────────────────────────────

/// Visit counts of one individual, in first-visit order.
///
/// This is the frequency signal for preferential return: a location visited
/// three times is three times as likely to be returned to as one visited
/// once.
#[derive(Clone, Debug)]
pub struct VisitHistory {
    locations: Vec<LocationId>,
    counts:    Vec<u32>,
    slot:      FxHashMap<LocationId, usize>,
    total:     u32,
    current:   LocationId,
}

impl VisitHistory {
    /// A history holding only the home visit.
    pub fn new(home: LocationId) -> Self {
        let mut slot = FxHashMap::default();
        slot.insert(home, 0);
        Self {
            locations: vec![home],
            counts:    vec![1],
            slot,
            total:     1,
            current:   home,
        }
    }

    /// Record a visit to `location` and make it the current one.
    pub fn record(&mut self, location: LocationId) {
        match self.slot.get(&location) {
            Some(&i) => self.counts[i] += 1,
            None => {
                self.slot.insert(location, self.locations.len());
                self.locations.push(location);
                self.counts.push(1);
            }
        }
        self.total += 1;
        self.current = location;
    }

    /// Number of distinct locations visited so far.
    #[inline]
    pub fn distinct(&self) -> usize {
        self.locations.len()
    }

    /// Total number of visits so far.
    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[inline]
    pub fn current(&self) -> LocationId {
        self.current
    }

    /// Number of prior visits to `location`.
    pub fn count(&self, location: LocationId) -> u32 {
        self.slot.get(&location).map_or(0, |&i| self.counts[i])
    }

    /// Categorical draw over distinct locations, weighted by visit count.
    pub fn sample_by_frequency<R: Rng + ?Sized>(&self, rng: &mut R) -> LocationId {
        let mut target = rng.gen_range(0..self.total);
        for (loc, &c) in self.locations.iter().zip(&self.counts) {
            if target < c {
                return *loc;
            }
            target -= c;
        }
        self.current
    }
}

// ── LocationChoice ────────────────────────────────────────────────────────────

/// The exploration / preferential-return policy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LocationChoice {
    rho:   f64,
    gamma: f64,
}

impl LocationChoice {
    pub fn new(rho: f64, gamma: f64) -> ModelResult<Self> {
        if !(rho.is_finite() && (0.0..=1.0).contains(&rho)) {
            return Err(ModelError::InvalidParameter(format!("rho must be in [0, 1], got {rho}")));
        }
        if !(gamma.is_finite() && gamma >= 0.0) {
            return Err(ModelError::InvalidParameter(format!("gamma must be >= 0, got {gamma}")));
        }
        Ok(Self { rho, gamma })
    }

    pub fn from_params(params: &DeprParams) -> ModelResult<Self> {
        Self::new(params.rho, params.gamma)
    }

    /// `rho * n_visited^-gamma`.
    #[inline]
    pub fn explore_probability(&self, n_visited: usize) -> f64 {
        self.rho * (n_visited as f64).powf(-self.gamma)
    }

    /// Decide the branch for the next step.
    ///
    /// One uniform draw is always consumed, so the stream of draws does not
    /// depend on `n_visited`.  With a single distinct location there is no
    /// frequency signal to return on, and exploration is forced.
    pub fn decide<R: Rng + ?Sized>(&self, n_visited: usize, rng: &mut R) -> Move {
        let u: f64 = rng.r#gen();
        if n_visited <= 1 || u <= self.explore_probability(n_visited) {
            Move::Explore
        } else {
            Move::Return
        }
    }

    /// Resolve the next location for an individual with `history`.
    pub fn next_location<R: Rng + ?Sized>(
        &self,
        model:   &WeightModel,
        history: &VisitHistory,
        rng:     &mut R,
    ) -> ModelResult<(Move, LocationId)> {
        let mv = self.decide(history.distinct(), rng);
        let next = match mv {
            Move::Explore => model.sample_destination(history.current(), rng)?,
            Move::Return => history.sample_by_frequency(rng),
        };
        Ok((mv, next))
    }
}
