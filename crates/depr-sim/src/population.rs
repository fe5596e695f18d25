//! The population driver: simulate every sampled individual and collect the
//! trip table.

use depr_core::{AgentRng, LocationId, SimConfig, SimRng, TripTable, Uid};
use depr_model::{LocationChoice, WaitingTime, WeightModel};

use crate::{SimError, SimObserver, SimResult, TripArena, TrajectorySimulator};

// ── PopulationTable ───────────────────────────────────────────────────────────

/// How many individuals to simulate at each home location.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PopulationTable {
    entries: Vec<(String, u32)>,
}

impl PopulationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_entries(entries: Vec<(String, u32)>) -> Self {
        Self { entries }
    }

    pub fn push(&mut self, location: impl Into<String>, count: u32) {
        self.entries.push((location.into(), count));
    }

    #[inline]
    pub fn entries(&self) -> &[(String, u32)] {
        &self.entries
    }

    /// Total individuals across all locations.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|&(_, c)| c as usize).sum()
    }

    /// Scale every count by `rate`, truncating toward zero.
    ///
    /// Used to turn census totals into a simulated sample (e.g. `rate =
    /// 0.01` for a 1 % sample).
    pub fn sampled(&self, rate: f64) -> PopulationTable {
        let entries = self
            .entries
            .iter()
            .map(|(loc, c)| (loc.clone(), (*c as f64 * rate.max(0.0)) as u32))
            .collect();
        PopulationTable { entries }
    }
}

// ── PopulationDriver ──────────────────────────────────────────────────────────

/// Number of individuals simulated per parallel batch before their trips are
/// copied into the arena.
#[cfg(feature = "parallel")]
const PARALLEL_BATCH: usize = 65_536;

/// Simulates a whole population against one weight model.
///
/// Each individual gets uid `0, 1, 2, …` in population-table order and an
/// [`AgentRng`] derived from the run seed and its uid, so the trip table for a
/// fixed seed does not depend on scheduling.
pub struct PopulationDriver<'a, W: WaitingTime> {
    config:  SimConfig,
    model:   &'a WeightModel,
    waiting: W,
    choice:  LocationChoice,
}

impl<'a, W: WaitingTime> PopulationDriver<'a, W> {
    /// Validate `config` and prepare the location-choice policy.
    pub fn new(config: SimConfig, model: &'a WeightModel, waiting: W) -> SimResult<Self> {
        config.validate()?;
        let choice = LocationChoice::from_params(&config.params)?;
        Ok(Self { config, model, waiting, choice })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Simulate everyone in `population` and return the trimmed trip table.
    ///
    /// # Errors
    /// - [`SimError::UnknownHome`] if a home code is not in the weight model.
    /// - [`SimError::CapacityExceeded`] if the trips outgrow
    ///   `records_per_individual × individuals` under `OverflowPolicy::Fail`.
    /// - [`SimError::Model`] if an individual explores from a location with no
    ///   outgoing weights.
    pub fn run<O: SimObserver>(
        &self,
        population: &PopulationTable,
        observer:   &mut O,
    ) -> SimResult<TripTable> {
        let homes = self.resolve_homes(population)?;
        let individuals = homes.len();
        let seed = self.config.seed.unwrap_or_else(SimRng::entropy_seed);

        let mut arena = TripArena::with_capacity(
            self.config.capacity_for(individuals),
            self.config.overflow,
        );
        let sim = TrajectorySimulator::new(
            self.model,
            self.choice,
            &self.waiting,
            self.config.params.duration,
        );

        observer.on_start(individuals, seed);

        #[cfg(not(feature = "parallel"))]
        {
            for (i, &home) in homes.iter().enumerate() {
                let uid = Uid::try_from(i)?;
                let mut rng = AgentRng::new(seed, uid);
                let trajectory = sim.simulate(uid, home, &mut rng)?;
                arena.push_trajectory(&trajectory)?;
                observer.on_individual_done(uid, trajectory.len());
            }
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut pool = rayon::ThreadPoolBuilder::new();
            if let Some(n) = self.config.num_threads {
                pool = pool.num_threads(n);
            }
            let pool = pool.build().map_err(|e| SimError::ThreadPool(e.to_string()))?;

            for (batch_idx, batch) in homes.chunks(PARALLEL_BATCH).enumerate() {
                let offset = batch_idx * PARALLEL_BATCH;
                // Per-individual buffers, collected in uid order.
                let trajectories = pool.install(|| {
                    batch
                        .par_iter()
                        .enumerate()
                        .map(|(i, &home)| {
                            let uid = Uid::try_from(offset + i)?;
                            let mut rng = AgentRng::new(seed, uid);
                            Ok(sim.simulate(uid, home, &mut rng)?)
                        })
                        .collect::<SimResult<Vec<_>>>()
                })?;
                for trajectory in &trajectories {
                    arena.push_trajectory(trajectory)?;
                    observer.on_individual_done(trajectory.uid(), trajectory.len());
                }
            }
        }

        let table = arena.finish();
        observer.on_finish(table.len());
        Ok(table)
    }

    /// Expand the population table into one home per individual, in uid order.
    fn resolve_homes(&self, population: &PopulationTable) -> SimResult<Vec<LocationId>> {
        let locations = self.model.locations();
        let mut homes = Vec::with_capacity(population.total());
        for (code, count) in population.entries() {
            if *count == 0 {
                continue;
            }
            let home = locations
                .get(code)
                .ok_or_else(|| SimError::UnknownHome(code.clone()))?;
            homes.extend(std::iter::repeat_n(home, *count as usize));
        }
        Ok(homes)
    }
}
