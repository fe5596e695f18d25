//! Progress reporting for the population loop.

use depr_core::Uid;

/// Callbacks invoked by [`PopulationDriver::run`][crate::PopulationDriver::run].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.  Observers never affect the output.
pub trait SimObserver {
    /// Called once before the first individual, with the run's seed.
    fn on_start(&mut self, _individuals: usize, _seed: u64) {}

    /// Called after each individual's trips are stored, in uid order.
    fn on_individual_done(&mut self, _uid: Uid, _visits: usize) {}

    /// Called once with the final record count.
    fn on_finish(&mut self, _records: usize) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

/// Logs a progress line every `interval` individuals.
pub struct LogProgress {
    interval: usize,
    total:    usize,
    done:     usize,
}

impl LogProgress {
    pub fn new(interval: usize) -> Self {
        Self { interval: interval.max(1), total: 0, done: 0 }
    }

    /// Individuals completed so far.
    pub fn done(&self) -> usize {
        self.done
    }
}

impl SimObserver for LogProgress {
    fn on_start(&mut self, individuals: usize, seed: u64) {
        self.total = individuals;
        self.done = 0;
        log::info!("simulating {individuals} individuals (seed {seed})");
    }

    fn on_individual_done(&mut self, _uid: Uid, _visits: usize) {
        self.done += 1;
        if self.done % self.interval == 0 {
            log::info!("{}/{} individuals", self.done, self.total);
        }
    }

    fn on_finish(&mut self, records: usize) {
        log::info!("simulation done: {} individuals, {records} trip records", self.done);
    }
}
