//! Pre-sized trip-record store.

use depr_core::{OverflowPolicy, TripRecord, TripTable};

use crate::{SimError, SimResult, Trajectory};

/// Contiguous trip store reserved up front and trimmed at the end.
///
/// The population driver sizes it from the individual count, so a normal
/// run never reallocates.  Running out of room either aborts the run
/// ([`OverflowPolicy::Fail`]) or reallocates ([`OverflowPolicy::Grow`]).
pub struct TripArena {
    records:  Vec<TripRecord>,
    capacity: usize,
    policy:   OverflowPolicy,
}

impl TripArena {
    pub fn with_capacity(capacity: usize, policy: OverflowPolicy) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            capacity,
            policy,
        }
    }

    /// Append every visit of `trajectory` as a record.
    ///
    /// # Errors
    /// [`SimError::CapacityExceeded`] under `OverflowPolicy::Fail` when the
    /// visits do not fit.  Nothing is appended in that case.
    pub fn push_trajectory(&mut self, trajectory: &Trajectory) -> SimResult<()> {
        let required = self.records.len() + trajectory.len();
        if required > self.capacity {
            match self.policy {
                OverflowPolicy::Fail => {
                    return Err(SimError::CapacityExceeded {
                        capacity: self.capacity,
                        required,
                    });
                }
                OverflowPolicy::Grow => {
                    let grown = required.max(self.capacity.saturating_mul(2));
                    log::warn!("trip arena full at {} records; growing to {grown}", self.capacity);
                    self.records.reserve(grown - self.records.len());
                    self.capacity = grown;
                }
            }
        }
        let uid = trajectory.uid();
        self.records
            .extend(trajectory.visits().iter().map(|&v| TripRecord::new(uid, v)));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Current logical capacity (the reservation, not `Vec::capacity`).
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Trim to the records actually written and hand them over.
    pub fn finish(mut self) -> TripTable {
        self.records.shrink_to_fit();
        TripTable::from_records(self.records)
    }
}
