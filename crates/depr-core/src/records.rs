//! Visit and trip-record types shared by the simulator and the privacy layer.

use rustc_hash::FxHashMap;

use crate::{DeprError, DeprResult, LocationId, Uid};

/// One stay of an individual: arrival `time` (hours since the start of the
/// run) at `location`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Visit {
    pub time:     f64,
    pub location: LocationId,
}

impl Visit {
    #[inline]
    pub fn new(time: f64, location: LocationId) -> Self {
        Self { time, location }
    }
}

/// A flattened `(uid, time, location)` row.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripRecord {
    pub uid:      Uid,
    pub time:     f64,
    pub location: LocationId,
}

impl TripRecord {
    #[inline]
    pub fn new(uid: Uid, visit: Visit) -> Self {
        Self { uid, time: visit.time, location: visit.location }
    }
}

/// The trip table handed from the simulator (or a real-data loader) to the
/// privacy layer.  Immutable once produced.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TripTable {
    records: Vec<TripRecord>,
}

impl TripTable {
    pub fn from_records(records: Vec<TripRecord>) -> Self {
        Self { records }
    }

    #[inline]
    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TripRecord> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<TripRecord> {
        self.records
    }

    /// Number of distinct uids in the table.
    pub fn individual_count(&self) -> usize {
        let mut uids: Vec<Uid> = self.records.iter().map(|r| r.uid).collect();
        uids.sort_unstable();
        uids.dedup();
        uids.len()
    }

    /// Concatenate single-day tables into one multi-day table.
    ///
    /// Table `i` has `i * day_length` added to every time, so an individual
    /// that appears in several days keeps a time-ordered history.  Uids are
    /// taken as-is: the same uid on two days is the same individual.
    pub fn stack_days(days: &[TripTable], day_length: f64) -> TripTable {
        let total = days.iter().map(TripTable::len).sum();
        let mut records = Vec::with_capacity(total);
        for (i, day) in days.iter().enumerate() {
            let offset = i as f64 * day_length;
            records.extend(day.records.iter().map(|r| TripRecord {
                time: r.time + offset,
                ..*r
            }));
        }
        TripTable { records }
    }

    /// Replace every location with its entry in `clusters`, e.g. collapsing
    /// counties onto the clusters of a spatial partition.
    ///
    /// Fails on the first location with no entry; a partial relabel would
    /// mix two granularities in one table.
    pub fn relabel(&self, clusters: &FxHashMap<LocationId, LocationId>) -> DeprResult<TripTable> {
        let records = self
            .records
            .iter()
            .map(|r| match clusters.get(&r.location) {
                Some(&location) => Ok(TripRecord { location, ..*r }),
                None => Err(DeprError::InvalidInput(format!(
                    "{} of {} has no cluster",
                    r.location, r.uid
                ))),
            })
            .collect::<DeprResult<Vec<_>>>()?;
        Ok(TripTable { records })
    }
}

impl<'a> IntoIterator for &'a TripTable {
    type Item = &'a TripRecord;
    type IntoIter = std::slice::Iter<'a, TripRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
