//! Origin–destination trips and the OD domain.
//!
//! An OD trip is two time-consecutive visits of the same individual.  The
//! OD domain is the set of distinct pairs, each with a dense [`OdId`].

use rustc_hash::FxHashMap;

use depr_core::{LocationId, OdId, TripTable, Uid};

use crate::{PrivacyError, PrivacyResult};

/// An `(origin, destination)` location pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OdPair {
    pub origin:      LocationId,
    pub destination: LocationId,
}

impl OdPair {
    #[inline]
    pub fn new(origin: LocationId, destination: LocationId) -> Self {
        Self { origin, destination }
    }
}

/// One trip: `uid` left `pair.origin` at `time` for `pair.destination`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct OdTrip {
    pub uid:  Uid,
    pub time: f64,
    pub pair: OdPair,
}

// ── OdTrips ───────────────────────────────────────────────────────────────────

/// Trips sorted by `(uid, time)`.  Every uid's trips are contiguous.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OdTrips {
    trips: Vec<OdTrip>,
}

impl OdTrips {
    /// Derive trips from a trip table.
    ///
    /// Rows are ordered by `(uid, time)`; each consecutive pair of a uid's
    /// rows is one trip, and the last row of each uid (which has no
    /// successor) yields none.
    pub fn from_table(table: &TripTable) -> Self {
        let mut rows = table.records().to_vec();
        rows.sort_by(|a, b| a.uid.cmp(&b.uid).then(a.time.total_cmp(&b.time)));

        let trips = rows
            .windows(2)
            .filter(|w| w[0].uid == w[1].uid)
            .map(|w| OdTrip {
                uid:  w[0].uid,
                time: w[0].time,
                pair: OdPair::new(w[0].location, w[1].location),
            })
            .collect();
        Self { trips }
    }

    /// Wrap arbitrary trips, sorting them by `(uid, time)`.
    pub fn from_trips(mut trips: Vec<OdTrip>) -> Self {
        trips.sort_by(|a, b| a.uid.cmp(&b.uid).then(a.time.total_cmp(&b.time)));
        Self { trips }
    }

    /// Only trips leaving `origin`.
    pub fn with_origin(&self, origin: LocationId) -> Self {
        self.filtered(|t| t.pair.origin == origin)
    }

    /// Only trips departing in `[start, end)`.
    pub fn within_window(&self, start: f64, end: f64) -> Self {
        self.filtered(|t| t.time >= start && t.time < end)
    }

    fn filtered(&self, keep: impl Fn(&OdTrip) -> bool) -> Self {
        Self { trips: self.trips.iter().copied().filter(|t| keep(t)).collect() }
    }

    #[inline]
    pub fn as_slice(&self) -> &[OdTrip] {
        &self.trips
    }

    pub fn len(&self) -> usize {
        self.trips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trips.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OdTrip> {
        self.trips.iter()
    }

    /// Iterate each uid's contiguous run of trips.
    pub fn per_user(&self) -> impl Iterator<Item = &[OdTrip]> + '_ {
        self.trips.chunk_by(|a, b| a.uid == b.uid)
    }
}

// ── OdDomain ──────────────────────────────────────────────────────────────────

/// Distinct OD pairs with dense ids `0..len()`.
///
/// Ids follow first appearance in `(uid, time)` order, so the same trips
/// always produce the same domain.
#[derive(Clone, Debug, Default)]
pub struct OdDomain {
    pairs: Vec<OdPair>,
    ids:   FxHashMap<OdPair, OdId>,
}

impl OdDomain {
    pub fn from_trips(trips: &OdTrips) -> PrivacyResult<Self> {
        Self::from_pairs(trips.iter().map(|t| t.pair))
    }

    /// Build from pairs in the given order; repeats keep their first id.
    pub fn from_pairs(pairs: impl IntoIterator<Item = OdPair>) -> PrivacyResult<Self> {
        let mut domain = Self::default();
        for pair in pairs {
            domain.insert(pair)?;
        }
        Ok(domain)
    }

    fn insert(&mut self, pair: OdPair) -> PrivacyResult<OdId> {
        if let Some(&id) = self.ids.get(&pair) {
            return Ok(id);
        }
        let id = OdId::try_from(self.pairs.len())?;
        self.pairs.push(pair);
        self.ids.insert(pair, id);
        Ok(id)
    }

    #[inline]
    pub fn id(&self, pair: &OdPair) -> Option<OdId> {
        self.ids.get(pair).copied()
    }

    /// Like [`id`](Self::id) but fails with `DomainMismatch`.
    pub fn require(&self, pair: &OdPair) -> PrivacyResult<OdId> {
        self.id(pair).ok_or(PrivacyError::DomainMismatch {
            origin:      pair.origin,
            destination: pair.destination,
        })
    }

    /// The pair with `id`.
    ///
    /// # Panics
    /// Panics if `id` is out of range.
    #[inline]
    pub fn pair(&self, id: OdId) -> OdPair {
        self.pairs[id.index()]
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate `(id, pair)` in id order.
    pub fn iter(&self) -> impl Iterator<Item = (OdId, OdPair)> + '_ {
        self.pairs
            .iter()
            .enumerate()
            .map(|(i, &p)| (OdId(i as u32), p))
    }
}

impl<'a> IntoIterator for &'a OdTrips {
    type Item = &'a OdTrip;
    type IntoIter = std::slice::Iter<'a, OdTrip>;

    fn into_iter(self) -> Self::IntoIter {
        self.trips.iter()
    }
}
