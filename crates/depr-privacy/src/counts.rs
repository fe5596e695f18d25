//! OD count tables.

use depr_core::OdId;

use crate::{OdDomain, OdPair, OdTrips, PrivacyResult};

/// One row of a released table: a pair and its (possibly noisy) count.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct AggregateCount {
    pub pair:  OdPair,
    pub count: f64,
}

/// A released OD table, rows in domain-id order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OdCounts {
    rows: Vec<AggregateCount>,
}

impl OdCounts {
    pub fn from_rows(rows: Vec<AggregateCount>) -> Self {
        Self { rows }
    }

    #[inline]
    pub fn rows(&self) -> &[AggregateCount] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Count for `pair`, if the table has a row for it.
    pub fn get(&self, pair: &OdPair) -> Option<f64> {
        self.rows.iter().find(|r| r.pair == *pair).map(|r| r.count)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AggregateCount> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<AggregateCount> {
        self.rows
    }

    /// Sum of all counts.
    pub fn total(&self) -> f64 {
        self.rows.iter().map(|r| r.count).sum()
    }

    /// Negative counts replaced by zero.
    pub fn clipped_at_zero(mut self) -> Self {
        for row in &mut self.rows {
            row.count = row.count.max(0.0);
        }
        self
    }
}

impl<'a> IntoIterator for &'a OdCounts {
    type Item = &'a AggregateCount;
    type IntoIter = std::slice::Iter<'a, AggregateCount>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

/// Trips per domain id, indexed by `OdId`.
pub(crate) fn tally(trips: &OdTrips, domain: &OdDomain) -> PrivacyResult<Vec<u64>> {
    let mut totals = vec![0u64; domain.len()];
    for trip in trips {
        totals[domain.require(&trip.pair)?.index()] += 1;
    }
    Ok(totals)
}

/// Rows for every id with a nonzero tally, mapped through `f`.
pub(crate) fn observed_rows(
    domain: &OdDomain,
    totals: &[u64],
    mut f: impl FnMut(OdId, u64) -> Option<f64>,
) -> OdCounts {
    let rows = domain
        .iter()
        .filter(|(id, _)| totals[id.index()] > 0)
        .filter_map(|(id, pair)| f(id, totals[id.index()]).map(|count| AggregateCount { pair, count }))
        .collect();
    OdCounts { rows }
}

/// Exact number of trips per observed pair.  This is the non-private
/// baseline every mechanism is judged against.
pub fn od_counts(trips: &OdTrips, domain: &OdDomain) -> PrivacyResult<OdCounts> {
    let totals = tally(trips, domain)?;
    Ok(observed_rows(domain, &totals, |_, n| Some(n as f64)))
}
