//! Bounded-sum local differential privacy ("naive" LDP).
//!
//! Every individual perturbs their own contribution before it leaves them:
//! after capping at `sensitivity` trips, each `(uid, pair)` sub-count gets
//! its own Laplace draw, and the server only sums the noisy sub-counts.
//! The noise variance of a released cell therefore grows with the number
//! of contributing individuals.

use std::collections::BTreeMap;

use rand::Rng;

use depr_core::{OdId, Uid};

use crate::counts::AggregateCount;
use crate::{OdCounts, OdDomain, OdTrips, PrivacyResult, add_laplace_noise, bound_per_user};

pub fn bounded_sum_ldp<R: Rng + ?Sized>(
    trips:       &OdTrips,
    domain:      &OdDomain,
    sensitivity: u32,
    epsilon:     f64,
    rng:         &mut R,
) -> PrivacyResult<OdCounts> {
    let bounded = bound_per_user(trips, sensitivity as usize, rng);

    let mut per_user: BTreeMap<(Uid, OdId), u32> = BTreeMap::new();
    for trip in &bounded {
        *per_user.entry((trip.uid, domain.require(&trip.pair)?)).or_default() += 1;
    }

    let sens = f64::from(sensitivity);
    let mut sums: BTreeMap<OdId, f64> = BTreeMap::new();
    for ((_, id), n) in per_user {
        *sums.entry(id).or_default() += add_laplace_noise(f64::from(n), epsilon, sens, rng);
    }

    let rows = sums
        .into_iter()
        .map(|(id, count)| AggregateCount { pair: domain.pair(id), count })
        .collect();
    Ok(OdCounts::from_rows(rows))
}
