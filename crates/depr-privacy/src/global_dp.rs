//! Bounded-sum global differential privacy.
//!
//! A trusted curator sees every trip.  Each uid is capped at `sensitivity`
//! trips, the capped trips are counted per pair, and one Laplace draw with
//! scale `sensitivity / epsilon` is added to each count.

use rand::Rng;

use crate::counts::{observed_rows, tally};
use crate::{OdCounts, OdDomain, OdTrips, PrivacyResult, add_laplace_noise, bound_per_user};

pub fn bounded_sum_gdp<R: Rng + ?Sized>(
    trips:       &OdTrips,
    domain:      &OdDomain,
    sensitivity: u32,
    epsilon:     f64,
    rng:         &mut R,
) -> PrivacyResult<OdCounts> {
    let bounded = bound_per_user(trips, sensitivity as usize, rng);
    let totals = tally(&bounded, domain)?;
    let sens = f64::from(sensitivity);
    Ok(observed_rows(domain, &totals, |_, n| {
        Some(add_laplace_noise(n as f64, epsilon, sens, rng))
    }))
}
