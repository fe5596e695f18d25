//! Threshold suppression.
//!
//! Exact counts are released only for pairs travelled at least `threshold`
//! times; smaller cells are dropped.  No noise is added, so this is a
//! k-anonymity style control, not differential privacy.

use log::debug;

use crate::counts::{observed_rows, tally};
use crate::{OdCounts, OdDomain, OdTrips, PrivacyResult};

pub fn threshold_suppression(
    trips:     &OdTrips,
    domain:    &OdDomain,
    threshold: u64,
) -> PrivacyResult<OdCounts> {
    let totals = tally(trips, domain)?;
    let out = observed_rows(domain, &totals, |_, n| (n >= threshold).then_some(n as f64));
    debug!(
        "suppression: kept {} of {} observed pairs at threshold {threshold}",
        out.len(),
        totals.iter().filter(|&&n| n > 0).count(),
    );
    Ok(out)
}
