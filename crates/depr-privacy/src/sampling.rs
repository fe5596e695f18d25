//! Bounded per-user sampling.

use rand::Rng;
use rand::seq::index;

use crate::OdTrips;

/// Keep at most `cap` trips per uid.
///
/// A uid with more than `cap` trips keeps a uniform sample of exactly `cap`
/// of them, drawn without replacement; a uid with `cap` or fewer keeps all.
/// Surviving trips stay in `(uid, time)` order.  `cap = 0` drops everything.
///
/// This bounds every individual's contribution to any count by `cap`, which
/// is the sensitivity the noise is calibrated to.
pub fn bound_per_user<R: Rng + ?Sized>(trips: &OdTrips, cap: usize, rng: &mut R) -> OdTrips {
    let mut kept = Vec::with_capacity(trips.len());
    for user in trips.per_user() {
        if user.len() <= cap {
            kept.extend_from_slice(user);
            continue;
        }
        let mut picks = index::sample(rng, user.len(), cap).into_vec();
        picks.sort_unstable();
        kept.extend(picks.into_iter().map(|i| user[i]));
    }
    OdTrips::from_trips(kept)
}
