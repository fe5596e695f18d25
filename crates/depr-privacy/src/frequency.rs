//! Sketch-based OD frequency estimation.

use log::debug;
use rand::Rng;

use depr_core::SimRng;

use crate::counts::AggregateCount;
use crate::{OdCounts, OdDomain, OdTrips, PrivacyResult, SketchParams, SketchServer, bound_per_user};

/// Reports privatised per chunk.  Each chunk has its own child RNG and its
/// own sketch, so the result does not depend on how chunks are scheduled.
const REPORT_CHUNK: usize = 4096;

/// Estimate the number of trips for every pair in `domain`.
///
/// Each uid is first capped at `params.sensitivity` trips.  Every surviving
/// trip becomes one privatised report of its domain id.  The output has one
/// row per domain id, in id order, including ids that received no report.
pub fn sketch_frequencies<R: Rng + ?Sized>(
    trips:  &OdTrips,
    domain: &OdDomain,
    params: &SketchParams,
    rng:    &mut R,
) -> PrivacyResult<OdCounts> {
    let bounded = bound_per_user(trips, params.sensitivity as usize, rng);
    let values = bounded
        .iter()
        .map(|t| domain.require(&t.pair).map(|id| u64::from(id.0)))
        .collect::<PrivacyResult<Vec<u64>>>()?;

    let mut server = SketchServer::new(params.epsilon, params.k, params.m, rng)?;
    let mut root = SimRng::new(rng.r#gen());
    let chunks: Vec<(&[u64], SimRng)> = values
        .chunks(REPORT_CHUNK)
        .enumerate()
        .map(|(i, chunk)| (chunk, root.child(i as u64)))
        .collect();

    for partial in privatise_chunks(&server, chunks)? {
        server.merge(&partial)?;
    }
    debug!(
        "sketch: {} reports into {}x{} sketch over {} pairs",
        server.reports(),
        params.k,
        params.m,
        domain.len(),
    );

    let rows = domain
        .iter()
        .map(|(id, pair)| AggregateCount { pair, count: server.estimate(u64::from(id.0)) })
        .collect();
    let counts = OdCounts::from_rows(rows);
    Ok(if params.clip_at_zero { counts.clipped_at_zero() } else { counts })
}

fn privatise_chunk(server: &SketchServer, values: &[u64], mut rng: SimRng) -> PrivacyResult<SketchServer> {
    let client = server.client()?;
    let mut partial = server.empty_like();
    for &value in values {
        partial.aggregate(&client.privatise(value, &mut rng));
    }
    Ok(partial)
}

#[cfg(not(feature = "parallel"))]
fn privatise_chunks(server: &SketchServer, chunks: Vec<(&[u64], SimRng)>) -> PrivacyResult<Vec<SketchServer>> {
    chunks
        .into_iter()
        .map(|(values, rng)| privatise_chunk(server, values, rng))
        .collect()
}

#[cfg(feature = "parallel")]
fn privatise_chunks(server: &SketchServer, chunks: Vec<(&[u64], SimRng)>) -> PrivacyResult<Vec<SketchServer>> {
    use rayon::prelude::*;

    chunks
        .into_par_iter()
        .map(|(values, rng)| privatise_chunk(server, values, rng))
        .collect()
}
