//! Per-origin destination probabilities ("pij weights") and their builder.
//!
//! # Data layout
//!
//! All origins share one canonical destination order: every location that
//! appears as a destination, sorted by its code.  A destination's position in
//! that order is its *destination index*.  Each origin owns a
//! [`WeightVector`] of `(destination index, probability)` pairs in ascending
//! index order, so probabilities can never drift out of alignment with the
//! destination labels.
//!
//! Pairs with zero probability are not stored; [`WeightVector::to_dense`]
//! expands a row back to the full destination set.

use rand::Rng;
use rand::distributions::{Distribution, WeightedIndex};
use rustc_hash::FxHashSet;

use depr_core::{LocationId, Locations};

use crate::{ModelError, ModelResult};

// ── WeightVector ──────────────────────────────────────────────────────────────

/// Normalised outflow distribution of one origin.
#[derive(Clone, Debug)]
pub struct WeightVector {
    entries: Vec<(u32, f64)>,
    sampler: WeightedIndex<f64>,
}

impl WeightVector {
    /// `(destination index, probability)` pairs, ascending by index.
    #[inline]
    pub fn entries(&self) -> &[(u32, f64)] {
        &self.entries
    }

    /// Probability mass on `dest_index` (0 if the origin never flows there).
    pub fn probability(&self, dest_index: usize) -> f64 {
        self.entries
            .binary_search_by_key(&(dest_index as u32), |&(i, _)| i)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    /// Expand to a dense vector of length `destination_count`.
    pub fn to_dense(&self, destination_count: usize) -> Vec<f64> {
        let mut dense = vec![0.0; destination_count];
        for &(i, p) in &self.entries {
            dense[i as usize] = p;
        }
        dense
    }

    /// Weighted categorical draw; returns a destination index.
    #[inline]
    pub fn sample_index<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        self.entries[self.sampler.sample(rng)].0
    }
}

// ── WeightModel ───────────────────────────────────────────────────────────────

/// The gravity weight matrix of one simulation run.  Built once, read-only
/// afterwards; share it by reference across workers.
///
/// Do not construct directly; use [`WeightModelBuilder`].
#[derive(Clone, Debug)]
pub struct WeightModel {
    locations:    Locations,
    /// Canonical destination order (sorted by code).
    destinations: Vec<LocationId>,
    /// Indexed by `LocationId`; `None` for locations that are never an origin.
    rows:         Vec<Option<WeightVector>>,
}

impl WeightModel {
    /// Every location seen as an origin or destination.
    #[inline]
    pub fn locations(&self) -> &Locations {
        &self.locations
    }

    /// The canonical destination order shared by all rows.
    #[inline]
    pub fn destinations(&self) -> &[LocationId] {
        &self.destinations
    }

    /// Number of locations with an outgoing row.
    pub fn origin_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_some()).count()
    }

    /// Iterate origins in id order.
    pub fn origins(&self) -> impl Iterator<Item = LocationId> + '_ {
        self.rows
            .iter()
            .enumerate()
            .filter(|(_, r)| r.is_some())
            .map(|(i, _)| LocationId(i as u32))
    }

    /// The outflow distribution of `origin`.
    ///
    /// # Errors
    /// [`ModelError::NoWeights`] if `origin` never appeared as an origin.
    pub fn weights(&self, origin: LocationId) -> ModelResult<&WeightVector> {
        self.rows
            .get(origin.index())
            .and_then(Option::as_ref)
            .ok_or_else(|| ModelError::NoWeights(self.code(origin)))
    }

    /// Draw a destination for a trip leaving `origin`.
    pub fn sample_destination<R: Rng + ?Sized>(
        &self,
        origin: LocationId,
        rng:    &mut R,
    ) -> ModelResult<LocationId> {
        let idx = self.weights(origin)?.sample_index(rng);
        Ok(self.destinations[idx as usize])
    }

    fn code(&self, id: LocationId) -> String {
        if id.index() < self.locations.len() {
            self.locations.name(id).to_owned()
        } else {
            id.to_string()
        }
    }
}

// ── WeightModelBuilder ────────────────────────────────────────────────────────

/// Incremental builder for a [`WeightModel`] from `(origin, destination,
/// flow)` rows.
///
/// Absent pairs count as zero flow.  When the same pair is added twice, the
/// first row wins and later ones are ignored with a warning.
#[derive(Default)]
pub struct WeightModelBuilder {
    locations: Locations,
    flows:     Vec<(LocationId, LocationId, f64)>,
    seen:      FxHashSet<(LocationId, LocationId)>,
    is_origin: Vec<bool>,
    is_dest:   Vec<bool>,
}

impl WeightModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one flow row.
    ///
    /// # Errors
    /// [`ModelError::InvalidFlow`] for negative or non-finite flows,
    /// [`ModelError::Core`] once the location id space is exhausted.
    pub fn add_flow(&mut self, origin: &str, destination: &str, flow: f64) -> ModelResult<()> {
        if !flow.is_finite() || flow < 0.0 {
            return Err(ModelError::InvalidFlow {
                origin:      origin.to_owned(),
                destination: destination.to_owned(),
                flow,
            });
        }

        let o = self.locations.intern(origin)?;
        let d = self.locations.intern(destination)?;
        self.is_origin.resize(self.locations.len(), false);
        self.is_dest.resize(self.locations.len(), false);
        self.is_origin[o.index()] = true;
        self.is_dest[d.index()] = true;

        if !self.seen.insert((o, d)) {
            log::warn!("duplicate flow row {origin} -> {destination}; keeping the first");
            return Ok(());
        }
        if flow > 0.0 {
            self.flows.push((o, d, flow));
        }
        Ok(())
    }

    /// Normalise every origin's row and fix the destination order.
    ///
    /// # Errors
    /// - [`ModelError::EmptyMatrix`] if no rows were added.
    /// - [`ModelError::ZeroOutflow`] if an origin's flows sum to zero.
    pub fn build(self) -> ModelResult<WeightModel> {
        if self.seen.is_empty() {
            return Err(ModelError::EmptyMatrix);
        }
        let locations = self.locations;

        // ── Canonical destination order ───────────────────────────────────
        let mut destinations: Vec<LocationId> = self
            .is_dest
            .iter()
            .enumerate()
            .filter(|&(_, &d)| d)
            .map(|(i, _)| LocationId(i as u32))
            .collect();
        destinations.sort_by(|a, b| locations.name(*a).cmp(locations.name(*b)));

        let mut dest_index = vec![u32::MAX; locations.len()];
        for (i, d) in destinations.iter().enumerate() {
            dest_index[d.index()] = i as u32;
        }

        // ── Group raw flows by origin ─────────────────────────────────────
        let mut raw: Vec<Vec<(u32, f64)>> = vec![Vec::new(); locations.len()];
        for (o, d, flow) in self.flows {
            raw[o.index()].push((dest_index[d.index()], flow));
        }

        let mut rows = Vec::with_capacity(locations.len());
        for (i, mut entries) in raw.into_iter().enumerate() {
            if !self.is_origin[i] {
                rows.push(None);
                continue;
            }
            let total: f64 = entries.iter().map(|&(_, f)| f).sum();
            if total <= 0.0 {
                return Err(ModelError::ZeroOutflow {
                    origin: locations.name(LocationId(i as u32)).to_owned(),
                });
            }
            entries.sort_unstable_by_key(|&(idx, _)| idx);
            for e in &mut entries {
                e.1 /= total;
            }
            let sampler = WeightedIndex::new(entries.iter().map(|&(_, p)| p))
                .map_err(|e| ModelError::InvalidParameter(e.to_string()))?;
            rows.push(Some(WeightVector { entries, sampler }));
        }

        log::info!(
            "weight model: {} locations, {} destinations",
            locations.len(),
            destinations.len()
        );

        Ok(WeightModel { locations, destinations, rows })
    }
}
