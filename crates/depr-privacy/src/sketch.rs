//! Count-mean sketch (CMS) frequency oracle under local differential privacy.
//!
//! # Protocol
//!
//! The server fixes `k` hash functions `h_j : u64 → [0, m)`.  To report a
//! value `d`, a client picks a row `j` uniformly, builds the vector
//! `v ∈ {-1, +1}^m` with `v[h_j(d)] = +1` and `-1` elsewhere, and flips each
//! entry independently with probability `1 / (1 + e^{ε/2})`.  The report
//! `(j, v)` is ε-LDP.
//!
//! The server debiases each report with `c = (e^{ε/2} + 1) / (e^{ε/2} - 1)`
//! and accumulates `k * (c/2 * v + 1/2)` into row `j`.  After `n` reports
//! the frequency of `d` is estimated as
//!
//! ```text
//! f̂(d) = m / (m - 1) * (1/k * Σ_j S[j][h_j(d)] - n / m)
//! ```
//!
//! which is unbiased; the `n / m` term removes expected hash collisions.
//!
//! Sketches built from the same [`HashFamily`] are additive, so independent
//! workers may each fill a server and [`SketchServer::merge`] the results.

use std::sync::Arc;

use rand::Rng;
use rand::distributions::{Bernoulli, Distribution};

use depr_core::mix64;

use crate::{PrivacyError, PrivacyResult};

// ── HashFamily ────────────────────────────────────────────────────────────────

/// `k` seeded hash functions onto `[0, m)`.  Cheap to clone.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HashFamily {
    seeds: Arc<[u64]>,
    width: usize,
}

impl HashFamily {
    /// Draw `k` independent seeds from `rng`.
    pub fn new<R: Rng + ?Sized>(k: usize, width: usize, rng: &mut R) -> Self {
        let seeds: Vec<u64> = (0..k).map(|_| rng.r#gen()).collect();
        Self { seeds: seeds.into(), width }
    }

    /// Index of `value` in row `row`.
    #[inline]
    pub fn hash(&self, row: usize, value: u64) -> usize {
        (mix64(self.seeds[row] ^ mix64(value)) % self.width as u64) as usize
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.seeds.len()
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }
}

// ── Client ────────────────────────────────────────────────────────────────────

/// One privatised report.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SketchReport {
    pub row:  usize,
    /// `±1` per sketch column.
    pub bits: Vec<i8>,
}

/// Client-side randomiser.  Holds no per-report state.
#[derive(Clone, Debug)]
pub struct SketchClient {
    hashes: HashFamily,
    flip:   Bernoulli,
}

impl SketchClient {
    pub fn new(epsilon: f64, hashes: HashFamily) -> PrivacyResult<Self> {
        let p = 1.0 / (1.0 + (epsilon / 2.0).exp());
        let flip = Bernoulli::new(p)
            .map_err(|e| PrivacyError::InvalidParameter(format!("flip probability {p}: {e}")))?;
        Ok(Self { hashes, flip })
    }

    pub fn privatise<R: Rng + ?Sized>(&self, value: u64, rng: &mut R) -> SketchReport {
        let row = rng.gen_range(0..self.hashes.rows());
        let hit = self.hashes.hash(row, value);
        let bits = (0..self.hashes.width())
            .map(|i| {
                let bit: i8 = if i == hit { 1 } else { -1 };
                if self.flip.sample(rng) { -bit } else { bit }
            })
            .collect();
        SketchReport { row, bits }
    }
}

// ── Server ────────────────────────────────────────────────────────────────────

/// Server-side sketch: a dense `k × m` matrix of debiased sums.
#[derive(Clone, Debug)]
pub struct SketchServer {
    epsilon: f64,
    hashes:  HashFamily,
    /// Row-major, `k * m` cells.
    cells:   Vec<f64>,
    reports: u64,
    /// `c / 2` for the configured epsilon.
    half_c:  f64,
}

impl SketchServer {
    /// A fresh server with `k` hash functions of width `m`, seeds drawn from
    /// `rng`.
    pub fn new<R: Rng + ?Sized>(epsilon: f64, k: usize, m: usize, rng: &mut R) -> PrivacyResult<Self> {
        if !(epsilon.is_finite() && epsilon > 0.0) {
            return Err(PrivacyError::InvalidParameter(format!(
                "sketch epsilon must be positive and finite, got {epsilon}"
            )));
        }
        if k == 0 {
            return Err(PrivacyError::InvalidParameter("sketch needs k >= 1 hash functions".into()));
        }
        if m < 2 {
            return Err(PrivacyError::InvalidParameter(format!("sketch width m must be >= 2, got {m}")));
        }
        Ok(Self::with_hashes(epsilon, HashFamily::new(k, m, rng)))
    }

    fn with_hashes(epsilon: f64, hashes: HashFamily) -> Self {
        let e = (epsilon / 2.0).exp();
        let cells = vec![0.0; hashes.rows() * hashes.width()];
        Self {
            epsilon,
            hashes,
            cells,
            reports: 0,
            half_c: (e + 1.0) / (e - 1.0) / 2.0,
        }
    }

    /// A client sharing this server's hash family.
    pub fn client(&self) -> PrivacyResult<SketchClient> {
        SketchClient::new(self.epsilon, self.hashes.clone())
    }

    /// An empty server with the same hash family, for per-worker sketches.
    pub fn empty_like(&self) -> Self {
        Self::with_hashes(self.epsilon, self.hashes.clone())
    }

    pub fn hashes(&self) -> &HashFamily {
        &self.hashes
    }

    /// Number of reports aggregated so far.
    pub fn reports(&self) -> u64 {
        self.reports
    }

    pub fn aggregate(&mut self, report: &SketchReport) {
        let k = self.hashes.rows() as f64;
        let m = self.hashes.width();
        let row = &mut self.cells[report.row * m..(report.row + 1) * m];
        for (cell, &bit) in row.iter_mut().zip(&report.bits) {
            *cell += k * (self.half_c * f64::from(bit) + 0.5);
        }
        self.reports += 1;
    }

    /// Add `other`'s sketch into this one.
    pub fn merge(&mut self, other: &SketchServer) -> PrivacyResult<()> {
        if self.hashes != other.hashes || self.epsilon != other.epsilon {
            return Err(PrivacyError::InvalidParameter(
                "cannot merge sketches with different hash families or epsilon".into(),
            ));
        }
        for (a, b) in self.cells.iter_mut().zip(&other.cells) {
            *a += b;
        }
        self.reports += other.reports;
        Ok(())
    }

    /// Debiased frequency estimate of `value`.  May be negative.
    pub fn estimate(&self, value: u64) -> f64 {
        let k = self.hashes.rows();
        let m = self.hashes.width();
        let mf = m as f64;
        let sum: f64 = (0..k)
            .map(|j| self.cells[j * m + self.hashes.hash(j, value)])
            .sum();
        mf / (mf - 1.0) * (sum / k as f64 - self.reports as f64 / mf)
    }
}
