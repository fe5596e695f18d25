//! Deterministic per-individual and run-level RNG handles.
//!
//! # Determinism strategy
//!
//! Each individual gets its own independent `SmallRng` seeded by:
//!
//!   seed = run_seed XOR (uid * MIXING_CONSTANT)
//!
//! The mixing constant is the 64-bit fractional part of the golden ratio,
//! which spreads consecutive uids uniformly across the seed space.
//! This means:
//!
//! - Trajectories never share RNG state, so they can be simulated in any
//!   order or on any thread and still come out identical.
//! - Adding individuals at the end of the population does not disturb the
//!   trajectories of existing ones.
//!
//! Both handles implement [`rand::RngCore`], so they are passed straight into
//! every sampling call (`&mut impl Rng`) instead of touching global state.

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::Uid;

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

/// SplitMix64 finaliser.  Bijective on `u64`; used for seed derivation and as
/// the hash family of the frequency sketch.
#[inline]
pub fn mix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(MIXING_CONSTANT);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

macro_rules! delegate_rng_core {
    ($name:ident) => {
        impl RngCore for $name {
            #[inline]
            fn next_u32(&mut self) -> u32 {
                self.0.next_u32()
            }

            #[inline]
            fn next_u64(&mut self) -> u64 {
                self.0.next_u64()
            }

            #[inline]
            fn fill_bytes(&mut self, dest: &mut [u8]) {
                self.0.fill_bytes(dest)
            }

            #[inline]
            fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
                self.0.try_fill_bytes(dest)
            }
        }
    };
}

// ── AgentRng ──────────────────────────────────────────────────────────────────

/// Per-individual deterministic RNG.
///
/// Created once per simulated individual from the run seed and its uid.  The
/// type is `!Sync` to prevent accidental sharing across threads.
pub struct AgentRng(SmallRng);

impl AgentRng {
    /// Seed deterministically from the run's seed and an individual's uid.
    pub fn new(run_seed: u64, uid: Uid) -> Self {
        let seed = run_seed ^ (uid.0 as u64).wrapping_mul(MIXING_CONSTANT);
        AgentRng(SmallRng::seed_from_u64(seed))
    }
}

delegate_rng_core!(AgentRng);

// ── SimRng ────────────────────────────────────────────────────────────────────

/// Run-level RNG for everything that is not tied to one individual:
/// per-user sampling, noise injection, sketch hash seeds.
///
/// Used only in single-threaded or explicitly synchronised contexts.  If you
/// need parallel randomness, give each worker its own `SimRng` from
/// [`child`](Self::child).
pub struct SimRng(SmallRng);

impl SimRng {
    pub fn new(seed: u64) -> Self {
        SimRng(SmallRng::seed_from_u64(seed))
    }

    /// A fresh seed from OS entropy, for unseeded (nondeterministic) runs.
    pub fn entropy_seed() -> u64 {
        rand::thread_rng().r#gen()
    }

    /// Derive a child `SimRng` with a different seed offset — used to seed
    /// per-chunk RNGs deterministically from the root seed.
    pub fn child(&mut self, offset: u64) -> SimRng {
        let child_seed: u64 = self.0.r#gen::<u64>() ^ offset.wrapping_mul(MIXING_CONSTANT);
        SimRng(SmallRng::seed_from_u64(child_seed))
    }
}

delegate_rng_core!(SimRng);
