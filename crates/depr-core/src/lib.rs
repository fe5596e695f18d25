//! `depr-core` — foundational types for the DEPR mobility simulator and the
//! OD privacy layer.
//!
//! This crate is a dependency of every other `depr-*` crate.  It has no
//! `depr-*` dependencies and few external ones (`rand`, `rustc-hash`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `Uid`, `LocationId`, `OdId`                           |
//! | [`locations`]   | `Locations` — area-code interner                      |
//! | [`records`]     | `Visit`, `TripRecord`, `TripTable`                    |
//! | [`config`]      | `DeprParams`, `SimConfig`, `OverflowPolicy`           |
//! | [`rng`]         | `AgentRng` (per-individual), `SimRng` (run-level)     |
//! | [`error`]       | `DeprError`, `DeprResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to config and record types. |

pub mod config;
pub mod error;
pub mod ids;
pub mod locations;
pub mod records;
pub mod rng;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{DeprParams, OverflowPolicy, SimConfig};
pub use error::{DeprError, DeprResult};
pub use ids::{LocationId, OdId, Uid};
pub use locations::Locations;
pub use records::{TripRecord, TripTable, Visit};
pub use rng::{AgentRng, SimRng, mix64};
