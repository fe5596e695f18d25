//! `depr-privacy` — OD count tables under four disclosure-control mechanisms.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                     |
//! |-----------------|--------------------------------------------------------------|
//! | [`od`]          | `OdPair`, `OdTrip`, `OdTrips`, `OdDomain`                    |
//! | [`sampling`]    | `bound_per_user` — cap each uid's contribution               |
//! | [`laplace`]     | Laplace noise, `scale = sensitivity / epsilon`               |
//! | [`counts`]      | `OdCounts`, `AggregateCount`, exact `od_counts`              |
//! | [`suppression`] | threshold suppression (k-anonymity style)                    |
//! | [`global_dp`]   | bounded sum, aggregate then noise                            |
//! | [`local_dp`]    | bounded sum, noise per (uid, pair) then aggregate            |
//! | [`sketch`]      | count-mean sketch client / server                            |
//! | [`frequency`]   | sketch-based frequency estimation over an `OdDomain`         |
//! | [`mechanism`]   | `Mechanism` (closed enum), selector parsing, parameter echo  |
//! | [`error`]       | `PrivacyError`, `PrivacyResult<T>`                           |
//!
//! # Pipeline
//!
//! ```text
//! TripTable ──► OdTrips ──► OdDomain
//!                  │            │
//!                  └──► Mechanism::apply(trips, domain, rng) ──► OdCounts
//! ```
//!
//! No mechanism clips negative counts unless told to; that is the caller's
//! policy.

pub mod counts;
pub mod error;
pub mod frequency;
pub mod global_dp;
pub mod laplace;
pub mod local_dp;
pub mod mechanism;
pub mod od;
pub mod sampling;
pub mod sketch;
pub mod suppression;


pub use counts::{AggregateCount, OdCounts, od_counts};
pub use error::{PrivacyError, PrivacyResult};
pub use frequency::sketch_frequencies;
pub use global_dp::bounded_sum_gdp;
pub use laplace::{add_laplace_noise, laplace_noise, laplace_variance};
pub use local_dp::bounded_sum_ldp;
pub use mechanism::{Mechanism, MechanismKind, MechanismParams, ParameterEcho, SketchParams};
pub use od::{OdDomain, OdPair, OdTrip, OdTrips};
pub use sampling::bound_per_user;
pub use sketch::{HashFamily, SketchClient, SketchReport, SketchServer};
pub use suppression::threshold_suppression;
