//! `depr-model` — the stochastic ingredients of one DEPR step.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                          |
//! |-------------|-------------------------------------------------------------------|
//! | [`weights`] | `WeightModel`, `WeightVector`, `WeightModelBuilder`               |
//! | [`waiting`] | `WaitingTime` trait, `PowerLawWaitingTime`, `FixedWaitingTime`    |
//! | [`choice`]  | `LocationChoice` (explore vs. return), `VisitHistory`, `Move`     |
//! | [`error`]   | `ModelError`, `ModelResult<T>`                                    |
//!
//! # One step of the model
//!
//! ```text
//! wait   ~ WaitingTime::sample(rng)
//! u      ~ Uniform[0, 1)
//! if n_visited == 1 or u <= rho * n_visited^-gamma:
//!     next ~ WeightVector(current)          (preferential exploration)
//! else:
//!     next ~ visit frequencies so far       (preferential return)
//! ```
//!
//! Every sampling call takes the random source as an explicit `&mut R`
//! argument; nothing in this crate holds RNG state.

pub mod choice;
pub mod error;
pub mod waiting;
pub mod weights;

#[cfg(test)]
mod tests;

pub use choice::{LocationChoice, Move, VisitHistory};
pub use error::{ModelError, ModelResult};
pub use waiting::{FixedWaitingTime, PowerLawWaitingTime, WaitingTime};
pub use weights::{WeightModel, WeightModelBuilder, WeightVector};
