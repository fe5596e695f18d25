//! `depr-sim` — per-individual DEPR trajectories and the population loop.
//!
//! # Run loop
//!
//! ```text
//! for (home, count) in population:
//!   for _ in 0..count:
//!     uid  = next sequential uid
//!     rng  = AgentRng(seed, uid)
//!     traj = [(0, home)]
//!     loop:                                     (TrajectorySimulator)
//!       t    = last.time + WaitingTime::sample(rng)
//!       next = LocationChoice::next_location(rng)
//!       if t >= horizon: break                  (candidate discarded)
//!       traj.push((t, next))
//!     arena.push(traj)                          (TripArena, pre-sized)
//! return arena.finish()                         (shrink to fit)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Simulates individuals on Rayon's thread pool.          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use depr_core::{DeprParams, SimConfig};
//! use depr_model::PowerLawWaitingTime;
//! use depr_sim::{LogProgress, PopulationDriver, PopulationTable};
//!
//! let config  = SimConfig::new(DeprParams::new(0.6, 0.21, 0.8, 17.0, 24.0), Some(42));
//! let waiting = PowerLawWaitingTime::from_params(&config.params)?;
//! let driver  = PopulationDriver::new(config, &model, waiting)?;
//! let trips   = driver.run(&population, &mut LogProgress::new(10_000))?;
//! ```

pub mod arena;
pub mod error;
pub mod observer;
pub mod population;
pub mod trajectory;


pub use arena::TripArena;
pub use error::{SimError, SimResult};
pub use observer::{LogProgress, NoopObserver, SimObserver};
pub use population::{PopulationDriver, PopulationTable};
pub use trajectory::{Trajectory, TrajectorySimulator, TrajectoryState, TrajectoryWalk};
