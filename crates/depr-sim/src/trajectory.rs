//! One individual's visit sequence.

use rand::Rng;

use depr_core::{LocationId, Uid, Visit};
use depr_model::{LocationChoice, ModelResult, VisitHistory, WaitingTime, WeightModel};

/// Where a [`TrajectoryWalk`] is in its life cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TrajectoryState {
    /// Still below the horizon; more visits may follow.
    Accumulating,
    /// The last candidate visit fell on or past the horizon and was dropped.
    Done,
}

/// A finished trajectory: visit times strictly increase, the first visit is
/// the home visit at time 0, and every visit is before the horizon.
#[derive(Clone, Debug, PartialEq)]
pub struct Trajectory {
    uid:    Uid,
    visits: Vec<Visit>,
}

impl Trajectory {
    #[inline]
    pub fn uid(&self) -> Uid {
        self.uid
    }

    #[inline]
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn home(&self) -> LocationId {
        self.visits[0].location
    }

    /// Number of visits, home included.  Always ≥ 1.
    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }
}

/// A trajectory under construction.
///
/// Append-only while `Accumulating`; [`finish`](Self::finish) freezes it.
#[derive(Clone, Debug)]
pub struct TrajectoryWalk {
    uid:     Uid,
    visits:  Vec<Visit>,
    history: VisitHistory,
    state:   TrajectoryState,
}

impl TrajectoryWalk {
    /// Start at `home` at time 0.
    pub fn new(uid: Uid, home: LocationId) -> Self {
        Self {
            uid,
            visits:  vec![Visit::new(0.0, home)],
            history: VisitHistory::new(home),
            state:   TrajectoryState::Accumulating,
        }
    }

    #[inline]
    pub fn state(&self) -> TrajectoryState {
        self.state
    }

    #[inline]
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    #[inline]
    pub fn history(&self) -> &VisitHistory {
        &self.history
    }

    pub fn finish(self) -> Trajectory {
        Trajectory { uid: self.uid, visits: self.visits }
    }
}

/// Run-wide DEPR stepping logic.  Holds only shared, read-only inputs, so
/// one simulator serves every individual (and every worker thread).
pub struct TrajectorySimulator<'a, W: WaitingTime> {
    model:   &'a WeightModel,
    choice:  LocationChoice,
    waiting: &'a W,
    horizon: f64,
}

impl<'a, W: WaitingTime> TrajectorySimulator<'a, W> {
    pub fn new(model: &'a WeightModel, choice: LocationChoice, waiting: &'a W, horizon: f64) -> Self {
        Self { model, choice, waiting, horizon }
    }

    #[inline]
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Advance `walk` by one candidate visit.
    ///
    /// Draw order per step: waiting time, explore/return decision, location.
    /// The location is resolved even when the candidate ends up past the
    /// horizon so that the draw stream per step is fixed.
    pub fn step<R: Rng + ?Sized>(
        &self,
        walk: &mut TrajectoryWalk,
        rng:  &mut R,
    ) -> ModelResult<TrajectoryState> {
        if walk.state == TrajectoryState::Done {
            return Ok(TrajectoryState::Done);
        }

        let wait = self.waiting.sample(rng);
        let (_, next) = self.choice.next_location(self.model, &walk.history, rng)?;

        let now = walk.visits.last().map_or(0.0, |v| v.time);
        let time = now + wait;
        debug_assert!(time > now, "waiting times must be positive");

        if time < self.horizon {
            walk.visits.push(Visit::new(time, next));
            walk.history.record(next);
        } else {
            walk.state = TrajectoryState::Done;
        }
        Ok(walk.state)
    }

    /// Simulate one individual from `home` until the horizon.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        uid:  Uid,
        home: LocationId,
        rng:  &mut R,
    ) -> ModelResult<Trajectory> {
        let mut walk = TrajectoryWalk::new(uid, home);
        while self.step(&mut walk, rng)? == TrajectoryState::Accumulating {}
        Ok(walk.finish())
    }
}
