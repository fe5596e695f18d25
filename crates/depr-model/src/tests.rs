//! Unit tests for depr-model.

use depr_core::{LocationId, SimRng};

use crate::{WeightModel, WeightModelBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Three locations; "b" has two outgoing flows, "c" is a sink.
fn small_model() -> WeightModel {
    let mut b = WeightModelBuilder::new();
    b.add_flow("a", "b", 3.0).unwrap();
    b.add_flow("a", "c", 1.0).unwrap();
    b.add_flow("b", "a", 2.0).unwrap();
    b.add_flow("b", "c", 2.0).unwrap();
    b.build().unwrap()
}

fn id(model: &WeightModel, code: &str) -> LocationId {
    model.locations().get(code).unwrap()
}

#[cfg(test)]
mod weights {
    use super::*;
    use crate::ModelError;

    #[test]
    fn rows_sum_to_one() {
        let m = small_model();
        for origin in m.origins() {
            let total: f64 = m.weights(origin).unwrap().entries().iter().map(|e| e.1).sum();
            assert!((total - 1.0).abs() < 1e-6, "row sum {total}");
            assert!(m.weights(origin).unwrap().entries().iter().all(|e| e.1 >= 0.0));
        }
    }

    #[test]
    fn destinations_sorted_by_code() {
        let m = small_model();
        let codes: Vec<&str> = m.destinations().iter().map(|d| m.locations().name(*d)).collect();
        assert_eq!(codes, ["a", "b", "c"]);
    }

    #[test]
    fn dense_row_aligned_with_destinations() {
        let m = small_model();
        let dense = m.weights(id(&m, "a")).unwrap().to_dense(m.destinations().len());
        // destinations are [a, b, c]; a never flows to itself.
        assert_eq!(dense.len(), 3);
        assert_eq!(dense[0], 0.0);
        assert!((dense[1] - 0.75).abs() < 1e-12);
        assert!((dense[2] - 0.25).abs() < 1e-12);
        assert_eq!(m.weights(id(&m, "a")).unwrap().probability(0), 0.0);
    }

    #[test]
    fn sink_has_no_weights() {
        let m = small_model();
        assert_eq!(m.origin_count(), 2);
        let err = m.weights(id(&m, "c")).unwrap_err();
        assert!(matches!(err, ModelError::NoWeights(ref c) if c == "c"));
    }

    #[test]
    fn zero_outflow_origin_rejected() {
        let mut b = WeightModelBuilder::new();
        b.add_flow("a", "b", 1.0).unwrap();
        b.add_flow("z", "a", 0.0).unwrap();
        assert!(matches!(b.build(), Err(ModelError::ZeroOutflow { origin }) if origin == "z"));
    }

    #[test]
    fn negative_flow_rejected() {
        let mut b = WeightModelBuilder::new();
        assert!(matches!(b.add_flow("a", "b", -1.0), Err(ModelError::InvalidFlow { .. })));
        assert!(b.add_flow("a", "b", f64::NAN).is_err());
    }

    #[test]
    fn empty_matrix_rejected() {
        assert!(matches!(WeightModelBuilder::new().build(), Err(ModelError::EmptyMatrix)));
    }

    #[test]
    fn duplicate_row_keeps_first() {
        let mut b = WeightModelBuilder::new();
        b.add_flow("a", "b", 1.0).unwrap();
        b.add_flow("a", "c", 1.0).unwrap();
        b.add_flow("a", "b", 100.0).unwrap();
        let m = b.build().unwrap();
        let row = m.weights(id(&m, "a")).unwrap();
        assert!((row.probability(0) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn sampling_follows_weights() {
        let m = small_model();
        let a = id(&m, "a");
        let b = id(&m, "b");
        let mut rng = SimRng::new(7);
        let n = 20_000;
        let hits = (0..n)
            .filter(|_| m.sample_destination(a, &mut rng).unwrap() == b)
            .count();
        let frac = hits as f64 / n as f64;
        assert!((frac - 0.75).abs() < 0.02, "got {frac}");
    }
}

#[cfg(test)]
mod waiting {
    use depr_core::DeprParams;

    use super::*;
    use crate::{FixedWaitingTime, PowerLawWaitingTime, WaitingTime};

    #[test]
    fn power_law_respects_minimum() {
        let w = PowerLawWaitingTime::new(0.8, 17.0).unwrap();
        let mut rng = SimRng::new(3);
        for _ in 0..10_000 {
            let t = w.sample(&mut rng);
            assert!(t >= w.min_wait());
            assert!(t.is_finite());
        }
        assert!((w.exponent() - 1.8).abs() < 1e-12);
    }

    #[test]
    fn power_law_median() {
        // Median of the Pareto law is xmin * 2^(1/beta).
        let w = PowerLawWaitingTime::new(2.0, 1.0).unwrap();
        let mut rng = SimRng::new(11);
        let mut draws: Vec<f64> = (0..20_001).map(|_| w.sample(&mut rng)).collect();
        draws.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let median = draws[10_000];
        assert!((median - 2f64.sqrt()).abs() < 0.05, "median {median}");
    }

    #[test]
    fn from_params_uses_beta_tau() {
        let p = DeprParams::new(0.6, 0.21, 0.8, 4.0, 24.0);
        let w = PowerLawWaitingTime::from_params(&p).unwrap();
        assert!((w.min_wait() - 0.25).abs() < 1e-12);
    }

    #[test]
    fn invalid_parameters_rejected() {
        assert!(PowerLawWaitingTime::new(0.0, 1.0).is_err());
        assert!(PowerLawWaitingTime::new(1.0, -1.0).is_err());
        assert!(FixedWaitingTime::new(0.0).is_err());
    }

    #[test]
    fn fixed_is_constant() {
        let w = FixedWaitingTime::new(6.0).unwrap();
        let mut rng = SimRng::new(0);
        assert!((0..10).all(|_| w.sample(&mut rng) == 6.0));
    }
}

#[cfg(test)]
mod choice {
    use super::*;
    use crate::{LocationChoice, Move, VisitHistory};

    #[test]
    fn single_location_always_explores() {
        // rho = 0 would never explore on its own.
        let policy = LocationChoice::new(0.0, 0.5).unwrap();
        for seed in 0..200 {
            let mut rng = SimRng::new(seed);
            assert_eq!(policy.decide(1, &mut rng), Move::Explore);
        }
    }

    #[test]
    fn rho_zero_returns_after_first_step() {
        let policy = LocationChoice::new(0.0, 0.0).unwrap();
        let mut rng = SimRng::new(1);
        assert!((0..100).all(|_| policy.decide(2, &mut rng) == Move::Return));
    }

    #[test]
    fn rho_one_gamma_zero_always_explores() {
        let policy = LocationChoice::new(1.0, 0.0).unwrap();
        let mut rng = SimRng::new(1);
        assert!((0..100).all(|_| policy.decide(5, &mut rng) == Move::Explore));
    }

    #[test]
    fn explore_probability_decays() {
        let policy = LocationChoice::new(0.6, 0.21).unwrap();
        assert!((policy.explore_probability(1) - 0.6).abs() < 1e-12);
        assert!(policy.explore_probability(10) < policy.explore_probability(2));
    }

    #[test]
    fn invalid_rho_rejected() {
        assert!(LocationChoice::new(1.1, 0.0).is_err());
        assert!(LocationChoice::new(0.5, -0.1).is_err());
    }

    #[test]
    fn history_counts_and_current() {
        let mut h = VisitHistory::new(LocationId(0));
        h.record(LocationId(1));
        h.record(LocationId(0));
        assert_eq!(h.distinct(), 2);
        assert_eq!(h.total(), 3);
        assert_eq!(h.count(LocationId(0)), 2);
        assert_eq!(h.count(LocationId(9)), 0);
        assert_eq!(h.current(), LocationId(0));
    }

    #[test]
    fn preferential_return_is_frequency_weighted() {
        let mut h = VisitHistory::new(LocationId(0));
        h.record(LocationId(1));
        h.record(LocationId(0));
        h.record(LocationId(0));
        // counts: 0 → 3, 1 → 1
        let mut rng = SimRng::new(5);
        let n = 20_000;
        let zeros = (0..n).filter(|_| h.sample_by_frequency(&mut rng) == LocationId(0)).count();
        let frac = zeros as f64 / n as f64;
        assert!((frac - 0.75).abs() < 0.02, "got {frac}");
    }

    #[test]
    fn explore_uses_current_row() {
        let m = small_model();
        let policy = LocationChoice::new(1.0, 0.0).unwrap();
        let h = VisitHistory::new(id(&m, "a"));
        let mut rng = SimRng::new(2);
        for _ in 0..100 {
            let (mv, next) = policy.next_location(&m, &h, &mut rng).unwrap();
            assert_eq!(mv, Move::Explore);
            assert!(next == id(&m, "b") || next == id(&m, "c"));
        }
    }

    #[test]
    fn explore_from_sink_fails() {
        let m = small_model();
        let policy = LocationChoice::new(1.0, 0.0).unwrap();
        let h = VisitHistory::new(id(&m, "c"));
        let mut rng = SimRng::new(2);
        assert!(policy.next_location(&m, &h, &mut rng).is_err());
    }
}
