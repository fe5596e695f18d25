//! Unit tests for depr-core primitives.

#[cfg(test)]
mod ids {
    use crate::{DeprError, LocationId, OdId, Uid};

    #[test]
    fn index_roundtrip() {
        let id = Uid(42);
        assert_eq!(id.index(), 42);
        assert_eq!(Uid::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn largest_index_fits() {
        let last = u32::MAX as usize;
        assert_eq!(LocationId::try_from(last).unwrap(), LocationId(u32::MAX));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn overflowing_index_is_rejected() {
        let past = u32::MAX as usize + 1;
        match OdId::try_from(past) {
            Err(DeprError::IdOverflow { kind, index }) => {
                assert_eq!(kind, "od");
                assert_eq!(index, past);
            }
            other => panic!("expected IdOverflow, got {other:?}"),
        }
        assert!(Uid::try_from(past).is_err());
    }

    #[test]
    fn display() {
        assert_eq!(Uid(7).to_string(), "uid 7");
        assert_eq!(LocationId(3).to_string(), "location 3");
    }
}

#[cfg(test)]
mod locations {
    use crate::{LocationId, Locations};

    #[test]
    fn intern_is_idempotent() {
        let mut locs = Locations::new();
        let a = locs.intern("01001").unwrap();
        let b = locs.intern("01003").unwrap();
        assert_eq!(locs.intern("01001").unwrap(), a);
        assert_eq!(a, LocationId(0));
        assert_eq!(b, LocationId(1));
        assert_eq!(locs.len(), 2);
        assert_eq!(locs.name(b), "01003");
    }

    #[test]
    fn require_unknown_fails() {
        let locs = Locations::new();
        assert!(locs.require("99999").is_err());
        assert!(locs.get("99999").is_none());
    }

    #[test]
    fn iter_in_id_order() {
        let mut locs = Locations::new();
        locs.intern("b").unwrap();
        locs.intern("a").unwrap();
        let names: Vec<&str> = locs.iter().map(|(_, n)| n).collect();
        assert_eq!(names, ["b", "a"]);
    }
}

#[cfg(test)]
mod records {
    use rustc_hash::FxHashMap;

    use crate::{LocationId, TripRecord, TripTable, Uid, Visit};

    fn rec(uid: u32, time: f64, loc: u32) -> TripRecord {
        TripRecord::new(Uid(uid), Visit::new(time, LocationId(loc)))
    }

    #[test]
    fn individual_count_dedups() {
        let t = TripTable::from_records(vec![rec(0, 0.0, 0), rec(0, 1.0, 1), rec(3, 0.0, 0)]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.individual_count(), 2);
    }

    #[test]
    fn stack_days_offsets_time() {
        let d0 = TripTable::from_records(vec![rec(0, 0.0, 0), rec(0, 5.0, 1)]);
        let d1 = TripTable::from_records(vec![rec(0, 0.0, 1), rec(1, 2.5, 0)]);
        let stacked = TripTable::stack_days(&[d0, d1], 24.0);
        let times: Vec<f64> = stacked.iter().map(|r| r.time).collect();
        assert_eq!(times, [0.0, 5.0, 24.0, 26.5]);
        assert_eq!(stacked.records()[3].uid, Uid(1));
    }

    #[test]
    fn stack_no_days_is_empty() {
        assert!(TripTable::stack_days(&[], 24.0).is_empty());
    }

    #[test]
    fn relabel_maps_every_location() {
        let t = TripTable::from_records(vec![rec(0, 0.0, 0), rec(0, 3.0, 1), rec(1, 0.0, 2)]);
        let clusters: FxHashMap<LocationId, LocationId> =
            [(LocationId(0), LocationId(7)), (LocationId(1), LocationId(7)), (LocationId(2), LocationId(8))]
                .into_iter()
                .collect();
        let relabelled = t.relabel(&clusters).unwrap();
        let locs: Vec<u32> = relabelled.iter().map(|r| r.location.0).collect();
        assert_eq!(locs, [7, 7, 8]);
        let times: Vec<f64> = relabelled.iter().map(|r| r.time).collect();
        assert_eq!(times, [0.0, 3.0, 0.0]);
    }

    #[test]
    fn relabel_rejects_unmapped_location() {
        let t = TripTable::from_records(vec![rec(0, 0.0, 0), rec(0, 3.0, 5)]);
        let clusters: FxHashMap<LocationId, LocationId> =
            std::iter::once((LocationId(0), LocationId(1))).collect();
        assert!(t.relabel(&clusters).is_err());
    }
}

#[cfg(test)]
mod config {
    use crate::{DeprParams, OverflowPolicy, SimConfig};

    fn params() -> DeprParams {
        DeprParams::new(0.6, 0.21, 0.8, 17.0, 24.0)
    }

    #[test]
    fn valid_params_pass() {
        assert!(params().validate().is_ok());
    }

    #[test]
    fn rho_out_of_range_fails() {
        let p = DeprParams { rho: 1.5, ..params() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn non_finite_fails() {
        let p = DeprParams { tau: f64::NAN, ..params() };
        assert!(p.validate().is_err());
        let p = DeprParams { duration: f64::INFINITY, ..params() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn zero_beta_fails() {
        let p = DeprParams { beta: 0.0, ..params() };
        assert!(p.validate().is_err());
    }

    #[test]
    fn sim_config_defaults() {
        let cfg = SimConfig::new(params(), Some(1));
        assert_eq!(cfg.records_per_individual, 10);
        assert_eq!(cfg.overflow, OverflowPolicy::Fail);
        assert_eq!(cfg.capacity_for(7), 70);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_threads_rejected() {
        let mut cfg = SimConfig::new(params(), None);
        cfg.num_threads = Some(0);
        assert!(cfg.validate().is_err());
    }
}

#[cfg(test)]
mod rng {
    use rand::Rng;

    use crate::{AgentRng, SimRng, Uid, mix64};

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = AgentRng::new(12345, Uid(0));
        let mut r2 = AgentRng::new(12345, Uid(0));
        for _ in 0..100 {
            let a: f64 = r1.r#gen();
            let b: f64 = r2.r#gen();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn different_individuals_differ() {
        let mut r0 = AgentRng::new(1, Uid(0));
        let mut r1 = AgentRng::new(1, Uid(1));
        let a: u64 = r0.r#gen();
        let b: u64 = r1.r#gen();
        assert_ne!(a, b, "seeds for adjacent uids should diverge");
    }

    #[test]
    fn children_are_reproducible() {
        let mut root_a = SimRng::new(9);
        let mut root_b = SimRng::new(9);
        let a: u64 = root_a.child(3).r#gen();
        let b: u64 = root_b.child(3).r#gen();
        assert_eq!(a, b);
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f64..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }

    #[test]
    fn mix64_spreads_neighbours() {
        assert_ne!(mix64(0), mix64(1));
        assert_ne!(mix64(1) % 1024, mix64(1 << 32) % 1024);
    }
}
