//! Unit tests for depr-io.

use std::io::Cursor;

use depr_core::{LocationId, Locations, TripRecord, TripTable, Uid, Visit};

use crate::TableError;

fn cursor(s: &str) -> Cursor<Vec<u8>> {
    Cursor::new(s.as_bytes().to_vec())
}

#[cfg(test)]
mod read_tests {
    use depr_model::ModelError;

    use super::*;
    use crate::{
        read_clusters_reader, read_domain_reader, read_population_reader, read_trips_reader,
        read_weights_reader,
    };

    #[test]
    fn population_with_plain_headers() {
        let t = read_population_reader(cursor("location,individual_count\nA,3\nB,0\n")).unwrap();
        assert_eq!(t.entries(), &[("A".to_owned(), 3), ("B".to_owned(), 0)]);
        assert_eq!(t.total(), 3);
    }

    #[test]
    fn population_with_census_headers() {
        let csv = "GEOID,POPESTIMATE2019,STNAME\n01001,55869,Alabama\n01003,223234,Alabama\n";
        let t = read_population_reader(cursor(csv)).unwrap();
        assert_eq!(t.entries()[0], ("01001".to_owned(), 55869));
        assert_eq!(t.total(), 55869 + 223234);
    }

    #[test]
    fn negative_population_is_csv_error() {
        let err = read_population_reader(cursor("location,individual_count\nA,-1\n")).unwrap_err();
        assert!(matches!(err, TableError::Csv(_)));
    }

    #[test]
    fn weights_build_a_model() {
        let csv = "geoid_o,geoid_d,value\nA,B,3\nA,C,1\nB,A,2\n";
        let m = read_weights_reader(cursor(csv)).unwrap();
        let a = m.locations().get("A").unwrap();
        let b = m.locations().get("B").unwrap();
        let w = m.weights(a).unwrap();
        let p_b = m.destinations().iter().position(|&d| d == b).unwrap();
        assert!((w.probability(p_b) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn zero_outflow_origin_is_rejected() {
        let csv = "origin,destination,flow\nA,B,0\nB,A,1\n";
        let err = read_weights_reader(cursor(csv)).unwrap_err();
        assert!(matches!(err, TableError::Model(ModelError::ZeroOutflow { .. })), "{err:?}");
    }

    #[test]
    fn trips_intern_locations() {
        let mut locs = Locations::new();
        let csv = "uid,time,geoid\n0,0.0,A\n0,4.5,B\n1,0.0,B\n";
        let t = read_trips_reader(cursor(csv), &mut locs).unwrap();
        assert_eq!(t.len(), 3);
        assert_eq!(locs.len(), 2);
        let b = locs.get("B").unwrap();
        assert_eq!(t.records()[1], TripRecord::new(Uid(0), Visit::new(4.5, b)));
    }

    #[test]
    fn negative_time_is_parse_error() {
        let mut locs = Locations::new();
        let err = read_trips_reader(cursor("uid,time,location\n0,-1,A\n"), &mut locs).unwrap_err();
        assert!(matches!(err, TableError::Parse(_)));
    }

    #[test]
    fn domain_is_ordered_by_id() {
        let mut locs = Locations::new();
        let csv = "origin,destination,domain_id\nB,A,1\nA,B,0\n";
        let d = read_domain_reader(cursor(csv), &mut locs).unwrap();
        let (a, b) = (locs.get("A").unwrap(), locs.get("B").unwrap());
        assert_eq!(d.pair(depr_core::OdId(0)).origin, a);
        assert_eq!(d.pair(depr_core::OdId(1)).origin, b);
    }

    #[test]
    fn domain_with_gap_is_rejected() {
        let mut locs = Locations::new();
        let csv = "origin,destination,domain_id\nA,B,0\nB,A,2\n";
        assert!(matches!(read_domain_reader(cursor(csv), &mut locs), Err(TableError::Parse(_))));
    }

    #[test]
    fn domain_with_repeated_pair_is_rejected() {
        let mut locs = Locations::new();
        let csv = "origin,destination,domain_id\nA,B,0\nA,B,1\n";
        assert!(matches!(read_domain_reader(cursor(csv), &mut locs), Err(TableError::Parse(_))));
    }

    const CLUSTERS: &str = "GEOID,k,cluster,k_cluster\n\
                            01001,2,0,2_0\n\
                            01003,2,1,2_1\n\
                            01005,2,0,2_0\n\
                            01001,3,2,3_2\n";

    #[test]
    fn clusters_keep_only_the_requested_partition() {
        let mut locs = Locations::new();
        let a = locs.intern("01001").unwrap();
        let map = read_clusters_reader(cursor(CLUSTERS), 2, &mut locs).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(locs.name(map[&a]), "2_0");
        let c = locs.get("01005").unwrap();
        assert_eq!(map[&c], map[&a]);
        assert!(locs.get("3_2").is_none());
    }

    #[test]
    fn clusters_for_missing_partition_are_rejected() {
        let mut locs = Locations::new();
        let err = read_clusters_reader(cursor(CLUSTERS), 7, &mut locs).unwrap_err();
        assert!(matches!(err, TableError::Parse(_)), "{err:?}");
    }

    #[test]
    fn conflicting_cluster_assignment_is_rejected() {
        let mut locs = Locations::new();
        let csv = "GEOID,k,k_cluster\nA,2,x\nA,2,y\n";
        assert!(matches!(read_clusters_reader(cursor(csv), 2, &mut locs), Err(TableError::Parse(_))));
    }
}

#[cfg(test)]
mod write_tests {
    use depr_privacy::{AggregateCount, Mechanism, MechanismParams, OdCounts, OdDomain, OdPair};
    use tempfile::TempDir;

    use super::*;
    use crate::{read_domain, read_trips, write_counts, write_counts_writer, write_domain, write_trips};

    fn tmp() -> TempDir {
        tempfile::tempdir().expect("create temp dir")
    }

    fn locations() -> Locations {
        let mut l = Locations::new();
        l.intern("01001").unwrap();
        l.intern("01003").unwrap();
        l
    }

    fn counts() -> OdCounts {
        OdCounts::from_rows(vec![
            AggregateCount { pair: OdPair::new(LocationId(0), LocationId(1)), count: 4.0 },
            AggregateCount { pair: OdPair::new(LocationId(1), LocationId(0)), count: -0.5 },
        ])
    }

    fn to_string(counts: &OdCounts, echo: Option<&depr_privacy::ParameterEcho>) -> String {
        let mut buf = Vec::new();
        write_counts_writer(csv::Writer::from_writer(&mut buf), counts, &locations(), echo).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn trips_survive_a_file_round_trip() {
        let dir = tmp();
        let path = dir.path().join("trips.csv");
        let locs = locations();
        let table = TripTable::from_records(vec![
            TripRecord::new(Uid(0), Visit::new(0.0, LocationId(0))),
            TripRecord::new(Uid(0), Visit::new(2.25, LocationId(1))),
        ]);
        write_trips(&path, &table, &locs).unwrap();

        let mut fresh = Locations::new();
        let back = read_trips(&path, &mut fresh).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(fresh.name(back.records()[1].location), "01003");
        assert_eq!(back.records()[1].time, 2.25);
    }

    #[test]
    fn domain_survives_a_file_round_trip() {
        let dir = tmp();
        let path = dir.path().join("domain.csv");
        let locs = locations();
        let domain = OdDomain::from_pairs([
            OdPair::new(LocationId(1), LocationId(0)),
            OdPair::new(LocationId(0), LocationId(1)),
        ])
        .unwrap();
        write_domain(&path, &domain, &locs).unwrap();

        let mut fresh = Locations::new();
        let back = read_domain(&path, &mut fresh).unwrap();
        let names: Vec<(String, String)> = back
            .iter()
            .map(|(_, p)| (fresh.name(p.origin).to_owned(), fresh.name(p.destination).to_owned()))
            .collect();
        assert_eq!(names, [("01003".into(), "01001".into()), ("01001".into(), "01003".into())]);
    }

    #[test]
    fn counts_without_echo() {
        let text = to_string(&counts(), None);
        assert_eq!(text, "origin,destination,count\n01001,01003,4\n01003,01001,-0.5\n");
    }

    #[test]
    fn counts_with_echo_leave_unused_parameters_empty() {
        let params = MechanismParams { epsilon: Some(0.5), sensitivity: Some(3), ..Default::default() };
        let echo = Mechanism::from_selector("GDP", &params).unwrap().echo();
        let text = to_string(&counts(), Some(&echo));
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("origin,destination,count,construction,epsilon,sensitivity,m,k,threshold")
        );
        assert_eq!(lines.next(), Some("01001,01003,4,GDP,0.5,3,,,"));
    }

    #[test]
    fn suppression_echo_carries_threshold() {
        let params = MechanismParams { threshold: Some(10), ..Default::default() };
        let echo = Mechanism::from_selector("k_anonymous", &params).unwrap().echo();
        let text = to_string(&counts(), Some(&echo));
        assert_eq!(text.lines().nth(1), Some("01001,01003,4,k_anonymous,,,,,10"));
    }

    #[test]
    fn counts_file_is_created() {
        let dir = tmp();
        let path = dir.path().join("counts.csv");
        write_counts(&path, &counts(), &locations(), None).unwrap();
        let mut rdr = csv::Reader::from_path(&path).unwrap();
        assert_eq!(rdr.records().count(), 2);
    }
}

#[cfg(test)]
mod end_to_end_tests {
    use depr_core::{DeprParams, SimConfig};
    use depr_model::FixedWaitingTime;
    use depr_privacy::{OdDomain, OdPair, OdTrips, threshold_suppression};
    use depr_sim::{NoopObserver, PopulationDriver};

    use super::*;
    use crate::{read_clusters_reader, read_population_reader, read_trips_reader, read_weights_reader};

    #[test]
    fn two_walkers_ping_pong_to_six_od_trips() {
        let model = read_weights_reader(cursor("origin,destination,flow\nA,B,1\nB,A,1\n")).unwrap();
        let population = read_population_reader(cursor("location,individual_count\nA,2\n")).unwrap();

        let config = SimConfig::new(DeprParams::new(1.0, 0.0, 0.8, 17.0, 24.0), Some(3));
        let wait = FixedWaitingTime::new(6.0).unwrap();
        let table = PopulationDriver::new(config, &model, wait)
            .unwrap()
            .run(&population, &mut NoopObserver)
            .unwrap();
        assert_eq!(table.len(), 8);

        let trips = OdTrips::from_table(&table);
        assert_eq!(trips.len(), 6);

        let (a, b) = (model.locations().get("A").unwrap(), model.locations().get("B").unwrap());
        let domain = OdDomain::from_trips(&trips).unwrap();
        let pairs: Vec<OdPair> = domain.iter().map(|(_, p)| p).collect();
        assert_eq!(pairs, [OdPair::new(a, b), OdPair::new(b, a)]);

        let exact = threshold_suppression(&trips, &domain, 0).unwrap();
        assert_eq!(exact.get(&OdPair::new(a, b)), Some(4.0));
        assert_eq!(exact.get(&OdPair::new(b, a)), Some(2.0));
    }

    #[test]
    fn stacked_days_collapse_onto_clusters() {
        let mut locs = Locations::new();
        let day0 = read_trips_reader(cursor("uid,time,geoid\n0,0,A\n0,5,B\n"), &mut locs).unwrap();
        let day1 = read_trips_reader(cursor("uid,time,geoid\n0,0,B\n0,2,C\n"), &mut locs).unwrap();
        let lookup = "GEOID,k,k_cluster\nA,2,north\nB,2,north\nC,2,south\n";
        let clusters = read_clusters_reader(cursor(lookup), 2, &mut locs).unwrap();

        let stacked = TripTable::stack_days(&[day0, day1], 24.0).relabel(&clusters).unwrap();
        let rows: Vec<(f64, &str)> = stacked.iter().map(|r| (r.time, locs.name(r.location))).collect();
        assert_eq!(rows, [(0.0, "north"), (5.0, "north"), (24.0, "north"), (26.0, "south")]);

        let trips = OdTrips::from_table(&stacked);
        let (n, s) = (locs.get("north").unwrap(), locs.get("south").unwrap());
        let domain = OdDomain::from_trips(&trips).unwrap();
        let pairs: Vec<OdPair> = domain.iter().map(|(_, p)| p).collect();
        assert_eq!(pairs, [OdPair::new(n, n), OdPair::new(n, s)]);
    }
}
