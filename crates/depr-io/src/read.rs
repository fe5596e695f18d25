//! CSV readers.
//!
//! Rows are deserialized with serde; column order does not matter, only the
//! header names (or their aliases) do.  Extra columns are ignored.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;
use rustc_hash::FxHashMap;
use serde::Deserialize;

use depr_core::{LocationId, Locations, TripRecord, TripTable, Uid, Visit};
use depr_model::{WeightModel, WeightModelBuilder};
use depr_privacy::{OdDomain, OdPair};
use depr_sim::PopulationTable;

use crate::{TableError, TableResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct PopulationRecord {
    #[serde(alias = "GEOID")]
    location:         String,
    #[serde(alias = "POPESTIMATE2019", alias = "pop_sample")]
    individual_count: u32,
}

#[derive(Deserialize)]
struct FlowRecord {
    #[serde(alias = "geoid_o")]
    origin:      String,
    #[serde(alias = "geoid_d")]
    destination: String,
    #[serde(alias = "value")]
    flow:        f64,
}

#[derive(Deserialize)]
struct TripRow {
    uid:      u32,
    time:     f64,
    #[serde(alias = "geoid")]
    location: String,
}

#[derive(Deserialize)]
struct DomainRecord {
    #[serde(alias = "geoid_o")]
    origin:      String,
    #[serde(alias = "geoid_d")]
    destination: String,
    #[serde(alias = "od_id")]
    domain_id:   u32,
}

#[derive(Deserialize)]
struct ClusterRecord {
    #[serde(rename = "GEOID", alias = "location")]
    location: String,
    k:        u32,
    #[serde(alias = "cluster_label")]
    k_cluster: String,
}

fn open(path: &Path) -> TableResult<File> {
    File::open(path).map_err(TableError::Io)
}

// ── Population ────────────────────────────────────────────────────────────────

/// Load a population table from a CSV file.
pub fn read_population(path: &Path) -> TableResult<PopulationTable> {
    read_population_reader(open(path)?)
}

/// Like [`read_population`] but accepts any `Read` source.
pub fn read_population_reader<R: Read>(reader: R) -> TableResult<PopulationTable> {
    let mut table = PopulationTable::new();
    for row in csv::Reader::from_reader(reader).deserialize::<PopulationRecord>() {
        let row = row?;
        table.push(row.location.trim(), row.individual_count);
    }
    info!("population: {} locations, {} individuals", table.entries().len(), table.total());
    Ok(table)
}

// ── Weight matrix ─────────────────────────────────────────────────────────────

/// Load a long-format flow matrix and build the row-normalised weight model.
pub fn read_weights(path: &Path) -> TableResult<WeightModel> {
    read_weights_reader(open(path)?)
}

/// Like [`read_weights`] but accepts any `Read` source.
pub fn read_weights_reader<R: Read>(reader: R) -> TableResult<WeightModel> {
    let mut builder = WeightModelBuilder::new();
    for row in csv::Reader::from_reader(reader).deserialize::<FlowRecord>() {
        let row = row?;
        builder.add_flow(row.origin.trim(), row.destination.trim(), row.flow)?;
    }
    let model = builder.build()?;
    info!(
        "weights: {} origins, {} destinations",
        model.origin_count(),
        model.destinations().len(),
    );
    Ok(model)
}

// ── Trips ─────────────────────────────────────────────────────────────────────

/// Load a trip table, interning location codes into `locations`.
pub fn read_trips(path: &Path, locations: &mut Locations) -> TableResult<TripTable> {
    read_trips_reader(open(path)?, locations)
}

/// Like [`read_trips`] but accepts any `Read` source.
pub fn read_trips_reader<R: Read>(reader: R, locations: &mut Locations) -> TableResult<TripTable> {
    let mut records = Vec::new();
    for row in csv::Reader::from_reader(reader).deserialize::<TripRow>() {
        let row = row?;
        if !(row.time.is_finite() && row.time >= 0.0) {
            return Err(TableError::Parse(format!(
                "uid {}: time must be finite and non-negative, got {}",
                row.uid, row.time
            )));
        }
        let location = locations.intern(row.location.trim())?;
        records.push(TripRecord::new(Uid(row.uid), Visit::new(row.time, location)));
    }
    Ok(TripTable::from_records(records))
}

// ── OD domain ─────────────────────────────────────────────────────────────────

/// Load an OD domain.  `domain_id` must run densely over `0..rows` with no
/// repeats, and no pair may appear twice.
pub fn read_domain(path: &Path, locations: &mut Locations) -> TableResult<OdDomain> {
    read_domain_reader(open(path)?, locations)
}

/// Like [`read_domain`] but accepts any `Read` source.
pub fn read_domain_reader<R: Read>(reader: R, locations: &mut Locations) -> TableResult<OdDomain> {
    let mut rows: Vec<(u32, OdPair)> = Vec::new();
    for row in csv::Reader::from_reader(reader).deserialize::<DomainRecord>() {
        let row = row?;
        let pair = OdPair::new(
            locations.intern(row.origin.trim())?,
            locations.intern(row.destination.trim())?,
        );
        rows.push((row.domain_id, pair));
    }
    rows.sort_by_key(|&(id, _)| id);

    for (expected, &(id, _)) in rows.iter().enumerate() {
        if id as usize != expected {
            return Err(TableError::Parse(format!(
                "domain ids must be 0..{} without gaps or repeats; found {id} at position {expected}",
                rows.len()
            )));
        }
    }
    let domain = OdDomain::from_pairs(rows.iter().map(|&(_, pair)| pair))?;
    if domain.len() != rows.len() {
        return Err(TableError::Parse("OD domain lists the same pair more than once".into()));
    }
    Ok(domain)
}

// ── Spatial clusters ──────────────────────────────────────────────────────────

/// Load the `location -> cluster` map of partition `k` from a lookup with
/// `GEOID, k, k_cluster` columns.  Rows of other partitions are skipped.
///
/// Cluster labels are interned into `locations` next to the codes they
/// replace, so relabelled tables are written through the same interner.
pub fn read_clusters(
    path:      &Path,
    k:         u32,
    locations: &mut Locations,
) -> TableResult<FxHashMap<LocationId, LocationId>> {
    read_clusters_reader(open(path)?, k, locations)
}

/// Like [`read_clusters`] but accepts any `Read` source.
pub fn read_clusters_reader<R: Read>(
    reader:    R,
    k:         u32,
    locations: &mut Locations,
) -> TableResult<FxHashMap<LocationId, LocationId>> {
    let mut clusters = FxHashMap::default();
    for row in csv::Reader::from_reader(reader).deserialize::<ClusterRecord>() {
        let row = row?;
        if row.k != k {
            continue;
        }
        let location = locations.intern(row.location.trim())?;
        let cluster = locations.intern(row.k_cluster.trim())?;
        match clusters.insert(location, cluster) {
            Some(previous) if previous != cluster => {
                return Err(TableError::Parse(format!(
                    "{} is assigned to both {} and {} for k = {k}",
                    row.location.trim(),
                    locations.name(previous),
                    locations.name(cluster),
                )));
            }
            _ => {}
        }
    }
    if clusters.is_empty() {
        return Err(TableError::Parse(format!("cluster lookup has no rows for k = {k}")));
    }
    info!("clusters: {} locations mapped for k = {k}", clusters.len());
    Ok(clusters)
}
