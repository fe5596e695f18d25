//! CSV writers.

use std::io::Write;
use std::path::Path;

use csv::Writer;

use depr_core::{Locations, TripTable};
use depr_privacy::{OdCounts, OdDomain, ParameterEcho};

use crate::TableResult;

const ECHO_COLUMNS: [&str; 6] = ["construction", "epsilon", "sensitivity", "m", "k", "threshold"];

fn opt<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ── Trips ─────────────────────────────────────────────────────────────────────

pub fn write_trips(path: &Path, trips: &TripTable, locations: &Locations) -> TableResult<()> {
    write_trips_writer(Writer::from_path(path)?, trips, locations)
}

pub fn write_trips_writer<W: Write>(
    mut out:   Writer<W>,
    trips:     &TripTable,
    locations: &Locations,
) -> TableResult<()> {
    out.write_record(["uid", "time", "location"])?;
    for r in trips {
        out.write_record(&[r.uid.0.to_string(), r.time.to_string(), locations.name(r.location).to_owned()])?;
    }
    out.flush()?;
    Ok(())
}

// ── OD domain ─────────────────────────────────────────────────────────────────

pub fn write_domain(path: &Path, domain: &OdDomain, locations: &Locations) -> TableResult<()> {
    write_domain_writer(Writer::from_path(path)?, domain, locations)
}

pub fn write_domain_writer<W: Write>(
    mut out:   Writer<W>,
    domain:    &OdDomain,
    locations: &Locations,
) -> TableResult<()> {
    out.write_record(["origin", "destination", "domain_id"])?;
    for (id, pair) in domain.iter() {
        let id = id.0.to_string();
        out.write_record([locations.name(pair.origin), locations.name(pair.destination), id.as_str()])?;
    }
    out.flush()?;
    Ok(())
}

// ── Released counts ───────────────────────────────────────────────────────────

/// Write a released table.  With `echo`, every row also carries the
/// mechanism name and its parameters; unused parameters are left empty.
pub fn write_counts(
    path:      &Path,
    counts:    &OdCounts,
    locations: &Locations,
    echo:      Option<&ParameterEcho>,
) -> TableResult<()> {
    write_counts_writer(Writer::from_path(path)?, counts, locations, echo)
}

pub fn write_counts_writer<W: Write>(
    mut out:   Writer<W>,
    counts:    &OdCounts,
    locations: &Locations,
    echo:      Option<&ParameterEcho>,
) -> TableResult<()> {
    let mut header = vec!["origin", "destination", "count"];
    if echo.is_some() {
        header.extend(ECHO_COLUMNS);
    }
    out.write_record(&header)?;

    let echo_fields: Vec<String> = echo
        .map(|e| {
            vec![
                e.construction.to_string(),
                opt(e.epsilon),
                opt(e.sensitivity),
                opt(e.m),
                opt(e.k),
                opt(e.threshold),
            ]
        })
        .unwrap_or_default();

    for row in counts {
        let mut record = vec![
            locations.name(row.pair.origin).to_owned(),
            locations.name(row.pair.destination).to_owned(),
            row.count.to_string(),
        ];
        record.extend(echo_fields.iter().cloned());
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}
