//! `depr-io` — CSV adapters for the tables exchanged with the outside world.
//!
//! | Table        | Columns                                               | Reader / writer                        |
//! |--------------|-------------------------------------------------------|----------------------------------------|
//! | population   | `location, individual_count`                          | [`read_population`]                    |
//! | weights      | `origin, destination, flow`                           | [`read_weights`]                       |
//! | trips        | `uid, time, location`                                 | [`read_trips`] / [`write_trips`]       |
//! | OD domain    | `origin, destination, domain_id`                      | [`read_domain`] / [`write_domain`]     |
//! | counts       | `origin, destination, count` + optional parameter echo | [`write_counts`]                      |
//! | clusters     | `GEOID, k, k_cluster`                                 | [`read_clusters`]                      |
//!
//! Census-style headers are accepted as aliases: `GEOID` for `location`,
//! `POPESTIMATE2019`/`pop_sample` for `individual_count`, `geoid_o`/`geoid_d`/`value`
//! for the weight matrix and `geoid` for trip locations.
//!
//! Every reader has a `_reader` twin taking any `Read`, and every writer a
//! `_writer` twin taking any `Write`.

pub mod error;
pub mod read;
pub mod write;

#[cfg(test)]
mod tests;

pub use error::{TableError, TableResult};
pub use read::{
    read_clusters, read_clusters_reader, read_domain, read_domain_reader, read_population,
    read_population_reader, read_trips, read_trips_reader, read_weights, read_weights_reader,
};
pub use write::{
    write_counts, write_counts_writer, write_domain, write_domain_writer, write_trips,
    write_trips_writer,
};
