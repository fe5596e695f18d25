//! `deprcli` — simulate DEPR trajectories and release OD count tables.
//!
//! ```text
//! deprcli simulate   --population pop.csv --weights pij.csv --output trips.csv --seed 7
//! deprcli aggregate  --trips trips.csv --construction GDP --epsilon 1 --sensitivity 5 --output gdp.csv
//! deprcli baseline   --trips trips.csv --output exact.csv
//! deprcli stack-days --day-length 24 --output week.csv day0.csv day1.csv ...
//! deprcli stack-days --clusters geoid_lu.csv --k 10 --output week.csv day0.csv ...
//! ```
//!
//! Set `RUST_LOG=debug` for per-mechanism detail.

#[macro_use]
extern crate log;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use structopt::StructOpt;

use depr_core::{DeprParams, Locations, OverflowPolicy, SimConfig, SimRng, TripTable};
use depr_io::{
    read_clusters, read_domain, read_population, read_trips, read_weights, write_counts,
    write_domain, write_trips,
};
use depr_model::PowerLawWaitingTime;
use depr_privacy::{Mechanism, MechanismParams, OdDomain, OdTrips, od_counts};
use depr_sim::{LogProgress, PopulationDriver, SimError};

#[derive(StructOpt)]
struct SimulateOpts {
    /// CSV with `location,individual_count` (or `GEOID,POPESTIMATE2019`)
    #[structopt(long, parse(from_os_str))]
    population: PathBuf,
    /// Long-format flow matrix, `origin,destination,flow`
    #[structopt(long, parse(from_os_str))]
    weights: PathBuf,
    /// Trip table to write
    #[structopt(long, parse(from_os_str))]
    output: PathBuf,
    /// Exploration scale
    #[structopt(long, default_value = "0.6")]
    rho: f64,
    /// Exploration decay with the number of distinct visited locations
    #[structopt(long, default_value = "0.21")]
    gamma: f64,
    /// Waiting-time tail exponent
    #[structopt(long, default_value = "0.8")]
    beta: f64,
    /// Waiting-time rate; the shortest wait is 1/tau hours
    #[structopt(long, default_value = "17")]
    tau: f64,
    /// Simulated horizon in hours
    #[structopt(long, default_value = "24")]
    duration: f64,
    /// Seed for reproducible runs; omitted means a fresh random seed
    #[structopt(long)]
    seed: Option<u64>,
    /// Scale every population count by this rate before simulating
    #[structopt(long)]
    sample_rate: Option<f64>,
    /// Pre-allocated trip records per individual.  The default parameters
    /// average a few dozen visits per simulated day.
    #[structopt(long, default_value = "64")]
    records_per_individual: usize,
    /// Grow the trip buffer instead of failing when it fills up
    #[structopt(long)]
    grow: bool,
    /// Worker threads (with the `parallel` feature)
    #[structopt(long)]
    threads: Option<usize>,
    /// Log progress every N individuals
    #[structopt(long, default_value = "100000")]
    progress_every: usize,
}

impl SimulateOpts {
    fn config(&self) -> SimConfig {
        let params = DeprParams::new(self.rho, self.gamma, self.beta, self.tau, self.duration);
        let mut config = SimConfig::new(params, self.seed);
        config.records_per_individual = self.records_per_individual;
        config.overflow = if self.grow { OverflowPolicy::Grow } else { OverflowPolicy::Fail };
        config.num_threads = self.threads;
        config
    }
}

#[derive(StructOpt)]
#[structopt(name = "deprcli", about = "DEPR mobility simulation and private OD release")]
enum Command {
    /// Simulate one day of trajectories for every individual in a population table.
    Simulate(SimulateOpts),
    /// Release an OD table from a trip table under one privacy mechanism.
    Aggregate {
        /// Trip table, `uid,time,location`
        #[structopt(long, parse(from_os_str))]
        trips: PathBuf,
        /// Released table to write
        #[structopt(long, parse(from_os_str))]
        output: PathBuf,
        /// One of `suppression`/`k_anonymous`, `GDP`, `LDP`/`naive_LDP`, `CMS`
        #[structopt(long)]
        construction: String,
        #[structopt(long)]
        epsilon: Option<f64>,
        /// Per-individual cap on released trips
        #[structopt(long)]
        sensitivity: Option<u32>,
        /// Sketch hash functions
        #[structopt(long)]
        k: Option<usize>,
        /// Sketch width
        #[structopt(long)]
        m: Option<usize>,
        /// Suppression threshold
        #[structopt(long)]
        threshold: Option<u64>,
        /// Replace negative sketch estimates by zero
        #[structopt(long)]
        clip_at_zero: bool,
        #[structopt(long)]
        seed: Option<u64>,
        /// Use this OD domain instead of deriving one from the trips
        #[structopt(long, parse(from_os_str))]
        domain: Option<PathBuf>,
        /// Also write the OD domain used
        #[structopt(long, parse(from_os_str))]
        domain_out: Option<PathBuf>,
        /// Only trips leaving this location
        #[structopt(long)]
        origin: Option<String>,
        /// Only trips departing at or after this hour
        #[structopt(long)]
        window_start: Option<f64>,
        /// Only trips departing before this hour
        #[structopt(long)]
        window_end: Option<f64>,
        /// Omit the construction / parameter columns
        #[structopt(long)]
        no_echo: bool,
    },
    /// Exact OD counts, the non-private reference table.
    Baseline {
        #[structopt(long, parse(from_os_str))]
        trips: PathBuf,
        #[structopt(long, parse(from_os_str))]
        output: PathBuf,
    },
    /// Concatenate single-day trip tables into one multi-day table.
    StackDays {
        /// Hours added per day index
        #[structopt(long, default_value = "24")]
        day_length: f64,
        #[structopt(long, parse(from_os_str))]
        output: PathBuf,
        /// Lookup with `GEOID,k,k_cluster`; relabels every location to its cluster
        #[structopt(long, parse(from_os_str), requires = "k")]
        clusters: Option<PathBuf>,
        /// Partition of the cluster lookup to use
        #[structopt(long, requires = "clusters")]
        k: Option<u32>,
        /// Day tables, in day order
        #[structopt(parse(from_os_str))]
        inputs: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Command::from_args() {
        Command::Simulate(opts) => simulate(opts),
        Command::Aggregate {
            trips,
            output,
            construction,
            epsilon,
            sensitivity,
            k,
            m,
            threshold,
            clip_at_zero,
            seed,
            domain,
            domain_out,
            origin,
            window_start,
            window_end,
            no_echo,
        } => {
            let params = MechanismParams { epsilon, sensitivity, k, m, threshold, clip_at_zero };
            let mechanism = Mechanism::from_selector(&construction, &params)?;
            let filter = TripFilter { origin, window_start, window_end };
            aggregate(trips, output, mechanism, seed, domain, domain_out, filter, !no_echo)
        }
        Command::Baseline { trips, output } => baseline(trips, output),
        Command::StackDays { day_length, output, clusters, k, inputs } => {
            let clusters = clusters.zip(k);
            stack_days(inputs, output, day_length, clusters)
        }
    }
}

fn simulate(opts: SimulateOpts) -> Result<()> {
    let config = opts.config();
    let mut population = read_population(&opts.population)
        .with_context(|| format!("reading population {}", opts.population.display()))?;
    if let Some(rate) = opts.sample_rate {
        if !(rate.is_finite() && rate >= 0.0) {
            bail!("--sample-rate must be a non-negative number, got {rate}");
        }
        population = population.sampled(rate);
    }
    let model = read_weights(&opts.weights)
        .with_context(|| format!("reading weights {}", opts.weights.display()))?;

    let waiting = PowerLawWaitingTime::from_params(&config.params)?;
    let driver = PopulationDriver::new(config, &model, waiting)?;
    let table = match driver.run(&population, &mut LogProgress::new(opts.progress_every)) {
        Err(e @ SimError::CapacityExceeded { .. }) => {
            return Err(anyhow::Error::new(e)
                .context("trip buffer full; raise --records-per-individual or pass --grow"));
        }
        other => other?,
    };

    write_trips(&opts.output, &table, model.locations())?;
    info!("wrote {} trip records to {}", table.len(), opts.output.display());
    Ok(())
}

struct TripFilter {
    origin:       Option<String>,
    window_start: Option<f64>,
    window_end:   Option<f64>,
}

impl TripFilter {
    fn apply(&self, trips: OdTrips, locations: &Locations) -> Result<OdTrips> {
        let mut trips = trips;
        if let Some(code) = &self.origin {
            trips = trips.with_origin(locations.require(code)?);
        }
        if self.window_start.is_some() || self.window_end.is_some() {
            let start = self.window_start.unwrap_or(f64::NEG_INFINITY);
            let end = self.window_end.unwrap_or(f64::INFINITY);
            trips = trips.within_window(start, end);
        }
        Ok(trips)
    }
}

#[allow(clippy::too_many_arguments)]
fn aggregate(
    trips_path:  PathBuf,
    output:      PathBuf,
    mechanism:   Mechanism,
    seed:        Option<u64>,
    domain_path: Option<PathBuf>,
    domain_out:  Option<PathBuf>,
    filter:      TripFilter,
    echo:        bool,
) -> Result<()> {
    let mut locations = Locations::new();
    let table = read_trips(&trips_path, &mut locations)
        .with_context(|| format!("reading trips {}", trips_path.display()))?;
    let trips = filter.apply(OdTrips::from_table(&table), &locations)?;

    let domain = match &domain_path {
        Some(p) => read_domain(p, &mut locations)
            .with_context(|| format!("reading OD domain {}", p.display()))?,
        None => OdDomain::from_trips(&trips)?,
    };
    if let Some(p) = &domain_out {
        write_domain(p, &domain, &locations)?;
    }

    let seed = seed.unwrap_or_else(|| {
        let s = SimRng::entropy_seed();
        info!("no seed given; using {s}");
        s
    });
    let counts = mechanism.apply(&trips, &domain, &mut SimRng::new(seed))?;

    let echo = echo.then(|| mechanism.echo());
    write_counts(&output, &counts, &locations, echo.as_ref())?;
    info!("{}: wrote {} OD rows to {}", mechanism.kind(), counts.len(), output.display());
    Ok(())
}

fn baseline(trips_path: PathBuf, output: PathBuf) -> Result<()> {
    let mut locations = Locations::new();
    let table = read_trips(&trips_path, &mut locations)
        .with_context(|| format!("reading trips {}", trips_path.display()))?;
    let trips = OdTrips::from_table(&table);
    let domain = OdDomain::from_trips(&trips)?;
    let counts = od_counts(&trips, &domain)?;
    write_counts(&output, &counts, &locations, None)?;
    info!("baseline: {} OD pairs, {} trips", counts.len(), trips.len());
    Ok(())
}

fn stack_days(
    inputs:     Vec<PathBuf>,
    output:     PathBuf,
    day_length: f64,
    clusters:   Option<(PathBuf, u32)>,
) -> Result<()> {
    if inputs.is_empty() {
        bail!("stack-days needs at least one input table");
    }
    if !(day_length.is_finite() && day_length > 0.0) {
        bail!("--day-length must be positive, got {day_length}");
    }
    let mut locations = Locations::new();
    let days = inputs
        .iter()
        .map(|p| read_trips(p, &mut locations).with_context(|| format!("reading trips {}", p.display())))
        .collect::<Result<Vec<_>>>()?;
    let mut stacked = TripTable::stack_days(&days, day_length);
    if let Some((path, k)) = clusters {
        let lookup = read_clusters(&path, k, &mut locations)
            .with_context(|| format!("reading clusters {}", path.display()))?;
        stacked = stacked.relabel(&lookup)?;
        info!("relabelled {} locations onto partition k = {k}", lookup.len());
    }
    write_trips(&output, &stacked, &locations)?;
    info!("stacked {} days into {} records", days.len(), stacked.len());
    Ok(())
}
