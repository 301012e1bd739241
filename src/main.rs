//! Command-line driver: process toy events with one of the analyses

use dilepton_cutflow::{
    config::Configuration, evgen::EventGenerator, output, random::RandomGenerator,
    resacc::ResultsAccumulator, scheduling, Result,
};

use eyre::WrapErr;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::{env, path::Path, time::Instant};

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    // Logs go to stderr, verbosity is controlled by RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    // ### CONFIGURATION READOUT ###

    let config_path = env::args().nth(1).unwrap_or_else(|| "settings".to_owned());
    let cfg = Configuration::load(&config_path).wrap_err("Failed to load the configuration")?;

    // ### PROCESSING INITIALIZATION ###

    // Start the clock after configuration I/O, to avoid IO-induced timing
    // fluctuations
    let saved_time = Instant::now();

    let analysis = cfg.analysis.build(cfg.trigger_emulation);
    let evgen = EventGenerator::new(cfg.mean_jets, cfg.met_scale);
    info!(analysis = analysis.name(), "Analysis ready");

    // ### EVENT PROCESSING ###

    // This kernel processes a number of events, given an initial random number
    // generator state, and returns the accumulated results
    let process_events = |num_events: usize, rng: &mut RandomGenerator| {
        let mut accumulator = ResultsAccumulator::new(analysis.book());
        for _ in 0..num_events {
            let event = evgen.generate(rng);
            accumulator.integrate(analysis.process(event, rng));
        }
        accumulator
    };

    let results = scheduling::run_simulation(cfg.num_events, cfg.seed, process_events);

    // ### RESULTS DISPLAY AND STORAGE ###

    let elapsed_time = saved_time.elapsed();
    output::dump_results(Path::new("."), &cfg, &results, elapsed_time)
        .wrap_err("Failed to output the results")?;

    Ok(())
}
