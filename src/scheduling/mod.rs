//! This module takes care of scheduling the event processing work,
//! encapsulating use of multiple threads

#[cfg(feature = "multi-threading")]
mod multi_threading;
#[cfg(not(feature = "multi-threading"))]
mod sequential;

use crate::{random::RandomGenerator, resacc::ResultsAccumulator, resfin::FinalResults};

use tracing::info;

/// Size of the processed event batches
///
/// Events are grouped in batches of a certain size in order to reduce
/// accumulation error and achieve perfect reproducibility between sequential
/// and parallel runs. Each batch draws its random numbers from its own
/// generator stream, so batches can be processed in any order.
///
pub const EVENT_BATCH_SIZE: usize = 10_000;

/// Number of batches needed to process a number of events
fn num_batches(num_events: usize) -> usize {
    num_events / EVENT_BATCH_SIZE + usize::from(num_events % EVENT_BATCH_SIZE != 0)
}

/// Number of events in the n-th batch
fn batch_size(num_events: usize, batch_id: usize) -> usize {
    (num_events - batch_id * EVENT_BATCH_SIZE).min(EVENT_BATCH_SIZE)
}

/// Process events in the manner that was configured at build time.
///
/// Takes as parameters the total number of events to be processed, the seed
/// of the run, and a kernel that processes a certain number of events using
/// a given random number generator.
///
/// Returns the finalized results
///
pub fn run_simulation<'book>(
    num_events: usize,
    seed: u64,
    process_events: impl Send + Sync + Fn(usize, &mut RandomGenerator) -> ResultsAccumulator<'book>,
) -> FinalResults {
    assert!(num_events > 0, "Must process at least one event");
    let num_batches = num_batches(num_events);
    info!(num_events, num_batches, seed, "Starting event processing");

    // Integrate results...
    let accumulator = {
        // ...in sequential mode
        #[cfg(not(feature = "multi-threading"))]
        {
            sequential::run_simulation_impl(num_events, seed, process_events)
        }

        // ...in multi-threaded mode
        #[cfg(feature = "multi-threading")]
        {
            multi_threading::run_simulation_impl(num_events, seed, process_events)
        }
    };
    info!(
        processed = accumulator.processed_events(),
        "Event processing complete"
    );

    accumulator.finalize()
}
