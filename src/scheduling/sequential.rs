//! Sequential back-end of the event processing

use crate::{
    random::RandomGenerator,
    resacc::ResultsAccumulator,
    scheduling::{batch_size, num_batches},
};

use tracing::debug;

/// Process events in sequential mode
///
/// We use batched logic even in sequential mode, in order to achieve
/// reproducibility with respect to multi-threaded runs.
///
/// Note that this is anyways generally a good thing to do when accumulating
/// lots of results, as otherwise the accumulator will eventually grow much
/// larger than the accumulated values and numerical accumulation errors
/// will start to blow up.
///
pub fn run_simulation_impl<'book>(
    num_events: usize,
    seed: u64,
    process_events: impl Fn(usize, &mut RandomGenerator) -> ResultsAccumulator<'book>,
) -> ResultsAccumulator<'book> {
    let num_batches = num_batches(num_events);
    let run_batch = |batch_id| {
        let size = batch_size(num_events, batch_id);
        debug!(batch_id, size, "Processing batch");
        process_events(size, &mut RandomGenerator::for_batch(seed, batch_id))
    };

    // Merge the results of each batch into those of the first one
    let mut accumulator = run_batch(0);
    for batch_id in 1..num_batches {
        accumulator.merge(run_batch(batch_id));
    }
    accumulator
}
