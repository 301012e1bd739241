//! This module allows integrating selection results across processed events

use crate::{
    numeric::Float,
    resfin::FinalResults,
    tally::{AnalysisBook, EventOutcome},
};
use num_traits::Zero;
use std::ops::Add;

/// Weighted event counter
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Counter {
    /// Number of counted events
    pub events: usize,

    /// Sum of event weights
    pub sum_w: Float,

    /// Sum of squared event weights
    pub sum_w2: Float,
}
//
impl Counter {
    /// Count one event of a given weight
    pub fn record(&mut self, weight: Float) {
        self.events += 1;
        self.sum_w += weight;
        self.sum_w2 += weight * weight;
    }
}

impl Add for Counter {
    type Output = Counter;

    fn add(self, other: Counter) -> Counter {
        Counter {
            events: self.events + other.events,
            sum_w: self.sum_w + other.sum_w,
            sum_w2: self.sum_w2 + other.sum_w2,
        }
    }
}

impl Zero for Counter {
    fn zero() -> Self {
        Self::default()
    }

    fn is_zero(&self) -> bool {
        self.events == 0 && self.sum_w == 0. && self.sum_w2 == 0.
    }
}

/// This struct will accumulate the outcomes of processed events, and
/// ultimately compute the final results (see FinalResults).
///
/// Accumulators are cheap to create, so each batch of events gets its own
/// and batches are merged afterwards. This is the only state which outlives
/// an event.
///
#[derive(Clone, Debug)]
pub struct ResultsAccumulator<'book> {
    /// All processed events, whatever their fate
    processed: Counter,

    /// Counters of the cutflow checkpoints, in declaration order
    cutflow: Vec<Counter>,

    /// Counters of the signal regions, in registration order
    regions: Vec<Counter>,

    /// Declared outputs of the analysis
    book: &'book AnalysisBook,
}
//
impl<'book> ResultsAccumulator<'book> {
    /// Prepare for results integration
    pub fn new(book: &'book AnalysisBook) -> Self {
        Self {
            processed: Counter::zero(),
            cutflow: vec![Counter::zero(); book.cutflow.len()],
            regions: vec![Counter::zero(); book.regions.len()],
            book,
        }
    }

    /// Integrate the outcome of one event
    #[allow(clippy::needless_pass_by_value)]
    pub fn integrate(&mut self, outcome: EventOutcome) {
        let weight = outcome.weight();
        self.processed.record(weight);
        for &checkpoint in outcome.checkpoints() {
            self.cutflow[checkpoint].record(weight);
        }
        for &(region, region_weight) in outcome.regions() {
            self.regions[region].record(weight * region_weight);
        }
    }

    /// Integrate results from another ResultsAccumulator
    #[allow(clippy::needless_pass_by_value)]
    pub fn merge(&mut self, other: Self) {
        assert!(
            std::ptr::eq(self.book, other.book),
            "Cannot merge results of different analyses"
        );
        self.processed = self.processed + other.processed;
        for (mine, theirs) in self.cutflow.iter_mut().zip(other.cutflow) {
            *mine = *mine + theirs;
        }
        for (mine, theirs) in self.regions.iter_mut().zip(other.regions) {
            *mine = *mine + theirs;
        }
    }

    /// Number of events integrated so far
    pub fn processed_events(&self) -> usize {
        self.processed.events
    }

    /// Turn integrated data into finalized results
    pub fn finalize(self) -> FinalResults {
        let cutflow = self
            .book
            .cutflow
            .names()
            .map(str::to_owned)
            .zip(self.cutflow)
            .collect();
        let regions = self
            .book
            .regions
            .names()
            .map(str::to_owned)
            .zip(self.regions)
            .collect();
        FinalResults::new(self.processed, cutflow, regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{cutflow::CutflowLayout, regions::SignalRegions};
    use approx::assert_relative_eq;

    fn book() -> AnalysisBook {
        AnalysisBook::new(
            CutflowLayout::new(["01_a", "02_b", "03_c"]).branch("02_b", ["03_d"]),
            SignalRegions::parse("SR1;SR2"),
        )
    }

    /// Record an event which passed the first `depth` root checkpoints
    fn event(book: &AnalysisBook, depth: usize, weight: Float) -> EventOutcome {
        let mut tally = book.start_event(weight);
        for name in ["01_a", "02_b", "03_c"].iter().take(depth) {
            tally.survive(name);
        }
        if depth >= 2 {
            tally.survive("03_d");
            tally.signal("SR1");
        }
        if depth == 3 {
            tally.signal("SR2");
        }
        tally.finish()
    }

    #[test]
    fn counts_are_non_increasing_along_chains() {
        let book = book();
        let mut acc = ResultsAccumulator::new(&book);
        for (idx, depth) in [0, 3, 1, 2, 3, 3, 0, 2, 1, 3].iter().enumerate() {
            acc.integrate(event(&book, *depth, 1. + idx as Float / 10.));
        }
        let results = acc.finalize();
        assert_eq!(results.processed().events, 10);
        for chain in book.cutflow.chains() {
            for pair in chain.windows(2) {
                let (upstream, downstream) = (&results.cutflow()[pair[0]].1, &results.cutflow()[pair[1]].1);
                assert!(upstream.events >= downstream.events);
                assert!(upstream.sum_w >= downstream.sum_w);
            }
        }
        assert_eq!(results.cutflow_count("01_a").unwrap().events, 8);
        assert_eq!(results.region_count("SR1").unwrap().events, 6);
        assert_eq!(results.region_count("SR2").unwrap().events, 4);
    }

    #[test]
    fn merging_matches_sequential_integration() {
        let book = book();
        let depths = [3, 2, 0, 1, 3, 2];
        let mut whole = ResultsAccumulator::new(&book);
        let mut first = ResultsAccumulator::new(&book);
        let mut second = ResultsAccumulator::new(&book);
        for (idx, &depth) in depths.iter().enumerate() {
            whole.integrate(event(&book, depth, 0.5));
            if idx < 3 {
                first.integrate(event(&book, depth, 0.5));
            } else {
                second.integrate(event(&book, depth, 0.5));
            }
        }
        first.merge(second);
        assert_eq!(first.processed_events(), 6);
        let (whole, merged) = (whole.finalize(), first.finalize());
        assert_eq!(whole.cutflow(), merged.cutflow());
        assert_eq!(whole.regions(), merged.regions());
        assert_relative_eq!(merged.region_count("SR1").unwrap().sum_w2, 4. * 0.25);
    }
}
