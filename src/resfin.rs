//! This module contains everything that is needed to store and display the
//! final results of an analysis run

use crate::{numeric::Float, resacc::Counter};
use prefix_num_ops::real::*;

/// Final results of the event selection
#[derive(Clone, Debug, PartialEq)]
pub struct FinalResults {
    /// All processed events
    processed: Counter,

    /// Cutflow checkpoint counters, in declaration order
    cutflow: Vec<(String, Counter)>,

    /// Signal region counters, in registration order
    regions: Vec<(String, Counter)>,
}
//
impl FinalResults {
    /// Assemble final results from integrated counters
    pub fn new(
        processed: Counter,
        cutflow: Vec<(String, Counter)>,
        regions: Vec<(String, Counter)>,
    ) -> Self {
        Self {
            processed,
            cutflow,
            regions,
        }
    }

    /// Counter of all processed events
    pub fn processed(&self) -> &Counter {
        &self.processed
    }

    /// Cutflow checkpoints, in declaration order
    pub fn cutflow(&self) -> &[(String, Counter)] {
        &self.cutflow[..]
    }

    /// Signal regions, in registration order
    pub fn regions(&self) -> &[(String, Counter)] {
        &self.regions[..]
    }

    /// Look up a cutflow checkpoint by name
    pub fn cutflow_count(&self, name: &str) -> Option<&Counter> {
        Self::lookup(&self.cutflow, name)
    }

    /// Look up a signal region by name
    pub fn region_count(&self, name: &str) -> Option<&Counter> {
        Self::lookup(&self.regions, name)
    }

    /// Weighted fraction of processed events which reached some counter
    ///
    /// Zero if no weight was processed at all.
    ///
    pub fn acceptance(&self, counter: &Counter) -> Float {
        if self.processed.sum_w == 0. {
            0.
        } else {
            counter.sum_w / self.processed.sum_w
        }
    }

    /// Statistical uncertainty on the weighted count of some counter
    pub fn uncertainty(&self, counter: &Counter) -> Float {
        sqrt(counter.sum_w2)
    }

    /// Display the results on stdout
    pub fn print(&self) {
        println!();
        println!("Processed events : {}", self.processed.events);
        println!("Sum of weights   : {}", self.processed.sum_w);
        for (title, entries) in [("Cutflow", &self.cutflow), ("Signal regions", &self.regions)] {
            println!();
            println!("{title}");
            for (name, counter) in entries {
                println!(
                    "  {:<45} {:>10} {:>14.4} ± {:<10.4} ({:.4e})",
                    name,
                    counter.events,
                    counter.sum_w,
                    self.uncertainty(counter),
                    self.acceptance(counter),
                );
            }
        }
        println!();
    }

    fn lookup<'a>(entries: &'a [(String, Counter)], name: &str) -> Option<&'a Counter> {
        entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, counter)| counter)
    }
}
