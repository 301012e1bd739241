//! Per-event recording of cutflow checkpoints and signal regions

use crate::{cutflow::CutflowLayout, numeric::Float, regions::SignalRegions};

/// Everything an analysis declares upfront about its outputs
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalysisBook {
    /// Sequential cuts
    pub cutflow: CutflowLayout,

    /// Signal regions
    pub regions: SignalRegions,
}
//
impl AnalysisBook {
    /// Bundle a cutflow layout and a list of signal regions
    pub fn new(cutflow: CutflowLayout, regions: SignalRegions) -> Self {
        Self { cutflow, regions }
    }

    /// Start recording the outcome of an event with a given weight
    pub fn start_event(&self, weight: Float) -> EventTally<'_> {
        EventTally {
            book: self,
            cursors: vec![0; self.cutflow.num_chains()],
            outcome: EventOutcome {
                weight,
                checkpoints: Vec::new(),
                regions: Vec::new(),
            },
        }
    }
}

/// Recorder for the checkpoints and regions reached by one event
#[derive(Debug)]
pub struct EventTally<'book> {
    book: &'book AnalysisBook,
    cursors: Vec<usize>,
    outcome: EventOutcome,
}
//
impl<'book> EventTally<'book> {
    /// Record that the event survived a cutflow checkpoint
    ///
    /// Panics if the checkpoint is undeclared or recorded out of order.
    ///
    pub fn survive(&mut self, checkpoint: &str) {
        let idx = self.book.cutflow.advance(&mut self.cursors, checkpoint);
        self.outcome.checkpoints.push(idx);
    }

    /// Record that the event falls into a signal region
    pub fn signal(&mut self, region: &str) {
        self.signal_weighted(region, 1.);
    }

    /// Record that the event falls into a signal region, with an extra weight
    /// on top of the event weight
    ///
    /// Panics if the region is undeclared or was already recorded.
    ///
    pub fn signal_weighted(&mut self, region: &str, weight: Float) {
        let idx = self
            .book
            .regions
            .position(region)
            .unwrap_or_else(|| panic!("Signal region {region:?} was not declared"));
        assert!(
            self.outcome.regions.iter().all(|&(r, _)| r != idx),
            "Signal region {region:?} recorded twice for one event"
        );
        self.outcome.regions.push((idx, weight));
    }

    /// Stop recording and extract the outcome of the event
    pub fn finish(self) -> EventOutcome {
        self.outcome
    }
}

/// What happened to one event
///
/// Checkpoints and regions are stored as declaration indices into the
/// `AnalysisBook` they were recorded against.
///
#[derive(Clone, Debug, PartialEq)]
pub struct EventOutcome {
    weight: Float,
    checkpoints: Vec<usize>,
    regions: Vec<(usize, Float)>,
}
//
impl EventOutcome {
    /// Event weight
    pub fn weight(&self) -> Float {
        self.weight
    }

    /// Declaration indices of the checkpoints reached, in recording order
    pub fn checkpoints(&self) -> &[usize] {
        &self.checkpoints
    }

    /// Registration indices and extra weights of the regions reached
    pub fn regions(&self) -> &[(usize, Float)] {
        &self.regions
    }

    /// Names of the checkpoints reached, in recording order
    pub fn checkpoint_names<'b>(&self, book: &'b AnalysisBook) -> Vec<&'b str> {
        self.checkpoints
            .iter()
            .map(|&idx| book.cutflow.name(idx))
            .collect()
    }

    /// Names of the regions reached, in recording order
    pub fn region_names<'b>(&self, book: &'b AnalysisBook) -> Vec<&'b str> {
        self.regions
            .iter()
            .map(|&(idx, _)| book.regions.name(idx))
            .collect()
    }
}
