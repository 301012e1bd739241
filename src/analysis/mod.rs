//! Analyses which can be run by the selection engine
//!
//! An analysis declares its cutflow and signal regions upfront (see
//! `AnalysisBook`), then turns each event into an `EventOutcome`. It holds no
//! per-event state, so one analysis can process events from many threads.

mod atlas_1403_5294;
mod atlas_higg_2013_03;

pub use self::{atlas_1403_5294::Atlas1403_5294, atlas_higg_2013_03::AtlasHigg2013_03};

use crate::{
    event::EventObjects,
    random::RandomGenerator,
    tally::{AnalysisBook, EventOutcome, EventTally},
    trigger::TriggerEmulator,
};
use eyre::eyre;
use std::{fmt, str::FromStr};

/// Per-event object selection and cutflow of a physics analysis
pub trait Analysis: Send + Sync {
    /// Name of the analysis, used for output file names
    fn name(&self) -> &'static str;

    /// Declared cutflow and signal regions
    fn book(&self) -> &AnalysisBook;

    /// Select objects and apply cuts to one event, recording every
    /// checkpoint and signal region that it reaches
    fn analyze(&self, event: EventObjects, rng: &mut RandomGenerator, tally: &mut EventTally);

    /// Run the analysis on one event and collect the outcome
    fn process(&self, event: EventObjects, rng: &mut RandomGenerator) -> EventOutcome {
        let mut tally = self.book().start_event(event.weight);
        self.analyze(event, rng, &mut tally);
        tally.finish()
    }
}

/// Analyses known to the engine
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnalysisKind {
    /// Charginos, neutralinos and sleptons in two leptons + MET (8 TeV)
    Atlas1403_5294,

    /// Z boson + invisible Higgs decay (8 TeV)
    AtlasHigg2013_03,
}
//
impl AnalysisKind {
    /// Every known analysis
    pub const ALL: [AnalysisKind; 2] = [AnalysisKind::Atlas1403_5294, AnalysisKind::AtlasHigg2013_03];

    /// Name of the analysis, as used in configuration files
    pub fn name(self) -> &'static str {
        match self {
            AnalysisKind::Atlas1403_5294 => "atlas_1403_5294",
            AnalysisKind::AtlasHigg2013_03 => "atlas_higg_2013_03",
        }
    }

    /// Set up the analysis
    ///
    /// Trigger emulation only affects analyses whose inputs lack trigger
    /// decisions.
    ///
    pub fn build(self, trigger_emulation: bool) -> Box<dyn Analysis> {
        match self {
            AnalysisKind::Atlas1403_5294 => Box::new(Atlas1403_5294::new()),
            AnalysisKind::AtlasHigg2013_03 => Box::new(AtlasHigg2013_03::new(
                trigger_emulation.then(TriggerEmulator::default),
            )),
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                let known = Self::ALL.map(AnalysisKind::name).join(", ");
                eyre!("Unknown analysis {s:?} (known analyses: {known})")
            })
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
