//! Search for invisible decays of a Higgs boson produced in association with
//! a Z boson decaying to charged leptons (8 TeV, 20.3 fb⁻¹)

use crate::{
    analysis::Analysis,
    cutflow::CutflowLayout,
    dilepton::Dilepton,
    event::{CollectionId::*, EventObjects},
    isolation::{IsolationCone, LeptonRules},
    kinematics::{met_consistency, soft_term_met, track_met},
    numeric::Float,
    overlap::{OverlapPlan, OverlapStep},
    phasespace::PhaseSpace,
    random::RandomGenerator,
    regions::SignalRegions,
    tally::{AnalysisBook, EventTally},
    trigger::TriggerEmulator,
};
use prefix_num_ops::real::*;
use tracing::trace;

/// Cutflow checkpoints, in order
const CUTFLOW: [&str; 8] = [
    "01_2OS_lep1_pt>20",
    "02_Zwindow",
    "03_MET>90_GeV",
    "04_pTmiss-MET_separation",
    "05_dilepton-MET_separation",
    "06_lepton-lepton_separation",
    "07_pTll-MET_similarity",
    "08_jetveto",
];

/// Tracks above this pt are matched to jet constituents in the soft term
const SOFT_TERM_CONSTITUENT_PT: Float = 0.4;

/// ATLAS HIGG-2013-03 selection
pub struct AtlasHigg2013_03 {
    book: AnalysisBook,
    electrons: PhaseSpace,
    muons: PhaseSpace,
    jets: PhaseSpace,
    tracks: PhaseSpace,
    overlap: OverlapPlan,
    electron_isolation: IsolationCone,
    muon_isolation: IsolationCone,
    trigger: Option<TriggerEmulator>,
}
//
impl AtlasHigg2013_03 {
    /// Set up the analysis, optionally emulating the dilepton trigger
    pub fn new(trigger: Option<TriggerEmulator>) -> Self {
        let isolation = |rules| IsolationCone {
            max_radius: 0.2,
            pt_scale: 10.,
            calo_radius: 0.2,
            track_fraction: 0.10,
            calo_fraction: Some(0.10),
            rules,
        };
        Self {
            book: AnalysisBook::new(CutflowLayout::new(CUTFLOW), SignalRegions::parse("sig")),
            electrons: PhaseSpace::symmetric(7., 2.47),
            muons: PhaseSpace::symmetric(7., 2.4),
            jets: PhaseSpace::symmetric(25., 2.5),
            tracks: PhaseSpace::symmetric(0.5, 2.5),
            overlap: OverlapPlan::new(vec![
                OverlapStep::against(ElectronsLoose, Muons, 0.2).in_rapidity(),
                OverlapStep::against(ElectronsTight, Muons, 0.2).in_rapidity(),
                OverlapStep::against(Jets, ElectronsLoose, 0.2).in_rapidity(),
                OverlapStep::against(Jets, ElectronsTight, 0.2).in_rapidity(),
                OverlapStep::against(ElectronsLoose, Jets, 0.4).in_rapidity(),
                OverlapStep::against(ElectronsTight, Jets, 0.4).in_rapidity(),
                OverlapStep::against(Muons, Jets, 0.4).in_rapidity(),
            ]),
            electron_isolation: isolation(LeptonRules::Electron),
            muon_isolation: isolation(LeptonRules::Muon),
            trigger,
        }
    }
}

impl Analysis for AtlasHigg2013_03 {
    fn name(&self) -> &'static str {
        "atlas_higg_2013_03"
    }

    fn book(&self) -> &AnalysisBook {
        &self.book
    }

    fn analyze(&self, mut event: EventObjects, rng: &mut RandomGenerator, tally: &mut EventTally) {
        event.electrons_loose = self.electrons.filter(&event.electrons_loose);
        event.electrons_tight = self.electrons.filter(&event.electrons_tight);
        event.muons = self.muons.filter(&event.muons);
        event.jets = self.jets.filter(&event.jets);
        event.tracks = self.tracks.filter(&event.tracks);
        self.overlap.apply(&mut event);

        // Muons leave little energy in the calorimeter
        event.missing_et.absorb_muons(&event.muons);

        let electrons = self.electron_isolation.isolate(
            &event.electrons_tight,
            &event.tracks,
            &event.towers,
        );
        let muons = self
            .muon_isolation
            .isolate(&event.muons, &event.tracks, &event.towers);

        if event.electrons_loose.len() + event.muons.len() != 2 {
            return;
        }
        let Some(pair) = Dilepton::from_signal_leptons(&electrons, &muons) else {
            trace!("Rejected: {} signal leptons", electrons.len() + muons.len());
            return;
        };
        if let Some(trigger) = &self.trigger {
            if !trigger.accepts(pair.channel(), rng) {
                trace!("Rejected: {} trigger did not fire", pair.channel().label());
                return;
            }
        }

        if !pair.is_opposite_charge() || pair.subleading().pt() < 20. {
            return;
        }
        tally.survive(CUTFLOW[0]);

        let mll = pair.mass();
        if !(76. ..=106.).contains(&mll) {
            return;
        }
        tally.survive(CUTFLOW[1]);

        let met = &event.missing_et;
        if met.et() < 90. {
            return;
        }
        tally.survive(CUTFLOW[2]);

        // Reject events where the calorimeter and tracker disagree on the
        // direction of the imbalance
        let track_based = track_met(&event.tracks, &self.tracks);
        let soft_term = soft_term_met(
            &event.jets,
            &event.tracks,
            SOFT_TERM_CONSTITUENT_PT,
        );
        if met_consistency(&track_based, &soft_term) > 0.2 {
            return;
        }
        tally.survive(CUTFLOW[3]);

        if pair.delta_phi_to(met) < 2.6 {
            return;
        }
        tally.survive(CUTFLOW[4]);

        if pair.delta_phi() > 1.7 {
            return;
        }
        tally.survive(CUTFLOW[5]);

        let pt_ll = pair.pt();
        if abs(met.et() - pt_ll) / pt_ll > 0.2 {
            return;
        }
        tally.survive(CUTFLOW[6]);

        if !event.jets.is_empty() {
            return;
        }
        tally.survive(CUTFLOW[7]);
        tally.signal("sig");
    }
}
