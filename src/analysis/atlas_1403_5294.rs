//! Direct production of charginos, neutralinos and sleptons in final states
//! with two leptons and missing transverse momentum (8 TeV, 20.3 fb⁻¹)

use crate::{
    analysis::Analysis,
    collection::ObjectCollection,
    cutflow::CutflowLayout,
    dilepton::{Channel, Dilepton},
    event::{CollectionId::*, EventObjects, MissingEnergy},
    isolation::{IsolationCone, LeptonRules},
    kinematics::met_rel,
    momentum::Kinematics,
    mt2::mt2,
    numeric::Float,
    object::PhysicsObject,
    overlap::{OverlapPlan, OverlapStep, TieBreak},
    phasespace::PhaseSpace,
    random::RandomGenerator,
    regions::SignalRegions,
    tally::{AnalysisBook, EventTally},
};
use prefix_num_ops::real::*;
use tracing::trace;

/// Signal regions, in registration order
const REGIONS: &str = "mT2_90_SF;mT2_90_DF;mT2_120_SF;mT2_120_DF;mT2_150_SF;mT2_150_DF;\
                       WWa_SF;WWa_DF;WWb_SF;WWb_DF;WWc_SF;WWc_DF;Zjets";

/// Channels, in cutflow declaration order
const CHANNELS: [Channel; 3] = [
    Channel::ElectronElectron,
    Channel::MuonMuon,
    Channel::ElectronMuon,
];

/// Z mass used by the same-flavour Z veto (GeV)
const Z_VETO_MASS: Float = 91.118;

/// Z mass used by the Z+jets control selection (GeV)
const Z_WINDOW_MASS: Float = 91.2;

/// Thresholds of the plain mT2 signal regions (GeV)
const MT2_THRESHOLDS: [u32; 3] = [90, 120, 150];

/// Jets of an event, split by role
struct JetClasses {
    /// b-tagged jets with |η| < 2.4
    b_jets: ObjectCollection,

    /// Untagged jets with |η| < 2.4
    light_jets: ObjectCollection,

    /// Jets outside of the tracker with pt > 30 GeV
    forward_jets: ObjectCollection,
}
//
impl JetClasses {
    fn new(jets: &ObjectCollection) -> Self {
        let central = |jet: &PhysicsObject| abs(jet.eta()) < 2.4 && jet.pt() > 20.;
        Self {
            b_jets: jets.filtered(|jet| central(jet) && jet.is_b_tagged()),
            light_jets: jets.filtered(|jet| central(jet) && !jet.is_b_tagged()),
            forward_jets: jets.filtered(|jet| !central(jet) && jet.pt() > 30.),
        }
    }
}

/// ATLAS 1403.5294 selection
pub struct Atlas1403_5294 {
    book: AnalysisBook,
    electrons: PhaseSpace,
    muons: PhaseSpace,
    jets: PhaseSpace,
    overlap: OverlapPlan,
    electron_isolation: IsolationCone,
    muon_isolation: IsolationCone,
}
//
impl Atlas1403_5294 {
    /// Set up the analysis
    pub fn new() -> Self {
        let isolation = |rules| IsolationCone {
            max_radius: 0.3,
            pt_scale: 10.,
            calo_radius: 0.3,
            track_fraction: 0.16,
            calo_fraction: Some(0.18),
            rules,
        };
        Self {
            book: AnalysisBook::new(Self::cutflow(), SignalRegions::parse(REGIONS)),
            electrons: PhaseSpace::symmetric(10., 2.47),
            muons: PhaseSpace::symmetric(10., 2.4),
            jets: PhaseSpace::symmetric(20., 4.5),
            overlap: OverlapPlan::new(vec![
                OverlapStep::within(ElectronsTight, 0.05, TieBreak::KeepHardest).in_rapidity(),
                OverlapStep::against(Jets, ElectronsTight, 0.2).in_rapidity(),
                OverlapStep::against(ElectronsTight, Jets, 0.4).in_rapidity(),
                OverlapStep::against(Muons, Jets, 0.4).in_rapidity(),
            ]),
            electron_isolation: isolation(LeptonRules::Electron),
            muon_isolation: isolation(LeptonRules::Muon),
        }
    }

    /// Cutflow layout: a common preselection, one branch per channel, and
    /// one sub-branch per signal region (plus the Z+jets selection, which
    /// forks before the jet veto)
    fn cutflow() -> CutflowLayout {
        let mut layout = CutflowLayout::new([
            "01_Initial",
            "02_2_OS_leptons",
            "03_mll>20_GeV",
            "04_tau_veto",
        ]);
        for channel in CHANNELS {
            let ch = channel.label();
            let mut common = vec![format!("05_{ch}_leptons"), format!("06_{ch}_jet_veto")];
            let fork = if channel.is_same_flavour() {
                format!("07_{ch}_Z_veto")
            } else {
                format!("06_{ch}_jet_veto")
            };
            if channel.is_same_flavour() {
                common.push(fork.clone());
            }
            layout = layout
                .branch("04_tau_veto", common)
                .branch(
                    &fork,
                    [
                        format!("08_{ch}_WWa_pTll>80_GeV"),
                        format!("09_{ch}_WWa_METrel>80_GeV"),
                        format!("10_{ch}_WWa_mll<120_GeV"),
                    ],
                )
                .branch(
                    &fork,
                    [
                        format!("08_{ch}_WWb_mT2>90_GeV"),
                        format!("09_{ch}_WWb_mll<170_GeV"),
                    ],
                )
                .branch(&fork, [format!("08_{ch}_WWc_mT2>100_GeV")]);
            for threshold in MT2_THRESHOLDS {
                layout = layout.branch(&fork, [format!("08_{ch}_mT2>{threshold}_GeV")]);
            }
            if channel.is_same_flavour() {
                layout = layout.branch(
                    &format!("05_{ch}_leptons"),
                    [
                        format!("07_{ch}_Zjets_>=2_central_light_jets"),
                        format!("08_{ch}_Zjets_b_&_forward_jet_veto"),
                        format!("09_{ch}_Zjets_Z_window"),
                        format!("10_{ch}_Zjets_pTll>80_GeV"),
                        format!("11_{ch}_Zjets_MET_rel>80_GeV"),
                        format!("12_{ch}_Zjets_0.3<dRll<1.5"),
                        format!("13_{ch}_Zjets_50<mjj<100"),
                        format!("14_{ch}_Zjets_pTjj>45"),
                    ],
                );
            }
        }
        layout
    }

    /// Signal regions of events without jets (and outside of the Z peak for
    /// same-flavour pairs). Every region is tested independently.
    fn select_signal_regions(&self, pair: &Dilepton, met: &MissingEnergy, tally: &mut EventTally) {
        let ch = pair.channel().label();
        let suffix = pair.channel().region_suffix();
        let mll = pair.mass();
        let met_rel = met_rel(met, [pair.leading(), pair.subleading()]);
        let mt2 = mt2(
            pair.leading().momentum(),
            pair.subleading().momentum(),
            0.,
            &met.transverse(),
        );

        if pair.pt() > 80. {
            tally.survive(&format!("08_{ch}_WWa_pTll>80_GeV"));
            if met_rel > 80. {
                tally.survive(&format!("09_{ch}_WWa_METrel>80_GeV"));
                if mll < 120. {
                    tally.survive(&format!("10_{ch}_WWa_mll<120_GeV"));
                    tally.signal(&format!("WWa_{suffix}"));
                }
            }
        }

        if mt2 > 90. {
            tally.survive(&format!("08_{ch}_WWb_mT2>90_GeV"));
            if mll < 170. {
                tally.survive(&format!("09_{ch}_WWb_mll<170_GeV"));
                tally.signal(&format!("WWb_{suffix}"));
            }
        }

        if mt2 > 100. {
            tally.survive(&format!("08_{ch}_WWc_mT2>100_GeV"));
            tally.signal(&format!("WWc_{suffix}"));
        }

        for threshold in MT2_THRESHOLDS {
            if mt2 > threshold as Float {
                tally.survive(&format!("08_{ch}_mT2>{threshold}_GeV"));
                tally.signal(&format!("mT2_{threshold}_{suffix}"));
            }
        }
    }

    /// Z+jets selection of same-flavour events with jets
    fn select_z_jets(
        &self,
        pair: &Dilepton,
        jets: &ObjectCollection,
        met: &MissingEnergy,
        tally: &mut EventTally,
    ) {
        let ch = pair.channel().label();
        let classes = JetClasses::new(jets);
        let light = &classes.light_jets;

        if light.len() < 2 {
            return;
        }
        tally.survive(&format!("07_{ch}_Zjets_>=2_central_light_jets"));

        if !(classes.b_jets.is_empty() && classes.forward_jets.is_empty()) {
            return;
        }
        tally.survive(&format!("08_{ch}_Zjets_b_&_forward_jet_veto"));

        if abs(pair.mass() - Z_WINDOW_MASS) > 10. {
            return;
        }
        tally.survive(&format!("09_{ch}_Zjets_Z_window"));

        if pair.pt() < 80. {
            return;
        }
        tally.survive(&format!("10_{ch}_Zjets_pTll>80_GeV"));

        let leptons = [pair.leading(), pair.subleading()];
        if met_rel(met, leptons.into_iter().chain(jets)) < 80. {
            return;
        }
        tally.survive(&format!("11_{ch}_Zjets_MET_rel>80_GeV"));

        let delta_r = pair.delta_r();
        if !(0.3..=1.5).contains(&delta_r) {
            return;
        }
        tally.survive(&format!("12_{ch}_Zjets_0.3<dRll<1.5"));

        let mjj = (light[0].momentum() + light[1].momentum()).mass();
        if !(50. ..=100.).contains(&mjj) {
            return;
        }
        tally.survive(&format!("13_{ch}_Zjets_50<mjj<100"));

        if light[1].pt() < 45. {
            return;
        }
        tally.survive(&format!("14_{ch}_Zjets_pTjj>45"));
        tally.signal("Zjets");
    }
}

impl Default for Atlas1403_5294 {
    fn default() -> Self {
        Self::new()
    }
}

impl Analysis for Atlas1403_5294 {
    fn name(&self) -> &'static str {
        "atlas_1403_5294"
    }

    fn book(&self) -> &AnalysisBook {
        &self.book
    }

    fn analyze(&self, mut event: EventObjects, _rng: &mut RandomGenerator, tally: &mut EventTally) {
        // Muons leave little energy in the calorimeter
        event.missing_et.absorb_muons(&event.muons);

        event.electrons_tight = self.electrons.filter(&event.electrons_tight);
        event.muons = self.muons.filter(&event.muons);
        event.jets = self.jets.filter(&event.jets);
        self.overlap.apply(&mut event);

        let electrons = self.electron_isolation.isolate(
            &event.electrons_tight,
            &event.tracks,
            &event.towers,
        );
        let muons = self
            .muon_isolation
            .isolate(&event.muons, &event.tracks, &event.towers);

        tally.survive("01_Initial");

        let Some(pair) = Dilepton::from_signal_leptons(&electrons, &muons) else {
            trace!("Rejected: {} signal leptons", electrons.len() + muons.len());
            return;
        };
        if pair.leading().pt() < 35. || pair.subleading().pt() < 20. || !pair.is_opposite_charge() {
            return;
        }
        tally.survive("02_2_OS_leptons");

        let mll = pair.mass();
        if mll < 20. {
            return;
        }
        tally.survive("03_mll>20_GeV");

        // No hadronic tau candidates are reconstructed
        tally.survive("04_tau_veto");

        let channel = pair.channel();
        let ch = channel.label();
        tally.survive(&format!("05_{ch}_leptons"));

        if !event.jets.is_empty() {
            if channel.is_same_flavour() {
                self.select_z_jets(&pair, &event.jets, &event.missing_et, tally);
            }
            return;
        }
        tally.survive(&format!("06_{ch}_jet_veto"));

        if channel.is_same_flavour() {
            if abs(mll - Z_VETO_MASS) < 10. {
                trace!("Rejected: mll = {mll} in the Z peak");
                return;
            }
            tally.survive(&format!("07_{ch}_Z_veto"));
        }

        self.select_signal_regions(&pair, &event.missing_et, tally);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{angular::Longitudinal, object::ObjectKind, overlap::Against};

    #[test]
    fn layout_declares_every_branch() {
        let analysis = Atlas1403_5294::new();
        let book = analysis.book();
        assert_eq!(book.regions.len(), 13);
        // Preselection, then per channel: common branch, WWa, WWb, WWc,
        // three mT2 branches, and Z+jets for same-flavour channels
        assert_eq!(book.cutflow.num_chains(), 1 + 3 * 7 + 2);
        for name in [
            "07_ee_Z_veto",
            "06_emu_jet_veto",
            "10_mumu_WWa_mll<120_GeV",
            "08_emu_mT2>150_GeV",
            "14_ee_Zjets_pTjj>45",
        ] {
            assert!(book.cutflow.position(name).is_some(), "{name} is missing");
        }
        assert!(book.cutflow.position("07_emu_Z_veto").is_none());
        assert!(book.cutflow.position("07_emu_Zjets_>=2_central_light_jets").is_none());
    }

    #[test]
    fn overlap_removal_order() {
        let analysis = Atlas1403_5294::new();
        let steps = analysis.overlap.steps();
        let targets: Vec<_> = steps.iter().map(|step| step.target).collect();
        assert_eq!(targets, [ElectronsTight, Jets, ElectronsTight, Muons]);
        assert_eq!(steps[0].against, Against::Itself(TieBreak::KeepHardest));
        assert_eq!(steps[1].against, Against::Collection(ElectronsTight));
        assert!(steps
            .iter()
            .all(|step| step.longitudinal == Longitudinal::Rapidity));
    }

    #[test]
    fn single_lepton_only_reaches_initial() {
        let analysis = Atlas1403_5294::new();
        let mut event = EventObjects::new();
        event.muons = ObjectCollection::new(vec![
            PhysicsObject::new(ObjectKind::Muon, 50., 0., 0., 0.).with_charge(1)
        ]);
        let outcome = analysis.process(event, &mut RandomGenerator::new(0));
        assert_eq!(outcome.checkpoint_names(analysis.book()), ["01_Initial"]);
    }

    #[test]
    fn jets_are_classified_by_role() {
        let jets = ObjectCollection::new(vec![
            PhysicsObject::new(ObjectKind::Jet, 60., 0.5, 0., 5.).with_b_tag(true),
            PhysicsObject::new(ObjectKind::Jet, 50., -1., 1., 5.),
            PhysicsObject::new(ObjectKind::Jet, 40., 3.5, 2., 5.),
            PhysicsObject::new(ObjectKind::Jet, 25., -3., 3., 5.),
        ]);
        let classes = JetClasses::new(&jets);
        assert_eq!(classes.b_jets.len(), 1);
        assert_eq!(classes.light_jets.len(), 1);
        assert_eq!(classes.forward_jets.len(), 1);
        assert_eq!(classes.forward_jets[0].pt(), 40.);
    }
}
