//! End-to-end selection scenarios, from reconstructed objects to yields

use dilepton_cutflow::{
    analysis::{Analysis, AnalysisKind, Atlas1403_5294},
    collection::ObjectCollection,
    event::{EventObjects, MissingEnergy},
    evgen::EventGenerator,
    momentum::Transverse,
    mt2::mt2,
    numeric::{floats::consts::FRAC_PI_2, Float},
    object::{ObjectKind, PhysicsObject},
    random::RandomGenerator,
    resacc::ResultsAccumulator,
    tally::EventOutcome,
};

use approx::assert_relative_eq;

fn lepton(kind: ObjectKind, pt: Float, eta: Float, phi: Float, charge: i8) -> PhysicsObject {
    PhysicsObject::new(kind, pt, eta, phi, 0.).with_charge(charge)
}

/// Build the calorimeter-level missing momentum which, once the muons are
/// folded back in, yields `after_muons`
fn calo_met(after_muons: Transverse, muons: &ObjectCollection) -> MissingEnergy {
    let seen = muons
        .iter()
        .fold(after_muons, |acc, muon| acc + muon.transverse());
    MissingEnergy::from_transverse(seen)
}

fn run(analysis: &dyn Analysis, event: EventObjects) -> (Vec<String>, Vec<String>) {
    let outcome: EventOutcome = analysis.process(event, &mut RandomGenerator::new(0));
    let book = analysis.book();
    (
        outcome
            .checkpoint_names(book)
            .into_iter()
            .map(str::to_owned)
            .collect(),
        outcome.region_names(book).into_iter().map(str::to_owned).collect(),
    )
}

#[test]
fn z_peak_muons_fail_the_z_veto() {
    let opening = (1. - 95. * 95. / 4800. as Float).acos();
    let mut event = EventObjects::new();
    event.muons = ObjectCollection::new(vec![
        lepton(ObjectKind::Muon, 60., 0., 0., 1),
        lepton(ObjectKind::Muon, 40., 0., opening, -1),
    ]);
    event.missing_et = MissingEnergy::new(-50., 0.);

    let (checkpoints, regions) = run(&Atlas1403_5294::new(), event);
    assert_eq!(
        checkpoints,
        [
            "01_Initial",
            "02_2_OS_leptons",
            "03_mll>20_GeV",
            "04_tau_veto",
            "05_mumu_leptons",
            "06_mumu_jet_veto",
        ]
    );
    assert!(regions.is_empty());
}

#[test]
fn electron_muon_pair_with_large_mt2() {
    // Massless leptons along x and y, with a missing momentum chosen so that
    // mT2 = 95 GeV
    let target: Float = 95.;
    let electron = lepton(ObjectKind::Electron, 50., 0., 0., -1);
    let muon = lepton(ObjectKind::Muon, 30., 1.2_f64.acosh() as Float, FRAC_PI_2, 1);
    let missing = Transverse::new(-target * target / 60., -target * target / 100.);
    assert_relative_eq!(
        mt2(electron.momentum(), muon.momentum(), 0., &missing),
        target,
        max_relative = 1e-4
    );

    let mut event = EventObjects::new();
    event.electrons_loose = ObjectCollection::new(vec![electron.clone()]);
    event.electrons_tight = ObjectCollection::new(vec![electron]);
    event.muons = ObjectCollection::new(vec![muon]);
    event.missing_et = calo_met(missing, &event.muons);

    let (checkpoints, regions) = run(&Atlas1403_5294::new(), event);
    assert_eq!(
        checkpoints,
        [
            "01_Initial",
            "02_2_OS_leptons",
            "03_mll>20_GeV",
            "04_tau_veto",
            "05_emu_leptons",
            "06_emu_jet_veto",
            "08_emu_WWb_mT2>90_GeV",
            "09_emu_WWb_mll<170_GeV",
            "08_emu_mT2>90_GeV",
        ]
    );
    assert_eq!(regions, ["WWb_DF", "mT2_90_DF"]);
}

#[test]
fn z_plus_two_light_jets() {
    let mut event = EventObjects::new();
    event.muons = ObjectCollection::new(vec![
        lepton(ObjectKind::Muon, 100., 0., 0., -1),
        lepton(ObjectKind::Muon, 60., 0., 1.2557, 1),
    ]);
    event.jets = ObjectCollection::new(vec![
        PhysicsObject::new(ObjectKind::Jet, 60., 0.8, 2.5, 0.),
        PhysicsObject::new(ObjectKind::Jet, 50., 0.8, 3.5, 0.),
    ]);
    let met_phi: Float = -1.4;
    let after_muons = Transverse::new(120. * met_phi.cos(), 120. * met_phi.sin());
    event.missing_et = calo_met(after_muons, &event.muons);

    let (checkpoints, regions) = run(&Atlas1403_5294::new(), event);
    assert_eq!(
        checkpoints,
        [
            "01_Initial",
            "02_2_OS_leptons",
            "03_mll>20_GeV",
            "04_tau_veto",
            "05_mumu_leptons",
            "07_mumu_Zjets_>=2_central_light_jets",
            "08_mumu_Zjets_b_&_forward_jet_veto",
            "09_mumu_Zjets_Z_window",
            "10_mumu_Zjets_pTll>80_GeV",
            "11_mumu_Zjets_MET_rel>80_GeV",
            "12_mumu_Zjets_0.3<dRll<1.5",
            "13_mumu_Zjets_50<mjj<100",
            "14_mumu_Zjets_pTjj>45",
        ]
    );
    assert_eq!(regions, ["Zjets"]);
}

#[test]
fn toy_events_give_monotonic_cutflows() {
    let generator = EventGenerator::new(1.5, 80.);
    for kind in AnalysisKind::ALL {
        let analysis = kind.build(true);
        let book = analysis.book();
        let mut rng = RandomGenerator::new(2024);
        let mut accumulator = ResultsAccumulator::new(book);
        for _ in 0..5000 {
            let event = generator.generate(&mut rng);
            accumulator.integrate(analysis.process(event, &mut rng));
        }
        let results = accumulator.finalize();
        assert_eq!(results.processed().events, 5000);

        let cutflow = results.cutflow();
        for chain in book.cutflow.chains() {
            for pair in chain.windows(2) {
                let (upstream, downstream) = (&cutflow[pair[0]], &cutflow[pair[1]]);
                assert!(
                    upstream.1.events >= downstream.1.events,
                    "{} < {}",
                    upstream.0,
                    downstream.0
                );
            }
        }
        for (_, counter) in results.regions() {
            assert!(counter.events <= results.processed().events);
        }
    }
}
