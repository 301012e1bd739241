//! This module provides a toy source of reconstructed dilepton events
//!
//! Events are not meant to be physically accurate, only to exercise every
//! stage of the selection: lepton pairs of all flavours and charges, jets with
//! b-tags and track constituents, soft tracks, calorimeter towers, and a
//! calorimeter-based missing momentum which, like a real detector, does not
//! see muons.

use crate::{
    collection::ObjectCollection,
    event::{EventObjects, MissingEnergy},
    momentum::Transverse,
    numeric::{floats::consts::PI, Float},
    object::{ObjectKind, PhysicsObject, SourceId},
    random::RandomGenerator,
};
use num_traits::Zero;
use prefix_num_ops::real::*;

/// Largest number of jets in an event
const MAX_JETS: usize = 12;

/// Fraction of central jets which are b-tagged
const B_TAG_RATE: Float = 0.15;

/// Fraction of electrons which pass the tight identification
const TIGHT_RATE: Float = 0.85;

/// Fraction of lepton pairs with opposite charges
const OPPOSITE_CHARGE_RATE: Float = 0.9;

/// Largest number of soft tracks from the underlying event
const MAX_SOFT_TRACKS: usize = 10;

/// Generator of toy dilepton events
#[derive(Clone, Debug, PartialEq)]
pub struct EventGenerator {
    /// Mean number of jets per event
    mean_jets: Float,

    /// Mean transverse momentum of invisible particles (GeV)
    met_scale: Float,
}
//
impl EventGenerator {
    /// Set up event generation
    pub fn new(mean_jets: Float, met_scale: Float) -> Self {
        assert!(mean_jets >= 0., "Mean number of jets must be non-negative");
        assert!(met_scale >= 0., "Missing momentum scale must be non-negative");
        Self {
            mean_jets,
            met_scale,
        }
    }

    /// Generate one event
    pub fn generate(&self, rng: &mut RandomGenerator) -> EventObjects {
        let mut builder = EventBuilder::new();

        // Lepton pair: pick a flavour content, then the leptons
        let [flavour, charge_draw, sign_draw] = rng.random_array::<3>();
        let kinds = match (3. * flavour) as usize {
            0 => [ObjectKind::Electron, ObjectKind::Electron],
            1 => [ObjectKind::Muon, ObjectKind::Muon],
            _ => [ObjectKind::Electron, ObjectKind::Muon],
        };
        let first_charge = if sign_draw < 0.5 { 1 } else { -1 };
        let second_charge = if charge_draw < OPPOSITE_CHARGE_RATE {
            -first_charge
        } else {
            first_charge
        };
        builder.add_lepton(rng, kinds[0], 25., 40., first_charge);
        builder.add_lepton(rng, kinds[1], 10., 30., second_charge);

        // Jets, with a geometric multiplicity distribution
        let continue_prob = self.mean_jets / (1. + self.mean_jets);
        let mut num_jets = 0;
        while num_jets < MAX_JETS && rng.random() < continue_prob {
            builder.add_jet(rng);
            num_jets += 1;
        }

        // Underlying event
        let num_soft = (rng.random() * (MAX_SOFT_TRACKS + 1) as Float) as usize;
        for _ in 0..num_soft {
            let [pt, eta, phi] = rng.random_array::<3>();
            let track = builder.particle(
                ObjectKind::Track,
                0.3 + exponential(pt, 1.5),
                uniform(eta, -2.5, 2.5),
                uniform(phi, -PI, PI),
            );
            builder.tracks.push(track);
        }

        // Invisible particles
        let [pt, phi] = rng.random_array::<2>();
        let invisible_pt = exponential(pt, self.met_scale);
        let invisible_phi = uniform(phi, -PI, PI);
        builder.invisible += Transverse::new(
            invisible_pt * invisible_phi.cos(),
            invisible_pt * invisible_phi.sin(),
        );

        builder.build()
    }
}

/// Accumulates the objects of an event under construction
struct EventBuilder {
    next_source: u32,
    electrons_loose: Vec<PhysicsObject>,
    electrons_tight: Vec<PhysicsObject>,
    muons: Vec<PhysicsObject>,
    jets: Vec<PhysicsObject>,
    tracks: Vec<PhysicsObject>,
    towers: Vec<PhysicsObject>,
    /// Transverse momentum which the calorimeter does not measure
    invisible: Transverse,
}
//
impl EventBuilder {
    fn new() -> Self {
        Self {
            next_source: 0,
            electrons_loose: Vec::new(),
            electrons_tight: Vec::new(),
            muons: Vec::new(),
            jets: Vec::new(),
            tracks: Vec::new(),
            towers: Vec::new(),
            invisible: Transverse::zero(),
        }
    }

    /// Allocate a fresh source identifier
    fn source(&mut self) -> SourceId {
        self.next_source += 1;
        SourceId(self.next_source)
    }

    /// Build a massless object with its own source identifier
    fn particle(&mut self, kind: ObjectKind, pt: Float, eta: Float, phi: Float) -> PhysicsObject {
        let source = self.source();
        PhysicsObject::new(kind, pt, eta, phi, 0.).with_source(source)
    }

    /// Add a lepton, along with its track and calorimeter deposit
    fn add_lepton(
        &mut self,
        rng: &mut RandomGenerator,
        kind: ObjectKind,
        min_pt: Float,
        pt_scale: Float,
        charge: i8,
    ) {
        let [pt, eta, phi, tight] = rng.random_array::<4>();
        let pt = min_pt + exponential(pt, pt_scale);
        let eta = uniform(eta, -2.6, 2.6);
        let phi = uniform(phi, -PI, PI);

        let source = self.source();
        let lepton = PhysicsObject::new(kind, pt, eta, phi, 0.)
            .with_source(source)
            .with_charge(charge);
        self.tracks
            .push(PhysicsObject::new(ObjectKind::Track, pt, eta, phi, 0.).with_source(source));
        match kind {
            ObjectKind::Electron => {
                self.towers
                    .push(PhysicsObject::new(ObjectKind::Tower, pt, eta, phi, 0.).with_source(source));
                if tight < TIGHT_RATE {
                    self.electrons_tight.push(lepton.clone());
                }
                self.electrons_loose.push(lepton);
            }
            ObjectKind::Muon => {
                // Minimum-ionizing deposit
                self.towers
                    .push(PhysicsObject::new(ObjectKind::Tower, 1.5, eta, phi, 0.).with_source(source));
                self.invisible += lepton.transverse();
                self.muons.push(lepton);
            }
            _ => unreachable!("Only electrons and muons are leptons"),
        }
    }

    /// Add a jet, along with its constituent tracks and calorimeter deposit
    fn add_jet(&mut self, rng: &mut RandomGenerator) {
        let [pt, eta, phi, b_tag, mass] = rng.random_array::<5>();
        let pt = 20. + exponential(pt, 30.);
        let eta = uniform(eta, -4.5, 4.5);
        let phi = uniform(phi, -PI, PI);
        let central = abs(eta) < 2.5;

        // Charged constituents can only be seen within the tracker
        let mut constituents = Vec::new();
        if central {
            let num_tracks = 2 + (rng.random() * 4.) as usize;
            for _ in 0..num_tracks {
                let [share, d_eta, d_phi] = rng.random_array::<3>();
                let track = self.particle(
                    ObjectKind::Track,
                    pt * (0.05 + 0.15 * share),
                    eta + uniform(d_eta, -0.1, 0.1),
                    phi + uniform(d_phi, -0.1, 0.1),
                );
                constituents.extend(track.source());
                self.tracks.push(track);
            }
        }

        self.towers
            .push(PhysicsObject::new(ObjectKind::Tower, 0.4 * pt, eta, phi, 0.));
        self.jets.push(
            PhysicsObject::new(ObjectKind::Jet, pt, eta, phi, 2. + 10. * mass)
                .with_b_tag(central && b_tag < B_TAG_RATE)
                .with_constituents(constituents),
        );
    }

    fn build(self) -> EventObjects {
        EventObjects {
            electrons_loose: ObjectCollection::new(self.electrons_loose),
            electrons_tight: ObjectCollection::new(self.electrons_tight),
            muons: ObjectCollection::new(self.muons),
            jets: ObjectCollection::new(self.jets),
            tracks: ObjectCollection::new(self.tracks),
            towers: ObjectCollection::new(self.towers),
            missing_et: MissingEnergy::from_transverse(self.invisible),
            weight: 1.,
        }
    }
}

/// Map a uniform draw from [0, 1) to an exponential distribution
fn exponential(draw: Float, scale: Float) -> Float {
    -scale * ln(1. - draw)
}

/// Map a uniform draw from [0, 1) to [low, high)
fn uniform(draw: Float, low: Float, high: Float) -> Float {
    low + (high - low) * draw
}
