//! This module defines the per-event input record of the selection pipeline

use crate::{
    angular,
    collection::ObjectCollection,
    momentum::{Momentum, Transverse},
    numeric::Float,
    object::PhysicsObject,
};
use prefix_num_ops::real::*;

/// Names of the object collections supplied with each event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CollectionId {
    /// Electrons passing loose identification
    ElectronsLoose,
    /// Electrons passing tight identification
    ElectronsTight,
    /// Muons
    Muons,
    /// Jets
    Jets,
    /// Charged-particle tracks
    Tracks,
    /// Calorimeter towers
    Towers,
}

/// Missing transverse momentum of an event
///
/// Seeded by the reconstruction from calorimeter information only. Objects
/// which the calorimeter did not measure (muons, mostly) are folded in with
/// `absorb`, which subtracts their transverse momentum from the imbalance.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MissingEnergy(Transverse);
//
impl MissingEnergy {
    /// Build from Cartesian components
    pub fn new(px: Float, py: Float) -> Self {
        Self(Transverse::new(px, py))
    }

    /// Build from a magnitude and an azimuthal direction
    pub fn from_et_phi(et: Float, phi: Float) -> Self {
        Self::new(et * phi.cos(), et * phi.sin())
    }

    /// Build from a transverse vector
    pub fn from_transverse(transverse: Transverse) -> Self {
        Self(transverse)
    }

    /// X component of the missing transverse momentum
    pub fn px(&self) -> Float {
        self.0.x
    }

    /// Y component of the missing transverse momentum
    pub fn py(&self) -> Float {
        self.0.y
    }

    /// Magnitude of the missing transverse momentum
    pub fn et(&self) -> Float {
        sqrt(self.0.x * self.0.x + self.0.y * self.0.y)
    }

    /// Direction of the missing transverse momentum
    pub fn phi(&self) -> Float {
        if self.0.x == 0. && self.0.y == 0. {
            0.
        } else {
            self.0.y.atan2(self.0.x)
        }
    }

    /// Missing transverse momentum as a vector
    pub fn transverse(&self) -> Transverse {
        self.0
    }

    /// Massless 4-vector embedding, with E = |pT| and no longitudinal part
    pub fn momentum(&self) -> Momentum {
        Momentum::new(self.0.x, self.0.y, 0., self.et())
    }

    /// Wrapped azimuthal difference with another missing energy estimate
    pub fn delta_phi(&self, other: &MissingEnergy) -> Float {
        angular::delta_phi(self.phi(), other.phi())
    }

    /// Fold an unmeasured object's momentum into the imbalance
    pub fn absorb(&mut self, object: &PhysicsObject) {
        self.0 -= object.transverse();
    }

    /// Fold a whole collection of unmeasured muons into the imbalance
    pub fn absorb_muons(&mut self, muons: &ObjectCollection) {
        for muon in muons {
            self.absorb(muon);
        }
    }
}

impl Default for MissingEnergy {
    fn default() -> Self {
        Self(Transverse::zeros())
    }
}

/// Everything the selection pipeline knows about one event
///
/// This record is built from the reconstruction output, handed over by value
/// to an analysis, and dropped once the analysis is done with it.
///
#[derive(Clone, Debug, PartialEq)]
pub struct EventObjects {
    /// Loosely identified electrons
    pub electrons_loose: ObjectCollection,
    /// Tightly identified electrons
    pub electrons_tight: ObjectCollection,
    /// Muons
    pub muons: ObjectCollection,
    /// Jets
    pub jets: ObjectCollection,
    /// Charged-particle tracks
    pub tracks: ObjectCollection,
    /// Calorimeter towers
    pub towers: ObjectCollection,
    /// Missing transverse momentum
    pub missing_et: MissingEnergy,
    /// Generator weight of the event
    pub weight: Float,
}
//
impl EventObjects {
    /// Build an event with no objects and unit weight
    pub fn new() -> Self {
        Self {
            electrons_loose: ObjectCollection::empty(),
            electrons_tight: ObjectCollection::empty(),
            muons: ObjectCollection::empty(),
            jets: ObjectCollection::empty(),
            tracks: ObjectCollection::empty(),
            towers: ObjectCollection::empty(),
            missing_et: MissingEnergy::default(),
            weight: 1.,
        }
    }

    /// Access a collection by name
    pub fn collection(&self, id: CollectionId) -> &ObjectCollection {
        match id {
            CollectionId::ElectronsLoose => &self.electrons_loose,
            CollectionId::ElectronsTight => &self.electrons_tight,
            CollectionId::Muons => &self.muons,
            CollectionId::Jets => &self.jets,
            CollectionId::Tracks => &self.tracks,
            CollectionId::Towers => &self.towers,
        }
    }

    /// Mutably access a collection by name
    pub fn collection_mut(&mut self, id: CollectionId) -> &mut ObjectCollection {
        match id {
            CollectionId::ElectronsLoose => &mut self.electrons_loose,
            CollectionId::ElectronsTight => &mut self.electrons_tight,
            CollectionId::Muons => &mut self.muons,
            CollectionId::Jets => &mut self.jets,
            CollectionId::Tracks => &mut self.tracks,
            CollectionId::Towers => &mut self.towers,
        }
    }
}

impl Default for EventObjects {
    fn default() -> Self {
        Self::new()
    }
}
