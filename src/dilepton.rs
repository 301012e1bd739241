//! Construction and tagging of the signal lepton pair

use crate::{
    angular::Longitudinal,
    collection::ObjectCollection,
    event::MissingEnergy,
    momentum::{Kinematics, Momentum},
    numeric::Float,
    object::PhysicsObject,
};
use prefix_num_ops::real::*;

/// Flavour content of a lepton pair
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Two electrons
    ElectronElectron,
    /// Two muons
    MuonMuon,
    /// One electron and one muon
    ElectronMuon,
}
//
impl Channel {
    /// Short label used in cutflow checkpoint names
    pub fn label(self) -> &'static str {
        match self {
            Channel::ElectronElectron => "ee",
            Channel::MuonMuon => "mumu",
            Channel::ElectronMuon => "emu",
        }
    }

    /// Truth that both leptons have the same flavour
    pub fn is_same_flavour(self) -> bool {
        self != Channel::ElectronMuon
    }

    /// Suffix of flavour-split signal region names
    pub fn region_suffix(self) -> &'static str {
        if self.is_same_flavour() {
            "SF"
        } else {
            "DF"
        }
    }
}

/// A pair of signal leptons, leading lepton first
#[derive(Clone, Debug, PartialEq)]
pub struct Dilepton {
    leading: PhysicsObject,
    subleading: PhysicsObject,
    channel: Channel,
    momentum: Momentum,
}
//
impl Dilepton {
    /// Build the pair from the signal electrons and muons of an event
    ///
    /// Returns None unless there are exactly two signal leptons in total.
    ///
    pub fn from_signal_leptons(
        electrons: &ObjectCollection,
        muons: &ObjectCollection,
    ) -> Option<Self> {
        let (first, second, channel) = match (electrons.len(), muons.len()) {
            (2, 0) => (&electrons[0], &electrons[1], Channel::ElectronElectron),
            (0, 2) => (&muons[0], &muons[1], Channel::MuonMuon),
            (1, 1) => (&electrons[0], &muons[0], Channel::ElectronMuon),
            _ => return None,
        };
        let (leading, subleading) = if second.pt() > first.pt() {
            (second, first)
        } else {
            (first, second)
        };
        Some(Self {
            momentum: leading.momentum() + subleading.momentum(),
            leading: leading.clone(),
            subleading: subleading.clone(),
            channel,
        })
    }

    /// Lepton with the highest pt
    pub fn leading(&self) -> &PhysicsObject {
        &self.leading
    }

    /// Lepton with the lowest pt
    pub fn subleading(&self) -> &PhysicsObject {
        &self.subleading
    }

    /// Flavour content of the pair
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// Truth that the leptons have known, opposite charges
    pub fn is_opposite_charge(&self) -> bool {
        match (self.leading.charge(), self.subleading.charge()) {
            (Some(q1), Some(q2)) => q1 * q2 < 0,
            _ => false,
        }
    }

    /// 4-momentum of the pair
    pub fn momentum(&self) -> &Momentum {
        &self.momentum
    }

    /// Invariant mass of the pair (mll)
    pub fn mass(&self) -> Float {
        self.momentum.mass()
    }

    /// Transverse momentum of the pair (pTll)
    pub fn pt(&self) -> Float {
        self.momentum.pt()
    }

    /// Angular separation between the two leptons
    pub fn delta_r(&self) -> Float {
        self.leading
            .delta_r(&self.subleading, Longitudinal::Pseudorapidity)
    }

    /// Azimuthal opening angle between the two leptons, in [0, π]
    pub fn delta_phi(&self) -> Float {
        abs(self.leading.delta_phi(&self.subleading))
    }

    /// Azimuthal separation between the pair and the missing momentum
    pub fn delta_phi_to(&self, met: &MissingEnergy) -> Float {
        abs(self.momentum.delta_phi(&met.momentum()))
    }
}
