//! Reconstructed particle candidates

use crate::{
    angular::{self, Longitudinal},
    momentum::{self, Kinematics, Momentum, Transverse},
    numeric::Float,
};

/// Kind of reconstructed object
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    /// Electron candidate
    Electron,
    /// Muon candidate
    Muon,
    /// Hadronic jet
    Jet,
    /// Charged-particle track
    Track,
    /// Calorimeter tower, whose "pt" is its transverse energy
    Tower,
}

/// Identity of the generated particle an object was reconstructed from
///
/// A lepton and its own track or calorimeter deposit share the same source,
/// which is how isolation recognizes them regardless of their positions.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(pub u32);

/// A reconstructed particle candidate
///
/// Objects are immutable for the duration of an event. Collider coordinates
/// and the derived 4-momentum are both stored, since selections use the
/// former and composite kinematics use the latter.
///
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsObject {
    kind: ObjectKind,
    pt: Float,
    eta: Float,
    phi: Float,
    p4: Momentum,
    charge: Option<i8>,
    b_tagged: bool,
    source: Option<SourceId>,
    constituents: Vec<SourceId>,
}
//
impl PhysicsObject {
    /// Build an object from its collider coordinates and mass
    pub fn new(kind: ObjectKind, pt: Float, eta: Float, phi: Float, mass: Float) -> Self {
        assert!(pt >= 0., "Transverse momentum must be non-negative, got {pt}");
        Self {
            kind,
            pt,
            eta,
            phi: angular::wrap_phi(phi),
            p4: momentum::from_pt_eta_phi_m(pt, eta, phi, mass),
            charge: None,
            b_tagged: false,
            source: None,
            constituents: Vec::new(),
        }
    }

    /// Attach an electric charge (±1)
    pub fn with_charge(mut self, charge: i8) -> Self {
        assert!(charge == 1 || charge == -1, "Charge must be ±1, got {charge}");
        self.charge = Some(charge);
        self
    }

    /// Attach the externally supplied b-tagging decision (jets only)
    pub fn with_b_tag(mut self, b_tagged: bool) -> Self {
        assert_eq!(self.kind, ObjectKind::Jet, "Only jets can be b-tagged");
        self.b_tagged = b_tagged;
        self
    }

    /// Attach the generated particle this object originates from
    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Attach the generated particles clustered into this jet
    pub fn with_constituents(mut self, constituents: Vec<SourceId>) -> Self {
        assert_eq!(self.kind, ObjectKind::Jet, "Only jets have constituents");
        self.constituents = constituents;
        self
    }

    /// Kind of object
    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Transverse momentum (GeV)
    pub fn pt(&self) -> Float {
        self.pt
    }

    /// Pseudorapidity
    pub fn eta(&self) -> Float {
        self.eta
    }

    /// Azimuthal angle
    pub fn phi(&self) -> Float {
        self.phi
    }

    /// Rapidity, computed from the 4-momentum
    pub fn rapidity(&self) -> Float {
        self.p4.rapidity()
    }

    /// 4-momentum
    pub fn momentum(&self) -> &Momentum {
        &self.p4
    }

    /// Transverse projection of the momentum
    pub fn transverse(&self) -> Transverse {
        self.p4.transverse()
    }

    /// Electric charge, for charged leptons
    pub fn charge(&self) -> Option<i8> {
        self.charge
    }

    /// Truth that this is a b-tagged jet
    pub fn is_b_tagged(&self) -> bool {
        self.b_tagged
    }

    /// Generated particle this object comes from, if known
    pub fn source(&self) -> Option<SourceId> {
        self.source
    }

    /// Sources of the tracks clustered into this jet
    pub fn constituents(&self) -> &[SourceId] {
        &self.constituents
    }

    /// Truth that both objects were reconstructed from the same particle
    pub fn shares_source_with(&self, other: &PhysicsObject) -> bool {
        matches!((self.source, other.source), (Some(a), Some(b)) if a == b)
    }

    /// Angular separation with another object
    pub fn delta_r(&self, other: &PhysicsObject, longitudinal: Longitudinal) -> Float {
        match longitudinal {
            Longitudinal::Pseudorapidity => {
                angular::delta_r(self.eta, self.phi, other.eta, other.phi)
            }
            Longitudinal::Rapidity => angular::delta_r(
                self.rapidity(),
                self.phi,
                other.rapidity(),
                other.phi,
            ),
        }
    }

    /// Signed, wrapped azimuthal difference with another object
    pub fn delta_phi(&self, other: &PhysicsObject) -> Float {
        angular::delta_phi(self.phi, other.phi)
    }
}
