//! Mechanism to restrict object collections to the detector acceptance

use crate::{collection::ObjectCollection, numeric::Float, object::PhysicsObject};

/// Transverse momentum and pseudorapidity acceptance
///
/// Both bounds are exclusive: an object sitting exactly on a boundary is
/// rejected.
///
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhaseSpace {
    /// Minimal transverse momentum (GeV)
    pub min_pt: Float,

    /// Lower pseudorapidity bound
    pub eta_low: Float,

    /// Upper pseudorapidity bound
    pub eta_high: Float,
}
//
impl PhaseSpace {
    /// Setup an acceptance window
    pub fn new(min_pt: Float, eta_low: Float, eta_high: Float) -> Self {
        assert!(eta_low <= eta_high, "Pseudorapidity window is inverted");
        Self {
            min_pt,
            eta_low,
            eta_high,
        }
    }

    /// Setup an acceptance window which is symmetric in pseudorapidity
    pub fn symmetric(min_pt: Float, max_abs_eta: Float) -> Self {
        Self::new(min_pt, -max_abs_eta, max_abs_eta)
    }

    /// Decide whether an object lies inside the acceptance
    pub fn contains(&self, object: &PhysicsObject) -> bool {
        object.pt() > self.min_pt && self.eta_low < object.eta() && object.eta() < self.eta_high
    }

    /// Keep the objects lying inside the acceptance, in their current order
    pub fn filter(&self, objects: &ObjectCollection) -> ObjectCollection {
        objects.filtered(|obj| self.contains(obj))
    }
}
