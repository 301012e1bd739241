//! This module implements some domain-specific 4-momentum handling logic.

use crate::{angular, numeric::Float};
use nalgebra::{SVector, Vector2};
use prefix_num_ops::real::*;

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum
pub type Momentum = SVector<Float, MOMENTUM_DIM>;

/// Momentum projected on the plane transverse to the beam
pub type Transverse = Vector2<Float>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Pseudorapidity reported for momenta lying exactly along the beam
const BEAM_ETA: Float = 1e10;

/// Build a 4-momentum from collider coordinates
pub fn from_pt_eta_phi_m(pt: Float, eta: Float, phi: Float, mass: Float) -> Momentum {
    let px = pt * phi.cos();
    let py = pt * phi.sin();
    let pz = pt * eta.sinh();
    let e = sqrt(px * px + py * py + pz * pz + mass * mass);
    Momentum::new(px, py, pz, e)
}

/// Collider kinematics of a 4-momentum
pub trait Kinematics {
    /// Transverse projection (px, py)
    fn transverse(&self) -> Transverse;

    /// Transverse momentum
    fn pt(&self) -> Float {
        self.transverse().norm()
    }

    /// Azimuthal angle in (-π, π]
    fn phi(&self) -> Float;

    /// Pseudorapidity
    fn eta(&self) -> Float;

    /// Rapidity
    fn rapidity(&self) -> Float;

    /// Invariant mass, negative for space-like vectors
    fn mass(&self) -> Float;

    /// Transverse energy
    fn et(&self) -> Float;

    /// Wrapped azimuthal difference with another momentum
    fn delta_phi(&self, other: &Self) -> Float {
        angular::delta_phi(self.phi(), other.phi())
    }

    /// Angular separation with another momentum, in pseudorapidity space
    fn delta_r(&self, other: &Self) -> Float {
        angular::delta_r(self.eta(), self.phi(), other.eta(), other.phi())
    }
}

impl Kinematics for Momentum {
    fn transverse(&self) -> Transverse {
        Transverse::new(self[X], self[Y])
    }

    fn phi(&self) -> Float {
        if self[X] == 0. && self[Y] == 0. {
            0.
        } else {
            self[Y].atan2(self[X])
        }
    }

    fn eta(&self) -> Float {
        let pt = self.pt();
        if pt == 0. {
            if self[Z] == 0. {
                0.
            } else {
                BEAM_ETA.copysign(self[Z])
            }
        } else {
            (self[Z] / pt).asinh()
        }
    }

    fn rapidity(&self) -> Float {
        0.5 * ln((self[E] + self[Z]) / (self[E] - self[Z]))
    }

    fn mass(&self) -> Float {
        let m2 = self[E] * self[E] - self.fixed_rows::<3>(X).norm_squared();
        if m2 < 0. {
            -sqrt(-m2)
        } else {
            sqrt(m2)
        }
    }

    fn et(&self) -> Float {
        let pt = self.pt();
        let p = self.fixed_rows::<3>(X).norm();
        if p == 0. {
            0.
        } else {
            self[E] * pt / p
        }
    }
}
