//! Angular separations in the (pseudo)rapidity-azimuth plane

use crate::numeric::{
    floats::consts::{PI, TAU},
    Float,
};
use prefix_num_ops::real::*;

/// Longitudinal coordinate used when measuring an angular separation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Longitudinal {
    /// Pseudorapidity, a purely geometrical direction
    #[default]
    Pseudorapidity,

    /// Rapidity, which accounts for the object's mass
    Rapidity,
}

/// Wrap an azimuthal angle difference into (-π, π]
pub fn wrap_phi(dphi: Float) -> Float {
    let wrapped = dphi.rem_euclid(TAU);
    if wrapped > PI {
        wrapped - TAU
    } else {
        wrapped
    }
}

/// Signed azimuthal difference phi1 - phi2, wrapped into (-π, π]
pub fn delta_phi(phi1: Float, phi2: Float) -> Float {
    wrap_phi(phi1 - phi2)
}

/// Angular separation ΔR = sqrt(Δη² + Δφ²) between two directions
pub fn delta_r(eta1: Float, phi1: Float, eta2: Float, phi2: Float) -> Float {
    let deta = eta1 - eta2;
    let dphi = delta_phi(phi1, phi2);
    sqrt(deta * deta + dphi * dphi)
}
