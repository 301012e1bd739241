//! Missing-energy derived discriminants
//!
//! Besides the calorimeter-based missing transverse momentum supplied with the
//! event, analyses rely on two independent estimates: one from tracks only,
//! and one from hard jets plus a track-based soft term. Comparing directions
//! between estimates rejects events whose energy was mismeasured.

use crate::{
    collection::ObjectCollection,
    event::MissingEnergy,
    momentum::Transverse,
    numeric::{floats::consts::FRAC_PI_2, Float},
    object::{PhysicsObject, SourceId},
    phasespace::PhaseSpace,
};
use num_traits::Zero;
use prefix_num_ops::real::*;
use std::collections::HashSet;

/// Track-based missing transverse momentum
///
/// Negated vector sum of the tracks accepted by `window`.
///
pub fn track_met(tracks: &ObjectCollection, window: &PhaseSpace) -> MissingEnergy {
    let visible = tracks
        .iter()
        .filter(|track| window.contains(track))
        .fold(Transverse::zero(), |acc, track| acc + track.transverse());
    MissingEnergy::from_transverse(-visible)
}

/// Missing transverse momentum from jets plus a track-based soft term
///
/// Every jet contributes its full momentum. Tracks contribute to the soft term
/// unless they were clustered into one of the jets, which is only checked for
/// tracks above `constituent_min_pt`: softer tracks always count as soft.
///
pub fn soft_term_met(
    jets: &ObjectCollection,
    tracks: &ObjectCollection,
    constituent_min_pt: Float,
) -> MissingEnergy {
    let clustered: HashSet<SourceId> = jets
        .iter()
        .flat_map(|jet| jet.constituents().iter().copied())
        .collect();
    let in_jet = |track: &PhysicsObject| {
        track.pt() > constituent_min_pt
            && track.source().map_or(false, |source| clustered.contains(&source))
    };

    let hard = jets
        .iter()
        .fold(Transverse::zero(), |acc, jet| acc + jet.transverse());
    let soft = tracks
        .iter()
        .filter(|track| !in_jet(track))
        .fold(Transverse::zero(), |acc, track| acc + track.transverse());
    MissingEnergy::from_transverse(-(hard + soft))
}

/// Azimuthal separation between two missing energy estimates, in [0, π]
pub fn met_consistency(a: &MissingEnergy, b: &MissingEnergy) -> Float {
    abs(a.delta_phi(b))
}

/// Relative missing transverse energy
///
/// When the closest lepton or jet lies within π/2 in azimuth of the missing
/// momentum, only the component of the missing momentum transverse to that
/// object is kept. This suppresses events whose imbalance comes from a
/// mismeasured object.
///
pub fn met_rel<'a>(
    met: &MissingEnergy,
    objects: impl IntoIterator<Item = &'a PhysicsObject>,
) -> Float {
    let met_phi = met.phi();
    let closest = objects
        .into_iter()
        .map(|obj| abs(crate::angular::delta_phi(obj.phi(), met_phi)))
        .fold(Float::INFINITY, Float::min);
    if closest < FRAC_PI_2 {
        met.et() * closest.sin()
    } else {
        met.et()
    }
}
