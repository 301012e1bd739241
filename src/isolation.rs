//! Lepton isolation with a momentum-dependent track cone
//!
//! Genuine leptons from heavy particle decays are isolated, whereas leptons
//! produced inside jets are surrounded by other activity. This module sums the
//! activity around each lepton candidate in two cones:
//!
//! * A track cone whose radius shrinks as 1/pt above a certain momentum, since
//!   the decay products of boosted objects are collimated.
//! * A calorimeter cone of fixed radius.
//!
//! The lepton's own track (and, for electrons, its own calorimeter deposit) is
//! excluded by identity, not by distance, as it sits at ΔR = 0 of the lepton.

use crate::{
    angular::Longitudinal,
    collection::ObjectCollection,
    numeric::Float,
    object::PhysicsObject,
};
use prefix_num_ops::real::*;

/// Relative tolerance when deciding whether a lepton sits on the cone clamp
const CLAMP_TOLERANCE: Float = 4. * Float::EPSILON;

/// Self-exclusion rules of a lepton flavour
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeptonRules {
    /// Exclude the electron's own track and its own calorimeter shower
    Electron,

    /// Exclude the muon's own track only, the muon's minimum-ionizing deposit
    /// is counted as calorimeter activity
    Muon,
}

/// Parameters of the isolation criterion
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IsolationCone {
    /// Largest track cone radius, used at low momentum
    pub max_radius: Float,

    /// Momentum scale of the track cone, which has radius pt_scale / pt at
    /// high momentum (GeV)
    pub pt_scale: Float,

    /// Radius of the calorimeter cone
    pub calo_radius: Float,

    /// Maximal scalar track pt sum in the cone, as a fraction of lepton pt
    pub track_fraction: Float,

    /// Maximal calorimeter transverse energy in the cone, as a fraction of
    /// lepton pt. Calorimeter isolation is skipped if absent.
    pub calo_fraction: Option<Float>,

    /// Self-exclusion rules
    pub rules: LeptonRules,
}
//
impl IsolationCone {
    /// Track cone radius of a lepton, min(max_radius, pt_scale / pt)
    ///
    /// A lepton whose pt is pt_scale / max_radius gets exactly max_radius,
    /// however the floating-point division rounds.
    ///
    pub fn cone_radius(&self, pt: Float) -> Float {
        let scaled = self.pt_scale / pt;
        let on_clamp = abs(pt * self.max_radius - self.pt_scale) <= CLAMP_TOLERANCE * self.pt_scale;
        if on_clamp || scaled >= self.max_radius {
            self.max_radius
        } else {
            scaled
        }
    }

    /// Scalar pt sum of the tracks in the lepton's track cone
    pub fn track_activity(&self, lepton: &PhysicsObject, tracks: &ObjectCollection) -> Float {
        let radius = self.cone_radius(lepton.pt());
        tracks
            .iter()
            .filter(|track| !lepton.shares_source_with(track))
            .filter(|track| lepton.delta_r(track, Longitudinal::Pseudorapidity) < radius)
            .map(PhysicsObject::pt)
            .sum()
    }

    /// Transverse energy sum of the calorimeter towers in the lepton's
    /// calorimeter cone
    pub fn calo_activity(&self, lepton: &PhysicsObject, towers: &ObjectCollection) -> Float {
        let exclude_own = self.rules == LeptonRules::Electron;
        towers
            .iter()
            .filter(|tower| !(exclude_own && lepton.shares_source_with(tower)))
            .filter(|tower| lepton.delta_r(tower, Longitudinal::Pseudorapidity) < self.calo_radius)
            .map(PhysicsObject::pt)
            .sum()
    }

    /// Decide whether a lepton passes the isolation criterion
    pub fn is_isolated(
        &self,
        lepton: &PhysicsObject,
        tracks: &ObjectCollection,
        towers: &ObjectCollection,
    ) -> bool {
        let pt = lepton.pt();
        if self.track_activity(lepton, tracks) / pt >= self.track_fraction {
            return false;
        }
        match self.calo_fraction {
            Some(fraction) => self.calo_activity(lepton, towers) / pt < fraction,
            None => true,
        }
    }

    /// Keep the isolated leptons of a collection
    pub fn isolate(
        &self,
        leptons: &ObjectCollection,
        tracks: &ObjectCollection,
        towers: &ObjectCollection,
    ) -> ObjectCollection {
        leptons.filtered(|lepton| self.is_isolated(lepton, tracks, towers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{ObjectKind, SourceId};
    use approx::assert_relative_eq;

    fn cone(rules: LeptonRules) -> IsolationCone {
        IsolationCone {
            max_radius: 0.3,
            pt_scale: 10.,
            calo_radius: 0.3,
            track_fraction: 0.16,
            calo_fraction: Some(0.18),
            rules,
        }
    }

    fn electron(pt: Float) -> PhysicsObject {
        PhysicsObject::new(ObjectKind::Electron, pt, 0.5, 1.0, 0.000511).with_source(SourceId(1))
    }

    fn track(pt: Float, eta: Float, phi: Float, source: u32) -> PhysicsObject {
        PhysicsObject::new(ObjectKind::Track, pt, eta, phi, 0.).with_source(SourceId(source))
    }

    fn tower(et: Float, eta: Float, phi: Float, source: u32) -> PhysicsObject {
        PhysicsObject::new(ObjectKind::Tower, et, eta, phi, 0.).with_source(SourceId(source))
    }

    #[test]
    fn cone_radius_shrinks_at_high_pt() {
        let iso = cone(LeptonRules::Electron);
        assert_eq!(iso.cone_radius(10.), 0.3);
        assert_relative_eq!(iso.cone_radius(100.), 0.1);
        assert_eq!(iso.cone_radius(0.), 0.3);
    }

    #[test]
    fn cone_radius_is_exact_on_the_clamp() {
        for &(r_max, k) in &[(0.3, 10.), (0.2, 10.), (0.3, 7.), (0.4, 13.)] {
            let iso = IsolationCone {
                max_radius: r_max,
                pt_scale: k,
                ..cone(LeptonRules::Muon)
            };
            assert_eq!(iso.cone_radius(k / r_max), r_max);
        }
    }

    #[test]
    fn quiet_leptons_always_pass() {
        let empty = ObjectCollection::empty();
        for &pt in &[0.5, 10., 33.3, 250., 4000.] {
            for &fraction in &[1e-6, 0.1, 0.999] {
                let iso = IsolationCone {
                    track_fraction: fraction,
                    calo_fraction: Some(fraction),
                    ..cone(LeptonRules::Electron)
                };
                assert!(iso.is_isolated(&electron(pt), &empty, &empty));
            }
        }
    }

    #[test]
    fn own_track_is_excluded_by_identity() {
        let lepton = electron(40.);
        let tracks = ObjectCollection::new(vec![track(40., 0.5, 1.0, 1)]);
        let iso = cone(LeptonRules::Electron);
        assert_eq!(iso.track_activity(&lepton, &tracks), 0.);

        // The same track belonging to another particle spoils the isolation
        let foreign = ObjectCollection::new(vec![track(40., 0.5, 1.0, 2)]);
        assert!(!iso.is_isolated(&lepton, &foreign, &ObjectCollection::empty()));
    }

    #[test]
    fn track_cone_follows_the_lepton_momentum() {
        // An 8 GeV track at ΔR = 0.15 of the lepton
        let tracks = ObjectCollection::new(vec![track(8., 0.65, 1.0, 9)]);
        let iso = cone(LeptonRules::Muon);
        let empty = ObjectCollection::empty();

        // At 40 GeV the cone has radius 0.25 and contains the track
        let soft = electron(40.);
        assert_relative_eq!(iso.track_activity(&soft, &tracks), 8.);
        assert!(!iso.is_isolated(&soft, &tracks, &empty));

        // At 100 GeV the cone has radius 0.1 and misses it
        let hard = electron(100.);
        assert_eq!(iso.track_activity(&hard, &tracks), 0.);
        assert!(iso.is_isolated(&hard, &tracks, &empty));
    }

    #[test]
    fn electrons_and_muons_treat_their_own_deposit_differently() {
        let lepton = electron(30.);
        let towers = ObjectCollection::new(vec![tower(30., 0.5, 1.0, 1), tower(1., 0.6, 1.0, 5)]);
        let empty = ObjectCollection::empty();
        assert_relative_eq!(cone(LeptonRules::Electron).calo_activity(&lepton, &towers), 1.);
        assert_relative_eq!(cone(LeptonRules::Muon).calo_activity(&lepton, &towers), 31.);
        assert!(cone(LeptonRules::Electron).is_isolated(&lepton, &empty, &towers));
        assert!(!cone(LeptonRules::Muon).is_isolated(&lepton, &empty, &towers));

        let no_calo = IsolationCone {
            calo_fraction: None,
            ..cone(LeptonRules::Muon)
        };
        assert!(no_calo.is_isolated(&lepton, &empty, &towers));
    }

    #[test]
    fn isolation_does_not_depend_on_input_order() {
        let tracks = vec![
            track(1.5, 0.55, 1.05, 3),
            track(0.7, 0.45, 0.95, 4),
            track(2.2, 0.5, 1.1, 5),
        ];
        let iso = cone(LeptonRules::Electron);
        let lepton = electron(30.);
        let forward = ObjectCollection::new(tracks.clone());
        let backward = ObjectCollection::new(tracks.into_iter().rev().collect());
        assert_eq!(
            iso.track_activity(&lepton, &forward),
            iso.track_activity(&lepton, &backward)
        );
    }
}
