//! Overlap removal between and within object collections
//!
//! Overlap removal resolves the ambiguity of one physical deposit being
//! reconstructed as several objects. Each removal step depends on the outcome
//! of the previous ones, so the sequence of steps is itself part of an
//! analysis definition. It is expressed as data (`OverlapPlan`) rather than as
//! a series of calls, so that it can be inspected and tested on its own.

use crate::{
    angular::Longitudinal,
    collection::ObjectCollection,
    event::{CollectionId, EventObjects},
    numeric::Float,
};

/// What to do with a pair of overlapping objects from the same collection
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TieBreak {
    /// Discard the softer object of the pair
    KeepHardest,

    /// Discard both objects of the pair
    RemoveAll,
}

/// Resolve overlaps within a single collection
///
/// Two objects overlap when their separation is strictly below `delta_r`.
///
/// In `KeepHardest` mode, objects are considered from hardest to softest and
/// an object is kept unless it overlaps with an object that was already kept.
/// A soft object that only overlapped with a removed object thus survives.
///
/// In `RemoveAll` mode, every object overlapping with any other object of the
/// input collection is discarded.
///
pub fn remove_self_overlap(
    objects: &ObjectCollection,
    delta_r: Float,
    tie_break: TieBreak,
    longitudinal: Longitudinal,
) -> ObjectCollection {
    match tie_break {
        TieBreak::KeepHardest => {
            let mut kept: Vec<usize> = Vec::with_capacity(objects.len());
            for (idx, candidate) in objects.iter().enumerate() {
                let overlaps = kept
                    .iter()
                    .any(|&k| objects[k].delta_r(candidate, longitudinal) < delta_r);
                if !overlaps {
                    kept.push(idx);
                }
            }
            objects.filtered_by_index(|idx| kept.contains(&idx))
        }
        TieBreak::RemoveAll => {
            let mut overlapping = vec![false; objects.len()];
            for i in 0..objects.len() {
                for j in i + 1..objects.len() {
                    if objects[i].delta_r(&objects[j], longitudinal) < delta_r {
                        overlapping[i] = true;
                        overlapping[j] = true;
                    }
                }
            }
            objects.filtered_by_index(|idx| !overlapping[idx])
        }
    }
}

/// Discard every primary object lying within `delta_r` of any veto object
///
/// The veto collection is left untouched. An empty veto collection leaves the
/// primary collection unchanged.
///
pub fn remove_cross_overlap(
    primary: &ObjectCollection,
    veto: &ObjectCollection,
    delta_r: Float,
    longitudinal: Longitudinal,
) -> ObjectCollection {
    primary.filtered(|candidate| {
        veto.iter()
            .all(|vetoer| candidate.delta_r(vetoer, longitudinal) >= delta_r)
    })
}

/// Against what a collection's objects are checked for overlaps
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Against {
    /// Other objects of the same collection
    Itself(TieBreak),

    /// Objects of another collection, which act as a veto
    Collection(CollectionId),
}

/// One overlap removal step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OverlapStep {
    /// Collection from which objects are removed
    pub target: CollectionId,

    /// Objects that the target collection is checked against
    pub against: Against,

    /// Separation below which two objects overlap
    pub delta_r: Float,

    /// Longitudinal coordinate of the separation
    pub longitudinal: Longitudinal,
}
//
impl OverlapStep {
    /// Resolve overlaps within one collection
    pub fn within(target: CollectionId, delta_r: Float, tie_break: TieBreak) -> Self {
        Self {
            target,
            against: Against::Itself(tie_break),
            delta_r,
            longitudinal: Longitudinal::default(),
        }
    }

    /// Remove target objects which overlap with objects of a veto collection
    pub fn against(target: CollectionId, veto: CollectionId, delta_r: Float) -> Self {
        assert_ne!(target, veto, "Use OverlapStep::within for self-overlaps");
        Self {
            target,
            against: Against::Collection(veto),
            delta_r,
            longitudinal: Longitudinal::default(),
        }
    }

    /// Measure separations in rapidity rather than pseudorapidity
    pub fn in_rapidity(mut self) -> Self {
        self.longitudinal = Longitudinal::Rapidity;
        self
    }

    /// Apply this step to an event
    pub fn apply(&self, event: &mut EventObjects) {
        let reduced = match self.against {
            Against::Itself(tie_break) => remove_self_overlap(
                event.collection(self.target),
                self.delta_r,
                tie_break,
                self.longitudinal,
            ),
            Against::Collection(veto) => remove_cross_overlap(
                event.collection(self.target),
                event.collection(veto),
                self.delta_r,
                self.longitudinal,
            ),
        };
        *event.collection_mut(self.target) = reduced;
    }
}

/// Ordered sequence of overlap removal steps
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverlapPlan(Vec<OverlapStep>);
//
impl OverlapPlan {
    /// Build a plan whose steps will run in the given order
    pub fn new(steps: Vec<OverlapStep>) -> Self {
        Self(steps)
    }

    /// Steps of the plan, in execution order
    pub fn steps(&self) -> &[OverlapStep] {
        &self.0
    }

    /// Run every step of the plan on an event, in order
    pub fn apply(&self, event: &mut EventObjects) {
        for step in &self.0 {
            step.apply(event);
        }
    }
}
