//! Ordered collections of reconstructed objects

use crate::object::PhysicsObject;
use std::{ops::Index, slice};

/// A sequence of objects sorted by decreasing transverse momentum
///
/// The ordering is an invariant of the type, not a convention: "keep the
/// hardest" overlap removal and "leading lepton" selections rely on it. It is
/// established on construction and every operation preserves it.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ObjectCollection(Vec<PhysicsObject>);
//
impl ObjectCollection {
    /// Build a collection, sorting the objects by decreasing pt
    ///
    /// The sort is stable, so objects of equal pt keep their input order.
    ///
    pub fn new(mut objects: Vec<PhysicsObject>) -> Self {
        objects.sort_by(|a, b| b.pt().total_cmp(&a.pt()));
        Self(objects)
    }

    /// Build an empty collection
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// Keep the objects matching a predicate, in their current order
    pub fn filtered(&self, mut keep: impl FnMut(&PhysicsObject) -> bool) -> Self {
        Self(self.0.iter().filter(|obj| keep(obj)).cloned().collect())
    }

    /// Keep the objects whose index matches a predicate
    pub(crate) fn filtered_by_index(&self, mut keep: impl FnMut(usize) -> bool) -> Self {
        Self(
            self.0
                .iter()
                .enumerate()
                .filter(|(idx, _)| keep(*idx))
                .map(|(_, obj)| obj.clone())
                .collect(),
        )
    }

    /// Number of objects
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Truth that there are no objects
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over the objects, hardest first
    pub fn iter(&self) -> slice::Iter<'_, PhysicsObject> {
        self.0.iter()
    }

    /// Truth that the ordering invariant holds
    pub fn is_sorted(&self) -> bool {
        self.0.windows(2).all(|pair| pair[0].pt() >= pair[1].pt())
    }
}

impl Index<usize> for ObjectCollection {
    type Output = PhysicsObject;

    fn index(&self, idx: usize) -> &PhysicsObject {
        &self.0[idx]
    }
}

impl<'a> IntoIterator for &'a ObjectCollection {
    type Item = &'a PhysicsObject;
    type IntoIter = slice::Iter<'a, PhysicsObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<PhysicsObject> for ObjectCollection {
    fn from_iter<I: IntoIterator<Item = PhysicsObject>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{numeric::Float, object::ObjectKind};

    fn jet(pt: Float, eta: Float) -> PhysicsObject {
        PhysicsObject::new(ObjectKind::Jet, pt, eta, 0., 0.)
    }

    #[test]
    fn construction_sorts_hardest_first() {
        let coll = ObjectCollection::new(vec![jet(20., 0.), jet(50., 1.), jet(35., 2.)]);
        let pts: Vec<_> = coll.iter().map(PhysicsObject::pt).collect();
        assert_eq!(pts, vec![50., 35., 20.]);
        assert!(coll.is_sorted());
    }

    #[test]
    fn ties_keep_input_order() {
        let coll: ObjectCollection = vec![jet(30., 1.), jet(30., 2.), jet(30., 3.)]
            .into_iter()
            .collect();
        let etas: Vec<_> = coll.iter().map(PhysicsObject::eta).collect();
        assert_eq!(etas, vec![1., 2., 3.]);
    }

    #[test]
    fn filtering_preserves_order() {
        let coll = ObjectCollection::new(vec![jet(20., 0.), jet(50., 1.), jet(35., 2.)]);
        let central = coll.filtered(|obj| obj.eta() < 1.5);
        assert_eq!(central.len(), 2);
        assert_eq!(central[0].pt(), 50.);
        assert_eq!(central[1].pt(), 20.);
    }
}
