use std::ops::Index;
use std::ops::IndexMut;

use crate::containers::KeyedVec;
use crate::engine::propagation::PropagatorIndex;
use crate::engine::Propagator;

/// Owns the propagators of the engine.
pub(crate) struct PropagatorStore<Domains> {
    propagators: KeyedVec<PropagatorIndex, Box<dyn Propagator<Domains>>>,
}

impl<Domains> Default for PropagatorStore<Domains> {
    fn default() -> Self {
        Self {
            propagators: KeyedVec::default(),
        }
    }
}

impl<Domains> std::fmt::Debug for PropagatorStore<Domains> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self
            .propagators
            .iter()
            .map(|propagator| propagator.name())
            .collect::<Vec<_>>();
        f.debug_struct("PropagatorStore")
            .field("propagators", &names)
            .finish()
    }
}

impl<Domains> PropagatorStore<Domains> {
    pub(crate) fn push(&mut self, propagator: Box<dyn Propagator<Domains>>) -> PropagatorIndex {
        self.propagators.push(propagator)
    }

    pub(crate) fn len(&self) -> usize {
        self.propagators.len()
    }

    pub(crate) fn keys(&self) -> impl Iterator<Item = PropagatorIndex> {
        self.propagators.keys()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &dyn Propagator<Domains>> {
        self.propagators.iter().map(|propagator| propagator.as_ref())
    }
}

impl<Domains> Index<PropagatorIndex> for PropagatorStore<Domains> {
    type Output = dyn Propagator<Domains>;

    fn index(&self, index: PropagatorIndex) -> &Self::Output {
        self.propagators[index].as_ref()
    }
}

impl<Domains> IndexMut<PropagatorIndex> for PropagatorStore<Domains> {
    fn index_mut(&mut self, index: PropagatorIndex) -> &mut Self::Output {
        self.propagators[index].as_mut()
    }
}
