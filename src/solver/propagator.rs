//! The propagator interface seen by the engine.
//!
//! The model only ever posts a small, closed set of propagator kinds, so
//! they live in one enum and the engine stores them by value; dispatch is a
//! plain `match` instead of a virtual call through a boxed trait object.

use crate::solver::{
    domain::{DomainStore, VariableId},
    events::Contradiction,
    propagators::{AtLeastOne, NoOverlap, PlusLeq, ReifiedPlusLeq},
};

/// What a propagator run concluded.
///
/// A run that narrowed intervals may still conclude `Entailed`; the change
/// events it queued on the store fire either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropagationStatus {
    /// Nothing was narrowed and the relation is not yet guaranteed.
    Unchanged,
    /// At least one interval was narrowed.
    Changed,
    /// The relation now holds for every remaining combination of values;
    /// the propagator never needs to run again on this branch.
    Entailed,
}

/// The result of one propagator run.
pub type PropagationResult = Result<PropagationStatus, Contradiction>;

/// Human-readable identification of a propagator, used when rendering the
/// statistics table.
#[derive(Debug, Clone)]
pub struct PropagatorDescriptor {
    pub name: String,
    pub description: String,
}

/// The closed set of propagator kinds the engine can run.
#[derive(Debug, Clone)]
pub enum Propagator {
    PlusLeq(PlusLeq),
    ReifiedPlusLeq(ReifiedPlusLeq),
    AtLeastOne(AtLeastOne),
    NoOverlap(NoOverlap),
}

impl Propagator {
    /// The variables whose change events should wake this propagator.
    pub fn variables(&self) -> Vec<VariableId> {
        match self {
            Propagator::PlusLeq(p) => p.variables(),
            Propagator::ReifiedPlusLeq(p) => p.variables(),
            Propagator::AtLeastOne(p) => p.variables(),
            Propagator::NoOverlap(p) => p.variables(),
        }
    }

    pub fn descriptor(&self) -> PropagatorDescriptor {
        match self {
            Propagator::PlusLeq(p) => p.descriptor(),
            Propagator::ReifiedPlusLeq(p) => p.descriptor(),
            Propagator::AtLeastOne(p) => p.descriptor(),
            Propagator::NoOverlap(p) => p.descriptor(),
        }
    }

    /// Runs the propagator once against the current intervals.
    pub fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        match self {
            Propagator::PlusLeq(p) => p.propagate(store),
            Propagator::ReifiedPlusLeq(p) => p.propagate(store),
            Propagator::AtLeastOne(p) => p.propagate(store),
            Propagator::NoOverlap(p) => p.propagate(store),
        }
    }
}

impl From<PlusLeq> for Propagator {
    fn from(p: PlusLeq) -> Self {
        Propagator::PlusLeq(p)
    }
}

impl From<ReifiedPlusLeq> for Propagator {
    fn from(p: ReifiedPlusLeq) -> Self {
        Propagator::ReifiedPlusLeq(p)
    }
}

impl From<AtLeastOne> for Propagator {
    fn from(p: AtLeastOne) -> Self {
        Propagator::AtLeastOne(p)
    }
}

impl From<NoOverlap> for Propagator {
    fn from(p: NoOverlap) -> Self {
        Propagator::NoOverlap(p)
    }
}
