//! A propagator enforcing `x + offset <= y` at the bounds level.
//!
//! This is the workhorse inequality of the packing model: it expresses both
//! containment (`x[i] + size(i) <= s`) and the symmetry-breaking order
//! `y[0] <= x[0]` (with a zero offset).

use crate::solver::{
    domain::{DomainStore, VariableId},
    propagator::{PropagationResult, PropagationStatus, PropagatorDescriptor},
};

/// Enforces `x + offset <= y`.
#[derive(Debug, Clone)]
pub struct PlusLeq {
    x: VariableId,
    offset: i32,
    y: VariableId,
}

impl PlusLeq {
    pub fn new(x: VariableId, offset: i32, y: VariableId) -> Self {
        Self { x, offset, y }
    }

    pub(crate) fn variables(&self) -> Vec<VariableId> {
        vec![self.x, self.y]
    }

    pub(crate) fn descriptor(&self) -> PropagatorDescriptor {
        PropagatorDescriptor {
            name: "PlusLeq".to_string(),
            description: format!("{} + {} <= {}", self.x, self.offset, self.y),
        }
    }

    pub(crate) fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        let y_max = store.max(self.y);
        let x_min = store.min(self.x);

        let mut changed = false;
        changed |= store.shrink_upper(self.x, y_max - self.offset)?.changed();
        changed |= store.shrink_lower(self.y, x_min + self.offset)?.changed();

        if store.max(self.x) + self.offset <= store.min(self.y) {
            return Ok(PropagationStatus::Entailed);
        }
        Ok(if changed {
            PropagationStatus::Changed
        } else {
            PropagationStatus::Unchanged
        })
    }
}
