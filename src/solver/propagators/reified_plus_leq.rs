//! A reified form of [`PlusLeq`](super::PlusLeq): `flag <=> (x + offset <= y)`.
//!
//! The flag is an ordinary `[0, 1]` variable. While it is open the propagator
//! only watches for the relation becoming decided; once the flag is fixed,
//! the relation (or its negation) is enforced on `x` and `y`.

use crate::solver::{
    domain::{DomainStore, VariableId},
    propagator::{PropagationResult, PropagationStatus, PropagatorDescriptor},
};

/// Enforces `flag <=> (x + offset <= y)`.
#[derive(Debug, Clone)]
pub struct ReifiedPlusLeq {
    flag: VariableId,
    x: VariableId,
    offset: i32,
    y: VariableId,
}

impl ReifiedPlusLeq {
    pub fn new(flag: VariableId, x: VariableId, offset: i32, y: VariableId) -> Self {
        Self { flag, x, offset, y }
    }

    pub(crate) fn variables(&self) -> Vec<VariableId> {
        vec![self.flag, self.x, self.y]
    }

    pub(crate) fn descriptor(&self) -> PropagatorDescriptor {
        PropagatorDescriptor {
            name: "ReifiedPlusLeq".to_string(),
            description: format!(
                "{} <=> ({} + {} <= {})",
                self.flag, self.x, self.offset, self.y
            ),
        }
    }

    pub(crate) fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        match store.value(self.flag) {
            Some(1) => self.enforce_holds(store),
            Some(_) => self.enforce_fails(store),
            None => self.decide(store),
        }
    }

    /// The flag is fixed true: behave exactly like `PlusLeq`.
    fn enforce_holds(&self, store: &mut DomainStore) -> PropagationResult {
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

    /// The flag is fixed false: enforce the negation, `x + offset >= y + 1`.
    fn enforce_fails(&self, store: &mut DomainStore) -> PropagationResult {
        let y_min = store.min(self.y);
        let x_max = store.max(self.x);

        let mut changed = false;
        changed |= store
            .shrink_lower(self.x, y_min - self.offset + 1)?
            .changed();
        changed |= store
            .shrink_upper(self.y, x_max + self.offset - 1)?
            .changed();

        if store.min(self.x) + self.offset > store.max(self.y) {
            return Ok(PropagationStatus::Entailed);
        }
        Ok(if changed {
            PropagationStatus::Changed
        } else {
            PropagationStatus::Unchanged
        })
    }

    /// The flag is still open: fix it as soon as the bounds decide the
    /// relation one way or the other.
    fn decide(&self, store: &mut DomainStore) -> PropagationResult {
        if store.max(self.x) + self.offset <= store.min(self.y) {
            store.assign(self.flag, 1)?;
            return Ok(PropagationStatus::Entailed);
        }
        if store.min(self.x) + self.offset > store.max(self.y) {
            store.assign(self.flag, 0)?;
            return Ok(PropagationStatus::Entailed);
        }
        Ok(PropagationStatus::Unchanged)
    }
}
