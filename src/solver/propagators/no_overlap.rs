//! The dedicated non-overlap propagator for a set of axis-aligned squares.
//!
//! Reasoning happens pairwise, anchored on fixed squares: once a square's
//! position is known, every other square must end up entirely on one of its
//! four sides. A side counts as possible while the other square's bounds
//! still admit it; when none remains the pair is unsatisfiable, and when
//! exactly one remains the corresponding bound is committed. Pairs without a
//! fixed square are left alone, since no single side can be ruled out at the
//! bounds level without one.

use crate::{
    error::{ModelError, Result},
    solver::{
        domain::{DomainStore, VariableId},
        events::Contradiction,
        propagator::{PropagationResult, PropagationStatus, PropagatorDescriptor},
    },
};

/// Enforces pairwise disjointness of a set of squares.
#[derive(Debug, Clone)]
pub struct NoOverlap {
    xs: Vec<VariableId>,
    ys: Vec<VariableId>,
    sizes: Vec<i32>,
}

impl NoOverlap {
    /// Builds the propagator. The three lists must be index-aligned, one
    /// entry per square.
    pub fn new(xs: Vec<VariableId>, ys: Vec<VariableId>, sizes: Vec<i32>) -> Result<Self> {
        if xs.len() != ys.len() || xs.len() != sizes.len() {
            return Err(ModelError::MismatchedLengths {
                xs: xs.len(),
                ys: ys.len(),
                sizes: sizes.len(),
            }
            .into());
        }
        Ok(Self { xs, ys, sizes })
    }

    pub(crate) fn variables(&self) -> Vec<VariableId> {
        self.xs.iter().chain(self.ys.iter()).copied().collect()
    }

    pub(crate) fn descriptor(&self) -> PropagatorDescriptor {
        PropagatorDescriptor {
            name: "NoOverlap".to_string(),
            description: format!("{} squares pairwise disjoint", self.sizes.len()),
        }
    }

    pub(crate) fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        let n = self.sizes.len();
        let mut changed = false;

        for i in 0..n {
            for j in (i + 1)..n {
                if let Some(anchor) = self.position(store, i) {
                    self.prune_pair(store, i, anchor, j, &mut changed)?;
                } else if let Some(anchor) = self.position(store, j) {
                    self.prune_pair(store, j, anchor, i, &mut changed)?;
                }
            }
        }

        if changed {
            // Bounds moved mid-sweep; the engine will run us again, and the
            // clean follow-up sweep is the one that may report entailment.
            return Ok(PropagationStatus::Changed);
        }
        let all_placed = (0..n).all(|i| self.position(store, i).is_some());
        if all_placed {
            return Ok(PropagationStatus::Entailed);
        }
        Ok(PropagationStatus::Unchanged)
    }

    /// The square's position, once both coordinates are fixed.
    fn position(&self, store: &DomainStore, i: usize) -> Option<(i32, i32)> {
        store.value(self.xs[i]).zip(store.value(self.ys[i]))
    }

    /// Square `anchor` sits at the fixed position `(ax, ay)`; square `other`
    /// must end up entirely on one of its four sides. Fails when no side is
    /// left and commits `other` to the side when exactly one is.
    fn prune_pair(
        &self,
        store: &mut DomainStore,
        anchor: usize,
        (ax, ay): (i32, i32),
        other: usize,
        changed: &mut bool,
    ) -> Result<(), Contradiction> {
        let anchor_size = self.sizes[anchor];
        let other_size = self.sizes[other];
        let (ox, oy) = (self.xs[other], self.ys[other]);

        let right = store.max(ox) >= ax + anchor_size;
        let left = store.min(ox) <= ax - other_size;
        let above = store.max(oy) >= ay + anchor_size;
        let below = store.min(oy) <= ay - other_size;

        match right as u8 + left as u8 + above as u8 + below as u8 {
            0 => Err(Contradiction),
            1 => {
                if right {
                    *changed |= store.shrink_lower(ox, ax + anchor_size)?.changed();
                } else if left {
                    *changed |= store.shrink_upper(ox, ax - other_size)?.changed();
                } else if above {
                    *changed |= store.shrink_lower(oy, ay + anchor_size)?.changed();
                } else {
                    *changed |= store.shrink_upper(oy, ay - other_size)?.changed();
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
