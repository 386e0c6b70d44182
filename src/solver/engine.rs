//! The propagation engine: a deduplicated FIFO queue of propagators driven
//! by variable change events.
//!
//! Propagators subscribe to their variables when registered. Whenever a
//! variable's interval narrows, every subscribed propagator is put on the
//! queue (at most once), and [`PropagationEngine::propagate`] runs the queue
//! until it drains or a propagator derives a contradiction. Entailed
//! propagators are parked with the trail position they were entailed at, so
//! backtracking past that position wakes them up again.

use std::collections::{HashMap, VecDeque};
use std::time::Instant;

use tracing::debug;

use crate::solver::{
    domain::{DomainStore, TrailMark},
    events::Contradiction,
    propagator::{PropagationStatus, Propagator, PropagatorDescriptor},
};

pub type PropagatorId = usize;

/// Counters for a single propagator, keyed by [`PropagatorId`] in
/// [`SearchStats`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PerPropagatorStats {
    pub runs: u64,
    pub prunings: u64,
    pub time_spent_micros: u64,
}

/// Aggregate counters for one search.
#[derive(Debug, Clone, Default)]
pub struct SearchStats {
    pub nodes_visited: u64,
    pub backtracks: u64,
    pub solutions_found: u64,
    pub propagator_stats: HashMap<PropagatorId, PerPropagatorStats>,
}

impl SearchStats {
    /// Total number of propagator runs across the whole search.
    pub fn propagations(&self) -> u64 {
        self.propagator_stats.values().map(|s| s.runs).sum()
    }
}

/// Runs registered propagators to a mutual fixpoint over a [`DomainStore`].
#[derive(Debug, Default)]
pub struct PropagationEngine {
    propagators: Vec<Propagator>,
    /// For each variable index, the propagators watching it.
    subscribers: Vec<Vec<PropagatorId>>,
    queue: VecDeque<PropagatorId>,
    enqueued: Vec<bool>,
    /// Trail position at which the propagator became entailed, if it did.
    entailed_at: Vec<Option<TrailMark>>,
}

impl PropagationEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `propagator`, subscribes it to its variables and schedules
    /// its first run.
    pub fn register(&mut self, propagator: impl Into<Propagator>) -> PropagatorId {
        let propagator = propagator.into();
        let id = self.propagators.len();
        for var in propagator.variables() {
            if self.subscribers.len() <= var.index() {
                self.subscribers.resize_with(var.index() + 1, Vec::new);
            }
            self.subscribers[var.index()].push(id);
        }
        self.propagators.push(propagator);
        self.enqueued.push(true);
        self.entailed_at.push(None);
        self.queue.push_back(id);
        id
    }

    pub fn num_propagators(&self) -> usize {
        self.propagators.len()
    }

    pub fn descriptor(&self, id: PropagatorId) -> Option<PropagatorDescriptor> {
        self.propagators.get(id).map(Propagator::descriptor)
    }

    /// Runs the queue to a fixpoint.
    ///
    /// Change events already pending on the store (from branching decisions
    /// or root cuts) wake their subscribers first. On contradiction the
    /// queue is cleared; the caller is expected to backtrack.
    pub fn propagate(
        &mut self,
        store: &mut DomainStore,
        stats: &mut SearchStats,
    ) -> Result<(), Contradiction> {
        self.wake_subscribers(store);

        while let Some(id) = self.queue.pop_front() {
            self.enqueued[id] = false;
            if self.entailed_at[id].is_some() {
                continue;
            }

            let per_propagator = stats.propagator_stats.entry(id).or_default();
            per_propagator.runs += 1;
            let started = Instant::now();
            let outcome = self.propagators[id].propagate(store);
            per_propagator.time_spent_micros += started.elapsed().as_micros() as u64;
            if store.has_pending_events() {
                per_propagator.prunings += 1;
            }

            match outcome {
                Err(Contradiction) => {
                    debug!(propagator = id, "propagation derived a contradiction");
                    self.clear_queue();
                    store.drain_events().for_each(drop);
                    return Err(Contradiction);
                }
                Ok(status) => {
                    if status == PropagationStatus::Entailed {
                        self.entailed_at[id] = Some(store.mark());
                    }
                    self.wake_subscribers(store);
                }
            }
        }

        debug!("propagation reached a fixpoint");
        Ok(())
    }

    /// Rewinds the store to `mark` and forgets everything recorded since:
    /// queued work and entailment flags younger than the mark.
    pub fn restore(&mut self, store: &mut DomainStore, mark: TrailMark) {
        store.restore(mark);
        for slot in &mut self.entailed_at {
            if slot.is_some_and(|entailed_mark| entailed_mark > mark) {
                *slot = None;
            }
        }
        self.clear_queue();
    }

    #[cfg(test)]
    fn is_entailed(&self, id: PropagatorId) -> bool {
        self.entailed_at.get(id).copied().flatten().is_some()
    }

    /// Drains the store's pending events and enqueues every subscriber that
    /// is neither queued already nor parked as entailed.
    fn wake_subscribers(&mut self, store: &mut DomainStore) {
        for (var, _event) in store.drain_events() {
            let Some(watchers) = self.subscribers.get(var.index()) else {
                continue;
            };
            for &id in watchers {
                if !self.enqueued[id] && self.entailed_at[id].is_none() {
                    self.enqueued[id] = true;
                    self.queue.push_back(id);
                }
            }
        }
    }

    fn clear_queue(&mut self) {
        self.queue.clear();
        for flag in &mut self.enqueued {
            *flag = false;
        }
    }
}
