//! Interval domains and the trailing store that owns them.
//!
//! Every decision variable is a closed integer interval `[min, max]`. The
//! store only ever narrows intervals, and each narrowing is recorded on an
//! undo trail so the search can rewind to an earlier [`TrailMark`] in time
//! proportional to the number of changes made since, rather than by copying
//! whole domain tables around.

use crate::solver::events::{Contradiction, DomainEvent, DomainResult};

/// Identifies a decision variable within a [`DomainStore`].
///
/// Ids are dense indices handed out by [`DomainStore::new_variable`] and are
/// only meaningful for the store that issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VariableId(u32);

impl VariableId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for VariableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "?{}", self.0)
    }
}

/// A position in the undo trail, as returned by [`DomainStore::mark`].
///
/// Marks are totally ordered: a later mark compares greater than an earlier
/// one, which is how the engine decides whether an entailment flag has to be
/// dropped on backtracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TrailMark(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Interval {
    min: i32,
    max: i32,
}

/// One undone-able write: the bounds `var` held before the write.
#[derive(Debug, Clone, Copy)]
struct TrailEntry {
    var: VariableId,
    min: i32,
    max: i32,
}

/// Holds the current interval of every variable, plus the undo trail and the
/// queue of not-yet-consumed change events.
///
/// All mutating operations share the same contract: they either narrow the
/// interval and report which [`DomainEvent`] occurred, report
/// [`DomainEvent::Unchanged`] when the request was already satisfied, or
/// return [`Contradiction`] when the request would empty the interval. A
/// contradicted mutation writes nothing, so the store stays consistent and
/// can be rewound as usual.
#[derive(Debug, Default)]
pub struct DomainStore {
    domains: Vec<Interval>,
    trail: Vec<TrailEntry>,
    events: Vec<(VariableId, DomainEvent)>,
}

impl DomainStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh variable with the interval `[min, max]`.
    pub fn new_variable(&mut self, min: i32, max: i32) -> VariableId {
        debug_assert!(min <= max, "variable created with an empty interval");
        let id = VariableId(self.domains.len() as u32);
        self.domains.push(Interval { min, max });
        id
    }

    pub fn num_variables(&self) -> usize {
        self.domains.len()
    }

    pub fn min(&self, var: VariableId) -> i32 {
        self.domains[var.index()].min
    }

    pub fn max(&self, var: VariableId) -> i32 {
        self.domains[var.index()].max
    }

    /// Number of values remaining in the interval.
    pub fn size(&self, var: VariableId) -> u64 {
        let dom = self.domains[var.index()];
        (dom.max as i64 - dom.min as i64 + 1) as u64
    }

    pub fn is_assigned(&self, var: VariableId) -> bool {
        let dom = self.domains[var.index()];
        dom.min == dom.max
    }

    /// The variable's value, if its interval has collapsed to a point.
    pub fn value(&self, var: VariableId) -> Option<i32> {
        let dom = self.domains[var.index()];
        (dom.min == dom.max).then_some(dom.min)
    }

    /// Raises the lower bound to `bound`.
    pub fn shrink_lower(&mut self, var: VariableId, bound: i32) -> DomainResult {
        let dom = self.domains[var.index()];
        if bound <= dom.min {
            return Ok(DomainEvent::Unchanged);
        }
        if bound > dom.max {
            return Err(Contradiction);
        }
        self.record_undo(var, dom);
        self.domains[var.index()].min = bound;
        let event = if bound == dom.max {
            DomainEvent::Assigned
        } else {
            DomainEvent::LowerTightened
        };
        self.events.push((var, event));
        Ok(event)
    }

    /// Lowers the upper bound to `bound`.
    pub fn shrink_upper(&mut self, var: VariableId, bound: i32) -> DomainResult {
        let dom = self.domains[var.index()];
        if bound >= dom.max {
            return Ok(DomainEvent::Unchanged);
        }
        if bound < dom.min {
            return Err(Contradiction);
        }
        self.record_undo(var, dom);
        self.domains[var.index()].max = bound;
        let event = if bound == dom.min {
            DomainEvent::Assigned
        } else {
            DomainEvent::UpperTightened
        };
        self.events.push((var, event));
        Ok(event)
    }

    /// Collapses the interval to the single value `value`.
    pub fn assign(&mut self, var: VariableId, value: i32) -> DomainResult {
        let dom = self.domains[var.index()];
        if value < dom.min || value > dom.max {
            return Err(Contradiction);
        }
        if dom.min == dom.max {
            return Ok(DomainEvent::Unchanged);
        }
        self.record_undo(var, dom);
        self.domains[var.index()] = Interval {
            min: value,
            max: value,
        };
        self.events.push((var, DomainEvent::Assigned));
        Ok(DomainEvent::Assigned)
    }

    /// Intersects the interval with `[min, max]`.
    pub fn restrict(&mut self, var: VariableId, min: i32, max: i32) -> DomainResult {
        let dom = self.domains[var.index()];
        let new_min = dom.min.max(min);
        let new_max = dom.max.min(max);
        if new_min > new_max {
            return Err(Contradiction);
        }
        if new_min == dom.min && new_max == dom.max {
            return Ok(DomainEvent::Unchanged);
        }
        self.record_undo(var, dom);
        self.domains[var.index()] = Interval {
            min: new_min,
            max: new_max,
        };
        let event = if new_min == new_max {
            DomainEvent::Assigned
        } else if new_min > dom.min {
            DomainEvent::LowerTightened
        } else {
            DomainEvent::UpperTightened
        };
        self.events.push((var, event));
        Ok(event)
    }

    /// Returns a mark denoting the current trail position.
    pub fn mark(&self) -> TrailMark {
        TrailMark(self.trail.len())
    }

    /// Rewinds every write made since `mark` was taken.
    ///
    /// Pending change events are discarded along the way; they describe
    /// writes that no longer exist.
    pub fn restore(&mut self, mark: TrailMark) {
        while self.trail.len() > mark.0 {
            let Some(entry) = self.trail.pop() else { break };
            self.domains[entry.var.index()] = Interval {
                min: entry.min,
                max: entry.max,
            };
        }
        self.events.clear();
    }

    /// Hands out the change events accumulated since the last drain.
    pub(crate) fn drain_events(&mut self) -> std::vec::Drain<'_, (VariableId, DomainEvent)> {
        self.events.drain(..)
    }

    pub(crate) fn has_pending_events(&self) -> bool {
        !self.events.is_empty()
    }

    fn record_undo(&mut self, var: VariableId, previous: Interval) {
        self.trail.push(TrailEntry {
            var,
            min: previous.min,
            max: previous.max,
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    // --- Test Setup ---

    fn store_with_one_var() -> (DomainStore, VariableId) {
        let mut store = DomainStore::new();
        let var = store.new_variable(0, 9);
        (store, var)
    }

    // --- Tests ---

    #[test]
    fn test_new_variable_reports_its_bounds() {
        let (store, var) = store_with_one_var();
        assert_eq!(store.min(var), 0);
        assert_eq!(store.max(var), 9);
        assert_eq!(store.size(var), 10);
        assert!(!store.is_assigned(var));
        assert_eq!(store.value(var), None);
    }

    #[test]
    fn test_shrink_lower_tightens_and_reports() {
        let (mut store, var) = store_with_one_var();
        assert_eq!(store.shrink_lower(var, 4), Ok(DomainEvent::LowerTightened));
        assert_eq!(store.min(var), 4);
        assert_eq!(store.max(var), 9);
    }

    #[test]
    fn test_shrink_lower_below_current_min_is_unchanged() {
        let (mut store, var) = store_with_one_var();
        assert_eq!(store.shrink_lower(var, 0), Ok(DomainEvent::Unchanged));
        assert_eq!(store.shrink_lower(var, -3), Ok(DomainEvent::Unchanged));
        assert_eq!(store.min(var), 0);
    }

    #[test]
    fn test_shrink_lower_past_max_is_a_contradiction() {
        let (mut store, var) = store_with_one_var();
        assert_eq!(store.shrink_lower(var, 10), Err(Contradiction));
        // The failed mutation must not have written anything.
        assert_eq!(store.min(var), 0);
        assert_eq!(store.max(var), 9);
    }

    #[test]
    fn test_shrink_upper_to_min_reports_assigned() {
        let (mut store, var) = store_with_one_var();
        assert_eq!(store.shrink_upper(var, 0), Ok(DomainEvent::Assigned));
        assert_eq!(store.value(var), Some(0));
    }

    #[test]
    fn test_assign_collapses_the_interval() {
        let (mut store, var) = store_with_one_var();
        assert_eq!(store.assign(var, 7), Ok(DomainEvent::Assigned));
        assert!(store.is_assigned(var));
        assert_eq!(store.value(var), Some(7));
    }

    #[test]
    fn test_assign_outside_the_interval_is_a_contradiction() {
        let (mut store, var) = store_with_one_var();
        assert_eq!(store.assign(var, 10), Err(Contradiction));
        assert_eq!(store.assign(var, -1), Err(Contradiction));
    }

    #[test]
    fn test_assign_to_an_already_assigned_value_is_unchanged() {
        let (mut store, var) = store_with_one_var();
        store.assign(var, 3).unwrap();
        assert_eq!(store.assign(var, 3), Ok(DomainEvent::Unchanged));
        assert_eq!(store.assign(var, 4), Err(Contradiction));
    }

    #[test]
    fn test_restrict_intersects_both_bounds() {
        let (mut store, var) = store_with_one_var();
        assert_eq!(store.restrict(var, 2, 6), Ok(DomainEvent::LowerTightened));
        assert_eq!((store.min(var), store.max(var)), (2, 6));
        assert_eq!(store.restrict(var, 0, 4), Ok(DomainEvent::UpperTightened));
        assert_eq!((store.min(var), store.max(var)), (2, 4));
        assert_eq!(store.restrict(var, 5, 9), Err(Contradiction));
    }

    #[test]
    fn test_restore_rewinds_to_the_marked_bounds() {
        let (mut store, var) = store_with_one_var();
        store.shrink_lower(var, 2).unwrap();
        let mark = store.mark();
        store.shrink_lower(var, 5).unwrap();
        store.shrink_upper(var, 6).unwrap();
        store.restore(mark);
        assert_eq!((store.min(var), store.max(var)), (2, 9));
    }

    #[test]
    fn test_restore_discards_pending_events() {
        let (mut store, var) = store_with_one_var();
        let mark = store.mark();
        store.shrink_lower(var, 3).unwrap();
        assert!(store.has_pending_events());
        store.restore(mark);
        assert!(!store.has_pending_events());
    }

    #[test]
    fn test_events_accumulate_until_drained() {
        let (mut store, var) = store_with_one_var();
        store.shrink_lower(var, 1).unwrap();
        store.shrink_upper(var, 1).unwrap();
        let events: Vec<_> = store.drain_events().collect();
        assert_eq!(
            events,
            vec![
                (var, DomainEvent::LowerTightened),
                (var, DomainEvent::Assigned),
            ]
        );
        assert!(!store.has_pending_events());
    }

    proptest! {
        /// Any burst of narrowing operations must be exactly undone by a
        /// single restore to the mark taken before the burst.
        #[test]
        fn test_restore_exactly_undoes_any_mutation_burst(
            ops in prop::collection::vec((0u8..4, 0usize..3, -15i32..25, -15i32..25), 0..60),
        ) {
            let mut store = DomainStore::new();
            let vars = [
                store.new_variable(0, 20),
                store.new_variable(-10, 10),
                store.new_variable(5, 5),
            ];
            let before: Vec<_> = vars
                .iter()
                .map(|&v| (store.min(v), store.max(v)))
                .collect();
            let mark = store.mark();

            for (kind, which, a, b) in ops {
                let var = vars[which];
                // Contradicted mutations are fine; they must not write.
                let _ = match kind {
                    0 => store.shrink_lower(var, a),
                    1 => store.shrink_upper(var, a),
                    2 => store.assign(var, a),
                    _ => store.restrict(var, a.min(b), a.max(b)),
                };
            }

            store.restore(mark);
            let after: Vec<_> = vars
                .iter()
                .map(|&v| (store.min(v), store.max(v)))
                .collect();
            prop_assert_eq!(before, after);
            prop_assert!(!store.has_pending_events());
        }
    }
}
