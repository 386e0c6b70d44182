//! A clause over boolean variables: at least one of them must be true.
//!
//! Together with four [`ReifiedPlusLeq`](super::ReifiedPlusLeq) flags per
//! pair of squares this forms the decomposed non-overlap encoding.

use crate::solver::{
    domain::{DomainStore, VariableId},
    events::Contradiction,
    propagator::{PropagationResult, PropagationStatus, PropagatorDescriptor},
};

/// Enforces `flag_1 OR flag_2 OR ... OR flag_n`.
#[derive(Debug, Clone)]
pub struct AtLeastOne {
    flags: Vec<VariableId>,
}

impl AtLeastOne {
    pub fn new(flags: Vec<VariableId>) -> Self {
        Self { flags }
    }

    pub(crate) fn variables(&self) -> Vec<VariableId> {
        self.flags.clone()
    }

    pub(crate) fn descriptor(&self) -> PropagatorDescriptor {
        let flags_str = self
            .flags
            .iter()
            .map(|flag| format!("{flag}"))
            .collect::<Vec<_>>()
            .join(" OR ");
        PropagatorDescriptor {
            name: "AtLeastOne".to_string(),
            description: flags_str,
        }
    }

    pub(crate) fn propagate(&self, store: &mut DomainStore) -> PropagationResult {
        let mut known_false_count = 0;
        let mut last_open = None;

        for &flag in &self.flags {
            match store.value(flag) {
                // A true literal satisfies the clause for good.
                Some(1) => return Ok(PropagationStatus::Entailed),
                Some(_) => known_false_count += 1,
                None => last_open = Some(flag),
            }
        }

        if known_false_count == self.flags.len() {
            return Err(Contradiction);
        }
        if known_false_count == self.flags.len() - 1 {
            if let Some(flag) = last_open {
                // Every other literal is false, so this one must hold.
                store.assign(flag, 1)?;
                return Ok(PropagationStatus::Entailed);
            }
        }
        Ok(PropagationStatus::Unchanged)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // --- Test Setup ---

    fn clause_of(n: usize) -> (DomainStore, Vec<VariableId>) {
        let mut store = DomainStore::new();
        let flags = (0..n).map(|_| store.new_variable(0, 1)).collect();
        (store, flags)
    }

    // --- Tests ---

    #[test]
    fn test_any_true_literal_entails_the_clause() {
        let (mut store, flags) = clause_of(3);
        store.assign(flags[1], 1).unwrap();

        let status = AtLeastOne::new(flags).propagate(&mut store).unwrap();

        assert_eq!(status, PropagationStatus::Entailed);
    }

    #[test]
    fn test_all_false_literals_contradict_the_clause() {
        let (mut store, flags) = clause_of(3);
        for &flag in &flags {
            store.assign(flag, 0).unwrap();
        }

        let result = AtLeastOne::new(flags).propagate(&mut store);

        assert_eq!(result, Err(Contradiction));
    }

    #[test]
    fn test_the_last_open_literal_is_forced_true() {
        let (mut store, flags) = clause_of(3);
        store.assign(flags[0], 0).unwrap();
        store.assign(flags[2], 0).unwrap();

        let status = AtLeastOne::new(flags.clone())
            .propagate(&mut store)
            .unwrap();

        assert_eq!(status, PropagationStatus::Entailed);
        assert_eq!(store.value(flags[1]), Some(1));
    }

    #[test]
    fn test_two_open_literals_leave_the_clause_alone() {
        let (mut store, flags) = clause_of(3);
        store.assign(flags[0], 0).unwrap();

        let status = AtLeastOne::new(flags.clone())
            .propagate(&mut store)
            .unwrap();

        assert_eq!(status, PropagationStatus::Unchanged);
        assert_eq!(store.value(flags[1]), None);
        assert_eq!(store.value(flags[2]), None);
    }
}
