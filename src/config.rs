//! Solver configuration.
//!
//! Everything that varies a solve travels in one explicit [`SolveConfig`]
//! value handed to model construction and to the search, instead of ambient
//! globals: the non-overlap encoding, the branching heuristic and the
//! work budget.

use std::time::{Duration, Instant};

/// How overlaps between squares are pruned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoOverlapEncoding {
    /// The dedicated pairwise propagator,
    /// [`NoOverlap`](crate::solver::propagators::NoOverlap).
    #[default]
    Propagator,
    /// Four reified inequalities plus an at-least-one clause per pair of
    /// squares. Weaker per wake-up but propagates before any square is
    /// fully placed; kept as a cross-check for the dedicated propagator.
    Decomposition,
}

/// Which open coordinate variable to branch on next.
///
/// The bounding side is always branched before any coordinate, and all
/// x-coordinates before any y-coordinate; a heuristic only picks within the
/// current tier. Values are always tried smallest first, which is what makes
/// the search minimize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BranchHeuristic {
    /// Fewest remaining values first; ties go to the larger square.
    #[default]
    SmallestDomain,
    /// Larger squares first.
    InputOrder,
    /// Uniformly random among the tier's open variables, from a seeded
    /// generator, so runs are reproducible.
    Random { seed: u64 },
}

/// Limits on how much work a solve may spend before handing back its
/// best-so-far. Checked between branching decisions.
#[derive(Debug, Clone, Copy, Default)]
pub struct Budget {
    /// Maximum number of branching decisions.
    pub max_steps: Option<u64>,
    /// Maximum wall-clock time.
    pub max_wall_time: Option<Duration>,
}

impl Budget {
    /// No limits; the search runs to exhaustion.
    pub fn unlimited() -> Self {
        Self::default()
    }

    pub fn is_exhausted(&self, steps: u64, started: Instant) -> bool {
        if self.max_steps.is_some_and(|limit| steps >= limit) {
            return true;
        }
        self.max_wall_time
            .is_some_and(|limit| started.elapsed() >= limit)
    }
}

/// Complete configuration for one solve.
#[derive(Debug, Clone, Copy, Default)]
pub struct SolveConfig {
    pub encoding: NoOverlapEncoding,
    pub heuristic: BranchHeuristic,
    pub budget: Budget,
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Tests ---

    #[test]
    fn test_unlimited_budget_never_exhausts() {
        let budget = Budget::unlimited();
        assert!(!budget.is_exhausted(u64::MAX, Instant::now()));
    }

    #[test]
    fn test_step_budget_counts_branching_decisions() {
        let budget = Budget {
            max_steps: Some(5),
            max_wall_time: None,
        };
        let started = Instant::now();
        assert!(!budget.is_exhausted(4, started));
        assert!(budget.is_exhausted(5, started));
    }

    #[test]
    fn test_time_budget_checks_elapsed_wall_time() {
        let budget = Budget {
            max_steps: None,
            max_wall_time: Some(Duration::from_secs(3600)),
        };
        assert!(!budget.is_exhausted(0, Instant::now()));

        let depleted = Budget {
            max_steps: None,
            max_wall_time: Some(Duration::ZERO),
        };
        assert!(depleted.is_exhausted(0, Instant::now()));
    }
}
