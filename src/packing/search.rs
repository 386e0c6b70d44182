//! Depth-first branch-and-bound minimizing the bounding side.
//!
//! The search keeps an explicit stack of open right branches instead of
//! recursing. Each node propagates to a fixpoint and then branches within
//! the first tier holding an open variable -- the bounding side, then the
//! x-coordinates, then the y-coordinates -- always trying the smallest
//! value first. Every solution found tightens the side's upper bound and
//! the search continues, so the solution it ends with is the minimum.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use rand_core::SeedableRng;
use tracing::debug;

use crate::{
    config::{BranchHeuristic, Budget, SolveConfig},
    packing::{
        model::PackingModel,
        solution::{Placement, Solution},
    },
    solver::{
        domain::{DomainStore, TrailMark, VariableId},
        engine::{PropagationEngine, SearchStats},
    },
};

/// Why the search handed control back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Every alternative was explored; the best solution, if any, is the
    /// proven optimum.
    Exhausted,
    /// The configured budget ran out; the best solution is the best found
    /// so far, without an optimality proof.
    BudgetExhausted,
}

/// Everything a solve produced.
#[derive(Debug)]
pub struct Outcome {
    pub best: Option<Solution>,
    pub stats: SearchStats,
    pub stopped: StopReason,
}

/// An open right branch: after restoring to `mark`, try `var >= value + 1`.
#[derive(Debug, Clone, Copy)]
struct ChoicePoint {
    mark: TrailMark,
    var: VariableId,
    value: i32,
}

/// The branch-and-bound driver. One instance runs one search;
/// [`solve`](BranchAndBound::solve) consumes it.
pub struct BranchAndBound {
    heuristic: BranchHeuristic,
    budget: Budget,
    rng: Option<ChaCha8Rng>,
    on_improvement: Option<Box<dyn FnMut(&Solution)>>,
}

impl BranchAndBound {
    pub fn new(config: &SolveConfig) -> Self {
        let rng = match config.heuristic {
            BranchHeuristic::Random { seed } => Some(ChaCha8Rng::seed_from_u64(seed)),
            _ => None,
        };
        Self {
            heuristic: config.heuristic,
            budget: config.budget,
            rng,
            on_improvement: None,
        }
    }

    /// Registers a callback invoked for every improving solution as it is
    /// found, before the bound is tightened further.
    pub fn on_improvement(mut self, callback: impl FnMut(&Solution) + 'static) -> Self {
        self.on_improvement = Some(Box::new(callback));
        self
    }

    /// Runs the search until exhaustion or until the budget runs out.
    ///
    /// The model is rewound to its root state afterwards, so the caller can
    /// still inspect it, for instance to render propagator statistics.
    pub fn solve(mut self, model: &mut PackingModel) -> Outcome {
        let PackingModel {
            bounding_side,
            xs,
            ys,
            sizes,
            store,
            engine,
            root_failed,
            ..
        } = model;
        let bounding_side = *bounding_side;
        let mut stats = SearchStats::default();
        let started = Instant::now();

        if *root_failed || engine.propagate(store, &mut stats).is_err() {
            debug!("instance is infeasible at the root");
            return Outcome {
                best: None,
                stats,
                stopped: StopReason::Exhausted,
            };
        }
        let root = store.mark();

        let mut stack: Vec<ChoicePoint> = Vec::new();
        let mut best: Option<Solution> = None;
        let mut steps: u64 = 0;
        let mut stopped = StopReason::Exhausted;

        loop {
            if self.budget.is_exhausted(steps, started) {
                stopped = StopReason::BudgetExhausted;
                break;
            }

            let Some(var) = self.select(store, bounding_side, xs, ys) else {
                // Every variable is fixed, and the bound excludes anything
                // as large as the previous best: an improving packing.
                let solution = capture(store, bounding_side, xs, ys, sizes);
                debug!(side = solution.bounding_side, "improving solution found");
                stats.solutions_found += 1;
                if let Some(callback) = self.on_improvement.as_mut() {
                    callback(&solution);
                }
                best = Some(solution);
                if !backtrack(&mut stack, store, engine, &mut stats, bounding_side, &best) {
                    break;
                }
                continue;
            };

            steps += 1;
            stats.nodes_visited += 1;
            let value = store.min(var);
            stack.push(ChoicePoint {
                mark: store.mark(),
                var,
                value,
            });
            let feasible = store.assign(var, value).is_ok()
                && engine.propagate(store, &mut stats).is_ok();
            if !feasible && !backtrack(&mut stack, store, engine, &mut stats, bounding_side, &best)
            {
                break;
            }
        }
        engine.restore(store, root);

        debug!(?stopped, solutions = stats.solutions_found, "search finished");
        Outcome {
            best,
            stats,
            stopped,
        }
    }

    /// The next variable to branch on, or `None` once the assignment is
    /// complete. The bounding side always goes first; within a coordinate
    /// tier the configured heuristic picks.
    fn select(
        &mut self,
        store: &DomainStore,
        bounding_side: VariableId,
        xs: &[VariableId],
        ys: &[VariableId],
    ) -> Option<VariableId> {
        if !store.is_assigned(bounding_side) {
            return Some(bounding_side);
        }
        if let Some(var) = self.select_in_tier(store, xs) {
            return Some(var);
        }
        self.select_in_tier(store, ys)
    }

    fn select_in_tier(&mut self, store: &DomainStore, tier: &[VariableId]) -> Option<VariableId> {
        match self.heuristic {
            BranchHeuristic::InputOrder => {
                tier.iter().copied().find(|&var| !store.is_assigned(var))
            }
            BranchHeuristic::SmallestDomain => tier
                .iter()
                .copied()
                .filter(|&var| !store.is_assigned(var))
                // Tie-break on the id, which orders larger squares first.
                .min_by_key(|&var| (store.size(var), var)),
            BranchHeuristic::Random { .. } => {
                let open: Vec<VariableId> = tier
                    .iter()
                    .copied()
                    .filter(|&var| !store.is_assigned(var))
                    .collect();
                match self.rng.as_mut() {
                    Some(rng) => open.choose(rng).copied(),
                    None => open.first().copied(),
                }
            }
        }
    }
}

/// Pops choice points until one's right branch survives propagation.
/// Returns `false` when the stack empties, meaning the search space is
/// fully explored.
fn backtrack(
    stack: &mut Vec<ChoicePoint>,
    store: &mut DomainStore,
    engine: &mut PropagationEngine,
    stats: &mut SearchStats,
    bounding_side: VariableId,
    best: &Option<Solution>,
) -> bool {
    while let Some(point) = stack.pop() {
        stats.backtracks += 1;
        engine.restore(store, point.mark);

        // Right branch: the value just tried is ruled out.
        if store.shrink_lower(point.var, point.value + 1).is_err() {
            continue;
        }
        // Restoring may have widened the side; re-impose the global bound.
        if let Some(solution) = best {
            if store
                .shrink_upper(bounding_side, solution.bounding_side - 1)
                .is_err()
            {
                continue;
            }
        }
        if engine.propagate(store, stats).is_ok() {
            return true;
        }
    }
    false
}

/// Reads the completed assignment out of the store.
fn capture(
    store: &DomainStore,
    bounding_side: VariableId,
    xs: &[VariableId],
    ys: &[VariableId],
    sizes: &[i32],
) -> Solution {
    let placements = xs
        .iter()
        .zip(ys.iter())
        .zip(sizes.iter())
        .map(|((&x, &y), &size)| Placement {
            x: store.min(x),
            y: store.min(y),
            size,
        })
        .collect();
    Solution {
        bounding_side: store.min(bounding_side),
        placements,
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::config::NoOverlapEncoding;

    // --- Test Setup ---

    fn solve_with(n: usize, config: &SolveConfig) -> Outcome {
        let mut model = PackingModel::new(n, config).unwrap();
        BranchAndBound::new(config).solve(&mut model)
    }

    fn best_side(outcome: &Outcome) -> i32 {
        outcome
            .best
            .as_ref()
            .map(|solution| solution.bounding_side)
            .unwrap()
    }

    // --- Tests ---

    #[test]
    fn test_a_single_square_packs_at_the_origin() {
        let outcome = solve_with(1, &SolveConfig::default());

        let best = outcome.best.unwrap();
        assert_eq!(best.bounding_side, 1);
        assert_eq!(best.placements, vec![Placement { x: 0, y: 0, size: 1 }]);
        assert_eq!(outcome.stopped, StopReason::Exhausted);
    }

    #[test]
    fn test_known_optimal_sides_for_small_instances() {
        // Minimum enclosing sides for squares 1..n, from the literature.
        for (n, side) in [(1, 1), (2, 3), (3, 5), (4, 7)] {
            let outcome = solve_with(n, &SolveConfig::default());
            assert_eq!(best_side(&outcome), side, "instance size {n}");
            assert_eq!(outcome.stopped, StopReason::Exhausted);
            assert!(outcome.best.unwrap().is_valid_packing());
        }
    }

    #[test]
    fn test_five_squares_pack_into_side_nine() {
        let outcome = solve_with(5, &SolveConfig::default());

        let best = outcome.best.unwrap();
        assert_eq!(best.bounding_side, 9);
        assert!(best.is_valid_packing());
        assert_eq!(best.placements[0].size, 5);
        assert!(outcome.stats.solutions_found >= 1);
    }

    #[test]
    fn test_both_encodings_agree_on_the_optimum() {
        for n in 1..=5 {
            let direct = solve_with(n, &SolveConfig::default());
            let decomposed = solve_with(
                n,
                &SolveConfig {
                    encoding: NoOverlapEncoding::Decomposition,
                    ..SolveConfig::default()
                },
            );
            assert_eq!(best_side(&direct), best_side(&decomposed), "instance size {n}");
        }
    }

    #[test]
    fn test_every_heuristic_reaches_the_same_optimum() {
        for heuristic in [
            BranchHeuristic::SmallestDomain,
            BranchHeuristic::InputOrder,
            BranchHeuristic::Random { seed: 7 },
        ] {
            let config = SolveConfig {
                heuristic,
                ..SolveConfig::default()
            };
            assert_eq!(best_side(&solve_with(4, &config)), 7, "{heuristic:?}");
        }
    }

    #[test]
    fn test_improving_solutions_arrive_strictly_ordered() {
        let sides = Rc::new(RefCell::new(Vec::new()));
        let recorder = Rc::clone(&sides);
        let config = SolveConfig::default();
        let mut model = PackingModel::new(4, &config).unwrap();

        let outcome = BranchAndBound::new(&config)
            .on_improvement(move |solution| recorder.borrow_mut().push(solution.bounding_side))
            .solve(&mut model);

        let sides = sides.borrow();
        assert!(!sides.is_empty());
        assert!(sides.windows(2).all(|pair| pair[1] < pair[0]));
        assert_eq!(*sides.last().unwrap(), best_side(&outcome));
        assert_eq!(sides.len() as u64, outcome.stats.solutions_found);
    }

    #[test]
    fn test_the_step_budget_aborts_with_best_so_far() {
        let config = SolveConfig {
            budget: Budget {
                max_steps: Some(1),
                max_wall_time: None,
            },
            ..SolveConfig::default()
        };

        let outcome = solve_with(4, &config);

        assert_eq!(outcome.stopped, StopReason::BudgetExhausted);
        assert!(outcome.best.is_none());
        assert_eq!(outcome.stats.nodes_visited, 1);
    }

    #[test]
    fn test_unpackable_bounds_exhaust_without_a_solution() {
        let config = SolveConfig::default();
        let mut model = PackingModel::new(3, &config).unwrap();
        // Squares 3, 2, 1 need side 5; force the side to 4.
        model.store.assign(model.bounding_side, 4).unwrap();

        let outcome = BranchAndBound::new(&config).solve(&mut model);

        assert!(outcome.best.is_none());
        assert_eq!(outcome.stopped, StopReason::Exhausted);
        assert!(outcome.stats.backtracks > 0);
    }

    #[test]
    fn test_containment_and_area_hold_for_every_reported_solution() {
        let seen = Rc::new(RefCell::new(0u32));
        let counter = Rc::clone(&seen);
        let config = SolveConfig::default();
        let mut model = PackingModel::new(4, &config).unwrap();

        BranchAndBound::new(&config)
            .on_improvement(move |solution| {
                assert!(solution.is_valid_packing());
                *counter.borrow_mut() += 1;
            })
            .solve(&mut model);

        assert!(*seen.borrow() > 0);
    }
}
