//! Symmetry breaking and dominance cuts applied once at the root.
//!
//! A packing stays a packing under the bounding square's eight reflections
//! and rotations, so the search only ever considers placements where the
//! largest square sits in the lower-left quadrant at or below the diagonal.
//! For small instances the largest square is additionally kept out of thin
//! boundary strips that no other square could fill. None of this is undone
//! by backtracking.

use crate::solver::{
    domain::{DomainStore, VariableId},
    engine::PropagationEngine,
    events::Contradiction,
    propagators::PlusLeq,
};

/// Inclusive caps on the largest square's coordinates, by instance size.
///
/// Pushing the largest square further from the corner than the cap leaves a
/// boundary strip too thin to hold any other square, so some reflected or
/// translated packing satisfies the cap; the values come from known-optimal
/// small packings. Rows are `(smallest n, largest n, cap)`. Instances beyond
/// the table get no cap.
const EMPTY_STRIP_CAPS: [(usize, usize, i32); 11] = [
    (2, 2, 1),
    (3, 3, 2),
    (4, 4, 1),
    (5, 8, 2),
    (9, 11, 3),
    (12, 17, 4),
    (18, 21, 5),
    (22, 29, 6),
    (30, 34, 7),
    (35, 44, 8),
    (45, 45, 9),
];

/// The empty-strip dominance cap for instance size `n`, if the table
/// covers it.
pub(crate) fn largest_square_cap(n: usize) -> Option<i32> {
    EMPTY_STRIP_CAPS
        .iter()
        .find(|&&(lo, hi, _)| lo <= n && n <= hi)
        .map(|&(_, _, cap)| cap)
}

/// Tightens the largest square's coordinate domains and posts `y0 <= x0`.
///
/// `side_ub` is the largest value the bounding side could take. The cuts
/// cannot fail for any model built from analytic bounds, but a contradiction
/// is reported rather than swallowed so a hand-modified store stays safe.
pub(crate) fn apply(
    store: &mut DomainStore,
    engine: &mut PropagationEngine,
    x0: VariableId,
    y0: VariableId,
    side_ub: i32,
    n: usize,
) -> Result<(), Contradiction> {
    // Lower-left quadrant: anything further right has a mirror image.
    let quadrant_cap = (side_ub - n as i32) / 2;
    store.restrict(x0, 0, quadrant_cap)?;

    if let Some(cap) = largest_square_cap(n) {
        store.restrict(x0, 0, cap)?;
        store.restrict(y0, 0, cap)?;
    }

    // At-or-below the diagonal; dynamic, so it is posted as a propagator.
    engine.register(PlusLeq::new(y0, 0, x0));
    Ok(())
}
