//! Model assembly: variables, analytic bounds and constraint posting.

use tracing::debug;

use crate::{
    config::{NoOverlapEncoding, SolveConfig},
    error::{ModelError, Result},
    packing::symmetry,
    solver::{
        domain::{DomainStore, VariableId},
        engine::PropagationEngine,
        propagators::{AtLeastOne, NoOverlap, PlusLeq, ReifiedPlusLeq},
    },
};

/// The constraint model for one instance: squares of sizes `n, n-1, ..., 1`
/// to be packed into the smallest enclosing square.
///
/// Construction creates every variable with its analytic bounds, posts all
/// propagators and applies the root symmetry cuts; the model is then driven
/// by [`BranchAndBound`](crate::packing::search::BranchAndBound).
#[derive(Debug)]
pub struct PackingModel {
    pub(crate) n: usize,
    pub(crate) bounding_side: VariableId,
    pub(crate) xs: Vec<VariableId>,
    pub(crate) ys: Vec<VariableId>,
    pub(crate) sizes: Vec<i32>,
    pub(crate) store: DomainStore,
    pub(crate) engine: PropagationEngine,
    /// Set when a root cut already emptied a domain; the search then
    /// reports infeasibility without branching.
    pub(crate) root_failed: bool,
}

impl PackingModel {
    /// Builds the model for instance size `n`.
    ///
    /// Fails with [`ModelError::InvalidSize`] when `n` is zero; every larger
    /// instance is well-formed.
    pub fn new(n: usize, config: &SolveConfig) -> Result<Self> {
        if n < 1 {
            return Err(ModelError::InvalidSize(n).into());
        }
        let n_i32 = n as i32;
        let sizes: Vec<i32> = (0..n_i32).map(|i| n_i32 - i).collect();

        // Analytic bounds on the side: the total area must fit, and the
        // squares stacked in one column always do.
        let side_lb = ceil_sqrt(n_i32 as i64 * (n_i32 + 1) as i64 * (2 * n_i32 + 1) as i64 / 6);
        let side_ub = n_i32 * (n_i32 + 1) / 2;

        let mut store = DomainStore::new();
        let bounding_side = store.new_variable(side_lb, side_ub);
        let xs: Vec<VariableId> = sizes
            .iter()
            .map(|&size| store.new_variable(0, side_ub - size))
            .collect();
        let ys: Vec<VariableId> = sizes
            .iter()
            .map(|&size| store.new_variable(0, side_ub - size))
            .collect();

        let mut engine = PropagationEngine::new();
        let root_failed =
            symmetry::apply(&mut store, &mut engine, xs[0], ys[0], side_ub, n).is_err();

        // Containment: every square ends up inside the bounding square.
        for i in 0..n {
            engine.register(PlusLeq::new(xs[i], sizes[i], bounding_side));
            engine.register(PlusLeq::new(ys[i], sizes[i], bounding_side));
        }

        match config.encoding {
            NoOverlapEncoding::Propagator => {
                engine.register(NoOverlap::new(xs.clone(), ys.clone(), sizes.clone())?);
            }
            NoOverlapEncoding::Decomposition => {
                post_decomposition(&mut store, &mut engine, &xs, &ys, &sizes);
            }
        }

        debug!(
            n,
            side_lb,
            side_ub,
            propagators = engine.num_propagators(),
            "model built"
        );
        Ok(Self {
            n,
            bounding_side,
            xs,
            ys,
            sizes,
            store,
            engine,
            root_failed,
        })
    }

    pub fn num_squares(&self) -> usize {
        self.n
    }

    /// The side length of square `i`; the largest square is index 0.
    pub fn size_of(&self, i: usize) -> i32 {
        self.sizes[i]
    }

    /// The engine holding the posted propagators, for statistics rendering.
    pub fn engine(&self) -> &PropagationEngine {
        &self.engine
    }
}

/// Posts the decomposed non-overlap encoding: per pair of squares, four
/// reified separation flags and a clause requiring at least one of them.
fn post_decomposition(
    store: &mut DomainStore,
    engine: &mut PropagationEngine,
    xs: &[VariableId],
    ys: &[VariableId],
    sizes: &[i32],
) {
    for i in 0..xs.len() {
        for j in (i + 1)..xs.len() {
            let flags: Vec<VariableId> = (0..4).map(|_| store.new_variable(0, 1)).collect();
            // i left of j.
            engine.register(ReifiedPlusLeq::new(flags[0], xs[i], sizes[i], xs[j]));
            // i right of j.
            engine.register(ReifiedPlusLeq::new(flags[1], xs[j], sizes[j], xs[i]));
            // i below j.
            engine.register(ReifiedPlusLeq::new(flags[2], ys[i], sizes[i], ys[j]));
            // i above j.
            engine.register(ReifiedPlusLeq::new(flags[3], ys[j], sizes[j], ys[i]));
            engine.register(AtLeastOne::new(flags));
        }
    }
}

/// Smallest non-negative integer whose square is at least `value`.
fn ceil_sqrt(value: i64) -> i32 {
    let mut root = (value as f64).sqrt() as i64;
    while root * root < value {
        root += 1;
    }
    while root > 0 && (root - 1) * (root - 1) >= value {
        root -= 1;
    }
    root as i32
}
