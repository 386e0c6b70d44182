//! Quadra packs the squares of sizes `n, n-1, ..., 1` into the smallest
//! enclosing square and proves the side minimal.
//!
//! The crate is a two-layered architecture: a small interval solver backend
//! and the packing-specific frontend built on top of it.
//!
//! # Core Concepts
//!
//! - **[`DomainStore`](solver::domain::DomainStore)**: integer variables as
//!   `[min, max]` intervals, with a trail so the search can rewind its
//!   decisions cheaply.
//! - **[`PropagationEngine`](solver::engine::PropagationEngine)**: runs the
//!   posted propagators to a mutual fixpoint after every change, pruning
//!   values no packing can use.
//! - **[`PackingModel`](packing::model::PackingModel)**: the variables,
//!   analytic bounds, constraints and symmetry cuts for one instance size.
//! - **[`BranchAndBound`](packing::search::BranchAndBound)**: depth-first
//!   improve-and-continue search that keeps tightening the bounding side
//!   until the best packing found is the proven optimum.
//!
//! # Example: The Two-Square Instance
//!
//! Squares of sizes 2 and 1 need a bounding square of side 3: the 1x1 square
//! cannot share a row or column with the 2x2 one inside anything smaller.
//!
//! ```
//! use quadra::config::SolveConfig;
//! use quadra::packing::{model::PackingModel, search::BranchAndBound};
//!
//! let config = SolveConfig::default();
//! let mut model = PackingModel::new(2, &config).unwrap();
//! let outcome = BranchAndBound::new(&config).solve(&mut model);
//!
//! let best = outcome.best.unwrap();
//! assert_eq!(best.bounding_side, 3);
//! assert!(best.is_valid_packing());
//! ```

pub mod config;
pub mod error;
pub mod packing;
pub mod solver;
