//! The packing problem built on top of the interval solver: model assembly,
//! root symmetry cuts, the branch-and-bound search and the solution type.

pub mod model;
pub mod search;
pub mod solution;
pub(crate) mod symmetry;
