//! The concrete propagators the packing model is built from.

pub mod at_least_one;
pub mod no_overlap;
pub mod plus_leq;
pub mod reified_plus_leq;

pub use at_least_one::AtLeastOne;
pub use no_overlap::NoOverlap;
pub use plus_leq::PlusLeq;
pub use reified_plus_leq::ReifiedPlusLeq;
