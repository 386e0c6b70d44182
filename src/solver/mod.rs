//! The problem-agnostic half of the crate: interval domains with a trail,
//! change events, propagators and the fixpoint engine.

pub mod domain;
pub mod engine;
pub mod events;
pub mod propagator;
pub mod propagators;
pub mod stats;
