//! Change signals produced by mutations of the domain store.
//!
//! Every narrowing operation on [`DomainStore`](crate::solver::domain::DomainStore)
//! reports either the kind of change it made or a [`Contradiction`] when the
//! requested bounds would leave the variable with no value at all.

/// The effect a single mutation had on a variable's interval.
///
/// When a mutation moves both bounds at once, [`DomainEvent::Assigned`] wins
/// if the interval collapsed to a point, otherwise the lower-bound event is
/// reported. Subscribed propagators are woken identically for every variant
/// except `Unchanged`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainEvent {
    /// The requested bounds were already satisfied; nothing was written.
    Unchanged,
    /// The lower bound moved up.
    LowerTightened,
    /// The upper bound moved down.
    UpperTightened,
    /// The interval collapsed to a single value.
    Assigned,
}

impl DomainEvent {
    /// True when the mutation actually narrowed the interval.
    pub fn changed(self) -> bool {
        !matches!(self, DomainEvent::Unchanged)
    }
}

/// Signals that a mutation would have emptied a variable's interval.
///
/// A contradiction is an ordinary search event rather than an error: the
/// search answers it by backtracking to the previous choice point. It
/// deliberately carries no payload, so raising one is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contradiction;

/// The result of a single domain mutation.
pub type DomainResult = Result<DomainEvent, Contradiction>;
