use crate::models::{Membership, SwipeCandidate};
use serde::Serialize;

/// What a call to [`MatchRegistry::accept`] or [`MatchRegistry::decline`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeOutcome {
    /// The candidate had not been swiped before
    Inserted,
    /// The candidate was in the other collection and has been moved
    Moved,
    /// The candidate was already in the requested collection
    Unchanged,
}

/// Counts shown on the dashboard stat cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegistrySummary {
    pub accepted: usize,
    pub declined: usize,
}

/// Session-scoped record of swipe decisions
///
/// Holds two insertion-ordered collections keyed by candidate id. An id is in
/// at most one of them at any time: accepting removes it from `declined` and
/// declining removes it from `accepted`. The most recent swipe is last.
///
/// The registry is a plain value. Create one per dashboard session and pass
/// it to whatever needs to read or mutate it.
#[derive(Debug, Clone, Default)]
pub struct MatchRegistry {
    accepted: Vec<SwipeCandidate>,
    declined: Vec<SwipeCandidate>,
}

impl MatchRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a rightward swipe
    pub fn accept(&mut self, candidate: SwipeCandidate) -> SwipeOutcome {
        let moved = take(&mut self.declined, candidate.id()).is_some();
        let outcome = insert(&mut self.accepted, candidate, moved);
        tracing::trace!(?outcome, "accepted candidate");
        outcome
    }

    /// Record a leftward swipe
    pub fn decline(&mut self, candidate: SwipeCandidate) -> SwipeOutcome {
        let moved = take(&mut self.accepted, candidate.id()).is_some();
        let outcome = insert(&mut self.declined, candidate, moved);
        tracing::trace!(?outcome, "declined candidate");
        outcome
    }

    /// Forget any decision about `id`. Returns whether one existed.
    pub fn remove(&mut self, id: &str) -> bool {
        let from_accepted = take(&mut self.accepted, id).is_some();
        let from_declined = take(&mut self.declined, id).is_some();
        from_accepted || from_declined
    }

    pub fn membership(&self, id: &str) -> Membership {
        if position(&self.accepted, id).is_some() {
            Membership::Accepted
        } else if position(&self.declined, id).is_some() {
            Membership::Declined
        } else {
            Membership::Neither
        }
    }

    pub fn is_accepted(&self, id: &str) -> bool {
        self.membership(id) == Membership::Accepted
    }

    pub fn is_declined(&self, id: &str) -> bool {
        self.membership(id) == Membership::Declined
    }

    pub fn reset(&mut self) {
        self.accepted.clear();
        self.declined.clear();
    }

    /// Accepted candidates, oldest swipe first
    pub fn accepted(&self) -> &[SwipeCandidate] {
        &self.accepted
    }

    /// Declined candidates, oldest swipe first
    pub fn declined(&self) -> &[SwipeCandidate] {
        &self.declined
    }

    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            accepted: self.accepted.len(),
            declined: self.declined.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accepted.is_empty() && self.declined.is_empty()
    }
}

#[inline]
fn position(list: &[SwipeCandidate], id: &str) -> Option<usize> {
    list.iter().position(|c| c.id() == id)
}

fn take(list: &mut Vec<SwipeCandidate>, id: &str) -> Option<SwipeCandidate> {
    position(list, id).map(|idx| list.remove(idx))
}

fn insert(list: &mut Vec<SwipeCandidate>, candidate: SwipeCandidate, moved: bool) -> SwipeOutcome {
    if position(list, candidate.id()).is_some() {
        return SwipeOutcome::Unchanged;
    }
    list.push(candidate);
    if moved {
        SwipeOutcome::Moved
    } else {
        SwipeOutcome::Inserted
    }
}
