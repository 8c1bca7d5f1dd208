//! Last-write-wins holder for the displayed snapshot.
//!
//! Each refresh takes a [`RefreshTicket`] before it starts fetching. When it
//! finishes, [`RefreshSlot::apply`] installs its result only if no newer
//! refresh has started in the meantime. Results of superseded refreshes are
//! dropped whole; old and new results are never merged.

use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

/// Generation number handed to a refresh when it starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct SlotState<T> {
    issued: u64,
    applied: Option<u64>,
    value: Option<T>,
}

/// Shared slot holding the most recently started refresh's result.
#[derive(Debug)]
pub struct RefreshSlot<T> {
    state: Mutex<SlotState<T>>,
}

impl<T> Default for RefreshSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RefreshSlot<T> {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SlotState {
                issued: 0,
                applied: None,
                value: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        // The state is always left consistent, so a poisoned lock is still usable
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a refresh; supersedes every ticket issued before it.
    pub fn begin(&self) -> RefreshTicket {
        let mut state = self.lock();
        state.issued += 1;
        RefreshTicket(state.issued)
    }

    /// Install `value` if `ticket` belongs to the latest refresh.
    ///
    /// Returns `false` and drops `value` when a newer refresh has started.
    pub fn apply(&self, ticket: RefreshTicket, value: T) -> bool {
        let mut state = self.lock();
        if ticket.0 != state.issued {
            debug!(
                ticket = ticket.0,
                latest = state.issued,
                "discarding result of superseded refresh"
            );
            return false;
        }
        state.value = Some(value);
        state.applied = Some(ticket.0);
        true
    }

    /// Whether a refresh newer than the displayed value is in flight.
    pub fn is_pending(&self) -> bool {
        let state = self.lock();
        state.applied != Some(state.issued) && state.issued > 0
    }

    /// Generation of the displayed value, if any.
    pub fn applied_generation(&self) -> Option<u64> {
        self.lock().applied
    }

    /// Take the displayed value out, leaving the slot empty.
    pub fn take(&self) -> Option<T> {
        let mut state = self.lock();
        state.applied = None;
        state.value.take()
    }
}

impl<T: Clone> RefreshSlot<T> {
    /// Copy of the displayed value.
    pub fn current(&self) -> Option<T> {
        self.lock().value.clone()
    }
}
