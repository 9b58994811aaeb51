//! FIFO admission queue guarding exclusive device access.
//!
//! Invariant: at most one thread holds the floor at any instant, and waiters
//! are admitted strictly in arrival order.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard};
use std::thread::{self, ThreadId};

use super::ChannelError;

#[derive(Debug, Default)]
struct FloorState {
    queue: VecDeque<u64>,
    holder: Option<(u64, ThreadId)>,
    next_ticket: u64,
    closed: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FloorQueue {
    state: Mutex<FloorState>,
    admitted: Condvar,
}

// A panicking device or renderer must not wedge the queue, so poisoned locks
// are recovered rather than propagated.
fn lock_state(state: &Mutex<FloorState>) -> MutexGuard<'_, FloorState> {
    match state.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

impl FloorQueue {
    /// Wait in line for the floor and take it.
    ///
    /// Fails with [`ChannelError::Reentrant`] when the calling thread already
    /// holds the floor, and with [`ChannelError::Closed`] when the channel
    /// was closed by the time this caller was admitted. The closed check runs
    /// strictly after admission; a close racing with waiters therefore drains
    /// the queue instead of corrupting it.
    pub(crate) fn acquire(&self) -> Result<FloorGuard<'_>, ChannelError> {
        let me = thread::current().id();
        let mut state = lock_state(&self.state);

        if let Some((_, owner)) = state.holder {
            if owner == me {
                return Err(ChannelError::Reentrant);
            }
        }

        let ticket = state.next_ticket;
        state.next_ticket = state.next_ticket.wrapping_add(1);
        state.queue.push_back(ticket);

        while state.queue.front() != Some(&ticket) || state.holder.is_some() {
            state = match self.admitted.wait(state) {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
        }

        state.queue.pop_front();
        state.holder = Some((ticket, me));

        if state.closed {
            state.holder = None;
            drop(state);
            self.admitted.notify_all();
            return Err(ChannelError::Closed);
        }

        Ok(FloorGuard { floor: self })
    }

    pub(crate) fn is_closed(&self) -> bool {
        lock_state(&self.state).closed
    }

    #[cfg(test)]
    fn waiting(&self) -> usize {
        lock_state(&self.state).queue.len()
    }
}

/// Exclusive hold on the floor; dropping it releases and wakes all waiters.
#[derive(Debug)]
pub(crate) struct FloorGuard<'a> {
    floor: &'a FloorQueue,
}

impl FloorGuard<'_> {
    /// Mark the channel closed while still holding the floor.
    pub(crate) fn mark_closed(&self) {
        lock_state(&self.floor.state).closed = true;
    }
}

impl Drop for FloorGuard<'_> {
    fn drop(&mut self) {
        lock_state(&self.floor.state).holder = None;
        self.floor.admitted.notify_all();
    }
}
