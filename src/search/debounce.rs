//! Cancellable single-shot timer bookkeeping.
//!
//! The host cannot cancel a scheduled timer, so cancellation is logical:
//! every [`Debouncer::arm`] issues a new ticket and invalidates the previous
//! one. When a timer fires, [`Debouncer::fire`] accepts it only if its ticket
//! is the one currently pending, so at most one promotion happens per arm.

use std::time::Duration;

/// Handle for one scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerTicket {
    pub id: u64,
    pub delay: Duration,
}

/// At-most-one pending timer.
#[derive(Debug, Clone)]
pub struct Debouncer {
    delay: Duration,
    next_id: u64,
    pending: Option<u64>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: 1,
            pending: None,
        }
    }

    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Schedules a new ticket, replacing any pending one.
    pub fn arm(&mut self) -> TimerTicket {
        let id = self.next_id;
        self.next_id += 1;
        if let Some(previous) = self.pending.replace(id) {
            tracing::trace!(previous = previous, ticket = id, "debounce rearmed");
        }
        TimerTicket { id, delay: self.delay }
    }

    /// Drops the pending ticket, if any.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consumes the pending ticket if `id` matches it.
    ///
    /// Returns `false` for stale or cancelled tickets.
    pub fn fire(&mut self, id: u64) -> bool {
        if self.pending == Some(id) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rearming_invalidates_previous_ticket() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let first = debouncer.arm();
        let second = debouncer.arm();

        assert!(!debouncer.fire(first.id));
        assert!(debouncer.fire(second.id));
        assert!(!debouncer.fire(second.id));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn cancelled_ticket_never_fires() {
        let mut debouncer = Debouncer::new(Duration::from_millis(500));
        let ticket = debouncer.arm();
        debouncer.cancel();
        assert!(!debouncer.fire(ticket.id));
    }
}
