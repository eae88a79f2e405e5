//! Host timer bookkeeping.
//!
//! Zellij timers cannot be cancelled and fire as `Timer(seconds)` carrying
//! only the delay they were scheduled with. The queue remembers what each
//! scheduled timer was for and resolves a fired timer to the earliest pending
//! purpose with the same delay. Timers with equal delays fire in scheduling
//! order, so this pairing is exact.

use std::collections::VecDeque;
use std::time::Duration;

/// Delays closer than this are considered equal.
const DELAY_TOLERANCE: f64 = 1e-3;

/// What a scheduled timer is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerPurpose {
    /// Search debounce ticket; stale tickets are ignored by the controller.
    SearchDebounce(u64),
    /// Dismiss the toast with this id.
    DismissToast(u64),
}

#[derive(Debug, Clone, Copy)]
struct Scheduled {
    purpose: TimerPurpose,
    seconds: f64,
}

/// Pending host timers in scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    pending: VecDeque<Scheduled>,
}

impl TimerQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a timer and returns the delay to hand to the host, in seconds.
    pub fn schedule(&mut self, purpose: TimerPurpose, delay: Duration) -> f64 {
        let seconds = delay.as_secs_f64();
        self.pending.push_back(Scheduled { purpose, seconds });
        seconds
    }

    /// Resolves a fired timer.
    ///
    /// Falls back to the oldest pending timer when no delay matches.
    pub fn resolve(&mut self, elapsed: f64) -> Option<TimerPurpose> {
        let index = self
            .pending
            .iter()
            .position(|timer| (timer.seconds - elapsed).abs() < DELAY_TOLERANCE)
            .or_else(|| {
                tracing::debug!(elapsed = elapsed, "no timer with matching delay, taking oldest");
                (!self.pending.is_empty()).then_some(0)
            })?;
        self.pending.remove(index).map(|timer| timer.purpose)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_by_delay_then_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(TimerPurpose::DismissToast(1), Duration::from_secs(4));
        timers.schedule(TimerPurpose::SearchDebounce(1), Duration::from_millis(500));
        timers.schedule(TimerPurpose::SearchDebounce(2), Duration::from_millis(500));

        assert_eq!(timers.resolve(0.5), Some(TimerPurpose::SearchDebounce(1)));
        assert_eq!(timers.resolve(0.5), Some(TimerPurpose::SearchDebounce(2)));
        assert_eq!(timers.resolve(4.0), Some(TimerPurpose::DismissToast(1)));
        assert_eq!(timers.resolve(4.0), None);
    }

    #[test]
    fn unmatched_delay_takes_oldest() {
        let mut timers = TimerQueue::new();
        timers.schedule(TimerPurpose::DismissToast(7), Duration::from_secs(4));
        assert_eq!(timers.resolve(1.0), Some(TimerPurpose::DismissToast(7)));
        assert!(timers.is_empty());
    }
}
