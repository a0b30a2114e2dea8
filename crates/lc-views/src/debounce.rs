//! Rate limiting for continuous pointer input

use std::time::{Duration, Instant};

/// Coalesces values so at most one is released per interval
///
/// The first value after a quiet period is released immediately. Values that
/// arrive inside the interval replace each other and the latest one is
/// released by [`Debouncer::poll`] once the interval has passed. Time is
/// passed in by the caller so the host's event loop stays in charge.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    interval: Duration,
    last_release: Option<Instant>,
    pending: Option<T>,
}

impl<T> Debouncer<T> {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_release: None,
            pending: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Offer a value, returning it if it may be applied now
    pub fn submit(&mut self, now: Instant, value: T) -> Option<T> {
        if self.ready(now) {
            self.pending = None;
            self.last_release = Some(now);
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Release the deferred value once its interval has passed
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        if self.pending.is_some() && self.ready(now) {
            self.last_release = Some(now);
            self.pending.take()
        } else {
            None
        }
    }

    /// Release the deferred value regardless of timing
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    /// Drop any deferred value and forget the last release
    pub fn reset(&mut self) {
        self.pending = None;
        self.last_release = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    fn ready(&self, now: Instant) -> bool {
        match self.last_release {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }
}
