//! Debounce timer for the search box.

use std::time::{Duration, Instant};

/// Default delay before a typed query is searched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Holds the latest value until input has been quiet for `delay`.
///
/// Time is passed in by the caller so the timer can be driven from the
/// UI loop and from tests alike.
#[derive(Debug)]
pub struct Debouncer {
    /// Quiet period required before firing.
    delay: Duration,
    /// Pending value and the instant it becomes due.
    pending: Option<(String, Instant)>,
}

impl Debouncer {
    /// Creates a debouncer with the given quiet period.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Replaces the pending value and restarts the quiet period from `now`.
    pub fn schedule(&mut self, value: String, now: Instant) {
        let due = now.checked_add(self.delay).unwrap_or(now);
        self.pending = Some((value, due));
    }

    /// Drops the pending value.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Returns `true` if a value is waiting to fire.
    #[cfg(test)]
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending value once it is due.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self.pending.as_ref().map(|(_, due)| *due)?;
        if now < due {
            return None;
        }
        self.pending.take().map(|(value, _)| value)
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::arithmetic_side_effects)]

    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn test_nothing_pending_initially() {
        // Arrange
        let mut debouncer = Debouncer::default();

        // Act & Assert
        assert!(!debouncer.is_pending());
        assert!(debouncer.poll(Instant::now()).is_none());
    }

    #[test]
    fn test_fires_after_quiet_period() {
        // Arrange
        let mut debouncer = Debouncer::new(MS * 500);
        let t0 = Instant::now();
        debouncer.schedule(String::from("star"), t0);

        // Act & Assert
        assert!(debouncer.poll(t0 + MS * 499).is_none());
        assert_eq!(debouncer.poll(t0 + MS * 500).as_deref(), Some("star"));
        assert!(debouncer.poll(t0 + MS * 1000).is_none());
    }

    #[test]
    fn test_rescheduling_restarts_the_timer() {
        // Arrange
        let mut debouncer = Debouncer::new(MS * 500);
        let t0 = Instant::now();

        // Act: three keystrokes 200ms apart
        debouncer.schedule(String::from("s"), t0);
        debouncer.schedule(String::from("st"), t0 + MS * 200);
        debouncer.schedule(String::from("sta"), t0 + MS * 400);

        // Assert: only the settled value fires, once
        assert!(debouncer.poll(t0 + MS * 800).is_none());
        assert_eq!(debouncer.poll(t0 + MS * 900).as_deref(), Some("sta"));
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_cancel_drops_pending_value() {
        // Arrange
        let mut debouncer = Debouncer::new(MS * 10);
        let t0 = Instant::now();
        debouncer.schedule(String::from("x"), t0);

        // Act
        debouncer.cancel();

        // Assert
        assert!(debouncer.poll(t0 + MS * 100).is_none());
    }
}
