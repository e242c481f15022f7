//! Change-notification debouncing
//!
//! Rapid repeated configuration edits collapse to a single
//! synthesis-and-apply after a fixed quiescence window. Time is passed
//! in explicitly, so the policy is deterministic and testable without a
//! real clock.

use std::time::{Duration, Instant};

/// Fixed-window debouncer
#[derive(Debug)]
pub struct Debounce {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debounce {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record a change notification; the window restarts from `now`
    pub fn notify(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Whether the window has expired. Fires at most once per armed
    /// notification burst.
    pub fn fire(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Whether a notification is waiting for quiescence
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Drop any armed notification (owning context teardown)
    pub fn disarm(&mut self) {
        self.deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_burst_collapses_to_one_fire() {
        let mut d = Debounce::new(Duration::from_millis(100));
        let t0 = Instant::now();

        d.notify(t0);
        d.notify(t0 + Duration::from_millis(30));
        d.notify(t0 + Duration::from_millis(60));

        // still inside the window restarted by the last notify
        assert!(!d.fire(t0 + Duration::from_millis(100)));
        assert!(d.fire(t0 + Duration::from_millis(160)));
        // quiescent again
        assert!(!d.fire(t0 + Duration::from_millis(500)));
    }

    #[test]
    fn test_fire_without_notify_is_false() {
        let mut d = Debounce::new(Duration::from_millis(100));
        assert!(!d.is_armed());
        assert!(!d.fire(Instant::now()));
    }

    #[test]
    fn test_disarm_swallows_pending_notification() {
        let mut d = Debounce::new(Duration::from_millis(10));
        let t0 = Instant::now();
        d.notify(t0);
        assert!(d.is_armed());
        d.disarm();
        assert!(!d.fire(t0 + Duration::from_secs(1)));
    }
}
