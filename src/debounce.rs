//! Trailing-edge debounce
//!
//! The debouncer is driven by the caller's clock: [`Debouncer::set`]
//! records input, [`Debouncer::poll`] commits it once the input has been
//! quiet for the full delay. The UI calls `poll` on every tick.

use std::time::{Duration, Instant};

/// Delay used when none is given
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Delays a changing value until it settles
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    value: T,
    pending: Option<Pending<T>>,
    delay: Duration,
}

impl<T: Clone> Debouncer<T> {
    /// Debouncer starting at `initial` with the default delay
    pub fn new(initial: T) -> Self {
        Self::with_delay(initial, DEFAULT_DELAY)
    }

    pub fn with_delay(initial: T, delay: Duration) -> Self {
        Self {
            value: initial,
            pending: None,
            delay,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// The committed (trailing) value
    pub fn value(&self) -> &T {
        &self.value
    }

    /// The latest input still waiting out its delay
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref().map(|p| &p.value)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// When the pending input will commit
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    /// Arm `value` unconditionally, restarting the window from `now`
    pub fn schedule(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Commit the pending input right away, skipping the rest of its
    /// window. Returns the newly committed value, if there was one.
    pub fn flush(&mut self) -> Option<&T> {
        let p = self.pending.take()?;
        self.value = p.value;
        Some(&self.value)
    }

    /// Commit the pending input if its window has fully elapsed.
    /// Returns the newly committed value, once.
    pub fn poll(&mut self, now: Instant) -> Option<&T> {
        match self.pending.take() {
            Some(p) if now >= p.deadline => {
                self.value = p.value;
                Some(&self.value)
            }
            other => {
                self.pending = other;
                None
            }
        }
    }

    /// Drop the pending input without committing it
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Record new input. Input that differs from the latest one (the pending
    /// value, else the committed value) supersedes it and restarts the
    /// window from `now`. Repeating the latest input changes nothing.
    pub fn set(&mut self, value: T, now: Instant) {
        let latest = self.pending().unwrap_or(&self.value);
        if *latest == value {
            return;
        }
        self.schedule(value, now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn defaults_to_500ms() {
        let d = Debouncer::new(String::new());
        assert_eq!(d.delay(), ms(500));
    }

    #[test]
    fn commits_only_after_the_full_delay() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(String::new());
        d.set("rust".to_string(), t0);

        assert_eq!(d.poll(t0 + ms(499)), None);
        assert_eq!(d.value(), "");
        assert_eq!(d.poll(t0 + ms(500)).map(String::as_str), Some("rust"));
        assert_eq!(d.value(), "rust");
        // Committed once
        assert_eq!(d.poll(t0 + ms(900)), None);
    }

    #[test]
    fn rapid_changes_supersede_each_other() {
        let t0 = Instant::now();
        let mut d = Debouncer::with_delay(String::new(), ms(1000));
        let mut committed = Vec::new();

        for (i, term) in ["c", "ca", "cat"].iter().enumerate() {
            let now = t0 + ms(300 * i as u64);
            if let Some(v) = d.poll(now) {
                committed.push(v.clone());
            }
            d.set(term.to_string(), now);
        }
        // Last input at 600ms; nothing commits before 1600ms
        assert_eq!(d.poll(t0 + ms(1599)), None);
        if let Some(v) = d.poll(t0 + ms(1600)) {
            committed.push(v.clone());
        }
        assert_eq!(committed, vec!["cat".to_string()]);
    }

    #[test]
    fn cancel_discards_pending_input() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(1);
        d.set(2, t0);
        assert_eq!(d.pending(), Some(&2));
        d.cancel();
        assert_eq!(d.poll(t0 + ms(10_000)), None);
        assert_eq!(*d.value(), 1);
    }

    #[test]
    fn repeating_the_same_input_keeps_the_deadline() {
        let t0 = Instant::now();
        let mut d = Debouncer::new("".to_string());
        d.set("cat".to_string(), t0);

        // Fed on every tick, unchanged
        let mut committed = None;
        for tick in 1..=20 {
            let now = t0 + ms(100 * tick);
            if let Some(v) = d.poll(now) {
                committed = Some((v.clone(), tick));
            }
            d.set("cat".to_string(), now);
        }
        assert_eq!(committed, Some(("cat".to_string(), 5)));
        assert!(!d.is_pending());
    }

    #[test]
    fn committed_value_again_arms_nothing() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(0);
        d.set(0, t0);
        assert!(!d.is_pending());
        assert_eq!(d.poll(t0 + ms(500)), None);

        // Going back to the committed value still supersedes a pending edit
        d.set(1, t0);
        d.set(0, t0 + ms(100));
        assert_eq!(d.pending(), Some(&0));
        assert_eq!(d.deadline(), Some(t0 + ms(600)));
    }

    #[test]
    fn schedule_always_arms() {
        let t0 = Instant::now();
        let mut d = Debouncer::new(0);
        d.schedule(0, t0);
        assert_eq!(d.deadline(), Some(t0 + ms(500)));
        assert_eq!(d.poll(t0 + ms(500)), Some(&0));
    }

    #[test]
    fn flush_commits_pending_input_early() {
        let t0 = Instant::now();
        let mut d = Debouncer::new("".to_string());
        assert_eq!(d.flush(), None);

        d.set("cat".to_string(), t0);
        assert_eq!(d.flush().map(String::as_str), Some("cat"));
        assert_eq!(d.value(), "cat");
        assert_eq!(d.poll(t0 + ms(10_000)), None);
    }
}
