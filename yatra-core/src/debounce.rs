//! Quiet-period tracking for free-text input.
//!
//! The filter engine has no timing of its own. Hosts that re-filter on
//! every keystroke can use [`Debouncer`] to wait until typing settles. The
//! type never reads the clock itself; callers pass `Instant`s in, which
//! keeps it deterministic under test.

use std::time::{Duration, Instant};

/// Quiet period used when none is configured.
pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

/// Tracks the last input and reports when a quiet period has elapsed.
///
/// # Examples
/// ```
/// use std::time::{Duration, Instant};
/// use yatra_core::Debouncer;
///
/// let start = Instant::now();
/// let mut debouncer = Debouncer::new(Duration::from_millis(300));
/// debouncer.note_input(start);
///
/// assert!(!debouncer.take_if_settled(start + Duration::from_millis(100)));
/// assert!(debouncer.take_if_settled(start + Duration::from_millis(300)));
/// // Settling is reported once per burst.
/// assert!(!debouncer.take_if_settled(start + Duration::from_millis(900)));
/// ```
#[derive(Debug, Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    last_input: Option<Instant>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    /// Construct a debouncer with the given quiet period.
    pub const fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            last_input: None,
        }
    }

    /// The configured quiet period.
    pub const fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    /// Record an input event at `now`, restarting the quiet period.
    pub fn note_input(&mut self, now: Instant) {
        self.last_input = Some(now);
    }

    /// Whether an input burst is waiting to settle.
    pub const fn is_pending(&self) -> bool {
        self.last_input.is_some()
    }

    /// Time left until the pending burst settles, if any.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.last_input.map(|last| {
            self.quiet_period
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// Report whether the pending burst has settled at `now`.
    pub fn is_settled(&self, now: Instant) -> bool {
        self.remaining(now).is_some_and(|left| left.is_zero())
    }

    /// Consume a settled burst. Returns `true` once per burst.
    pub fn take_if_settled(&mut self, now: Instant) -> bool {
        if self.is_settled(now) {
            self.last_input = None;
            true
        } else {
            false
        }
    }
}
