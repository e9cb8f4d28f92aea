//! Clocks and the drill countdown.
//!
//! Time is read through the [`Clock`] trait in epoch milliseconds so that
//! drills can be driven by a [`ManualClock`] in tests and by the system
//! clock in the trainer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Source of wall-clock time in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> u64;
}

/// Reads the operating system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Hand-driven clock. Clones share the same reading.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new(start_ms: u64) -> Self {
        Self {
            now: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}

/// Fixed-length countdown for a drill session.
///
/// The countdown is idle until [`start`](Countdown::start) and reports its
/// full length while idle, matching a timer that resets whenever the drill
/// is not running.
#[derive(Debug, Clone)]
pub struct Countdown {
    /// Total session length
    length: Duration,
    /// Epoch ms at which the countdown was started (None = idle)
    started_at: Option<u64>,
    /// Threshold below which the remaining time is shown as low
    low_time: Duration,
}

impl Countdown {
    pub fn new(length: Duration) -> Self {
        Self {
            length,
            started_at: None,
            low_time: Duration::from_secs(30),
        }
    }

    pub fn with_low_time(mut self, low_time: Duration) -> Self {
        self.low_time = low_time;
        self
    }

    pub fn length(&self) -> Duration {
        self.length
    }

    /// Start (or restart) the countdown at `now_ms`.
    pub fn start(&mut self, now_ms: u64) {
        self.started_at = Some(now_ms);
    }

    /// Stop and reset to the full length.
    pub fn stop(&mut self) {
        self.started_at = None;
    }

    pub fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    /// Remaining time at `now_ms`; the full length while idle.
    pub fn remaining(&self, now_ms: u64) -> Duration {
        match self.started_at {
            Some(start) => {
                let elapsed = Duration::from_millis(now_ms.saturating_sub(start));
                self.length.saturating_sub(elapsed)
            }
            None => self.length,
        }
    }

    /// True once a running countdown reaches zero.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.is_running() && self.remaining(now_ms).is_zero()
    }

    pub fn is_low_time(&self, now_ms: u64) -> bool {
        self.is_running() && self.remaining(now_ms) <= self.low_time
    }

    /// Format a duration as M:SS (whole seconds, rounded down).
    pub fn format(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        format!("{}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(Duration::from_secs(3 * 60))
    }
}

#[cfg(test)]
#[path = "time_control_tests.rs"]
mod time_control_tests;
