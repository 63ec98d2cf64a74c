//! Focus cycle countdown.
//!
//! The countdown is a wall-clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()`
//! periodically.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> Finished
//!   ^________|__________|  (reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut countdown = Countdown::default();
//! countdown.start();
//! // In a loop:
//! countdown.tick(); // Returns Some(Event::CountdownFinished) once
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::events::Event;

/// Length of one focus cycle.
pub const DEFAULT_DURATION_SECS: u64 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    /// Reached zero. Stays here until `reset()`.
    Finished,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Countdown {
    duration_secs: u64,
    state: CountdownState,
    /// Remaining time in milliseconds.
    remaining_ms: u64,
    /// Timestamp (ms since epoch) of the last start or tick while running.
    #[serde(default)]
    last_tick_epoch_ms: Option<u64>,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS)
    }
}

impl Countdown {
    pub fn new(duration_secs: u64) -> Self {
        Self {
            duration_secs,
            state: CountdownState::Idle,
            remaining_ms: duration_secs.saturating_mul(1000),
            last_tick_epoch_ms: None,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn duration_secs(&self) -> u64 {
        self.duration_secs
    }

    pub fn remaining_ms(&self) -> u64 {
        self.remaining_ms
    }

    /// Whole seconds left, rounded up so `00:00` only shows once finished.
    pub fn remaining_secs(&self) -> u64 {
        self.remaining_ms.div_ceil(1000)
    }

    pub fn minutes(&self) -> u64 {
        self.remaining_secs() / 60
    }

    pub fn seconds(&self) -> u64 {
        self.remaining_secs() % 60
    }

    pub fn is_active(&self) -> bool {
        self.state == CountdownState::Running
    }

    pub fn has_finished(&self) -> bool {
        self.state == CountdownState::Finished
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        self.start_at(now_ms())
    }

    pub fn start_at(&mut self, now_ms: u64) -> Option<Event> {
        match self.state {
            CountdownState::Idle => {
                self.state = CountdownState::Running;
                self.last_tick_epoch_ms = Some(now_ms);
                Some(Event::CountdownStarted {
                    duration_secs: self.duration_secs,
                    at: Utc::now(),
                })
            }
            // Already running, or waiting for a reset after finishing.
            CountdownState::Running | CountdownState::Finished => None,
        }
    }

    /// Abandon the cycle and return to a full, idle countdown.
    pub fn reset(&mut self) -> Event {
        self.state = CountdownState::Idle;
        self.last_tick_epoch_ms = None;
        self.remaining_ms = self.duration_secs.saturating_mul(1000);
        Event::CountdownReset { at: Utc::now() }
    }

    /// Call periodically. Returns `Some(Event::CountdownFinished)` when the
    /// countdown reaches zero.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(now_ms())
    }

    pub fn tick_at(&mut self, now_ms: u64) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.flush_elapsed(now_ms);
        if self.remaining_ms == 0 {
            self.state = CountdownState::Finished;
            self.last_tick_epoch_ms = None;
            return Some(Event::CountdownFinished { at: Utc::now() });
        }
        None
    }

    /// Change the cycle length. Resets the countdown.
    pub fn set_duration_secs(&mut self, duration_secs: u64) {
        self.duration_secs = duration_secs;
        self.reset();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn flush_elapsed(&mut self, now_ms: u64) {
        if let Some(last) = self.last_tick_epoch_ms {
            let elapsed = now_ms.saturating_sub(last);
            self.remaining_ms = self.remaining_ms.saturating_sub(elapsed);
            self.last_tick_epoch_ms = Some(now_ms);
        }
    }
}

pub(crate) fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
