//! Level and experience state machine.
//!
//! ## Challenge slot
//!
//! ```text
//! None --start--> Active --(complete | reset)--> None
//! Active --start--> Active (overwrite)
//! ```
//!
//! Every operation is total: calling `complete_challenge` or
//! `reset_challenge` with nothing active is a silent no-op.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::challenge::{Catalog, Challenge, ChallengeSelector};
use crate::events::Event;

/// Experience needed to leave `level`: `((level + 1) * 4)^2`.
pub fn xp_to_next_level(level: u32) -> u64 {
    let base = (u64::from(level) + 1).saturating_mul(4);
    base.saturating_mul(base)
}

/// The persisted subset of [`Progress`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub level: u32,
    pub current_xp: u64,
    pub challenges_completed: u64,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            level: 1,
            current_xp: 0,
            challenges_completed: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    level: u32,
    current_xp: u64,
    challenges_completed: u64,
    active_challenge: Option<Challenge>,
    /// Raised by `level_up`, cleared by `close_level_up_modal`. Never persisted
    /// with the snapshot.
    level_up_modal_open: bool,
}

impl Default for Progress {
    fn default() -> Self {
        Self::from_snapshot(Snapshot::default())
    }
}

impl Progress {
    /// Seed from persisted values. A level of 0 is lifted to 1.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        Self {
            level: snapshot.level.max(1),
            current_xp: snapshot.current_xp,
            challenges_completed: snapshot.challenges_completed,
            active_challenge: None,
            level_up_modal_open: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn current_xp(&self) -> u64 {
        self.current_xp
    }

    pub fn challenges_completed(&self) -> u64 {
        self.challenges_completed
    }

    pub fn active_challenge(&self) -> Option<&Challenge> {
        self.active_challenge.as_ref()
    }

    pub fn is_level_up_modal_open(&self) -> bool {
        self.level_up_modal_open
    }

    pub fn xp_to_next_level(&self) -> u64 {
        xp_to_next_level(self.level)
    }

    /// Percentage of the current level's threshold already earned.
    pub fn percent_to_next_level(&self) -> f64 {
        let threshold = self.xp_to_next_level();
        if threshold == 0 {
            return 0.0;
        }
        (self.current_xp as f64 * 100.0).round() / threshold as f64
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            level: self.level,
            current_xp: self.current_xp,
            challenges_completed: self.challenges_completed,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn level_up(&mut self) -> Event {
        self.level = self.level.saturating_add(1);
        self.level_up_modal_open = true;
        Event::LevelUp {
            level: self.level,
            at: Utc::now(),
        }
    }

    /// Returns `None` when the modal was already closed.
    pub fn close_level_up_modal(&mut self) -> Option<Event> {
        if !self.level_up_modal_open {
            return None;
        }
        self.level_up_modal_open = false;
        Some(Event::LevelUpModalClosed { at: Utc::now() })
    }

    /// Draw a challenge and make it active, replacing any current one.
    pub fn start_new_challenge<R: ChallengeSelector + ?Sized>(
        &mut self,
        catalog: &Catalog,
        selector: &mut R,
    ) -> Event {
        let challenge = catalog.pick(selector.select(catalog.len())).clone();
        let replaced = self.active_challenge.replace(challenge.clone()).is_some();
        Event::ChallengeStarted {
            challenge,
            replaced,
            at: Utc::now(),
        }
    }

    /// Discard the active challenge without reward.
    pub fn reset_challenge(&mut self) -> Option<Event> {
        let challenge = self.active_challenge.take()?;
        Some(Event::ChallengeReset {
            challenge,
            at: Utc::now(),
        })
    }

    /// Award the active challenge. At most one level is crossed per award;
    /// any surplus beyond the next threshold stays in `current_xp`.
    pub fn complete_challenge(&mut self) -> Vec<Event> {
        let Some(challenge) = self.active_challenge.take() else {
            return Vec::new();
        };

        let mut events = Vec::with_capacity(2);
        let threshold = self.xp_to_next_level();
        let mut final_xp = self.current_xp.saturating_add(u64::from(challenge.amount));

        if final_xp >= threshold {
            final_xp -= threshold;
            events.push(self.level_up());
        }

        self.current_xp = final_xp;
        self.challenges_completed = self.challenges_completed.saturating_add(1);

        events.insert(
            0,
            Event::ChallengeCompleted {
                amount: challenge.amount,
                current_xp: self.current_xp,
                challenges_completed: self.challenges_completed,
                at: Utc::now(),
            },
        );
        events
    }

    pub(crate) fn restore_ui(&mut self, active_challenge: Option<Challenge>, level_up_modal_open: bool) {
        self.active_challenge = active_challenge;
        self.level_up_modal_open = level_up_modal_open;
    }
}
