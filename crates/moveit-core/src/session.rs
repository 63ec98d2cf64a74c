//! The session context.
//!
//! A [`Session`] owns the progress state for one run together with its
//! collaborators: the snapshot store, the notifier and the challenge
//! selector. State changes only go through the methods below, and each one
//! ends by writing the full snapshot back to the store.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::challenge::{Catalog, Challenge, ChallengeSelector};
use crate::countdown::Countdown;
use crate::error::Result;
use crate::events::Event;
use crate::notify::{Notification, NotificationPermission, Notifier};
use crate::progress::Progress;
use crate::storage::{load_snapshot, save_snapshot, SnapshotStore};
use crate::view::ProgressView;

/// State that lives outside the persisted snapshot. A browser keeps this in
/// page memory; front ends that restart between actions (the CLI) carry it
/// over themselves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiState {
    #[serde(default)]
    pub active_challenge: Option<Challenge>,
    #[serde(default)]
    pub level_up_modal_open: bool,
    #[serde(default)]
    pub countdown: Countdown,
}

pub struct Session<S, N, R> {
    progress: Progress,
    countdown: Countdown,
    catalog: Catalog,
    store: S,
    notifier: N,
    selector: R,
}

impl<S, N, R> Session<S, N, R>
where
    S: SnapshotStore,
    N: Notifier,
    R: ChallengeSelector,
{
    /// Seed progress from `store` and ask for notification permission once.
    ///
    /// # Errors
    /// Returns an error only if the store cannot be read.
    pub fn load(store: S, mut notifier: N, selector: R, catalog: Catalog) -> Result<Self> {
        let snapshot = load_snapshot(&store)?;
        let permission = notifier.request_permission();
        debug!(?permission, "notification permission");
        info!(
            level = snapshot.level,
            current_xp = snapshot.current_xp,
            challenges_completed = snapshot.challenges_completed,
            "session loaded"
        );
        Ok(Self {
            progress: Progress::from_snapshot(snapshot),
            countdown: Countdown::default(),
            catalog,
            store,
            notifier,
            selector,
        })
    }

    pub fn with_countdown(mut self, countdown: Countdown) -> Self {
        self.countdown = countdown;
        self
    }

    /// Restore carried-over page state. A challenge that is no longer in the
    /// catalog is dropped.
    pub fn restore(&mut self, ui: UiState) {
        let active = ui
            .active_challenge
            .filter(|challenge| self.catalog.contains(challenge));
        self.progress.restore_ui(active, ui.level_up_modal_open);
        self.countdown = ui.countdown;
    }

    pub fn ui_state(&self) -> UiState {
        UiState {
            active_challenge: self.progress.active_challenge().cloned(),
            level_up_modal_open: self.progress.is_level_up_modal_open(),
            countdown: self.countdown.clone(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn countdown(&self) -> &Countdown {
        &self.countdown
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn into_store(self) -> S {
        self.store
    }

    pub fn view(&self) -> ProgressView {
        ProgressView::new(&self.progress, &self.countdown)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            level: self.progress.level(),
            current_xp: self.progress.current_xp(),
            xp_to_next_level: self.progress.xp_to_next_level(),
            challenges_completed: self.progress.challenges_completed(),
            active_challenge: self.progress.active_challenge().cloned(),
            level_up_modal_open: self.progress.is_level_up_modal_open(),
            countdown_state: self.countdown.state(),
            countdown_remaining_secs: self.countdown.remaining_secs(),
            at: Utc::now(),
        }
    }

    // ── Progress operations ──────────────────────────────────────────

    pub fn level_up(&mut self) -> Result<Event> {
        let event = self.progress.level_up();
        info!(level = self.progress.level(), "level up");
        self.sync()?;
        Ok(event)
    }

    pub fn close_level_up_modal(&mut self) -> Result<Option<Event>> {
        let event = self.progress.close_level_up_modal();
        self.sync()?;
        Ok(event)
    }

    /// Draw a new challenge, replacing any active one, and notify the user
    /// when permission was granted.
    pub fn start_new_challenge(&mut self) -> Result<Event> {
        let event = self
            .progress
            .start_new_challenge(&self.catalog, &mut self.selector);

        if let Event::ChallengeStarted {
            challenge,
            replaced,
            ..
        } = &event
        {
            info!(
                amount = challenge.amount,
                kind = challenge.challenge_type.label(),
                replaced,
                "challenge started"
            );
            self.send_notification(&Notification::new_challenge(challenge.amount));
        }

        self.sync()?;
        Ok(event)
    }

    pub fn reset_challenge(&mut self) -> Result<Option<Event>> {
        let event = self.progress.reset_challenge();
        if event.is_some() {
            info!("challenge reset");
        }
        self.sync()?;
        Ok(event)
    }

    /// Returns no events when nothing was active.
    pub fn complete_challenge(&mut self) -> Result<Vec<Event>> {
        let events = self.progress.complete_challenge();
        if !events.is_empty() {
            info!(
                level = self.progress.level(),
                current_xp = self.progress.current_xp(),
                challenges_completed = self.progress.challenges_completed(),
                "challenge completed"
            );
        }
        self.sync()?;
        Ok(events)
    }

    // ── Challenge box actions ────────────────────────────────────────

    /// "Completed": award the challenge and start a fresh cycle.
    pub fn challenge_succeeded(&mut self) -> Result<Vec<Event>> {
        let mut events = self.complete_challenge()?;
        events.push(self.countdown.reset());
        Ok(events)
    }

    /// "Failed": discard the challenge and start a fresh cycle.
    pub fn challenge_failed(&mut self) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self.reset_challenge()?.into_iter().collect();
        events.push(self.countdown.reset());
        Ok(events)
    }

    // ── Countdown ────────────────────────────────────────────────────

    pub fn start_countdown(&mut self) -> Option<Event> {
        self.countdown.start()
    }

    pub fn reset_countdown(&mut self) -> Event {
        self.countdown.reset()
    }

    /// Apply a configured cycle length. A countdown of a different length is
    /// replaced by a fresh idle one; returns whether that happened.
    pub fn set_countdown_duration_secs(&mut self, duration_secs: u64) -> bool {
        if self.countdown.duration_secs() == duration_secs {
            return false;
        }
        info!(
            from = self.countdown.duration_secs(),
            to = duration_secs,
            "countdown length changed"
        );
        self.countdown.set_duration_secs(duration_secs);
        true
    }

    pub fn tick_countdown(&mut self) -> Result<Vec<Event>> {
        let now = crate::countdown::now_ms();
        self.tick_countdown_at(now)
    }

    /// Advance the countdown; when it finishes, a new challenge starts.
    pub fn tick_countdown_at(&mut self, now_ms: u64) -> Result<Vec<Event>> {
        let Some(finished) = self.countdown.tick_at(now_ms) else {
            return Ok(Vec::new());
        };
        info!("countdown finished");
        let started = self.start_new_challenge()?;
        Ok(vec![finished, started])
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn send_notification(&mut self, notification: &Notification) {
        if self.notifier.permission() != NotificationPermission::Granted {
            debug!("notification suppressed, permission not granted");
            return;
        }
        if let Err(e) = self.notifier.notify(notification) {
            warn!(error = %e, "failed to deliver notification");
        }
    }

    /// Write the full snapshot after a transition.
    fn sync(&mut self) -> Result<()> {
        let snapshot = self.progress.snapshot();
        save_snapshot(&mut self.store, &snapshot)?;
        debug!(?snapshot, "snapshot synchronized");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::FixedSelector;
    use crate::countdown::CountdownState;
    use crate::notify::RecordingNotifier;
    use crate::storage::{MemoryStore, CURRENT_XP_KEY, LEVEL_KEY};

    type TestSession = Session<MemoryStore, RecordingNotifier, FixedSelector>;

    fn session(store: MemoryStore, notifier: RecordingNotifier) -> TestSession {
        Session::load(
            store,
            notifier,
            FixedSelector::new(vec![0]),
            Catalog::builtin().unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn load_requests_permission_once() {
        let s = session(MemoryStore::new(), RecordingNotifier::granted());
        assert_eq!(s.notifier().requests, 1);
        assert_eq!(s.notifier().permission(), NotificationPermission::Granted);
    }

    #[test]
    fn every_operation_writes_the_snapshot() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied());
        s.start_new_challenge().unwrap();
        assert_eq!(s.store().writes(), 3);
        s.complete_challenge().unwrap();
        assert_eq!(s.store().writes(), 6);
        s.reset_challenge().unwrap();
        assert_eq!(s.store().writes(), 9);
        s.close_level_up_modal().unwrap();
        assert_eq!(s.store().writes(), 12);
    }

    #[test]
    fn completion_is_persisted() {
        let store = MemoryStore::with_values([(LEVEL_KEY, "1"), (CURRENT_XP_KEY, "90")]);
        let mut s = session(store, RecordingNotifier::denied());
        s.start_new_challenge().unwrap();
        s.complete_challenge().unwrap();
        // First builtin challenge is worth 400: 90 + 400 - 100.
        assert_eq!(s.store().get(LEVEL_KEY).unwrap().as_deref(), Some("2"));
        assert_eq!(s.store().get(CURRENT_XP_KEY).unwrap().as_deref(), Some("390"));
    }

    #[test]
    fn granted_permission_sends_notification() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::granted());
        s.start_new_challenge().unwrap();
        assert_eq!(s.notifier().sent, vec![Notification::new_challenge(400)]);
    }

    #[test]
    fn denied_permission_suppresses_notification() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied());
        s.start_new_challenge().unwrap();
        assert!(s.notifier().sent.is_empty());
        assert!(s.progress().active_challenge().is_some());
    }

    #[test]
    fn finished_countdown_starts_a_challenge() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied())
            .with_countdown(Countdown::new(10));
        s.countdown.start_at(0);
        assert!(s.tick_countdown_at(5_000).unwrap().is_empty());
        let events = s.tick_countdown_at(10_000).unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], Event::CountdownFinished { .. }));
        assert!(matches!(events[1], Event::ChallengeStarted { .. }));
        assert!(s.progress().active_challenge().is_some());
    }

    #[test]
    fn succeeded_resets_countdown() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied())
            .with_countdown(Countdown::new(1));
        s.countdown.start_at(0);
        s.tick_countdown_at(1_000).unwrap();
        assert_eq!(s.countdown().state(), CountdownState::Finished);

        let events = s.challenge_succeeded().unwrap();
        assert_eq!(s.countdown().state(), CountdownState::Idle);
        assert_eq!(s.progress().challenges_completed(), 1);
        assert!(matches!(events.last(), Some(Event::CountdownReset { .. })));
    }

    #[test]
    fn failed_discards_and_resets_countdown() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied());
        s.start_new_challenge().unwrap();
        let events = s.challenge_failed().unwrap();
        assert_eq!(events.len(), 2);
        assert!(s.progress().active_challenge().is_none());
        assert_eq!(s.progress().current_xp(), 0);
    }

    #[test]
    fn ui_state_roundtrip() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied());
        s.start_new_challenge().unwrap();
        s.level_up().unwrap();
        let ui = s.ui_state();

        let mut fresh = session(MemoryStore::new(), RecordingNotifier::denied());
        fresh.restore(ui.clone());
        assert_eq!(fresh.ui_state(), ui);
    }

    #[test]
    fn restore_drops_unknown_challenge() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied());
        s.restore(UiState {
            active_challenge: Some(Challenge {
                challenge_type: crate::challenge::ChallengeType::Eye,
                description: "not in the catalog".into(),
                amount: 5,
            }),
            ..UiState::default()
        });
        assert!(s.progress().active_challenge().is_none());
    }

    #[test]
    fn changed_duration_replaces_restored_countdown() {
        let mut s = session(MemoryStore::new(), RecordingNotifier::denied());
        let mut running = Countdown::new(1500);
        running.start_at(0);
        s.restore(UiState {
            countdown: running,
            ..UiState::default()
        });

        assert!(!s.set_countdown_duration_secs(1500));
        assert_eq!(s.countdown().state(), CountdownState::Running);

        assert!(s.set_countdown_duration_secs(300));
        assert_eq!(s.countdown().state(), CountdownState::Idle);
        assert_eq!(s.countdown().remaining_secs(), 300);
        match s.start_countdown() {
            Some(Event::CountdownStarted { duration_secs, .. }) => assert_eq!(duration_secs, 300),
            other => panic!("expected CountdownStarted, got {other:?}"),
        }
    }
}
