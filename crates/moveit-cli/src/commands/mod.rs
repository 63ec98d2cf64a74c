//! Subcommand handlers.
//!
//! Every invocation is one page load: open the session from the data
//! directory, catch the countdown up with the wall clock, apply the action,
//! and write the carried-over page state back.

pub mod challenge;
pub mod config;
pub mod cookies;
pub mod countdown;
pub mod modal;
pub mod profile;

use std::error::Error;
use std::io::Stderr;

use moveit_core::{
    Catalog, Config, ConsoleNotifier, Database, Event, NotificationPermission,
    RandomSelector, Session, UiState,
};
use tracing::debug;

/// kv key for the page state that is not part of the snapshot.
const UI_STATE_KEY: &str = "ui_state";

pub type CliSession = Session<Database, ConsoleNotifier<Stderr>, RandomSelector>;

/// Open the session and tick the countdown. Returns the events the tick
/// produced (a finished cycle starts a challenge).
pub fn open_session() -> Result<(CliSession, Vec<Event>), Box<dyn Error>> {
    let mut config = Config::load()?;
    let db = Database::open()?;
    let ui: Option<UiState> = db.kv_get_json(UI_STATE_KEY)?;

    let notifier = ConsoleNotifier::new(
        config.notifications.permission,
        config.notifications.enabled,
        std::io::stderr(),
    );
    let selector = RandomSelector::from_seed_option(config.challenges.seed);
    let mut session = Session::load(db, notifier, selector, Catalog::builtin()?)?;

    // Remember the permission answer so it is only asked for once.
    let answer = session.notifier().answer();
    if config.notifications.permission == NotificationPermission::Default
        && answer != NotificationPermission::Default
    {
        config.notifications.permission = answer;
        config.save()?;
    }

    session.restore(ui.unwrap_or_else(|| UiState {
        countdown: config.countdown(),
        ..UiState::default()
    }));
    session.set_countdown_duration_secs(config.countdown().duration_secs());

    let ticked = session.tick_countdown()?;
    debug!(events = ticked.len(), "countdown caught up");
    Ok((session, ticked))
}

pub fn save_session(session: &CliSession) -> Result<(), Box<dyn Error>> {
    session
        .store()
        .kv_set_json(UI_STATE_KEY, &session.ui_state())?;
    Ok(())
}

pub fn print_events(events: &[Event], json: bool) -> Result<(), Box<dyn Error>> {
    for event in events {
        if json {
            println!("{}", serde_json::to_string_pretty(event)?);
        } else {
            println!("{}", describe(event));
        }
    }
    Ok(())
}

fn describe(event: &Event) -> String {
    match event {
        Event::ChallengeStarted {
            challenge,
            replaced,
            ..
        } => {
            let prefix = if *replaced { "Challenge replaced" } else { "New challenge" };
            format!(
                "{prefix}: worth {} xp [{}]\n  {}",
                challenge.amount,
                challenge.challenge_type.label(),
                challenge.description
            )
        }
        Event::ChallengeCompleted {
            amount,
            current_xp,
            challenges_completed,
            ..
        } => format!(
            "Challenge completed: +{amount} xp (now {current_xp} xp, {challenges_completed} completed)"
        ),
        Event::ChallengeReset { .. } => "Challenge discarded".to_string(),
        Event::LevelUp { level, .. } => format!("Level up! You reached level {level}."),
        Event::LevelUpModalClosed { .. } => "Level-up message dismissed".to_string(),
        Event::CountdownStarted { duration_secs, .. } => {
            format!("Cycle started: {} minutes", duration_secs / 60)
        }
        Event::CountdownReset { .. } => "Cycle reset".to_string(),
        Event::CountdownFinished { .. } => "Cycle finished".to_string(),
        Event::StateSnapshot {
            level,
            current_xp,
            xp_to_next_level,
            challenges_completed,
            ..
        } => format!(
            "Level {level}, {current_xp}/{xp_to_next_level} xp, {challenges_completed} completed"
        ),
    }
}
