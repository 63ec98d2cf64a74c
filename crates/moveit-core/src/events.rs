use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;
use crate::countdown::CountdownState;

/// Every state change in the system produces an Event.
/// The CLI prints them; front ends can poll or subscribe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ChallengeStarted {
        challenge: Challenge,
        /// True when an already active challenge was overwritten.
        replaced: bool,
        at: DateTime<Utc>,
    },
    ChallengeCompleted {
        amount: u32,
        current_xp: u64,
        challenges_completed: u64,
        at: DateTime<Utc>,
    },
    /// Active challenge discarded without reward.
    ChallengeReset {
        challenge: Challenge,
        at: DateTime<Utc>,
    },
    LevelUp {
        level: u32,
        at: DateTime<Utc>,
    },
    LevelUpModalClosed {
        at: DateTime<Utc>,
    },
    CountdownStarted {
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        at: DateTime<Utc>,
    },
    CountdownFinished {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        level: u32,
        current_xp: u64,
        xp_to_next_level: u64,
        challenges_completed: u64,
        active_challenge: Option<Challenge>,
        level_up_modal_open: bool,
        countdown_state: CountdownState,
        countdown_remaining_secs: u64,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short machine-friendly name, matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::ChallengeStarted { .. } => "ChallengeStarted",
            Event::ChallengeCompleted { .. } => "ChallengeCompleted",
            Event::ChallengeReset { .. } => "ChallengeReset",
            Event::LevelUp { .. } => "LevelUp",
            Event::LevelUpModalClosed { .. } => "LevelUpModalClosed",
            Event::CountdownStarted { .. } => "CountdownStarted",
            Event::CountdownReset { .. } => "CountdownReset",
            Event::CountdownFinished { .. } => "CountdownFinished",
            Event::StateSnapshot { .. } => "StateSnapshot",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_serialized_tag() {
        let event = Event::LevelUp {
            level: 3,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
        assert_eq!(json["level"], 3);
    }
}
