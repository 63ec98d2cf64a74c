//! Text views over the session state.
//!
//! Each view is a pure function of a [`ProgressView`]; none of them holds
//! state of its own.

use serde::{Deserialize, Serialize};

use crate::challenge::Challenge;
use crate::countdown::{Countdown, CountdownState};
use crate::progress::Progress;

const BAR_WIDTH: usize = 40;

/// Read-only snapshot of everything the views display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressView {
    pub level: u32,
    pub current_xp: u64,
    pub xp_to_next_level: u64,
    pub percent_to_next_level: f64,
    pub challenges_completed: u64,
    pub active_challenge: Option<Challenge>,
    pub level_up_modal_open: bool,
    pub countdown_state: CountdownState,
    pub countdown_minutes: u64,
    pub countdown_seconds: u64,
}

impl ProgressView {
    pub fn new(progress: &Progress, countdown: &Countdown) -> Self {
        Self {
            level: progress.level(),
            current_xp: progress.current_xp(),
            xp_to_next_level: progress.xp_to_next_level(),
            percent_to_next_level: progress.percent_to_next_level(),
            challenges_completed: progress.challenges_completed(),
            active_challenge: progress.active_challenge().cloned(),
            level_up_modal_open: progress.is_level_up_modal_open(),
            countdown_state: countdown.state(),
            countdown_minutes: countdown.minutes(),
            countdown_seconds: countdown.seconds(),
        }
    }
}

/// `0 xp [#####.....] 25 xp 100 xp`
pub fn experience_bar(view: &ProgressView) -> String {
    let filled = ((view.percent_to_next_level / 100.0) * BAR_WIDTH as f64)
        .floor()
        .clamp(0.0, BAR_WIDTH as f64) as usize;
    format!(
        "0 xp [{}{}] {} xp / {} xp",
        "#".repeat(filled),
        ".".repeat(BAR_WIDTH - filled),
        view.current_xp,
        view.xp_to_next_level
    )
}

pub fn profile(view: &ProgressView) -> String {
    format!("Level {}", view.level)
}

pub fn completed_challenges(view: &ProgressView) -> String {
    format!("Completed challenges  {}", view.challenges_completed)
}

/// Two-digit split of a countdown component, e.g. `5` -> `['0', '5']`.
pub fn digits(value: u64) -> [char; 2] {
    let text = format!("{:02}", value.min(99));
    let mut chars = text.chars();
    [chars.next().unwrap_or('0'), chars.next().unwrap_or('0')]
}

pub fn countdown(view: &ProgressView) -> String {
    let [m1, m2] = digits(view.countdown_minutes);
    let [s1, s2] = digits(view.countdown_seconds);
    let status = match view.countdown_state {
        CountdownState::Idle => "start a cycle",
        CountdownState::Running => "abandon cycle",
        CountdownState::Finished => "cycle finished",
    };
    format!("{m1}{m2}:{s1}{s2}  ({status})")
}

pub fn challenge_box(view: &ProgressView) -> String {
    match &view.active_challenge {
        Some(challenge) => format!(
            "Worth {} xp\n[{}] New challenge\n{}\n  (failed)  (completed)",
            challenge.amount,
            challenge.challenge_type.label(),
            challenge.description
        ),
        None => "Finish a cycle to receive a challenge\n\
                 Level up by completing challenges."
            .to_string(),
    }
}

/// Present only while the level-up flag is raised.
pub fn level_up_modal(view: &ProgressView) -> Option<String> {
    view.level_up_modal_open.then(|| {
        format!(
            "*** {} ***\nCongratulations\nYou have reached a new level.",
            view.level
        )
    })
}

/// The whole page, top to bottom.
pub fn render_page(view: &ProgressView) -> String {
    let mut sections = vec![
        experience_bar(view),
        profile(view),
        completed_challenges(view),
        countdown(view),
        challenge_box(view),
    ];
    if let Some(modal) = level_up_modal(view) {
        sections.push(modal);
    }
    sections.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::challenge::ChallengeType;
    use crate::progress::Snapshot;

    fn view(level: u32, current_xp: u64) -> ProgressView {
        let progress = Progress::from_snapshot(Snapshot {
            level,
            current_xp,
            challenges_completed: 4,
        });
        ProgressView::new(&progress, &Countdown::default())
    }

    #[test]
    fn experience_bar_fills_proportionally() {
        let bar = experience_bar(&view(1, 50));
        assert!(bar.contains(&format!("[{}{}]", "#".repeat(20), ".".repeat(20))));
        assert!(bar.ends_with("50 xp / 100 xp"));
    }

    #[test]
    fn experience_bar_clamps_overfull() {
        let bar = experience_bar(&view(1, 300));
        assert!(bar.contains(&format!("[{}]", "#".repeat(BAR_WIDTH))));
    }

    #[test]
    fn profile_and_counter() {
        let v = view(7, 0);
        assert_eq!(profile(&v), "Level 7");
        assert_eq!(completed_challenges(&v), "Completed challenges  4");
    }

    #[test]
    fn countdown_uses_two_digit_groups() {
        assert_eq!(digits(5), ['0', '5']);
        assert_eq!(digits(25), ['2', '5']);
        assert_eq!(countdown(&view(1, 0)), "25:00  (start a cycle)");
    }

    #[test]
    fn challenge_box_shows_active_challenge() {
        let mut v = view(1, 0);
        assert!(challenge_box(&v).starts_with("Finish a cycle"));
        v.active_challenge = Some(Challenge {
            challenge_type: ChallengeType::Eye,
            description: "Look far away.".into(),
            amount: 90,
        });
        let rendered = challenge_box(&v);
        assert!(rendered.starts_with("Worth 90 xp"));
        assert!(rendered.contains("[eye]"));
        assert!(rendered.contains("Look far away."));
    }

    #[test]
    fn modal_only_when_flag_raised() {
        let mut v = view(3, 0);
        assert!(level_up_modal(&v).is_none());
        assert!(!render_page(&v).contains("Congratulations"));
        v.level_up_modal_open = true;
        assert!(level_up_modal(&v).unwrap().contains("*** 3 ***"));
        assert!(render_page(&v).contains("Congratulations"));
    }
}
