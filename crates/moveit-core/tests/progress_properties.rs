//! Property tests for the level threshold and completion arithmetic.

use moveit_core::{xp_to_next_level, Catalog, Challenge, ChallengeType, FixedSelector, Progress, Snapshot};
use proptest::prelude::*;

fn single(amount: u32) -> Catalog {
    Catalog::new(vec![Challenge {
        challenge_type: ChallengeType::Body,
        description: "stretch".into(),
        amount,
    }])
    .unwrap()
}

proptest! {
    #[test]
    fn threshold_matches_formula(level in 1u32..100_000) {
        let base = (u64::from(level) + 1) * 4;
        prop_assert_eq!(xp_to_next_level(level), base * base);
    }

    #[test]
    fn threshold_grows_with_level(level in 1u32..100_000) {
        prop_assert!(xp_to_next_level(level + 1) > xp_to_next_level(level));
    }

    /// Starting below the threshold with an award no larger than the
    /// threshold, the result is below the next threshold again.
    #[test]
    fn single_crossing_keeps_xp_below_threshold(
        level in 1u32..1_000,
        start_pct in 0u64..100,
        amount in 1u32..=400,
    ) {
        let threshold = xp_to_next_level(level);
        prop_assume!(u64::from(amount) <= threshold);
        let current_xp = threshold * start_pct / 100;

        let mut progress = Progress::from_snapshot(Snapshot { level, current_xp, challenges_completed: 0 });
        progress.start_new_challenge(&single(amount), &mut FixedSelector::new(vec![0]));
        progress.complete_challenge();

        let total = current_xp + u64::from(amount);
        if total >= threshold {
            prop_assert_eq!(progress.level(), level + 1);
            prop_assert_eq!(progress.current_xp(), total - threshold);
            prop_assert!(progress.is_level_up_modal_open());
        } else {
            prop_assert_eq!(progress.level(), level);
            prop_assert_eq!(progress.current_xp(), total);
            prop_assert!(!progress.is_level_up_modal_open());
        }
        prop_assert!(progress.current_xp() < progress.xp_to_next_level());
        prop_assert_eq!(progress.challenges_completed(), 1);
        prop_assert!(progress.active_challenge().is_none());
    }

    #[test]
    fn completion_without_challenge_changes_nothing(
        level in 1u32..1_000,
        current_xp in 0u64..10_000,
        completed in 0u64..10_000,
    ) {
        let mut progress = Progress::from_snapshot(Snapshot { level, current_xp, challenges_completed: completed });
        let before = progress.clone();
        prop_assert!(progress.complete_challenge().is_empty());
        prop_assert_eq!(progress, before);
    }

    #[test]
    fn started_challenge_is_from_catalog(picks in proptest::collection::vec(0usize..64, 1..16)) {
        let catalog = Catalog::builtin().unwrap();
        let mut selector = FixedSelector::new(picks.clone());
        let mut progress = Progress::default();
        for _ in &picks {
            progress.start_new_challenge(&catalog, &mut selector);
            prop_assert!(catalog.contains(progress.active_challenge().unwrap()));
        }
    }
}
