//! Snapshot persistence.
//!
//! Progress is stored as three string-encoded integers under fixed keys,
//! the same shape a web page keeps in browser cookies. The full
//! snapshot is written after every state transition; it is read back once
//! when a session starts. There is no versioning of the stored shape.

mod config;
pub mod cookies;
pub mod database;
mod memory;

pub use config::{ChallengesConfig, Config, CountdownConfig, NotificationsConfig};
pub use cookies::CookieJar;
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;
use std::str::FromStr;

use tracing::debug;

use crate::error::Result;
use crate::progress::Snapshot;

pub const LEVEL_KEY: &str = "level";
pub const CURRENT_XP_KEY: &str = "currentXp";
pub const CHALLENGES_COMPLETED_KEY: &str = "challengesCompleted";

/// String key/value store holding the persisted snapshot.
pub trait SnapshotStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<T: SnapshotStore + ?Sized> SnapshotStore for &mut T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Parse a persisted number. Missing, blank or malformed input yields `None`.
pub fn parse_persisted<T: FromStr>(raw: Option<&str>) -> Option<T> {
    let trimmed = raw?.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse().ok()
}

/// Build a snapshot from raw values, defaulting each field independently.
pub fn coerce_snapshot(level: Option<&str>, current_xp: Option<&str>, completed: Option<&str>) -> Snapshot {
    let defaults = Snapshot::default();
    let snapshot = Snapshot {
        level: parse_persisted::<u32>(level)
            .filter(|l| *l >= 1)
            .unwrap_or(defaults.level),
        current_xp: parse_persisted(current_xp).unwrap_or(defaults.current_xp),
        challenges_completed: parse_persisted(completed).unwrap_or(defaults.challenges_completed),
    };
    debug!(
        raw_level = ?level,
        raw_current_xp = ?current_xp,
        raw_completed = ?completed,
        ?snapshot,
        "seeded progress snapshot"
    );
    snapshot
}

/// Read the snapshot, substituting defaults for anything absent or invalid.
///
/// # Errors
/// Only fails when the underlying store cannot be read.
pub fn load_snapshot<S: SnapshotStore + ?Sized>(store: &S) -> Result<Snapshot> {
    let level = store.get(LEVEL_KEY)?;
    let current_xp = store.get(CURRENT_XP_KEY)?;
    let completed = store.get(CHALLENGES_COMPLETED_KEY)?;
    Ok(coerce_snapshot(
        level.as_deref(),
        current_xp.as_deref(),
        completed.as_deref(),
    ))
}

/// Write all three values. Always the whole snapshot, never a delta.
pub fn save_snapshot<S: SnapshotStore + ?Sized>(store: &mut S, snapshot: &Snapshot) -> Result<()> {
    store.set(LEVEL_KEY, &snapshot.level.to_string())?;
    store.set(CURRENT_XP_KEY, &snapshot.current_xp.to_string())?;
    store.set(CHALLENGES_COMPLETED_KEY, &snapshot.challenges_completed.to_string())?;
    Ok(())
}

/// Returns the data directory, creating it if needed.
///
/// `MOVEIT_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/moveit/`, or `~/.config/moveit-dev/` with `MOVEIT_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf> {
    let dir = match std::env::var_os("MOVEIT_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("MOVEIT_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("moveit-dev")
            } else {
                base_dir.join("moveit")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_values_fall_back_to_defaults() {
        let snapshot = coerce_snapshot(Some("abc"), Some(""), None);
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn each_field_defaults_independently() {
        let snapshot = coerce_snapshot(Some("4"), Some("NaN"), Some(" 12 "));
        assert_eq!(snapshot.level, 4);
        assert_eq!(snapshot.current_xp, 0);
        assert_eq!(snapshot.challenges_completed, 12);
    }

    #[test]
    fn zero_and_negative_levels_are_invalid() {
        assert_eq!(coerce_snapshot(Some("0"), None, None).level, 1);
        assert_eq!(coerce_snapshot(Some("-3"), None, None).level, 1);
    }

    #[test]
    fn fractional_values_are_invalid() {
        assert_eq!(coerce_snapshot(None, Some("12.5"), None).current_xp, 0);
    }

    #[test]
    fn save_then_load() {
        let mut store = MemoryStore::new();
        let snapshot = Snapshot {
            level: 3,
            current_xp: 17,
            challenges_completed: 9,
        };
        save_snapshot(&mut store, &snapshot).unwrap();
        assert_eq!(store.get(CURRENT_XP_KEY).unwrap().as_deref(), Some("17"));
        assert_eq!(load_snapshot(&store).unwrap(), snapshot);
    }

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_snapshot(&store).unwrap(), Snapshot::default());
    }
}
