//! # move.it Core Library
//!
//! This library provides the business logic for move.it, a gamified habit
//! tracker: finish a focus cycle, receive a short body or eye-rest challenge,
//! complete it for experience and level up over time.
//!
//! The `moveit` CLI is a thin layer over this crate. Every invocation loads a
//! [`Session`] from storage, applies one action and writes the snapshot back.
//!
//! ## Architecture
//!
//! - **Challenges**: static catalog and the random selector that draws from it
//! - **Progress**: level / experience state machine with the level threshold
//!   formula
//! - **Countdown**: a wall-clock countdown that requires the caller to
//!   periodically invoke `tick()`
//! - **Storage**: cookie-style snapshot persistence (cookie jar, SQLite kv,
//!   in-memory) and TOML-based configuration
//! - **Session**: the explicit context object tying the above together
//!
//! ## Key Components
//!
//! - [`Session`]: owns state, runs operations, synchronizes snapshots
//! - [`Progress`]: the level / experience state machine
//! - [`Countdown`]: focus cycle countdown
//! - [`Catalog`]: the challenge definitions
//! - [`Config`]: application configuration management

pub mod challenge;
pub mod countdown;
pub mod error;
pub mod events;
pub mod notify;
pub mod progress;
pub mod session;
pub mod storage;
pub mod view;

pub use challenge::{Catalog, Challenge, ChallengeSelector, ChallengeType, FixedSelector, RandomSelector};
pub use countdown::{Countdown, CountdownState};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use notify::{ConsoleNotifier, Notification, NotificationPermission, Notifier, RecordingNotifier};
pub use progress::{xp_to_next_level, Progress, Snapshot};
pub use session::{Session, UiState};
pub use storage::{Config, CookieJar, Database, MemoryStore, SnapshotStore};
pub use view::ProgressView;
