//! Notification side effects.
//!
//! A notification is best effort: it is only sent when permission has been
//! granted, and a failed delivery is logged and dropped. There is no retry
//! and no fallback channel.

use std::io::Write;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationPermission {
    /// Not asked yet.
    #[default]
    Default,
    Granted,
    Denied,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
}

impl Notification {
    pub fn new_challenge(amount: u32) -> Self {
        Self {
            title: "New challenge!".into(),
            body: format!("Worth {amount}xp!"),
        }
    }
}

pub trait Notifier {
    fn permission(&self) -> NotificationPermission;

    /// Ask once for permission. Only a `Default` permission can change.
    fn request_permission(&mut self) -> NotificationPermission;

    fn notify(&mut self, notification: &Notification) -> std::io::Result<()>;
}

/// Writes notifications as single lines to a writer (stderr in the CLI).
///
/// The `enabled` switch from the configuration mutes delivery outright:
/// while it is off the permission reads as `Denied` and a prompt is never
/// answered, whatever answer was stored earlier.
pub struct ConsoleNotifier<W: Write> {
    permission: NotificationPermission,
    enabled: bool,
    out: W,
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(permission: NotificationPermission, enabled: bool, out: W) -> Self {
        Self {
            permission,
            enabled,
            out,
        }
    }

    /// The stored prompt answer, ignoring the `enabled` switch.
    pub fn answer(&self) -> NotificationPermission {
        self.permission
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn permission(&self) -> NotificationPermission {
        if self.enabled {
            self.permission
        } else {
            NotificationPermission::Denied
        }
    }

    fn request_permission(&mut self) -> NotificationPermission {
        if self.enabled && self.permission == NotificationPermission::Default {
            self.permission = NotificationPermission::Granted;
        }
        self.permission()
    }

    fn notify(&mut self, notification: &Notification) -> std::io::Result<()> {
        writeln!(self.out, "[{}] {}", notification.title, notification.body)?;
        self.out.flush()
    }
}

/// Keeps every delivered notification in memory. Used by tests and
/// embedders that render notifications themselves.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    permission: NotificationPermission,
    /// Permission handed out on the first request.
    answer: NotificationPermission,
    pub requests: usize,
    pub sent: Vec<Notification>,
}

impl RecordingNotifier {
    pub fn granted() -> Self {
        Self::answering(NotificationPermission::Granted)
    }

    pub fn denied() -> Self {
        Self::answering(NotificationPermission::Denied)
    }

    /// Starts in `Default` and switches to `answer` when asked.
    pub fn answering(answer: NotificationPermission) -> Self {
        Self {
            permission: NotificationPermission::Default,
            answer,
            requests: 0,
            sent: Vec::new(),
        }
    }
}

impl Notifier for RecordingNotifier {
    fn permission(&self) -> NotificationPermission {
        self.permission
    }

    fn request_permission(&mut self) -> NotificationPermission {
        self.requests += 1;
        if self.permission == NotificationPermission::Default {
            self.permission = self.answer;
        }
        self.permission
    }

    fn notify(&mut self, notification: &Notification) -> std::io::Result<()> {
        self.sent.push(notification.clone());
        Ok(())
    }
}
