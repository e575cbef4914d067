// ── User notification sink ──
//
// Failures a person has to see (unparsed panel state, rejected commands)
// are reported here in addition to the returned error. The host decides
// how to deliver them.

use std::sync::Mutex;

use tracing::warn;

/// Titles used by the hub.
pub mod titles {
    pub const ALARM_STATE_ERROR: &str = "Alarm State Error";
    pub const ARM_FAILED: &str = "Arm Failed";
    pub const DISARM_FAILED: &str = "Disarm Failed";
}

/// Receives user-visible notifications from the hub.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Logs notifications as warnings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, title: &str, message: &str) {
        warn!(title, "{message}");
    }
}

/// A notification captured by [`RecordingNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

/// Keeps every notification in memory, for hosts that report them after
/// the fact.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    seen: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything recorded so far.
    pub fn take(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.seen.lock().expect("notifier lock poisoned"))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, title: &str, message: &str) {
        self.seen
            .lock()
            .expect("notifier lock poisoned")
            .push(Notification {
                title: title.to_owned(),
                message: message.to_owned(),
            });
    }
}
