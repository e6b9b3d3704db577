//! Recording notifier for tests.

use parking_lot::Mutex;

use camera_overlay_core::{NotificationKind, Notifier, OverlayNotification};

/// Records every posted notification and cancel call.
#[derive(Default)]
pub struct RecordingNotifier {
    posted: Mutex<Vec<OverlayNotification>>,
    cancels: Mutex<usize>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kinds of every notification posted so far, in order, across
    /// cancels.
    pub fn posted_kinds(&self) -> Vec<NotificationKind> {
        self.posted.lock().iter().map(|n| n.kind).collect()
    }

    pub fn cancel_count(&self) -> usize {
        *self.cancels.lock()
    }
}

impl Notifier for RecordingNotifier {
    fn post(&self, notification: OverlayNotification) {
        self.posted.lock().push(notification);
    }

    fn cancel_all(&self) {
        *self.cancels.lock() += 1;
    }
}
