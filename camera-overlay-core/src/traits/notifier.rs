use crate::models::notification::OverlayNotification;

/// Interface to the platform's notification surface.
///
/// The overlay owns a single notification slot; posting replaces the
/// previous notification.
pub trait Notifier: Send + Sync {
    fn post(&self, notification: OverlayNotification);

    fn cancel_all(&self);
}
