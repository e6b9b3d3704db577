use chrono::{DateTime, Utc};
use serde::Serialize;

/// The three notification variants the overlay posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Started,
    Restarting,
    Error,
}

/// A status notification handed to the platform's notification surface.
///
/// `Started` and `Restarting` are ongoing (not user-dismissible); the
/// error variant is dismissible.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayNotification {
    pub kind: NotificationKind,
    pub title: String,
    pub ticker: String,
    pub ongoing: bool,
    pub posted_at: DateTime<Utc>,
}

impl OverlayNotification {
    fn new(kind: NotificationKind, title: &str, ticker: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            ticker: ticker.to_string(),
            ongoing: kind != NotificationKind::Error,
            posted_at: Utc::now(),
        }
    }

    pub fn started() -> Self {
        Self::new(
            NotificationKind::Started,
            "Camera overlay active",
            "Camera preview overlay started",
        )
    }

    pub fn restarting() -> Self {
        Self::new(
            NotificationKind::Restarting,
            "Restarting after camera change",
            "Camera changed, overlay is restarting",
        )
    }

    pub fn error() -> Self {
        Self::new(
            NotificationKind::Error,
            "Overlay error",
            "Camera preview could not start",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_error_variant_is_dismissible() {
        assert!(OverlayNotification::started().ongoing);
        assert!(OverlayNotification::restarting().ongoing);
        assert!(!OverlayNotification::error().ongoing);
    }
}
