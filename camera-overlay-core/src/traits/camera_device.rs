use std::sync::Arc;

use crate::models::camera::PreviewRequest;
use crate::models::error::OverlayError;
use crate::traits::display_host::SurfaceHandle;

/// Completion of an asynchronous capture-session configuration.
pub enum SessionEvent {
    Configured(Box<dyn PreviewSession>),
    ConfigureFailed(String),
}

/// Callback invoked when capture-session configuration completes.
///
/// Delivered from the provider's dispatch thread, never from within the
/// `create_preview_session` call itself.
pub type SessionEventHandler = Arc<dyn Fn(SessionEvent) + Send + Sync + 'static>;

/// An open hardware camera device.
pub trait CameraDevice: Send {
    /// Ask the device to configure a capture session streaming into
    /// `target`. Completion is reported through `events`.
    fn create_preview_session(
        &mut self,
        target: SurfaceHandle,
        events: SessionEventHandler,
    ) -> Result<(), OverlayError>;

    /// Release the device handle. Idempotent.
    fn close(&mut self);
}

/// A configured capture session on an open device.
pub trait PreviewSession: Send {
    /// Submit the repeating preview request. Frames flow continuously
    /// into the bound surface until the session is closed.
    fn set_repeating(&mut self, request: PreviewRequest) -> Result<(), OverlayError>;

    /// Stop streaming and release the session. Idempotent.
    fn close(&mut self);
}
