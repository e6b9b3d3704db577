use crate::models::state::CameraSessionState;

/// Observer for camera session state transitions.
///
/// Called from the camera provider's dispatch thread; implementations
/// must not block on work that waits for that same thread.
pub trait SessionDelegate: Send + Sync {
    /// The session moved to a new state.
    fn on_state_changed(&self, state: CameraSessionState);

    /// Hardware reported a fatal device error. The owning overlay must
    /// perform a full stop, not just release the camera.
    fn on_device_error(&self, code: i32);
}

/// Observer for overlay lifecycle outcomes.
pub trait OverlayDelegate: Send + Sync {
    /// The owning service/process context should terminate. Fired at
    /// the end of every stop, and by a start that found no camera.
    fn on_service_stop(&self);
}
