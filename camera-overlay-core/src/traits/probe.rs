/// Static camera capability checks, consulted before any resource is
/// acquired.
pub trait CapabilityProbe: Send + Sync {
    /// Whether any usable camera exists. Absence is a hard stop for
    /// `start()`.
    fn has_camera(&self) -> bool;

    /// Whether a front-facing camera exists. Without it, a persisted
    /// front-facing preference falls back to the back camera.
    fn has_front_camera(&self) -> bool;
}
