/// Camera session state machine.
///
/// State transitions:
/// ```text
/// closed → opening → open → streaming
///              ↓        ↘      ↓
///            closed      closing → closed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraSessionState {
    Closed,
    Opening,
    Open,
    Streaming,
    Closing,
}

impl CameraSessionState {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self, Self::Streaming)
    }

    /// Whether a device handle is currently held (open or streaming).
    pub fn holds_device(&self) -> bool {
        matches!(self, Self::Open | Self::Streaming)
    }
}

/// Whether the system-level overlay surface is attached to the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayState {
    Absent,
    Present,
}

impl OverlayState {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present)
    }
}
