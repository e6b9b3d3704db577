use serde::{Deserialize, Serialize};

/// Which physical camera is selected as the feed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CameraFacing {
    Back,
    Front,
}

impl CameraFacing {
    /// Decode the persisted integer form (0 = back, 1 = front).
    /// Unrecognized values decode to back.
    pub fn from_setting(value: i64) -> Self {
        if value == 1 {
            Self::Front
        } else {
            Self::Back
        }
    }

    pub fn as_setting(self) -> i64 {
        match self {
            Self::Back => 0,
            Self::Front => 1,
        }
    }
}

/// Hardware-reported lens orientation of a single camera identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LensFacing {
    Back,
    Front,
    External,
}

/// Immutable (width, height) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PreviewSize {
    pub width: u32,
    pub height: u32,
}

impl PreviewSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Pixel area, widened so the multiplication cannot overflow.
    pub fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Static capabilities reported for one camera identifier.
#[derive(Debug, Clone)]
pub struct CameraCharacteristics {
    pub lens_facing: LensFacing,
    /// Sizes the hardware can stream to a preview surface.
    pub preview_sizes: Vec<PreviewSize>,
    /// Sizes the hardware supports for still captures; the largest one
    /// defines the target aspect ratio for preview negotiation.
    pub still_capture_sizes: Vec<PreviewSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoFocusMode {
    #[default]
    ContinuousPicture,
    Off,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutoExposureMode {
    #[default]
    OnAutoFlash,
    On,
}

/// Parameters of the repeating preview request submitted once a capture
/// session is configured. Defaults match what the overlay always asks
/// for: continuous autofocus and flash-on-auto-exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewRequest {
    pub auto_focus: AutoFocusMode,
    pub auto_exposure: AutoExposureMode,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn facing_setting_roundtrip() {
        assert_eq!(CameraFacing::from_setting(0), CameraFacing::Back);
        assert_eq!(CameraFacing::from_setting(1), CameraFacing::Front);
        assert_eq!(CameraFacing::Front.as_setting(), 1);
    }

    #[test]
    fn unknown_facing_setting_decodes_to_back() {
        assert_eq!(CameraFacing::from_setting(-1), CameraFacing::Back);
        assert_eq!(CameraFacing::from_setting(42), CameraFacing::Back);
    }

    #[test]
    fn area_does_not_overflow() {
        let size = PreviewSize::new(u32::MAX, u32::MAX);
        assert_eq!(size.area(), u32::MAX as u64 * u32::MAX as u64);
    }
}
