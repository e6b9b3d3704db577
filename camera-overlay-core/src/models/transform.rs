//! Preview display transform.
//!
//! When the display is rotated 90° or 270° from natural orientation the
//! preview buffer arrives with its axes swapped relative to the view, so
//! the canvas must be scaled to fill the viewport and counter-rotated.
//! At 0°/180° no transform is applied.

use super::camera::PreviewSize;

/// Display rotation relative to the device's natural orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRotation {
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl DisplayRotation {
    /// Whether the preview buffer axes are swapped relative to the view.
    pub fn is_sideways(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Affine transform applied to the preview canvas: scale about the
/// viewport center, then rotate about the same point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub scale_x: f32,
    pub scale_y: f32,
    pub rotation_degrees: f32,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        scale_x: 1.0,
        scale_y: 1.0,
        rotation_degrees: 0.0,
    };

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

/// Compute the transform that maps the preview buffer onto the viewport,
/// centered on the viewport center.
pub fn preview_transform(
    view_width: u32,
    view_height: u32,
    preview: PreviewSize,
    rotation: DisplayRotation,
) -> Transform {
    if !rotation.is_sideways() {
        return Transform::IDENTITY;
    }

    let view_w = view_width as f32;
    let view_h = view_height as f32;
    let buffer_w = preview.height as f32; // axes swapped when sideways
    let buffer_h = preview.width as f32;

    // Fit the viewport onto the swapped buffer rect, then scale back up
    // so the shorter dimension fills the viewport.
    let fit_x = buffer_w / view_w;
    let fit_y = buffer_h / view_h;
    let fill = (view_h / preview.height as f32).max(view_w / preview.width as f32);

    let rotation_degrees = match rotation {
        DisplayRotation::Deg90 => -90.0,
        DisplayRotation::Deg270 => 90.0,
        _ => 0.0,
    };

    Transform {
        scale_x: fit_x * fill,
        scale_y: fit_y * fill,
        rotation_degrees,
    }
}
