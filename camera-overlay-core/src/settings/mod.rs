//! Typed access to persisted overlay configuration.

pub mod file_store;

use std::sync::Arc;

use crate::models::camera::CameraFacing;
use crate::traits::settings_store::SettingsStore;

/// Persisted setting keys.
pub mod keys {
    pub const OVERLAY_ALPHA: &str = "overlay_alpha";
    pub const CAMERA_FACING: &str = "camera_facing";
    pub const AUTO_RESTART_ON_FACING_CHANGE: &str = "auto_restart_on_facing_change";
}

/// Default overlay transparency.
pub const DEFAULT_ALPHA: f32 = 0.5;

/// Typed, cloneable handle over a [`SettingsStore`]. Constructed
/// explicitly and passed to whoever needs it.
#[derive(Clone)]
pub struct Settings {
    store: Arc<dyn SettingsStore>,
}

impl Settings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    /// Overlay transparency, clamped to `[0.0, 1.0]`.
    pub fn alpha(&self) -> f32 {
        self.store
            .get_float(keys::OVERLAY_ALPHA, DEFAULT_ALPHA)
            .clamp(0.0, 1.0)
    }

    pub fn set_alpha(&self, alpha: f32) {
        self.store.set_float(keys::OVERLAY_ALPHA, alpha.clamp(0.0, 1.0));
    }

    pub fn camera_facing(&self) -> CameraFacing {
        CameraFacing::from_setting(self.store.get_int(keys::CAMERA_FACING, 0))
    }

    pub fn set_camera_facing(&self, facing: CameraFacing) {
        self.store.set_int(keys::CAMERA_FACING, facing.as_setting());
    }

    /// Whether a facing change recreates the overlay in place rather
    /// than stopping it.
    pub fn auto_restart_on_facing_change(&self) -> bool {
        self.store.get_bool(keys::AUTO_RESTART_ON_FACING_CHANGE, true)
    }

    pub fn set_auto_restart_on_facing_change(&self, enabled: bool) {
        self.store.set_bool(keys::AUTO_RESTART_ON_FACING_CHANGE, enabled);
    }
}
