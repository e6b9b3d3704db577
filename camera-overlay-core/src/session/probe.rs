//! Capability probing derived from camera enumeration.

use std::sync::Arc;

use crate::models::camera::LensFacing;
use crate::traits::camera_provider::CameraProvider;
use crate::traits::probe::CapabilityProbe;

/// Answers capability questions by enumerating a `CameraProvider`.
/// Enumeration failures count as "no camera".
pub struct ProviderProbe {
    provider: Arc<dyn CameraProvider>,
}

impl ProviderProbe {
    pub fn new(provider: Arc<dyn CameraProvider>) -> Self {
        Self { provider }
    }
}

impl CapabilityProbe for ProviderProbe {
    fn has_camera(&self) -> bool {
        self.provider
            .camera_ids()
            .map(|ids| !ids.is_empty())
            .unwrap_or(false)
    }

    fn has_front_camera(&self) -> bool {
        let Ok(ids) = self.provider.camera_ids() else {
            return false;
        };
        ids.iter().any(|id| {
            matches!(
                self.provider.characteristics(id),
                Ok(info) if info.lens_facing == LensFacing::Front
            )
        })
    }
}
