//! In-memory settings store.

use std::collections::HashMap;

use parking_lot::Mutex;

use camera_overlay_core::SettingsStore;

/// String-backed in-memory `SettingsStore`. Values parse on read and
/// fall back to the caller's default when malformed, like the persisted
/// store.
#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plant a raw (possibly malformed) stored value.
    pub fn set_raw(&self, key: &str, value: &str) {
        self.values
            .lock()
            .insert(key.to_string(), value.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        self.values.lock().insert(key.to_string(), value);
    }
}

impl SettingsStore for MemorySettings {
    fn get_float(&self, key: &str, default: f32) -> f32 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    fn set_float(&self, key: &str, value: f32) {
        self.put(key, value.to_string());
    }

    fn get_int(&self, key: &str, default: i64) -> i64 {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    fn set_int(&self, key: &str, value: i64) {
        self.put(key, value.to_string());
    }

    fn get_bool(&self, key: &str, default: bool) -> bool {
        self.get(key).and_then(|v| v.parse().ok()).unwrap_or(default)
    }

    fn set_bool(&self, key: &str, value: bool) {
        self.put(key, value.to_string());
    }
}
