//! JSON-file-backed settings store.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use parking_lot::Mutex;

use crate::traits::settings_store::SettingsStore;

/// Persists settings as a flat JSON object of string values.
///
/// Values are stored as strings and parsed on read; a value that fails
/// to parse yields the caller's default. A missing or unreadable file
/// starts empty. Write failures are logged and the in-memory value is
/// kept, so the process keeps its configuration for this run.
pub struct FileSettings {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FileSettings {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(values) => values,
                Err(e) => {
                    log::warn!("settings file {} is malformed: {}", path.display(), e);
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn put(&self, key: &str, value: String) {
        let snapshot = {
            let mut values = self.values.lock();
            values.insert(key.to_string(), value);
            values.clone()
        };
        match serde_json::to_string_pretty(&snapshot) {
            Ok(raw) => {
                if let Err(e) = fs::write(&self.path, raw) {
                    log::warn!("failed to write settings file {}: {}", self.path.display(), e);
                }
            }
            Err(e) => log::warn!("failed to serialize settings: {}", e),
        }
    }
}

impl SettingsStore for FileSettings {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopening_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let store = FileSettings::new(&path);
        store.set_float("overlay_alpha", 0.75);
        store.set_int("camera_facing", 1);
        store.set_bool("auto_restart_on_facing_change", false);
        drop(store);

        let store = FileSettings::new(&path);
        assert_eq!(store.get_float("overlay_alpha", 0.5), 0.75);
        assert_eq!(store.get_int("camera_facing", 0), 1);
        assert!(!store.get_bool("auto_restart_on_facing_change", true));
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(
            &path,
            r#"{"overlay_alpha": "not a float", "camera_facing": "maybe"}"#,
        )
        .unwrap();

        let store = FileSettings::new(&path);
        assert_eq!(store.get_float("overlay_alpha", 0.5), 0.5);
        assert_eq!(store.get_int("camera_facing", 0), 0);
    }

    #[test]
    fn malformed_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json at all").unwrap();

        let store = FileSettings::new(&path);
        assert_eq!(store.get_int("camera_facing", 0), 0);

        store.set_int("camera_facing", 1);
        assert_eq!(store.get_int("camera_facing", 0), 1);
    }

    #[test]
    fn missing_file_reads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSettings::new(dir.path().join("absent.json"));
        assert_eq!(store.get_float("overlay_alpha", 0.5), 0.5);
    }
}
