/// Persisted key-value configuration backend.
///
/// Implementations recover from malformed stored values by returning
/// the supplied default; reads never fail. Writes are last-writer-wins.
pub trait SettingsStore: Send + Sync {
    fn get_float(&self, key: &str, default: f32) -> f32;
    fn set_float(&self, key: &str, value: f32);

    fn get_int(&self, key: &str, default: i64) -> i64;
    fn set_int(&self, key: &str, value: i64);

    fn get_bool(&self, key: &str, default: bool) -> bool;
    fn set_bool(&self, key: &str, value: bool);
}
